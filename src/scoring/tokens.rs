//! トークン量の目安チェックモジュール
//!
//! ドキュメント全文からトークン数を概算し、サイズ帯を判定する。
//! スコアには一切加算されない独立した助言で、あわせて段階的開示
//! （長い内容を参照に逃がす書き方）の有無も報告する。

use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

/// 1トークンあたりの概算文字数
pub const CHARS_PER_TOKEN: usize = 4;
/// 推奨上限トークン数
pub const MAX_RECOMMENDED_TOKENS: usize = 5000;
/// 絶対上限トークン数（超えたら分割すべき）
pub const MAX_ABSOLUTE_TOKENS: usize = 10000;
/// これ未満は内容不足の可能性
pub const MIN_RECOMMENDED_TOKENS: usize = 500;

/// テキストのトークン数を概算（文字数/4の切り上げ）
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count().div_ceil(CHARS_PER_TOKEN)
}

/// サイズ帯
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SizeBand {
    /// 500トークン未満
    TooTerse,
    /// 5000トークン以下
    Optimal,
    /// 10000トークン以下
    Large,
    /// 10000トークン超
    Oversized,
}

impl SizeBand {
    /// トークン数からサイズ帯を判定
    pub fn from_count(tokens: usize) -> Self {
        if tokens < MIN_RECOMMENDED_TOKENS {
            SizeBand::TooTerse
        } else if tokens <= MAX_RECOMMENDED_TOKENS {
            SizeBand::Optimal
        } else if tokens <= MAX_ABSOLUTE_TOKENS {
            SizeBand::Large
        } else {
            SizeBand::Oversized
        }
    }
}

/// トークン量レポート
#[derive(Debug, Clone, Serialize)]
pub struct TokenReport {
    /// 概算トークン数
    pub count: usize,
    /// サイズ帯
    pub band: SizeBand,
    /// 推奨上限以内か
    pub within_recommended: bool,
    /// 絶対上限以内か
    pub within_absolute: bool,
    /// 推奨上限に対する割合（%）
    pub percentage: u32,
    /// サイズ帯に応じた推奨メッセージ
    pub recommendation: String,
}

/// ドキュメント全文のトークン量をチェック
pub fn check_token_limits(content: &str) -> TokenReport {
    let count = estimate_tokens(content);
    let band = SizeBand::from_count(count);

    TokenReport {
        count,
        band,
        within_recommended: count <= MAX_RECOMMENDED_TOKENS,
        within_absolute: count <= MAX_ABSOLUTE_TOKENS,
        percentage: ((count as f64 / MAX_RECOMMENDED_TOKENS as f64) * 100.0).round() as u32,
        recommendation: recommendation_for(band).to_string(),
    }
}

fn recommendation_for(band: SizeBand) -> &'static str {
    match band {
        SizeBand::TooTerse => "Skill is very concise. Consider adding more detail if needed.",
        SizeBand::Optimal => "Token count is optimal.",
        SizeBand::Large => "Skill is large. Consider using progressive disclosure or splitting.",
        SizeBand::Oversized => {
            "Skill exceeds recommended size. Split into multiple skills or use references."
        }
    }
}

/// 段階的開示パターンの有無
#[derive(Debug, Clone, Serialize)]
pub struct DisclosureReport {
    /// いずれかのパターンを使っているか
    pub uses_progressive_disclosure: bool,
    /// Referencesセクションがあるか
    pub has_references: bool,
    /// `<details>`折りたたみがあるか
    pub has_collapsible_sections: bool,
    /// 外部リンクがあるか
    pub has_external_links: bool,
    /// 遅延読み込みの記述があるか
    pub has_deferred_loading: bool,
}

struct DisclosurePatterns {
    references: Regex,
    collapsible: Regex,
    external_link: Regex,
    deferred: Regex,
}

fn disclosure_patterns() -> &'static DisclosurePatterns {
    static PATTERNS: OnceLock<DisclosurePatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| DisclosurePatterns {
        references: Regex::new(r"(?i)##\s*references").expect("valid regex"),
        collapsible: Regex::new(r"(?i)<details>").expect("valid regex"),
        external_link: Regex::new(r"\[[^\]\n]*\]\(https?://[^)\n]+\)").expect("valid regex"),
        deferred: Regex::new(r"(?i)load on demand|lazy load|when needed").expect("valid regex"),
    })
}

/// 段階的開示パターンをチェック
pub fn check_progressive_disclosure(content: &str) -> DisclosureReport {
    let p = disclosure_patterns();
    let has_references = p.references.is_match(content);
    let has_collapsible_sections = p.collapsible.is_match(content);
    let has_external_links = p.external_link.is_match(content);
    let has_deferred_loading = p.deferred.is_match(content);

    DisclosureReport {
        uses_progressive_disclosure: has_references
            || has_collapsible_sections
            || has_external_links
            || has_deferred_loading,
        has_references,
        has_collapsible_sections,
        has_external_links,
        has_deferred_loading,
    }
}
