//! 検証モジュール
//!
//! パース→スキーマ→品質スコア→トークン量の順に全レイヤーを通し、
//! 結果をひとつのレポートにまとめる。合否はスキーマ妥当性と
//! スコアしきい値（設定から注入）の両方で決まる。

pub mod schema;

use serde::Serialize;

use crate::parser::SkillDocument;
use crate::scoring::{
    check_progressive_disclosure, check_token_limits, score, score_legacy, DisclosureReport,
    LegacyReport, ScoreReport, TokenReport,
};

pub use schema::{check, SchemaReport};

/// スコアがこれ以上なら合格（設定で上書き可能）
pub const DEFAULT_PASS_THRESHOLD: u32 = 50;

/// 検証の動作オプション
#[derive(Debug, Clone)]
pub struct ValidationOptions {
    /// 合格に必要な最低スコア
    pub pass_threshold: u32,
    /// トークン量チェックを行うか
    pub include_tokens: bool,
    /// 旧方式の採点を使うか
    pub legacy_scoring: bool,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            pass_threshold: DEFAULT_PASS_THRESHOLD,
            include_tokens: true,
            legacy_scoring: false,
        }
    }
}

/// 採点エンジンごとの品質レポート
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum QualityReport {
    /// パターン検出方式（既定）
    Pattern(ScoreReport),
    /// セクション長ベースの旧方式
    Legacy(LegacyReport),
}

impl QualityReport {
    /// 合計スコア
    pub fn score(&self) -> u32 {
        match self {
            QualityReport::Pattern(report) => report.score,
            QualityReport::Legacy(report) => report.score,
        }
    }

    fn suggestion_messages(&self) -> Vec<String> {
        match self {
            QualityReport::Pattern(report) => report
                .suggestions
                .iter()
                .map(|s| s.message.clone())
                .collect(),
            QualityReport::Legacy(report) => report.suggestions.clone(),
        }
    }
}

/// 全レイヤーをまとめた検証レポート
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    /// スキーマ妥当かつスコアがしきい値以上
    pub valid: bool,
    /// スキーマチェックの結果
    pub schema: SchemaReport,
    /// 品質スコアの結果
    pub quality: QualityReport,
    /// トークン量（オプションで省略可能）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokens: Option<TokenReport>,
    /// 段階的開示パターンの有無
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progressive_disclosure: Option<DisclosureReport>,
    /// 全レイヤーの改善提案をまとめたリスト
    pub suggestions: Vec<String>,
}

/// スキルドキュメント全文を検証
pub fn validate(content: &str, options: &ValidationOptions) -> ValidationReport {
    let doc = SkillDocument::parse(content);

    let schema_report = schema::check(&doc.metadata);

    let quality = if options.legacy_scoring {
        QualityReport::Legacy(score_legacy(&doc))
    } else {
        QualityReport::Pattern(score(&doc))
    };

    let (tokens, progressive_disclosure) = if options.include_tokens {
        (
            Some(check_token_limits(content)),
            Some(check_progressive_disclosure(content)),
        )
    } else {
        (None, None)
    };

    let mut suggestions: Vec<String> = schema_report
        .errors
        .iter()
        .map(|e| format!("Schema: {e}"))
        .collect();
    suggestions.extend(quality.suggestion_messages());
    if let Some(token_report) = &tokens {
        if !token_report.within_recommended {
            suggestions.push(token_report.recommendation.clone());
        }
    }

    ValidationReport {
        valid: schema_report.valid && quality.score() >= options.pass_threshold,
        schema: schema_report,
        quality,
        tokens,
        progressive_disclosure,
        suggestions,
    }
}

/// スキーマチェックだけを行う簡易検証
pub fn quick_validate(content: &str) -> SchemaReport {
    let doc = SkillDocument::parse(content);
    schema::check(&doc.metadata)
}
