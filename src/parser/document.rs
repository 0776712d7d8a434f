//! スキルドキュメントのパースモジュール
//!
//! YAML frontmatterと本文を分離し、本文を`##`見出し単位のセクションに分割する。
//! パースは決して失敗しない：不正な入力は空のメタデータや空のセクションに
//! 縮退し、下流のスコアリングはそれを許容する。

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tokio::fs;

use super::sections::{parse_sections, Sections};

/// MCPサーバー要件
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct McpRequirements {
    /// 必須MCPサーバー
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
    /// 任意MCPサーバー
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub optional: Vec<String>,
}

impl McpRequirements {
    /// 必須・任意とも未指定か
    pub fn is_empty(&self) -> bool {
        self.required.is_empty() && self.optional.is_empty()
    }
}

/// スキルのメタデータ（YAML frontmatter）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SkillMetadata {
    /// スキル名
    #[serde(default)]
    pub name: String,
    /// 説明
    #[serde(default)]
    pub description: String,
    /// バージョン
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// 作者
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// トリガーフレーズ
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub triggers: Vec<String>,
    /// タグ
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// MCPサーバー要件
    #[serde(default, skip_serializing_if = "McpRequirements::is_empty")]
    pub mcps: McpRequirements,
    /// 上記以外のキー（再シリアライズのため保持）
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

/// パース済みスキルドキュメント
#[derive(Debug, Clone, Default)]
pub struct SkillDocument {
    /// メタデータ
    pub metadata: SkillMetadata,
    /// frontmatter以降の本文（Markdown）
    pub body: String,
    /// `##`見出しごとのセクション（正規化キー → 本文）
    pub sections: Sections,
}

impl SkillDocument {
    /// 文字列からドキュメントをパース
    ///
    /// frontmatterがない・壊れている場合も失敗せず、空のメタデータに縮退する。
    /// セクションは本文のみから導出され、メタデータには依存しない。
    pub fn parse(content: &str) -> Self {
        let (metadata, body) = extract_frontmatter(content);
        let sections = parse_sections(&body);
        Self {
            metadata,
            body,
            sections,
        }
    }

    /// ファイルから読み込んでパース
    pub async fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read skill file: {}", path.display()))?;
        Ok(Self::parse(&content))
    }

    /// frontmatter + 本文のSKILL.md形式へ戻す
    pub fn to_markdown(&self) -> Result<String> {
        let yaml =
            serde_yaml::to_string(&self.metadata).context("Failed to serialize frontmatter")?;
        Ok(format!("---\n{}---\n\n{}\n", yaml, self.body.trim_end()))
    }
}

/// frontmatter（---で囲まれた部分）を抽出
///
/// 閉じ---がない場合は全体を本文として扱う。YAMLが壊れている場合は
/// メタデータのみ空にして本文は残す。
fn extract_frontmatter(content: &str) -> (SkillMetadata, String) {
    let content = content.trim();

    if !content.starts_with("---") {
        return (SkillMetadata::default(), content.to_string());
    }

    let rest = &content[3..];
    let Some(end_pos) = rest.find("\n---") else {
        return (SkillMetadata::default(), content.to_string());
    };

    let yaml_content = rest[..end_pos].trim();
    let body = rest[end_pos + 4..].trim().to_string();

    match serde_yaml::from_str(yaml_content) {
        Ok(metadata) => (metadata, body),
        Err(e) => {
            tracing::debug!("Failed to parse frontmatter YAML: {}", e);
            (SkillMetadata::default(), body)
        }
    }
}
