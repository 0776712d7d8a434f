//! スキル生成モジュール
//!
//! テンプレートからのスキル生成と、生成済みスキルの更新・参照を担当する。
//! 生成時は足場ディレクトリ（scripts/、resources/）もあわせて作る。

pub mod embedded;
pub mod templates;

pub use embedded::EmbeddedTemplates;
pub use templates::{fill_template, template_defaults, TemplateStore, TEMPLATE_TYPES};

use anyhow::{bail, Result};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::parser::{SkillDocument, SkillMetadata};
use crate::storage::SkillStore;
use crate::validator;

/// スキル生成のオプション
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// スキル名（ディレクトリ名になる）
    pub name: String,
    /// frontmatterに入る説明文
    pub description: String,
    /// 使用するテンプレート名
    pub template: String,
    /// テンプレートへ渡す追加のプレースホルダ値
    pub template_data: HashMap<String, String>,
    /// 既存スキルを上書きするか
    pub force: bool,
}

/// 生成されたスキル
#[derive(Debug)]
pub struct GeneratedSkill {
    pub name: String,
    pub path: PathBuf,
    pub content: String,
}

/// 一覧・参照用のスキル情報
#[derive(Debug)]
pub struct SkillInfo {
    pub name: String,
    pub path: PathBuf,
    pub metadata: SkillMetadata,
}

/// テンプレートから新しいスキルを生成
///
/// 同名のスキルがある場合はforce指定がない限り失敗する。`name`と
/// `description`は常に呼び出し側の値がテンプレートに入る。
pub async fn generate(
    store: &SkillStore,
    template_store: &TemplateStore,
    options: GenerateOptions,
) -> Result<GeneratedSkill> {
    if !options.force && store.exists(&options.name) {
        bail!("Skill \"{}\" already exists", options.name);
    }

    let mut data = options.template_data;
    data.insert("name".to_string(), options.name.clone());
    data.insert("description".to_string(), options.description.clone());
    data.entry("author".to_string()).or_insert_with(default_author);

    let content = template_store.render(&options.template, data).await?;

    store.create_structure(&options.name).await?;
    let path = store.write(&options.name, &content).await?;

    Ok(GeneratedSkill {
        name: options.name,
        path,
        content,
    })
}

fn default_author() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_default()
}

/// 既存の本文からスキルを作成
///
/// 書き込む前にfrontmatterの必須フィールドを検査する。
pub async fn create_from_content(
    store: &SkillStore,
    name: &str,
    content: &str,
) -> Result<GeneratedSkill> {
    let schema_report = validator::quick_validate(content);
    if !schema_report.valid {
        bail!("Invalid skill content: {}", schema_report.errors.join(", "));
    }

    if store.exists(name) {
        bail!("Skill \"{name}\" already exists");
    }

    store.create_structure(name).await?;
    let path = store.write(name, content).await?;

    Ok(GeneratedSkill {
        name: name.to_string(),
        path,
        content: content.to_string(),
    })
}

/// 既存スキルの本文を書き換え
pub async fn update(store: &SkillStore, name: &str, content: &str) -> Result<PathBuf> {
    if !store.exists(name) {
        bail!("Skill \"{name}\" does not exist");
    }
    store.write(name, content).await
}

/// スキル情報を取得（存在しなければNone）
pub async fn skill_info(store: &SkillStore, name: &str) -> Result<Option<SkillInfo>> {
    if !store.exists(name) {
        return Ok(None);
    }

    let content = store.read(name).await?;
    let doc = SkillDocument::parse(&content);

    Ok(Some(SkillInfo {
        name: name.to_string(),
        path: store.skill_file(name),
        metadata: doc.metadata,
    }))
}
