//! テンプレートの読み込みとプレースホルダ展開
//!
//! テンプレートは`{{key}}`プレースホルダを含むmarkdownファイル。
//! 組み込みの4種に加え、設定のカスタムディレクトリにある同名ファイルが
//! あればそちらを優先する。

use anyhow::{anyhow, Context, Result};
use regex::Regex;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::OnceLock;
use tokio::fs;

use super::embedded::EmbeddedTemplates;

/// 組み込みテンプレートの種類
pub const TEMPLATE_TYPES: [&str; 4] = ["basic", "debugging", "document", "api"];

const BASIC_DEFAULTS: &[(&str, &str)] = &[
    ("purpose", "A general-purpose skill for common tasks."),
    ("trigger1", "User explicitly requests this functionality"),
    ("trigger2", "Task matches the skill's domain"),
    (
        "instructions",
        "Follow the user's request carefully and provide helpful output.",
    ),
    ("examplePrompt1", "Help me with [task]"),
    (
        "exampleBehavior1",
        "Analyze the request, execute the task, and confirm completion.",
    ),
    ("examplePrompt2", "What if [edge case]?"),
    (
        "exampleBehavior2",
        "Handle the edge case gracefully with appropriate fallback.",
    ),
    ("error1", "Invalid input"),
    ("cause1", "User provided malformed data"),
    ("solution1", "Validate input and request clarification"),
    ("ref1", "#"),
];

const DEBUGGING_DEFAULTS: &[(&str, &str)] = &[
    ("topic", "general"),
    (
        "exampleError",
        "TypeError: Cannot read property X of undefined",
    ),
    ("errorDocsUrl", "#"),
    ("debuggingGuideUrl", "#"),
];

const DOCUMENT_DEFAULTS: &[(&str, &str)] = &[
    ("documentType", "JSON"),
    ("dataType", "data fields"),
    ("outputFormat", "CSV"),
    ("format1", "JSON"),
    ("notes1", "Full support"),
    ("format2", "YAML"),
    ("notes2", "Full support"),
    ("specUrl", "#"),
    ("libraryUrl", "#"),
];

const API_DEFAULTS: &[(&str, &str)] = &[
    ("apiName", "External API"),
    ("apiBaseUrl", "https://api.example.com"),
    ("API_KEY_VAR", "API_KEY"),
    ("API_URL_VAR", "API_URL"),
    ("authMethod", "Bearer token"),
    (
        "authInstructions",
        "Include the API key in the Authorization header.",
    ),
    ("operation1", "List Resources"),
    ("operation1Description", "Get all resources"),
    ("endpoint1", "/api/resources"),
    ("method1", "GET"),
    ("requestBody1", "{}"),
    ("operation2", "Create Resource"),
    ("operation2Description", "Create a new resource"),
    ("endpoint2", "/api/resources"),
    ("method2", "POST"),
    ("rateLimit", "100 requests/minute"),
    ("desc1", "List all resources"),
    ("desc2", "Create new resource"),
    ("apiDocsUrl", "#"),
    ("authDocsUrl", "#"),
    ("errorDocsUrl", "#"),
];

/// テンプレートごとの既定プレースホルダ値
///
/// 未知のテンプレート名にはbasicの既定値を返す。
pub fn template_defaults(name: &str) -> &'static [(&'static str, &'static str)] {
    match name {
        "debugging" => DEBUGGING_DEFAULTS,
        "document" => DOCUMENT_DEFAULTS,
        "api" => API_DEFAULTS,
        _ => BASIC_DEFAULTS,
    }
}

fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\{\{(\w+)\}\}").expect("valid regex"))
}

/// `{{key}}`プレースホルダを展開
///
/// データにないキーは空文字列になる。展開後のファイルにプレースホルダが
/// 残ることはない。
pub fn fill_template(template: &str, data: &HashMap<String, String>) -> String {
    placeholder_pattern()
        .replace_all(template, |caps: &regex::Captures| {
            data.get(&caps[1]).cloned().unwrap_or_default()
        })
        .into_owned()
}

/// テンプレートの取得元（埋め込み + カスタムディレクトリ）
#[derive(Debug, Clone, Default)]
pub struct TemplateStore {
    custom_dir: Option<PathBuf>,
}

impl TemplateStore {
    pub fn new(custom_dir: Option<PathBuf>) -> Self {
        Self { custom_dir }
    }

    fn custom_path(&self, name: &str) -> Option<PathBuf> {
        self.custom_dir
            .as_ref()
            .map(|dir| dir.join(format!("{name}.md")))
    }

    /// テンプレート本文を読み込み
    ///
    /// カスタムディレクトリに同名ファイルがあれば埋め込み版より優先する。
    pub async fn load(&self, name: &str) -> Result<String> {
        if let Some(path) = self.custom_path(name) {
            if path.exists() {
                return fs::read_to_string(&path)
                    .await
                    .with_context(|| format!("Failed to read template: {}", path.display()));
            }
        }

        EmbeddedTemplates::get_content(name).ok_or_else(|| anyhow!("Unknown template: {name}"))
    }

    /// テンプレートが存在するか
    pub fn exists(&self, name: &str) -> bool {
        if let Some(path) = self.custom_path(name) {
            if path.exists() {
                return true;
            }
        }
        EmbeddedTemplates::get_content(name).is_some()
    }

    /// 利用可能なテンプレート名の一覧（ソート・重複除去済み）
    pub async fn list(&self) -> Result<Vec<String>> {
        let mut names = EmbeddedTemplates::template_names();

        if let Some(dir) = &self.custom_dir {
            if dir.exists() {
                let mut entries = fs::read_dir(dir)
                    .await
                    .with_context(|| format!("Failed to read template dir: {}", dir.display()))?;
                while let Some(entry) = entries.next_entry().await? {
                    let path = entry.path();
                    if path.extension().and_then(|s| s.to_str()) != Some("md") {
                        continue;
                    }
                    if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                        if !stem.starts_with('_') {
                            names.push(stem.to_string());
                        }
                    }
                }
            }
        }

        names.sort();
        names.dedup();
        Ok(names)
    }

    /// 既定値に呼び出し側の値を重ねてテンプレートを展開
    pub async fn render(&self, name: &str, data: HashMap<String, String>) -> Result<String> {
        let template = self.load(name).await?;

        let mut merged: HashMap<String, String> = template_defaults(name)
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        merged.extend(data);

        Ok(fill_template(&template, &merged))
    }
}
