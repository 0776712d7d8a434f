//! 埋め込みテンプレートアセット
//!
//! ビルド時にtemplatesディレクトリをバイナリに埋め込み、
//! インストール先に関係なく利用可能にする

use rust_embed::Embed;

/// 埋め込みテンプレートアセット
#[derive(Embed)]
#[folder = "templates/"]
#[prefix = ""]
pub struct EmbeddedTemplates;

impl EmbeddedTemplates {
    /// テンプレート名の一覧を取得
    pub fn template_names() -> Vec<String> {
        Self::iter()
            .filter(|path| path.ends_with(".md") && !path.starts_with('_'))
            .map(|path| path.trim_end_matches(".md").to_string())
            .collect()
    }

    /// テンプレート内容を取得
    pub fn get_content(name: &str) -> Option<String> {
        Self::get(&format!("{name}.md")).map(|f| String::from_utf8_lossy(&f.data).to_string())
    }
}
