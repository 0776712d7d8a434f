//! 設定ファイル管理モジュール
//!
//! skill-forge.tomlから設定を読み込み、アプリケーション全体で使用できる
//! 型安全な設定構造体を提供します。

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::storage::DEFAULT_SKILLS_DIR;

/// 設定ファイルパスを上書きする環境変数
pub const CONFIG_ENV: &str = "SKILL_FORGE_CONFIG";

/// アプリケーション全体の設定
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// スキル保存関連設定
    #[serde(default)]
    pub skills: SkillsConfig,
    /// 検証関連設定
    #[serde(default)]
    pub validation: ValidationConfig,
}

/// スキル保存設定
#[derive(Debug, Clone, Deserialize)]
pub struct SkillsConfig {
    /// スキル保存ディレクトリ（相対ならベースディレクトリ基準）
    #[serde(default = "default_skills_dir")]
    pub dir: String,
    /// カスタムテンプレートディレクトリ（オプション）
    pub custom_templates: Option<String>,
}

/// 検証設定
#[derive(Debug, Clone, Deserialize)]
pub struct ValidationConfig {
    /// 合格に必要な最低スコア
    #[serde(default = "default_pass_threshold")]
    pub pass_threshold: u32,
    /// 旧方式のセクション長ベース採点を使うか
    #[serde(default)]
    pub legacy_scoring: bool,
}

// デフォルト値を返す関数群
fn default_skills_dir() -> String {
    DEFAULT_SKILLS_DIR.to_string()
}

fn default_pass_threshold() -> u32 {
    crate::validator::DEFAULT_PASS_THRESHOLD
}

impl Default for SkillsConfig {
    fn default() -> Self {
        Self {
            dir: default_skills_dir(),
            custom_templates: None,
        }
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            pass_threshold: default_pass_threshold(),
            legacy_scoring: false,
        }
    }
}

impl Config {
    /// TOMLファイルから設定を読み込む
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&content)
    }

    /// TOML文字列から設定をパース
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML config")
    }

    /// デフォルト設定ファイルパスを取得
    pub fn default_config_path() -> PathBuf {
        // 環境変数が最優先
        if let Ok(config_path) = std::env::var(CONFIG_ENV) {
            return PathBuf::from(config_path);
        }

        // カレントディレクトリのskill-forge.toml
        let cwd_config = PathBuf::from("skill-forge.toml");
        if cwd_config.exists() {
            return cwd_config;
        }

        // ホームディレクトリの.skill-forge/config.toml
        if let Some(home) = dirs::home_dir() {
            return home.join(".skill-forge").join("config.toml");
        }

        cwd_config
    }

    /// デフォルト設定ファイルから読み込み（存在しない場合は自動生成）
    pub fn load_default() -> Result<Self> {
        let config_path = Self::default_config_path();

        if config_path.exists() {
            Self::load_from_file(&config_path)
        } else {
            // 設定ファイルを自動生成
            if let Err(e) = Self::create_default_config(&config_path) {
                tracing::warn!("Failed to create default config: {}", e);
            } else {
                tracing::info!("Created default config at {}", config_path.display());
            }
            Ok(Self::default())
        }
    }

    /// デフォルト設定ファイルを生成
    fn create_default_config(path: &Path) -> Result<()> {
        // 親ディレクトリを作成
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create config directory: {}", parent.display())
                })?;
            }
        }

        let default_content = r#"# skill-forge default configuration

[skills]
dir = ".claude/skills"
# custom_templates = "/path/to/custom/templates"

[validation]
pass_threshold = 50     # minimum quality score for a skill to pass
legacy_scoring = false  # use the old section-length scorer
"#;

        std::fs::write(path, default_content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// 検証オプションに変換
    pub fn validation_options(&self) -> crate::validator::ValidationOptions {
        crate::validator::ValidationOptions {
            pass_threshold: self.validation.pass_threshold,
            include_tokens: true,
            legacy_scoring: self.validation.legacy_scoring,
        }
    }

    /// テンプレート取得元に変換
    pub fn template_store(&self) -> crate::generator::TemplateStore {
        crate::generator::TemplateStore::new(
            self.skills.custom_templates.as_ref().map(PathBuf::from),
        )
    }
}
