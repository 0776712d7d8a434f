//! skill-forge: スキルドキュメント生成・検証CLI
//!
//! SKILL.md形式のスキルドキュメントをテンプレートから生成し、
//! パターン検出ベースの品質スコアリングとスキーマ検証で採点する。

pub mod cli;
pub mod config;
pub mod generator;
pub mod parser;
pub mod scoring;
pub mod storage;
pub mod validator;

// 主要な型の再エクスポート
pub use config::{Config, SkillsConfig, ValidationConfig};
pub use generator::{GenerateOptions, GeneratedSkill, SkillInfo, TemplateStore};
pub use parser::{McpRequirements, Sections, SkillDocument, SkillMetadata};
pub use scoring::{
    score, score_legacy, Detector, DetectorScore, Grade, LegacyReport, Priority, ScoreReport,
    Suggestion, Tier, TokenReport,
};
pub use storage::SkillStore;
pub use validator::{
    quick_validate, validate, QualityReport, SchemaReport, ValidationOptions, ValidationReport,
};

/// バージョン情報
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
