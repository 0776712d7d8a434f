//! 品質スコアリングモジュール
//!
//! 12個の固定パターン検出器でスキルドキュメントを採点する。配点の合計は
//! 100で、スコア帯からティアを判定し、足りない要素を優先度順の改善提案
//! として返す。トークン量チェックと旧方式の採点も同居する。

pub mod detectors;
pub mod legacy;
pub mod score;
pub mod tokens;

pub use detectors::{Detector, Priority, DETECTORS};
pub use legacy::{score_legacy, Grade, LegacyReport};
pub use score::{score, DetectorScore, ScoreReport, Suggestion, Tier};
pub use tokens::{
    check_progressive_disclosure, check_token_limits, estimate_tokens, DisclosureReport, SizeBand,
    TokenReport,
};
