//! 旧方式のセクション長ベース採点モジュール
//!
//! パターン検出方式へ移行する前の採点系。セクションの有無と最低文字数
//! だけで加点する。互換のため挙動をそのまま残してあり、`--legacy`
//! フラグか設定で明示的に選んだときだけ使われる。

use serde::Serialize;

use super::score::DetectorScore;
use crate::parser::{Sections, SkillDocument};

const W_PURPOSE: u8 = 10;
const W_WHEN_TO_USE: u8 = 10;
const W_INSTRUCTIONS: u8 = 20;
const W_EXAMPLES: u8 = 20;
const W_ERROR_HANDLING: u8 = 15;
const W_REFERENCES: u8 = 5;
const W_TRIGGERS: u8 = 5;
const W_MCPS: u8 = 5;
const W_TOKEN_EFFICIENCY: u8 = 10;

/// 旧方式のレターグレード
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    /// スコアからグレードを判定
    pub fn from_score(score: u32) -> Self {
        match score {
            90.. => Grade::A,
            80..=89 => Grade::B,
            70..=79 => Grade::C,
            60..=69 => Grade::D,
            _ => Grade::F,
        }
    }

    /// 表示用ラベル
    pub fn label(&self) -> &'static str {
        match self {
            Grade::A => "Excellent",
            Grade::B => "Good",
            Grade::C => "Acceptable",
            Grade::D => "Needs Work",
            Grade::F => "Poor",
        }
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let letter = match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        };
        write!(f, "{letter}")
    }
}

/// 旧方式の採点レポート
#[derive(Debug, Clone, Serialize)]
pub struct LegacyReport {
    /// 合計スコア（0〜100）
    pub score: u32,
    /// 満点
    pub max_score: u32,
    /// レターグレード
    pub grade: Grade,
    /// チェックごとの内訳
    pub breakdown: Vec<DetectorScore>,
    /// 改善提案
    pub suggestions: Vec<String>,
}

/// 旧方式でドキュメントを採点
pub fn score_legacy(doc: &SkillDocument) -> LegacyReport {
    let sections = &doc.sections;
    let mut breakdown = Vec::with_capacity(9);
    let mut push = |name: &'static str, points: u8, max: u8| {
        breakdown.push(DetectorScore { name, points, max });
    };

    push(
        "hasPurpose",
        award(section_longer_than(sections, &["purpose"], 20), W_PURPOSE),
        W_PURPOSE,
    );
    push(
        "hasWhenToUse",
        award(
            section_longer_than(sections, &["whenToUse", "whentouse"], 20),
            W_WHEN_TO_USE,
        ),
        W_WHEN_TO_USE,
    );
    push(
        "hasInstructions",
        award(
            section_longer_than(sections, &["instructions"], 50),
            W_INSTRUCTIONS,
        ),
        W_INSTRUCTIONS,
    );
    push(
        "hasExamples",
        award(section_longer_than(sections, &["examples"], 30), W_EXAMPLES),
        W_EXAMPLES,
    );
    push(
        "hasErrorHandling",
        award(
            section_longer_than(sections, &["errorHandling", "errorhandling"], 20),
            W_ERROR_HANDLING,
        ),
        W_ERROR_HANDLING,
    );
    push(
        "hasReferences",
        award(
            section_longer_than(sections, &["references"], 5),
            W_REFERENCES,
        ),
        W_REFERENCES,
    );
    push(
        "hasTriggers",
        award(!doc.metadata.triggers.is_empty(), W_TRIGGERS),
        W_TRIGGERS,
    );
    push(
        "hasMcps",
        award(!doc.metadata.mcps.is_empty(), W_MCPS),
        W_MCPS,
    );
    push(
        "tokenEfficiency",
        token_efficiency(&doc.body),
        W_TOKEN_EFFICIENCY,
    );

    let score = breakdown.iter().map(|b| u32::from(b.points)).sum();

    LegacyReport {
        score,
        max_score: 100,
        grade: Grade::from_score(score),
        suggestions: build_suggestions(&breakdown),
        breakdown,
    }
}

fn award(hit: bool, weight: u8) -> u8 {
    if hit {
        weight
    } else {
        0
    }
}

fn section_longer_than(sections: &Sections, keys: &[&str], min: usize) -> bool {
    keys.iter()
        .find_map(|key| sections.get(key))
        .is_some_and(|text| text.chars().count() > min)
}

/// 本文の長さで段階加点（短すぎても長すぎても減る）
fn token_efficiency(body: &str) -> u8 {
    match body.chars().count() {
        0..=499 => 3,
        500..=4999 => W_TOKEN_EFFICIENCY,
        5000..=9999 => 5,
        _ => 0,
    }
}

fn build_suggestions(breakdown: &[DetectorScore]) -> Vec<String> {
    let points = |name: &str| {
        breakdown
            .iter()
            .find(|b| b.name == name)
            .map_or(0, |b| b.points)
    };
    let mut suggestions = Vec::new();

    if points("hasPurpose") == 0 {
        suggestions.push("Add a clear Purpose section explaining what this skill does".to_string());
    }
    if points("hasWhenToUse") == 0 {
        suggestions.push("Add a \"When to Use\" section with trigger conditions".to_string());
    }
    if points("hasInstructions") == 0 {
        suggestions.push("Add detailed Instructions with step-by-step guidance".to_string());
    }
    if points("hasExamples") == 0 {
        suggestions.push("Add Examples showing expected input/output behavior".to_string());
    }
    if points("hasErrorHandling") == 0 {
        suggestions.push("Add Error Handling section for common issues".to_string());
    }
    if points("hasReferences") == 0 {
        suggestions.push("Consider adding References to relevant documentation".to_string());
    }
    if points("hasTriggers") == 0 {
        suggestions.push("Add trigger phrases to frontmatter".to_string());
    }
    if points("hasMcps") == 0 {
        suggestions.push("Specify required/optional MCP servers in frontmatter".to_string());
    }
    let efficiency = points("tokenEfficiency");
    if efficiency < 5 {
        suggestions
            .push("Skill content may be too long - consider splitting or summarizing".to_string());
    }
    if efficiency == 3 {
        suggestions.push("Skill content is very short - add more detail".to_string());
    }

    suggestions
}
