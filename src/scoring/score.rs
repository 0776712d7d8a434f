//! スコアリングエンジン本体
//!
//! 検出器レジストリをドキュメントに適用し、合計スコア・内訳・ティア・
//! 優先度順の改善提案をまとめたレポートを生成する。純関数であり、
//! 同じドキュメントに対して常に同一のレポートを返す。

use serde::Serialize;
use std::fmt;

use super::detectors::{Priority, DETECTORS};
use crate::parser::SkillDocument;

/// 品質ティア（スコア帯による分類）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tier {
    WorldClass,
    ProductionReady,
    NeedsEnhancement,
    Draft,
    Incomplete,
}

impl Tier {
    /// スコアからティアを決定
    ///
    /// 境界値: 85以上world-class、70-84production-ready、
    /// 55-69needs-enhancement、40-54draft、40未満incomplete。
    pub fn from_score(score: u32) -> Self {
        match score {
            85.. => Tier::WorldClass,
            70..=84 => Tier::ProductionReady,
            55..=69 => Tier::NeedsEnhancement,
            40..=54 => Tier::Draft,
            _ => Tier::Incomplete,
        }
    }

    /// 表示用ラベル
    pub fn label(&self) -> &'static str {
        match self {
            Tier::WorldClass => "World-Class",
            Tier::ProductionReady => "Production Ready",
            Tier::NeedsEnhancement => "Needs Enhancement",
            Tier::Draft => "Draft",
            Tier::Incomplete => "Incomplete",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// 検出器1件の獲得点
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetectorScore {
    /// 検出器名
    pub name: &'static str,
    /// 獲得点
    pub points: u8,
    /// 満点
    pub max: u8,
}

/// 改善提案
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    /// 優先度
    pub priority: Priority,
    /// 提案メッセージ
    pub message: String,
    /// 実例スニペット（criticalの検出器のみ）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
}

/// スコアレポート
///
/// 採点のたびに新規生成され、以後不変。元ドキュメントへの参照は持たない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreReport {
    /// 合計スコア（0-100）
    pub score: u32,
    /// ティア
    pub tier: Tier,
    /// 検出器ごとの内訳（レジストリ宣言順）
    pub breakdown: Vec<DetectorScore>,
    /// 優先度順の改善提案
    pub suggestions: Vec<Suggestion>,
}

impl ScoreReport {
    /// 検出器名で獲得点を引く
    pub fn points(&self, name: &str) -> Option<u8> {
        self.breakdown
            .iter()
            .find(|d| d.name == name)
            .map(|d| d.points)
    }

    /// critical優先度の未達提案のみ
    pub fn critical_missing(&self) -> Vec<&Suggestion> {
        self.suggestions
            .iter()
            .filter(|s| s.priority == Priority::Critical)
            .collect()
    }
}

/// ドキュメントを採点してレポートを生成
pub fn score(doc: &SkillDocument) -> ScoreReport {
    let mut breakdown = Vec::with_capacity(DETECTORS.len());
    let mut total: u32 = 0;

    for detector in DETECTORS.iter() {
        let points = (detector.check)(doc);
        total += u32::from(points);
        breakdown.push(DetectorScore {
            name: detector.name,
            points,
            max: detector.weight,
        });
    }

    let suggestions = build_suggestions(&breakdown);

    ScoreReport {
        score: total,
        tier: Tier::from_score(total),
        breakdown,
        suggestions,
    }
}

/// 未達検出器ごとの提案を生成
///
/// critical → important → nice-to-have の順、各グループ内は
/// レジストリの宣言順を保つ。
fn build_suggestions(breakdown: &[DetectorScore]) -> Vec<Suggestion> {
    let mut suggestions = Vec::new();

    for priority in [Priority::Critical, Priority::Important, Priority::NiceToHave] {
        for (detector, scored) in DETECTORS.iter().zip(breakdown) {
            if detector.priority == priority && scored.points < detector.weight {
                suggestions.push(Suggestion {
                    priority: detector.priority,
                    message: detector.suggestion.to_string(),
                    example: detector.example.map(str::to_string),
                });
            }
        }
    }

    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL_SKILL: &str = r#"---
name: minimal
description: Minimal skill
---

# Minimal

Short content.
"#;

    const COMPLETE_SKILL: &str = r#"---
name: full-skill
description: Use when shipping changes - verifies completeness first
triggers:
  - before shipping
---

# full-skill

## Overview

Checks everything before you call work done.

## The Iron Law

```
NO TASK IS COMPLETE WITHOUT VERIFICATION
```

## When to Use

**Always:** before declaring any task complete
**Never:** skip it because the change felt small

## Phase 1: Verify

Run every check the task defines.

## Rationalizations

| Excuse | Reality |
|--------|---------|
| "It compiled" | Compiling is not passing |

## Red Flags

If the results were never run, STOP and return to Phase 1.

## Examples

✅ **Good**: run the suite and read the output
❌ **Bad**: assume green because it looked fine

## Verification

- [ ] Tests pass
- [ ] Behavior matches the request

## Integration

Pairs with superpowers:test-driven-development.

## References

- [Verification guide](https://example.com/verify)
"#;

    #[test]
    fn test_score_bounds() {
        let inputs = ["", "no structure at all", MINIMAL_SKILL, COMPLETE_SKILL];
        for input in inputs {
            let report = score(&SkillDocument::parse(input));
            assert!(report.score <= 100, "score {} out of range", report.score);
        }
    }

    #[test]
    fn test_score_is_deterministic() {
        let doc = SkillDocument::parse(COMPLETE_SKILL);
        let first = score(&doc);
        let second = score(&doc);

        assert_eq!(first, second);
    }

    #[test]
    fn test_iron_law_monotonicity() {
        let base = SkillDocument::parse("just some plain text");
        let with_law = SkillDocument::parse("just some plain text\n\n```\nALL CAPS RULE\n```\n");

        let before = score(&base);
        let after = score(&with_law);

        assert_eq!(before.points("ironLaw"), Some(0));
        assert_eq!(after.points("ironLaw"), Some(15));
        for entry in &before.breakdown {
            if entry.name != "ironLaw" {
                assert!(
                    after.points(entry.name).unwrap() >= entry.points,
                    "{} decreased",
                    entry.name
                );
            }
        }
    }

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(Tier::from_score(100), Tier::WorldClass);
        assert_eq!(Tier::from_score(85), Tier::WorldClass);
        assert_eq!(Tier::from_score(84), Tier::ProductionReady);
        assert_eq!(Tier::from_score(70), Tier::ProductionReady);
        assert_eq!(Tier::from_score(69), Tier::NeedsEnhancement);
        assert_eq!(Tier::from_score(55), Tier::NeedsEnhancement);
        assert_eq!(Tier::from_score(54), Tier::Draft);
        assert_eq!(Tier::from_score(40), Tier::Draft);
        assert_eq!(Tier::from_score(39), Tier::Incomplete);
        assert_eq!(Tier::from_score(0), Tier::Incomplete);
    }

    #[test]
    fn test_tier_labels() {
        assert_eq!(Tier::WorldClass.label(), "World-Class");
        assert_eq!(Tier::ProductionReady.label(), "Production Ready");
        assert_eq!(Tier::Incomplete.label(), "Incomplete");
    }

    #[test]
    fn test_minimal_skill_scores_incomplete() {
        let report = score(&SkillDocument::parse(MINIMAL_SKILL));

        assert!(report.score < 30, "expected < 30, got {}", report.score);
        assert_eq!(report.tier, Tier::Incomplete);
        for entry in &report.breakdown {
            assert_eq!(entry.points, 0, "{} unexpectedly scored", entry.name);
        }
    }

    #[test]
    fn test_complete_skill_scores_100() {
        let report = score(&SkillDocument::parse(COMPLETE_SKILL));

        assert_eq!(report.score, 100, "breakdown: {:?}", report.breakdown);
        assert_eq!(report.tier, Tier::WorldClass);
        assert!(report.suggestions.is_empty());
    }

    #[test]
    fn test_unstructured_when_to_use_scores_partial() {
        let doc = SkillDocument::parse("## When to Use\n\nUse it whenever you like.\n");
        let report = score(&doc);

        assert_eq!(report.points("whenToUse"), Some(5));
    }

    #[test]
    fn test_suggestions_ordered_by_priority() {
        let report = score(&SkillDocument::parse("nothing here"));

        assert_eq!(report.suggestions.len(), DETECTORS.len());
        for pair in report.suggestions.windows(2) {
            assert!(
                pair[0].priority <= pair[1].priority,
                "priority order violated: {:?} before {:?}",
                pair[0].priority,
                pair[1].priority
            );
        }
    }

    #[test]
    fn test_suggestions_keep_declaration_order_within_group() {
        let report = score(&SkillDocument::parse(""));
        let messages: Vec<&str> = report
            .suggestions
            .iter()
            .map(|s| s.message.as_str())
            .collect();

        let expected: Vec<&str> = DETECTORS.iter().map(|d| d.suggestion).collect();
        assert_eq!(messages, expected);
    }

    #[test]
    fn test_breakdown_follows_registry_order() {
        let report = score(&SkillDocument::parse(""));
        let names: Vec<&str> = report.breakdown.iter().map(|d| d.name).collect();
        let expected: Vec<&str> = DETECTORS.iter().map(|d| d.name).collect();

        assert_eq!(names, expected);
    }

    #[test]
    fn test_critical_missing_subset() {
        let report = score(&SkillDocument::parse(MINIMAL_SKILL));
        let critical = report.critical_missing();

        assert_eq!(critical.len(), 5);
        assert!(critical.iter().all(|s| s.priority == Priority::Critical));
        assert!(critical.iter().all(|s| s.example.is_some()));
    }

    #[test]
    fn test_partial_when_to_use_still_suggests() {
        let doc = SkillDocument::parse("## When to Use\n\nplain prose\n");
        let report = score(&doc);

        assert!(report
            .suggestions
            .iter()
            .any(|s| s.message.contains("When to Use")));
    }

    #[test]
    fn test_exact_85_from_detectors() {
        // critical5種 + whenToUse構造化 + purpose + process + references = 85
        let text = r#"---
name: boundary
description: plain words
---

## The Iron Law

NEVER SHIP WITHOUT TESTS

## Rationalizations

| Excuse | Truth |
|---|---|

## Red Flags

Seeing stale output means STOP. STOP and start over.

## Examples

✅ **Good**: check
❌ **Bad**: guess

## Verification

- [ ] checked

## When to Use

**Always:** on merges
**Never:** on prototypes

## Overview

Boundary fixture.

## Phase 1: Run

Do it.

## References

[docs](https://example.com)
"#;
        let report = score(&SkillDocument::parse(text));

        assert_eq!(report.score, 85, "breakdown: {:?}", report.breakdown);
        assert_eq!(report.tier, Tier::WorldClass);
    }
}
