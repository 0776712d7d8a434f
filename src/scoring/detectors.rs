//! 品質検出器レジストリ
//!
//! スキル本文・セクション・メタデータに対する12個の構造パターン検出器を、
//! 宣言順固定のレジストリ（名前・配点・優先度・判定関数）として定義する。
//! 配点の合計は100。宣言順は優先度グループ内の提案表示順でもある。
//!
//! 判定は正規表現と行スキャンのみで行い、入力文字列に対して決定的。
//! 正規表現は初回利用時に一度だけコンパイルしてキャッシュする。

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

use crate::parser::SkillDocument;

/// 提案の優先度（表示順: critical → important → nice-to-have）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Priority {
    Critical,
    Important,
    NiceToHave,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Priority::Critical => "critical",
            Priority::Important => "important",
            Priority::NiceToHave => "nice-to-have",
        };
        write!(f, "{}", s)
    }
}

// 検出器ごとの配点（合計100）
const W_IRON_LAW: u8 = 15;
const W_RATIONALIZATIONS: u8 = 15;
const W_RED_FLAGS: u8 = 10;
const W_GOOD_BAD_EXAMPLES: u8 = 10;
const W_VERIFICATION: u8 = 10;
const W_WHEN_TO_USE: u8 = 10;
const W_WHEN_TO_USE_PARTIAL: u8 = 5;
const W_PURPOSE: u8 = 5;
const W_PROCESS: u8 = 5;
const W_REFERENCES: u8 = 5;
const W_TRIGGERS: u8 = 5;
const W_DESCRIPTION: u8 = 5;
const W_INTEGRATION: u8 = 5;

/// 検出器1つ分の定義
pub struct Detector {
    /// 検出器名（breakdownのキー）
    pub name: &'static str,
    /// 満点時の配点
    pub weight: u8,
    /// 未達時に出す提案の優先度
    pub priority: Priority,
    /// 未達時の提案メッセージ
    pub suggestion: &'static str,
    /// 提案に添える実例スニペット
    pub example: Option<&'static str>,
    /// ドキュメントを判定して獲得点を返す（0、部分点、または満点）
    pub check: fn(&SkillDocument) -> u8,
}

/// 宣言順固定の検出器レジストリ
///
/// 先頭5つがcritical、続く4つがimportant、末尾3つがnice-to-have。
pub const DETECTORS: [Detector; 12] = [
    Detector {
        name: "ironLaw",
        weight: W_IRON_LAW,
        priority: Priority::Critical,
        suggestion: "Add an Iron Law - one non-negotiable rule in a fenced all-caps block",
        example: Some("```\nNO TASK IS COMPLETE WITHOUT VERIFICATION\n```"),
        check: check_iron_law,
    },
    Detector {
        name: "rationalizationsTable",
        weight: W_RATIONALIZATIONS,
        priority: Priority::Critical,
        suggestion: "Add a rationalizations table - pair each excuse with the reality that answers it",
        example: Some("| Excuse | Reality |\n|--------|---------|\n| \"It works locally\" | Unverified work is unfinished work |"),
        check: check_rationalizations_table,
    },
    Detector {
        name: "redFlags",
        weight: W_RED_FLAGS,
        priority: Priority::Critical,
        suggestion: "Add a Red Flags section - concrete signals that mean STOP and start over",
        example: Some("## Red Flags\n\n- Output looks right but was never run - STOP and return to Phase 1"),
        check: check_red_flags,
    },
    Detector {
        name: "goodBadExamples",
        weight: W_GOOD_BAD_EXAMPLES,
        priority: Priority::Critical,
        suggestion: "Show a good and a bad example - mark one \u{2705} and one \u{274c} so the contrast is explicit",
        example: Some("\u{2705} **Good**: assert on observable output\n\u{274c} **Bad**: assume it works because it compiled"),
        check: check_good_bad_examples,
    },
    Detector {
        name: "verificationChecklist",
        weight: W_VERIFICATION,
        priority: Priority::Critical,
        suggestion: "Add a verification checklist - unchecked boxes the reader must tick before finishing",
        example: Some("## Verification\n\n- [ ] All tests pass\n- [ ] Output matches the expected result"),
        check: check_verification_checklist,
    },
    Detector {
        name: "whenToUse",
        weight: W_WHEN_TO_USE,
        priority: Priority::Important,
        suggestion: "Structure the When to Use section with bold **Always:** / **Never:** labels and exceptions",
        example: None,
        check: check_when_to_use,
    },
    Detector {
        name: "purpose",
        weight: W_PURPOSE,
        priority: Priority::Important,
        suggestion: "Add a Purpose or Overview section explaining what this skill does",
        example: None,
        check: check_purpose,
    },
    Detector {
        name: "process",
        weight: W_PROCESS,
        priority: Priority::Important,
        suggestion: "Describe the process - numbered Phase or Step headings the reader can follow",
        example: None,
        check: check_process,
    },
    Detector {
        name: "references",
        weight: W_REFERENCES,
        priority: Priority::Important,
        suggestion: "Add a References section linking to supporting documentation",
        example: None,
        check: check_references,
    },
    Detector {
        name: "triggers",
        weight: W_TRIGGERS,
        priority: Priority::NiceToHave,
        suggestion: "Add trigger phrases to the frontmatter for automatic skill matching",
        example: None,
        check: check_triggers,
    },
    Detector {
        name: "descriptionPattern",
        weight: W_DESCRIPTION,
        priority: Priority::NiceToHave,
        suggestion: "Rewrite the description as \"Use when <condition> - <effect>\"",
        example: None,
        check: check_description_pattern,
    },
    Detector {
        name: "integration",
        weight: W_INTEGRATION,
        priority: Priority::NiceToHave,
        suggestion: "Note how this skill composes with others - an Integration section or skill references",
        example: None,
        check: check_integration,
    },
];

/// 初回利用時に一度だけコンパイルする正規表現群
struct CachedPatterns {
    iron_law_phrase: Regex,
    iron_law_heading: Regex,
    rationalization_heading: Regex,
    red_flag_heading: Regex,
    stop_heading: Regex,
    stop_near_restart: Regex,
    means_stop: Regex,
    good_marker: Regex,
    bad_marker: Regex,
    unchecked_box: Regex,
    verification_heading: Regex,
    always_label: Regex,
    never_label: Regex,
    dont_label: Regex,
    exceptions_label: Regex,
    overview_heading: Regex,
    phase_step_heading: Regex,
    methodology_phrase: Regex,
    reference_heading: Regex,
    external_link: Regex,
    description_pattern: Regex,
    integration_heading: Regex,
    required_subskill: Regex,
    complementary_skills: Regex,
    namespaced_skill: Regex,
}

fn patterns() -> &'static CachedPatterns {
    static PATTERNS: OnceLock<CachedPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| CachedPatterns {
        iron_law_phrase: Regex::new(
            r"\b(?:NO|NEVER)\s+\w+[^\n]*?\bWITHOUT\b|\bALWAYS\s+\w+[^\n]*?\bBEFORE\b",
        )
        .expect("valid regex"),
        iron_law_heading: Regex::new(r"(?im)^#{1,3}[ \t]+[^\n]*iron law").expect("valid regex"),
        rationalization_heading: Regex::new(r"(?im)^#{1,3}[ \t]+[^\n]*rationalization")
            .expect("valid regex"),
        red_flag_heading: Regex::new(r"(?im)^#{1,3}[ \t]+[^\n]*red flag").expect("valid regex"),
        stop_heading: Regex::new(r"(?m)^#{1,3}[ \t]+[^\n]*STOP").expect("valid regex"),
        stop_near_restart: Regex::new(
            r"STOP[^\n]*(?i:phase 1|start over)|(?i:phase 1|start over)[^\n]*STOP",
        )
        .expect("valid regex"),
        means_stop: Regex::new(r"(?i:\bmeans?\b)[^\n]*STOP").expect("valid regex"),
        good_marker: Regex::new(r"(?i)<good[-_ ]?example>|\*\*good\b|\u{2705}").expect("valid regex"),
        bad_marker: Regex::new(r"(?i)<bad[-_ ]?example>|\*\*bad\b|\u{274c}").expect("valid regex"),
        unchecked_box: Regex::new(r"(?m)^[ \t]*[-*][ \t]+\[ \]").expect("valid regex"),
        verification_heading: Regex::new(r"(?im)^#{1,3}[ \t]+[^\n]*(?:verification|checklist)")
            .expect("valid regex"),
        always_label: Regex::new(r"(?i)\*\*always:\*\*|\*\*always\*\*:").expect("valid regex"),
        never_label: Regex::new(r"(?i)\*\*never:\*\*|\*\*never\*\*:").expect("valid regex"),
        dont_label: Regex::new(r"(?i)\*\*don'?t:\*\*|\*\*don'?t\*\*:").expect("valid regex"),
        exceptions_label: Regex::new(r"(?i)\*\*exceptions?[^*\n]*:\*\*|\*\*exceptions?[^*\n]*\*\*:")
            .expect("valid regex"),
        overview_heading: Regex::new(r"(?im)^#{1,3}[ \t]+[^\n]*overview").expect("valid regex"),
        phase_step_heading: Regex::new(r"(?im)^#{1,3}[ \t]+[^\n]*(?:phase|step) \d")
            .expect("valid regex"),
        methodology_phrase: Regex::new(
            r"(?i)\bthe\s+[\w-]+(?:\s+[\w-]+){0,2}\s+(?:process|method|methodology)\b",
        )
        .expect("valid regex"),
        reference_heading: Regex::new(r"(?im)^#{1,3}[ \t]+[^\n]*reference").expect("valid regex"),
        external_link: Regex::new(r"\[[^\]\n]*\]\(https?://[^)\n]+\)").expect("valid regex"),
        description_pattern: Regex::new(r"(?i)^use\s+(?:when|for)\s+.+\s+-\s+.+")
            .expect("valid regex"),
        integration_heading: Regex::new(r"(?im)^#{1,3}[ \t]+[^\n]*integration").expect("valid regex"),
        required_subskill: Regex::new(r"REQUIRED[^\n]*SUB-SKILL").expect("valid regex"),
        complementary_skills: Regex::new(r"(?i)complementary skills?").expect("valid regex"),
        namespaced_skill: Regex::new(r"\b[a-z][a-z0-9-]+:[a-z][a-z0-9-]+\b").expect("valid regex"),
    })
}

/// フェンス内が大文字のみ（小文字を含まない）のコードブロックがあるか
fn has_all_caps_fenced_block(body: &str) -> bool {
    let mut in_fence = false;
    let mut block = String::new();

    for line in body.lines() {
        if line.trim_start().starts_with("```") {
            if in_fence {
                if is_shouted(&block) {
                    return true;
                }
                block.clear();
                in_fence = false;
            } else {
                in_fence = true;
            }
            continue;
        }
        if in_fence {
            block.push_str(line);
            block.push('\n');
        }
    }

    false
}

/// 大文字アルファベットを含み、小文字を一切含まないテキストか
fn is_shouted(text: &str) -> bool {
    let has_upper = text.chars().any(|c| c.is_ascii_uppercase());
    let has_lower = text.chars().any(|c| c.is_ascii_lowercase());
    has_upper && !has_lower
}

fn check_iron_law(doc: &SkillDocument) -> u8 {
    let p = patterns();
    if has_all_caps_fenced_block(&doc.body)
        || p.iron_law_phrase.is_match(&doc.body)
        || p.iron_law_heading.is_match(&doc.body)
    {
        W_IRON_LAW
    } else {
        0
    }
}

fn check_rationalizations_table(doc: &SkillDocument) -> u8 {
    // ヘッダー行に両方のカラム語が入ったパイプ区切り行を探す
    let has_table = doc.body.lines().any(|line| {
        let lower = line.to_lowercase();
        lower.contains('|')
            && (lower.contains("excuse") || lower.contains("rationalization"))
            && (lower.contains("reality") || lower.contains("truth"))
    });

    if has_table || patterns().rationalization_heading.is_match(&doc.body) {
        W_RATIONALIZATIONS
    } else {
        0
    }
}

fn check_red_flags(doc: &SkillDocument) -> u8 {
    let p = patterns();
    let body = &doc.body;

    let signals = [
        p.red_flag_heading.is_match(body),
        p.stop_heading.is_match(body),
        p.stop_near_restart.is_match(body),
        body.contains("STOP and"),
        p.means_stop.is_match(body),
    ];

    if signals.iter().filter(|s| **s).count() >= 2 {
        W_RED_FLAGS
    } else {
        0
    }
}

fn check_good_bad_examples(doc: &SkillDocument) -> u8 {
    let p = patterns();
    if p.good_marker.is_match(&doc.body) && p.bad_marker.is_match(&doc.body) {
        W_GOOD_BAD_EXAMPLES
    } else {
        0
    }
}

fn check_verification_checklist(doc: &SkillDocument) -> u8 {
    let p = patterns();
    if p.unchecked_box.is_match(&doc.body) || p.verification_heading.is_match(&doc.body) {
        W_VERIFICATION
    } else {
        0
    }
}

fn check_when_to_use(doc: &SkillDocument) -> u8 {
    let Some(section) = doc.sections.get("whenToUse") else {
        return 0;
    };

    let p = patterns();
    let labels = [
        &p.always_label,
        &p.never_label,
        &p.dont_label,
        &p.exceptions_label,
    ];
    let structured = labels.iter().filter(|re| re.is_match(section)).count();

    if structured >= 2 {
        W_WHEN_TO_USE
    } else {
        W_WHEN_TO_USE_PARTIAL
    }
}

fn check_purpose(doc: &SkillDocument) -> u8 {
    if doc.sections.contains_key("purpose")
        || doc.sections.contains_key("overview")
        || patterns().overview_heading.is_match(&doc.body)
    {
        W_PURPOSE
    } else {
        0
    }
}

fn check_process(doc: &SkillDocument) -> u8 {
    let p = patterns();
    if p.phase_step_heading.is_match(&doc.body) || p.methodology_phrase.is_match(&doc.body) {
        W_PROCESS
    } else {
        0
    }
}

fn check_references(doc: &SkillDocument) -> u8 {
    let p = patterns();
    if doc.sections.contains_key("references")
        || p.reference_heading.is_match(&doc.body)
        || p.external_link.is_match(&doc.body)
    {
        W_REFERENCES
    } else {
        0
    }
}

fn check_triggers(doc: &SkillDocument) -> u8 {
    if doc.metadata.triggers.is_empty() {
        0
    } else {
        W_TRIGGERS
    }
}

fn check_description_pattern(doc: &SkillDocument) -> u8 {
    if patterns()
        .description_pattern
        .is_match(&doc.metadata.description)
    {
        W_DESCRIPTION
    } else {
        0
    }
}

fn check_integration(doc: &SkillDocument) -> u8 {
    let p = patterns();
    if p.integration_heading.is_match(&doc.body)
        || p.required_subskill.is_match(&doc.body)
        || p.complementary_skills.is_match(&doc.body)
        || p.namespaced_skill.is_match(&doc.body)
    {
        W_INTEGRATION
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_with_body(body: &str) -> SkillDocument {
        SkillDocument::parse(body)
    }

    #[test]
    fn test_weights_sum_to_100() {
        let total: u32 = DETECTORS.iter().map(|d| d.weight as u32).sum();
        assert_eq!(total, 100);
    }

    #[test]
    fn test_registry_priorities_grouped_in_declaration_order() {
        let priorities: Vec<Priority> = DETECTORS.iter().map(|d| d.priority).collect();
        let mut sorted = priorities.clone();
        sorted.sort();
        assert_eq!(priorities, sorted);

        let criticals = priorities.iter().filter(|p| **p == Priority::Critical).count();
        let importants = priorities.iter().filter(|p| **p == Priority::Important).count();
        assert_eq!(criticals, 5);
        assert_eq!(importants, 4);
    }

    #[test]
    fn test_iron_law_fenced_all_caps_block() {
        let doc = doc_with_body("intro\n\n```\nNO TASK IS COMPLETE WITHOUT VERIFICATION\n```\n");
        assert_eq!(check_iron_law(&doc), 15);
    }

    #[test]
    fn test_iron_law_lowercase_fence_does_not_count() {
        let doc = doc_with_body("```\nplain code here\n```\n");
        assert_eq!(check_iron_law(&doc), 0);
    }

    #[test]
    fn test_iron_law_phrase_variants() {
        assert_eq!(check_iron_law(&doc_with_body("NEVER MERGE WITHOUT REVIEW")), 15);
        assert_eq!(check_iron_law(&doc_with_body("ALWAYS RUN TESTS BEFORE COMMITTING")), 15);
        assert_eq!(check_iron_law(&doc_with_body("never merge without review")), 0);
    }

    #[test]
    fn test_iron_law_heading() {
        let doc = doc_with_body("## The Iron Law\n\nrule text");
        assert_eq!(check_iron_law(&doc), 15);
    }

    #[test]
    fn test_rationalizations_table_header_row() {
        let doc = doc_with_body("| Excuse | Reality |\n|--------|---------|\n| a | b |\n");
        assert_eq!(check_rationalizations_table(&doc), 15);

        let doc = doc_with_body("| Rationalization | Truth |\n|---|---|\n");
        assert_eq!(check_rationalizations_table(&doc), 15);
    }

    #[test]
    fn test_rationalizations_requires_both_columns() {
        let doc = doc_with_body("| Excuse | Fix |\n|---|---|\n");
        assert_eq!(check_rationalizations_table(&doc), 0);
    }

    #[test]
    fn test_rationalizations_heading() {
        let doc = doc_with_body("## Common Rationalizations\n\ntext");
        assert_eq!(check_rationalizations_table(&doc), 15);
    }

    #[test]
    fn test_red_flags_needs_two_signals() {
        // 見出しのみ = 1シグナル
        let doc = doc_with_body("## Red Flags\n\nsome text");
        assert_eq!(check_red_flags(&doc), 0);

        // 見出し + "STOP and" = 2シグナル
        let doc = doc_with_body("## Red Flags\n\nIf you see this, STOP and reassess.");
        assert_eq!(check_red_flags(&doc), 10);
    }

    #[test]
    fn test_red_flags_stop_near_restart() {
        let doc = doc_with_body("These mean STOP.\n\nSTOP. Return to Phase 1.");
        assert_eq!(check_red_flags(&doc), 10);
    }

    #[test]
    fn test_good_bad_examples_requires_both() {
        let doc = doc_with_body("<good-example>\nx\n</good-example>");
        assert_eq!(check_good_bad_examples(&doc), 0);

        let doc = doc_with_body("<good-example>\nx\n</good-example>\n<bad-example>\ny\n</bad-example>");
        assert_eq!(check_good_bad_examples(&doc), 10);
    }

    #[test]
    fn test_good_bad_examples_emoji_and_bold_variants() {
        let doc = doc_with_body("\u{2705} do this\n\n\u{274c} not this");
        assert_eq!(check_good_bad_examples(&doc), 10);

        let doc = doc_with_body("**Good**: verify first\n\n**Bad**: assume success");
        assert_eq!(check_good_bad_examples(&doc), 10);
    }

    #[test]
    fn test_verification_checklist_checkbox() {
        let doc = doc_with_body("- [ ] run the tests\n- [x] already done");
        assert_eq!(check_verification_checklist(&doc), 10);
    }

    #[test]
    fn test_verification_checklist_heading() {
        let doc = doc_with_body("## Verification\n\nall checked manually");
        assert_eq!(check_verification_checklist(&doc), 10);

        let doc = doc_with_body("## Final Checklist\n\ndone");
        assert_eq!(check_verification_checklist(&doc), 10);
    }

    #[test]
    fn test_when_to_use_graduated() {
        // セクションなし → 0
        let doc = doc_with_body("## Purpose\n\nno when-to-use here");
        assert_eq!(check_when_to_use(&doc), 0);

        // 非構造化 → 5
        let doc = doc_with_body("## When to Use\n\nUse whenever it feels right.");
        assert_eq!(check_when_to_use(&doc), 5);

        // ラベル2種以上 → 10
        let doc = doc_with_body(
            "## When to Use\n\n**Always:** before merging\n\n**Exceptions that apply:** spike branches",
        );
        assert_eq!(check_when_to_use(&doc), 10);
    }

    #[test]
    fn test_when_to_use_single_label_is_partial() {
        let doc = doc_with_body("## When to Use\n\n**Always:** every time");
        assert_eq!(check_when_to_use(&doc), 5);
    }

    #[test]
    fn test_purpose_section_or_overview() {
        assert_eq!(check_purpose(&doc_with_body("## Purpose\n\nx")), 5);
        assert_eq!(check_purpose(&doc_with_body("## Overview\n\nx")), 5);
        assert_eq!(check_purpose(&doc_with_body("# Overview\n\nx")), 5);
        assert_eq!(check_purpose(&doc_with_body("## Misc\n\nx")), 0);
    }

    #[test]
    fn test_process_phase_and_step_headings() {
        assert_eq!(check_process(&doc_with_body("## Phase 1: Investigate\n\nx")), 5);
        assert_eq!(check_process(&doc_with_body("### Step 2 - Apply\n\nx")), 5);
        assert_eq!(check_process(&doc_with_body("Follow the RED-GREEN-REFACTOR process.")), 5);
        assert_eq!(check_process(&doc_with_body("just do it")), 0);
    }

    #[test]
    fn test_references_section_heading_or_link() {
        assert_eq!(check_references(&doc_with_body("## References\n\n- docs")), 5);
        assert_eq!(check_references(&doc_with_body("See [docs](https://example.com).")), 5);
        assert_eq!(check_references(&doc_with_body("no links at all")), 0);
    }

    #[test]
    fn test_triggers_from_metadata() {
        let doc = SkillDocument::parse("---\nname: x\ndescription: y\ntriggers:\n  - when testing\n---\n\nbody");
        assert_eq!(check_triggers(&doc), 5);

        let doc = SkillDocument::parse("---\nname: x\ndescription: y\n---\n\nbody");
        assert_eq!(check_triggers(&doc), 0);
    }

    #[test]
    fn test_description_pattern() {
        let doc = SkillDocument::parse(
            "---\nname: x\ndescription: Use when debugging failing tests - finds root causes\n---\n\nbody",
        );
        assert_eq!(check_description_pattern(&doc), 5);

        let doc = SkillDocument::parse("---\nname: x\ndescription: A skill for debugging\n---\n\nbody");
        assert_eq!(check_description_pattern(&doc), 0);
    }

    #[test]
    fn test_integration_variants() {
        assert_eq!(check_integration(&doc_with_body("## Integration\n\nworks with x")), 5);
        assert_eq!(check_integration(&doc_with_body("REQUIRED BACKGROUND: the verification SUB-SKILL")), 5);
        assert_eq!(check_integration(&doc_with_body("Complementary skills: debugging")), 5);
        assert_eq!(check_integration(&doc_with_body("Run superpowers:test-driven-development first.")), 5);
        assert_eq!(check_integration(&doc_with_body("stands alone")), 0);
    }
}
