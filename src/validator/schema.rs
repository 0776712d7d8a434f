//! frontmatterの必須フィールドチェック

use serde::Serialize;

use crate::parser::SkillMetadata;

/// スキーマチェックの結果
#[derive(Debug, Clone, Serialize)]
pub struct SchemaReport {
    /// 必須フィールドが揃っているか
    pub valid: bool,
    /// 不足フィールドごとのエラーメッセージ
    pub errors: Vec<String>,
}

/// メタデータの必須フィールドを検査
///
/// `name`と`description`が空でないことだけを要求する。未知のキーは
/// いくつあっても失敗にはしない。
pub fn check(metadata: &SkillMetadata) -> SchemaReport {
    let mut errors = Vec::new();

    if metadata.name.trim().is_empty() {
        errors.push("Missing required field: name".to_string());
    }
    if metadata.description.trim().is_empty() {
        errors.push("Missing required field: description".to_string());
    }

    SchemaReport {
        valid: errors.is_empty(),
        errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::SkillDocument;

    #[test]
    fn test_complete_metadata_passes() {
        let doc = SkillDocument::parse("---\nname: my-skill\ndescription: Does things\n---\nBody");
        let report = check(&doc.metadata);

        assert!(report.valid);
        assert!(report.errors.is_empty());
    }

    #[test]
    fn test_missing_name_fails() {
        let doc = SkillDocument::parse("---\ndescription: Does things\n---\nBody");
        let report = check(&doc.metadata);

        assert!(!report.valid);
        assert_eq!(report.errors, vec!["Missing required field: name"]);
    }

    #[test]
    fn test_missing_both_reports_both() {
        let report = check(&SkillMetadata::default());

        assert_eq!(
            report.errors,
            vec![
                "Missing required field: name",
                "Missing required field: description",
            ]
        );
    }

    #[test]
    fn test_whitespace_name_counts_as_missing() {
        let doc = SkillDocument::parse("---\nname: \"   \"\ndescription: ok\n---\nBody");
        let report = check(&doc.metadata);

        assert!(!report.valid);
    }

    #[test]
    fn test_extra_fields_never_fail() {
        let doc = SkillDocument::parse(
            "---\nname: s\ndescription: d\ncustom_key: anything\nanother: [1, 2]\n---\nBody",
        );

        assert!(check(&doc.metadata).valid);
    }
}
