//! サブコマンド実装
//!
//! 各サブコマンドの処理本体。ストレージと検証サービスを組み合わせて、
//! 結果をoutputモジュール経由で表示する。

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use crossterm::style::Color;

use crate::cli::output::{self, Icons};
use crate::config::Config;
use crate::generator::{self, GenerateOptions};
use crate::scoring::Priority;
use crate::storage::SkillStore;
use crate::validator::{self, QualityReport, ValidationReport};

/// ベースディレクトリと設定からスキル保存先を決める
fn open_store(config: &Config, dir: Option<&Path>) -> Result<SkillStore> {
    let base = match dir {
        Some(d) => d.to_path_buf(),
        None => std::env::current_dir().context("Failed to resolve current directory")?,
    };
    Ok(SkillStore::resolve(&base, &config.skills.dir))
}

/// `new`: テンプレートから新しいスキルを生成
pub async fn new_skill(
    config: &Config,
    name: &str,
    template: &str,
    description: Option<String>,
    dir: Option<&Path>,
    force: bool,
) -> Result<()> {
    let store = open_store(config, dir)?;
    let templates = config.template_store();

    if !templates.exists(template) {
        let available = templates.list().await?;
        bail!(
            "Unknown template: {}. Available: {}",
            template,
            available.join(", ")
        );
    }

    let description = description.unwrap_or_else(|| format!("{} skill", name));

    let generated = generator::generate(
        &store,
        &templates,
        GenerateOptions {
            name: name.to_string(),
            description,
            template: template.to_string(),
            template_data: HashMap::new(),
            force,
        },
    )
    .await?;

    println!();
    output::print_success(&format!("Skill created: {}", generated.path.display()));
    output::print_colored(
        &format!("\nRun: skill-forge validate {}", generated.name),
        Color::Yellow,
    );
    Ok(())
}

/// `list`: 保存済みスキルの一覧を表示
pub async fn list_skills(config: &Config, dir: Option<&Path>) -> Result<()> {
    let store = open_store(config, dir)?;

    output::print_header("Installed Skills");
    output::print_key_value("Directory", &store.skills_dir().display().to_string());
    println!();

    let names = store.list()?;

    if names.is_empty() {
        output::print_info("No skills found");
        println!();
        output::print_hint("Create your first skill with: skill-forge new <name>");
        return Ok(());
    }

    for name in &names {
        match generator::skill_info(&store, name).await {
            Ok(Some(info)) => {
                output::print_title(name);
                if !info.metadata.description.is_empty() {
                    output::print_hint(&format!("  {}", info.metadata.description));
                }
                if let Some(version) = &info.metadata.version {
                    output::print_hint(&format!("  v{}", version));
                }
                if !info.metadata.mcps.required.is_empty() {
                    output::print_hint(&format!(
                        "  MCPs: {}",
                        info.metadata.mcps.required.join(", ")
                    ));
                }
            }
            Ok(None) => output::print_title(name),
            // 1件壊れていても一覧は続行する
            Err(e) => {
                output::print_title(name);
                output::print_colored(&format!("  Error reading skill: {}", e), Color::Red);
            }
        }
        println!();
    }

    output::print_info(&format!("{} skill(s) found", names.len()));
    Ok(())
}

/// `validate`: スキルを検証して品質レポートを表示
///
/// 引数はスキル名でも`SKILL.md`へのパスでもよい。戻り値は検証を
/// 通過したかどうかで、呼び出し側が終了コードに変換する。
pub async fn validate_skill(
    config: &Config,
    target: &str,
    dir: Option<&Path>,
    verbose: bool,
    json: bool,
    legacy: bool,
) -> Result<bool> {
    let store = open_store(config, dir)?;

    let from_path = target.ends_with(".md") || Path::new(target).is_file();
    let content = if from_path {
        let path = Path::new(target);
        tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read skill file: {}", path.display()))?
    } else {
        if !store.exists(target) {
            bail!("Skill \"{}\" not found", target);
        }
        store.read(target).await?
    };

    let mut options = config.validation_options();
    if legacy {
        options.legacy_scoring = true;
    }

    let report = validator::validate(&content, &options);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        render_report(target, &report, verbose);
    }

    Ok(report.valid)
}

/// `export`: スキルのSKILL.mdを指定先へ書き出す
pub async fn export_skill(
    config: &Config,
    name: &str,
    output_path: Option<PathBuf>,
    dir: Option<&Path>,
) -> Result<()> {
    let store = open_store(config, dir)?;

    if !store.exists(name) {
        bail!("Skill \"{}\" not found", name);
    }

    output::print_header(&format!("Export: {}", name));
    println!();

    // 出力先が.mdでなければディレクトリ扱いでファイル名を補う
    let dest = match output_path {
        Some(path) if path.extension().map_or(false, |e| e == "md") => path,
        Some(path) => path.join(format!("{}.md", name)),
        None => PathBuf::from(format!("{}.md", name)),
    };

    store.export_to(name, &dest).await?;

    let metadata = tokio::fs::metadata(&dest)
        .await
        .with_context(|| format!("Failed to read exported file: {}", dest.display()))?;
    let size_kb = ((metadata.len() as f64) / 1024.0).round() as u64;

    println!();
    output::print_success(&format!("Exported: {}", dest.display()));
    output::print_key_value("Size", &format!("{} KB", size_kb));
    Ok(())
}

/// 検証レポートを表示
fn render_report(target: &str, report: &ValidationReport, verbose: bool) {
    output::print_header(&format!("Validating: {}", target));

    output::print_subheader("Schema Validation");
    if report.schema.valid {
        output::print_success("Schema valid");
    } else {
        output::print_error("Schema invalid");
        for error in &report.schema.errors {
            output::print_colored(&format!("  {} {}", Icons::bullet(), error), Color::Red);
        }
    }

    output::print_subheader("Quality Score");
    let label = match &report.quality {
        QualityReport::Pattern(r) => r.tier.label().to_string(),
        QualityReport::Legacy(r) => format!("{} - {}", r.grade, r.grade.label()),
    };
    output::print_score_line(report.quality.score(), 100, &label);

    if verbose {
        render_breakdown(&report.quality);
    }

    if let Some(tokens) = &report.tokens {
        output::print_subheader("Token Analysis");
        output::print_token_count(tokens.count, tokens.within_recommended);
        println!("  {}", tokens.recommendation);
        if let Some(disclosure) = &report.progressive_disclosure {
            if !tokens.within_recommended && !disclosure.uses_progressive_disclosure {
                output::print_hint(
                    "  No progressive disclosure detected (references section, links, or collapsible blocks)",
                );
            }
        }
    }

    render_suggestions(&report.quality, verbose);

    println!();
    if report.valid && report.quality.score() >= 70 {
        output::print_success("Skill passed validation");
    } else if report.valid {
        output::print_warn("Skill is valid but could be improved");
    } else {
        output::print_error("Skill failed validation");
    }
}

/// 採点内訳を表示
fn render_breakdown(quality: &QualityReport) {
    println!();
    output::print_hint("  Breakdown:");
    let entries = match quality {
        QualityReport::Pattern(r) => &r.breakdown,
        QualityReport::Legacy(r) => &r.breakdown,
    };
    for entry in entries {
        let (icon, color) = if entry.points == entry.max {
            (Icons::success(), Color::Green)
        } else if entry.points > 0 {
            (Icons::partial(), Color::Yellow)
        } else {
            (Icons::error(), Color::Red)
        };
        output::print_check_line(
            icon,
            color,
            &format!("{}: {}/{}", display_name(entry.name), entry.points, entry.max),
        );
    }
}

/// 改善提案を表示（パターン方式は優先度ごとに色分け）
fn render_suggestions(quality: &QualityReport, verbose: bool) {
    match quality {
        QualityReport::Pattern(report) => {
            if report.suggestions.is_empty() {
                return;
            }
            output::print_subheader("Suggestions");
            for suggestion in &report.suggestions {
                output::print_colored(
                    &format!(
                        "  {} [{}] {}",
                        Icons::bullet(),
                        suggestion.priority,
                        suggestion.message
                    ),
                    priority_color(suggestion.priority),
                );
                if verbose {
                    if let Some(example) = &suggestion.example {
                        for line in example.lines() {
                            output::print_hint(&format!("      {}", line));
                        }
                    }
                }
            }
        }
        QualityReport::Legacy(report) => {
            if report.suggestions.is_empty() {
                return;
            }
            output::print_subheader("Suggestions");
            for suggestion in &report.suggestions {
                output::print_list_item(suggestion, 1);
            }
        }
    }
}

/// 優先度の表示色
fn priority_color(priority: Priority) -> Color {
    match priority {
        Priority::Critical => Color::Red,
        Priority::Important => Color::Yellow,
        Priority::NiceToHave => Color::DarkGrey,
    }
}

/// 内訳キーを表示用ラベルに変換（camelCase分割 + has接頭辞除去）
fn display_name(name: &str) -> String {
    let mut spaced = String::with_capacity(name.len() + 4);
    for ch in name.chars() {
        if ch.is_ascii_uppercase() && !spaced.is_empty() {
            spaced.push(' ');
        }
        spaced.push(ch);
    }
    let spaced = spaced
        .strip_prefix("has ")
        .map(str::to_string)
        .unwrap_or(spaced);
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) if first.is_ascii_lowercase() => {
            let mut label = String::with_capacity(spaced.len());
            label.push(first.to_ascii_uppercase());
            label.push_str(chars.as_str());
            label
        }
        _ => spaced,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_display_name_transforms() {
        assert_eq!(display_name("ironLaw"), "Iron Law");
        assert_eq!(display_name("hasWhenToUse"), "When To Use");
        assert_eq!(display_name("tokenEfficiency"), "Token Efficiency");
        assert_eq!(display_name("purpose"), "Purpose");
        assert_eq!(display_name("goodBadExamples"), "Good Bad Examples");
    }

    #[test]
    fn test_priority_colors() {
        assert_eq!(priority_color(Priority::Critical), Color::Red);
        assert_eq!(priority_color(Priority::Important), Color::Yellow);
        assert_eq!(priority_color(Priority::NiceToHave), Color::DarkGrey);
    }

    #[tokio::test]
    async fn test_new_then_validate_round_trip() {
        let temp = TempDir::new().unwrap();
        let config = Config::default();

        new_skill(
            &config,
            "flaky-test-debugging",
            "debugging",
            Some("Use when debugging flaky tests - guides root cause analysis".to_string()),
            Some(temp.path()),
            false,
        )
        .await
        .unwrap();

        let ok = validate_skill(
            &config,
            "flaky-test-debugging",
            Some(temp.path()),
            false,
            true,
            false,
        )
        .await
        .unwrap();
        assert!(ok);
    }

    #[tokio::test]
    async fn test_new_rejects_unknown_template() {
        let temp = TempDir::new().unwrap();
        let config = Config::default();

        let err = new_skill(&config, "x", "nonexistent", None, Some(temp.path()), false)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Unknown template"));
    }

    #[tokio::test]
    async fn test_validate_missing_skill_fails() {
        let temp = TempDir::new().unwrap();
        let config = Config::default();

        let err = validate_skill(&config, "ghost", Some(temp.path()), false, false, false)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[tokio::test]
    async fn test_validate_accepts_md_path() {
        let temp = TempDir::new().unwrap();
        let config = Config::default();
        let path = temp.path().join("SKILL.md");
        tokio::fs::write(&path, "---\nname: x\ndescription: y\n---\n\n## Purpose\n\nz\n")
            .await
            .unwrap();

        // パス指定でも採点される（しきい値未満なので不合格）
        let ok = validate_skill(
            &config,
            path.to_str().unwrap(),
            Some(temp.path()),
            false,
            true,
            false,
        )
        .await
        .unwrap();
        assert!(!ok);
    }

    #[tokio::test]
    async fn test_export_writes_file() {
        let temp = TempDir::new().unwrap();
        let config = Config::default();

        new_skill(
            &config,
            "exportable",
            "basic",
            Some("A test skill".to_string()),
            Some(temp.path()),
            false,
        )
        .await
        .unwrap();

        let dest = temp.path().join("out").join("exportable.md");
        export_skill(&config, "exportable", Some(dest.clone()), Some(temp.path()))
            .await
            .unwrap();
        assert!(dest.exists());
    }

    #[tokio::test]
    async fn test_export_missing_skill_fails() {
        let temp = TempDir::new().unwrap();
        let config = Config::default();

        let err = export_skill(&config, "ghost", None, Some(temp.path()))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[tokio::test]
    async fn test_list_runs_on_empty_dir() {
        let temp = TempDir::new().unwrap();
        let config = Config::default();
        list_skills(&config, Some(temp.path())).await.unwrap();
    }
}
