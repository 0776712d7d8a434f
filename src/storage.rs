//! スキルの保存レイアウト管理
//!
//! スキルは`<skills_dir>/<名前>/SKILL.md`の形で1ディレクトリ1スキルで
//! 保存する。保存先は`SKILLS_DIR`環境変数、なければ設定値で決まる。

use anyhow::{Context, Result};
use glob::glob as glob_pattern;
use std::path::{Path, PathBuf};
use tokio::fs;

/// 既定の保存先（ベースディレクトリからの相対パス）
pub const DEFAULT_SKILLS_DIR: &str = ".claude/skills";
/// スキル本体のファイル名
pub const SKILL_FILE_NAME: &str = "SKILL.md";
/// 保存先を上書きする環境変数
pub const SKILLS_DIR_ENV: &str = "SKILLS_DIR";

/// グローバルのスキルディレクトリ（~/.claude/skills）
pub fn global_skills_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".claude").join("skills"))
}

/// スキル保存ディレクトリへの操作をまとめたストア
#[derive(Debug, Clone)]
pub struct SkillStore {
    skills_dir: PathBuf,
}

impl SkillStore {
    /// 保存先を直接指定して作成
    pub fn new(skills_dir: PathBuf) -> Self {
        Self { skills_dir }
    }

    /// 環境変数と設定から保存先を解決
    ///
    /// `SKILLS_DIR`があればそれを、なければ設定値を使う。相対パスは
    /// ベースディレクトリに連結する。
    pub fn resolve(base_dir: &Path, configured: &str) -> Self {
        let dir = std::env::var(SKILLS_DIR_ENV).unwrap_or_else(|_| configured.to_string());
        Self::from_dir(base_dir, &dir)
    }

    fn from_dir(base_dir: &Path, dir: &str) -> Self {
        let path = PathBuf::from(dir);
        let skills_dir = if path.is_absolute() {
            path
        } else {
            base_dir.join(path)
        };
        Self { skills_dir }
    }

    /// 保存先ディレクトリ
    pub fn skills_dir(&self) -> &Path {
        &self.skills_dir
    }

    /// スキルのディレクトリパス
    pub fn skill_dir(&self, name: &str) -> PathBuf {
        self.skills_dir.join(name)
    }

    /// SKILL.mdのパス
    pub fn skill_file(&self, name: &str) -> PathBuf {
        self.skill_dir(name).join(SKILL_FILE_NAME)
    }

    /// スキルが存在するか
    pub fn exists(&self, name: &str) -> bool {
        self.skill_file(name).exists()
    }

    /// 保存済みスキル名の一覧（ソート済み）
    pub fn list(&self) -> Result<Vec<String>> {
        if !self.skills_dir.exists() {
            return Ok(Vec::new());
        }

        let pattern = self.skills_dir.join("*").join(SKILL_FILE_NAME);
        let pattern = pattern.to_string_lossy().into_owned();

        let mut names = Vec::new();
        for entry in glob_pattern(&pattern)?.flatten() {
            if let Some(name) = entry
                .parent()
                .and_then(|dir| dir.file_name())
                .and_then(|name| name.to_str())
            {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    /// SKILL.mdを読み込み
    pub async fn read(&self, name: &str) -> Result<String> {
        let path = self.skill_file(name);
        fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read skill file: {}", path.display()))
    }

    /// SKILL.mdを書き込み（ディレクトリがなければ作る）
    pub async fn write(&self, name: &str, content: &str) -> Result<PathBuf> {
        let dir = self.skill_dir(name);
        fs::create_dir_all(&dir)
            .await
            .with_context(|| format!("Failed to create skill directory: {}", dir.display()))?;

        let file = self.skill_file(name);
        fs::write(&file, content)
            .await
            .with_context(|| format!("Failed to write skill file: {}", file.display()))?;
        Ok(file)
    }

    /// スキルの足場ディレクトリを作成
    ///
    /// SKILL.mdの隣に`scripts/`、`resources/examples/`、
    /// `resources/transcripts/`を用意する。
    pub async fn create_structure(&self, name: &str) -> Result<PathBuf> {
        let dir = self.skill_dir(name);
        fs::create_dir_all(dir.join("scripts")).await?;
        fs::create_dir_all(dir.join("resources").join("examples")).await?;
        fs::create_dir_all(dir.join("resources").join("transcripts")).await?;
        Ok(dir)
    }

    /// スキルをディレクトリごと削除
    pub async fn delete(&self, name: &str) -> Result<()> {
        let dir = self.skill_dir(name);
        fs::remove_dir_all(&dir)
            .await
            .with_context(|| format!("Failed to delete skill: {}", dir.display()))
    }

    /// スキルを別名で複製
    pub async fn copy(&self, name: &str, new_name: &str) -> Result<PathBuf> {
        let content = self.read(name).await?;
        self.write(new_name, &content).await
    }

    /// SKILL.mdを指定先へ書き出し
    pub async fn export_to(&self, name: &str, dest: &Path) -> Result<()> {
        if let Some(parent) = dest.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await.with_context(|| {
                    format!("Failed to create output directory: {}", parent.display())
                })?;
            }
        }
        let source = self.skill_file(name);
        fs::copy(&source, dest)
            .await
            .with_context(|| format!("Failed to export skill to: {}", dest.display()))?;
        Ok(())
    }
}
