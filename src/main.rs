use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use skill_forge::{
    cli::{commands, print_error},
    config::Config,
};

#[derive(Parser, Debug)]
#[command(name = "skill-forge")]
#[command(about = "スキルドキュメントの生成・検証・品質スコアリングCLI")]
#[command(version)]
struct Args {
    /// 設定ファイルパス
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 詳細ログを表示 (INFO level)
    #[arg(long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// テンプレートから新しいスキルを生成
    New {
        /// スキル名（ディレクトリ名になる）
        name: String,

        /// 使用するテンプレート
        #[arg(short, long, default_value = "basic")]
        template: String,

        /// frontmatterに入る説明文
        #[arg(short, long)]
        description: Option<String>,

        /// スキル保存先のベースディレクトリ
        #[arg(long)]
        dir: Option<PathBuf>,

        /// 既存スキルを上書き
        #[arg(long)]
        force: bool,
    },
    /// 保存済みスキルを一覧表示
    List {
        /// スキル保存先のベースディレクトリ
        #[arg(long)]
        dir: Option<PathBuf>,
    },
    /// スキルを検証して品質スコアを表示
    Validate {
        /// スキル名またはSKILL.mdへのパス
        name: String,

        /// スキル保存先のベースディレクトリ
        #[arg(long)]
        dir: Option<PathBuf>,

        /// 採点内訳と提案の例文も表示
        #[arg(short, long)]
        verbose: bool,

        /// レポートをJSONで出力
        #[arg(long)]
        json: bool,

        /// セクション長ベースの旧方式で採点
        #[arg(long)]
        legacy: bool,
    },
    /// スキルのSKILL.mdを書き出し
    Export {
        /// スキル名
        name: String,

        /// 出力先パス（省略時は./<name>.md）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// スキル保存先のベースディレクトリ
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // トレーシング初期化（デフォルトはWARN、--verboseでINFO）
    let args = Args::parse();
    let default_level = if args.verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level))
        )
        .init();

    // 設定ファイルを読み込み
    let config = match &args.config {
        Some(path) => Config::load_from_file(path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load config file: {}, using defaults", e);
            Config::default()
        }),
        None => Config::load_default().unwrap_or_else(|e| {
            tracing::warn!("Failed to load default config: {}, using defaults", e);
            Config::default()
        }),
    };

    tracing::info!("skill-forge v{} starting...", skill_forge::VERSION);

    let result = match args.command {
        Command::New {
            name,
            template,
            description,
            dir,
            force,
        } => commands::new_skill(&config, &name, &template, description, dir.as_deref(), force).await,
        Command::List { dir } => commands::list_skills(&config, dir.as_deref()).await,
        Command::Validate {
            name,
            dir,
            verbose,
            json,
            legacy,
        } => {
            match commands::validate_skill(&config, &name, dir.as_deref(), verbose, json, legacy)
                .await
            {
                // 不合格は終了コード1で伝える
                Ok(true) => Ok(()),
                Ok(false) => std::process::exit(1),
                Err(e) => Err(e),
            }
        }
        Command::Export { name, output, dir } => {
            commands::export_skill(&config, &name, output, dir.as_deref()).await
        }
    };

    if let Err(e) = result {
        print_error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
