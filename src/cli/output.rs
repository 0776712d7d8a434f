//! 色付き出力モジュール
//!
//! CLIの出力を色分けして表示するためのユーティリティ関数を提供

use std::io::{self, Write};
use crossterm::{
    execute,
    style::{Color, Print, ResetColor, SetForegroundColor, Attribute, SetAttribute},
};

/// Unicodeアイコンとフォールバック文字
pub struct Icons;

impl Icons {
    /// 成功アイコン
    pub fn success() -> &'static str {
        if Self::supports_unicode() { "✓" } else { "[+]" }
    }

    /// 失敗アイコン
    pub fn error() -> &'static str {
        if Self::supports_unicode() { "✗" } else { "[x]" }
    }

    /// 警告アイコン
    pub fn warning() -> &'static str {
        "!"
    }

    /// 情報アイコン
    pub fn info() -> &'static str {
        if Self::supports_unicode() { "ℹ" } else { "[i]" }
    }

    /// 部分達成アイコン
    pub fn partial() -> &'static str {
        "~"
    }

    /// 箇条書きアイコン
    pub fn bullet() -> &'static str {
        if Self::supports_unicode() { "•" } else { "-" }
    }

    /// Unicode対応チェック（環境変数でオーバーライド可能）
    fn supports_unicode() -> bool {
        // 環境変数でフォールバックを強制
        if std::env::var("SKILL_FORGE_NO_UNICODE").is_ok() {
            return false;
        }
        // TERM環境変数をチェック
        std::env::var("TERM").map_or(false, |term| {
            !term.contains("dumb") && !term.contains("linux")
        })
    }
}

/// 成功メッセージを緑アイコン付きで出力
pub fn print_success(msg: &str) {
    let mut stdout = io::stdout();
    let _ = execute!(
        stdout,
        SetForegroundColor(Color::Green),
        Print(Icons::success()),
        ResetColor,
        Print(format!(" {}\n", msg))
    );
    let _ = stdout.flush();
}

/// エラーメッセージを赤色で出力
pub fn print_error(msg: &str) {
    let mut stdout = io::stdout();
    let _ = execute!(
        stdout,
        SetForegroundColor(Color::Red),
        Print(format!("{} {}\n", Icons::error(), msg)),
        ResetColor
    );
    let _ = stdout.flush();
}

/// 警告メッセージを黄色で出力
pub fn print_warn(msg: &str) {
    let mut stdout = io::stdout();
    let _ = execute!(
        stdout,
        SetForegroundColor(Color::Yellow),
        Print(format!("{} {}\n", Icons::warning(), msg)),
        ResetColor
    );
    let _ = stdout.flush();
}

/// 情報メッセージを青アイコン付きで出力
pub fn print_info(msg: &str) {
    let mut stdout = io::stdout();
    let _ = execute!(
        stdout,
        SetForegroundColor(Color::Blue),
        Print(Icons::info()),
        ResetColor,
        Print(format!(" {}\n", msg))
    );
    let _ = stdout.flush();
}

/// セクションヘッダーを出力（シアン太字 + 下線）
pub fn print_header(text: &str) {
    let mut stdout = io::stdout();
    let _ = execute!(
        stdout,
        Print("\n"),
        SetForegroundColor(Color::Cyan),
        SetAttribute(Attribute::Bold),
        Print(format!("{}\n", text)),
        SetAttribute(Attribute::Reset),
        SetForegroundColor(Color::DarkGrey),
        Print(format!("{}\n", "─".repeat(text.chars().count()))),
        ResetColor
    );
    let _ = stdout.flush();
}

/// サブヘッダーを出力（太字）
pub fn print_subheader(text: &str) {
    let mut stdout = io::stdout();
    let _ = execute!(
        stdout,
        Print("\n"),
        SetAttribute(Attribute::Bold),
        Print(format!("{}\n", text)),
        SetAttribute(Attribute::Reset)
    );
    let _ = stdout.flush();
}

/// スキル名などの見出しをシアン太字で出力
pub fn print_title(text: &str) {
    let mut stdout = io::stdout();
    let _ = execute!(
        stdout,
        SetForegroundColor(Color::Cyan),
        SetAttribute(Attribute::Bold),
        Print(format!("{}\n", text)),
        SetAttribute(Attribute::Reset),
        ResetColor
    );
    let _ = stdout.flush();
}

/// 箇条書き項目を出力
pub fn print_list_item(text: &str, indent: usize) {
    let mut stdout = io::stdout();
    let padding = "  ".repeat(indent);
    let _ = execute!(
        stdout,
        Print(padding),
        SetForegroundColor(Color::DarkGrey),
        Print(Icons::bullet()),
        ResetColor,
        Print(format!(" {}\n", text))
    );
    let _ = stdout.flush();
}

/// キーと値のペアを出力
pub fn print_key_value(key: &str, value: &str) {
    let mut stdout = io::stdout();
    let _ = execute!(
        stdout,
        SetForegroundColor(Color::DarkGrey),
        Print(format!("{}:", key)),
        ResetColor,
        Print(format!(" {}\n", value))
    );
    let _ = stdout.flush();
}

/// 補足テキストを暗い色で出力
pub fn print_hint(msg: &str) {
    let mut stdout = io::stdout();
    let _ = execute!(
        stdout,
        SetForegroundColor(Color::DarkGrey),
        Print(format!("{}\n", msg)),
        ResetColor
    );
    let _ = stdout.flush();
}

/// 指定色でテキストを1行出力
pub fn print_colored(msg: &str, color: Color) {
    let mut stdout = io::stdout();
    let _ = execute!(
        stdout,
        SetForegroundColor(color),
        Print(format!("{}\n", msg)),
        ResetColor
    );
    let _ = stdout.flush();
}

/// スコア行を出力（数値部分のみスコア帯の色が付く）
pub fn print_score_line(score: u32, max: u32, label: &str) {
    let mut stdout = io::stdout();
    let _ = execute!(
        stdout,
        Print("  "),
        SetForegroundColor(score_color(score)),
        Print(format!("{}/{}", score, max)),
        ResetColor,
        Print(format!(" ({})\n", label))
    );
    let _ = stdout.flush();
}

/// 内訳の1行を出力（アイコンのみ色付き）
pub fn print_check_line(icon: &str, color: Color, text: &str) {
    let mut stdout = io::stdout();
    let _ = execute!(
        stdout,
        Print("    "),
        SetForegroundColor(color),
        Print(icon),
        ResetColor,
        Print(format!(" {}\n", text))
    );
    let _ = stdout.flush();
}

/// 推定トークン数を出力（推奨内は緑、超過は黄）
pub fn print_token_count(count: usize, within_recommended: bool) {
    let mut stdout = io::stdout();
    let color = if within_recommended { Color::Green } else { Color::Yellow };
    let _ = execute!(
        stdout,
        Print("  Estimated tokens: "),
        SetForegroundColor(color),
        Print(format!("{}\n", count)),
        ResetColor
    );
    let _ = stdout.flush();
}

/// スコア帯に応じた表示色（70以上=緑、50以上=黄、未満=赤）
pub fn score_color(score: u32) -> Color {
    if score >= 70 {
        Color::Green
    } else if score >= 50 {
        Color::Yellow
    } else {
        Color::Red
    }
}
