//! 本文のセクション分割モジュール
//!
//! `##` 見出しを境界として本文を分割し、正規化済みキーで引ける
//! 挿入順保持マップを構築する。正規化は本モジュールの関数のみが行い、
//! 以降の照会は常に正規化済みキーで行われる。

/// セクションの挿入順保持マップ
///
/// 見出しの出現順を保ちつつ、正規化キーでの照会を提供する。
#[derive(Debug, Clone, Default)]
pub struct Sections {
    entries: Vec<(String, String)>,
}

impl Sections {
    /// 空のマップを作成
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// セクションを挿入（同名キーは内容を上書き、位置は維持）
    pub fn insert(&mut self, key: String, content: String) {
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            entry.1 = content;
        } else {
            self.entries.push((key, content));
        }
    }

    /// 正規化キーでセクション本文を取得
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// キーが存在するか
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// 挿入順のキー一覧
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// 挿入順の (キー, 本文) イテレータ
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// セクション数
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// セクションが1つもないか
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// 本文を`##`見出し単位で分割する
///
/// 見出し行は「##」+ 1つ以上の空白 + テキスト。次の見出し（または本文末尾）
/// までがそのセクションの内容になる。最初の見出しより前のテキストは
/// セクションには含まれない（本文には残る）。
pub fn parse_sections(body: &str) -> Sections {
    let mut sections = Sections::new();
    let mut current_key: Option<String> = None;
    let mut current_lines: Vec<&str> = Vec::new();

    for line in body.lines() {
        if let Some(heading) = section_heading(line) {
            if let Some(key) = current_key.take() {
                sections.insert(key, current_lines.join("\n").trim().to_string());
            }
            current_lines.clear();
            current_key = Some(normalize_section_key(heading));
        } else if current_key.is_some() {
            current_lines.push(line);
        }
    }

    if let Some(key) = current_key {
        sections.insert(key, current_lines.join("\n").trim().to_string());
    }

    sections
}

/// 行が`##`見出しであればテキスト部分を返す
///
/// `###`以降のレベルや、空白を挟まない「##text」は見出し扱いしない。
fn section_heading(line: &str) -> Option<&str> {
    let rest = line.strip_prefix("##")?;
    if rest.starts_with('#') {
        return None;
    }
    let text = rest.trim_start();
    if text.len() == rest.len() || text.is_empty() {
        return None;
    }
    Some(text.trim_end())
}

/// 見出しテキストを正規化キーへ変換
///
/// 小文字化 → 英数字と空白以外を除去 → 空白区切りでcamelCase結合。
/// 「When to Use」→「whenToUse」、「Error Handling」→「errorHandling」
pub fn normalize_section_key(heading: &str) -> String {
    let cleaned: String = heading
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
        .collect();

    let mut words = cleaned.split_whitespace();
    let mut key = String::new();

    if let Some(first) = words.next() {
        key.push_str(first);
    }
    for word in words {
        let mut chars = word.chars();
        if let Some(c) = chars.next() {
            key.push(c.to_ascii_uppercase());
            key.push_str(chars.as_str());
        }
    }

    key
}
