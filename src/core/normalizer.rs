use regex::Regex;
use std::sync::LazyLock;

// 保留文字、空白、逗號與斜線 (例如 "c/o")
static DISALLOWED_SYMBOLS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s,/]").expect("valid symbol regex"));

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

pub struct TextNormalizer;

impl TextNormalizer {
    /// Strips every character other than word characters, whitespace, `,`
    /// and `/`, then collapses whitespace runs to one space and trims.
    pub fn normalize(text: &str) -> String {
        let stripped = DISALLOWED_SYMBOLS.replace_all(text, "");
        let collapsed = WHITESPACE_RUN.replace_all(&stripped, " ");
        collapsed.trim().to_string()
    }
}
