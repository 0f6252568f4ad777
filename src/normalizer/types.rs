//! 规范化层类型定义

use std::fmt;

use serde::{Deserialize, Serialize};

/// Token 类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// 拉丁字母（可夹带数字）
    Latin,
    /// 数字串（可含少量内部分隔符，如日期、编号）
    Numeric,
    /// 中日韩文字
    Cjk,
    /// 纯符号
    Symbol,
}

impl TokenKind {
    /// 是否属于 CJK 分桶
    pub fn is_cjk(self) -> bool {
        self == TokenKind::Cjk
    }

    /// 按内容判定一个词的类型
    ///
    /// 含 CJK 字符即为 CJK；无任何字母数字为符号；
    /// 只有数字（允许夹带分隔符）为数字串；其余为拉丁。
    pub fn classify(word: &str) -> Self {
        if word.chars().any(is_cjk) {
            return TokenKind::Cjk;
        }
        let mut has_digit = false;
        let mut has_letter = false;
        for ch in word.chars() {
            if ch.is_numeric() {
                has_digit = true;
            } else if ch.is_alphanumeric() {
                has_letter = true;
            }
        }
        match (has_letter, has_digit) {
            (false, false) => TokenKind::Symbol,
            (false, true) => TokenKind::Numeric,
            _ => TokenKind::Latin,
        }
    }
}

/// Token：一段文本及其类型，类型在切分时确定后不再改变
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub text: String,
    pub kind: TokenKind,
}

impl Token {
    pub fn new(text: impl Into<String>, kind: TokenKind) -> Self {
        Self {
            text: text.into(),
            kind,
        }
    }
}

/// 规范化后的公司名：有序 token 序列
///
/// 由 `NameNormalizer` 确定性地产生，且满足幂等：再次规范化其文本得到相同结果。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalName {
    tokens: Vec<Token>,
}

impl CanonicalName {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// 以单个空格连接的文本形式
    pub fn as_text(&self) -> String {
        self.tokens
            .iter()
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for CanonicalName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

/// 字段类型：决定 TokenFilter 是否对重复拉丁词去重
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldKind {
    /// 权威公司名字段：保留重复词（如 "Tata Tata Group"）
    #[default]
    CompanyName,
    /// 普通检索文本：重复拉丁词只保留第一次出现
    FreeText,
}

/// 文本的文种画像，决定符号处理走哪条路径
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptProfile {
    /// 不含 CJK：词之间已有空格，符号直接删除
    Latin,
    /// 含 CJK：CJK 不以空格分词，符号需替换为空格
    Cjk,
}

impl ScriptProfile {
    pub fn of(text: &str) -> Self {
        if contains_cjk(text) {
            ScriptProfile::Cjk
        } else {
            ScriptProfile::Latin
        }
    }
}

/// 判断是否为 CJK 字符
pub fn is_cjk(ch: char) -> bool {
    let code = ch as u32;
    // Hangul Jamo
    (0x1100..=0x11FF).contains(&code)
        // CJK 部首、康熙部首、表意文字描述符等
        || (0x2E80..=0x2FFF).contains(&code)
        // 平假名、片假名、注音、谚文兼容字母、汉文训读、笔画
        || (0x3040..=0x31FF).contains(&code)
        // CJK Unified Ideographs（含 Extension A、易经卦象）
        || (0x3400..=0x9FFF).contains(&code)
        // Hangul Jamo Extended-A
        || (0xA960..=0xA97F).contains(&code)
        // Hangul Syllables + Jamo Extended-B
        || (0xAC00..=0xD7FF).contains(&code)
        // CJK Compatibility Ideographs
        || (0xF900..=0xFAFF).contains(&code)
        // CJK Unified Ideographs Extension B-F
        || (0x20000..=0x2CEAF).contains(&code)
}

/// 文本是否包含 CJK 字符
pub fn contains_cjk(text: &str) -> bool {
    text.chars().any(is_cjk)
}

/// 空白折叠：多个连续空白 -> 单个空格，并去除首尾空白
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
