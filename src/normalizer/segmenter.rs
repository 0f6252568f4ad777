//! 文种切分器
//!
//! 单次从左到右扫描，把文本切成 CJK 片段与拉丁/数字片段，
//! 两类匹配互不重叠，匹配之间的剩余文本作为拉丁/数字词输出。

use crate::normalizer::types::{is_cjk, Token, TokenKind};

/// 数字串内部最多允许的分隔组数
const MAX_NUMERIC_GROUPS: usize = 5;
/// 每组分隔符的最大长度
const MAX_SEPARATOR_LEN: usize = 5;

/// 切分粒度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Granularity {
    /// 保留整段
    #[default]
    Runs,
    /// CJK 拆成单字，拉丁/数字按空白和标点拆成词
    Words,
}

/// 分桶结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptBuckets {
    pub latin_numeric: Vec<Token>,
    pub cjk: Vec<Token>,
}

/// 文种切分器
pub struct ScriptSegmenter;

impl ScriptSegmenter {
    /// 切分并按原顺序合并输出
    pub fn segment(text: &str, granularity: Granularity) -> Vec<Token> {
        let mut tokens = Vec::new();
        Self::scan(text, granularity, |token| tokens.push(token));
        tokens
    }

    /// 切分并把 CJK 与拉丁/数字分别装桶
    pub fn bucket(text: &str, granularity: Granularity) -> ScriptBuckets {
        let mut buckets = ScriptBuckets::default();
        Self::scan(text, granularity, |token| {
            if token.kind.is_cjk() {
                buckets.cjk.push(token);
            } else {
                buckets.latin_numeric.push(token);
            }
        });
        buckets
    }

    /// 用单个空格重新拼接各片段（修复混排文本的间距）
    pub fn rejoin(text: &str) -> String {
        Self::segment(text, Granularity::Runs)
            .into_iter()
            .map(|t| t.text)
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn scan(text: &str, granularity: Granularity, mut emit: impl FnMut(Token)) {
        let chars: Vec<char> = text.chars().collect();
        let mut pending_start = 0;
        let mut idx = 0;

        while idx < chars.len() {
            if is_cjk(chars[idx]) {
                let end = chars[idx..]
                    .iter()
                    .position(|&c| !is_cjk(c))
                    .map_or(chars.len(), |offset| idx + offset);
                Self::flush_pending(&chars[pending_start..idx], granularity, &mut emit);
                Self::emit_cjk(&chars[idx..end], granularity, &mut emit);
                idx = end;
                pending_start = end;
                continue;
            }

            if let Some(end) = numeric_run_end(&chars, idx) {
                Self::flush_pending(&chars[pending_start..idx], granularity, &mut emit);
                let run: String = chars[idx..end].iter().collect();
                match granularity {
                    Granularity::Runs => emit(Token::new(run, TokenKind::Numeric)),
                    Granularity::Words => {
                        for word in split_words(&run) {
                            emit(Token::new(word, TokenKind::Numeric));
                        }
                    }
                }
                idx = end;
                pending_start = end;
                continue;
            }

            idx += 1;
        }

        Self::flush_pending(&chars[pending_start..], granularity, &mut emit);
    }

    /// 输出两次匹配之间的剩余文本
    fn flush_pending(chars: &[char], granularity: Granularity, emit: &mut impl FnMut(Token)) {
        let pending: String = chars.iter().collect();
        let pending = pending.trim();
        if pending.is_empty() {
            return;
        }
        match granularity {
            Granularity::Runs => emit(Token::new(pending, TokenKind::classify(pending))),
            Granularity::Words => {
                for word in split_words(pending) {
                    let kind = TokenKind::classify(&word);
                    emit(Token::new(word, kind));
                }
            }
        }
    }

    fn emit_cjk(chars: &[char], granularity: Granularity, emit: &mut impl FnMut(Token)) {
        match granularity {
            Granularity::Runs => emit(Token::new(chars.iter().collect::<String>(), TokenKind::Cjk)),
            Granularity::Words => {
                for ch in chars {
                    emit(Token::new(ch.to_string(), TokenKind::Cjk));
                }
            }
        }
    }
}

/// 拉丁词内部允许保留的符号
fn is_word_joiner(ch: char) -> bool {
    matches!(ch, '&' | '_' | '+' | '*' | '\\' | '/' | '\'' | '#' | '-')
}

/// 按空白和标点拆词，保留 `& _ + * \ / ' # -`
fn split_words(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || is_word_joiner(c)))
        .map(str::trim)
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

fn is_separator(ch: char) -> bool {
    !ch.is_alphanumeric()
}

fn digits_end(chars: &[char], start: usize) -> usize {
    chars[start..]
        .iter()
        .position(|c| !c.is_ascii_digit())
        .map_or(chars.len(), |offset| start + offset)
}

/// 在 `start` 处尝试匹配数字串，返回结束位置（不含）
///
/// 左边界：前一字符为字母或空白，或位于下标 1 且首字符不是数字；
/// 且前一字符不能是词首的单个 ASCII 字母（`a1` 不拆）。
/// 右边界：文本结束、字母或空白；不满足时回退到更短的数字段。
fn numeric_run_end(chars: &[char], start: usize) -> Option<usize> {
    if !chars[start].is_ascii_digit() || start == 0 {
        return None;
    }

    let prev = chars[start - 1];
    let after_leading_non_digit = start == 1 && !prev.is_ascii_digit();
    let after_letter_or_space = prev.is_alphabetic() || prev.is_whitespace();
    if !(after_leading_non_digit || after_letter_or_space) {
        return None;
    }
    if prev.is_ascii_alphabetic() {
        let word_initial = start < 2 || !is_word_char(chars[start - 2]);
        if word_initial {
            return None;
        }
    }

    let mut ends = vec![digits_end(chars, start)];
    for _ in 0..MAX_NUMERIC_GROUPS {
        let mut cursor = ends[ends.len() - 1];
        let mut separators = 0;
        while cursor < chars.len() && separators < MAX_SEPARATOR_LEN && is_separator(chars[cursor])
        {
            cursor += 1;
            separators += 1;
        }
        if cursor < chars.len() && chars[cursor].is_ascii_digit() {
            ends.push(digits_end(chars, cursor));
        } else {
            break;
        }
    }

    ends.into_iter().rev().find(|&end| {
        end == chars.len() || chars[end].is_alphabetic() || chars[end].is_whitespace()
    })
}
