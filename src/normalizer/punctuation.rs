//! 符号规整
//!
//! 按固定顺序处理：多值字段截断、`&`/`@` 语义占位、两类符号替换或删除、
//! "the X" 粘连、单字母合并、孤立字母清理，含 CJK 时按文种重新拼接。

use anyhow::{Context, Result};
use regex::Regex;

use crate::normalizer::segmenter::ScriptSegmenter;
use crate::normalizer::types::{collapse_whitespace, ScriptProfile};

/// "the X" 粘连标记
pub const THE_GLUE_MARKER: &str = "thespecial";

/// `&` 的语义占位词
const AMPERSAND_PLACEHOLDER: &str = "togetherwith";
/// `@` 的语义占位词
const AT_PLACEHOLDER: &str = "locatedat";

/// 一律替换为空格的符号
fn is_space_symbol(ch: char) -> bool {
    matches!(
        ch,
        '&' | '?' | '#' | '*' | '|' | '=' | '_' | '+' | '(' | ')' | '（' | '）' | '、' | ','
            | '，' | '–'
    )
}

/// 含 CJK 时替换为空格、否则直接删除的符号
fn is_erase_symbol(ch: char) -> bool {
    matches!(
        ch,
        '/' | '\\' | '%' | '!' | '！' | '.' | '?' | '？' | '^' | '*' | '·' | '•' | '⦁' | '-'
    )
}

/// 符号规整器
pub struct PunctuationRegulator {
    /// 整串为 "the <词>"
    the_entity: Regex,
    /// 两个及以上以空白分隔的单字母
    letter_sequence: Regex,
    /// 两侧都是空白的单字母
    isolated_letter: Regex,
}

impl PunctuationRegulator {
    pub fn new() -> Result<Self> {
        Ok(Self {
            the_entity: Regex::new(r"^(?i:the)\s+[a-zA-Z0-9]+$").context("编译 the 规则失败")?,
            letter_sequence: Regex::new(r"\b[a-zA-Z]\b(?:\s+[a-zA-Z]\b)+")
                .context("编译单字母合并规则失败")?,
            isolated_letter: Regex::new(r"\s+[a-zA-Z]\s+").context("编译孤立字母规则失败")?,
        })
    }

    /// 规整名称中的符号
    ///
    /// 结果为空时返回 `None`，不会把空串当作有效值。
    pub fn regulate(&self, name: &str) -> Option<String> {
        let profile = ScriptProfile::of(name);

        // 1. 多值字段只取第一个值
        let primary = match profile {
            ScriptProfile::Latin => name.split('|').next().unwrap_or_default(),
            ScriptProfile::Cjk => name,
        };

        // 2. 语义占位
        let text = primary
            .replace('&', AMPERSAND_PLACEHOLDER)
            .replace('@', AT_PLACEHOLDER);

        // 3. 第一类符号 -> 空格
        let text: String = text
            .chars()
            .map(|c| if is_space_symbol(c) { ' ' } else { c })
            .collect();

        // 4. 第二类符号：CJK 路径替换为空格，拉丁路径删除
        let text: String = match profile {
            ScriptProfile::Cjk => text
                .chars()
                .map(|c| if is_erase_symbol(c) { ' ' } else { c })
                .collect(),
            ScriptProfile::Latin => text.chars().filter(|c| !is_erase_symbol(*c)).collect(),
        };

        // 5. "the X" 粘成一个词
        let text = self.glue_the_entity(text.trim());

        // 6. 单字母合并
        let text = self.merge_single_letters(&text);

        // 7. 清理孤立的单字母
        let text = self.isolated_letter.replace_all(&text, " ");

        // 8. 含 CJK 时按文种重新拼接
        let text = match profile {
            ScriptProfile::Cjk => collapse_whitespace(&ScriptSegmenter::rejoin(&text)),
            ScriptProfile::Latin => collapse_whitespace(&text),
        };

        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }

    fn glue_the_entity(&self, text: &str) -> String {
        if self.the_entity.is_match(text) {
            text.split_whitespace()
                .collect::<Vec<_>>()
                .join(THE_GLUE_MARKER)
        } else {
            text.to_string()
        }
    }

    /// 反复取最左侧的单字母序列并粘连，直到不再命中
    ///
    /// 每轮至少消费一个字符，因此迭代次数以输入长度为上界。
    fn merge_single_letters(&self, text: &str) -> String {
        let mut merged = String::with_capacity(text.len());
        let mut rest = text;

        for _ in 0..=text.len() {
            let Some(found) = self.letter_sequence.find(rest) else {
                break;
            };
            merged.push_str(rest[..found.start()].trim());
            merged.push(' ');
            merged.extend(found.as_str().chars().filter(|c| !c.is_whitespace()));
            merged.push(' ');
            rest = &rest[found.end()..];
        }

        merged.push_str(rest.trim());
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn regulator() -> PunctuationRegulator {
        PunctuationRegulator::new().expect("规则可编译")
    }

    #[test]
    fn test_primary_value_before_pipe() {
        let r = regulator();
        assert_eq!(r.regulate("Foo Inc|Bar Ltd").as_deref(), Some("Foo Inc"));
        assert_eq!(r.regulate("|Bar"), None);
    }

    #[test]
    fn test_pipe_kept_as_space_with_cjk() {
        let r = regulator();
        assert_eq!(r.regulate("华为|Huawei").as_deref(), Some("华为 Huawei"));
    }

    #[test]
    fn test_placeholders() {
        let r = regulator();
        assert_eq!(
            r.regulate("Johnson & Johnson").as_deref(),
            Some("Johnson togetherwith Johnson")
        );
        assert_eq!(r.regulate("AT&T").as_deref(), Some("ATtogetherwithT"));
        assert_eq!(r.regulate("Cafe@Home").as_deref(), Some("CafelocatedatHome"));
    }

    #[test]
    fn test_latin_erase_symbols() {
        let r = regulator();
        assert_eq!(r.regulate("Hewlett-Packard").as_deref(), Some("HewlettPackard"));
        assert_eq!(r.regulate("A.B.C. Holdings").as_deref(), Some("ABC Holdings"));
        assert_eq!(r.regulate("Yahoo!").as_deref(), Some("Yahoo"));
        assert_eq!(r.regulate("Foo (Asia), Ltd").as_deref(), Some("Foo Asia Ltd"));
    }

    #[test]
    fn test_cjk_symbols_become_spaces() {
        let r = regulator();
        assert_eq!(
            r.regulate("中国-银行(香港)").as_deref(),
            Some("中国 银行 香港")
        );
        assert_eq!(
            r.regulate("IBM中国有限公司").as_deref(),
            Some("IBM 中国有限公司")
        );
    }

    #[test]
    fn test_the_entity_glued() {
        let r = regulator();
        assert_eq!(r.regulate("The Body").as_deref(), Some("ThethespecialBody"));
        assert_eq!(r.regulate("the  body shop").as_deref(), Some("the body shop"));
    }

    #[test]
    fn test_merge_single_letters() {
        let r = regulator();
        assert_eq!(r.regulate("I B M Corp").as_deref(), Some("IBM Corp"));
        assert_eq!(r.regulate("x y Foo a b c").as_deref(), Some("xy Foo abc"));
    }

    #[test]
    fn test_isolated_letter_removed() {
        let r = regulator();
        assert_eq!(r.regulate("Apple a Pie").as_deref(), Some("Apple Pie"));
        assert_eq!(r.regulate("Foo A Bar").as_deref(), Some("Foo Bar"));
        // 首尾的单字母保留
        assert_eq!(r.regulate("A Foo").as_deref(), Some("A Foo"));
    }

    #[test]
    fn test_empty_result_is_none() {
        let r = regulator();
        assert_eq!(r.regulate(""), None);
        assert_eq!(r.regulate("  ...  "), None);
        assert_eq!(r.regulate("-/-"), None);
    }
}
