//! 公司词剥离
//!
//! 先移除组织后缀，再移除通用修饰词，最后用领域关键词检查是否剥得过头。

use crate::normalizer::rules::Vocabulary;
use crate::normalizer::types::{collapse_whitespace, contains_cjk};

/// 公司词剥离器
pub struct CompanyWordStripper {
    vocabulary: Vocabulary,
}

impl CompanyWordStripper {
    pub fn new(vocabulary: Vocabulary) -> Self {
        Self { vocabulary }
    }

    /// 剥离组织后缀和通用修饰词
    ///
    /// 后缀剥离后为空返回 `None`；修饰词剥离只在结果非空时采纳。
    /// 剥离结果几乎只剩一个领域关键词时，退回剥离前的文本。
    pub fn strip(&self, regulated: &str) -> Option<String> {
        // CJK 不以空格分词，纯 CJK（不含 ASCII 字母）时去掉所有空格
        let source = if contains_cjk(regulated) && !regulated.chars().any(|c| c.is_ascii_alphabetic())
        {
            regulated.replace(' ', "")
        } else {
            regulated.to_string()
        };

        let once = self.vocabulary.strip_org_suffixes(&source);
        let mut stripped = collapse_whitespace(&self.vocabulary.strip_org_suffixes(once.trim()));
        if stripped.is_empty() {
            tracing::debug!("后缀剥离后为空: {}", regulated);
            return None;
        }

        let spaced = self.vocabulary.strip_common_words(&stripped, " ");
        let spaced = spaced.trim();
        if !spaced.is_empty() {
            stripped = spaced.to_string();
        }

        let deleted = collapse_whitespace(&self.vocabulary.strip_common_words(&stripped, ""));
        if !deleted.is_empty() {
            stripped = deleted;
        }

        match self.vocabulary.first_keyword_len(&stripped) {
            Some(span) if span + 2 > stripped.chars().count() => {
                tracing::debug!("关键词保护生效: {} -> {}", stripped, source);
                Some(source)
            }
            _ => Some(stripped),
        }
    }
}
