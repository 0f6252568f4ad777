//! 最终分词过滤

use std::collections::HashSet;

use crate::normalizer::types::{FieldKind, Token, TokenKind};

/// 最终分词过滤器
///
/// 去掉非字母数字字符后按空白切词，全部转小写。
/// 含 CJK 的词整体保留、不去重，其中夹带的拉丁字母同样转小写。
#[derive(Debug, Default)]
pub struct TokenFilter;

impl TokenFilter {
    pub fn new() -> Self {
        Self
    }

    pub fn filter(&self, text: &str, field: FieldKind) -> Vec<Token> {
        let cleaned: String = text
            .chars()
            .filter(|c| c.is_alphanumeric() || c.is_whitespace())
            .collect();

        let mut seen = HashSet::new();
        let mut tokens = Vec::new();
        for word in cleaned.split_whitespace() {
            let kind = TokenKind::classify(word);
            let lowered = word.to_lowercase();
            if kind.is_cjk() {
                tokens.push(Token::new(lowered, kind));
                continue;
            }

            if field == FieldKind::FreeText && !seen.insert(lowered.clone()) {
                continue;
            }
            tokens.push(Token::new(lowered, kind));
        }
        tokens
    }
}
