//! 公司名称规范化层
//!
//! 把多文种、符号繁杂、格式不一的公司名确定性地转换为稳定的规范名，
//! 同时保留匹配所需的身份信息。
//!
//! ## 处理流程
//! 1. 变音符号折叠（NFC + 查表）
//! 2. 符号规整（多值截断、语义占位、符号替换/删除、单字母合并）
//! 3. 含 CJK 时按文种重新拼接
//! 4. 组织后缀剥离 + 通用修饰词剥离 + 关键词保护
//! 5. 最终分词过滤（小写、CJK 原样、可选去重）
//! 6. 对输出重复 1-5 直到不动点

mod diacritics;
mod engine;
mod punctuation;
mod rules;
mod segmenter;
mod stripper;
mod token_filter;
mod types;

pub use diacritics::DiacriticFolder;
pub use engine::NameNormalizer;
pub use punctuation::PunctuationRegulator;
pub use rules::Vocabulary;
pub use segmenter::{Granularity, ScriptBuckets, ScriptSegmenter};
pub use stripper::CompanyWordStripper;
pub use token_filter::TokenFilter;
pub use types::{
    collapse_whitespace, contains_cjk, is_cjk, CanonicalName, FieldKind, ScriptProfile, Token,
    TokenKind,
};
