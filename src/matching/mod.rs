// 匹配模块 - 打分与判定
//
// 规范化后的查询经分词器切词，由打分器在公司库候选中找出最佳项，
// 再按阈值和别名规则给出最终判定。打分器与分词器都以 trait 注入。

mod decision;
mod scorer;
mod segmenter;
mod types;

pub use decision::CompanyMatcher;
pub use scorer::{FuzzyScorer, ScoredCandidate, SimilarityScorer};
pub use segmenter::{segmenter_for, JiebaSegmenter, WhitespaceSegmenter, WordSegmenter};
pub use types::{MatchDecision, MatchResult, RejectReason};
