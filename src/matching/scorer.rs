//! 相似度打分
//!
//! 支持编辑距离、词序无关比较和拼音相似度

use std::collections::BTreeSet;

use pinyin::ToPinyin;
use strsim::normalized_levenshtein;

use crate::config::ScorerConfig;
use crate::normalizer::contains_cjk;

/// 最佳候选
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredCandidate {
    pub candidate: String,
    /// 0-100
    pub score: u8,
}

/// 相似度打分器
///
/// 在候选集中找出与查询最相似的一项；查询或候选集为空时返回 `None`。
pub trait SimilarityScorer: Send + Sync {
    fn best_match(&self, query: &str, candidates: &[String]) -> Option<ScoredCandidate>;
}

/// 默认打分器
///
/// 取编辑距离比、排序词比、词集比、拼音比中的最大值，
/// 后三者按配置的权重折算。
pub struct FuzzyScorer {
    token_weight: f64,
    pinyin_weight: Option<f64>,
}

impl FuzzyScorer {
    pub fn new(config: &ScorerConfig) -> Self {
        Self {
            token_weight: config.token_weight,
            pinyin_weight: config.enable_pinyin.then_some(config.pinyin_weight),
        }
    }

    /// 单个候选的分数（0-100）
    pub fn score(&self, query: &str, candidate: &str) -> u8 {
        let mut best = ratio(query, candidate);
        best = best.max(self.token_weight * token_sort_ratio(query, candidate));
        best = best.max(self.token_weight * token_set_ratio(query, candidate));

        if let Some(weight) = self.pinyin_weight {
            if contains_cjk(query) && contains_cjk(candidate) {
                best = best.max(weight * ratio(&to_pinyin_str(query), &to_pinyin_str(candidate)));
            }
        }

        (best * 100.0).round().clamp(0.0, 100.0) as u8
    }
}

impl Default for FuzzyScorer {
    fn default() -> Self {
        Self::new(&ScorerConfig::default())
    }
}

impl SimilarityScorer for FuzzyScorer {
    fn best_match(&self, query: &str, candidates: &[String]) -> Option<ScoredCandidate> {
        if query.is_empty() {
            return None;
        }

        let mut best: Option<(usize, u8)> = None;
        for (i, candidate) in candidates.iter().enumerate() {
            let score = self.score(query, candidate);
            // 同分保留靠前的候选
            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((i, score));
                if score == 100 {
                    break;
                }
            }
        }

        best.map(|(i, score)| ScoredCandidate {
            candidate: candidates[i].clone(),
            score,
        })
    }
}

/// 编辑距离比（0.0 - 1.0），任一侧为空时为 0
fn ratio(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    normalized_levenshtein(a, b)
}

/// 按词排序后比较
fn token_sort_ratio(a: &str, b: &str) -> f64 {
    ratio(&sorted_tokens(a), &sorted_tokens(b))
}

fn sorted_tokens(text: &str) -> String {
    let mut tokens: Vec<&str> = text.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

/// 按词集比较：公共词 + 各自剩余词
fn token_set_ratio(a: &str, b: &str) -> f64 {
    let set_a: BTreeSet<&str> = a.split_whitespace().collect();
    let set_b: BTreeSet<&str> = b.split_whitespace().collect();

    let common = set_a.intersection(&set_b).copied().collect::<Vec<_>>().join(" ");
    let only_a = set_a.difference(&set_b).copied().collect::<Vec<_>>().join(" ");
    let only_b = set_b.difference(&set_a).copied().collect::<Vec<_>>().join(" ");

    let with_a = format!("{} {}", common, only_a).trim().to_string();
    let with_b = format!("{} {}", common, only_b).trim().to_string();

    ratio(&common, &with_a)
        .max(ratio(&common, &with_b))
        .max(ratio(&with_a, &with_b))
}

/// 转换为拼音字符串（全拼，无声调）
fn to_pinyin_str(text: &str) -> String {
    let mut result = String::new();
    for ch in text.chars() {
        if let Some(pinyin) = ch.to_pinyin() {
            result.push_str(pinyin.plain());
        } else if ch.is_ascii_alphanumeric() {
            result.push(ch.to_ascii_lowercase());
        }
    }
    result
}
