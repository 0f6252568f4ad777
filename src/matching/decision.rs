//! 匹配判定
//!
//! 规范化查询 → 分词 → 打分 → 阈值判定 → 别名/规范名选择。
//! 单次调用无状态，任何失败都以拒绝结果返回，不会报错。

use std::sync::Arc;

use anyhow::Result;

use crate::config::AppConfig;
use crate::matching::scorer::{FuzzyScorer, SimilarityScorer};
use crate::matching::segmenter::{segmenter_for, WordSegmenter};
use crate::matching::types::{MatchDecision, MatchResult, RejectReason};
use crate::normalizer::NameNormalizer;
use crate::registry::Registry;

/// 公司名匹配器（构建一次，可在线程间共享）
pub struct CompanyMatcher {
    normalizer: Arc<NameNormalizer>,
    registry: Arc<Registry>,
    scorer: Box<dyn SimilarityScorer>,
    segmenter: Arc<dyn WordSegmenter>,
}

impl CompanyMatcher {
    pub fn new(
        normalizer: Arc<NameNormalizer>,
        registry: Arc<Registry>,
        scorer: Box<dyn SimilarityScorer>,
        segmenter: Arc<dyn WordSegmenter>,
    ) -> Self {
        Self {
            normalizer,
            registry,
            scorer,
            segmenter,
        }
    }

    /// 按配置构建：规范化引擎、分词器、默认打分器，并加载公司库
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        config.validate()?;
        let registry_path = config
            .registry_path
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("未配置公司库路径"))?;

        let normalizer = Arc::new(NameNormalizer::new(&config.normalizer)?);
        let segmenter = segmenter_for(config.segmenter);
        let registry = Arc::new(Registry::load(
            registry_path,
            &normalizer,
            segmenter.as_ref(),
        )?);
        let scorer = Box::new(FuzzyScorer::new(&config.scorer));

        Ok(Self::new(normalizer, registry, scorer, segmenter))
    }

    pub fn normalizer(&self) -> &NameNormalizer {
        &self.normalizer
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// 查询的规范化 + 分词结果，与公司库候选处于同一形式
    pub fn canonical_query(&self, raw: &str) -> Result<String, RejectReason> {
        let canonical = self
            .normalizer
            .match_key(raw)
            .ok_or(RejectReason::EmptyAfterNormalization)?;
        let query = self.segmenter.cut_joined(&canonical);
        if query.is_empty() {
            return Err(RejectReason::EmptyAfterNormalization);
        }
        Ok(query)
    }

    /// 匹配并返回名称，未匹配时为空串
    pub fn match_name(&self, raw: Option<&str>, expected: Option<&str>, threshold: u8) -> String {
        self.decide(raw, expected, threshold).into_name()
    }

    /// 匹配并返回完整判定
    pub fn decide(&self, raw: Option<&str>, expected: Option<&str>, threshold: u8) -> MatchDecision {
        let Some(raw) = raw else {
            return MatchDecision::Rejected(RejectReason::MissingInput);
        };

        let query = match self.canonical_query(raw) {
            Ok(query) => query,
            Err(reason) => {
                tracing::debug!("查询规范化后为空: {}", raw);
                return MatchDecision::Rejected(reason);
            }
        };

        let Some(best) = self.scorer.best_match(&query, self.registry.candidates()) else {
            tracing::debug!("无候选: {}", query);
            return MatchDecision::Rejected(RejectReason::NoCandidate);
        };

        if best.score < threshold {
            tracing::debug!(
                "分数低于阈值: {} -> {} ({} < {})",
                query,
                best.candidate,
                best.score,
                threshold
            );
            return MatchDecision::Rejected(RejectReason::BelowThreshold {
                score: best.score,
                threshold,
            });
        }

        let Some((record, source)) = self.registry.owner(&best.candidate) else {
            tracing::warn!("候选不在公司库中: {}", best.candidate);
            return MatchDecision::Rejected(RejectReason::RegistryDesync {
                candidate: best.candidate,
            });
        };

        let matched_name = match expected {
            Some(expected)
                if record
                    .alternate_names()
                    .any(|alias| alias.to_lowercase() == expected.to_lowercase()) =>
            {
                expected.to_string()
            }
            _ => record.canonical_name.clone(),
        };

        tracing::debug!(
            "匹配成功: {} -> {} (分数 {})",
            raw,
            matched_name,
            best.score
        );
        MatchDecision::Matched(MatchResult {
            matched_name,
            score: best.score,
            record_id: Some(record.index),
            is_alias: source.is_alias(),
            candidate: best.candidate,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::scorer::ScoredCandidate;
    use crate::matching::segmenter::WhitespaceSegmenter;
    use crate::registry::CompanyRecord;

    /// 固定分数：优先返回与查询相同的候选，否则返回第一个
    struct FixedScorer(u8);

    impl SimilarityScorer for FixedScorer {
        fn best_match(&self, query: &str, candidates: &[String]) -> Option<ScoredCandidate> {
            let candidate = candidates
                .iter()
                .find(|c| c.as_str() == query)
                .or_else(|| candidates.first())?;
            Some(ScoredCandidate {
                candidate: candidate.clone(),
                score: self.0,
            })
        }
    }

    /// 总是返回公司库中不存在的候选
    struct GhostScorer;

    impl SimilarityScorer for GhostScorer {
        fn best_match(&self, _query: &str, _candidates: &[String]) -> Option<ScoredCandidate> {
            Some(ScoredCandidate {
                candidate: "ghost".to_string(),
                score: 100,
            })
        }
    }

    fn matcher_with(scorer: Box<dyn SimilarityScorer>) -> CompanyMatcher {
        let normalizer = Arc::new(NameNormalizer::with_defaults().expect("内置规则可编译"));
        let segmenter: Arc<dyn WordSegmenter> = Arc::new(WhitespaceSegmenter);
        let records = vec![
            CompanyRecord::new("Acme Corp").with_aliases(&["Acme International"]),
            CompanyRecord::new("Global Century Bank Ltd")
                .with_required_search_strings(&["GCB"]),
        ];
        let registry = Arc::new(Registry::from_records(
            records,
            &normalizer,
            segmenter.as_ref(),
        ));
        CompanyMatcher::new(normalizer, registry, scorer, segmenter)
    }

    #[test]
    fn test_missing_input() {
        let matcher = matcher_with(Box::new(FixedScorer(100)));
        assert_eq!(matcher.match_name(None, Some("X"), 70), "");
        assert_eq!(
            matcher.decide(None, None, 70),
            MatchDecision::Rejected(RejectReason::MissingInput)
        );
    }

    #[test]
    fn test_empty_after_normalization() {
        let matcher = matcher_with(Box::new(FixedScorer(100)));
        for raw in ["", "  ", "***", "Ltd."] {
            assert_eq!(
                matcher.decide(Some(raw), None, 70),
                MatchDecision::Rejected(RejectReason::EmptyAfterNormalization),
                "输入: {raw}"
            );
        }
    }

    #[test]
    fn test_threshold_boundary() {
        let matcher = matcher_with(Box::new(FixedScorer(70)));
        assert_eq!(matcher.match_name(Some("Acme Corp"), None, 70), "Acme Corp");
        assert_eq!(matcher.match_name(Some("Acme Corp"), None, 71), "");
        assert_eq!(
            matcher.decide(Some("Acme Corp"), None, 71),
            MatchDecision::Rejected(RejectReason::BelowThreshold {
                score: 70,
                threshold: 71
            })
        );
    }

    #[test]
    fn test_threshold_above_100_rejects_everything() {
        let matcher = matcher_with(Box::new(FixedScorer(100)));
        assert_eq!(matcher.match_name(Some("Acme Corp"), None, 101), "");
    }

    #[test]
    fn test_alias_precedence() {
        let matcher = matcher_with(Box::new(FixedScorer(100)));

        // 期望名是别名：原样回显
        assert_eq!(
            matcher.match_name(Some("Acme International"), Some("acme international"), 70),
            "acme international"
        );
        // 期望名是规范名：返回规范名
        assert_eq!(
            matcher.match_name(Some("Acme International"), Some("ACME CORP"), 70),
            "Acme Corp"
        );
        // 期望名无关：返回规范名
        assert_eq!(
            matcher.match_name(Some("Acme International"), Some("Other Inc"), 70),
            "Acme Corp"
        );
        assert_eq!(
            matcher.match_name(Some("Acme International"), None, 70),
            "Acme Corp"
        );
    }

    #[test]
    fn test_required_search_string_counts_as_alias() {
        let matcher = matcher_with(Box::new(FixedScorer(100)));
        assert_eq!(matcher.match_name(Some("GCB"), Some("GCB"), 70), "GCB");

        match matcher.decide(Some("GCB"), None, 70) {
            MatchDecision::Matched(result) => {
                assert_eq!(result.matched_name, "Global Century Bank Ltd");
                assert_eq!(result.record_id, Some(1));
                assert!(result.is_alias);
                assert_eq!(result.candidate, "gcb");
            }
            other => panic!("期望匹配成功: {other:?}"),
        }
    }

    #[test]
    fn test_registry_desync_rejects() {
        let matcher = matcher_with(Box::new(GhostScorer));
        assert_eq!(matcher.match_name(Some("Acme Corp"), None, 70), "");
        assert_eq!(
            matcher.decide(Some("Acme Corp"), None, 70),
            MatchDecision::Rejected(RejectReason::RegistryDesync {
                candidate: "ghost".to_string()
            })
        );
    }

    #[test]
    fn test_with_default_scorer() {
        let matcher = matcher_with(Box::new(FuzzyScorer::default()));
        assert_eq!(
            matcher.match_name(Some("ACME Corporation"), None, 70),
            "Acme Corp"
        );
        assert_eq!(
            matcher.match_name(Some("Global Century Bank"), None, 70),
            "Global Century Bank Ltd"
        );
        assert_eq!(matcher.match_name(Some("Zenith Dynamics"), None, 70), "");
    }

    #[test]
    fn test_name_emptied_by_later_pass_still_matches_itself() {
        let normalizer = Arc::new(NameNormalizer::with_defaults().expect("内置规则可编译"));
        let segmenter: Arc<dyn WordSegmenter> = Arc::new(WhitespaceSegmenter);
        let records = vec![
            CompanyRecord::new("Acme Corp"),
            CompanyRecord::new("Group Holdings Ltd Inc"),
        ];
        let registry = Arc::new(Registry::from_records(
            records,
            &normalizer,
            segmenter.as_ref(),
        ));
        let matcher = CompanyMatcher::new(
            normalizer,
            registry,
            Box::new(FuzzyScorer::default()),
            segmenter,
        );

        match matcher.decide(Some("Group Holdings Ltd Inc"), None, 70) {
            MatchDecision::Matched(result) => {
                assert_eq!(result.matched_name, "Group Holdings Ltd Inc");
                assert_eq!(result.record_id, Some(1));
                assert_eq!(result.score, 100);
                assert_eq!(result.candidate, "group holdings ltd inc");
            }
            other => panic!("期望匹配成功: {other:?}"),
        }
    }

    #[test]
    fn test_from_config_requires_registry() {
        assert!(CompanyMatcher::from_config(&AppConfig::new()).is_err());
    }
}
