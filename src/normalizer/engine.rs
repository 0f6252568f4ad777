//! 名称规范化主引擎
//!
//! 组合变音折叠、符号规整、公司词剥离、最终分词过滤

use anyhow::Result;

use crate::config::NormalizerConfig;
use crate::normalizer::diacritics::DiacriticFolder;
use crate::normalizer::punctuation::PunctuationRegulator;
use crate::normalizer::rules::Vocabulary;
use crate::normalizer::stripper::CompanyWordStripper;
use crate::normalizer::token_filter::TokenFilter;
use crate::normalizer::types::{CanonicalName, FieldKind};

/// 名称规范化引擎（可复用，预编译规则）
pub struct NameNormalizer {
    folder: DiacriticFolder,
    regulator: PunctuationRegulator,
    stripper: CompanyWordStripper,
    filter: TokenFilter,
    /// 默认字段类型
    field: FieldKind,
}

impl NameNormalizer {
    /// 按配置创建引擎
    pub fn new(config: &NormalizerConfig) -> Result<Self> {
        let field = if config.preserve_repeated_tokens {
            FieldKind::CompanyName
        } else {
            FieldKind::FreeText
        };

        Ok(Self {
            folder: DiacriticFolder::new(),
            regulator: PunctuationRegulator::new()?,
            stripper: CompanyWordStripper::new(Vocabulary::new(config)?),
            filter: TokenFilter::new(),
            field,
        })
    }

    /// 使用内置词表创建引擎
    pub fn with_defaults() -> Result<Self> {
        Self::new(&NormalizerConfig::default())
    }

    /// 变音折叠 + 符号规整
    pub fn regulate(&self, raw: &str) -> Option<String> {
        self.regulator.regulate(&self.folder.fold(raw))
    }

    /// 按引擎默认字段类型规范化
    pub fn normalize(&self, raw: &str) -> Option<CanonicalName> {
        self.normalize_field(raw, self.field)
    }

    /// 规范化为规范名
    ///
    /// 单遍处理不一定是不动点（如剥离后缀后露出新的后缀），
    /// 因此对输出反复处理直到不再变化。每遍只会删除或粘连 token，
    /// 轮数以首遍 token 数加二为上界。任何一遍结果为空都返回 `None`。
    pub fn normalize_field(&self, raw: &str, field: FieldKind) -> Option<CanonicalName> {
        let mut current = self.canonicalize_once(raw, field)?;
        let max_rounds = current.len() + 2;

        for _ in 0..max_rounds {
            let next = self.canonicalize_once(&current.as_text(), field)?;
            if next == current {
                return Some(current);
            }
            current = next;
        }

        tracing::debug!("规范化未在上界内收敛: {} -> {}", raw, current);
        Some(current)
    }

    /// 规范化为文本，结果为空时返回空串
    pub fn normalize_str(&self, raw: &str) -> String {
        self.normalize(raw)
            .map(|name| name.as_text())
            .unwrap_or_default()
    }

    /// 匹配用的规范文本（查询与公司库候选共用）
    ///
    /// 首遍处理即为空时返回 `None`；首遍非空、后续某遍才变空时，
    /// 退回 [`filter_only`](Self::filter_only) 的结果，使这类名称仍可被精确匹配。
    pub fn match_key(&self, raw: &str) -> Option<String> {
        if let Some(name) = self.normalize(raw) {
            return Some(name.as_text());
        }
        self.canonicalize_once(raw, self.field)?;
        tracing::debug!("多遍规范化后为空，退回分词过滤: {}", raw);
        Some(self.filter_only(raw))
    }

    /// 只做变音折叠和最终分词过滤，不剥离任何词
    ///
    /// 用于规范化结果为空时的候选兜底（如名称本身就是 "Group"）。
    pub fn filter_only(&self, raw: &str) -> String {
        let tokens = self.filter.filter(&self.folder.fold(raw), self.field);
        CanonicalName::new(tokens).as_text()
    }

    /// 单遍处理
    fn canonicalize_once(&self, text: &str, field: FieldKind) -> Option<CanonicalName> {
        let regulated = self.regulate(text)?;
        let stripped = self.stripper.strip(&regulated)?;
        let tokens = self.filter.filter(&stripped, field);
        if tokens.is_empty() {
            None
        } else {
            Some(CanonicalName::new(tokens))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> NameNormalizer {
        NameNormalizer::with_defaults().expect("内置规则可编译")
    }

    fn assert_idempotent(engine: &NameNormalizer, raw: &str) {
        let once = engine.normalize_str(raw);
        assert_eq!(engine.normalize_str(&once), once, "输入: {raw}");
    }

    #[test]
    fn test_sequential_letters() {
        assert_eq!(engine().normalize_str("I B M Corp"), "ibm");
    }

    #[test]
    fn test_keyword_not_over_stripped() {
        let engine = engine();
        assert_eq!(
            engine.normalize_str("Global Century Bank Ltd"),
            "global century bank"
        );
        assert_eq!(engine.normalize_str("Bank Ltd"), "bank ltd");
    }

    #[test]
    fn test_diacritics_and_suffix() {
        assert_eq!(
            engine().normalize_str("Société Générale S.A."),
            "societe generale"
        );
    }

    #[test]
    fn test_chinese_names() {
        let engine = engine();
        assert_eq!(engine.normalize_str("中国平安保险股份有限公司"), "中国平安保险");
        assert_eq!(engine.normalize_str("华为技术有限公司"), "华为");
        assert_eq!(engine.normalize_str("IBM中国有限公司"), "ibm 中国");
    }

    #[test]
    fn test_stacked_suffixes_converge() {
        // 单遍只剥两层，不动点处理剥掉第三层
        assert_eq!(engine().normalize_str("Foo Holdings Group Ltd"), "foo");
    }

    #[test]
    fn test_empty_results() {
        let engine = engine();
        assert!(engine.normalize("").is_none());
        assert!(engine.normalize("   ").is_none());
        assert!(engine.normalize("Ltd.").is_none());
        assert!(engine.normalize("有限公司").is_none());
        assert_eq!(engine.normalize_str("***"), "");
    }

    #[test]
    fn test_non_cjk_output_has_no_erased_symbols() {
        let engine = engine();
        for raw in [
            "A/B Testing Inc.",
            "50% Off! Ltd",
            "Caret^Star*Dot·Bullet•Ring⦁",
            r"Back\Slash-Dash? Co",
        ] {
            let out = engine.normalize_str(raw);
            assert!(
                !out.chars().any(|c| "/\\%!.?^*·•⦁-".contains(c)),
                "输入: {raw} 输出: {out}"
            );
        }
    }

    #[test]
    fn test_idempotence() {
        let engine = engine();
        for raw in [
            "I B M Corp",
            "Global Century Bank Ltd",
            "Foo Holdings Group Ltd",
            "The Body Shop",
            "The Body",
            "Apple a Pie Inc",
            "Tata Tata Group",
            "AT&T Inc.",
            "Société Générale S.A.",
            "中国平安保险股份有限公司",
            "IBM中国有限公司",
            "北京 2020 科技有限公司",
            "x y z Technologies",
            "Bank Ltd",
        ] {
            assert_idempotent(&engine, raw);
        }
    }

    #[test]
    fn test_filter_only_keeps_suffixes() {
        let engine = engine();
        assert_eq!(engine.filter_only("The Group Ltd."), "the group ltd");
        assert_eq!(engine.filter_only("Société"), "societe");
        assert_eq!(engine.filter_only("IBM中国 Group"), "ibm中国 group");
    }

    #[test]
    fn test_match_key_falls_back_when_later_pass_empties() {
        let engine = engine();
        // 首遍得到 "group holdings"，再处理一遍会剥光
        assert!(engine.normalize("Group Holdings Ltd Inc").is_none());
        assert_eq!(
            engine.match_key("Group Holdings Ltd Inc").as_deref(),
            Some("group holdings ltd inc")
        );
        // 首遍即为空
        assert_eq!(engine.match_key("Ltd."), None);
        assert_eq!(engine.match_key("有限公司"), None);
        assert_eq!(engine.match_key("Acme Corp").as_deref(), Some("acme"));
    }

    #[test]
    fn test_free_text_dedupes() {
        let config = NormalizerConfig {
            preserve_repeated_tokens: false,
            ..Default::default()
        };
        let engine = NameNormalizer::new(&config).expect("规则可编译");
        assert_eq!(engine.normalize_str("Tata Tata Motors"), "tata motors");
        assert_eq!(
            engine
                .normalize_field("Tata Tata Motors", FieldKind::CompanyName)
                .map(|n| n.as_text())
                .as_deref(),
            Some("tata tata motors")
        );
    }
}
