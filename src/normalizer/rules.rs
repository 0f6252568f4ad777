//! 规范化规则定义
//!
//! 包含组织后缀、领域关键词、通用修饰词三类词表，启动时编译一次后只读共享。

use aho_corasick::{AhoCorasick, MatchKind};
use anyhow::{Context, Result};
use regex::Regex;

use crate::config::NormalizerConfig;
use crate::normalizer::types::contains_cjk;

/// 中文组织后缀（少见）
///
/// 中文后缀不要求词边界，出现在任意位置都会被移除。
/// 按列表顺序优先匹配，"有限公司" 会先命中 "有限" 再命中 "公司"。
const ZH_ORG_SUFFIXES_UNCOMMON: &[&str] = &[
    "总公司", "股份", "控股", "责任", "有限", "企业", "协会", "合作社", "株式会社",
];

/// 中文组织后缀（常见）
const ZH_ORG_SUFFIXES_COMMON: &[&str] = &[
    "公司", "集团", "有限公司", "有限责任公司", "股份有限公司",
];

/// 英文组织后缀（少见）
const EN_ORG_SUFFIXES_UNCOMMON: &[&str] = &[
    "corporation limited",
    "companies",
    "worldwide",
    "limited",
    "holding",
    "holdings",
    "com",
    "gmbh",
    "ag",
    "plc",
    "sal",
    "spa",
    "s.p.a",
    "sab cv",
    "sa",
    "nv",
    "n.v",
    "lp",
    "sro",
    "kg",
    "aktiengesellschaft",
    "de cv",
    "ltda",
    "group of companies",
];

/// 英文组织后缀（常见）
const EN_ORG_SUFFIXES_COMMON: &[&str] = &[
    "company",
    "group",
    "corporation",
    "incorporated",
    "enterprise",
    "enterprises",
    "co",
    "inc",
    "corp",
    "ltd",
    "llc",
    "se",
    "pvt",
];

/// 中文通用修饰词
const ZH_COMMON_WORDS: &[&str] = &["实验室", "研究院", "技术", "科技"];

/// 英文通用修饰词
const EN_COMMON_WORDS: &[&str] = &[
    "laboratory",
    "laboratories",
    "lab",
    "labs",
    "research",
    "technology",
    "technologies",
    "technical",
    "tech",
    "sci",
    "science",
];

/// 领域关键词（正则片段）
///
/// 命中这些词说明名称的身份信息集中在一个通用词上，剥离后缀时需要保护。
const KEYWORD_PATTERNS: &[&str] = &[
    "bank",
    "college",
    "university",
    "education",
    "energy",
    "finance",
    "army",
    "air force",
    "navy",
    "industry",
    "hospital",
    "hotel",
    "institutes?",
    "institution",
    "petroleum",
    "oil",
    "health",
    "electronic",
    "commercial",
    "environmental",
    "gover(?:nor?|ment)",
    "state",
    "estado",
    "procter",
    "reliance",
    "genome",
    "software",
    "hardware",
    "agency",
    r"(?:sou|nor)th(?:[-\s]?(?:ea|we)st(?:ern)?)?",
    "[东西南北]方",
    "[东西][南北][方]?",
    "环境",
    "银行",
    "软件",
    "硬件",
    "大学",
    "机构",
    "研究院",
    "学院",
    "教育",
    "协会",
    "能源",
    "金融",
    "旅馆",
    "医院",
    "石油",
    "电子",
    "工业",
    "[陆海空]军",
    "政府",
    "基因",
    "global",
    "market(?:ing)?",
    "real estate",
    "system",
    "房地产",
    "系统",
    "兴业",
];

/// 编译后的词表
pub struct Vocabulary {
    zh_suffixes: AhoCorasick,
    zh_suffix_count: usize,
    en_suffixes: Regex,
    zh_common: AhoCorasick,
    zh_common_count: usize,
    en_common: Regex,
    keywords: Regex,
}

impl Vocabulary {
    /// 按配置编译词表（内置词表 + 配置追加的词）
    pub fn new(config: &NormalizerConfig) -> Result<Self> {
        let (extra_zh_suffixes, extra_en_suffixes) = split_by_script(&config.extra_org_suffixes);
        let (extra_zh_common, extra_en_common) = split_by_script(&config.extra_common_words);

        let zh_suffix_list: Vec<String> = ZH_ORG_SUFFIXES_UNCOMMON
            .iter()
            .chain(ZH_ORG_SUFFIXES_COMMON)
            .map(|s| s.to_string())
            .chain(extra_zh_suffixes)
            .collect();
        let zh_suffixes = leftmost_first(&zh_suffix_list).context("编译中文后缀词表失败")?;

        let en_suffix_alternation = EN_ORG_SUFFIXES_UNCOMMON
            .iter()
            .chain(EN_ORG_SUFFIXES_COMMON)
            .map(|s| regex::escape(s))
            .chain(extra_en_suffixes.iter().map(|s| regex::escape(s)))
            .collect::<Vec<_>>()
            .join("|");
        let en_suffixes = Regex::new(&format!(r"(?i)\b(?:{en_suffix_alternation})(?:\.|$)"))
            .context("编译英文后缀正则失败")?;

        let zh_common_list: Vec<String> = ZH_COMMON_WORDS
            .iter()
            .map(|s| s.to_string())
            .chain(extra_zh_common)
            .collect();
        let zh_common = leftmost_first(&zh_common_list).context("编译中文通用词表失败")?;

        let en_common_alternation = EN_COMMON_WORDS
            .iter()
            .map(|s| regex::escape(s))
            .chain(extra_en_common.iter().map(|s| regex::escape(s)))
            .collect::<Vec<_>>()
            .join("|");
        let en_common = Regex::new(&format!(
            r"(?i)(?:\b|^)(?:{en_common_alternation})(?:\.|\b|$)"
        ))
        .context("编译英文通用词正则失败")?;

        let keyword_alternation = KEYWORD_PATTERNS
            .iter()
            .map(|s| s.to_string())
            .chain(config.extra_keywords.iter().map(|s| regex::escape(s.trim())))
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("|");
        let keywords = Regex::new(&format!(r"(?i)\b(?:{keyword_alternation})\b"))
            .context("编译领域关键词正则失败")?;

        Ok(Self {
            zh_suffixes,
            zh_suffix_count: zh_suffix_list.len(),
            en_suffixes,
            zh_common,
            zh_common_count: zh_common_list.len(),
            en_common,
            keywords,
        })
    }

    /// 内置词表
    pub fn builtin() -> Result<Self> {
        Self::new(&NormalizerConfig::default())
    }

    /// 移除一遍组织后缀（不折叠空白）
    pub fn strip_org_suffixes(&self, text: &str) -> String {
        let without_zh = self
            .zh_suffixes
            .replace_all(text, &vec![""; self.zh_suffix_count]);
        self.en_suffixes.replace_all(&without_zh, "").into_owned()
    }

    /// 把通用修饰词替换为 `replacement`
    pub fn strip_common_words(&self, text: &str, replacement: &str) -> String {
        let without_zh = self
            .zh_common
            .replace_all(text, &vec![replacement; self.zh_common_count]);
        self.en_common
            .replace_all(&without_zh, replacement)
            .into_owned()
    }

    /// 第一个领域关键词的长度（字符数）
    pub fn first_keyword_len(&self, text: &str) -> Option<usize> {
        self.keywords
            .find(text)
            .map(|m| m.as_str().chars().count())
    }
}

/// 按文种拆分配置追加的词：含 CJK 的走多模式匹配，其余走词边界正则
fn split_by_script(words: &[String]) -> (Vec<String>, Vec<String>) {
    words
        .iter()
        .map(|w| w.trim().to_string())
        .filter(|w| !w.is_empty())
        .partition(|w| contains_cjk(w))
}

fn leftmost_first(patterns: &[String]) -> Result<AhoCorasick> {
    Ok(AhoCorasick::builder()
        .match_kind(MatchKind::LeftmostFirst)
        .build(patterns)?)
}
