// src/config.rs

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ============================================================================
// 规范化配置
// ============================================================================

/// 规范化配置
///
/// 追加的词会并入内置词表，含 CJK 的词按子串匹配，其余按词边界匹配。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NormalizerConfig {
    /// 保留重复的拉丁词（权威公司名字段）
    #[serde(default = "default_preserve_repeated_tokens")]
    pub preserve_repeated_tokens: bool,
    /// 追加的组织后缀
    #[serde(default)]
    pub extra_org_suffixes: Vec<String>,
    /// 追加的通用修饰词
    #[serde(default)]
    pub extra_common_words: Vec<String>,
    /// 追加的领域关键词（按字面匹配）
    #[serde(default)]
    pub extra_keywords: Vec<String>,
}

fn default_preserve_repeated_tokens() -> bool {
    true
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            preserve_repeated_tokens: default_preserve_repeated_tokens(),
            extra_org_suffixes: Vec::new(),
            extra_common_words: Vec::new(),
            extra_keywords: Vec::new(),
        }
    }
}

// ============================================================================
// 打分配置
// ============================================================================

/// 默认打分器配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScorerConfig {
    /// 词序无关比较的权重
    #[serde(default = "default_token_weight")]
    pub token_weight: f64,
    /// 是否启用拼音比较（两侧都含 CJK 时）
    #[serde(default = "default_enable_pinyin")]
    pub enable_pinyin: bool,
    /// 拼音比较的权重
    #[serde(default = "default_pinyin_weight")]
    pub pinyin_weight: f64,
}

fn default_token_weight() -> f64 {
    0.95
}

fn default_enable_pinyin() -> bool {
    true
}

fn default_pinyin_weight() -> f64 {
    0.9
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            token_weight: default_token_weight(),
            enable_pinyin: default_enable_pinyin(),
            pinyin_weight: default_pinyin_weight(),
        }
    }
}

impl ScorerConfig {
    pub fn validate(&self) -> Result<()> {
        for (name, weight) in [
            ("token_weight", self.token_weight),
            ("pinyin_weight", self.pinyin_weight),
        ] {
            if !(0.0..=1.0).contains(&weight) {
                anyhow::bail!("{} 必须在 0 到 1 之间，当前为 {}", name, weight);
            }
        }
        Ok(())
    }
}

// ============================================================================
// 分词器选择
// ============================================================================

/// 查询与候选使用的分词器
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SegmenterKind {
    /// jieba 中文分词（默认）
    #[default]
    Jieba,
    /// 仅按空白切分
    Whitespace,
}

// ============================================================================
// 应用配置
// ============================================================================

/// 默认匹配阈值
pub const DEFAULT_THRESHOLD: u8 = 70;

fn default_threshold() -> u8 {
    DEFAULT_THRESHOLD
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    /// 公司库文件（JSON lines）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry_path: Option<PathBuf>,
    /// 接受匹配的最低分数（0-100）
    #[serde(default = "default_threshold")]
    pub threshold: u8,
    #[serde(default)]
    pub normalizer: NormalizerConfig,
    #[serde(default)]
    pub scorer: ScorerConfig,
    #[serde(default)]
    pub segmenter: SegmenterKind,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self {
            registry_path: None,
            threshold: default_threshold(),
            normalizer: NormalizerConfig::default(),
            scorer: ScorerConfig::default(),
            segmenter: SegmenterKind::default(),
        }
    }

    /// 验证配置
    pub fn validate(&self) -> Result<()> {
        if self.threshold > 100 {
            anyhow::bail!("阈值必须在 0 到 100 之间，当前为 {}", self.threshold);
        }
        self.scorer
            .validate()
            .map_err(|e| anyhow::anyhow!("打分配置无效: {}", e))?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or_else(|| anyhow::anyhow!("无法获取配置目录"))?;
        let app_dir = config_dir.join("CompanyMatcher");
        std::fs::create_dir_all(&app_dir)?;
        Ok(app_dir.join("config.json"))
    }

    /// 从默认路径加载
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// 从指定路径加载，文件不存在时返回默认配置
    pub fn load_from(path: &Path) -> Result<Self> {
        tracing::info!("尝试从以下路径加载配置: {:?}", path);

        if !path.exists() {
            tracing::warn!("配置文件不存在，使用默认配置");
            return Ok(Self::new());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("读取配置文件失败: {}", path.display()))?;
        let config: AppConfig = serde_json::from_str(&content)
            .with_context(|| format!("解析配置文件失败: {}", path.display()))?;
        config.validate()?;

        tracing::info!("配置加载成功");
        Ok(config)
    }

    /// 保存到默认路径
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// 写出配置：先写同目录临时文件，再重命名替换目标文件
    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.validate()?;
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("创建配置目录失败: {}", dir.display()))?;
        }

        let content = serde_json::to_string_pretty(self)?;
        let temp_path = path.with_extension("json.tmp");
        std::fs::write(&temp_path, content)
            .with_context(|| format!("写入临时配置失败: {}", temp_path.display()))?;

        if let Err(e) = std::fs::rename(&temp_path, path) {
            let _ = std::fs::remove_file(&temp_path);
            return Err(e).with_context(|| format!("替换配置文件失败: {}", path.display()));
        }

        tracing::info!("配置已保存: {:?}", path);
        Ok(())
    }
}
