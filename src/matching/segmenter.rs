//! 分词器
//!
//! 查询和候选使用同一个分词器，保证两侧的词边界一致。

use std::sync::Arc;

use jieba_rs::Jieba;

use crate::config::SegmenterKind;

/// 分词器
pub trait WordSegmenter: Send + Sync {
    /// 切词，结果不含空白词
    fn cut(&self, text: &str) -> Vec<String>;

    /// 切词后以单个空格连接
    fn cut_joined(&self, text: &str) -> String {
        self.cut(text).join(" ")
    }
}

/// jieba 中文分词（启用 HMM 识别未登录词）
pub struct JiebaSegmenter {
    jieba: Jieba,
}

impl JiebaSegmenter {
    pub fn new() -> Self {
        Self {
            jieba: Jieba::new(),
        }
    }
}

impl Default for JiebaSegmenter {
    fn default() -> Self {
        Self::new()
    }
}

impl WordSegmenter for JiebaSegmenter {
    fn cut(&self, text: &str) -> Vec<String> {
        self.jieba
            .cut(text, true)
            .into_iter()
            .map(str::trim)
            .filter(|w| !w.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// 仅按空白切分
#[derive(Debug, Default)]
pub struct WhitespaceSegmenter;

impl WordSegmenter for WhitespaceSegmenter {
    fn cut(&self, text: &str) -> Vec<String> {
        text.split_whitespace().map(str::to_string).collect()
    }
}

/// 按配置创建分词器
pub fn segmenter_for(kind: SegmenterKind) -> Arc<dyn WordSegmenter> {
    match kind {
        SegmenterKind::Jieba => Arc::new(JiebaSegmenter::new()),
        SegmenterKind::Whitespace => Arc::new(WhitespaceSegmenter),
    }
}
