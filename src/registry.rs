// 公司库
//
// 从 JSON lines 加载公司记录，启动时把规范名、必搜串、别名预先规范化为候选串。
// 加载后只读，可在线程间共享。

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;

use crate::matching::WordSegmenter;
use crate::normalizer::NameNormalizer;

/// 公司记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompanyRecord {
    /// 在公司库中的下标
    pub index: usize,
    /// 源文件中的 id（可选，数字会转为字符串）
    pub id: Option<String>,
    pub canonical_name: String,
    pub aliases: Vec<String>,
    pub required_search_strings: Vec<String>,
}

impl CompanyRecord {
    pub fn new(canonical_name: impl Into<String>) -> Self {
        Self {
            index: 0,
            id: None,
            canonical_name: canonical_name.into(),
            aliases: Vec::new(),
            required_search_strings: Vec::new(),
        }
    }

    pub fn with_aliases(mut self, aliases: &[&str]) -> Self {
        self.aliases = aliases.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_required_search_strings(mut self, strings: &[&str]) -> Self {
        self.required_search_strings = strings.iter().map(|s| s.to_string()).collect();
        self
    }

    /// 别名与必搜串，按此顺序
    pub fn alternate_names(&self) -> impl Iterator<Item = &str> {
        self.aliases
            .iter()
            .chain(&self.required_search_strings)
            .map(String::as_str)
    }

    /// 从一行 JSON 宽松解析
    ///
    /// `companyName` 必须是非空字符串；`aliases`/`requiredSearchStrings`
    /// 不是数组时视为空，数组中的非字符串项跳过。
    fn from_value(value: &Value) -> Option<Self> {
        let canonical_name = value.get("companyName")?.as_str()?.trim();
        if canonical_name.is_empty() {
            return None;
        }

        let id = match value.get("id") {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        };

        Some(Self {
            index: 0,
            id,
            canonical_name: canonical_name.to_string(),
            aliases: string_list(value.get("aliases")),
            required_search_strings: string_list(value.get("requiredSearchStrings")),
        })
    }
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

/// 候选串的来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntrySource {
    CanonicalName,
    RequiredSearchString,
    Alias,
}

impl EntrySource {
    pub fn is_alias(self) -> bool {
        self != EntrySource::CanonicalName
    }
}

/// 加载统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadStats {
    pub records: usize,
    pub skipped_lines: usize,
    pub candidates: usize,
}

/// 公司库
pub struct Registry {
    records: Vec<CompanyRecord>,
    /// 去重后的候选串，按首次出现顺序
    candidates: Vec<String>,
    /// 候选串 -> (记录下标, 来源)
    owners: HashMap<String, (usize, EntrySource)>,
    stats: LoadStats,
}

impl Registry {
    /// 从 JSON lines 文件加载
    pub fn load(
        path: &Path,
        normalizer: &NameNormalizer,
        segmenter: &dyn WordSegmenter,
    ) -> Result<Self> {
        tracing::info!("加载公司库: {:?}", path);
        let file =
            File::open(path).with_context(|| format!("打开公司库失败: {}", path.display()))?;
        Self::from_reader(BufReader::new(file), normalizer, segmenter)
    }

    /// 从任意按行读取的来源加载
    ///
    /// 空行跳过；无法解析或缺少 `companyName` 的行记一次跳过并告警。
    pub fn from_reader<R: BufRead>(
        reader: R,
        normalizer: &NameNormalizer,
        segmenter: &dyn WordSegmenter,
    ) -> Result<Self> {
        let mut records = Vec::new();
        let mut skipped_lines = 0;

        for (line_no, line) in reader.lines().enumerate() {
            let line = line.with_context(|| format!("读取公司库第 {} 行失败", line_no + 1))?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let record = serde_json::from_str::<Value>(line)
                .ok()
                .and_then(|value| CompanyRecord::from_value(&value));
            match record {
                Some(record) => records.push(record),
                None => {
                    tracing::warn!("跳过无效的公司库记录，第 {} 行", line_no + 1);
                    skipped_lines += 1;
                }
            }
        }

        let mut registry = Self::from_records(records, normalizer, segmenter);
        registry.stats.skipped_lines = skipped_lines;
        tracing::info!(
            "公司库加载完成: {} 条记录, {} 个候选, 跳过 {} 行",
            registry.stats.records,
            registry.stats.candidates,
            registry.stats.skipped_lines
        );
        Ok(registry)
    }

    /// 由内存中的记录构建
    ///
    /// 每条记录依次产生规范名、必搜串、别名三类候选，与查询走同一条规范化流程；
    /// 规范化为空时退回只做分词过滤的文本。同一候选串归属第一条产生它的记录。
    pub fn from_records(
        mut records: Vec<CompanyRecord>,
        normalizer: &NameNormalizer,
        segmenter: &dyn WordSegmenter,
    ) -> Self {
        let mut candidates = Vec::new();
        let mut owners = HashMap::new();

        for (index, record) in records.iter_mut().enumerate() {
            record.index = index;

            let canonical = (record.canonical_name.as_str(), EntrySource::CanonicalName);
            let entries = std::iter::once(canonical)
                .chain(
                    record
                        .required_search_strings
                        .iter()
                        .map(|s| (s.as_str(), EntrySource::RequiredSearchString)),
                )
                .chain(record.aliases.iter().map(|s| (s.as_str(), EntrySource::Alias)));

            for (text, source) in entries {
                let normalized = normalizer
                    .match_key(text)
                    .unwrap_or_else(|| normalizer.filter_only(text));
                let candidate = segmenter.cut_joined(&normalized);
                if candidate.is_empty() {
                    tracing::debug!("候选为空，跳过: {}", text);
                    continue;
                }
                if owners.contains_key(&candidate) {
                    continue;
                }
                owners.insert(candidate.clone(), (index, source));
                candidates.push(candidate);
            }
        }

        let stats = LoadStats {
            records: records.len(),
            skipped_lines: 0,
            candidates: candidates.len(),
        };

        Self {
            records,
            candidates,
            owners,
            stats,
        }
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    pub fn records(&self) -> &[CompanyRecord] {
        &self.records
    }

    pub fn stats(&self) -> LoadStats {
        self.stats
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 候选串对应的记录
    pub fn resolve(&self, candidate: &str) -> Option<&CompanyRecord> {
        self.owner(candidate).map(|(record, _)| record)
    }

    /// 候选串对应的记录及候选来源
    pub fn owner(&self, candidate: &str) -> Option<(&CompanyRecord, EntrySource)> {
        let (index, source) = self.owners.get(candidate)?;
        self.records.get(*index).map(|record| (record, *source))
    }
}
