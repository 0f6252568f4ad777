// 匹配判定类型定义
//
// 定义了判定过程产生的所有类型，包括：
// - 匹配结果 (MatchResult)
// - 拒绝原因 (RejectReason)
// - 最终判定 (MatchDecision)

use serde::Serialize;

/// 匹配结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchResult {
    /// 返回给调用方的名称（规范名或回显的别名）
    pub matched_name: String,
    /// 0-100
    pub score: u8,
    /// 公司库中的记录下标
    pub record_id: Option<usize>,
    /// 命中的候选是否来自别名
    pub is_alias: bool,
    /// 命中的候选串（规范化后）
    pub candidate: String,
}

/// 拒绝原因
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RejectReason {
    /// 没有输入
    MissingInput,
    /// 规范化后为空
    EmptyAfterNormalization,
    /// 打分器没有给出候选
    NoCandidate,
    /// 分数低于阈值
    BelowThreshold { score: u8, threshold: u8 },
    /// 候选无法对应到公司库记录
    RegistryDesync { candidate: String },
}

impl RejectReason {
    /// 获取原因的显示名称
    pub fn display_name(&self) -> &'static str {
        match self {
            RejectReason::MissingInput => "无输入",
            RejectReason::EmptyAfterNormalization => "规范化后为空",
            RejectReason::NoCandidate => "无候选",
            RejectReason::BelowThreshold { .. } => "低于阈值",
            RejectReason::RegistryDesync { .. } => "候选与公司库不一致",
        }
    }
}

/// 最终判定
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "snake_case")]
pub enum MatchDecision {
    Matched(MatchResult),
    Rejected(RejectReason),
}

impl MatchDecision {
    pub fn is_match(&self) -> bool {
        matches!(self, MatchDecision::Matched(_))
    }

    /// 匹配到的名称，拒绝时为空串
    pub fn name(&self) -> &str {
        match self {
            MatchDecision::Matched(result) => &result.matched_name,
            MatchDecision::Rejected(_) => "",
        }
    }

    pub fn into_name(self) -> String {
        match self {
            MatchDecision::Matched(result) => result.matched_name,
            MatchDecision::Rejected(_) => String::new(),
        }
    }

    /// 打分器给出的分数（未进入打分阶段时为 `None`）
    pub fn score(&self) -> Option<u8> {
        match self {
            MatchDecision::Matched(result) => Some(result.score),
            MatchDecision::Rejected(RejectReason::BelowThreshold { score, .. }) => Some(*score),
            MatchDecision::Rejected(_) => None,
        }
    }
}
