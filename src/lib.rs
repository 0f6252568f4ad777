//! 公司名称匹配
//!
//! 把多文种公司名规范化为稳定形式，在公司库中找出最相似的记录，
//! 按阈值和别名规则给出最终结果。

pub mod config;
pub mod evaluation;
pub mod matching;
pub mod normalizer;
pub mod registry;

pub use config::AppConfig;
pub use matching::{CompanyMatcher, MatchDecision, MatchResult, RejectReason};
pub use normalizer::{CanonicalName, NameNormalizer};
pub use registry::{CompanyRecord, Registry};

use tracing_subscriber::EnvFilter;

/// 初始化日志：`RUST_LOG` 控制级别（默认 info），输出到 stderr
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
