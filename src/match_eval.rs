// 离线评估工具 - 在测试用例上跑匹配并统计指标
//
// 单阈值：
//   match_eval --registry companies.jsonl --cases cases.csv --output results.csv
// 阈值扫描（每个阈值一份结果 + calculate_score.csv）：
//   match_eval --registry companies.jsonl --cases cases.csv --sweep 65..=95 --out-dir out/

use std::ops::RangeInclusive;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use company_matcher_lib::evaluation::{self, Metrics};
use company_matcher_lib::{init_tracing, AppConfig, CompanyMatcher};

#[derive(Parser)]
#[command(name = "match_eval")]
#[command(about = "Evaluate company matching against labelled cases")]
struct Args {
    /// 配置文件路径（默认使用系统配置目录）
    #[arg(long)]
    config: Option<PathBuf>,

    /// 公司库文件（JSON lines），覆盖配置中的路径
    #[arg(long)]
    registry: Option<PathBuf>,

    /// 用例 CSV（列：company name, expected company name）
    #[arg(long)]
    cases: PathBuf,

    /// 单阈值模式的阈值，默认取配置
    #[arg(long)]
    threshold: Option<u8>,

    /// 单阈值模式的结果文件
    #[arg(long, default_value = "company_name_matching_results.csv")]
    output: PathBuf,

    /// 阈值扫描范围，如 65..=95 或 65-95
    #[arg(long, value_parser = parse_range)]
    sweep: Option<RangeInclusive<u8>>,

    /// 扫描模式的输出目录
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
}

fn parse_range(value: &str) -> Result<RangeInclusive<u8>> {
    let (start, end) = value
        .split_once("..=")
        .or_else(|| value.split_once('-'))
        .ok_or_else(|| anyhow::anyhow!("阈值范围格式应为 起点..=终点: {}", value))?;
    let start: u8 = start.trim().parse().context("无效的起始阈值")?;
    let end: u8 = end.trim().parse().context("无效的结束阈值")?;
    if start > end {
        anyhow::bail!("起始阈值不能大于结束阈值: {}", value);
    }
    Ok(start..=end)
}

fn print_metrics(metrics: &Metrics) {
    println!(
        "threshold={} TP={} FP={} FN={} TN={} precision={:.4} accuracy={:.4} recall={:.4} f1={:.4}",
        metrics.threshold,
        metrics.true_positive,
        metrics.false_positive,
        metrics.false_negative,
        metrics.true_negative,
        metrics.precision,
        metrics.accuracy,
        metrics.recall,
        metrics.f1
    );
}

fn main() -> Result<()> {
    init_tracing();

    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load()?,
    };
    if let Some(registry) = &args.registry {
        config.registry_path = Some(registry.clone());
    }

    let matcher = CompanyMatcher::from_config(&config)?;
    let cases = evaluation::read_cases(&args.cases)?;
    tracing::info!("读取 {} 条用例", cases.len());

    match args.sweep {
        Some(range) => {
            let all = evaluation::sweep(&matcher, &cases, range, &args.out_dir)?;
            for metrics in &all {
                print_metrics(metrics);
            }
        }
        None => {
            let threshold = args.threshold.unwrap_or(config.threshold);
            let rows = evaluation::evaluate(&matcher, &cases, threshold);
            evaluation::write_rows(&args.output, &rows)?;
            print_metrics(&Metrics::from_rows(threshold, &rows));
        }
    }

    Ok(())
}
