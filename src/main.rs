//! 公司名称匹配命令行
//!
//! 用法：
//!   company-matcher match "ACME Corporation" --expected "Acme Corp"
//!   company-matcher normalize "中国平安保险股份有限公司"
//!   company-matcher --registry companies.jsonl     # 交互模式，逐行读取 stdin
//!   company-matcher --registry companies.jsonl init-config --threshold 80

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use company_matcher_lib::{init_tracing, AppConfig, CompanyMatcher, NameNormalizer};

#[derive(Parser)]
#[command(name = "company-matcher")]
#[command(about = "Resolve free-text company names against a registry")]
struct Cli {
    /// 配置文件路径（默认使用系统配置目录）
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// 公司库文件（JSON lines），覆盖配置中的路径
    #[arg(long, global = true)]
    registry: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// 匹配单个名称
    Match {
        name: String,

        /// 期望名称（为别名时原样返回）
        #[arg(long)]
        expected: Option<String>,

        /// 阈值（0-100），默认取配置
        #[arg(long)]
        threshold: Option<u8>,

        /// 输出完整判定（JSON）
        #[arg(long)]
        json: bool,
    },
    /// 只输出规范化结果
    Normalize { name: String },
    /// 把当前生效的配置（含命令行覆盖）写入配置文件
    InitConfig {
        /// 阈值（0-100）
        #[arg(long)]
        threshold: Option<u8>,
    },
}

fn load_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load()?,
    };
    if let Some(registry) = &cli.registry {
        config.registry_path = Some(registry.clone());
    }
    Ok(config)
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match cli.command {
        Some(Command::Normalize { name }) => {
            let normalizer = NameNormalizer::new(&config.normalizer)?;
            println!("{}", normalizer.normalize_str(&name));
        }
        Some(Command::Match {
            name,
            expected,
            threshold,
            json,
        }) => {
            let matcher = CompanyMatcher::from_config(&config)?;
            let threshold = threshold.unwrap_or(config.threshold);
            let decision = matcher.decide(Some(name.as_str()), expected.as_deref(), threshold);
            if json {
                println!("{}", serde_json::to_string_pretty(&decision)?);
            } else {
                println!("{}", decision.name());
            }
        }
        Some(Command::InitConfig { threshold }) => {
            let mut config = config;
            if let Some(threshold) = threshold {
                config.threshold = threshold;
            }
            match &cli.config {
                Some(path) => config.save_to(path)?,
                None => config.save()?,
            }
        }
        None => {
            let matcher = CompanyMatcher::from_config(&config)?;
            run_interactive(&matcher, config.threshold)?;
        }
    }

    Ok(())
}

/// 交互模式：逐行读取公司名，直到 EOF
fn run_interactive(matcher: &CompanyMatcher, threshold: u8) -> Result<()> {
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();

    eprintln!("请输入公司名称（Ctrl+D 结束）:");
    for line in stdin.lock().lines() {
        let line = line?;
        let name = line.trim();
        if name.is_empty() {
            continue;
        }
        let decision = matcher.decide(Some(name), None, threshold);
        match decision.score() {
            Some(score) => writeln!(stdout, "{}\t{}", decision.name(), score)?,
            None => writeln!(stdout, "{}", decision.name())?,
        }
        stdout.flush()?;
    }
    Ok(())
}
