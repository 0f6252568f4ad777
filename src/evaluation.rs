// 离线评估
//
// 读取测试用例 CSV，逐条匹配并写出结果 CSV，按阈值统计准确率、召回率等指标。
// 用例并行处理，输出顺序与输入一致。

use std::fs::File;
use std::io::{Read, Write};
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::matching::CompanyMatcher;

/// 测试用例
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct EvalCase {
    #[serde(rename = "company name", default)]
    pub company_name: Option<String>,
    #[serde(rename = "expected company name", default)]
    pub expected: Option<String>,
}

/// 单条评估结果
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EvalRow {
    #[serde(rename = "company name")]
    pub company_name: String,
    #[serde(rename = "expected company name")]
    pub expected: String,
    pub output: String,
    /// 输出与期望忽略大小写相等（都为空也算相等）
    #[serde(rename = "true/false")]
    pub correct: bool,
    #[serde(rename = "time (seconds)")]
    pub elapsed_secs: f64,
}

/// 单个阈值下的统计
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct Metrics {
    pub threshold: u8,
    #[serde(rename = "TP")]
    pub true_positive: usize,
    #[serde(rename = "FP")]
    pub false_positive: usize,
    #[serde(rename = "FN")]
    pub false_negative: usize,
    #[serde(rename = "TN")]
    pub true_negative: usize,
    #[serde(rename = "Precision")]
    pub precision: f64,
    #[serde(rename = "Accuracy")]
    pub accuracy: f64,
    #[serde(rename = "Recall")]
    pub recall: f64,
    #[serde(rename = "F1-score")]
    pub f1: f64,
}

impl Metrics {
    /// 统计：有输出且正确为 TP，有输出但错误为 FP，
    /// 无输出且错误为 FN，无输出且正确为 TN。分母为 0 时比率记 0。
    pub fn from_rows(threshold: u8, rows: &[EvalRow]) -> Self {
        let mut tp = 0;
        let mut fp = 0;
        let mut fn_ = 0;
        let mut tn = 0;
        for row in rows {
            match (row.output.is_empty(), row.correct) {
                (false, true) => tp += 1,
                (false, false) => fp += 1,
                (true, false) => fn_ += 1,
                (true, true) => tn += 1,
            }
        }

        let precision = safe_div(tp, tp + fp);
        let accuracy = safe_div(tp + tn, tp + tn + fp + fn_);
        let recall = safe_div(tp, tp + fn_);
        let f1 = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };

        Self {
            threshold,
            true_positive: tp,
            false_positive: fp,
            false_negative: fn_,
            true_negative: tn,
            precision,
            accuracy,
            recall,
            f1,
        }
    }
}

fn safe_div(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// 读取测试用例
pub fn read_cases(path: &Path) -> Result<Vec<EvalCase>> {
    let file = File::open(path).with_context(|| format!("打开用例文件失败: {}", path.display()))?;
    read_cases_from(file).with_context(|| format!("解析用例文件失败: {}", path.display()))
}

pub fn read_cases_from<R: Read>(reader: R) -> Result<Vec<EvalCase>> {
    let mut reader = csv::Reader::from_reader(reader);
    let mut cases = Vec::new();
    for record in reader.deserialize() {
        cases.push(record?);
    }
    Ok(cases)
}

/// 并行评估全部用例
pub fn evaluate(matcher: &CompanyMatcher, cases: &[EvalCase], threshold: u8) -> Vec<EvalRow> {
    cases
        .par_iter()
        .map(|case| {
            let start = Instant::now();
            let output = matcher.match_name(
                case.company_name.as_deref(),
                case.expected.as_deref(),
                threshold,
            );
            let elapsed_secs = start.elapsed().as_secs_f64();

            let expected = case.expected.clone().unwrap_or_default();
            let correct = output.to_lowercase() == expected.to_lowercase();
            EvalRow {
                company_name: case.company_name.clone().unwrap_or_default(),
                expected,
                output,
                correct,
                elapsed_secs,
            }
        })
        .collect()
}

/// 写出评估结果
pub fn write_rows(path: &Path, rows: &[EvalRow]) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("创建结果文件失败: {}", path.display()))?;
    write_csv(file, rows)
}

/// 写出统计结果
pub fn write_metrics(path: &Path, metrics: &[Metrics]) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("创建统计文件失败: {}", path.display()))?;
    write_csv(file, metrics)
}

fn write_csv<W: Write, T: Serialize>(writer: W, items: &[T]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    for item in items {
        writer.serialize(item)?;
    }
    writer.flush()?;
    Ok(())
}

/// 单个阈值的结果文件名
pub fn results_file_name(threshold: u8) -> String {
    format!("company_name_matching_results_threshold_{}.csv", threshold)
}

/// 阈值扫描
///
/// 每个阈值写一份结果文件，最后写出汇总统计，返回各阈值的统计。
pub fn sweep(
    matcher: &CompanyMatcher,
    cases: &[EvalCase],
    thresholds: RangeInclusive<u8>,
    out_dir: &Path,
) -> Result<Vec<Metrics>> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("创建输出目录失败: {}", out_dir.display()))?;

    let mut all_metrics = Vec::new();
    for threshold in thresholds {
        let rows = evaluate(matcher, cases, threshold);
        let path: PathBuf = out_dir.join(results_file_name(threshold));
        write_rows(&path, &rows)?;

        let metrics = Metrics::from_rows(threshold, &rows);
        tracing::info!(
            "阈值 {}: 精确率 {:.4}, 召回率 {:.4}, F1 {:.4}",
            threshold,
            metrics.precision,
            metrics.recall,
            metrics.f1
        );
        all_metrics.push(metrics);
    }

    write_metrics(&out_dir.join("calculate_score.csv"), &all_metrics)?;
    Ok(all_metrics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::{FuzzyScorer, WhitespaceSegmenter, WordSegmenter};
    use crate::normalizer::NameNormalizer;
    use crate::registry::{CompanyRecord, Registry};
    use std::io::Cursor;
    use std::sync::Arc;

    fn row(output: &str, correct: bool) -> EvalRow {
        EvalRow {
            company_name: String::new(),
            expected: String::new(),
            output: output.to_string(),
            correct,
            elapsed_secs: 0.0,
        }
    }

    fn matcher() -> CompanyMatcher {
        let normalizer = Arc::new(NameNormalizer::with_defaults().expect("内置规则可编译"));
        let segmenter: Arc<dyn WordSegmenter> = Arc::new(WhitespaceSegmenter);
        let records = vec![
            CompanyRecord::new("Acme Corp").with_aliases(&["Acme International"]),
            CompanyRecord::new("Global Century Bank Ltd"),
        ];
        let registry = Arc::new(Registry::from_records(
            records,
            &normalizer,
            segmenter.as_ref(),
        ));
        CompanyMatcher::new(
            normalizer,
            registry,
            Box::new(FuzzyScorer::default()),
            segmenter,
        )
    }

    #[test]
    fn test_metrics() {
        let rows = vec![
            row("Acme", true),
            row("Acme", true),
            row("Globex", false),
            row("", false),
            row("", true),
        ];
        let m = Metrics::from_rows(70, &rows);
        assert_eq!(
            (m.true_positive, m.false_positive, m.false_negative, m.true_negative),
            (2, 1, 1, 1)
        );
        assert!((m.precision - 2.0 / 3.0).abs() < 1e-9);
        assert!((m.recall - 2.0 / 3.0).abs() < 1e-9);
        assert!((m.accuracy - 0.6).abs() < 1e-9);
        assert!((m.f1 - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_metrics_undefined_ratios_are_zero() {
        let m = Metrics::from_rows(70, &[row("", true)]);
        assert_eq!(m.precision, 0.0);
        assert_eq!(m.recall, 0.0);
        assert_eq!(m.f1, 0.0);
        assert_eq!(m.accuracy, 1.0);
    }

    #[test]
    fn test_read_cases_with_empty_fields() {
        let input = "company name,expected company name\nACME Corporation,Acme Corp\nUnknown Co,\n";
        let cases = read_cases_from(Cursor::new(input)).unwrap();
        assert_eq!(cases.len(), 2);
        assert_eq!(cases[0].company_name.as_deref(), Some("ACME Corporation"));
        assert_eq!(cases[1].expected, None);
    }

    #[test]
    fn test_evaluate_preserves_order() {
        let cases = vec![
            EvalCase {
                company_name: Some("ACME Corporation".to_string()),
                expected: Some("acme corp".to_string()),
            },
            EvalCase {
                company_name: Some("Zenith Dynamics".to_string()),
                expected: None,
            },
            EvalCase {
                company_name: None,
                expected: Some("Acme Corp".to_string()),
            },
            EvalCase {
                company_name: Some("Global Century Bank".to_string()),
                expected: Some("Global Century Bank Ltd".to_string()),
            },
        ];
        let rows = evaluate(&matcher(), &cases, 70);

        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].output, "Acme Corp");
        assert!(rows[0].correct);
        assert_eq!(rows[1].output, "");
        assert!(rows[1].correct);
        assert_eq!(rows[2].output, "");
        assert!(!rows[2].correct);
        assert_eq!(rows[3].company_name, "Global Century Bank");
        assert!(rows[3].correct);
    }

    #[test]
    fn test_write_rows_header() {
        let mut buffer = Vec::new();
        write_csv(&mut buffer, &[row("Acme", true)]).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.starts_with(
            "company name,expected company name,output,true/false,time (seconds)\n"
        ));
        assert!(text.contains(",Acme,true,"));
    }

    #[test]
    fn test_sweep_writes_files() {
        let dir = tempfile::tempdir().unwrap();
        let cases = vec![EvalCase {
            company_name: Some("Acme Corp".to_string()),
            expected: Some("Acme Corp".to_string()),
        }];
        let metrics = sweep(&matcher(), &cases, 90..=91, dir.path()).unwrap();

        assert_eq!(metrics.len(), 2);
        assert_eq!(metrics[0].threshold, 90);
        assert_eq!(metrics[0].true_positive, 1);
        assert!(dir.path().join(results_file_name(90)).exists());
        assert!(dir.path().join(results_file_name(91)).exists());

        let summary = std::fs::read_to_string(dir.path().join("calculate_score.csv")).unwrap();
        assert!(summary.starts_with("threshold,TP,FP,FN,TN,Precision,Accuracy,Recall,F1-score\n"));
    }
}
