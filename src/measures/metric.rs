// 各次运行的分数以及它们输出到命令行的方式

use super::Scores;
use crate::Fitness;
use indexmap::IndexMap;
use serde::Serialize;
use serde_with::skip_serializing_none;
use std::collections::BTreeMap;
use std::fmt::Display;

fn format_score(score: &Option<Fitness>) -> String {
    match score {
        Some(score) => format!("{score:.4}"),
        None => String::from("无定义"),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunMetric {
    pub name: String,
    pub scores: Scores,
}

impl Display for RunMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&format!("{}［", self.name))?;
        for (algorithm, score) in &self.scores {
            f.write_str(&format!("{}：{}；", algorithm, format_score(score)))?;
        }
        f.write_str("］")
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AlgorithmSummary {
    pub algorithm: String,
    pub runs: usize,
    pub defined: usize,
    pub mean: Option<Fitness>,
}

impl Display for AlgorithmSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&format!(
            "{}：{} 次运行中 {} 次有定义，平均分数 {}",
            self.algorithm,
            self.runs,
            self.defined,
            format_score(&self.mean)
        ))
    }
}

#[skip_serializing_none]
#[derive(Debug, Clone, Serialize)]
pub struct Metric {
    pub info: Option<BTreeMap<String, String>>,
    pub runs: Vec<RunMetric>,
    pub summary: Vec<AlgorithmSummary>,
}

impl Metric {
    pub fn new(info: Option<BTreeMap<String, String>>, runs: Vec<RunMetric>) -> Self {
        let summary = summarize(&runs);
        Self {
            info,
            runs,
            summary,
        }
    }
}

/// 按算法汇总各次运行，算法按首次出现的顺序排列
pub fn summarize(runs: &[RunMetric]) -> Vec<AlgorithmSummary> {
    let mut totals: IndexMap<&str, (usize, usize, Fitness)> = IndexMap::new();
    for run in runs {
        for (algorithm, score) in &run.scores {
            let (count, defined, sum) = totals.entry(algorithm.as_str()).or_default();
            *count += 1;
            if let Some(score) = score {
                *defined += 1;
                *sum += score;
            }
        }
    }
    totals
        .into_iter()
        .map(|(algorithm, (runs, defined, sum))| AlgorithmSummary {
            algorithm: algorithm.to_string(),
            runs,
            defined,
            mean: (defined > 0).then(|| sum / defined as Fitness),
        })
        .collect()
}

impl Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(name) = self.info.as_ref().and_then(|info| info.get("name")) {
            f.write_str(&format!("实验：{}\n", name))?;
        }
        for run in &self.runs {
            f.write_str(&format!("{}\n", run))?;
        }
        f.write_str("汇总\n")?;
        for summary in &self.summary {
            f.write_str(&format!("  {}\n", summary))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(name: &str, scores: &[(&str, Option<Fitness>)]) -> RunMetric {
        RunMetric {
            name: name.to_string(),
            scores: scores
                .iter()
                .map(|(algorithm, score)| (algorithm.to_string(), *score))
                .collect(),
        }
    }

    #[test]
    fn summary_averages_defined_scores() {
        let runs = vec![
            run("r0", &[("a", Some(0.2)), ("b", None)]),
            run("r1", &[("b", None), ("a", Some(0.4)), ("c", Some(1.0))]),
        ];
        let summary = summarize(&runs);
        let algorithms: Vec<_> = summary.iter().map(|x| x.algorithm.as_str()).collect();
        assert_eq!(algorithms, vec!["a", "b", "c"]);
        assert_eq!(summary[0].defined, 2);
        assert!((summary[0].mean.unwrap() - 0.3).abs() < 1e-12);
        assert_eq!(
            summary[1],
            AlgorithmSummary {
                algorithm: "b".to_string(),
                runs: 2,
                defined: 0,
                mean: None
            }
        );
        assert_eq!(summary[2].runs, 1);
    }

    #[test]
    fn undefined_scores_serialize_as_null() {
        let metric = Metric::new(None, vec![run("r0", &[("a", None)])]);
        let yaml = serde_yaml::to_string(&metric).unwrap();
        assert!(!yaml.contains("info"));
        assert!(yaml.contains("a: null"));
        assert!(yaml.contains("mean: null"));
    }

    #[test]
    fn displays_undefined_scores() {
        let metric = run("r0", &[("a", Some(0.5)), ("b", None)]);
        assert_eq!(format!("{}", metric), "r0［a：0.5000；b：无定义；］");
    }
}
