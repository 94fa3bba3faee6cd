use crate::config::Config;
use crate::data::Run;
use crate::interfaces::{界面, 消息};
use crate::measures::metric::Metric;
use crate::Error;
use chrono::Local;
use clap::{Parser, Subcommand};
use csv::WriterBuilder;
use itertools::Itertools;
use std::fs::{create_dir_all, write};
use std::io::Write;
use std::path::{Path, PathBuf};

/// 命令行参数的定义
#[derive(Parser, Clone)]
#[command(name = "相对收敛速度评测")]
#[command(author, version, about, long_about)]
#[command(propagate_version = true)]
pub struct 命令行参数 {
    #[command(subcommand)]
    pub command: 命令,
    /// 实验配置文件，默认为 config.yaml
    pub config: Option<PathBuf>,
    /// 输出目录，默认为以当前时间命名的 output-* 目录
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,
}

/// 命令行中所有可用的子命令
#[derive(Subcommand, Clone)]
pub enum 命令 {
    /// 计算每次运行中各个算法的相对收敛速度并汇总
    Evaluate,
    /// 只检查每次运行的数据是否一致
    Validate,
}

/// 通过命令行来使用 librcs 的入口，实现了界面特征
pub struct 命令行 {
    pub args: 命令行参数,
    pub output_dir: PathBuf,
}

impl 命令行 {
    pub fn 新建(args: 命令行参数) -> Self {
        let output_dir = args.output.clone().unwrap_or_else(|| {
            let time = Local::now().format("%m-%d+%H_%M_%S").to_string();
            PathBuf::from(format!("output-{time}"))
        });
        Self { args, output_dir }
    }

    pub fn 准备(&self) -> Result<(Config, Vec<Run>), Error> {
        let config_path = self
            .args
            .config
            .clone()
            .unwrap_or(PathBuf::from("config.yaml"));
        let config = Config::from_path(&config_path)?;
        let base = config_path.parent().unwrap_or(Path::new("."));
        let runs = config.load_runs(base)?;
        Ok((config, runs))
    }

    /// 把分数写成制表符分隔的表，未定义的分数留空
    pub fn 输出分数表(path: &Path, metric: &Metric) -> Result<(), Error> {
        let mut writer = WriterBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .from_path(path)?;
        for run in &metric.runs {
            for (algorithm, score) in &run.scores {
                writer.serialize((&run.name, algorithm, score))?;
            }
        }
        writer.flush()?;
        Ok(())
    }

    pub fn 输出评测指标(&self, metric: &Metric) -> Result<(), Error> {
        create_dir_all(&self.output_dir)?;
        print!("{metric}");
        let scores_path = self.output_dir.join("scores.txt");
        Self::输出分数表(&scores_path, metric)?;
        let metric_path = self.output_dir.join("scores.yaml");
        write(&metric_path, serde_yaml::to_string(metric)?)?;
        println!(
            "已完成评测，结果保存在 {} 和 {} 中",
            scores_path.display(),
            metric_path.display()
        );
        Ok(())
    }
}

impl 界面 for 命令行 {
    fn 发送(&self, message: 消息) {
        let mut writer = std::io::stdout();
        let result = match message {
            消息::RunLoaded {
                name,
                chgperiods,
                generations,
                algorithms,
            } => writeln!(
                &mut writer,
                "已读取运行 {name}：{chgperiods} 个变化周期，{generations} 代，{algorithms} 个算法"
            ),
            消息::RunEvaluated { name, scores } => {
                let undefined = scores
                    .iter()
                    .filter(|(_, score)| score.is_none())
                    .map(|(algorithm, _)| algorithm)
                    .join("、");
                if undefined.is_empty() {
                    writeln!(&mut writer, "运行 {name} 计算完成")
                } else {
                    writeln!(&mut writer, "运行 {name} 计算完成，{undefined} 的数据不完整")
                }
            }
            消息::RunValid { name } => writeln!(&mut writer, "运行 {name} 的数据一致"),
            消息::RunInvalid { name, error } => {
                writeln!(&mut writer, "运行 {name} 的数据有误：{error}")
            }
        };
        result.unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measures::metric::RunMetric;
    use tempfile::tempdir;

    #[test]
    fn 未定义的分数输出为空白() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scores.txt");
        let run = RunMetric {
            name: "r0".to_string(),
            scores: [("a".to_string(), Some(0.5)), ("b".to_string(), None)]
                .into_iter()
                .collect(),
        };
        let metric = Metric::new(None, vec![run]);
        命令行::输出分数表(&path, &metric).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "r0\ta\t0.5\nr0\tb\t\n");
    }
}
