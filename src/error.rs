use crate::{ChangePeriod, Fitness, Generation};
use itertools::Itertools;
use std::collections::BTreeMap;
use std::fmt::Display;
use thiserror::Error;

/// 违反最小化假设的具体位置
#[derive(Debug, Clone, PartialEq)]
pub enum Violation {
    /// 某个变化周期内所有算法的最差适应度都优于全局最优
    WorstBelowOptimum {
        chgperiod: ChangePeriod,
        worst_fit: Fitness,
        optimal_fit: Fitness,
    },
    /// 某个算法在某一代找到的适应度优于全局最优
    FoundBelowOptimum {
        algorithm: String,
        chgperiod: ChangePeriod,
        generation: Generation,
        found_fit: Fitness,
        optimal_fit: Fitness,
    },
}

impl Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Violation::WorstBelowOptimum {
                chgperiod,
                worst_fit,
                optimal_fit,
            } => write!(
                f,
                "变化周期 {chgperiod} 的最差适应度 {worst_fit} 小于全局最优适应度 {optimal_fit}"
            ),
            Violation::FoundBelowOptimum {
                algorithm,
                chgperiod,
                generation,
                found_fit,
                optimal_fit,
            } => write!(
                f,
                "算法 {algorithm} 在变化周期 {chgperiod} 第 {generation} 代的适应度 {found_fit} 小于全局最优适应度 {optimal_fit}"
            ),
        }
    }
}

/// 输入数据不一致时随错误一起返回的诊断信息
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostics {
    /// 没有任何数据的变化周期记为 `None`，输出为 `-`
    pub worst_fit_per_chgperiod: BTreeMap<ChangePeriod, Option<Fitness>>,
    pub global_opt_fit_per_chgperiod: Vec<Fitness>,
}

impl Display for Diagnostics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let worst = self
            .worst_fit_per_chgperiod
            .iter()
            .map(|(chgperiod, fit)| match fit {
                Some(fit) => format!("{chgperiod}: {fit}"),
                None => format!("{chgperiod}: -"),
            })
            .join(", ");
        let optimal = self.global_opt_fit_per_chgperiod.iter().join(", ");
        writeln!(f, "worst-fit-per-change-period: [{worst}]")?;
        write!(f, "global-opt-fit-per-change-period: [{optimal}]")
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// 输入数据违反最小化假设，整个计算中止
    #[error("数据不一致：{violation}")]
    DataConsistency {
        violation: Violation,
        diagnostics: Diagnostics,
    },

    /// 过滤之后没有任何变化周期可以参与平均
    #[error("算法 {algorithm} 没有可以参与平均的变化周期")]
    DegenerateDivision { algorithm: String },

    #[error("变化周期 {chgperiod} 没有对应的全局最优适应度（共 {len} 个）")]
    MissingOptimum { chgperiod: ChangePeriod, len: usize },

    #[error("算法 {algorithm} 只记录了 {len} 代，但变化周期引用了第 {generation} 代")]
    GenerationOutOfRange {
        algorithm: String,
        generation: Generation,
        len: usize,
    },

    #[error("变化周期 {chgperiod} 的全局最优适应度 {optimal_fit} 不是有限数")]
    NonFiniteOptimum {
        chgperiod: ChangePeriod,
        optimal_fit: Fitness,
    },

    #[error("算法 {algorithm} 第 {generation} 代的适应度 {found_fit} 不是有限数")]
    NonFiniteFitness {
        algorithm: String,
        generation: Generation,
        found_fit: Fitness,
    },

    #[error("算法 {algorithm} 没有给出第一个带预测的变化周期")]
    MissingPredictionStart { algorithm: String },

    #[error("{message}")]
    Message { message: String },
}

impl From<String> for Error {
    fn from(value: String) -> Self {
        Self::Message { message: value }
    }
}

impl From<&str> for Error {
    fn from(value: &str) -> Self {
        Self::Message {
            message: value.to_string(),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Self::from(format!("读写文件失败：{value}"))
    }
}

impl From<csv::Error> for Error {
    fn from(value: csv::Error) -> Self {
        Self::from(format!("表格解析失败：{value}"))
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(value: serde_yaml::Error) -> Self {
        Self::from(format!("配置解析失败：{value}"))
    }
}
