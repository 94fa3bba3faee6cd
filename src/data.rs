//! 一次运行所需要的输入数据，以及从制表符分隔的文件中读取它们的方式。
//!
//! - 变化周期表：每行为「变化周期<TAB>代数」，同一变化周期内的代按行的顺序排列；
//! - 全局最优表：每行一个适应度，第 i 行对应第 i 个变化周期，多余的行会被忽略；
//! - 适应度表：第一行为算法名称，之后每行对应一代。空白单元格或 `-` 表示该算法在这一代没有数据，只有一个算法时必须写 `-`。表中不能有空行，适应度必须是有限数。

use crate::{ChangePeriod, Error, Fitness, Generation};
use csv::{ReaderBuilder, StringRecord};
use indexmap::IndexMap;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::iter::FromIterator;
use std::path::Path;

/// 每个变化周期包含的代，顺序决定了周期内的时间权重
pub type ChangePeriods = BTreeMap<ChangePeriod, Vec<Generation>>;

/// 一个算法在每一代找到的最优适应度，`None` 表示这一代没有运行
pub type Trajectory = Vec<Option<Fitness>>;

/// 每个算法的适应度序列，保持输入中的算法顺序
pub type Trajectories<A = String> = IndexMap<A, Trajectory>;

/// 适应度表中表示缺失的记号
pub const MISSING: &str = "-";

/// 一次运行的全部输入
#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    pub name: String,
    pub generations_of_chgperiods: ChangePeriods,
    pub global_opt_fit_per_chgperiod: Vec<Fitness>,
    pub best_found_fit_per_gen_and_alg: Trajectories,
}

impl Run {
    pub fn load(
        name: &str,
        change_periods: &Path,
        global_optima: &Path,
        fitness: &Path,
    ) -> Result<Self, Error> {
        let rows: Vec<(ChangePeriod, Generation)> = read(change_periods)?;
        let optima: Vec<(Fitness,)> = read(global_optima)?;
        Ok(Self {
            name: name.to_string(),
            generations_of_chgperiods: group_generations(rows),
            global_opt_fit_per_chgperiod: optima.into_iter().map(|(x,)| x).collect(),
            best_found_fit_per_gen_and_alg: read_trajectories(fitness)?,
        })
    }
}

fn read<I, T>(path: &Path) -> Result<T, Error>
where
    I: for<'de> Deserialize<'de>,
    T: FromIterator<I>,
{
    let mut reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .from_path(path)
        .map_err(|e| format!("无法读取文件 {}：{e}", path.display()))?;
    let records: Result<T, csv::Error> = reader.deserialize::<I>().collect();
    Ok(records?)
}

pub fn group_generations<I>(rows: I) -> ChangePeriods
where
    I: IntoIterator<Item = (ChangePeriod, Generation)>,
{
    let mut generations_of_chgperiods = ChangePeriods::new();
    for (chgperiod, generation) in rows {
        generations_of_chgperiods
            .entry(chgperiod)
            .or_default()
            .push(generation);
    }
    generations_of_chgperiods
}

pub fn read_trajectories(path: &Path) -> Result<Trajectories, Error> {
    let mut reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .from_path(path)
        .map_err(|e| format!("无法读取文件 {}：{e}", path.display()))?;
    let algorithms: Vec<String> = reader
        .headers()?
        .iter()
        .map(|x| x.trim().to_string())
        .collect();
    let mut trajectories: Trajectories = algorithms
        .iter()
        .map(|x| (x.clone(), Trajectory::new()))
        .collect();
    if trajectories.len() != algorithms.len() {
        return Err(format!("文件 {} 中有重复的算法名称", path.display()).into());
    }
    // csv 会跳过空行，只能通过行号的跳跃发现它们
    let mut record = StringRecord::new();
    let mut line = reader.position().line();
    let mut row = 0;
    while reader.read_record(&mut record)? {
        let next_line = reader.position().line();
        if next_line > line + 1 {
            return Err(format!(
                "文件 {} 第 {} 代之前有空行，缺失的适应度请写作 {MISSING}",
                path.display(),
                row
            )
            .into());
        }
        line = next_line;
        let values = parse_row(&record).map_err(|field| {
            format!(
                "文件 {} 第 {} 代的适应度 {field} 无法解析",
                path.display(),
                row
            )
        })?;
        for (trajectory, value) in trajectories.values_mut().zip(values) {
            trajectory.push(value);
        }
        row += 1;
    }
    Ok(trajectories)
}

fn parse_row(record: &StringRecord) -> Result<Vec<Option<Fitness>>, String> {
    record
        .iter()
        .map(|field| {
            let field = field.trim();
            if field.is_empty() || field == MISSING {
                return Ok(None);
            }
            field
                .parse::<Fitness>()
                .ok()
                .filter(|x| x.is_finite())
                .map(Some)
                .ok_or_else(|| field.to_string())
        })
        .collect()
}
