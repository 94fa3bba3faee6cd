use crate::data::Run;
use crate::{ChangePeriod, Error};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use std::collections::BTreeMap;
use std::fs::read_to_string;
use std::path::{Path, PathBuf};

const fn default_with_abs() -> bool {
    true
}

#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OptionsConfig {
    #[serde(default)]
    pub only_for_preds: bool,
    #[serde(default = "default_with_abs")]
    pub with_abs: bool,
    pub first_prediction: Option<IndexMap<String, ChangePeriod>>,
}

impl Default for OptionsConfig {
    fn default() -> Self {
        Self {
            only_for_preds: false,
            with_abs: default_with_abs(),
            first_prediction: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunConfig {
    pub name: String,
    pub change_periods: PathBuf,
    pub global_optima: PathBuf,
    pub fitness: PathBuf,
}

#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub info: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub options: OptionsConfig,
    pub runs: Vec<RunConfig>,
}

impl Config {
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        let content = read_to_string(path)
            .map_err(|e| format!("文件 {} 无法读取：{e}", path.display()))?;
        Ok(serde_yaml::from_str(&content)?)
    }

    /// 读取所有运行的数据，相对路径以 `base` 为起点
    pub fn load_runs(&self, base: &Path) -> Result<Vec<Run>, Error> {
        self.runs
            .iter()
            .map(|run| {
                Run::load(
                    &run.name,
                    &base.join(&run.change_periods),
                    &base.join(&run.global_optima),
                    &base.join(&run.fitness),
                )
            })
            .collect()
    }
}
