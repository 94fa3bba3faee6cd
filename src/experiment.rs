//! 一个实验包含若干次运行，逐次计算或检查并通过界面报告结果

use crate::config::{Config, OptionsConfig};
use crate::data::Run;
use crate::interfaces::{界面, 消息};
use crate::measures::metric::{Metric, RunMetric};
use crate::measures::{relative_convergence_speed, validate};
use crate::{ChangePeriod, Error};
use indexmap::IndexMap;
use tracing::{info, warn};

fn announce(run: &Run, interface: &impl 界面) {
    let generations = run
        .best_found_fit_per_gen_and_alg
        .values()
        .map(Vec::len)
        .max()
        .unwrap_or(0);
    interface.发送(消息::RunLoaded {
        name: run.name.clone(),
        chgperiods: run.generations_of_chgperiods.len(),
        generations,
        algorithms: run.best_found_fit_per_gen_and_alg.len(),
    });
}

fn first_prediction(options: &OptionsConfig) -> IndexMap<String, ChangePeriod> {
    options.first_prediction.clone().unwrap_or_default()
}

/// 计算每次运行中各个算法的分数，任何一次运行出错都会中止整个实验
pub fn evaluate(config: &Config, runs: &[Run], interface: &impl 界面) -> Result<Metric, Error> {
    let options = &config.options;
    let first_chgp_idx_with_pred_per_alg = first_prediction(options);
    let mut run_metrics = Vec::with_capacity(runs.len());
    for run in runs {
        announce(run, interface);
        let scores = relative_convergence_speed(
            &run.generations_of_chgperiods,
            &run.global_opt_fit_per_chgperiod,
            &run.best_found_fit_per_gen_and_alg,
            options.only_for_preds,
            &first_chgp_idx_with_pred_per_alg,
            options.with_abs,
        )
        .inspect_err(|_| warn!("运行 {} 计算失败", run.name))?;
        interface.发送(消息::RunEvaluated {
            name: run.name.clone(),
            scores: scores.clone(),
        });
        run_metrics.push(RunMetric {
            name: run.name.clone(),
            scores,
        });
    }
    info!("已完成 {} 次运行的评测", runs.len());
    Ok(Metric::new(config.info.clone(), run_metrics))
}

/// 检查每次运行的数据，返回出错的运行数
pub fn validate_all(options: &OptionsConfig, runs: &[Run], interface: &impl 界面) -> usize {
    let first_chgp_idx_with_pred_per_alg = first_prediction(options);
    let mut invalid = 0;
    for run in runs {
        announce(run, interface);
        let result = validate(
            &run.generations_of_chgperiods,
            &run.global_opt_fit_per_chgperiod,
            &run.best_found_fit_per_gen_and_alg,
            options.only_for_preds,
            &first_chgp_idx_with_pred_per_alg,
        );
        let message = match result {
            Ok(()) => 消息::RunValid {
                name: run.name.clone(),
            },
            Err(error) => {
                invalid += 1;
                消息::RunInvalid {
                    name: run.name.clone(),
                    error: error.to_string(),
                }
            }
        };
        interface.发送(message);
    }
    invalid
}
