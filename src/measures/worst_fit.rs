//! 每个变化周期内所有算法的最差适应度，作为归一化的上限

use super::data_consistency;
use crate::data::{ChangePeriods, Trajectories};
use crate::error::Violation;
use crate::{ChangePeriod, Error, Fitness};
use std::collections::BTreeMap;
use std::fmt::Display;
use std::hash::Hash;

/// 每个变化周期的最差适应度，若该周期内没有任何算法有数据则为 `None`
pub type WorstFitPerChgperiod = BTreeMap<ChangePeriod, Option<Fitness>>;

/// 统计每个变化周期内任意算法在任意一代达到的最大适应度
///
/// 缺失的适应度不参与统计。若变化周期引用了超出某个算法序列长度的代，或者适应度不是有限数，返回错误。
pub fn worst_fit_per_chgperiod<A>(
    generations_of_chgperiods: &ChangePeriods,
    best_found_fit_per_gen_and_alg: &Trajectories<A>,
) -> Result<WorstFitPerChgperiod, Error>
where
    A: Eq + Hash + Display,
{
    let mut worst_fit_per_chgperiod = WorstFitPerChgperiod::new();
    for (&chgperiod, generations) in generations_of_chgperiods {
        let mut worst_fit: Option<Fitness> = None;
        for (algorithm, trajectory) in best_found_fit_per_gen_and_alg {
            for &generation in generations {
                let found_fit = trajectory
                    .get(generation)
                    .ok_or_else(|| Error::GenerationOutOfRange {
                        algorithm: algorithm.to_string(),
                        generation,
                        len: trajectory.len(),
                    })?;
                if let Some(found_fit) = *found_fit {
                    if !found_fit.is_finite() {
                        return Err(Error::NonFiniteFitness {
                            algorithm: algorithm.to_string(),
                            generation,
                            found_fit,
                        });
                    }
                    worst_fit = Some(worst_fit.map_or(found_fit, |x| x.max(found_fit)));
                }
            }
        }
        worst_fit_per_chgperiod.insert(chgperiod, worst_fit);
    }
    Ok(worst_fit_per_chgperiod)
}

/// 检查每个变化周期的最差适应度都不小于全局最优适应度
pub fn check_worst_fit(
    worst_fit_per_chgperiod: &WorstFitPerChgperiod,
    global_opt_fit_per_chgperiod: &[Fitness],
) -> Result<(), Error> {
    for (&chgperiod, &worst_fit) in worst_fit_per_chgperiod {
        let optimal_fit = optimal_fit(global_opt_fit_per_chgperiod, chgperiod)?;
        let Some(worst_fit) = worst_fit else {
            continue;
        };
        if worst_fit < optimal_fit {
            let violation = Violation::WorstBelowOptimum {
                chgperiod,
                worst_fit,
                optimal_fit,
            };
            return Err(data_consistency(
                violation,
                worst_fit_per_chgperiod,
                global_opt_fit_per_chgperiod,
            ));
        }
    }
    Ok(())
}

pub(crate) fn optimal_fit(
    global_opt_fit_per_chgperiod: &[Fitness],
    chgperiod: ChangePeriod,
) -> Result<Fitness, Error> {
    let optimal_fit = global_opt_fit_per_chgperiod
        .get(chgperiod)
        .copied()
        .ok_or(Error::MissingOptimum {
            chgperiod,
            len: global_opt_fit_per_chgperiod.len(),
        })?;
    if !optimal_fit.is_finite() {
        return Err(Error::NonFiniteOptimum {
            chgperiod,
            optimal_fit,
        });
    }
    Ok(optimal_fit)
}
