//! 单个算法的收敛速度

use super::data_consistency;
use super::worst_fit::{optimal_fit, WorstFitPerChgperiod};
use crate::data::ChangePeriods;
use crate::error::Violation;
use crate::{ChangePeriod, Error, Fitness};
use tracing::debug;

/// 最优适应度与另一适应度之差，`with_abs` 时取绝对值
///
/// 在最小化问题中两种方式得到的差只相差一个符号，归一化之后结果相同。
fn deviation(optimal_fit: Fitness, other_fit: Fitness, with_abs: bool) -> Fitness {
    let diff = optimal_fit - other_fit;
    if with_abs {
        diff.abs()
    } else {
        diff
    }
}

/// 计算一个算法在一次运行中的收敛速度，结果在 0（最好）和 1（最差）之间
///
/// 在每个变化周期中，第 i 代的偏差以 i + 1 为权重累加成面积，再除以用最差适应度算出的最大面积；所有周期的归一化面积取平均。
///
/// - `first_chgp_idx_with_pred` 为 `Some` 时，跳过序号小于它的变化周期；
/// - 任何一代的适应度缺失时返回 `Ok(None)`；
/// - 找到的适应度小于全局最优时返回数据不一致错误；
/// - 没有任何变化周期参与平均时返回错误。
pub fn convergence_speed(
    algorithm: &str,
    generations_of_chgperiods: &ChangePeriods,
    global_opt_fit_per_chgperiod: &[Fitness],
    best_found_fit_per_gen: &[Option<Fitness>],
    worst_fit_per_chgperiod: &WorstFitPerChgperiod,
    first_chgp_idx_with_pred: Option<ChangePeriod>,
    with_abs: bool,
) -> Result<Option<Fitness>, Error> {
    let mut sum_norm_areas = 0.0;
    let mut n_summed_chgps = 0;
    for (&chgperiod, generations) in generations_of_chgperiods {
        if first_chgp_idx_with_pred.is_some_and(|first| chgperiod < first) {
            continue;
        }
        n_summed_chgps += 1;

        let optimal_fit = optimal_fit(global_opt_fit_per_chgperiod, chgperiod)?;
        // 周期内没有任何数据时，下面第一代就会因缺失而返回
        let best_worst_fit_diff = worst_fit_per_chgperiod
            .get(&chgperiod)
            .copied()
            .flatten()
            .map_or(0.0, |worst_fit| deviation(optimal_fit, worst_fit, with_abs));

        let mut area = 0.0;
        let mut max_area = 0.0;
        for (index, &generation) in generations.iter().enumerate() {
            let found_fit = best_found_fit_per_gen.get(generation).ok_or_else(|| {
                Error::GenerationOutOfRange {
                    algorithm: algorithm.to_string(),
                    generation,
                    len: best_found_fit_per_gen.len(),
                }
            })?;
            let Some(found_fit) = *found_fit else {
                debug!("算法 {algorithm} 在第 {generation} 代没有数据，收敛速度无定义");
                return Ok(None);
            };
            if found_fit < optimal_fit {
                let violation = Violation::FoundBelowOptimum {
                    algorithm: algorithm.to_string(),
                    chgperiod,
                    generation,
                    found_fit,
                    optimal_fit,
                };
                return Err(data_consistency(
                    violation,
                    worst_fit_per_chgperiod,
                    global_opt_fit_per_chgperiod,
                ));
            }
            // 权重从 1 开始，否则第一代不计入
            let weight = (index + 1) as Fitness;
            area += weight * deviation(optimal_fit, found_fit, with_abs);
            max_area += weight * best_worst_fit_diff;
        }

        // 最大面积为 0 说明所有算法始终处于全局最优，该周期记为 0
        if max_area != 0.0 {
            sum_norm_areas += area / max_area;
        }
        debug!(algorithm, chgperiod, area, max_area, "变化周期面积");
    }

    if n_summed_chgps == 0 {
        return Err(Error::DegenerateDivision {
            algorithm: algorithm.to_string(),
        });
    }
    Ok(Some(sum_norm_areas / n_summed_chgps as Fitness))
}
