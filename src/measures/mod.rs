//! 相对收敛速度的计算，以及输入数据的一致性检查
//!

use crate::data::{ChangePeriods, Trajectories};
use crate::error::{Diagnostics, Violation};
use crate::{ChangePeriod, Error, Fitness};
use indexmap::IndexMap;
use std::fmt::Display;
use std::hash::Hash;
use tracing::error;
pub mod convergence_speed;
pub mod metric;
pub mod worst_fit;

use convergence_speed::convergence_speed;
use worst_fit::{check_worst_fit, optimal_fit, worst_fit_per_chgperiod, WorstFitPerChgperiod};

/// 每个算法的分数，`None` 表示该算法在这次运行中没有完整的数据
pub type Scores<A = String> = IndexMap<A, Option<Fitness>>;

/// 构造数据不一致错误，并在返回之前记录诊断信息
pub(crate) fn data_consistency(
    violation: Violation,
    worst_fit_per_chgperiod: &WorstFitPerChgperiod,
    global_opt_fit_per_chgperiod: &[Fitness],
) -> Error {
    let diagnostics = Diagnostics {
        worst_fit_per_chgperiod: worst_fit_per_chgperiod.clone(),
        global_opt_fit_per_chgperiod: global_opt_fit_per_chgperiod.to_vec(),
    };
    error!("{violation}\n{diagnostics}");
    Error::DataConsistency {
        violation,
        diagnostics,
    }
}

fn first_prediction<A>(
    algorithm: &A,
    only_for_preds: bool,
    first_chgp_idx_with_pred_per_alg: &IndexMap<A, ChangePeriod>,
) -> Result<Option<ChangePeriod>, Error>
where
    A: Eq + Hash + Display,
{
    if !only_for_preds {
        return Ok(None);
    }
    first_chgp_idx_with_pred_per_alg
        .get(algorithm)
        .copied()
        .map(Some)
        .ok_or_else(|| Error::MissingPredictionStart {
            algorithm: algorithm.to_string(),
        })
}

/// 计算一次运行中每个算法的相对收敛速度
///
/// 先统计每个变化周期内所有算法的最差适应度并检查它不小于全局最优，再逐个算法计算收敛速度。分数只在同一组算法之间可比。
///
/// `only_for_preds` 为真时，每个算法只统计从 `first_chgp_idx_with_pred_per_alg` 中给出的变化周期开始的部分。`with_abs` 为真时偏差取绝对值。
pub fn relative_convergence_speed<A>(
    generations_of_chgperiods: &ChangePeriods,
    global_opt_fit_per_chgperiod: &[Fitness],
    best_found_fit_per_gen_and_alg: &Trajectories<A>,
    only_for_preds: bool,
    first_chgp_idx_with_pred_per_alg: &IndexMap<A, ChangePeriod>,
    with_abs: bool,
) -> Result<Scores<A>, Error>
where
    A: Clone + Eq + Hash + Display,
{
    let worst_fit_per_chgperiod =
        worst_fit_per_chgperiod(generations_of_chgperiods, best_found_fit_per_gen_and_alg)?;
    check_worst_fit(&worst_fit_per_chgperiod, global_opt_fit_per_chgperiod)?;

    let mut speed_per_alg = Scores::with_capacity(best_found_fit_per_gen_and_alg.len());
    for (algorithm, best_found_fit_per_gen) in best_found_fit_per_gen_and_alg {
        let first_chgp_idx_with_pred =
            first_prediction(algorithm, only_for_preds, first_chgp_idx_with_pred_per_alg)?;
        let speed = convergence_speed(
            &algorithm.to_string(),
            generations_of_chgperiods,
            global_opt_fit_per_chgperiod,
            best_found_fit_per_gen,
            &worst_fit_per_chgperiod,
            first_chgp_idx_with_pred,
            with_abs,
        )?;
        speed_per_alg.insert(algorithm.clone(), speed);
    }
    Ok(speed_per_alg)
}

/// 只检查输入数据，不计算分数
///
/// 与 [`relative_convergence_speed`] 不同，缺失的适应度不会让检查提前结束，每个参与统计的变化周期中所有已有的适应度都会和全局最优比较。
pub fn validate<A>(
    generations_of_chgperiods: &ChangePeriods,
    global_opt_fit_per_chgperiod: &[Fitness],
    best_found_fit_per_gen_and_alg: &Trajectories<A>,
    only_for_preds: bool,
    first_chgp_idx_with_pred_per_alg: &IndexMap<A, ChangePeriod>,
) -> Result<(), Error>
where
    A: Eq + Hash + Display,
{
    let worst_fit_per_chgperiod =
        worst_fit_per_chgperiod(generations_of_chgperiods, best_found_fit_per_gen_and_alg)?;
    check_worst_fit(&worst_fit_per_chgperiod, global_opt_fit_per_chgperiod)?;

    for (algorithm, best_found_fit_per_gen) in best_found_fit_per_gen_and_alg {
        let first =
            first_prediction(algorithm, only_for_preds, first_chgp_idx_with_pred_per_alg)?;
        let mut n_chgperiods = 0;
        for (&chgperiod, generations) in generations_of_chgperiods {
            if first.is_some_and(|first| chgperiod < first) {
                continue;
            }
            n_chgperiods += 1;
            let optimal_fit = optimal_fit(global_opt_fit_per_chgperiod, chgperiod)?;
            // 越界的代在统计最差适应度时已经检查过
            for &generation in generations {
                let Some(Some(found_fit)) = best_found_fit_per_gen.get(generation).copied() else {
                    continue;
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
                        &worst_fit_per_chgperiod,
                        global_opt_fit_per_chgperiod,
                    ));
                }
            }
        }
        if n_chgperiods == 0 {
            return Err(Error::DegenerateDivision {
                algorithm: algorithm.to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Trajectory;

    fn reference_periods() -> ChangePeriods {
        [(0, vec![0, 1, 2, 3]), (1, vec![4]), (2, vec![5, 6])]
            .into_iter()
            .collect()
    }

    fn reference_fits() -> Trajectories<&'static str> {
        let a = [10.0, 8.0, 7.0, 6.0, 11.0, 9.0, 4.0];
        let b = [15.0, 12.0, 12.0, 5.0, 10.0, 13.0, 7.0];
        [
            ("a", a.iter().copied().map(Some).collect::<Trajectory>()),
            ("b", b.iter().copied().map(Some).collect::<Trajectory>()),
        ]
        .into_iter()
        .collect()
    }

    const REFERENCE_OPTIMA: [Fitness; 3] = [-12.0, 5.0, -4.0];

    #[test]
    fn reference_scenario() {
        let scores = relative_convergence_speed(
            &reference_periods(),
            &REFERENCE_OPTIMA,
            &reference_fits(),
            false,
            &IndexMap::new(),
            true,
        )
        .unwrap();
        let a = scores["a"].unwrap();
        let b = scores["b"].unwrap();
        // 最差适应度分别为 15、11、13
        let expected_a = (191.0 / 270.0 + 1.0 + 29.0 / 51.0) / 3.0;
        let expected_b = (215.0 / 270.0 + 5.0 / 6.0 + 39.0 / 51.0) / 3.0;
        assert!((a - expected_a).abs() < 1e-12);
        assert!((b - expected_b).abs() < 1e-12);
        assert!(a < b);
        assert_eq!(scores.keys().copied().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn filtering_only_uses_periods_with_predictions() {
        let first: IndexMap<&str, ChangePeriod> = [("a", 1), ("b", 2)].into_iter().collect();
        let scores = relative_convergence_speed(
            &reference_periods(),
            &REFERENCE_OPTIMA,
            &reference_fits(),
            true,
            &first,
            true,
        )
        .unwrap();
        assert!((scores["a"].unwrap() - (1.0 + 29.0 / 51.0) / 2.0).abs() < 1e-12);
        assert!((scores["b"].unwrap() - 39.0 / 51.0).abs() < 1e-12);
    }

    #[test]
    fn filtering_requires_a_first_prediction_for_each_algorithm() {
        let first: IndexMap<&str, ChangePeriod> = [("a", 1)].into_iter().collect();
        let error = relative_convergence_speed(
            &reference_periods(),
            &REFERENCE_OPTIMA,
            &reference_fits(),
            true,
            &first,
            true,
        )
        .unwrap_err();
        assert_eq!(
            error,
            Error::MissingPredictionStart {
                algorithm: "b".to_string()
            }
        );
    }

    #[test]
    fn missing_value_only_affects_its_algorithm() {
        let mut fits = reference_fits();
        fits["b"][6] = None;
        let scores = relative_convergence_speed(
            &reference_periods(),
            &REFERENCE_OPTIMA,
            &fits,
            false,
            &IndexMap::new(),
            true,
        )
        .unwrap();
        assert!(scores["a"].is_some());
        assert_eq!(scores["b"], None);
    }

    #[test]
    fn found_below_optimum_aborts_everything() {
        let mut fits = reference_fits();
        // 周期 1 的最差适应度仍是 11，只有 b 违反了最小化假设
        fits["b"][4] = Some(4.0);
        let error = relative_convergence_speed(
            &reference_periods(),
            &REFERENCE_OPTIMA,
            &fits,
            false,
            &IndexMap::new(),
            true,
        )
        .unwrap_err();
        let Error::DataConsistency {
            violation,
            diagnostics,
        } = error
        else {
            panic!("unexpected error");
        };
        assert_eq!(
            violation,
            Violation::FoundBelowOptimum {
                algorithm: "b".to_string(),
                chgperiod: 1,
                generation: 4,
                found_fit: 4.0,
                optimal_fit: 5.0
            }
        );
        assert_eq!(diagnostics.global_opt_fit_per_chgperiod, REFERENCE_OPTIMA.to_vec());
        assert_eq!(diagnostics.worst_fit_per_chgperiod[&1], Some(11.0));
    }

    #[test]
    fn validate_sees_past_missing_values() {
        let mut fits = reference_fits();
        fits["b"][0] = None;
        fits["b"][4] = Some(4.0);
        let scores = relative_convergence_speed(
            &reference_periods(),
            &REFERENCE_OPTIMA,
            &fits,
            false,
            &IndexMap::new(),
            true,
        )
        .unwrap();
        assert_eq!(scores["b"], None);
        let error = validate(
            &reference_periods(),
            &REFERENCE_OPTIMA,
            &fits,
            false,
            &IndexMap::new(),
        )
        .unwrap_err();
        assert!(matches!(error, Error::DataConsistency { .. }));
    }

    #[test]
    fn validate_accepts_reference_scenario() {
        assert_eq!(
            validate(
                &reference_periods(),
                &REFERENCE_OPTIMA,
                &reference_fits(),
                false,
                &IndexMap::new(),
            ),
            Ok(())
        );
    }

    #[test]
    fn non_finite_fitness_stops_scoring_and_validation() {
        let periods: ChangePeriods = [(0, vec![0, 1])].into_iter().collect();
        let fits: Trajectories<&str> = [
            ("a", vec![Some(Fitness::NAN), Some(1.0)]),
            ("b", vec![Some(3.0), Some(2.0)]),
        ]
        .into_iter()
        .collect();
        let scores =
            relative_convergence_speed(&periods, &[0.0], &fits, false, &IndexMap::new(), true);
        assert!(matches!(scores, Err(Error::NonFiniteFitness { generation: 0, .. })));
        let checked = validate(&periods, &[0.0], &fits, false, &IndexMap::new());
        assert!(matches!(checked, Err(Error::NonFiniteFitness { generation: 0, .. })));
    }

    #[test]
    fn extra_optima_are_ignored() {
        let mut optima = REFERENCE_OPTIMA.to_vec();
        optima.extend([100.0, -100.0]);
        let longer = relative_convergence_speed(
            &reference_periods(),
            &optima,
            &reference_fits(),
            false,
            &IndexMap::new(),
            true,
        )
        .unwrap();
        let exact = relative_convergence_speed(
            &reference_periods(),
            &REFERENCE_OPTIMA,
            &reference_fits(),
            false,
            &IndexMap::new(),
            true,
        )
        .unwrap();
        assert_eq!(longer, exact);
    }
}
