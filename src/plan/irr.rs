//! IRR of a single XY plan and of the switch between two plans

use log::debug;

use crate::annuity;
use crate::error::XYResult;
use crate::rates::PERIODS_PER_YEAR;
use super::builder::diff_plan;
use super::interest::XYInterest;

/// Principal the plans are built on; IRR does not depend on scale
pub const NOMINAL_PRINCIPAL: f64 = 10_000.0;

/// Periodic IRR of `schedule`
pub fn plan_irr(schedule: &XYInterest) -> XYResult<f64> {
    let plan = schedule.plan(NOMINAL_PRINCIPAL);
    annuity::irr(&plan)
}

/// Annualized IRR of switching capital from `benchmark` to `schedule`
///
/// The difference plan is charged the full principal at period 0. Principal
/// amortized under the benchmark counts as capital that stays available, so
/// `principal / benchmark.y_periods` is credited from period
/// `benchmark.x_periods + 1` onward. A benchmark without Y phase gets no
/// credit.
pub fn diff_plan_irr(schedule: &XYInterest, benchmark: &XYInterest) -> XYResult<f64> {
    let mut plan = diff_plan(NOMINAL_PRINCIPAL, schedule, benchmark);
    plan[0] = -NOMINAL_PRINCIPAL;

    if benchmark.y_periods > 0 {
        let credit = NOMINAL_PRINCIPAL / benchmark.y_periods as f64;
        let from = benchmark.x_periods as usize + 1;
        for cf in plan.iter_mut().skip(from) {
            *cf += credit;
        }
    }

    let periodic = annuity::irr(&plan)?;
    debug!("diff plan IRR {:.6} periodic over {} periods", periodic, plan.len() - 1);
    Ok(periodic * PERIODS_PER_YEAR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::XYError;
    use crate::rates::annual_irr_to_monthly_rate;
    use approx::assert_abs_diff_eq;

    fn benchmark(x_periods: u32, annual: f64) -> XYInterest {
        let y_rate = annual_irr_to_monthly_rate(12, annual).unwrap();
        XYInterest::new(annual / 12.0, x_periods, y_rate, 12)
    }

    #[test]
    fn test_plan_irr_recovers_implied_rate() {
        let rate = plan_irr(&benchmark(6, 0.1095)).unwrap();
        assert_abs_diff_eq!(rate * 12.0, 0.1095, epsilon = 1e-5);
    }

    #[test]
    fn test_plan_irr_is_scale_invariant() {
        let schedule = XYInterest::new(0.011, 6, 0.011, 12);
        let nominal = plan_irr(&schedule).unwrap();
        let scaled = annuity::irr(&schedule.plan(3_000_000.0)).unwrap();
        assert_abs_diff_eq!(nominal, scaled, epsilon = 1e-9);
    }

    #[test]
    fn test_reference_diff_plan_irr() {
        let schedule = XYInterest::new(0.011, 6, 0.011, 12);
        let rate = diff_plan_irr(&schedule, &benchmark(6, 0.1095)).unwrap();
        assert_abs_diff_eq!(rate, 0.07758, epsilon = 1e-4);
    }

    #[test]
    fn test_diff_plan_irr_without_x_phase() {
        let y_rate = annual_irr_to_monthly_rate(12, 0.16).unwrap();
        let schedule = XYInterest::new(0.16 / 12.0, 0, y_rate, 12);
        let rate = diff_plan_irr(&schedule, &benchmark(0, 0.1095)).unwrap();
        assert_abs_diff_eq!(rate, 0.05215, epsilon = 1e-4);
    }

    #[test]
    fn test_diff_plan_irr_identical_schedules_is_undefined() {
        // Nothing but the principal outlay and no benchmark principal credit
        let schedule = XYInterest::new(0.01, 3, 0.0, 0);
        let result = diff_plan_irr(&schedule, &schedule);
        assert!(matches!(result, Err(XYError::IrrUndefined { .. })));
    }
}
