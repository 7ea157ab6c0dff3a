//! Cash-flow vectors for XY plans
//!
//! Index 0 is the disbursement period; index `t` is the payment at the end of
//! period `t`. Vectors are always returned fresh; alignment helpers never
//! mutate their input.

use crate::error::{XYError, XYResult};
use super::interest::XYInterest;

/// Cash flows of a two-phase plan on `principal`
///
/// `[-principal]`, then `x_periods` payments of `principal * x_rate`, then
/// `y_periods` payments of `principal * y_rate + principal / y_periods`.
/// A phase with zero periods contributes nothing.
pub fn xy_plan(principal: f64, x_rate: f64, x_periods: u32, y_rate: f64, y_periods: u32) -> Vec<f64> {
    let mut plan = Vec::with_capacity(1 + x_periods as usize + y_periods as usize);
    plan.push(-principal);

    let x_payment = principal * x_rate;
    plan.extend(std::iter::repeat(x_payment).take(x_periods as usize));

    if y_periods > 0 {
        let y_payment = principal * y_rate + principal / y_periods as f64;
        plan.extend(std::iter::repeat(y_payment).take(y_periods as usize));
    }

    plan
}

/// Principal amortization of a plan in isolation
///
/// Zero for the disbursement and X phase, `principal / y_periods` for each Y
/// period, so the entries sum to `principal`.
pub fn principal_return_plan(principal: f64, x_periods: u32, y_periods: u32) -> XYResult<Vec<f64>> {
    if y_periods == 0 {
        return Err(XYError::precondition(
            "principal return needs a Y phase with at least one period",
        ));
    }

    let mut plan = vec![0.0; 1 + x_periods as usize];
    let share = principal / y_periods as f64;
    plan.extend(std::iter::repeat(share).take(y_periods as usize));
    Ok(plan)
}

/// Elementwise `schedule - benchmark`, both on the same `principal`
///
/// The shorter plan is zero-extended first. Index 0 comes out as 0 since both
/// disburse the same principal.
pub fn diff_plan(principal: f64, schedule: &XYInterest, benchmark: &XYInterest) -> Vec<f64> {
    let plan = schedule.plan(principal);
    let other = benchmark.plan(principal);
    let len = plan.len().max(other.len());

    pad_to_length(&plan, len)
        .into_iter()
        .zip(pad_to_length(&other, len))
        .map(|(a, b)| a - b)
        .collect()
}

/// Copy of `values` zero-extended on the right to `len`
///
/// Values longer than `len` are returned unchanged.
pub fn pad_to_length(values: &[f64], len: usize) -> Vec<f64> {
    let mut padded = Vec::with_capacity(len.max(values.len()));
    padded.extend_from_slice(values);
    padded.resize(len.max(values.len()), 0.0);
    padded
}

/// Copy of `values` delayed by `periods` leading zeros
pub fn shift_right(values: &[f64], periods: usize) -> Vec<f64> {
    let mut shifted = vec![0.0; periods];
    shifted.extend_from_slice(values);
    shifted
}

/// Elementwise sum of vectors of any length, zero-extended to `min_len` or the longest
pub fn sum_aligned<'a, I>(vectors: I, min_len: usize) -> Vec<f64>
where
    I: IntoIterator<Item = &'a Vec<f64>> + Clone,
{
    let len = vectors
        .clone()
        .into_iter()
        .map(Vec::len)
        .fold(min_len, usize::max);

    let mut total = vec![0.0; len];
    for vector in vectors {
        for (acc, value) in total.iter_mut().zip(pad_to_length(vector, len)) {
            *acc += value;
        }
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rates::annual_irr_to_monthly_rate;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_reference_xy_plan() {
        let y_rate = annual_irr_to_monthly_rate(12, 0.1095).unwrap();
        let plan = xy_plan(10000.0, 0.1095 / 12.0, 6, y_rate, 12);

        assert_eq!(plan.len(), 19);
        assert_eq!(plan[0], -10000.0);
        for &cf in &plan[1..=6] {
            assert_abs_diff_eq!(cf, 91.25, epsilon = 1e-2);
        }
        for &cf in &plan[7..] {
            assert_abs_diff_eq!(cf, 883.583, epsilon = 1e-2);
        }
    }

    #[test]
    fn test_xy_plan_without_x_phase_is_pure_annuity() {
        let plan = xy_plan(1200.0, 0.05, 0, 0.01, 12);
        assert_eq!(plan.len(), 13);
        assert!(plan[1..].iter().all(|&cf| (cf - 112.0).abs() < 1e-9));
    }

    #[test]
    fn test_xy_plan_without_y_phase() {
        let plan = xy_plan(1000.0, 0.01, 3, 0.02, 0);
        assert_eq!(plan, vec![-1000.0, 10.0, 10.0, 10.0]);
    }

    #[test]
    fn test_principal_return_sums_to_principal() {
        let plan = principal_return_plan(10000.0, 6, 12).unwrap();
        assert_eq!(plan.len(), 19);
        assert!(plan[..=6].iter().all(|&cf| cf == 0.0));
        assert_abs_diff_eq!(plan.iter().sum::<f64>(), 10000.0, epsilon = 1e-9);

        let plan = principal_return_plan(1_000_000.0, 0, 7).unwrap();
        assert_abs_diff_eq!(plan.iter().sum::<f64>(), 1_000_000.0, epsilon = 1e-6);
    }

    #[test]
    fn test_principal_return_without_y_phase_is_rejected() {
        assert!(matches!(
            principal_return_plan(10000.0, 6, 0),
            Err(XYError::PreconditionViolation { .. })
        ));
    }

    #[test]
    fn test_reference_diff_plan() {
        let y_rate = annual_irr_to_monthly_rate(12, 0.1095).unwrap();
        let schedule = XYInterest::new(0.011, 6, 0.011, 12);
        let benchmark = XYInterest::new(0.1095 / 12.0, 6, y_rate, 12);

        let plan = diff_plan(20000.0, &schedule, &benchmark);
        assert_eq!(plan.len(), 19);
        assert_eq!(plan[0], 0.0);
        for &cf in &plan[1..=6] {
            assert_abs_diff_eq!(cf, 37.5, epsilon = 1e-2);
        }
        for &cf in &plan[7..] {
            assert_abs_diff_eq!(cf, 119.5, epsilon = 1e-2);
        }
    }

    #[test]
    fn test_diff_plan_aligns_unequal_lengths() {
        let short = XYInterest::new(0.0, 0, 0.0, 2);
        let long = XYInterest::new(0.0, 0, 0.0, 4);

        let plan = diff_plan(100.0, &short, &long);
        assert_eq!(plan, vec![0.0, 25.0, 25.0, -25.0, -25.0]);
    }

    #[test]
    fn test_alignment_helpers_copy() {
        let values = vec![1.0, 2.0];
        assert_eq!(pad_to_length(&values, 4), vec![1.0, 2.0, 0.0, 0.0]);
        assert_eq!(pad_to_length(&values, 1), vec![1.0, 2.0]);
        assert_eq!(shift_right(&values, 2), vec![0.0, 0.0, 1.0, 2.0]);
        assert_eq!(values, vec![1.0, 2.0]);

        let vectors = vec![vec![1.0], vec![1.0, 1.0, 1.0]];
        assert_eq!(sum_aligned(&vectors, 0), vec![2.0, 1.0, 1.0]);
        assert_eq!(sum_aligned(&vectors, 4), vec![2.0, 1.0, 1.0, 0.0]);
    }
}
