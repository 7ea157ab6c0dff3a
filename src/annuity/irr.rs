//! Internal Rate of Return (IRR) of an arbitrary cash-flow sequence
//!
//! The root is bracketed first so that the smallest admissible rate is
//! returned when the sign pattern allows several, then refined by
//! Newton-Raphson safeguarded with bisection.

use log::{debug, warn};

use crate::error::{XYError, XYResult};

/// Finest approach to -100% scanned, as a power of `10^-1/2`
const LOWER_TAIL_STEPS: u32 = 30;
/// Start of the evenly spaced part of the scan
const SCAN_LOW: f64 = -0.99;
const SCAN_STEP: f64 = 0.01;
/// Linear steps from -99%, ending just below 1000% per period
const LINEAR_STEPS: u32 = 1100;
/// Doubling stops here; beyond it NPV is indistinguishable from `cashflows[0]`
const SCAN_CEILING: f64 = 1e12;
const TOLERANCE: f64 = 1e-12;
const MAX_ITERATIONS: u32 = 1000;

/// Calculate the periodic IRR of a series of cash flows
///
/// # Arguments
/// * `cashflows` - Cash flow per period, index 0 undiscounted (positive = inflow)
///
/// # Returns
/// * The smallest periodic rate above -100% with zero NPV, or `IrrUndefined`
///   when the flows are empty, all zero, without a sign change, or have no
///   real root
pub fn irr(cashflows: &[f64]) -> XYResult<f64> {
    if cashflows.is_empty() {
        return Err(XYError::irr_undefined("no cash flows"));
    }

    let has_positive = cashflows.iter().any(|&cf| cf > 1e-10);
    let has_negative = cashflows.iter().any(|&cf| cf < -1e-10);
    if !has_positive || !has_negative {
        return Err(XYError::irr_undefined("cash flows never change sign"));
    }

    let (low, high, value_low) = bracket_smallest_root(cashflows)
        .ok_or_else(|| XYError::irr_undefined("no real rate above -100% zeroes the NPV"))?;
    debug!("IRR bracketed in [{:.6}, {:.6}]", low, high);

    if value_low == 0.0 {
        return Ok(low);
    }
    Ok(refine(cashflows, low, high, value_low))
}

/// Net present value of `cashflows` at periodic `rate`
pub fn npv(rate: f64, cashflows: &[f64]) -> f64 {
    let discount = 1.0 / (1.0 + rate);
    cashflows.iter().rev().fold(0.0, |acc, &cf| acc * discount + cf)
}

/// A function with the sign and roots of NPV, and its derivative
///
/// Below 0% the NPV is multiplied by `(1+r)^(n-1)`, a polynomial in `1+r`
/// that stays finite as the rate approaches -100%. At and above 0% it is the
/// NPV itself, a polynomial in `1/(1+r)` that stays finite as the rate grows.
fn npv_profile(cashflows: &[f64], rate: f64) -> (f64, f64) {
    let growth = 1.0 + rate;

    if rate < 0.0 {
        let mut value = 0.0;
        let mut slope = 0.0;
        for &cf in cashflows {
            slope = slope * growth + value;
            value = value * growth + cf;
        }
        return (value, slope);
    }

    let discount = 1.0 / growth;
    let mut value = 0.0;
    let mut slope = 0.0;
    for &cf in cashflows.iter().rev() {
        slope = slope * discount + value;
        value = value * discount + cf;
    }
    (value, -slope * discount * discount)
}

/// Increasing scan points: geometric toward -100%, linear to 1000%, then doubling
fn scan_points() -> impl Iterator<Item = f64> {
    let lower_tail = (5..=LOWER_TAIL_STEPS)
        .rev()
        .map(|k| -1.0 + 10f64.powf(-(k as f64) / 2.0));
    let linear = (0..LINEAR_STEPS).map(|i| SCAN_LOW + i as f64 * SCAN_STEP);
    let upper_tail = std::iter::successors(Some(20.0_f64), |r| Some(r * 2.0))
        .take_while(|&r| r <= SCAN_CEILING);

    lower_tail.chain(linear).chain(upper_tail)
}

/// First scan interval over which the NPV changes sign
///
/// Returns `(low, high, value at low)`; a scan point with exactly zero NPV is
/// returned as `(point, point, 0.0)`.
fn bracket_smallest_root(cashflows: &[f64]) -> Option<(f64, f64, f64)> {
    let mut previous: Option<(f64, f64)> = None;

    for rate in scan_points() {
        let (value, _) = npv_profile(cashflows, rate);
        if !value.is_finite() {
            continue;
        }
        if value == 0.0 {
            return Some((rate, rate, 0.0));
        }
        if let Some((low, value_low)) = previous {
            if (value_low < 0.0) != (value < 0.0) {
                return Some((low, rate, value_low));
            }
        }
        previous = Some((rate, value));
    }

    None
}

/// Newton-Raphson inside a sign-change bracket, bisecting whenever a step
/// would leave it
///
/// Converges on step size relative to the rate, never on the NPV value, so
/// the accuracy does not depend on the scale of the cash flows.
fn refine(cashflows: &[f64], mut low: f64, mut high: f64, value_low: f64) -> f64 {
    let low_is_negative = value_low < 0.0;
    let mut rate = (low + high) / 2.0;

    for _ in 0..MAX_ITERATIONS {
        let (value, slope) = npv_profile(cashflows, rate);
        if value == 0.0 {
            return rate;
        }

        if (value < 0.0) == low_is_negative {
            low = rate;
        } else {
            high = rate;
        }

        let newton = rate - value / slope;
        let next = if newton > low && newton < high {
            newton
        } else {
            (low + high) / 2.0
        };

        let tolerance = TOLERANCE * rate.abs().max(1.0);
        if (next - rate).abs() < tolerance || high - low < tolerance {
            return next;
        }
        rate = next;
    }

    warn!("IRR refinement stopped after {} iterations in [{:.12}, {:.12}]", MAX_ITERATIONS, low, high);
    (low + high) / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_simple_irr() {
        // Investment of 1000 returning 1100 one period later
        let rate = irr(&[-1000.0, 1100.0]).unwrap();
        assert_abs_diff_eq!(rate, 0.10, epsilon = 1e-9);
    }

    #[test]
    fn test_level_cashflows() {
        // 10000 out, twelve monthly receipts of 933.33
        let mut cashflows = vec![-10000.0];
        cashflows.extend(vec![933.33; 12]);

        let rate = irr(&cashflows).unwrap();
        assert_abs_diff_eq!(rate, 0.01788, epsilon = 1e-5);
        assert_abs_diff_eq!(npv(rate, &cashflows), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_negative_rate() {
        // Only 900 of 1000 comes back
        let rate = irr(&[-1000.0, 900.0]).unwrap();
        assert_abs_diff_eq!(rate, -0.10, epsilon = 1e-9);
    }

    #[test]
    fn test_smallest_of_two_roots() {
        // NPV = -1 + 2.3/(1+r) - 1.32/(1+r)^2 has roots at r = 0.1 and r = 0.2
        let rate = irr(&[-1.0, 2.3, -1.32]).unwrap();
        assert_abs_diff_eq!(rate, 0.1, epsilon = 1e-9);
    }

    #[test]
    fn test_accuracy_independent_of_scale() {
        // Same shape at a millionth of the size: shallow NPV slope
        let mut cashflows = vec![-1e-6];
        cashflows.extend(vec![1e-7; 12]);
        let small = irr(&cashflows).unwrap();

        let mut cashflows = vec![-1.0];
        cashflows.extend(vec![0.1; 12]);
        let unit = irr(&cashflows).unwrap();

        assert_abs_diff_eq!(small, unit, epsilon = 1e-10);
        assert_abs_diff_eq!(unit, 0.0292285, epsilon = 1e-6);
    }

    #[test]
    fn test_root_above_one_thousand_percent() {
        let rate = irr(&[-1.0, 21.0]).unwrap();
        assert_abs_diff_eq!(rate, 20.0, epsilon = 1e-9);
    }

    #[test]
    fn test_root_close_to_minus_one_hundred_percent() {
        let rate = irr(&[-1000.0, 5.0]).unwrap();
        assert_abs_diff_eq!(rate, -0.995, epsilon = 1e-9);
    }

    #[test]
    fn test_npv_matches_direct_discounting() {
        let cashflows = [-100.0, 30.0, 40.0, 50.0];
        let direct: f64 = cashflows
            .iter()
            .enumerate()
            .map(|(t, cf)| cf / 1.05_f64.powi(t as i32))
            .sum();
        assert_abs_diff_eq!(npv(0.05, &cashflows), direct, epsilon = 1e-12);
    }

    #[test]
    fn test_no_sign_change_is_undefined() {
        assert!(matches!(irr(&[100.0, 50.0, 25.0]), Err(XYError::IrrUndefined { .. })));
        assert!(matches!(irr(&[0.0, 0.0]), Err(XYError::IrrUndefined { .. })));
        assert!(matches!(irr(&[]), Err(XYError::IrrUndefined { .. })));
    }

    #[test]
    fn test_sign_change_without_real_root_is_undefined() {
        // NPV = 1 - 2/(1+r) + 2/(1+r)^2 is positive for every real r > -1
        assert!(matches!(irr(&[1.0, -2.0, 2.0]), Err(XYError::IrrUndefined { .. })));
    }
}
