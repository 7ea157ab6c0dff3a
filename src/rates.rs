//! Conversion between a monthly plan rate and an annualized IRR
//!
//! A monthly rate `m` over `n` periods describes a level annuity of amount 1
//! paying `1/n + m` each period: straight-line principal plus interest on the
//! original amount. Its IRR, annualized by x12, is the equivalent annual rate.

use crate::annuity;
use crate::error::{XYError, XYResult};

/// Months per year used to annualize periodic rates
pub const PERIODS_PER_YEAR: f64 = 12.0;

/// Annualized IRR of a level annuity paying `1/periods + monthly_rate`
pub fn monthly_rate_to_annual_irr(periods: u32, monthly_rate: f64) -> XYResult<f64> {
    require_periods(periods)?;
    let payment = 1.0 / periods as f64 + monthly_rate;
    let periodic = annuity::rate(periods, payment, -1.0, 0.0)?;
    Ok(periodic * PERIODS_PER_YEAR)
}

/// Monthly plan rate whose level annuity has the given annualized IRR
pub fn annual_irr_to_monthly_rate(periods: u32, annual_rate: f64) -> XYResult<f64> {
    require_periods(periods)?;
    let payment = annuity::payment(annual_rate / PERIODS_PER_YEAR, periods, -1.0)?;
    Ok(payment - 1.0 / periods as f64)
}

fn require_periods(periods: u32) -> XYResult<()> {
    if periods == 0 {
        return Err(XYError::precondition(
            "rate conversion needs at least one period",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_reference_monthly_rate() {
        let monthly = annual_irr_to_monthly_rate(12, 0.1095).unwrap();
        assert_abs_diff_eq!(monthly, 0.005025, epsilon = 5e-7);
    }

    #[test]
    fn test_round_trip() {
        for &periods in &[1, 3, 12, 36, 120] {
            for &annual in &[0.0, 0.01, 0.1095, 0.5, 0.99] {
                let monthly = annual_irr_to_monthly_rate(periods, annual).unwrap();
                let back = monthly_rate_to_annual_irr(periods, monthly).unwrap();
                assert_abs_diff_eq!(back, annual, epsilon = 1e-5);
            }
        }
    }

    #[test]
    fn test_zero_periods_is_precondition_violation() {
        assert!(matches!(
            annual_irr_to_monthly_rate(0, 0.1),
            Err(XYError::PreconditionViolation { .. })
        ));
        assert!(matches!(
            monthly_rate_to_annual_irr(0, 0.01),
            Err(XYError::PreconditionViolation { .. })
        ));
    }
}
