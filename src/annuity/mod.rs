//! Level-annuity primitives: payment, rate, NPV and IRR
//!
//! Sign convention follows the usual spreadsheet one: money paid out is
//! negative, so a loan of 1 has `present_value = -1` and a positive payment.
//! Payments fall at the end of each period and the future value is 0 unless
//! stated.

mod irr;

pub use irr::{irr, npv};

use log::debug;

use crate::error::{XYError, XYResult};

/// Starting guess for the annuity rate solve
const RATE_GUESS: f64 = 0.1;
/// Step size at which the rate solve is considered converged
const RATE_TOLERANCE: f64 = 1e-10;
const RATE_MAX_ITERATIONS: u32 = 100;
/// Below this magnitude the rate is treated as zero and the linear limits apply
const ZERO_RATE: f64 = 1e-12;

/// Periodic payment of a `periods`-period annuity at periodic `rate`
///
/// Closed form `-(pv * r * (1+r)^n) / ((1+r)^n - 1)`, with the linear limit
/// `-pv / n` at `rate == 0`.
pub fn payment(rate: f64, periods: u32, present_value: f64) -> XYResult<f64> {
    let exponent = period_exponent(periods)?;

    let n = periods as f64;
    if rate.abs() < ZERO_RATE {
        return Ok(-present_value / n);
    }

    let factor = (1.0 + rate).powi(exponent);
    let pmt = -(present_value * rate * factor) / (factor - 1.0);
    if !pmt.is_finite() {
        return Err(XYError::rate_solve_failed(0, f64::NAN));
    }
    Ok(pmt)
}

/// Periodic rate solving `pv*(1+r)^n + pmt*((1+r)^n - 1)/r + fv = 0`
///
/// Newton-Raphson from a 10% guess. Fails with `RateSolveFailed` when the
/// iteration leaves the admissible domain (`r > -1`), the derivative vanishes,
/// or it does not settle within the iteration limit.
pub fn rate(periods: u32, payment: f64, present_value: f64, future_value: f64) -> XYResult<f64> {
    let exponent = period_exponent(periods)?;

    let mut r = RATE_GUESS;

    for iteration in 0..RATE_MAX_ITERATIONS {
        let (g, dg) = annuity_equation(exponent, payment, present_value, future_value, r);

        if !g.is_finite() || !dg.is_finite() || dg.abs() < 1e-20 {
            return Err(XYError::rate_solve_failed(iteration, g.abs()));
        }

        let step = g / dg;
        r -= step;

        if !r.is_finite() || r <= -1.0 {
            return Err(XYError::rate_solve_failed(iteration + 1, g.abs()));
        }

        if step.abs() < RATE_TOLERANCE {
            debug!("annuity rate converged to {:.10} in {} iterations", r, iteration + 1);
            return Ok(r);
        }
    }

    let (residual, _) = annuity_equation(exponent, payment, present_value, future_value, r);
    Err(XYError::rate_solve_failed(RATE_MAX_ITERATIONS, residual.abs()))
}

/// Period count as a `powi` exponent; zero or out of `i32` range has no annuity
fn period_exponent(periods: u32) -> XYResult<i32> {
    match i32::try_from(periods) {
        Ok(exponent) if exponent > 0 => Ok(exponent),
        _ => Err(XYError::rate_solve_failed(0, f64::NAN)),
    }
}

/// Annuity equation value and its derivative with respect to the rate
fn annuity_equation(periods: i32, payment: f64, pv: f64, fv: f64, r: f64) -> (f64, f64) {
    let n = f64::from(periods);

    if r.abs() < ZERO_RATE {
        let g = pv + payment * n + fv;
        let dg = n * pv + payment * n * (n - 1.0) / 2.0;
        return (g, dg);
    }

    let growth = (1.0 + r).powi(periods - 1);
    let factor = growth * (1.0 + r);

    let g = pv * factor + payment * (factor - 1.0) / r + fv;
    let dg = n * pv * growth + payment * (n * r * growth - (factor - 1.0)) / (r * r);
    (g, dg)
}
