//! Rate schedule of a two-phase (XY) plan

use serde::{Deserialize, Serialize};

use crate::error::XYResult;
use crate::rates::{annual_irr_to_monthly_rate, PERIODS_PER_YEAR};
use super::builder::{principal_return_plan, xy_plan};

/// Periodic rate and period count of each phase of one plan
///
/// The X phase pays flat interest `principal * x_rate`; the Y phase pays
/// `principal * y_rate` plus a straight-line share of the principal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct XYInterest {
    pub x_rate: f64,
    pub x_periods: u32,
    pub y_rate: f64,
    pub y_periods: u32,
}

impl XYInterest {
    pub fn new(x_rate: f64, x_periods: u32, y_rate: f64, y_periods: u32) -> Self {
        Self {
            x_rate,
            x_periods,
            y_rate,
            y_periods,
        }
    }

    /// Schedule that yields `annual_irr` over the same phase lengths
    ///
    /// The X phase pays `annual_irr / 12` flat and the Y phase pays the monthly
    /// rate equivalent to `annual_irr`. This is the benchmark a product is
    /// usually differenced against.
    pub fn benchmark(x_periods: u32, y_periods: u32, annual_irr: f64) -> XYResult<Self> {
        Ok(Self {
            x_rate: annual_irr / PERIODS_PER_YEAR,
            x_periods,
            y_rate: annual_irr_to_monthly_rate(y_periods, annual_irr)?,
            y_periods,
        })
    }

    /// Number of payment periods after the disbursement period
    pub fn total_periods(&self) -> usize {
        self.x_periods as usize + self.y_periods as usize
    }

    /// Cash flows of this schedule on `principal`
    pub fn plan(&self, principal: f64) -> Vec<f64> {
        xy_plan(principal, self.x_rate, self.x_periods, self.y_rate, self.y_periods)
    }

    /// Principal-return component of this schedule on `principal`
    pub fn principal_return(&self, principal: f64) -> XYResult<Vec<f64>> {
        principal_return_plan(principal, self.x_periods, self.y_periods)
    }
}
