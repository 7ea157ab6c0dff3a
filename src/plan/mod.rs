//! Two-phase (XY) plans: schedules, cash-flow builders and IRR

mod interest;
mod builder;
mod irr;

pub use interest::XYInterest;
pub use builder::{xy_plan, principal_return_plan, diff_plan, pad_to_length, shift_right, sum_aligned};
pub use irr::{plan_irr, diff_plan_irr, NOMINAL_PRINCIPAL};
