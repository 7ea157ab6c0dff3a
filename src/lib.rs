//! XY Plans - cash-flow analytics for two-phase fixed-income products
//!
//! This library provides:
//! - Level-annuity primitives (payment, rate, NPV, IRR)
//! - Conversion between monthly plan rates and annualized IRR
//! - Cash-flow builders for XY plans, their principal return and plan differences
//! - IRR of a plan and of switching between two plans
//! - Portfolio aggregation of plans issued in different months

pub mod error;
pub mod annuity;
pub mod rates;
pub mod plan;
pub mod portfolio;
pub mod scenario;

// Re-export commonly used types
pub use error::{XYError, XYResult};
pub use plan::XYInterest;
pub use portfolio::{Portfolio, PortfolioState, PortfolioTimeline, PlanRecord, PlanTuple};
pub use rates::{annual_irr_to_monthly_rate, monthly_rate_to_annual_irr};
