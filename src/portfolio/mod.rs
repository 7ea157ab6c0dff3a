//! Portfolio aggregation of XY plans issued in different months
//!
//! A `Portfolio` is a fixed grid of `duration` monthly buckets. Each `add`
//! records one plan: its principal is disbursed in the start month, and its
//! difference cash flow and principal-return flow are stored shifted to that
//! month. `merge` sums everything into a `PortfolioTimeline`.
//!
//! # Example
//!
//! ```rust
//! use xy_plans::{Portfolio, XYInterest};
//!
//! let mut portfolio = Portfolio::new(12).unwrap();
//! let product = XYInterest::new(0.011, 6, 0.011, 12);
//! portfolio.add_with_irr(0, 4_000_000.0, product, 0.1095).unwrap();
//! portfolio.add_with_irr(1, 4_000_000.0, product, 0.1095).unwrap();
//!
//! let timeline = portfolio.merge().unwrap();
//! assert_eq!(timeline.len(), 20);
//! ```

mod timeline;
pub mod loader;

pub use timeline::{PortfolioTimeline, TimelineRow, TimelineSummary};
pub use loader::{load_plan_book, load_plan_book_from_reader};

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::error::{XYError, XYResult};
use crate::plan::{diff_plan, shift_right, XYInterest};

/// Lifecycle of a portfolio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PortfolioState {
    /// No plan added yet
    Empty,
    /// Plans added since the last merge; no current timeline
    Accumulating,
    /// Timeline reflects every added plan
    Merged,
}

/// One plan as added to a portfolio
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanRecord {
    pub start_month: usize,
    pub principal: f64,

    /// Schedule actually paid on the principal
    pub schedule: XYInterest,

    /// Schedule the plan is differenced against
    pub benchmark: XYInterest,
}

/// One plan of a batch month: principal, schedule and benchmark IRR
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanTuple {
    pub principal: f64,
    pub interest: XYInterest,
    pub annual_irr: f64,
}

impl PlanTuple {
    pub fn new(principal: f64, interest: XYInterest, annual_irr: f64) -> Self {
        Self {
            principal,
            interest,
            annual_irr,
        }
    }
}

/// Validated plan with its vectors computed, ready to be stored
struct PreparedPlan {
    record: PlanRecord,
    revenue: Vec<f64>,
    principal_return: Vec<f64>,
}

/// Monthly grid of plans with a consolidated timeline
#[derive(Debug, Clone)]
pub struct Portfolio {
    duration: usize,
    state: PortfolioState,
    records: Vec<PlanRecord>,
    principal_by_month: Vec<f64>,
    revenue_vectors: Vec<Vec<f64>>,
    principal_return_vectors: Vec<Vec<f64>>,
    timeline: Option<PortfolioTimeline>,
}

impl Portfolio {
    /// Create an empty portfolio spanning `duration` months
    pub fn new(duration: usize) -> XYResult<Self> {
        if duration == 0 {
            return Err(XYError::precondition("portfolio duration must be at least one month"));
        }

        Ok(Self {
            duration,
            state: PortfolioState::Empty,
            records: Vec::new(),
            principal_by_month: vec![0.0; duration],
            revenue_vectors: Vec::new(),
            principal_return_vectors: Vec::new(),
            timeline: None,
        })
    }

    /// Record a plan paying `schedule`, differenced against `benchmark`
    ///
    /// Fails without touching the portfolio when `start_month` is outside the
    /// grid, the principal is not finite, or `schedule` has no Y phase.
    pub fn add(
        &mut self,
        start_month: usize,
        principal: f64,
        schedule: XYInterest,
        benchmark: XYInterest,
    ) -> XYResult<()> {
        let prepared = self.prepare(start_month, principal, schedule, benchmark)?;
        self.commit(prepared);
        Ok(())
    }

    /// Record a plan differenced against the benchmark yielding `annual_irr`
    ///
    /// The benchmark shares the schedule's phase lengths; see
    /// [`XYInterest::benchmark`].
    pub fn add_with_irr(
        &mut self,
        start_month: usize,
        principal: f64,
        schedule: XYInterest,
        annual_irr: f64,
    ) -> XYResult<()> {
        let benchmark = XYInterest::benchmark(schedule.x_periods, schedule.y_periods, annual_irr)?;
        self.add(start_month, principal, schedule, benchmark)
    }

    /// Add every plan of `months[k]` at month `from_month + k`
    ///
    /// All plans are validated before any is stored, so a failing batch leaves
    /// the portfolio unchanged.
    pub fn add_batch<M>(&mut self, months: &[M], from_month: usize) -> XYResult<()>
    where
        M: AsRef<[PlanTuple]>,
    {
        let mut prepared = Vec::new();

        for (offset, plans) in months.iter().enumerate() {
            let month = from_month
                .checked_add(offset)
                .ok_or_else(|| XYError::precondition("batch month overflows the grid index"))?;
            for plan in plans.as_ref() {
                let benchmark = XYInterest::benchmark(
                    plan.interest.x_periods,
                    plan.interest.y_periods,
                    plan.annual_irr,
                )?;
                prepared.push(self.prepare(month, plan.principal, plan.interest, benchmark)?);
            }
        }

        debug!("adding batch of {} plans from month {}", prepared.len(), from_month);
        for plan in prepared {
            self.commit(plan);
        }
        Ok(())
    }

    /// Sum every stored vector into a fresh timeline
    ///
    /// Always recomputes from the stored plans, so repeated calls give the
    /// same result and a merge after further adds reflects them all.
    pub fn merge(&mut self) -> XYResult<&PortfolioTimeline> {
        if self.state == PortfolioState::Empty {
            return Err(XYError::precondition("cannot merge a portfolio with no plans"));
        }

        let timeline = PortfolioTimeline::build(
            &self.principal_by_month,
            &self.revenue_vectors,
            &self.principal_return_vectors,
        );
        debug!(
            "merged {} plans into a {}-month timeline",
            self.records.len(),
            timeline.len()
        );

        self.state = PortfolioState::Merged;
        Ok(&*self.timeline.insert(timeline))
    }

    pub fn duration(&self) -> usize {
        self.duration
    }

    pub fn state(&self) -> PortfolioState {
        self.state
    }

    pub fn records(&self) -> &[PlanRecord] {
        &self.records
    }

    /// Principal disbursed per month, negative
    pub fn principal_by_month(&self) -> &[f64] {
        &self.principal_by_month
    }

    /// Timeline of the last merge, if no plan was added since
    pub fn timeline(&self) -> Option<&PortfolioTimeline> {
        match self.state {
            PortfolioState::Merged => self.timeline.as_ref(),
            _ => None,
        }
    }

    fn prepare(
        &self,
        start_month: usize,
        principal: f64,
        schedule: XYInterest,
        benchmark: XYInterest,
    ) -> XYResult<PreparedPlan> {
        if start_month >= self.duration {
            return Err(XYError::precondition(format!(
                "start month {} outside [0, {})",
                start_month, self.duration
            )));
        }
        if !principal.is_finite() {
            return Err(XYError::precondition(format!("principal {} is not finite", principal)));
        }

        let principal_return = shift_right(&schedule.principal_return(principal)?, start_month);
        let revenue = shift_right(&diff_plan(principal, &schedule, &benchmark), start_month);

        Ok(PreparedPlan {
            record: PlanRecord {
                start_month,
                principal,
                schedule,
                benchmark,
            },
            revenue,
            principal_return,
        })
    }

    fn commit(&mut self, plan: PreparedPlan) {
        trace!(
            "plan of {:.2} at month {} spanning {} months",
            plan.record.principal,
            plan.record.start_month,
            plan.revenue.len()
        );

        self.principal_by_month[plan.record.start_month] -= plan.record.principal;
        self.revenue_vectors.push(plan.revenue);
        self.principal_return_vectors.push(plan.principal_return);
        self.records.push(plan.record);
        self.state = PortfolioState::Accumulating;
    }
}
