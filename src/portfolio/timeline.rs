//! Consolidated portfolio timeline produced by `Portfolio::merge`

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::plan::{pad_to_length, sum_aligned};

/// Month-by-month totals across every plan in a portfolio
///
/// All four vectors share one length: the longest revenue or
/// principal-return vector stored in the portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioTimeline {
    /// Principal disbursed per month (negative), zero-extended
    pub principal: Vec<f64>,

    /// Sum of every plan's difference cash flow
    pub revenue: Vec<f64>,

    /// Sum of every plan's principal amortization
    pub principal_return: Vec<f64>,

    /// Running total of principal + revenue + principal return
    pub cumulative_present_value: Vec<f64>,
}

impl PortfolioTimeline {
    /// Align and sum the stored vectors, recomputing everything from scratch
    pub(crate) fn build(
        principal_by_month: &[f64],
        revenue_vectors: &[Vec<f64>],
        principal_return_vectors: &[Vec<f64>],
    ) -> Self {
        let revenue = sum_aligned(revenue_vectors, 0);
        let principal_return = sum_aligned(principal_return_vectors, revenue.len());
        let len = principal_return.len();
        let revenue = pad_to_length(&revenue, len);

        // Months past the longest plan vector never carry a disbursement
        let kept = principal_by_month.len().min(len);
        let principal = pad_to_length(&principal_by_month[..kept], len);

        let cumulative_present_value = principal
            .iter()
            .zip(&revenue)
            .zip(&principal_return)
            .scan(0.0, |total, ((p, r), pr)| {
                *total += p + r + pr;
                Some(*total)
            })
            .collect();

        Self {
            principal,
            revenue,
            principal_return,
            cumulative_present_value,
        }
    }

    /// Number of months covered
    pub fn len(&self) -> usize {
        self.revenue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.revenue.is_empty()
    }

    /// One row per month, dated from `origin` when given
    pub fn rows(&self, origin: Option<NaiveDate>) -> Vec<TimelineRow> {
        (0..self.len())
            .map(|month| TimelineRow {
                month,
                date: origin.and_then(|d| {
                    let offset = u32::try_from(month).ok()?;
                    d.checked_add_months(Months::new(offset))
                }),
                principal: self.principal[month],
                revenue: self.revenue[month],
                principal_return: self.principal_return[month],
                cumulative_present_value: self.cumulative_present_value[month],
            })
            .collect()
    }

    /// Get summary statistics
    pub fn summary(&self) -> TimelineSummary {
        let total_principal: f64 = -self.principal.iter().sum::<f64>();
        let total_revenue: f64 = self.revenue.iter().sum();
        let total_principal_return: f64 = self.principal_return.iter().sum();

        let final_present_value = self.cumulative_present_value.last().copied().unwrap_or(0.0);
        let payback_month = self.cumulative_present_value.iter().position(|&pv| pv >= 0.0);

        let (peak_revenue_month, peak_revenue) = self
            .revenue
            .iter()
            .copied()
            .enumerate()
            .fold((0, 0.0), |best, (month, revenue)| {
                if revenue > best.1 { (month, revenue) } else { best }
            });

        TimelineSummary {
            months: self.len(),
            total_principal,
            total_revenue,
            total_principal_return,
            final_present_value,
            payback_month,
            peak_revenue_month,
            peak_revenue,
        }
    }
}

/// A single month of the timeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineRow {
    pub month: usize,
    pub date: Option<NaiveDate>,
    pub principal: f64,
    pub revenue: f64,
    pub principal_return: f64,
    pub cumulative_present_value: f64,
}

/// Summary statistics for a timeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineSummary {
    pub months: usize,
    pub total_principal: f64,
    pub total_revenue: f64,
    pub total_principal_return: f64,
    pub final_present_value: f64,
    /// First month the cumulative present value is non-negative
    pub payback_month: Option<usize>,
    pub peak_revenue_month: usize,
    pub peak_revenue: f64,
}
