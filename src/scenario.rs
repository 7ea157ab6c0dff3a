//! Plan books: monthly issuance run through a portfolio
//!
//! A book is a sequence of months, each a list of plans issued that month.
//! The reference book issues the same three-product mix every month for a
//! year against a 10.95% benchmark.

use crate::error::XYResult;
use crate::plan::XYInterest;
use crate::portfolio::{PlanTuple, Portfolio};

/// Benchmark annual IRR of the reference book
pub const REFERENCE_ANNUAL_IRR: f64 = 0.1095;

/// Months of issuance in the reference book
pub const REFERENCE_MONTHS: usize = 12;

/// Product mix issued each month of the reference book
pub fn reference_month() -> Vec<PlanTuple> {
    vec![
        PlanTuple::new(2_000_000.0, XYInterest::new(0.0, 0, 0.011, 12), REFERENCE_ANNUAL_IRR),
        PlanTuple::new(4_000_000.0, XYInterest::new(0.011, 6, 0.011, 12), REFERENCE_ANNUAL_IRR),
        PlanTuple::new(4_000_000.0, XYInterest::new(0.01, 6, 0.01, 12), REFERENCE_ANNUAL_IRR),
    ]
}

/// Twelve months of the reference product mix
pub fn reference_book() -> Vec<Vec<PlanTuple>> {
    vec![reference_month(); REFERENCE_MONTHS]
}

/// Same book with every plan benchmarked against `annual_irr`
pub fn with_benchmark_irr(book: &[Vec<PlanTuple>], annual_irr: f64) -> Vec<Vec<PlanTuple>> {
    book.iter()
        .map(|month| {
            month
                .iter()
                .map(|plan| PlanTuple { annual_irr, ..*plan })
                .collect()
        })
        .collect()
}

/// Issue `book` from `from_month` onward on a `duration`-month portfolio
///
/// The portfolio is returned merged.
pub fn run_book(book: &[Vec<PlanTuple>], duration: usize, from_month: usize) -> XYResult<Portfolio> {
    let mut portfolio = Portfolio::new(duration)?;
    portfolio.add_batch(book, from_month)?;
    portfolio.merge()?;
    Ok(portfolio)
}

/// Distinct `(schedule, benchmark annual IRR)` pairings of a book, in order
/// of first appearance
///
/// A schedule sold against two benchmarks appears once per benchmark.
pub fn distinct_pairings(book: &[Vec<PlanTuple>]) -> Vec<(XYInterest, f64)> {
    let mut pairings: Vec<(XYInterest, f64)> = Vec::new();
    for plan in book.iter().flatten() {
        let seen = pairings
            .iter()
            .any(|&(schedule, irr)| schedule == plan.interest && irr == plan.annual_irr);
        if !seen {
            pairings.push((plan.interest, plan.annual_irr));
        }
    }
    pairings
}
