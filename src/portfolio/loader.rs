//! Load a plan book from CSV
//!
//! One row per plan:
//! `month,principal,x_rate,x_periods,y_rate,y_periods,annual_irr`.
//! Rows may come in any order; months with no rows become empty months.

use csv::Reader;
use std::path::Path;

use crate::error::{XYError, XYResult};
use crate::plan::XYInterest;
use super::PlanTuple;

/// Latest issue month a book may use: one hundred years of monthly cohorts
pub const MAX_BOOK_MONTH: usize = 1200;

/// Raw CSV row matching the plan book columns
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    month: usize,
    principal: f64,
    x_rate: f64,
    x_periods: u32,
    y_rate: f64,
    y_periods: u32,
    annual_irr: f64,
}

impl CsvRow {
    fn to_plan(self, row: usize) -> XYResult<(usize, PlanTuple)> {
        let invalid = |reason: String| XYError::InvalidInput { row, reason };

        if self.month > MAX_BOOK_MONTH {
            return Err(invalid(format!(
                "month {} is beyond the last bookable month {}",
                self.month, MAX_BOOK_MONTH
            )));
        }
        if !self.principal.is_finite() || self.principal <= 0.0 {
            return Err(invalid(format!("principal must be positive, got {}", self.principal)));
        }
        if self.y_periods == 0 {
            return Err(invalid("y_periods must be at least 1".to_string()));
        }
        for (name, value) in [
            ("x_rate", self.x_rate),
            ("y_rate", self.y_rate),
            ("annual_irr", self.annual_irr),
        ] {
            if !value.is_finite() {
                return Err(invalid(format!("{} is not a number", name)));
            }
        }

        let interest = XYInterest::new(self.x_rate, self.x_periods, self.y_rate, self.y_periods);
        Ok((self.month, PlanTuple::new(self.principal, interest, self.annual_irr)))
    }
}

/// Load a plan book from a CSV file
pub fn load_plan_book<P: AsRef<Path>>(path: P) -> XYResult<Vec<Vec<PlanTuple>>> {
    let reader = Reader::from_path(path)?;
    collect_book(reader)
}

/// Load a plan book from any reader (e.g., string buffer, stdin)
pub fn load_plan_book_from_reader<R: std::io::Read>(reader: R) -> XYResult<Vec<Vec<PlanTuple>>> {
    collect_book(Reader::from_reader(reader))
}

fn collect_book<R: std::io::Read>(mut reader: Reader<R>) -> XYResult<Vec<Vec<PlanTuple>>> {
    let mut book: Vec<Vec<PlanTuple>> = Vec::new();

    for (index, result) in reader.deserialize().enumerate() {
        let row: CsvRow = result?;
        // Data rows are numbered from 1, after the header
        let (month, plan) = row.to_plan(index + 1)?;

        if book.len() <= month {
            book.resize_with(month + 1, Vec::new);
        }
        book[month].push(plan);
    }

    Ok(book)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOOK: &str = "\
month,principal,x_rate,x_periods,y_rate,y_periods,annual_irr
0,2000000,0,0,0.011,12,0.1095
0,4000000,0.011,6,0.011,12,0.1095
2,4000000,0.01,6,0.01,12,0.1095
";

    #[test]
    fn test_load_plan_book() {
        let book = load_plan_book_from_reader(BOOK.as_bytes()).unwrap();

        assert_eq!(book.len(), 3);
        assert_eq!(book[0].len(), 2);
        assert!(book[1].is_empty());
        assert_eq!(book[2][0].interest, XYInterest::new(0.01, 6, 0.01, 12));
        assert_eq!(book[0][1].principal, 4_000_000.0);
    }

    #[test]
    fn test_invalid_row_is_reported() {
        let csv = "\
month,principal,x_rate,x_periods,y_rate,y_periods,annual_irr
0,1000,0.01,6,0.01,12,0.1095
1,1000,0.01,6,0.01,0,0.1095
";
        let err = load_plan_book_from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, XYError::InvalidInput { row: 2, .. }));
    }

    #[test]
    fn test_month_beyond_book_horizon_is_rejected() {
        for month in ["18446744073709551615", "1000000000000", "1201"] {
            let csv = format!(
                "month,principal,x_rate,x_periods,y_rate,y_periods,annual_irr\n\
                 0,1000,0.01,6,0.01,12,0.1095\n\
                 {},1000,0.01,6,0.01,12,0.1095\n",
                month
            );
            let err = load_plan_book_from_reader(csv.as_bytes()).unwrap_err();
            assert!(matches!(err, XYError::InvalidInput { row: 2, .. }), "month {}", month);
        }

        let csv = "\
month,principal,x_rate,x_periods,y_rate,y_periods,annual_irr
1200,1000,0.01,6,0.01,12,0.1095
";
        let book = load_plan_book_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(book.len(), MAX_BOOK_MONTH + 1);
    }

    #[test]
    fn test_malformed_csv_is_an_error() {
        let csv = "month,principal\n0,abc\n";
        assert!(matches!(
            load_plan_book_from_reader(csv.as_bytes()),
            Err(XYError::Csv(_))
        ));
    }
}
