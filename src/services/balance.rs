//! Double-entry balance checks
//!
//! All arithmetic here is on integer minor units. Formatted amounts are
//! only ever produced for messages, never read back.

use crate::error::{LedgerError, LedgerResult};
use crate::models::{EntryRow, Money};

/// Sum of signed amounts
///
/// Overflow is reported as a validation error instead of wrapping.
pub fn sum_values(values: impl IntoIterator<Item = Money>) -> LedgerResult<Money> {
    values.into_iter().try_fold(Money::zero(), |acc, value| {
        acc.checked_add(value)
            .ok_or_else(|| LedgerError::Validation("Entry total is out of range".into()))
    })
}

/// Sum of the signed values of `rows`
pub fn total<'a>(rows: impl IntoIterator<Item = &'a EntryRow>) -> LedgerResult<Money> {
    sum_values(rows.into_iter().map(|row| row.value))
}

/// Check that `rows` sum to exactly zero
///
/// On failure the error carries the signed discrepancy, i.e. the amount
/// by which the rows are off.
pub fn validate_balance(rows: &[EntryRow]) -> LedgerResult<()> {
    let sum = total(rows)?;
    if sum.is_zero() {
        Ok(())
    } else {
        Err(LedgerError::Unbalanced { discrepancy: sum })
    }
}

/// The value a new row needs so that rows with `values` balance
pub fn balancing_value(values: impl IntoIterator<Item = Money>) -> LedgerResult<Money> {
    sum_values(values)?
        .checked_neg()
        .ok_or_else(|| LedgerError::Validation("Entry total is out of range".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EntryId, LedgerId};
    use chrono::NaiveDate;

    fn rows(values: &[i64]) -> Vec<EntryRow> {
        let entry = EntryId::new();
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        values
            .iter()
            .map(|v| EntryRow::new(entry, LedgerId::new(), date, Money::from_cents(*v)))
            .collect()
    }

    #[test]
    fn test_balanced_rows_pass() {
        assert!(validate_balance(&rows(&[1000, -1000])).is_ok());
        assert!(validate_balance(&rows(&[1000, -250, -750])).is_ok());
    }

    #[test]
    fn test_unbalanced_rows_report_discrepancy() {
        let err = validate_balance(&rows(&[1000, -900])).unwrap_err();
        match err {
            LedgerError::Unbalanced { discrepancy } => {
                assert_eq!(discrepancy, Money::from_cents(100))
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_entry_is_balanced() {
        assert!(validate_balance(&[]).is_ok());
    }

    #[test]
    fn test_overflow_is_an_error() {
        let err = total(&rows(&[i64::MAX, 1])).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_balancing_value() {
        assert_eq!(
            balancing_value([1000, -300].map(Money::from_cents)).unwrap(),
            Money::from_cents(-700)
        );
        assert!(balancing_value(Vec::new()).unwrap().is_zero());
    }

    #[test]
    fn test_balancing_value_of_minimum_total_is_an_error() {
        let err = balancing_value([Money::from_cents(i64::MIN)]).unwrap_err();
        assert!(err.is_validation());
    }
}
