use tracing::debug;

use crate::error::Result;
use crate::hierarchy::{qualified_name, EXPENSES_ROOT};
use crate::models::Ledger;

/// Sets `currency` on every account below the Expenses root (the root itself
/// is left alone). Returns the number of accounts visited.
pub fn set_expense_currency(ledger: &mut Ledger, currency: &str) -> Result<usize> {
    let prefix = format!("{EXPENSES_ROOT}:");

    let mut matched = Vec::new();
    for id in ledger.accounts.keys() {
        if qualified_name(ledger, id)?.starts_with(&prefix) {
            matched.push(id.clone());
        }
    }

    for id in &matched {
        if let Some(account) = ledger.accounts.get_mut(id) {
            debug!(account = %id, from = %account.currency, to = currency, "currency");
            account.currency = currency.to_string();
        }
    }
    Ok(matched.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AccountType;
    use crate::testutil::{add_account, sample_ledger};

    #[test]
    fn test_expense_descendants_only() {
        let mut ledger = sample_ledger();
        let count = set_expense_currency(&mut ledger, "EUR").unwrap();
        assert_eq!(count, 2);
        assert_eq!(ledger.accounts["E1"].currency, "EUR");
        assert_eq!(ledger.accounts["E2"].currency, "EUR");
        assert_eq!(ledger.accounts["AStd::Expense"].currency, "USD");
        assert_eq!(ledger.accounts["A1"].currency, "USD");
        assert_eq!(ledger.accounts["I1"].currency, "USD");
    }

    #[test]
    fn test_similarly_named_root_not_matched() {
        let mut ledger = sample_ledger();
        add_account(&mut ledger, "X0", "ExpensesOld", None, AccountType::Expense);
        add_account(&mut ledger, "X1", "Misc", Some("X0"), AccountType::Expense);
        set_expense_currency(&mut ledger, "EUR").unwrap();
        assert_eq!(ledger.accounts["X1"].currency, "USD");
    }
}
