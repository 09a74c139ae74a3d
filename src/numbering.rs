use tracing::debug;

use crate::models::Ledger;

/// Numbers every split of `account_id` 1..N in post date order.
/// Splits posted on the same date keep their document order.
pub fn assign_numbers(ledger: &mut Ledger, account_id: &str) -> usize {
    let mut positions: Vec<(usize, usize)> = Vec::new();
    for (t, txn) in ledger.transactions.iter().enumerate() {
        for (s, split) in txn.splits.iter().enumerate() {
            if split.account == account_id {
                positions.push((t, s));
            }
        }
    }

    let transactions = &mut ledger.transactions;
    positions.sort_by(|a, b| transactions[a.0].post_date.cmp(&transactions[b.0].post_date));

    for (n, (t, s)) in positions.iter().enumerate() {
        transactions[*t].splits[*s].number = (n + 1).to_string();
    }
    debug!(account = account_id, splits = positions.len(), "assigned numbers");
    positions.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{add_txn, sample_ledger, split};

    fn numbers_for(ledger: &Ledger, account_id: &str) -> Vec<(String, String)> {
        let mut out = Vec::new();
        for txn in &ledger.transactions {
            for s in &txn.splits {
                if s.account == account_id {
                    out.push((txn.post_date.clone(), s.number.clone()));
                }
            }
        }
        out
    }

    #[test]
    fn test_numbers_follow_post_date() {
        let mut ledger = sample_ledger();
        add_txn(&mut ledger, "T1", "2024-03-01", vec![split("A1", None, "1"), split("E1", None, "-1")]);
        add_txn(&mut ledger, "T2", "2024-01-15", vec![split("A1", None, "2"), split("E1", None, "-2")]);
        add_txn(&mut ledger, "T3", "2024-02-10", vec![split("E2", None, "3"), split("A1", None, "-3")]);
        let count = assign_numbers(&mut ledger, "A1");
        assert_eq!(count, 3);
        assert_eq!(ledger.transactions[1].splits[0].number, "1");
        assert_eq!(ledger.transactions[2].splits[1].number, "2");
        assert_eq!(ledger.transactions[0].splits[0].number, "3");
    }

    #[test]
    fn test_other_accounts_untouched() {
        let mut ledger = sample_ledger();
        let mut other = split("E1", None, "-1");
        other.number = "42".into();
        add_txn(&mut ledger, "T1", "2024-03-01", vec![split("A1", None, "1"), other]);
        assign_numbers(&mut ledger, "A1");
        assert_eq!(ledger.transactions[0].splits[1].number, "42");
    }

    #[test]
    fn test_sequence_is_contiguous_and_ordered() {
        let mut ledger = sample_ledger();
        for (i, date) in ["2024-05-01", "2024-01-01", "2024-05-01", "2023-12-31", "2024-02-29"]
            .iter()
            .enumerate()
        {
            add_txn(&mut ledger, &format!("T{i}"), date, vec![split("A2", None, "1"), split("E1", None, "-1")]);
        }
        assign_numbers(&mut ledger, "A2");
        let mut rows = numbers_for(&ledger, "A2");
        rows.sort_by_key(|(_, n)| n.parse::<usize>().unwrap());
        let numbers: Vec<usize> = rows.iter().map(|(_, n)| n.parse().unwrap()).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5]);
        assert!(rows.windows(2).all(|w| w[0].0 <= w[1].0));
    }

    #[test]
    fn test_same_date_keeps_document_order() {
        let mut ledger = sample_ledger();
        add_txn(&mut ledger, "T1", "2024-01-01", vec![split("A1", None, "1"), split("E1", None, "-1")]);
        add_txn(&mut ledger, "T2", "2024-01-01", vec![split("A1", None, "1"), split("E1", None, "-1")]);
        assign_numbers(&mut ledger, "A1");
        assert_eq!(ledger.transactions[0].splits[0].number, "1");
        assert_eq!(ledger.transactions[1].splits[0].number, "2");
    }

    #[test]
    fn test_account_without_splits() {
        let mut ledger = sample_ledger();
        assert_eq!(assign_numbers(&mut ledger, "A3"), 0);
    }
}
