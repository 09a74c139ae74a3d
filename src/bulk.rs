use crate::models::{Ledger, ReconcileFlag, Split};

fn all_splits(ledger: &mut Ledger) -> impl Iterator<Item = &mut Split> {
    ledger.transactions.iter_mut().flat_map(|t| t.splits.iter_mut())
}

pub fn erase_numbers(ledger: &mut Ledger) -> usize {
    let mut count = 0;
    for split in all_splits(ledger) {
        split.number.clear();
        count += 1;
    }
    count
}

pub fn set_reconcile_flag(ledger: &mut Ledger, flag: ReconcileFlag) -> usize {
    let mut count = 0;
    for split in all_splits(ledger) {
        split.reconcile_flag = flag;
        count += 1;
    }
    count
}
