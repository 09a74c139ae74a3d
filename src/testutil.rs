use crate::models::{Account, AccountType, Ledger, Payee, Split, Tag, Transaction};

pub fn add_account(ledger: &mut Ledger, id: &str, name: &str, parent: Option<&str>, account_type: AccountType) {
    ledger.accounts.insert(
        id.to_string(),
        Account {
            name: name.to_string(),
            parent: parent.map(str::to_string),
            account_type,
            currency: "USD".to_string(),
            ..Default::default()
        },
    );
}

/// Standard hierarchy, payees and tags, no transactions.
///
/// ```text
/// Assets       A1 Checking, A1 > A3 Rainy Day, A2 Wallet
/// Expenses     E1 Food, E1 > E2 Groceries
/// Income       I1 Salary
/// Equity       Q1 Opening Balances
/// Liabilities
/// ```
pub fn sample_ledger() -> Ledger {
    let mut ledger = Ledger::default();
    add_account(&mut ledger, "AStd::Asset", "Asset", None, AccountType::Asset);
    add_account(&mut ledger, "AStd::Liability", "Liability", None, AccountType::Liability);
    add_account(&mut ledger, "AStd::Expense", "Expense", None, AccountType::Expense);
    add_account(&mut ledger, "AStd::Income", "Income", None, AccountType::Income);
    add_account(&mut ledger, "AStd::Equity", "Equity", None, AccountType::Equity);
    add_account(&mut ledger, "A1", "Checking", Some("AStd::Asset"), AccountType::Checkings);
    add_account(&mut ledger, "A2", "Wallet", Some("AStd::Asset"), AccountType::Cash);
    add_account(&mut ledger, "A3", "Rainy Day", Some("A1"), AccountType::Savings);
    add_account(&mut ledger, "E1", "Food", Some("AStd::Expense"), AccountType::Expense);
    add_account(&mut ledger, "E2", "Groceries", Some("E1"), AccountType::Expense);
    add_account(&mut ledger, "I1", "Salary", Some("AStd::Income"), AccountType::Income);
    add_account(&mut ledger, "Q1", "Opening Balances", Some("AStd::Equity"), AccountType::Equity);

    for (id, name) in [("P1", "Grocer"), ("P2", "Employer")] {
        ledger.payees.insert(
            id.to_string(),
            Payee {
                name: name.to_string(),
                ..Default::default()
            },
        );
    }
    for (id, name) in [
        ("G1", "zeta"),
        ("G2", "alpha"),
        ("G3", "mike"),
        ("G4", "vacation"),
        ("G5", "business"),
    ] {
        ledger.tags.insert(
            id.to_string(),
            Tag {
                name: name.to_string(),
                ..Default::default()
            },
        );
    }
    ledger
}

pub fn split(account: &str, payee: Option<&str>, value: &str) -> Split {
    Split {
        account: account.to_string(),
        payee: payee.map(str::to_string),
        price: "1".to_string(),
        value: value.to_string(),
        ..Default::default()
    }
}

pub fn tagged(mut split: Split, tags: &[&str]) -> Split {
    split.tags = tags.iter().map(|t| t.to_string()).collect();
    split
}

pub fn add_txn(ledger: &mut Ledger, id: &str, post_date: &str, splits: Vec<Split>) {
    ledger.transactions.push(Transaction {
        id: id.to_string(),
        post_date: post_date.to_string(),
        splits,
        ..Default::default()
    });
}
