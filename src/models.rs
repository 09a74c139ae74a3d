use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::{KmyError, Result};

/// Account types as numbered by KMyMoney (`mymoneyenums.h`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum AccountType {
    #[default]
    Unknown,
    Checkings,
    Savings,
    Cash,
    CreditCard,
    Loan,
    CertificateDep,
    Investment,
    MoneyMarket,
    Asset,
    Liability,
    Currency,
    Income,
    Expense,
    AssetLoan,
    Stock,
    Equity,
}

const ACCOUNT_TYPES: [AccountType; 17] = [
    AccountType::Unknown,
    AccountType::Checkings,
    AccountType::Savings,
    AccountType::Cash,
    AccountType::CreditCard,
    AccountType::Loan,
    AccountType::CertificateDep,
    AccountType::Investment,
    AccountType::MoneyMarket,
    AccountType::Asset,
    AccountType::Liability,
    AccountType::Currency,
    AccountType::Income,
    AccountType::Expense,
    AccountType::AssetLoan,
    AccountType::Stock,
    AccountType::Equity,
];

impl AccountType {
    pub fn code(self) -> i64 {
        self as i64
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AccountType::Unknown => "Unknown",
            AccountType::Checkings => "Checkings",
            AccountType::Savings => "Savings",
            AccountType::Cash => "Cash",
            AccountType::CreditCard => "CreditCard",
            AccountType::Loan => "Loan",
            AccountType::CertificateDep => "CertificateDep",
            AccountType::Investment => "Investment",
            AccountType::MoneyMarket => "MoneyMarket",
            AccountType::Asset => "Asset",
            AccountType::Liability => "Liability",
            AccountType::Currency => "Currency",
            AccountType::Income => "Income",
            AccountType::Expense => "Expense",
            AccountType::AssetLoan => "AssetLoan",
            AccountType::Stock => "Stock",
            AccountType::Equity => "Equity",
        }
    }

    /// Income and expense accounts are the ones tag rules apply to.
    pub fn is_category(self) -> bool {
        matches!(self, AccountType::Income | AccountType::Expense)
    }
}

impl TryFrom<i64> for AccountType {
    type Error = KmyError;

    fn try_from(code: i64) -> Result<Self> {
        usize::try_from(code)
            .ok()
            .and_then(|i| ACCOUNT_TYPES.get(i).copied())
            .ok_or(KmyError::InvalidAccountType(code))
    }
}

impl From<AccountType> for i64 {
    fn from(t: AccountType) -> i64 {
        t.code()
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-split bank reconciliation status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ReconcileFlag {
    Unknown,
    #[default]
    NotReconciled,
    Cleared,
    Reconciled,
    Frozen,
}

impl ReconcileFlag {
    pub fn code(self) -> i8 {
        match self {
            ReconcileFlag::Unknown => -1,
            ReconcileFlag::NotReconciled => 0,
            ReconcileFlag::Cleared => 1,
            ReconcileFlag::Reconciled => 2,
            ReconcileFlag::Frozen => 3,
        }
    }
}

impl FromStr for ReconcileFlag {
    type Err = KmyError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "-1" => Ok(ReconcileFlag::Unknown),
            "0" => Ok(ReconcileFlag::NotReconciled),
            "1" => Ok(ReconcileFlag::Cleared),
            "2" => Ok(ReconcileFlag::Reconciled),
            "3" => Ok(ReconcileFlag::Frozen),
            other => Err(KmyError::InvalidReconcileFlag(other.to_string())),
        }
    }
}

impl TryFrom<String> for ReconcileFlag {
    type Error = KmyError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<ReconcileFlag> for String {
    fn from(flag: ReconcileFlag) -> String {
        flag.code().to_string()
    }
}

impl fmt::Display for ReconcileFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Account {
    pub name: String,
    #[serde(
        rename = "parentaccount",
        deserialize_with = "empty_as_none",
        serialize_with = "none_as_empty"
    )]
    pub parent: Option<String>,
    #[serde(rename = "type")]
    pub account_type: AccountType,
    pub currency: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Payee {
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tag {
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Split {
    pub account: String,
    #[serde(deserialize_with = "empty_as_none", serialize_with = "none_as_empty")]
    pub payee: Option<String>,
    pub price: String,
    pub value: String,
    pub memo: String,
    pub number: String,
    #[serde(rename = "reconcileflag")]
    pub reconcile_flag: ReconcileFlag,
    pub tags: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Split {
    /// `price × value`, both given as decimal or `num/den` strings.
    pub fn amount(&self) -> Result<f64> {
        Ok(parse_numeric(&self.price)? * parse_numeric(&self.value)?)
    }

    pub fn has_tag(&self, tag_id: &str) -> bool {
        self.tags.iter().any(|t| t == tag_id)
    }

    pub fn has_any_tag<'a>(&self, mut tag_ids: impl Iterator<Item = &'a String>) -> bool {
        tag_ids.any(|t| self.has_tag(t))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Transaction {
    pub id: String,
    #[serde(rename = "postdate")]
    pub post_date: String,
    pub splits: Vec<Split>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The whole accounting graph of one document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Ledger {
    pub accounts: BTreeMap<String, Account>,
    pub payees: BTreeMap<String, Payee>,
    pub tags: BTreeMap<String, Tag>,
    pub transactions: Vec<Transaction>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Ledger {
    pub fn account(&self, id: &str) -> Result<&Account> {
        self.accounts
            .get(id)
            .ok_or_else(|| KmyError::UnknownAccount(id.to_string()))
    }

    /// Payee name for an optional payee reference; no payee renders as "".
    pub fn payee_name(&self, id: Option<&str>) -> Result<String> {
        match id {
            None => Ok(String::new()),
            Some(id) => self
                .payees
                .get(id)
                .map(|p| p.name.clone())
                .ok_or_else(|| KmyError::UnknownPayee(id.to_string())),
        }
    }
}

pub fn parse_numeric(text: &str) -> Result<f64> {
    let malformed = || KmyError::MalformedNumeric(text.to_string());
    let trimmed = text.trim();
    let parsed = match trimmed.split_once('/') {
        Some((num, den)) => {
            let num: f64 = num.trim().parse().map_err(|_| malformed())?;
            let den: f64 = den.trim().parse().map_err(|_| malformed())?;
            if den == 0.0 {
                return Err(malformed());
            }
            num / den
        }
        None => trimmed.parse().map_err(|_| malformed())?,
    };
    if parsed.is_finite() {
        Ok(parsed)
    } else {
        Err(malformed())
    }
}

fn empty_as_none<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.filter(|s| !s.is_empty()))
}

fn none_as_empty<S>(value: &Option<String>, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(value.as_deref().unwrap_or(""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_type_codes() {
        assert_eq!(AccountType::try_from(0i64).unwrap(), AccountType::Unknown);
        assert_eq!(AccountType::try_from(9i64).unwrap(), AccountType::Asset);
        assert_eq!(AccountType::try_from(13i64).unwrap(), AccountType::Expense);
        assert_eq!(AccountType::try_from(16i64).unwrap(), AccountType::Equity);
        assert_eq!(AccountType::Income.code(), 12);
        assert!(matches!(
            AccountType::try_from(17i64),
            Err(KmyError::InvalidAccountType(17))
        ));
        assert!(AccountType::try_from(-1i64).is_err());
    }

    #[test]
    fn test_reconcile_flag_parse() {
        assert_eq!("-1".parse::<ReconcileFlag>().unwrap(), ReconcileFlag::Unknown);
        assert_eq!("2".parse::<ReconcileFlag>().unwrap(), ReconcileFlag::Reconciled);
        assert_eq!(ReconcileFlag::Frozen.to_string(), "3");
        assert!("4".parse::<ReconcileFlag>().is_err());
        assert!("".parse::<ReconcileFlag>().is_err());
    }

    #[test]
    fn test_parse_numeric_forms() {
        assert_eq!(parse_numeric("100").unwrap(), 100.0);
        assert_eq!(parse_numeric("-12.5").unwrap(), -12.5);
        assert_eq!(parse_numeric("-1250/100").unwrap(), -12.5);
        assert!(matches!(parse_numeric("abc"), Err(KmyError::MalformedNumeric(_))));
        assert!(parse_numeric("1/0").is_err());
        assert!(parse_numeric("").is_err());
    }

    #[test]
    fn test_split_amount() {
        let split = Split {
            price: "1/1".into(),
            value: "-2500/100".into(),
            ..Default::default()
        };
        assert_eq!(split.amount().unwrap(), -25.0);
    }

    #[test]
    fn test_empty_payee_is_none() {
        let split: Split = serde_json::from_str(
            r#"{"account": "A1", "payee": "", "reconcileflag": "1", "entrydate": "2024-01-01"}"#,
        )
        .unwrap();
        assert_eq!(split.payee, None);
        assert_eq!(split.reconcile_flag, ReconcileFlag::Cleared);
        assert_eq!(split.extra["entrydate"], "2024-01-01");
        let json = serde_json::to_value(&split).unwrap();
        assert_eq!(json["payee"], "");
        assert_eq!(json["reconcileflag"], "1");
        assert_eq!(json["entrydate"], "2024-01-01");
    }

    #[test]
    fn test_payee_name_lookup() {
        let mut ledger = Ledger::default();
        ledger.payees.insert(
            "P1".into(),
            Payee {
                name: "Grocer".into(),
                ..Default::default()
            },
        );
        assert_eq!(ledger.payee_name(Some("P1")).unwrap(), "Grocer");
        assert_eq!(ledger.payee_name(None).unwrap(), "");
        assert!(matches!(
            ledger.payee_name(Some("P9")),
            Err(KmyError::UnknownPayee(_))
        ));
    }
}
