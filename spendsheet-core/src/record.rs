//! Canonical transaction records produced by the source adapters.

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::date::{display_format, format_display_date};

/// Direction of a transaction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Kind {
    #[serde(rename = "DEBIT")]
    Debit,
    #[serde(rename = "CREDIT")]
    Credit,
}

impl Kind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Debit => "DEBIT",
            Kind::Credit => "CREDIT",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Spending/income buckets; one spreadsheet tab each.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    #[serde(rename = "INCOME")]
    Income,
    #[serde(rename = "UTILITIES")]
    Utilities,
    #[serde(rename = "FOOD")]
    Food,
    #[serde(rename = "CAR")]
    Car,
    #[serde(rename = "HOUSING")]
    Housing,
    #[serde(rename = "SUBSCRIPTIONS")]
    Subscriptions,
    #[serde(rename = "MEDICAL")]
    Medical,
    #[serde(rename = "PET")]
    Pet,
    #[serde(rename = "OTHER")]
    Other,
}

impl Category {
    /// Every category, in publishing order.
    pub const ALL: [Category; 9] = [
        Category::Income,
        Category::Utilities,
        Category::Food,
        Category::Car,
        Category::Housing,
        Category::Subscriptions,
        Category::Medical,
        Category::Pet,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Income => "INCOME",
            Category::Utilities => "UTILITIES",
            Category::Food => "FOOD",
            Category::Car => "CAR",
            Category::Housing => "HOUSING",
            Category::Subscriptions => "SUBSCRIPTIONS",
            Category::Medical => "MEDICAL",
            Category::Pet => "PET",
            Category::Other => "OTHER",
        }
    }

    /// Spreadsheet tab name: "Income", "Utilities", ...
    pub fn sheet_name(&self) -> String {
        let upper = self.as_str();
        let mut name = String::with_capacity(upper.len());
        name.push_str(&upper[..1]);
        name.push_str(&upper[1..].to_lowercase());
        name
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A cleaned transaction as emitted by a source adapter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RawRecord {
    #[serde(with = "display_format")]
    pub date: NaiveDate,
    pub kind: Kind,
    /// Upper-cased, noise-stripped merchant name
    pub name: String,
    pub amount: Decimal,
}

impl RawRecord {
    pub fn new(date: NaiveDate, kind: Kind, name: impl Into<String>, amount: Decimal) -> Self {
        Self {
            date,
            kind,
            name: name.into(),
            amount,
        }
    }

    pub fn is_debit(&self) -> bool {
        self.kind == Kind::Debit
    }

    pub fn is_credit(&self) -> bool {
        self.kind == Kind::Credit
    }

    /// Canonical field tuple: Date, Kind, Name, Amount.
    pub fn fields(&self) -> [String; 4] {
        [
            format_display_date(self.date),
            self.kind.to_string(),
            self.name.clone(),
            self.amount.to_string(),
        ]
    }

    /// Attach a category; the only way a record gains one.
    pub fn with_category(self, category: Category) -> CategorizedRecord {
        CategorizedRecord {
            record: self,
            category,
        }
    }
}

/// A record after the categorization pass.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategorizedRecord {
    #[serde(flatten)]
    pub record: RawRecord,
    pub category: Category,
}

impl CategorizedRecord {
    pub fn date(&self) -> NaiveDate {
        self.record.date
    }

    /// Canonical field tuple: Date, Kind, Name, Amount, Category.
    pub fn fields(&self) -> [String; 5] {
        let [date, kind, name, amount] = self.record.fields();
        [date, kind, name, amount, self.category.to_string()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample() -> RawRecord {
        RawRecord::new(
            NaiveDate::from_ymd_opt(2024, 3, 7).unwrap(),
            Kind::Debit,
            "COSTCO",
            dec!(12.50),
        )
    }

    #[test]
    fn test_fields_use_display_date() {
        assert_eq!(
            sample().fields(),
            ["03/07/2024", "DEBIT", "COSTCO", "12.50"].map(String::from)
        );
    }

    #[test]
    fn test_with_category_keeps_record() {
        let categorized = sample().with_category(Category::Food);
        assert_eq!(categorized.record, sample());
        assert_eq!(categorized.fields()[4], "FOOD");
    }

    #[test]
    fn test_sheet_names() {
        assert_eq!(Category::Income.sheet_name(), "Income");
        assert_eq!(Category::Subscriptions.sheet_name(), "Subscriptions");
        assert_eq!(Category::ALL.len(), 9);
        assert_eq!(Category::ALL[8], Category::Other);
    }

    #[test]
    fn test_serde_shape() {
        let json = serde_json::to_value(sample().with_category(Category::Food)).unwrap();
        assert_eq!(json["date"], "03/07/2024");
        assert_eq!(json["kind"], "DEBIT");
        assert_eq!(json["category"], "FOOD");
        assert_eq!(json["amount"], "12.50");
    }
}
