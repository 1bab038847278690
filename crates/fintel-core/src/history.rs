//! Spending history from CSV
//!
//! Reads transaction exports (`date,description,amount[,merchant,category]`)
//! and monthly series (`month,total`), and aggregates transactions into the
//! monthly series and per-category histories the pipelines consume.

use std::collections::BTreeMap;
use std::io::Read;

use chrono::{Datelike, Months, NaiveDate};
use csv::{ReaderBuilder, StringRecord};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::categorize::CategoryClassifier;
use crate::error::{Error, Result};
use crate::models::{CategoryHistory, MonthlyPoint};
use crate::stats::round_to;

/// One spending transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub date: NaiveDate,
    pub description: String,
    /// Positive for spending; refunds and credits are negative
    pub amount: f64,
    pub merchant: Option<String>,
    pub category: Option<String>,
}

/// Column positions resolved from the header row
struct Columns {
    date: usize,
    description: usize,
    amount: usize,
    merchant: Option<usize>,
    category: Option<usize>,
}

fn find_column(headers: &StringRecord, names: &[&str]) -> Option<usize> {
    headers
        .iter()
        .position(|h| names.iter().any(|n| h.trim().eq_ignore_ascii_case(n)))
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let required = |names: &[&str]| {
            find_column(headers, names)
                .ok_or_else(|| Error::InvalidData(format!("Missing '{}' column", names[0])))
        };

        Ok(Self {
            date: required(&["date", "transaction date"])?,
            description: required(&["description", "desc"])?,
            amount: required(&["amount"])?,
            merchant: find_column(headers, &["merchant"]),
            category: find_column(headers, &["category"]),
        })
    }
}

fn optional_field(record: &StringRecord, col: Option<usize>) -> Option<String> {
    col.and_then(|c| record.get(c))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Parse transactions from CSV with a header row
pub fn read_transactions<R: Read>(reader: R) -> Result<Vec<Transaction>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let columns = Columns::from_headers(&headers)?;

    let mut transactions = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let record = result?;
        // Header is line 1
        let line = i + 2;

        let field = |col: usize, name: &str| {
            record
                .get(col)
                .ok_or_else(|| Error::InvalidData(format!("line {}: missing {}", line, name)))
        };

        let date = parse_date(field(columns.date, "date")?)
            .map_err(|e| Error::InvalidData(format!("line {}: {}", line, e)))?;
        let amount = parse_amount(field(columns.amount, "amount")?)
            .map_err(|e| Error::InvalidData(format!("line {}: {}", line, e)))?;

        transactions.push(Transaction {
            date,
            description: field(columns.description, "description")?.trim().to_string(),
            amount,
            merchant: optional_field(&record, columns.merchant),
            category: optional_field(&record, columns.category),
        });
    }

    debug!(count = transactions.len(), "Parsed transactions CSV");
    Ok(transactions)
}

/// Parse a monthly series from CSV (`month,total`; `y` is accepted for `total`)
pub fn read_series<R: Read>(reader: R) -> Result<Vec<MonthlyPoint>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let month_col = find_column(&headers, &["month"])
        .ok_or_else(|| Error::InvalidData("Missing 'month' column".into()))?;
    let total_col = find_column(&headers, &["total", "y"])
        .ok_or_else(|| Error::InvalidData("Missing 'total' column".into()))?;

    let mut points = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let record = result?;
        let month = record.get(month_col).unwrap_or_default().to_string();
        let total = match record.get(total_col).filter(|s| !s.is_empty()) {
            Some(raw) => parse_amount(raw)
                .map_err(|e| Error::InvalidData(format!("line {}: {}", i + 2, e)))?,
            None => 0.0,
        };
        points.push(MonthlyPoint::new(month, total));
    }

    Ok(points)
}

fn month_key(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Every month from the earliest to the latest transaction, inclusive
fn month_range(transactions: &[Transaction]) -> Vec<String> {
    let (Some(start), Some(end)) = (
        transactions.iter().map(|t| t.date).min(),
        transactions.iter().map(|t| t.date).max(),
    ) else {
        return Vec::new();
    };

    let end = first_of_month(end);
    let mut current = first_of_month(start);
    let mut months = Vec::new();
    while current <= end {
        months.push(month_key(current));
        match current.checked_add_months(Months::new(1)) {
            Some(next) => current = next,
            None => break,
        }
    }
    months
}

/// Total spending per calendar month, chronological
///
/// Months without transactions inside the observed range appear with 0.
pub fn monthly_totals(transactions: &[Transaction]) -> Vec<MonthlyPoint> {
    let mut sums: BTreeMap<String, f64> = BTreeMap::new();
    for t in transactions {
        *sums.entry(month_key(t.date)).or_default() += t.amount;
    }

    month_range(transactions)
        .into_iter()
        .map(|month| {
            let total = sums.get(&month).copied().unwrap_or(0.0);
            MonthlyPoint::new(month, round_to(total, 2))
        })
        .collect()
}

/// Per-category monthly totals over the shared month range
///
/// The category column is used when present; otherwise the classifier
/// assigns one from the description and merchant. Categories are ordered
/// by name.
pub fn category_histories(
    transactions: &[Transaction],
    classifier: &CategoryClassifier,
) -> Vec<CategoryHistory> {
    let months = month_range(transactions);
    let index: BTreeMap<&str, usize> = months
        .iter()
        .enumerate()
        .map(|(i, m)| (m.as_str(), i))
        .collect();

    let mut by_category: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for t in transactions {
        let category = match &t.category {
            Some(c) => c.clone(),
            None => {
                classifier
                    .categorize(&t.description, t.merchant.as_deref())
                    .category
            }
        };

        let key = month_key(t.date);
        let totals = by_category
            .entry(category)
            .or_insert_with(|| vec![0.0; months.len()]);
        if let Some(&i) = index.get(key.as_str()) {
            totals[i] += t.amount;
        }
    }

    by_category
        .into_iter()
        .map(|(category, totals)| {
            CategoryHistory::new(category, totals.into_iter().map(|v| round_to(v, 2)).collect())
        })
        .collect()
}

/// Parse a date string in common export formats
fn parse_date(s: &str) -> std::result::Result<NaiveDate, String> {
    let s = s.trim();

    let formats = [
        "%Y-%m-%d", // 2024-01-15
        "%d/%m/%Y", // 15/01/2024
        "%d-%m-%Y", // 15-01-2024
        "%Y/%m/%d", // 2024/01/15
    ];

    formats
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .ok_or_else(|| format!("Unable to parse date: {}", s))
}

/// Parse an amount, handling currency symbols, thousands separators and
/// parenthesized negatives
fn parse_amount(s: &str) -> std::result::Result<f64, String> {
    let cleaned: String = s
        .trim()
        .replace(['$', '₹', ',', ' '], "")
        .replace("Rs.", "")
        .replace("INR", "")
        .replace('(', "-")
        .replace(')', "");

    cleaned
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| format!("Unable to parse amount: {}", s))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::SAMPLE_TRANSACTIONS_CSV;

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2024-01-15").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
        );
        assert_eq!(
            parse_date("15/01/2024").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
        );
        assert!(parse_date("yesterday").is_err());
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("₹1,234.56").unwrap(), 1234.56);
        assert_eq!(parse_amount("Rs. 99").unwrap(), 99.0);
        assert_eq!(parse_amount("(100.00)").unwrap(), -100.0);
        assert!(parse_amount("abc").is_err());
    }

    #[test]
    fn test_read_transactions() {
        let transactions = read_transactions(SAMPLE_TRANSACTIONS_CSV.as_bytes()).unwrap();
        assert_eq!(transactions.len(), 6);
        assert_eq!(transactions[0].amount, 450.5);
        assert_eq!(transactions[0].merchant.as_deref(), Some("Swiggy"));
        assert_eq!(transactions[3].merchant, None);
        assert_eq!(transactions[5].category, None);
    }

    #[test]
    fn test_minimal_columns() {
        let csv = "Date,Description,Amount\n2024-05-01,Coffee,120\n";
        let transactions = read_transactions(csv.as_bytes()).unwrap();
        assert_eq!(transactions[0].description, "Coffee");
        assert_eq!(transactions[0].category, None);
    }

    #[test]
    fn test_missing_column_and_bad_row() {
        let err = read_transactions("date,amount\n2024-01-01,5\n".as_bytes()).unwrap_err();
        assert!(matches!(err, Error::InvalidData(_)));

        let err = read_transactions("date,description,amount\n2024-01-01,x,five\n".as_bytes())
            .unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_monthly_totals_zero_fill() {
        let csv = "date,description,amount\n2024-01-10,a,100\n2024-01-20,b,50.5\n2024-03-02,c,70\n";
        let transactions = read_transactions(csv.as_bytes()).unwrap();
        let points = monthly_totals(&transactions);

        assert_eq!(
            points,
            vec![
                MonthlyPoint::new("2024-01", 150.5),
                MonthlyPoint::new("2024-02", 0.0),
                MonthlyPoint::new("2024-03", 70.0),
            ]
        );
    }

    #[test]
    fn test_category_histories() {
        let transactions = read_transactions(SAMPLE_TRANSACTIONS_CSV.as_bytes()).unwrap();
        let histories = category_histories(&transactions, &CategoryClassifier::default());

        let names: Vec<&str> = histories.iter().map(|h| h.category.as_str()).collect();
        assert_eq!(names, vec!["Food & Dining", "Transport"]);
        assert_eq!(histories[0].monthly_totals, vec![450.5, 380.0, 610.25]);
        // Last row has no category column value; "Ola cab" classifies as Transport
        assert_eq!(histories[1].monthly_totals, vec![220.0, 500.0, 190.0]);
    }

    #[test]
    fn test_read_series() {
        let csv = "month,total\n2024-01,100\n2024-02, 250.5\n";
        let points = read_series(csv.as_bytes()).unwrap();
        assert_eq!(points[1], MonthlyPoint::new("2024-02", 250.5));

        let csv = "month,y\n2024-01,7\n";
        assert_eq!(read_series(csv.as_bytes()).unwrap()[0].total, 7.0);
    }

    #[test]
    fn test_empty_inputs() {
        assert!(monthly_totals(&[]).is_empty());
        assert!(category_histories(&[], &CategoryClassifier::default()).is_empty());
    }
}
