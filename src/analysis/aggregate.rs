use std::collections::{HashMap, HashSet};

use serde::Serialize;
use thiserror::Error;

use crate::data::model::{CellValue, ColumnType, Table};
use crate::data::schema;

// ---------------------------------------------------------------------------
// AnalysisError
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum AnalysisError {
    /// An aggregation was requested before any table was loaded. Not fatal;
    /// the caller simply declines the operation.
    #[error("no data loaded yet")]
    NoData,

    #[error("required column '{name}' is missing")]
    MissingColumn { name: String },

    #[error("column '{name}' is not numeric")]
    NotNumeric { name: String },

    #[error("column '{name}' does not contain dates")]
    NotDate { name: String },
}

// ---------------------------------------------------------------------------
// Summary statistics
// ---------------------------------------------------------------------------

/// The five headline business figures.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryStats {
    pub total_sales: f64,
    pub total_transactions: usize,
    pub avg_transaction: f64,
    /// Product with the highest summed `Total_Amount`; `None` when the table
    /// has no rows, so an empty dataset stays distinguishable from a product
    /// literally named after a placeholder.
    pub top_product: Option<String>,
    pub total_customers: usize,
}

impl SummaryStats {
    /// The figures as ordered (label, rendered value) pairs for display.
    pub fn rows(&self) -> Vec<(String, String)> {
        vec![
            ("Total Sales".into(), format!("{:.2}", self.total_sales)),
            ("Total Transactions".into(), self.total_transactions.to_string()),
            ("Avg Transaction Value".into(), format!("{:.2}", self.avg_transaction)),
            (
                "Top Product".into(),
                self.top_product.clone().unwrap_or_else(|| "(no data)".into()),
            ),
            ("Total Customers".into(), self.total_customers.to_string()),
        ]
    }
}

/// Overall summary over the cleaned table. Pure; recomputed on every call.
pub fn summary_stats(table: &Table) -> Result<SummaryStats, AnalysisError> {
    let amount = require_numeric(table, schema::TOTAL_AMOUNT)?;
    let product = require_column(table, schema::PRODUCT)?;
    let customer = require_column(table, schema::CUSTOMER_ID)?;

    // `sum()` over an empty f64 iterator yields -0.0, which renders as
    // "-0.00"; fold from +0.0 so an empty table reports plain zero.
    let total_sales: f64 = table.numeric_values(amount).fold(0.0, |a, v| a + v);
    let total_transactions = table.len();
    let avg_transaction = if total_transactions == 0 {
        0.0
    } else {
        total_sales / total_transactions as f64
    };

    let top_product = grouped_sum(table, product, amount)
        .into_iter()
        // Strictly greater keeps the first-encountered product on a tie.
        .fold(None::<(String, f64)>, |best, (label, total)| match best {
            Some((_, best_total)) if best_total >= total => best,
            _ => Some((label, total)),
        })
        .map(|(label, _)| label);

    let total_customers = table
        .values(customer)
        .map(|c| c.to_string())
        .collect::<HashSet<_>>()
        .len();

    Ok(SummaryStats {
        total_sales,
        total_transactions,
        avg_transaction,
        top_product,
        total_customers,
    })
}

// ---------------------------------------------------------------------------
// Ranked and grouped views
// ---------------------------------------------------------------------------

/// Customers ranked by total spend, highest first, truncated to `n`.
pub fn top_customers(table: &Table, n: usize) -> Result<Vec<(String, f64)>, AnalysisError> {
    let customer = require_column(table, schema::CUSTOMER_ID)?;
    let amount = require_numeric(table, schema::TOTAL_AMOUNT)?;

    let mut totals = grouped_sum(table, customer, amount);
    sort_descending(&mut totals);
    totals.truncate(n);
    Ok(totals)
}

/// Every product ranked by total revenue, highest first.
pub fn product_performance(table: &Table) -> Result<Vec<(String, f64)>, AnalysisError> {
    let product = require_column(table, schema::PRODUCT)?;
    let amount = require_numeric(table, schema::TOTAL_AMOUNT)?;

    let mut totals = grouped_sum(table, product, amount);
    sort_descending(&mut totals);
    Ok(totals)
}

/// Revenue per calendar month, chronological. Month keys render as `YYYY-MM`.
pub fn sales_trend(table: &Table) -> Result<Vec<(String, f64)>, AnalysisError> {
    let date = require_column(table, schema::DATE)?;
    let amount = require_numeric(table, schema::TOTAL_AMOUNT)?;
    if table.column_type(date) != ColumnType::Date && has_values(table, date) {
        return Err(AnalysisError::NotDate {
            name: schema::DATE.to_string(),
        });
    }

    // Zero-padded YYYY-MM keys sort chronologically as plain strings.
    let mut by_month: std::collections::BTreeMap<String, f64> = Default::default();
    for row in &table.rows {
        if let CellValue::Date(d) = &row[date] {
            let key = d.format("%Y-%m").to_string();
            *by_month.entry(key).or_insert(0.0) += row[amount].as_f64().unwrap_or(0.0);
        }
    }
    Ok(by_month.into_iter().collect())
}

/// Revenue per region, sorted by region name.
pub fn regional_distribution(table: &Table) -> Result<Vec<(String, f64)>, AnalysisError> {
    let region = require_column(table, schema::REGION)?;
    let amount = require_numeric(table, schema::TOTAL_AMOUNT)?;

    let mut totals = grouped_sum(table, region, amount);
    totals.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(totals)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn require_column(table: &Table, name: &str) -> Result<usize, AnalysisError> {
    table
        .column_index(name)
        .ok_or_else(|| AnalysisError::MissingColumn { name: name.to_string() })
}

fn require_numeric(table: &Table, name: &str) -> Result<usize, AnalysisError> {
    let idx = require_column(table, name)?;
    if !table.column_type(idx).is_numeric() && has_values(table, idx) {
        return Err(AnalysisError::NotNumeric { name: name.to_string() });
    }
    Ok(idx)
}

/// Whether a column has any non-null cell. A column without one has no
/// real type, so type checks let it through; every aggregation degrades
/// to zeros or an empty series anyway.
fn has_values(table: &Table, idx: usize) -> bool {
    table.values(idx).any(|c| !c.is_null())
}

/// Sum `amount_idx` per distinct value of `key_idx`, keeping groups in
/// first-occurrence row order.
fn grouped_sum(table: &Table, key_idx: usize, amount_idx: usize) -> Vec<(String, f64)> {
    let mut order: Vec<String> = Vec::new();
    let mut totals: HashMap<String, f64> = HashMap::new();

    for row in &table.rows {
        let key = row[key_idx].to_string();
        if !totals.contains_key(&key) {
            order.push(key.clone());
        }
        *totals.entry(key).or_insert(0.0) += row[amount_idx].as_f64().unwrap_or(0.0);
    }

    order
        .into_iter()
        .map(|key| {
            let total = totals[&key];
            (key, total)
        })
        .collect()
}

/// Stable descending sort by total, so tied groups keep first-occurrence
/// order.
fn sort_descending(totals: &mut [(String, f64)]) {
    totals.sort_by(|a, b| b.1.total_cmp(&a.1));
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::data::cleaner::clean;
    use crate::data::model::Column;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    fn amount(v: f64) -> CellValue {
        CellValue::Float(v)
    }

    fn date(y: i32, m: u32, d: u32) -> CellValue {
        CellValue::Date(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    /// Table with the columns every aggregation touches.
    fn sales_table(rows: Vec<(&str, &str, (i32, u32, u32), &str, f64)>) -> Table {
        let columns = vec![
            Column { name: schema::CUSTOMER_ID.into(), ty: ColumnType::Text },
            Column { name: schema::PRODUCT.into(), ty: ColumnType::Text },
            Column { name: schema::DATE.into(), ty: ColumnType::Date },
            Column { name: schema::REGION.into(), ty: ColumnType::Text },
            Column { name: schema::TOTAL_AMOUNT.into(), ty: ColumnType::Float },
        ];
        let rows = rows
            .into_iter()
            .map(|(cust, product, (y, m, d), region, total)| {
                vec![text(cust), text(product), date(y, m, d), text(region), amount(total)]
            })
            .collect();
        Table::new(columns, rows)
    }

    fn fixture() -> Table {
        sales_table(vec![
            ("A", "Laptop", (2025, 1, 10), "North", 1200.0),
            ("B", "Mouse", (2025, 1, 15), "South", 30.0),
            ("A", "Mouse", (2025, 2, 1), "North", 60.0),
            ("C", "Laptop", (2025, 2, 20), "East", 2400.0),
            ("B", "Keyboard", (2025, 3, 5), "South", 50.0),
        ])
    }

    #[test]
    fn summary_stats_over_fixture() {
        let stats = summary_stats(&fixture()).unwrap();
        assert_eq!(stats.total_sales, 3740.0);
        assert_eq!(stats.total_transactions, 5);
        assert_eq!(stats.avg_transaction, 748.0);
        assert_eq!(stats.top_product.as_deref(), Some("Laptop"));
        assert_eq!(stats.total_customers, 3);
    }

    #[test]
    fn clean_then_summarize_the_duplicate_scenario() {
        let t = sales_table(vec![
            ("Cust A", "Product X", (2025, 1, 1), "North", 100.0),
            ("Cust A", "Product X", (2025, 1, 1), "North", 100.0),
            ("Cust B", "Product Y", (2025, 1, 2), "South", 50.0),
        ]);
        let (cleaned, report) = clean(&t);
        assert_eq!(report.duplicates_removed, 1);

        let stats = summary_stats(&cleaned).unwrap();
        assert_eq!(stats.total_sales, 150.0);
        assert_eq!(stats.total_transactions, 2);

        let top = top_customers(&cleaned, 5).unwrap();
        assert_eq!(top[0], ("Cust A".to_string(), 100.0));
    }

    #[test]
    fn top_product_tie_goes_to_the_first_seen_product() {
        let t = sales_table(vec![
            ("A", "Mouse", (2025, 1, 1), "North", 100.0),
            ("B", "Laptop", (2025, 1, 2), "North", 100.0),
        ]);
        let stats = summary_stats(&t).unwrap();
        assert_eq!(stats.top_product.as_deref(), Some("Mouse"));
    }

    #[test]
    fn top_customers_with_large_n_returns_everyone_sorted() {
        let top = top_customers(&fixture(), 100).unwrap();
        let names: Vec<&str> = top.iter().map(|(c, _)| c.as_str()).collect();
        assert_eq!(names, vec!["C", "A", "B"]);
        assert_eq!(top[0].1, 2400.0);
        assert_eq!(top[1].1, 1260.0);
        assert_eq!(top[2].1, 80.0);
        assert!(top.windows(2).all(|w| w[0].1 >= w[1].1));
    }

    #[test]
    fn top_customers_truncates_to_n() {
        let top = top_customers(&fixture(), 2).unwrap();
        assert_eq!(top.len(), 2);
    }

    #[test]
    fn product_totals_sum_to_total_sales() {
        let table = fixture();
        let stats = summary_stats(&table).unwrap();
        let products = product_performance(&table).unwrap();
        let sum: f64 = products.iter().map(|(_, v)| v).sum();
        assert!((sum - stats.total_sales).abs() < 1e-9);
        assert!(products.windows(2).all(|w| w[0].1 >= w[1].1));
    }

    #[test]
    fn regional_totals_sum_to_total_sales() {
        let table = fixture();
        let stats = summary_stats(&table).unwrap();
        let regions = regional_distribution(&table).unwrap();
        let sum: f64 = regions.iter().map(|(_, v)| v).sum();
        assert!((sum - stats.total_sales).abs() < 1e-9);
        let names: Vec<&str> = regions.iter().map(|(r, _)| r.as_str()).collect();
        assert_eq!(names, vec!["East", "North", "South"]);
    }

    #[test]
    fn sales_trend_is_chronological_by_month() {
        let trend = sales_trend(&fixture()).unwrap();
        assert_eq!(
            trend,
            vec![
                ("2025-01".to_string(), 1230.0),
                ("2025-02".to_string(), 2460.0),
                ("2025-03".to_string(), 50.0),
            ]
        );
    }

    #[test]
    fn empty_table_yields_zeros_and_no_top_product() {
        let table = sales_table(Vec::new());
        let stats = summary_stats(&table).unwrap();
        assert_eq!(stats.total_sales, 0.0);
        assert_eq!(stats.total_transactions, 0);
        assert_eq!(stats.avg_transaction, 0.0);
        assert_eq!(stats.top_product, None);
        assert_eq!(stats.total_customers, 0);

        assert!(top_customers(&table, 5).unwrap().is_empty());
        assert!(product_performance(&table).unwrap().is_empty());
        assert!(sales_trend(&table).unwrap().is_empty());
        assert!(regional_distribution(&table).unwrap().is_empty());
    }

    #[test]
    fn value_less_amount_column_degrades_to_zeros() {
        // A header-only file types its numeric columns as text; with zero
        // rows the views still answer instead of rejecting the type.
        let table = Table::new(
            vec![
                Column { name: schema::CUSTOMER_ID.into(), ty: ColumnType::Text },
                Column { name: schema::PRODUCT.into(), ty: ColumnType::Text },
                Column { name: schema::DATE.into(), ty: ColumnType::Date },
                Column { name: schema::REGION.into(), ty: ColumnType::Text },
                Column { name: schema::TOTAL_AMOUNT.into(), ty: ColumnType::Text },
            ],
            Vec::new(),
        );
        let stats = summary_stats(&table).unwrap();
        assert_eq!(stats.total_sales, 0.0);
        assert_eq!(stats.top_product, None);
        assert!(top_customers(&table, 5).unwrap().is_empty());
        assert!(sales_trend(&table).unwrap().is_empty());
        assert!(regional_distribution(&table).unwrap().is_empty());
    }

    #[test]
    fn missing_amount_column_is_a_clear_error_not_a_zero() {
        let table = Table::new(
            vec![Column { name: schema::CUSTOMER_ID.into(), ty: ColumnType::Text }],
            vec![vec![text("A")]],
        );
        for err in [
            summary_stats(&table).unwrap_err(),
            top_customers(&table, 5).unwrap_err(),
            product_performance(&table).unwrap_err(),
            regional_distribution(&table).unwrap_err(),
        ] {
            match err {
                AnalysisError::MissingColumn { name } => {
                    assert!(name == schema::TOTAL_AMOUNT || name == schema::PRODUCT || name == schema::REGION)
                }
                other => panic!("unexpected error: {other}"),
            }
        }
    }

    #[test]
    fn trend_rejects_a_non_date_date_column() {
        let table = Table::new(
            vec![
                Column { name: schema::DATE.into(), ty: ColumnType::Text },
                Column { name: schema::TOTAL_AMOUNT.into(), ty: ColumnType::Float },
            ],
            vec![vec![text("January"), amount(10.0)]],
        );
        assert!(matches!(
            sales_trend(&table).unwrap_err(),
            AnalysisError::NotDate { .. }
        ));
    }

    #[test]
    fn textual_amount_column_is_rejected() {
        let table = Table::new(
            vec![
                Column { name: schema::CUSTOMER_ID.into(), ty: ColumnType::Text },
                Column { name: schema::TOTAL_AMOUNT.into(), ty: ColumnType::Text },
            ],
            vec![vec![text("A"), text("lots")]],
        );
        assert!(matches!(
            top_customers(&table, 5).unwrap_err(),
            AnalysisError::NotNumeric { .. }
        ));
    }
}
