use serde::Serialize;

use super::aggregate::{self, AnalysisError};
use crate::data::model::Table;

// ---------------------------------------------------------------------------
// ViewRequest – what the presentation layer asks for
// ---------------------------------------------------------------------------

/// One of the five aggregation views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewRequest {
    Summary,
    TopCustomers(usize),
    ProductPerformance,
    SalesTrend,
    RegionalDistribution,
}

// ---------------------------------------------------------------------------
// ViewData – what comes back, ready to render
// ---------------------------------------------------------------------------

/// Aggregation output in the two shapes a front end renders: a small table
/// of named scalars, or label/value pairs for a bar, line, or pie chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ViewData {
    Scalars(Vec<(String, String)>),
    Series(Vec<(String, f64)>),
}

/// Run one view over the cleaned table.
pub fn run_view(table: &Table, request: ViewRequest) -> Result<ViewData, AnalysisError> {
    let data = match request {
        ViewRequest::Summary => ViewData::Scalars(aggregate::summary_stats(table)?.rows()),
        ViewRequest::TopCustomers(n) => ViewData::Series(aggregate::top_customers(table, n)?),
        ViewRequest::ProductPerformance => ViewData::Series(aggregate::product_performance(table)?),
        ViewRequest::SalesTrend => ViewData::Series(aggregate::sales_trend(table)?),
        ViewRequest::RegionalDistribution => {
            ViewData::Series(aggregate::regional_distribution(table)?)
        }
    };
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{CellValue, Column, ColumnType};
    use crate::data::schema;

    fn one_row_table() -> Table {
        let columns = vec![
            Column { name: schema::CUSTOMER_ID.into(), ty: ColumnType::Text },
            Column { name: schema::PRODUCT.into(), ty: ColumnType::Text },
            Column { name: schema::REGION.into(), ty: ColumnType::Text },
            Column { name: schema::TOTAL_AMOUNT.into(), ty: ColumnType::Float },
        ];
        let rows = vec![vec![
            CellValue::Text("A".into()),
            CellValue::Text("Laptop".into()),
            CellValue::Text("North".into()),
            CellValue::Float(1200.0),
        ]];
        Table::new(columns, rows)
    }

    #[test]
    fn summary_view_returns_five_scalars() {
        let data = run_view(&one_row_table(), ViewRequest::Summary).unwrap();
        match data {
            ViewData::Scalars(rows) => {
                assert_eq!(rows.len(), 5);
                assert_eq!(rows[0].0, "Total Sales");
                assert_eq!(rows[3].1, "Laptop");
            }
            ViewData::Series(_) => panic!("summary should be scalars"),
        }
    }

    #[test]
    fn series_views_return_pairs() {
        let data = run_view(&one_row_table(), ViewRequest::TopCustomers(5)).unwrap();
        assert_eq!(data, ViewData::Series(vec![("A".into(), 1200.0)]));

        let data = run_view(&one_row_table(), ViewRequest::RegionalDistribution).unwrap();
        assert_eq!(data, ViewData::Series(vec![("North".into(), 1200.0)]));
    }

    #[test]
    fn trend_without_a_date_column_reports_it() {
        let err = run_view(&one_row_table(), ViewRequest::SalesTrend).unwrap_err();
        assert!(matches!(err, AnalysisError::MissingColumn { name } if name == schema::DATE));
    }
}
