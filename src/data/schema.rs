use thiserror::Error;

use super::model::{ColumnType, Table};

// ---------------------------------------------------------------------------
// Required columns of a transaction table
// ---------------------------------------------------------------------------

pub const TRANSACTION_ID: &str = "Transaction_ID";
pub const DATE: &str = "Date";
pub const CUSTOMER_ID: &str = "Customer_ID";
pub const PRODUCT: &str = "Product";
pub const QUANTITY: &str = "Quantity";
pub const UNIT_PRICE: &str = "Unit_Price";
pub const TOTAL_AMOUNT: &str = "Total_Amount";
pub const REGION: &str = "Region";

/// What each required column must look like.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expectation {
    Any,
    Numeric,
    Date,
}

const REQUIRED: [(&str, Expectation); 8] = [
    (TRANSACTION_ID, Expectation::Any),
    (DATE, Expectation::Date),
    (CUSTOMER_ID, Expectation::Any),
    (PRODUCT, Expectation::Any),
    (QUANTITY, Expectation::Numeric),
    (UNIT_PRICE, Expectation::Numeric),
    (TOTAL_AMOUNT, Expectation::Numeric),
    (REGION, Expectation::Any),
];

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("required column '{name}' is missing from the file")]
    MissingColumn { name: &'static str },

    #[error("column '{name}' should be {expected} but the file contains {found}")]
    WrongType {
        name: &'static str,
        expected: &'static str,
        found: ColumnType,
    },
}

/// Check a freshly parsed table against the columns the aggregations need,
/// so a bad file is rejected right after loading instead of deep inside an
/// aggregation.
pub fn validate(table: &Table) -> Result<(), SchemaError> {
    for (name, expectation) in REQUIRED {
        let idx = table
            .column_index(name)
            .ok_or(SchemaError::MissingColumn { name })?;
        let found = table.column_type(idx);

        // A column with no observed values carries no evidence of its
        // type; a header-only file must still load as an empty table.
        if table.values(idx).all(|c| c.is_null()) {
            continue;
        }

        match expectation {
            Expectation::Any => {}
            Expectation::Numeric if found.is_numeric() => {}
            Expectation::Numeric => {
                return Err(SchemaError::WrongType {
                    name,
                    expected: "numeric",
                    found,
                });
            }
            Expectation::Date if found == ColumnType::Date => {}
            Expectation::Date => {
                return Err(SchemaError::WrongType {
                    name,
                    expected: "a date",
                    found,
                });
            }
        }
    }
    Ok(())
}
