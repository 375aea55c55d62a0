/// Data layer: the table model, ingestion, schema checks, and cleaning.
///
/// Pipeline:
/// ```text
///      sales .csv
///          │
///          ▼
///    ┌──────────┐
///    │  loader   │  parse file → Table (typed columns from the header)
///    └──────────┘
///          │
///          ▼
///    ┌──────────┐
///    │  schema   │  required columns present with the right types?
///    └──────────┘
///          │
///          ▼
///    ┌──────────┐
///    │  cleaner  │  impute missing cells, drop duplicate rows
///    └──────────┘
///          │
///          ▼
///     cleaned Table → analysis
/// ```
pub mod cleaner;
pub mod loader;
pub mod model;
pub mod schema;
