/// Analysis layer: descriptive aggregations over the cleaned table.
///
/// Every operation is pure: it reads the table it is given, allocates its
/// own result, and mutates nothing, so a front end can call them in any
/// order and as often as it likes.
pub mod aggregate;
pub mod view;
