//! Data structures for the seedline trial analysis.

mod catalog;
mod design_matrix;
mod grouping;
mod schema;
mod sheet;
mod table;

pub use catalog::{ResponseVariable, Tier, VariableCatalog};
pub use design_matrix::DesignMatrix;
pub use grouping::{group_values, GroupSample, GroupedValues, MIN_GROUP_SIZE, MIN_NORMALITY_SIZE};
pub use schema::{Field, FieldKind, Schema, GROUP_COLUMN, REPLICATION_COLUMN};
pub use sheet::RawSheet;
pub use table::{normalize_sheet, parse_numeric, Observation, TidyTable, HEADER_ROWS};
