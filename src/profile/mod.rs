//! Descriptive profiling of the tidy table.

mod groups;
mod overview;

pub use groups::{profile_groups, GroupSummary};
pub use overview::{profile_overview, ColumnOverview, DataOverview};
