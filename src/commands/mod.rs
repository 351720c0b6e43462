pub mod query;
pub mod update;

pub use query::run_query;
pub use update::{run_update, run_update_async, UpdateOutcome};
