pub mod config;
pub mod count;
pub mod errors;
pub mod filters;
pub mod metrics;
pub mod results;

pub use config::{CliOverrides, CountConfig};
pub use count::count;
pub use errors::{CountError, CountResult};
pub use results::{CountSummary, TaskOutcome, Tally};
