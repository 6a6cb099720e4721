//! Console and log-file output, and the per-task record behind the run
//! summary.

mod logger;
mod subscriber;
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;
mod types;

pub use logger::Logger;
pub use subscriber::init_subscriber;
pub use types::{Log, TaskEntry, TaskStatus};
