//! Grade tracking and planning engine.
//!
//! - [`grades`]: course grades under the Magen rule, GPA roll-ups, historical
//!   performance and the strategy planner.
//! - [`store`]: per-user gradebook snapshots.
//! - [`server`]: the HTTP API over both.

pub mod grades;
pub mod server;
pub mod store;
pub mod types;
