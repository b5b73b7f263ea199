//! # System Interaction Layer
//!
//! Everything that leaves the process: child processes and the deployment
//! manager's REST API. Core logic only sees these through typed wrappers.
//!
//! ## Modules
//!
//! - **`executor`**: Spawns a program in a working directory with inherited
//!   stdio and turns spawn failures and non-zero exits into errors.
//! - **`cfy`**: Builds `cfy` invocations (`bootstrap`, `deployments create`,
//!   `executions start`, ...) and reads the management address recorded by
//!   `cfy bootstrap`.
//! - **`manager_client`**: The `ManagerClient` trait and its blocking HTTP
//!   implementation.
//! - **`events`**: Pages the events of an execution until it has ended.

pub mod cfy;
pub mod events;
pub mod executor;
pub mod manager_client;
