// EN: src/cli/handlers/mod.rs

// One module per command family. Every handler takes its raw arguments and
// the application context.

/// `bootstrap`.
pub mod bootstrap;
/// Helpers shared by the configuration-scoped handlers.
pub mod commons;
/// `deploy` and `undeploy`.
pub mod deploy;
/// `events`.
pub mod events;
/// `generate` and `generate-blueprint`.
pub mod generate;
/// `init`.
pub mod init;
/// `status` and `global-status`.
pub mod status;
/// `teardown` and `cleanup`.
pub mod teardown;

#[cfg(test)]
mod testing;
