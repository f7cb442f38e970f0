//! The `tyn` command-line front end: loads declaration files, runs one
//! engine operation and reports the result as text or JSON.

pub mod args;
pub mod config;
pub mod driver;
pub mod guard_spec;
pub mod reporter;
pub mod tracing_config;

#[cfg(test)]
#[path = "../tests/args_tests.rs"]
mod args_tests;
#[cfg(test)]
#[path = "../tests/config_tests.rs"]
mod config_tests;
#[cfg(test)]
#[path = "../tests/guard_spec_tests.rs"]
mod guard_spec_tests;
#[cfg(test)]
#[path = "../tests/driver_tests.rs"]
mod driver_tests;
#[cfg(test)]
#[path = "../tests/reporter_tests.rs"]
mod reporter_tests;
