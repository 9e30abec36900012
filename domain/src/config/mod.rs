//! Configuration value objects shared by the loader and the binary.

mod validation;

pub use validation::{ConfigIssue, ConfigIssueCode, Severity};
