//! Use cases (application services)

pub mod build_query;
pub mod commitment;
pub mod evaluate;
pub mod list_models;
pub mod run_arbitration;
