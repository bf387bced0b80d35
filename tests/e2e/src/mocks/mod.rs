//! Test data


pub use fixtures::{TestDataFactory, TestScenario};
