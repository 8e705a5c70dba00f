//! Salary-to-net calculation and policy comparison.

pub mod common;
pub mod comparison;
pub mod salary;

pub use comparison::{PolicyComparison, compare};
pub use salary::{InsuranceContributions, SalaryWorksheet, calculate};
