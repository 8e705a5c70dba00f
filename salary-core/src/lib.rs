//! Vietnamese gross-to-net salary calculation under personal income tax and
//! employee social-insurance rules, with side-by-side comparison of policy
//! regimes.

pub mod calculations;
pub mod models;
pub mod schedules;

pub use calculations::{PolicyComparison, SalaryWorksheet, calculate, compare};
pub use models::*;
