//! Command-line front end for the salary comparison.

pub mod app;
pub mod logging;
pub mod render;
pub mod utils;
