//! Rolegate shared infrastructure.

pub mod logging;
