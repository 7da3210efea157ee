//! Receipt intake, loyalty-point scoring, and the asynchronous score store behind it.

pub mod config;
pub mod error;
pub mod receipts;
pub mod telemetry;
