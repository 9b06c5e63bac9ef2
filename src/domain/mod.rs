//! Core domain types and logic.

pub mod series;
pub mod regime;
pub mod position;
pub mod scanner;
pub mod metrics;
pub mod backtest;
pub mod config_validation;
pub mod error;
