//! Core domain types and logic.

pub mod quote;
pub mod analysis;
pub mod window;
pub mod registry;
pub mod query;
pub mod query_parser;
pub mod query_eval;
pub mod replay;
pub mod config_validation;
pub mod error;
