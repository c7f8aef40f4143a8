//! Shared record CRUD domain primitives.
//!
//! This crate owns request normalization, action resolution, and partial-update
//! expression synthesis. It intentionally excludes AWS SDK and Lambda runtime
//! concerns, which live in `record_crud_lambda`.

pub mod action;
pub mod config;
pub mod contract;
pub mod error;
pub mod normalize;
pub mod update_expression;
