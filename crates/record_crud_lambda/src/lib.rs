//! AWS-oriented adapters and handlers for the record CRUD Lambda.
//!
//! This crate owns runtime integration details (the Lambda handler, response
//! envelopes, and record store adapters). Request semantics come from
//! `record_crud_core`.

pub mod adapters;
pub mod handlers;
