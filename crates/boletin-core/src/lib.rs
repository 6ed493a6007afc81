//! boletin-core — Data model, parsers, and score aggregation.
//!
//! This crate defines the grade-record data model, the input parsers for the
//! harness's JSON/CSV outputs, and the scoring logic the report generators
//! build on.

pub mod config;
pub mod model;
pub mod parser;
pub mod scoring;
pub mod summary;
