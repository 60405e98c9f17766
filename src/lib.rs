//! Cost Normalization and Aggregation Engine for the R&D Team Cost Dashboard
//!
//! This crate loads employee compensation and software-license spreadsheets,
//! parses their pt-BR currency text into exact decimal amounts, fills derived
//! cost fields from contract rules, and aggregates the records under the
//! dashboard's filters.

#![warn(missing_docs)]

pub mod api;
pub mod commands;
pub mod config;
pub mod dashboard;
pub mod engine;
pub mod error;
pub mod models;
pub mod money;
pub mod normalize;
pub mod storage;
