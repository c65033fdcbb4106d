//! # Scorebook
//!
//! A cricket tournament statistics service: a SQLite store seeded once from
//! static JSON fixtures, exposed through a paginated REST API.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (teams, players, matches, innings, performances)
//! - **fixtures**: Fixture file loading and raw record types
//! - **seed**: Ingestion pipeline reconciling fixtures into store rows
//! - **store**: Relational store with natural-key upserts and aggregation
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod api;
pub mod config;
pub mod fixtures;
pub mod models;
pub mod seed;
pub mod store;

pub use models::*;
