//! Pending poll-submission reconciliation service.
//!
//! This library provides functionality for tracking locally recorded poll
//! submissions and resolving them against on-chain state. It includes:
//!
//! - Configuration management through JSON files
//! - Polling of on-chain poll listings through indexer endpoints
//! - Submission matching, confirmation, and failure handling
//! - Extensible repository and service architecture
//!
//! # Module Structure
//!
//! - `bootstrap`: Bootstraps the application
//! - `models`: Data structures for configuration and poll data
//! - `repositories`: Configuration storage and management
//! - `services`: Core business logic and chain interaction
//! - `utils`: Common utilities and helper functions

pub mod bootstrap;
pub mod models;
pub mod repositories;
pub mod services;
pub mod utils;
