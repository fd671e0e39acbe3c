//! Core services implementing the business logic.
//!
//! This module contains the main service implementations:
//! - `codec`: Mapping-value decoding into typed records
//! - `indexer`: On-chain state access through indexer endpoints
//! - `matcher`: Pairing pending submissions with on-chain polls
//! - `notification`: Webhook announcements for confirmed polls
//! - `reconciler`: Per-watcher polling loops and reconciliation passes
//! - `tracker`: Pending-submission lifecycle and durable storage
//! - `wallet`: Wallet session and transaction execution interfaces

pub mod codec;
pub mod indexer;
pub mod matcher;
pub mod notification;
pub mod reconciler;
pub mod tracker;
pub mod wallet;
