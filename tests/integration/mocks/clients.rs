//! Mock implementations of service client traits.
//!
//! This module provides mock implementations of the client interfaces used
//! for testing. It includes:
//! - [`MockIndexerClient`] - Mock implementation of the indexer client
//! - [`MockPendingStoreClient`] - Mock implementation of the durable store client
//! - [`MockWalletClient`] - Mock implementation of the wallet provider
//! - [`MockWebhookChannel`] - Mock implementation of the notifier
//! - [`MockPollMatcher`] - Mock implementation of the match strategy

use std::collections::HashMap;

use zkpoll_reconciler::{
	models::{NewSubmission, OnChainPollRecord, PendingSubmission},
	services::{
		indexer::{IndexerClient, IndexerError, MappingEntry},
		matcher::MatchStrategy,
		notification::{NotificationError, Notifier},
		tracker::{PendingStore, TrackerError},
		wallet::{WalletError, WalletProvider},
	},
};

use async_trait::async_trait;
use mockall::{mock, predicate::*};

mock! {
	/// Mock implementation of the indexer client.
	///
	/// Simulates on-chain mapping queries without actual network access.
	pub IndexerClient {}

	#[async_trait]
	impl IndexerClient for IndexerClient {
		async fn get_mapping_value(
			&self,
			program_id: &str,
			mapping: &str,
			key: &str,
		) -> Result<Option<String>, IndexerError>;
		async fn get_mapping_values(
			&self,
			program_id: &str,
			mapping: &str,
			page: u32,
			limit: u32,
		) -> Result<Vec<MappingEntry>, IndexerError>;
		async fn get_block_height(&self) -> Result<Option<u64>, IndexerError>;
	}
}

mock! {
	/// Mock implementation of the durable pending-submission store.
	///
	/// Simulates store persistence and the flag-style transition endpoints
	/// without a running store service.
	pub PendingStoreClient {}

	#[async_trait]
	impl PendingStore for PendingStoreClient {
		async fn list_pending(
			&self,
			address: &str,
			network: &str,
		) -> Result<Vec<PendingSubmission>, TrackerError>;
		async fn create_pending(
			&self,
			submission: &NewSubmission,
			wallet_address: &str,
		) -> Result<PendingSubmission, TrackerError>;
		async fn confirm_pending(&self, id: &str, on_chain_id: u64) -> Result<bool, TrackerError>;
		async fn fail_pending(
			&self,
			id: &str,
			error_message: Option<String>,
		) -> Result<bool, TrackerError>;
		async fn delete_pending(&self, id: &str, wallet_address: &str) -> Result<bool, TrackerError>;
	}
}

mock! {
	/// Mock implementation of the wallet provider.
	pub WalletClient {}

	#[async_trait]
	impl WalletProvider for WalletClient {
		async fn execute_transaction(
			&self,
			program_id: &str,
			function_name: &str,
			inputs: &[String],
		) -> Result<Option<String>, WalletError>;
		async fn create_poll(
			&self,
			submission: &NewSubmission,
		) -> Result<Option<String>, WalletError>;
	}
}

mock! {
	/// Mock implementation of the match strategy.
	pub PollMatcher {}

	impl MatchStrategy for PollMatcher {
		fn matches(&self, pending: &PendingSubmission, candidate: &OnChainPollRecord) -> bool;
	}
}

mock! {
	/// Mock implementation of the confirmation notifier.
	pub WebhookChannel {}

	#[async_trait]
	impl Notifier for WebhookChannel {
		async fn notify(
			&self,
			variables: &HashMap<String, String>,
		) -> Result<(), NotificationError>;
	}
}
