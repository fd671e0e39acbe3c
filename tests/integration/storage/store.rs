use zkpoll_reconciler::{
	services::tracker::{HttpPendingStore, PendingStore, TrackerError},
	utils::{
		tests::submission::{NewSubmissionBuilder, PendingSubmissionBuilder},
		RetryConfig,
	},
};

use chrono::Utc;
use mockito::Matcher;
use serde_json::json;

const WALLET: &str = "aleo1qnr4dkkvkgfqph0vzc3y6z2eu975wnpz2925ntjccd5cfqxtyu8s7pyjh9";

fn store_for(server: &mockito::Server) -> HttpPendingStore {
	HttpPendingStore::from_url(&server.url()).unwrap()
}

#[tokio::test]
async fn test_list_pending_round_trips_wire_format() {
	let mut server = mockito::Server::new_async().await;

	let pending = PendingSubmissionBuilder::new()
		.id("sub-1")
		.title("Quorum size")
		.tx_hash("at1deadbeef")
		.expires_at(Utc::now() + chrono::Duration::hours(2))
		.build();

	let mock = server
		.mock("GET", format!("/api/polls/pending/{}", WALLET).as_str())
		.match_query(Matcher::UrlEncoded(
			"network".to_string(),
			"test_network".to_string(),
		))
		.with_status(200)
		.with_header("content-type", "application/json")
		.with_body(json!({"success": true, "data": [pending]}).to_string())
		.create_async()
		.await;

	let store = store_for(&server);
	let listing = store.list_pending(WALLET, "test_network").await.unwrap();

	assert_eq!(listing, vec![pending]);
	mock.assert();
}

#[tokio::test]
async fn test_list_pending_refusal_is_store_error() {
	let mut server = mockito::Server::new_async().await;
	let mock = server
		.mock("GET", format!("/api/polls/pending/{}", WALLET).as_str())
		.match_query(Matcher::Any)
		.with_status(200)
		.with_header("content-type", "application/json")
		.with_body(json!({"success": false, "error": "unknown wallet"}).to_string())
		.create_async()
		.await;

	let store = store_for(&server);
	let result = store.list_pending(WALLET, "test_network").await;

	assert!(matches!(result, Err(TrackerError::StoreError(_))));
	assert!(result.unwrap_err().to_string().contains("unknown wallet"));
	mock.assert();
}

#[tokio::test]
async fn test_list_pending_retries_server_errors() {
	let mut server = mockito::Server::new_async().await;
	let default_retries_count = RetryConfig::default().max_retries as usize;
	let mock = server
		.mock("GET", format!("/api/polls/pending/{}", WALLET).as_str())
		.match_query(Matcher::Any)
		.with_status(503)
		.expect(1 + default_retries_count)
		.create_async()
		.await;

	let store = store_for(&server);
	let result = store.list_pending(WALLET, "test_network").await;

	assert!(matches!(result, Err(TrackerError::StoreError(_))));
	mock.assert();
}

#[tokio::test]
async fn test_list_pending_missing_data_is_store_error() {
	let mut server = mockito::Server::new_async().await;
	let mock = server
		.mock("GET", format!("/api/polls/pending/{}", WALLET).as_str())
		.match_query(Matcher::Any)
		.with_status(200)
		.with_header("content-type", "application/json")
		.with_body(json!({"success": true}).to_string())
		.create_async()
		.await;

	let store = store_for(&server);
	let result = store.list_pending(WALLET, "test_network").await;

	assert!(matches!(result, Err(TrackerError::StoreError(_))));
	assert!(result.unwrap_err().to_string().contains("no data"));
	mock.assert();
}

#[tokio::test]
async fn test_create_pending_sends_wire_format_body() {
	let mut server = mockito::Server::new_async().await;

	let created = PendingSubmissionBuilder::new()
		.id("created-1")
		.title("Favorite validator?")
		.tx_hash("at1deadbeef")
		.build();

	let mock = server
		.mock("POST", "/api/polls/pending")
		.match_body(Matcher::Json(json!({
			"walletAddress": WALLET,
			"txHash": "at1deadbeef",
			"title": "Favorite validator?",
			"description": "Test poll description",
			"options": ["Yes", "No"],
			"rewardPerVote": "0.5",
			"maxVoters": 100,
			"durationBlocks": 1000,
			"fundAmount": "25",
			"tokenId": "credits",
			"privacyMode": "private",
			"visibility": "public",
			"network": "test_network"
		})))
		.with_status(201)
		.with_header("content-type", "application/json")
		.with_body(json!({"success": true, "data": created}).to_string())
		.create_async()
		.await;

	let submission = NewSubmissionBuilder::new()
		.title("Favorite validator?")
		.tx_hash("at1deadbeef")
		.reward_per_vote("0.5")
		.fund_amount("25")
		.build();

	let store = store_for(&server);
	let result = store.create_pending(&submission, WALLET).await.unwrap();

	assert_eq!(result.id, "created-1");
	assert!(result.is_pending());
	mock.assert();
}

#[tokio::test]
async fn test_create_pending_refusal_is_store_error() {
	let mut server = mockito::Server::new_async().await;
	let mock = server
		.mock("POST", "/api/polls/pending")
		.with_status(200)
		.with_header("content-type", "application/json")
		.with_body(json!({"success": false, "error": "duplicate title"}).to_string())
		.create_async()
		.await;

	let submission = NewSubmissionBuilder::new().build();
	let store = store_for(&server);
	let result = store.create_pending(&submission, WALLET).await;

	assert!(matches!(result, Err(TrackerError::StoreError(_))));
	assert!(result.unwrap_err().to_string().contains("duplicate title"));
	mock.assert();
}

#[tokio::test]
async fn test_confirm_pending_reports_success_flag() {
	let mut server = mockito::Server::new_async().await;
	let mock = server
		.mock("PUT", "/api/polls/pending/sub-1/confirm")
		.match_body(Matcher::Json(json!({"onChainId": 7})))
		.with_status(200)
		.with_header("content-type", "application/json")
		.with_body(json!({"success": true}).to_string())
		.create_async()
		.await;

	let store = store_for(&server);
	let confirmed = store.confirm_pending("sub-1", 7).await.unwrap();

	assert!(confirmed);
	mock.assert();
}

#[tokio::test]
async fn test_confirm_pending_refusal_is_false() {
	let mut server = mockito::Server::new_async().await;
	let mock = server
		.mock("PUT", "/api/polls/pending/sub-1/confirm")
		.with_status(200)
		.with_header("content-type", "application/json")
		.with_body(json!({"success": false, "error": "already resolved"}).to_string())
		.create_async()
		.await;

	let store = store_for(&server);
	let confirmed = store.confirm_pending("sub-1", 7).await.unwrap();

	assert!(!confirmed);
	mock.assert();
}

#[tokio::test]
async fn test_confirm_pending_envelope_on_client_error_is_false() {
	let mut server = mockito::Server::new_async().await;

	// The store reports refusals through the envelope even on 4xx statuses
	let mock = server
		.mock("PUT", "/api/polls/pending/sub-1/confirm")
		.with_status(409)
		.with_header("content-type", "application/json")
		.with_body(json!({"success": false, "error": "not the owner"}).to_string())
		.create_async()
		.await;

	let store = store_for(&server);
	let confirmed = store.confirm_pending("sub-1", 7).await.unwrap();

	assert!(!confirmed);
	mock.assert();
}

#[tokio::test]
async fn test_confirm_pending_non_envelope_error() {
	let mut server = mockito::Server::new_async().await;
	let mock = server
		.mock("PUT", "/api/polls/pending/sub-1/confirm")
		.with_status(400)
		.with_body("Bad Request")
		.expect(1)
		.create_async()
		.await;

	let store = store_for(&server);
	let result = store.confirm_pending("sub-1", 7).await;

	assert!(matches!(result, Err(TrackerError::StoreError(_))));
	mock.assert();
}

#[tokio::test]
async fn test_fail_pending_sends_message() {
	let mut server = mockito::Server::new_async().await;
	let mock = server
		.mock("PUT", "/api/polls/pending/sub-1/fail")
		.match_body(Matcher::Json(json!({"errorMessage": "wallet declined"})))
		.with_status(200)
		.with_header("content-type", "application/json")
		.with_body(json!({"success": true}).to_string())
		.create_async()
		.await;

	let store = store_for(&server);
	let failed = store
		.fail_pending("sub-1", Some("wallet declined".to_string()))
		.await
		.unwrap();

	assert!(failed);
	mock.assert();
}

#[tokio::test]
async fn test_fail_pending_omits_absent_message() {
	let mut server = mockito::Server::new_async().await;
	let mock = server
		.mock("PUT", "/api/polls/pending/sub-1/fail")
		.match_body(Matcher::Json(json!({})))
		.with_status(200)
		.with_header("content-type", "application/json")
		.with_body(json!({"success": true}).to_string())
		.create_async()
		.await;

	let store = store_for(&server);
	let failed = store.fail_pending("sub-1", None).await.unwrap();

	assert!(failed);
	mock.assert();
}

#[tokio::test]
async fn test_delete_pending_sends_wallet_address() {
	let mut server = mockito::Server::new_async().await;
	let mock = server
		.mock("DELETE", "/api/polls/pending/sub-1")
		.match_body(Matcher::Json(json!({"walletAddress": WALLET})))
		.with_status(200)
		.with_header("content-type", "application/json")
		.with_body(json!({"success": true}).to_string())
		.create_async()
		.await;

	let store = store_for(&server);
	let deleted = store.delete_pending("sub-1", WALLET).await.unwrap();

	assert!(deleted);
	mock.assert();
}
