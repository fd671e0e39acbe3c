use mockito::{Matcher, Server};
use zkpoll_reconciler::{
	services::notification::{NotificationError, NotificationService, Notifier},
	utils::{tests::watcher::WatcherBuilder, RetryConfig},
};
use serde_json::json;
use std::{collections::HashMap, sync::Arc};

fn poll_variables() -> HashMap<String, String> {
	HashMap::from([
		("id".to_string(), "sub-1".to_string()),
		("title".to_string(), "Quorum size".to_string()),
		("on_chain_id".to_string(), "7".to_string()),
		("network".to_string(), "test_network".to_string()),
	])
}

async fn notifier_for_url(url: &str) -> Arc<dyn Notifier> {
	let service = NotificationService::new();
	let watcher = WatcherBuilder::new().webhook(url).build();
	service.notifier_for(&watcher).await.unwrap().unwrap()
}

#[tokio::test]
async fn test_watcher_webhook_notification_success() {
	let mut server = Server::new_async().await;
	let mock = server
		.mock("POST", "/")
		.match_header("content-type", "application/json")
		.match_body(Matcher::Json(json!({
			"title": "Poll confirmed: Quorum size",
			"body": "Poll Quorum size is live as #7"
		})))
		.with_status(200)
		.create_async()
		.await;

	let notifier = notifier_for_url(&server.url()).await;
	let result = notifier.notify(&poll_variables()).await;

	assert!(result.is_ok());
	mock.assert();
}

#[tokio::test]
async fn test_watcher_webhook_custom_templates() {
	let mut server = Server::new_async().await;
	let mock = server
		.mock("POST", "/")
		.match_body(Matcher::Json(json!({
			"title": "zkPoll",
			"body": "sub-1 on test_network confirmed"
		})))
		.with_status(200)
		.create_async()
		.await;

	let service = NotificationService::new();
	let watcher = WatcherBuilder::new()
		.webhook(&server.url())
		.webhook_message("zkPoll", "${id} on ${network} confirmed")
		.build();
	let notifier = service.notifier_for(&watcher).await.unwrap().unwrap();

	let result = notifier.notify(&poll_variables()).await;

	assert!(result.is_ok());
	mock.assert();
}

#[tokio::test]
async fn test_watcher_webhook_signs_requests() {
	let mut server = Server::new_async().await;
	let mock = server
		.mock("PUT", "/")
		.match_header("X-Signature", Matcher::Regex("^[0-9a-f]{64}$".to_string()))
		.match_header("X-Timestamp", Matcher::Regex("^[0-9]+$".to_string()))
		.with_status(200)
		.create_async()
		.await;

	let service = NotificationService::new();
	let watcher = WatcherBuilder::new()
		.webhook(&server.url())
		.webhook_method("PUT")
		.webhook_secret("top-secret")
		.build();
	let notifier = service.notifier_for(&watcher).await.unwrap().unwrap();

	let result = notifier.notify(&poll_variables()).await;

	assert!(result.is_ok());
	mock.assert();
}

#[tokio::test]
async fn test_watcher_webhook_retryable_error() {
	let mut server = Server::new_async().await;
	let default_retries_count = RetryConfig::default().max_retries as usize;
	let mock = server
		.mock("POST", "/")
		.with_status(500)
		.expect(1 + default_retries_count)
		.create_async()
		.await;

	let notifier = notifier_for_url(&server.url()).await;
	let result = notifier.notify(&poll_variables()).await;

	assert!(result.is_err());
	let error = result.unwrap_err();
	assert!(matches!(error, NotificationError::NotifyFailed(_)));
	mock.assert();
}

#[tokio::test]
async fn test_watcher_webhook_non_retryable_error() {
	let mut server = Server::new_async().await;
	let mock = server
		.mock("POST", "/")
		.with_status(403)
		.expect(1) // 1 initial call, no retries
		.create_async()
		.await;

	let notifier = notifier_for_url(&server.url()).await;
	let result = notifier.notify(&poll_variables()).await;

	assert!(result.is_err());
	mock.assert();
}

#[tokio::test]
async fn test_unresolved_template_variables_are_left_in_place() {
	let mut server = Server::new_async().await;
	let mock = server
		.mock("POST", "/")
		.match_body(Matcher::Json(json!({
			"title": "Poll confirmed: Quorum size",
			"body": "tx ${tx_hash} for Quorum size"
		})))
		.with_status(200)
		.create_async()
		.await;

	// tx_hash was never captured, so the placeholder survives verbatim
	let service = NotificationService::new();
	let watcher = WatcherBuilder::new()
		.webhook(&server.url())
		.webhook_message("Poll confirmed: ${title}", "tx ${tx_hash} for ${title}")
		.build();
	let notifier = service.notifier_for(&watcher).await.unwrap().unwrap();

	let result = notifier.notify(&poll_variables()).await;

	assert!(result.is_ok());
	mock.assert();
}
