use crate::integration::mocks::{MockNetworkRepository, MockWatcherRepository};
use zkpoll_reconciler::{
	bootstrap::{
		create_reconciler_service, has_active_watchers, initialize_services, launch_reconcilers,
		run_sweep,
	},
	models::{Network, Watcher},
	repositories::{NetworkService, WatcherService},
	services::notification::NotificationService,
	utils::tests::{
		network::NetworkBuilder, submission::PendingSubmissionBuilder, watcher::WatcherBuilder,
	},
};

use mockito::Matcher;
use serde_json::json;
use std::{collections::HashMap, sync::Arc};

const WALLET: &str = "aleo1qnr4dkkvkgfqph0vzc3y6z2eu975wnpz2925ntjccd5cfqxtyu8s7pyjh9";

fn create_test_watcher(name: &str, network: &str, paused: bool) -> Watcher {
	WatcherBuilder::new()
		.name(name)
		.network(network)
		.paused(paused)
		.build()
}

fn setup_network_service(
	networks: HashMap<String, Network>,
) -> NetworkService<MockNetworkRepository> {
	let networks_clone = networks.clone();
	MockNetworkRepository::load_all_context()
		.expect()
		.return_once(move |_| Ok(networks_clone.clone()));

	let mut mock_repo = MockNetworkRepository::default();

	let networks_clone = networks.clone();

	mock_repo
		.expect_get_all()
		.return_once(move || networks_clone.clone());

	mock_repo.expect_clone().return_once({
		let networks = networks.clone();
		move || {
			let mut cloned_repo = MockNetworkRepository::default();
			let networks_clone = networks.clone();
			cloned_repo.expect_get_all().return_once(|| networks_clone);
			cloned_repo
		}
	});

	mock_repo
		.expect_get()
		.return_once(move |id| networks.get(id).cloned());

	NetworkService::new_with_repository(mock_repo).unwrap()
}

fn setup_watcher_service(
	watchers: HashMap<String, Watcher>,
) -> WatcherService<MockWatcherRepository<MockNetworkRepository>, MockNetworkRepository> {
	let watchers_clone = watchers.clone();
	MockWatcherRepository::<MockNetworkRepository>::load_all_context()
		.expect()
		.return_once(move |_, _| Ok(watchers_clone.clone()));

	let mut mock_repo = MockWatcherRepository::<MockNetworkRepository>::default();

	let watchers_clone = watchers.clone();

	mock_repo
		.expect_get_all()
		.return_once(move || watchers_clone.clone());

	mock_repo
		.expect_get()
		.return_once(move |name| watchers.get(name).cloned());

	WatcherService::new_with_repository(mock_repo).unwrap()
}

#[tokio::test]
async fn test_initialize_services() {
	let mut mocked_networks = HashMap::new();
	mocked_networks.insert(
		"aleo_testnet".to_string(),
		NetworkBuilder::new().slug("aleo_testnet").build(),
	);

	let mut mocked_watchers = HashMap::new();
	mocked_watchers.insert(
		"testnet-main".to_string(),
		create_test_watcher("testnet-main", "aleo_testnet", false),
	);
	mocked_watchers.insert(
		"testnet-paused".to_string(),
		create_test_watcher("testnet-paused", "aleo_testnet", true),
	);

	let mock_network_service = setup_network_service(mocked_networks);
	let mock_watcher_service = setup_watcher_service(mocked_watchers);

	let (notification_service, watchers, networks, watcher_service, network_service) =
		initialize_services::<MockWatcherRepository<MockNetworkRepository>, MockNetworkRepository>(
			Some(mock_watcher_service),
			Some(mock_network_service),
		)
		.await
		.expect("Failed to initialize services");

	assert!(
		Arc::strong_count(&notification_service) == 1,
		"NotificationService should be wrapped in Arc"
	);

	// Paused watchers are returned alongside active ones
	assert_eq!(watchers.len(), 2);
	assert!(watchers.iter().any(|w| w.name == "testnet-main"));
	assert!(watchers.iter().any(|w| w.name == "testnet-paused" && w.paused));
	assert!(networks.contains_key("aleo_testnet"));

	assert!(Arc::strong_count(&watcher_service) >= 1);
	assert!(Arc::strong_count(&network_service) >= 1);
}

#[tokio::test]
async fn test_initialize_services_empty_configuration() {
	let mock_network_service = setup_network_service(HashMap::new());
	let mock_watcher_service = setup_watcher_service(HashMap::new());

	let (_, watchers, networks, _, _) =
		initialize_services::<MockWatcherRepository<MockNetworkRepository>, MockNetworkRepository>(
			Some(mock_watcher_service),
			Some(mock_network_service),
		)
		.await
		.expect("Failed to initialize services");

	assert!(watchers.is_empty());
	assert!(networks.is_empty());
	assert!(!has_active_watchers(&watchers, "aleo_testnet"));
}

#[tokio::test]
async fn test_run_sweep_confirms_matched_submission() {
	let mut indexer_server = mockito::Server::new_async().await;
	let mut store_server = mockito::Server::new_async().await;
	let mut webhook_server = mockito::Server::new_async().await;

	let pending = PendingSubmissionBuilder::new()
		.id("sub-1")
		.title("Quorum size")
		.wallet_address(WALLET)
		.network("test_network")
		.build();

	// The working set is seeded before the pass and refreshed after it
	let list_mock = store_server
		.mock("GET", format!("/api/polls/pending/{}", WALLET).as_str())
		.match_query(Matcher::UrlEncoded(
			"network".to_string(),
			"test_network".to_string(),
		))
		.with_status(200)
		.with_header("content-type", "application/json")
		.with_body(json!({"success": true, "data": [pending]}).to_string())
		.expect(2)
		.create_async()
		.await;

	let confirm_mock = store_server
		.mock("PUT", "/api/polls/pending/sub-1/confirm")
		.match_body(Matcher::Json(json!({"onChainId": 7})))
		.with_status(200)
		.with_header("content-type", "application/json")
		.with_body(json!({"success": true}).to_string())
		.create_async()
		.await;

	let listing_mock = indexer_server
		.mock("GET", "/program/zk_polls_test.aleo/mapping/polls")
		.match_query(Matcher::AllOf(vec![
			Matcher::UrlEncoded("page".to_string(), "0".to_string()),
			Matcher::UrlEncoded("limit".to_string(), "50".to_string()),
		]))
		.with_status(200)
		.with_header("content-type", "application/json")
		.with_body(
			json!([{
				"key": "7u64",
				"value": format!("{{creator: {}, title: \"Quorum size\", status: 0u8}}", WALLET),
			}])
			.to_string(),
		)
		.create_async()
		.await;

	let height_mock = indexer_server
		.mock("GET", "/block/height/latest")
		.with_status(200)
		.with_header("content-type", "application/json")
		.with_body("4200000")
		.create_async()
		.await;

	let webhook_mock = webhook_server
		.mock("POST", "/")
		.match_body(Matcher::Json(json!({
			"title": "Poll confirmed: Quorum size",
			"body": "Poll Quorum size is live as #7"
		})))
		.with_status(200)
		.create_async()
		.await;

	let network = NetworkBuilder::new()
		.indexer_url(&indexer_server.url())
		.store_url(&store_server.url())
		.build();
	let networks = HashMap::from([("test_network".to_string(), network)]);

	let watchers = vec![WatcherBuilder::new()
		.name("sweeper")
		.webhook(&webhook_server.url())
		.build()];

	let notification_service = NotificationService::new();
	let result = run_sweep(&notification_service, &watchers, &networks).await;

	assert!(result.is_ok());
	list_mock.assert();
	listing_mock.assert();
	height_mock.assert();
	confirm_mock.assert();
	webhook_mock.assert();
}

#[tokio::test]
async fn test_run_sweep_skips_paused_watchers() {
	let mut indexer_server = mockito::Server::new_async().await;
	let mut store_server = mockito::Server::new_async().await;

	let list_mock = store_server
		.mock("GET", Matcher::Regex(r"^/api/polls/pending/.*$".to_string()))
		.with_status(200)
		.with_body(json!({"success": true, "data": []}).to_string())
		.expect(0)
		.create_async()
		.await;

	let listing_mock = indexer_server
		.mock("GET", Matcher::Regex(r"^/program/.*$".to_string()))
		.with_status(200)
		.with_body("[]")
		.expect(0)
		.create_async()
		.await;

	let network = NetworkBuilder::new()
		.indexer_url(&indexer_server.url())
		.store_url(&store_server.url())
		.build();
	let networks = HashMap::from([("test_network".to_string(), network)]);

	let watchers = vec![WatcherBuilder::new().name("dormant").paused(true).build()];

	let notification_service = NotificationService::new();
	let result = run_sweep(&notification_service, &watchers, &networks).await;

	assert!(result.is_ok());
	list_mock.assert();
	listing_mock.assert();
}

#[tokio::test]
async fn test_run_sweep_fails_when_store_unavailable() {
	let mut store_server = mockito::Server::new_async().await;

	// A store outage must fail the sweep, not silently reconcile nothing
	let list_mock = store_server
		.mock("GET", Matcher::Regex(r"^/api/polls/pending/.*$".to_string()))
		.with_status(503)
		.expect_at_least(1)
		.create_async()
		.await;

	let network = NetworkBuilder::new()
		.store_url(&store_server.url())
		.build();
	let networks = HashMap::from([("test_network".to_string(), network)]);

	let watchers = vec![WatcherBuilder::new().name("sweeper").build()];

	let notification_service = NotificationService::new();
	let result = run_sweep(&notification_service, &watchers, &networks).await;

	assert!(result.is_err());
	list_mock.assert();
}

#[tokio::test]
async fn test_launch_reconcilers_schedules_runnable_watchers() {
	let mut indexer_server = mockito::Server::new_async().await;
	let mut store_server = mockito::Server::new_async().await;

	// Generous expectations: the first pass fires as soon as a watcher starts
	store_server
		.mock("GET", Matcher::Regex(r"^/api/polls/pending/.*$".to_string()))
		.with_status(200)
		.with_header("content-type", "application/json")
		.with_body(json!({"success": true, "data": []}).to_string())
		.expect_at_least(0)
		.create_async()
		.await;

	indexer_server
		.mock("GET", Matcher::Regex(r"^/program/.*$".to_string()))
		.with_status(200)
		.with_header("content-type", "application/json")
		.with_body("[]")
		.expect_at_least(0)
		.create_async()
		.await;

	indexer_server
		.mock("GET", "/block/height/latest")
		.with_status(200)
		.with_body("4200000")
		.expect_at_least(0)
		.create_async()
		.await;

	let network = NetworkBuilder::new()
		.indexer_url(&indexer_server.url())
		.store_url(&store_server.url())
		.aggressive_interval_ms(60_000)
		.normal_interval_ms(60_000)
		.build();
	let networks = HashMap::from([("test_network".to_string(), network)]);

	let watchers = vec![
		create_test_watcher("first", "test_network", false),
		create_test_watcher("second", "test_network", false),
		create_test_watcher("paused", "test_network", true),
		create_test_watcher("orphan", "unknown_network", false),
	];

	let reconciler_service = create_reconciler_service();
	let notification_service = NotificationService::new();

	let result = launch_reconcilers(
		&reconciler_service,
		&notification_service,
		&watchers,
		&networks,
	)
	.await;

	assert!(result.is_ok());
	// Paused and unknown-network watchers are not scheduled
	assert_eq!(reconciler_service.active_count().await, 2);

	reconciler_service.stop_all().await.unwrap();
	assert_eq!(reconciler_service.active_count().await, 0);
}
