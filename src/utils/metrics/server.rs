//! Metrics server module
//!
//! This module provides an HTTP server to expose Prometheus metrics for scraping.

use actix_web::middleware::{Compress, DefaultHeaders, NormalizePath};
use actix_web::{web, App, HttpResponse, HttpServer, Responder};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};

use crate::{
	repositories::{NetworkRepository, NetworkService, WatcherRepository, WatcherService},
	utils::metrics::{gather_metrics, update_system_metrics, update_watcher_metrics},
};

// Type aliases to simplify complex types in function signatures
//  WatcherService
pub type WatcherServiceData =
	web::Data<Arc<Mutex<WatcherService<WatcherRepository<NetworkRepository>, NetworkRepository>>>>;

// NetworkService
pub type NetworkServiceData = web::Data<Arc<Mutex<NetworkService<NetworkRepository>>>>;

// For Arc<Mutex<...>> WatcherService
pub type WatcherServiceArc =
	Arc<Mutex<WatcherService<WatcherRepository<NetworkRepository>, NetworkRepository>>>;

// For Arc<Mutex<...>> NetworkService
pub type NetworkServiceArc = Arc<Mutex<NetworkService<NetworkRepository>>>;

/// Metrics endpoint handler
async fn metrics_handler(
	watcher_service: WatcherServiceData,
	network_service: NetworkServiceData,
) -> impl Responder {
	// Update system metrics
	update_system_metrics();

	// Get current state and update metrics
	{
		let watchers = watcher_service.lock().await.get_all();
		let networks = network_service.lock().await.get_all();

		update_watcher_metrics(&watchers, &networks);
	}

	// Gather all metrics
	match gather_metrics() {
		Ok(buffer) => HttpResponse::Ok()
			.content_type("text/plain; version=0.0.4; charset=utf-8")
			.body(buffer),
		Err(e) => {
			error!("Error gathering metrics: {}", e);
			HttpResponse::InternalServerError().finish()
		}
	}
}

// Create metrics server
pub fn create_metrics_server(
	bind_address: String,
	watcher_service: WatcherServiceArc,
	network_service: NetworkServiceArc,
) -> std::io::Result<actix_web::dev::Server> {
	let actual_bind_address = if std::env::var("IN_DOCKER").unwrap_or_default() == "true" {
		if let Some(port) = bind_address.split(':').nth(1) {
			format!("0.0.0.0:{}", port)
		} else {
			"0.0.0.0:8081".to_string()
		}
	} else {
		bind_address.clone()
	};

	info!(
		"Starting metrics server on {} (actual bind: {})",
		bind_address, actual_bind_address
	);

	Ok(HttpServer::new(move || {
		App::new()
			.wrap(Compress::default())
			.wrap(NormalizePath::trim())
			.wrap(DefaultHeaders::new())
			.app_data(web::Data::new(watcher_service.clone()))
			.app_data(web::Data::new(network_service.clone()))
			.route("/metrics", web::get().to(metrics_handler))
	})
	.workers(2)
	.bind(actual_bind_address)?
	.shutdown_timeout(5)
	.run())
}
