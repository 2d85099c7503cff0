pub mod adapters;
pub mod common;
pub mod config;
pub mod database;
pub mod dependencies;
pub mod domain;
pub mod routes;
pub mod services;
pub mod views;

#[cfg(test)]
pub(crate) mod test_support;

use std::{net::SocketAddr, str::FromStr};

use axum::http::{HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::{
	dependencies::{config, AppState},
	routes::create_routes,
	services::response::ServiceError,
};

/// Connects to the configured database, applies migrations and serves the app
/// until the listener fails.
pub async fn run() -> Result<(), ServiceError> {
	let config = config()?;

	tracing::info!("Connections Are Being Pooled...");
	let state = AppState::from_config(config).await?;

	let allow_origins = config
		.allow_origins
		.split(',')
		.filter_map(|origin| HeaderValue::from_str(origin.trim()).ok())
		.collect::<Vec<_>>();
	let app = create_routes(state).layer(
		CorsLayer::new()
			.allow_origin(AllowOrigin::list(allow_origins))
			.allow_methods([Method::GET, Method::POST]),
	);

	let addr = SocketAddr::from_str(&config.server_ip_port).map_err(|err| ServiceError::ConfigError(format!("SERVER_IP_PORT: {err}")))?;
	let listener = tokio::net::TcpListener::bind(addr).await?;

	tracing::info!(%addr, "Start Web Server...");
	axum::serve(listener, app.into_make_service()).await?;
	Ok(())
}
