use std::sync::OnceLock;

use sqlx::SqlitePool;

use crate::{
	config::{AuthSettings, Config},
	database,
	services::response::ServiceError,
};

/// Shared application state handed to every route through axum's `State`.
#[derive(Clone)]
pub struct AppState {
	pub pool: SqlitePool,
	pub auth: AuthSettings,
}

impl AppState {
	pub fn new(pool: SqlitePool, auth: AuthSettings) -> Self {
		Self { pool, auth }
	}

	pub async fn from_config(config: &Config) -> Result<Self, ServiceError> {
		let pool = connection_pool(&config.database_url).await?;
		database::migrate(&pool).await?;
		Ok(Self::new(pool, config.auth()))
	}
}

pub fn config() -> Result<&'static Config, ServiceError> {
	static CONFIG: OnceLock<Config> = OnceLock::new();
	let config = match CONFIG.get() {
		None => {
			let config = Config::new()?;

			CONFIG.get_or_init(|| config)
		}
		Some(config) => config,
	};
	Ok(config)
}

pub async fn connection_pool(url: &str) -> Result<SqlitePool, ServiceError> {
	database::connect(url, 30).await
}
