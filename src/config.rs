use chrono::Duration;

use crate::services::response::ServiceError;

/// Two weeks
const DEFAULT_SESSION_TTL_SECS: i64 = 14 * 24 * 60 * 60;

pub struct Config {
	/// Which errors we want to log
	pub log_level: String,

	/// Port server is listening to
	pub server_ip_port: String,
	pub database_url: String,
	pub allow_origins: String,

	/// Work factor handed to bcrypt when hashing new passwords
	pub bcrypt_cost: u32,

	/// How long a login stays valid
	pub session_ttl: Duration,
}

/// What signing up and logging in need besides the pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AuthSettings {
	pub bcrypt_cost: u32,
	pub session_ttl: Duration,
}

impl Config {
	pub fn new() -> Result<Config, ServiceError> {
		dotenv::dotenv().ok();
		let log_level = std::env::var("LOG_LEVEL").unwrap_or("warbler=debug,tower_http=debug,axum::rejection=trace".to_string());
		let server_ip_port = std::env::var("SERVER_IP_PORT").unwrap_or("0.0.0.0:3000".into());
		let database_url = std::env::var("DATABASE_URL").unwrap_or("sqlite://warbler.db".into());
		let allow_origins = std::env::var("ALLOW_ORIGINS").unwrap_or("http://localhost:3000".to_string());
		let bcrypt_cost = match std::env::var("BCRYPT_COST") {
			Ok(raw) => parse_bcrypt_cost(&raw)?,
			Err(_) => bcrypt::DEFAULT_COST,
		};
		let session_ttl = match std::env::var("SESSION_TTL") {
			Ok(raw) => parse_session_ttl(&raw)?,
			Err(_) => Duration::seconds(DEFAULT_SESSION_TTL_SECS),
		};

		Ok(Config {
			log_level,
			server_ip_port,
			database_url,
			allow_origins,
			bcrypt_cost,
			session_ttl,
		})
	}

	pub fn auth(&self) -> AuthSettings {
		AuthSettings {
			bcrypt_cost: self.bcrypt_cost,
			session_ttl: self.session_ttl,
		}
	}
}

fn parse_bcrypt_cost(raw: &str) -> Result<u32, ServiceError> {
	let cost = raw
		.trim()
		.parse::<u32>()
		.map_err(|err| ServiceError::ConfigError(format!("BCRYPT_COST must be an integer: {err}")))?;
	// bcrypt rejects anything outside 4..=31
	if !(4..=31).contains(&cost) {
		return Err(ServiceError::ConfigError(format!("BCRYPT_COST must be between 4 and 31, got {cost}")));
	}
	Ok(cost)
}

/// Seconds, at least one.
fn parse_session_ttl(raw: &str) -> Result<Duration, ServiceError> {
	let secs = raw
		.trim()
		.parse::<i64>()
		.map_err(|err| ServiceError::ConfigError(format!("SESSION_TTL must be a number of seconds: {err}")))?;
	if secs < 1 {
		return Err(ServiceError::ConfigError(format!("SESSION_TTL must be positive, got {secs}")));
	}
	Duration::try_seconds(secs).ok_or_else(|| ServiceError::ConfigError(format!("SESSION_TTL is out of range: {secs}")))
}
