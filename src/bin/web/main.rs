use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use warbler::{dependencies::config, services::response::ServiceError};

#[tokio::main]
async fn main() -> Result<(), ServiceError> {
	dotenv::dotenv().ok();
	let config = config()?;

	// ! Tracing
	tracing_subscriber::registry()
		.with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
			// axum logs rejections from built-in extractors with the `axum::rejection`
			// target, at `TRACE` level. `axum::rejection=trace` enables showing those events
			config.log_level.as_str().into()
		}))
		.with(tracing_subscriber::fmt::layer())
		.init();

	warbler::run().await.inspect_err(|err| tracing::error!("Server stopped : {}", err))
}
