use std::{future::Future, mem, str::FromStr, sync::Arc};

use sqlx::{
	sqlite::{SqliteConnectOptions, SqlitePoolOptions},
	Sqlite, SqliteConnection, SqlitePool, Transaction,
};
use tokio::sync::Mutex;

use crate::services::response::ServiceError;

pub type SharedExecutor = Arc<Mutex<DatabaseExecutor>>;

/// Owns the single transaction a request runs in. Repositories borrow the
/// connection through [`DatabaseExecutor::transaction`].
pub struct DatabaseExecutor {
	pool: SqlitePool,
	transaction: Option<Transaction<'static, Sqlite>>,
}

impl DatabaseExecutor {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool, transaction: None }
	}

	pub fn transaction(&mut self) -> Result<&mut SqliteConnection, ServiceError> {
		match self.transaction.as_mut() {
			Some(trx) => Ok(&mut **trx),
			None => {
				tracing::error!("Transaction Has Not Begun!");
				Err(ServiceError::TransactionError)
			}
		}
	}

	pub(crate) async fn begin(&mut self) -> Result<(), ServiceError> {
		match self.transaction.as_mut() {
			None => {
				self.transaction = Some(self.pool.begin().await?);
				Ok(())
			}
			Some(_trx) => {
				tracing::error!("Transaction Begun Already!");
				Err(ServiceError::TransactionError)
			}
		}
	}

	pub(crate) async fn commit(&mut self) -> Result<(), ServiceError> {
		let Some(trx) = mem::take(&mut self.transaction) else {
			return Err(ServiceError::TransactionError);
		};
		trx.commit().await.map_err(|err| {
			tracing::error!("Error occurred during commit operation : {:?}", err);
			ServiceError::DatabaseError(err)
		})
	}

	pub(crate) async fn rollback(&mut self) -> Result<(), ServiceError> {
		let Some(trx) = mem::take(&mut self.transaction) else {
			return Err(ServiceError::TransactionError);
		};
		trx.rollback().await.map_err(ServiceError::DatabaseError)
	}

	/// Runs `work` inside one transaction: commits when it returns `Ok`, rolls
	/// back and hands the original error back otherwise.
	pub async fn transactional<T, F, Fut>(
		pool: &SqlitePool,
		work: F,
	) -> Result<T, ServiceError>
	where
		F: FnOnce(SharedExecutor) -> Fut,
		Fut: Future<Output = Result<T, ServiceError>>,
	{
		let executor: SharedExecutor = DatabaseExecutor::new(pool.clone()).into();
		executor.lock().await.begin().await?;

		match work(executor.clone()).await {
			Ok(value) => {
				executor.lock().await.commit().await?;
				Ok(value)
			}
			Err(err) => {
				if let Err(rollback_err) = executor.lock().await.rollback().await {
					tracing::error!("Rollback failed : {:?}", rollback_err);
				}
				Err(err)
			}
		}
	}
}

impl From<DatabaseExecutor> for Arc<Mutex<DatabaseExecutor>> {
	fn from(value: DatabaseExecutor) -> Self {
		Arc::new(Mutex::new(value))
	}
}

pub async fn connect(
	url: &str,
	max_connections: u32,
) -> Result<SqlitePool, ServiceError> {
	let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true).foreign_keys(true);
	let pool = SqlitePoolOptions::new().max_connections(max_connections).connect_with(options).await?;
	Ok(pool)
}

/// A private in-memory database. Pinned to one connection that never expires,
/// since every new sqlite memory connection starts out empty.
pub async fn connect_in_memory() -> Result<SqlitePool, ServiceError> {
	let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
	let pool = SqlitePoolOptions::new()
		.max_connections(1)
		.idle_timeout(None)
		.max_lifetime(None)
		.connect_with(options)
		.await?;
	Ok(pool)
}

pub async fn migrate(pool: &SqlitePool) -> Result<(), ServiceError> {
	sqlx::migrate!("./migrations").run(pool).await?;
	Ok(())
}
