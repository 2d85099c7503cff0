pub(crate) mod follow_repository;
pub(crate) mod like_repository;
pub(crate) mod message_repository;
pub(crate) mod session_repository;
pub(crate) mod user_repository;

use std::marker::PhantomData;

use crate::database::SharedExecutor;

/// Typed view over the request's transaction; one `impl` block per entity.
pub struct Repository<E> {
	pub executor: SharedExecutor,
	pub _phantom: PhantomData<E>,
}

impl<E> Repository<E> {
	pub fn new(executor: SharedExecutor) -> Self {
		Self {
			executor,
			_phantom: Default::default(),
		}
	}
}
