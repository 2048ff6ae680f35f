//! Ordered collections of opaque identifiers over interchangeable storage
//! backends.
//!
//! Nestbox tracks an arbitrary number of **containers**, each holding an
//! ordered sequence of opaque **member** identifiers, behind a single
//! [`StorageBackend`] contract. Three implementations are provided, each over
//! a fundamentally different primitive, and each behaviorally identical at
//! the contract surface — including windowed listing with offset, limit and
//! total count:
//!
//! - [`MemoryBackend`](storage::memory::MemoryBackend): an in-process ordered
//!   map, used for tests and zero-dependency deployments.
//! - [`MongoBackend`](storage::mongodb::MongoBackend) (feature `mongodb`):
//!   one document per container with an embedded ordered array, keyed by the
//!   store's native primary key.
//! - [`RedisBackend`](storage::redis::RedisBackend) (feature `redis`): one
//!   native list per container, seeded with a sentinel element so that an
//!   emptied container's key is never reclaimed out from under it.
//!
//! A backend is selected once at startup from [`StorageConfig`] and injected
//! wherever it is consumed; the contract is object-safe, so callers hold a
//! `Box<dyn StorageBackend>` and never branch on the concrete engine again.
//!
//! For the engine-backed implementations you must run the corresponding
//! service and may set the following environment variables (all have local
//! defaults):
//!
//! - `STORAGE_BACKEND` (`ram` | `mongodb` | `redis`)
//! - `MONGO_HOST`, `MONGO_PORT`, `MONGO_DB`
//! - `REDIS_PROTOCOL`, `REDIS_HOST`, `REDIS_PORT`, `REDIS_PASSWORD`,
//!   `REDIS_DB`
//! - `MAX_PAGE_LIMIT`
//!
//! # Example
//!
//! ```no_run
//! use nestbox::{open_backend, StorageBackend, StorageConfig, Window};
//!
//! #[tokio::main]
//! async fn main() -> nestbox::Result<()> {
//! 	let config = StorageConfig::from_env()?;
//! 	let backend = open_backend(&config).await?;
//!
//! 	let container_id = backend.mint_container().await?;
//! 	backend.add_member(&container_id, "m1").await?;
//! 	backend.add_member(&container_id, "m2").await?;
//!
//! 	let page = backend
//! 		.list_members(&container_id, Window::with_max(0, 10, config.max_page_limit))
//! 		.await?;
//! 	assert_eq!(page.total, 2);
//!
//! 	backend.remove_container(&container_id).await?;
//! 	Ok(())
//! }
//! ```

pub mod config;
pub mod storage;
pub mod types;

pub use config::{open_backend, BackendKind, StorageConfig};
pub use storage::{
	common::{Page, Window, DEFAULT_PAGE_LIMIT},
	StorageBackend,
};
pub use types::{Result, StorageError};

#[cfg(test)]
mod tests;
