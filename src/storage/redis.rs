use async_trait::async_trait;
use redis::{AsyncCommands, AsyncIter, Client, LposOptions};
use tracing::{debug, error, instrument};

use crate::types::{Result, StorageError};

use super::{
	common::{Page, Window},
	StorageBackend,
};

/// Seed element occupying position 0 of every container list.
///
/// Redis reclaims a list key the moment it becomes empty, which would make an
/// empty container indistinguishable from a missing one. The sentinel keeps
/// the key alive and is excluded from every listing, count, and existence
/// check; [`member_range`] is the only place aware of the index shift.
const SENTINEL: &str = "\u{0}";

/// Prefix namespacing container lists away from other keys in the database.
const CONTAINER_KEY_PREFIX: &str = "container:";

/// List-store backend over a Redis instance.
///
/// Each container maps to one native list key named by its identifier. Member
/// appends use `RPUSHX` so the mandatory existence check and the append are a
/// single atomic engine operation; a plain `RPUSH` would silently auto-create
/// the container and violate the mint/remove lifecycle.
pub struct RedisBackend {
	client: Client,
}

impl RedisBackend {
	/// Creates a backend over an already-configured client.
	pub fn new(client: Client) -> Self {
		Self { client }
	}

	/// Creates a backend from the `REDIS_*` environment variables, falling
	/// back to a local unauthenticated instance.
	#[instrument]
	pub fn from_env() -> Result<Self> {
		let protocol = std::env::var("REDIS_PROTOCOL").unwrap_or_else(|_| "redis".to_string());
		let host = std::env::var("REDIS_HOST").unwrap_or_else(|_| "localhost".to_string());
		let port = std::env::var("REDIS_PORT").unwrap_or_else(|_| "6379".to_string());
		let password = std::env::var("REDIS_PASSWORD").unwrap_or_default();
		let db = std::env::var("REDIS_DB").unwrap_or_else(|_| "0".to_string());

		let client = Client::open(format!("{}://:{}@{}:{}/{}", protocol, password, host, port, db))
			.map_err(|e| {
				error!("Failed to initialize Redis client: {}", e);
				StorageError::Redis(e)
			})?;

		Ok(Self::new(client))
	}

	async fn connection(&self) -> Result<redis::aio::MultiplexedConnection> {
		self.client.get_multiplexed_async_connection().await.map_err(|e| {
			error!("Failed to connect to Redis: {}", e);
			StorageError::Redis(e)
		})
	}
}

/// List key for a container identifier.
fn container_key(container_id: &str) -> String {
	format!("{}{}", CONTAINER_KEY_PREFIX, container_id)
}

/// Inclusive `LRANGE` bounds for a member window.
///
/// Members occupy list positions `1..len`; position 0 is the sentinel. All
/// member-facing offset arithmetic lives here so the shift cannot leak into
/// listing or counting logic.
fn member_range(window: &Window) -> (isize, isize) {
	// Clamped casts: a wrapped-negative index would read from the tail and
	// expose the sentinel.
	let start = isize::try_from(window.offset()).unwrap_or(isize::MAX).saturating_add(1);
	let stop = isize::try_from(window.end()).unwrap_or(isize::MAX);
	(start, stop)
}

#[async_trait]
impl StorageBackend for RedisBackend {
	async fn mint_container(&self) -> Result<String> {
		let mut con = self.connection().await?;

		// 128-bit random tokens collide only in theory, but the contract
		// promises an identifier not currently in use.
		let container_id = loop {
			let candidate = uuid::Uuid::new_v4().simple().to_string();
			let in_use: bool = con.exists(container_key(&candidate)).await?;
			if !in_use {
				break candidate;
			}
		};

		let _len: usize =
			con.rpush(container_key(&container_id), SENTINEL).await.map_err(|e| {
				error!("Failed to seed container {}: {}", container_id, e);
				StorageError::Redis(e)
			})?;

		debug!("Minted container {}", container_id);

		Ok(container_id)
	}

	async fn remove_container(&self, container_id: &str) -> Result<()> {
		let mut con = self.connection().await?;

		let removed: usize = con.del(container_key(container_id)).await?;
		if removed > 0 {
			debug!("Removed container {}", container_id);
		}

		Ok(())
	}

	async fn list_containers(&self, window: Window) -> Result<Page> {
		let mut con = self.connection().await?;

		// The native scan cursor is a resumable token, not an integer offset,
		// so the scan is materialized before the window is applied. SCAN may
		// also repeat keys across cursor steps; sorting and deduplicating
		// yields the stable total ordering the pagination contract requires.
		let mut container_ids = Vec::new();
		{
			let mut keys: AsyncIter<String> =
				con.scan_match(format!("{}*", CONTAINER_KEY_PREFIX)).await?;
			while let Some(key) = keys.next_item().await {
				if let Some(container_id) = key.strip_prefix(CONTAINER_KEY_PREFIX) {
					container_ids.push(container_id.to_string());
				}
			}
		}
		container_ids.sort();
		container_ids.dedup();

		let total = container_ids.len();

		Ok(Page::new(window.slice(&container_ids).to_vec(), window, total))
	}

	async fn container_exists(&self, container_id: &str) -> Result<bool> {
		let mut con = self.connection().await?;

		// Key presence alone; member count is irrelevant thanks to the
		// sentinel.
		Ok(con.exists(container_key(container_id)).await?)
	}

	async fn add_member(&self, container_id: &str, member_id: &str) -> Result<String> {
		let mut con = self.connection().await?;

		let len: usize =
			con.rpush_exists(container_key(container_id), member_id).await.map_err(|e| {
				error!("Failed to append member to container {}: {}", container_id, e);
				StorageError::Redis(e)
			})?;

		// RPUSHX replies 0 when the key does not exist and performs nothing.
		if len == 0 {
			return Err(StorageError::NotFound(container_id.to_string()));
		}

		debug!("Added member {} to container {}", member_id, container_id);

		Ok(member_id.to_string())
	}

	async fn remove_member(&self, container_id: &str, member_id: &str) -> Result<()> {
		if member_id == SENTINEL {
			// The sentinel is not a member; removing it would corrupt the
			// index shift for the rest of the container's lifetime.
			return Ok(());
		}

		let mut con = self.connection().await?;

		let removed: usize = con.lrem(container_key(container_id), 1, member_id).await?;
		if removed > 0 {
			debug!("Removed member {} from container {}", member_id, container_id);
		}

		Ok(())
	}

	async fn list_members(&self, container_id: &str, window: Window) -> Result<Page> {
		let mut con = self.connection().await?;
		let key = container_key(container_id);

		let exists: bool = con.exists(&key).await?;
		if !exists {
			return Err(StorageError::NotFound(container_id.to_string()));
		}

		let len: usize = con.llen(&key).await?;
		let total = len.saturating_sub(1);

		let (start, stop) = member_range(&window);
		let items: Vec<String> = con.lrange(&key, start, stop).await.map_err(|e| {
			error!("Failed to list members of container {}: {}", container_id, e);
			StorageError::Redis(e)
		})?;

		Ok(Page::new(items, window, total))
	}

	async fn member_exists(&self, container_id: &str, member_id: &str) -> Result<bool> {
		let mut con = self.connection().await?;
		let key = container_key(container_id);

		let exists: bool = con.exists(&key).await?;
		if !exists {
			return Err(StorageError::NotFound(container_id.to_string()));
		}

		if member_id == SENTINEL {
			return Ok(false);
		}

		let position: Option<u64> = con.lpos(&key, member_id, LposOptions::default()).await?;

		Ok(position.is_some())
	}
}
