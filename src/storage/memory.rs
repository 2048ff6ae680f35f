//! In-memory reference backend.
//!
//! Holds every container in a single ordered map for the lifetime of the
//! process. No persistence; used for tests and zero-dependency deployments.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::types::{Result, StorageError};

use super::{
	common::{Page, Window},
	StorageBackend,
};

/// Reference implementation over an ordered in-process map.
///
/// Container listing order is lexicographic by identifier (the map's key
/// order), which satisfies the stable-ordering requirement; member order
/// within a container is insertion order. All access goes through one
/// [`RwLock`] so concurrent callers cannot interleave partial updates.
pub struct MemoryBackend {
	containers: RwLock<BTreeMap<String, Vec<String>>>,
}

impl MemoryBackend {
	pub fn new() -> Self {
		Self { containers: RwLock::new(BTreeMap::new()) }
	}
}

impl Default for MemoryBackend {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait]
impl StorageBackend for MemoryBackend {
	async fn mint_container(&self) -> Result<String> {
		let mut containers = self.containers.write().await;

		// 128-bit random tokens collide only in theory, but the contract
		// promises an identifier not currently in use.
		let container_id = loop {
			let candidate = Uuid::new_v4().simple().to_string();
			if !containers.contains_key(&candidate) {
				break candidate;
			}
		};

		containers.insert(container_id.clone(), Vec::new());
		debug!("Minted container {}", container_id);

		Ok(container_id)
	}

	async fn remove_container(&self, container_id: &str) -> Result<()> {
		let mut containers = self.containers.write().await;

		if containers.remove(container_id).is_some() {
			debug!("Removed container {}", container_id);
		}

		Ok(())
	}

	async fn list_containers(&self, window: Window) -> Result<Page> {
		let containers = self.containers.read().await;

		let items = containers
			.keys()
			.skip(window.offset())
			.take(window.limit())
			.cloned()
			.collect::<Vec<_>>();

		Ok(Page::new(items, window, containers.len()))
	}

	async fn container_exists(&self, container_id: &str) -> Result<bool> {
		Ok(self.containers.read().await.contains_key(container_id))
	}

	async fn add_member(&self, container_id: &str, member_id: &str) -> Result<String> {
		let mut containers = self.containers.write().await;

		let members = containers
			.get_mut(container_id)
			.ok_or_else(|| StorageError::NotFound(container_id.to_string()))?;
		members.push(member_id.to_string());

		debug!("Added member {} to container {}", member_id, container_id);

		Ok(member_id.to_string())
	}

	async fn remove_member(&self, container_id: &str, member_id: &str) -> Result<()> {
		let mut containers = self.containers.write().await;

		if let Some(members) = containers.get_mut(container_id) {
			// First occurrence only; duplicates keep their later positions.
			if let Some(position) = members.iter().position(|m| m == member_id) {
				members.remove(position);
				debug!("Removed member {} from container {}", member_id, container_id);
			}
		}

		Ok(())
	}

	async fn list_members(&self, container_id: &str, window: Window) -> Result<Page> {
		let containers = self.containers.read().await;

		let members = containers
			.get(container_id)
			.ok_or_else(|| StorageError::NotFound(container_id.to_string()))?;

		Ok(Page::new(window.slice(members).to_vec(), window, members.len()))
	}

	async fn member_exists(&self, container_id: &str, member_id: &str) -> Result<bool> {
		let containers = self.containers.read().await;

		let members = containers
			.get(container_id)
			.ok_or_else(|| StorageError::NotFound(container_id.to_string()))?;

		Ok(members.iter().any(|m| m == member_id))
	}
}
