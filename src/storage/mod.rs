//! Storage backend contract and its implementations.
//!
//! A [`StorageBackend`] tracks an arbitrary number of containers, each holding
//! an ordered sequence of opaque member identifiers. The three provided
//! implementations sit on very different primitives — an in-process ordered
//! map, MongoDB documents with embedded arrays, Redis lists behind a sentinel
//! element — but are behaviorally identical at this interface, including the
//! pagination semantics defined in [`common`].

use async_trait::async_trait;

use crate::types::Result;

pub mod common;
pub mod memory;
#[cfg(feature = "mongodb")]
pub mod mongodb;
#[cfg(feature = "redis")]
pub mod redis;

use common::{Page, Window};

/// Contract every storage engine must satisfy.
///
/// # Usage
///
/// Implementations provide the storage and retrieval mechanics for a specific
/// engine; callers hold a `Box<dyn StorageBackend>` selected once at startup
/// (see [`crate::config::open_backend`]) and never branch on the concrete
/// type afterwards.
///
/// # Contract notes
///
/// - A container's existence is independent of its member count: an empty
///   container is a valid, distinct state from a missing one.
/// - `remove_container` and `remove_member` are idempotent and never report
///   [`NotFound`](crate::StorageError::NotFound); deletion is not an
///   existence assertion.
/// - `add_member`, `list_members` and `member_exists` require the container
///   to exist and fail with [`NotFound`](crate::StorageError::NotFound)
///   otherwise — silently creating containers on member operations would
///   violate the mint/remove lifecycle.
/// - Member identifiers are opaque caller-supplied strings. Duplicates may
///   coexist within one container, each occupying its own position.
#[async_trait]
pub trait StorageBackend: Send + Sync {
	/// Creates a new, empty container and returns its identifier.
	///
	/// The identifier is generated by the backend and is not currently in use.
	async fn mint_container(&self) -> Result<String>;

	/// Deletes the container and all of its members.
	///
	/// Idempotent: removing an identifier that does not exist succeeds
	/// silently.
	async fn remove_container(&self, container_id: &str) -> Result<()>;

	/// Returns a stable-ordered window of existing container identifiers and
	/// the total number of existing containers.
	async fn list_containers(&self, window: Window) -> Result<Page>;

	async fn container_exists(&self, container_id: &str) -> Result<bool>;

	/// Appends `member_id` to the end of the container's member sequence and
	/// returns it.
	async fn add_member(&self, container_id: &str, member_id: &str) -> Result<String>;

	/// Removes the first occurrence of `member_id` from the container's
	/// sequence.
	///
	/// Idempotent: a no-op when the member or the container is absent.
	async fn remove_member(&self, container_id: &str, member_id: &str) -> Result<()>;

	/// Returns a window of the container's member sequence, in insertion
	/// order, and the total member count.
	async fn list_members(&self, container_id: &str, window: Window) -> Result<Page>;

	async fn member_exists(&self, container_id: &str, member_id: &str) -> Result<bool>;

	/// Mints `count` containers, returning their identifiers in mint order.
	///
	/// Provided in terms of [`mint_container`](Self::mint_container);
	/// backends may override with a bulk-native implementation as long as the
	/// observable per-element ordering and error behavior are preserved. A
	/// failure part-way through surfaces immediately; containers minted
	/// before it are not rolled back.
	async fn mint_containers(&self, count: usize) -> Result<Vec<String>> {
		let mut minted = Vec::with_capacity(count);
		for _ in 0..count {
			minted.push(self.mint_container().await?);
		}
		Ok(minted)
	}

	/// Removes each container in order. Idempotent per element.
	async fn remove_containers(&self, container_ids: &[String]) -> Result<()> {
		for container_id in container_ids {
			self.remove_container(container_id).await?;
		}
		Ok(())
	}

	/// Appends each member in order, returning the appended identifiers.
	///
	/// A failure (e.g. the container disappearing mid-batch) surfaces
	/// immediately; members appended before it remain.
	async fn add_members(&self, container_id: &str, member_ids: &[String]) -> Result<Vec<String>> {
		let mut added = Vec::with_capacity(member_ids.len());
		for member_id in member_ids {
			added.push(self.add_member(container_id, member_id).await?);
		}
		Ok(added)
	}

	/// Removes the first occurrence of each member in order. Idempotent per
	/// element.
	async fn remove_members(&self, container_id: &str, member_ids: &[String]) -> Result<()> {
		for member_id in member_ids {
			self.remove_member(container_id, member_id).await?;
		}
		Ok(())
	}
}
