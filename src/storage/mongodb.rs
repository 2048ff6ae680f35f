use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::{
	bson::{doc, oid::ObjectId},
	options::{ClientOptions, FindOptions},
	Client, Collection,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};

use crate::types::{Result, StorageError};

use super::{
	common::{Page, Window},
	StorageBackend,
};

/// Collection holding one document per container.
const COLLECTION: &str = "containers";

/// One container: the native primary key plus the embedded ordered member
/// array.
#[derive(Debug, Serialize, Deserialize)]
struct ContainerDoc {
	#[serde(rename = "_id")]
	id: ObjectId,
	members: Vec<String>,
}

/// Document-store backend over a MongoDB database.
///
/// Container identity is the document's `ObjectId` primary key, hex-encoded
/// at the contract surface. Member mutations are single atomic array updates
/// (`$push` / `$pull`) addressed by key, so concurrent writers to one
/// container cannot interleave partial updates.
///
/// Removal semantics deviation: `$pull` removes *every* occurrence of the
/// value, not just the first. This backend keeps the engine-native atomic
/// update rather than emulating first-occurrence removal with a non-atomic
/// read-modify-write; see `removes_every_occurrence_of_a_value` in the test
/// module.
pub struct MongoBackend {
	containers: Collection<ContainerDoc>,
}

impl MongoBackend {
	/// Connects to `connection_string` and uses `database`.
	pub async fn new(connection_string: &str, database: &str) -> Result<Self> {
		let options = ClientOptions::parse(connection_string).await.map_err(|e| {
			error!("Failed to parse MongoDB connection string: {}", e);
			StorageError::Mongo(e)
		})?;
		let client = Client::with_options(options)?;

		Ok(Self { containers: client.database(database).collection(COLLECTION) })
	}

	/// Connects from the `MONGO_*` environment variables, falling back to a
	/// local instance and a throwaway database name.
	#[instrument]
	pub async fn from_env() -> Result<Self> {
		let host = std::env::var("MONGO_HOST").unwrap_or_else(|_| "localhost".to_string());
		let port = std::env::var("MONGO_PORT").unwrap_or_else(|_| "27017".to_string());
		let database = std::env::var("MONGO_DB")
			.unwrap_or_else(|_| format!("tmp_{}", uuid::Uuid::new_v4().simple()));

		Self::new(&format!("mongodb://{}:{}", host, port), &database).await
	}
}

/// Decodes a contract-level identifier into the native key format.
///
/// A string that does not parse as an `ObjectId` cannot name any stored
/// container.
fn parse_id(container_id: &str) -> Result<ObjectId> {
	ObjectId::parse_str(container_id)
		.map_err(|_| StorageError::InvalidId(container_id.to_string()))
}

#[async_trait]
impl StorageBackend for MongoBackend {
	async fn mint_container(&self) -> Result<String> {
		let container = ContainerDoc { id: ObjectId::new(), members: Vec::new() };

		self.containers.insert_one(&container).await.map_err(|e| {
			error!("Failed to insert container document: {}", e);
			StorageError::Mongo(e)
		})?;

		debug!("Minted container {}", container.id.to_hex());

		Ok(container.id.to_hex())
	}

	async fn remove_container(&self, container_id: &str) -> Result<()> {
		// An undecodable identifier names nothing; deletion of nothing
		// succeeds.
		let Ok(id) = parse_id(container_id) else { return Ok(()) };

		let result = self.containers.delete_one(doc! { "_id": id }).await?;
		if result.deleted_count > 0 {
			debug!("Removed container {}", container_id);
		}

		Ok(())
	}

	async fn list_containers(&self, window: Window) -> Result<Page> {
		let total = self.containers.count_documents(doc! {}).await? as usize;

		// A zero limit means "no limit" to the engine, not "nothing".
		if window.limit() == 0 {
			return Ok(Page::new(Vec::new(), window, total));
		}

		// `_id` order is generation order, which gives the stable sort key
		// the windowing contract requires.
		let options = FindOptions::builder()
			.sort(doc! { "_id": 1 })
			.skip(window.offset() as u64)
			.limit(window.limit() as i64)
			.build();

		let mut cursor = self.containers.find(doc! {}).with_options(options).await?;

		let mut items = Vec::new();
		while let Some(container) = cursor.try_next().await.map_err(|e| {
			error!("Failed to iterate container documents: {}", e);
			StorageError::Mongo(e)
		})? {
			items.push(container.id.to_hex());
		}

		Ok(Page::new(items, window, total))
	}

	async fn container_exists(&self, container_id: &str) -> Result<bool> {
		let Ok(id) = parse_id(container_id) else { return Ok(false) };

		let count = self.containers.count_documents(doc! { "_id": id }).await?;

		Ok(count > 0)
	}

	async fn add_member(&self, container_id: &str, member_id: &str) -> Result<String> {
		let id = parse_id(container_id)?;

		let result = self
			.containers
			.update_one(doc! { "_id": id }, doc! { "$push": { "members": member_id } })
			.await
			.map_err(|e| {
				error!("Failed to append member to container {}: {}", container_id, e);
				StorageError::Mongo(e)
			})?;

		if result.matched_count == 0 {
			return Err(StorageError::NotFound(container_id.to_string()));
		}

		debug!("Added member {} to container {}", member_id, container_id);

		Ok(member_id.to_string())
	}

	async fn remove_member(&self, container_id: &str, member_id: &str) -> Result<()> {
		let Ok(id) = parse_id(container_id) else { return Ok(()) };

		let result = self
			.containers
			.update_one(doc! { "_id": id }, doc! { "$pull": { "members": member_id } })
			.await?;

		if result.modified_count > 0 {
			debug!("Removed member {} from container {}", member_id, container_id);
		}

		Ok(())
	}

	async fn list_members(&self, container_id: &str, window: Window) -> Result<Page> {
		let id = parse_id(container_id)?;

		let container = self
			.containers
			.find_one(doc! { "_id": id })
			.await?
			.ok_or_else(|| StorageError::NotFound(container_id.to_string()))?;

		Ok(Page::new(
			window.slice(&container.members).to_vec(),
			window,
			container.members.len(),
		))
	}

	async fn member_exists(&self, container_id: &str, member_id: &str) -> Result<bool> {
		let id = parse_id(container_id)?;

		let container = self
			.containers
			.find_one(doc! { "_id": id })
			.await?
			.ok_or_else(|| StorageError::NotFound(container_id.to_string()))?;

		Ok(container.members.iter().any(|m| m == member_id))
	}
}
