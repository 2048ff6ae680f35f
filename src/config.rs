//! Startup configuration surface.
//!
//! A deployment selects one backend and constructs it exactly once; the
//! resulting [`StorageBackend`](crate::StorageBackend) trait object is passed
//! into whatever layer consumes it. There is no process-global backend
//! handle, and no runtime re-selection.

use clap::{builder::PossibleValue, ValueEnum};

use crate::{
	storage::{common::DEFAULT_PAGE_LIMIT, memory::MemoryBackend, StorageBackend},
	types::{Result, StorageError},
};

/// The storage engines a deployment can select.
#[derive(PartialEq, Eq, Clone, Debug, Copy)]
pub enum BackendKind {
	/// In-process map; no persistence, no external service.
	Ram,
	/// Document store; requires the `mongodb` feature.
	Mongodb,
	/// List store; requires the `redis` feature.
	Redis,
}

/// Clap value enum implementation for argument parsing.
impl ValueEnum for BackendKind {
	fn value_variants<'a>() -> &'a [Self] {
		&[Self::Ram, Self::Mongodb, Self::Redis]
	}

	fn to_possible_value(&self) -> Option<PossibleValue> {
		Some(PossibleValue::new(self.name()))
	}
}

impl BackendKind {
	/// Get the selector name.
	pub fn name(&self) -> &'static str {
		match self {
			Self::Ram => "ram",
			Self::Mongodb => "mongodb",
			Self::Redis => "redis",
		}
	}

	/// Parses a selector value, case-insensitively.
	pub fn parse(raw: &str) -> Result<Self> {
		<Self as ValueEnum>::from_str(raw, true)
			.map_err(|_| StorageError::Misconfigured(format!("unknown storage backend: {}", raw)))
	}
}

/// Configuration accepted by the core, resolved before any request is served.
#[derive(Debug, Clone, Copy)]
pub struct StorageConfig {
	/// Which engine backs the contract.
	pub backend: BackendKind,
	/// Server-enforced cap on listing windows; requests above it are capped,
	/// not rejected.
	pub max_page_limit: usize,
}

impl StorageConfig {
	/// Reads `STORAGE_BACKEND` (default `ram`) and `MAX_PAGE_LIMIT` (default
	/// 1000).
	///
	/// An unrecognized selector fails here, at startup, rather than on every
	/// request.
	pub fn from_env() -> Result<Self> {
		let backend = match std::env::var("STORAGE_BACKEND") {
			Ok(raw) => BackendKind::parse(&raw)?,
			Err(_) => BackendKind::Ram,
		};

		let max_page_limit = std::env::var("MAX_PAGE_LIMIT")
			.ok()
			.and_then(|raw| raw.parse().ok())
			.unwrap_or(DEFAULT_PAGE_LIMIT);

		Ok(Self { backend, max_page_limit })
	}
}

impl Default for StorageConfig {
	fn default() -> Self {
		Self { backend: BackendKind::Ram, max_page_limit: DEFAULT_PAGE_LIMIT }
	}
}

/// Constructs the configured backend.
///
/// Selecting an engine whose feature was not compiled in is a
/// [`Misconfigured`](StorageError::Misconfigured) error, surfaced at startup
/// so the deployment aborts instead of failing every request.
pub async fn open_backend(config: &StorageConfig) -> Result<Box<dyn StorageBackend>> {
	match config.backend {
		BackendKind::Ram => Ok(Box::new(MemoryBackend::new())),
		#[cfg(feature = "mongodb")]
		BackendKind::Mongodb =>
			Ok(Box::new(crate::storage::mongodb::MongoBackend::from_env().await?)),
		#[cfg(not(feature = "mongodb"))]
		BackendKind::Mongodb => Err(StorageError::Misconfigured(
			"backend \"mongodb\" requires building with the `mongodb` feature".to_string(),
		)),
		#[cfg(feature = "redis")]
		BackendKind::Redis => Ok(Box::new(crate::storage::redis::RedisBackend::from_env()?)),
		#[cfg(not(feature = "redis"))]
		BackendKind::Redis => Err(StorageError::Misconfigured(
			"backend \"redis\" requires building with the `redis` feature".to_string(),
		)),
	}
}
