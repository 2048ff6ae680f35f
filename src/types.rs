/// Result type returned by every storage operation.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Failure conditions surfaced by storage backends.
///
/// Backends signal failures as typed conditions and never render, log at the
/// protocol level, or abort the process; translating these into responses is
/// the consuming layer's job.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
	/// The container (or, for member operations, the container scoping the
	/// member) does not exist where existence was required.
	#[error("container not found: {0}")]
	NotFound(String),
	/// The identifier cannot be decoded into the active backend's native key
	/// format, so it cannot refer to any stored container.
	#[error("invalid container identifier: {0}")]
	InvalidId(String),
	/// No usable backend was configured. Detectable at startup; every request
	/// would fail until the configuration is fixed.
	#[error("storage misconfigured: {0}")]
	Misconfigured(String),
	#[cfg(feature = "redis")]
	#[error("redis error: {0}")]
	Redis(#[from] redis::RedisError),
	#[cfg(feature = "mongodb")]
	#[error("mongodb error: {0}")]
	Mongo(#[from] mongodb::error::Error),
}

impl StorageError {
	/// Whether a caller should treat this condition as an absent target.
	///
	/// An identifier the active backend cannot even decode refers to nothing,
	/// so [`StorageError::InvalidId`] and [`StorageError::NotFound`] are
	/// indistinguishable from the caller's perspective.
	pub fn is_not_found(&self) -> bool {
		matches!(self, Self::NotFound(_) | Self::InvalidId(_))
	}
}
