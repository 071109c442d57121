pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("All retrieval channels degraded: {message}")]
	AllChannelsDegraded { message: String },
	#[error("Provider error: {message}")]
	Provider { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
	#[error("Search index error: {message}")]
	Index { message: String },
}
impl From<sqlx::Error> for Error {
	fn from(err: sqlx::Error) -> Self {
		Self::Storage { message: err.to_string() }
	}
}

impl From<color_eyre::Report> for Error {
	fn from(err: color_eyre::Report) -> Self {
		Self::Provider { message: err.to_string() }
	}
}

impl From<vitae_storage::Error> for Error {
	fn from(err: vitae_storage::Error) -> Self {
		match err {
			vitae_storage::Error::Sqlx(inner) => Self::Storage { message: inner.to_string() },
			vitae_storage::Error::InvalidArgument(message) => Self::InvalidRequest { message },
			vitae_storage::Error::NotFound(message) => Self::Storage { message },
			vitae_storage::Error::Index(message) => Self::Index { message },
			vitae_storage::Error::Http(inner) => Self::Index { message: inner.to_string() },
		}
	}
}
