pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
	/// Caller-supplied data is structurally invalid; never silently coerced.
	#[error("Invalid page value {value:?}; page must be an integer.")]
	InvalidPage { value: String },
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Not found: {message}")]
	NotFound { message: String },
	/// The field configuration and the query built from it have diverged.
	/// Not recoverable by returning partial data.
	#[error("Configuration integrity violation: {message}")]
	ConfigIntegrity { message: String },
	#[error("Engine error: {message}")]
	Engine { message: String },
	#[error("Metadata error: {message}")]
	Metadata { message: String },
	#[error("Provider error: {message}")]
	Provider { message: String },
}

impl From<espial_engine::Error> for ServiceError {
	fn from(err: espial_engine::Error) -> Self {
		Self::Engine { message: err.to_string() }
	}
}

impl From<espial_metadata::Error> for ServiceError {
	fn from(err: espial_metadata::Error) -> Self {
		Self::Metadata { message: err.to_string() }
	}
}

impl From<color_eyre::Report> for ServiceError {
	fn from(err: color_eyre::Report) -> Self {
		Self::Provider { message: err.to_string() }
	}
}
