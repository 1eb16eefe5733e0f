pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Engine request failed.")]
	Transport(#[from] reqwest::Error),
	#[error("Engine returned status {status}.")]
	Status { status: u16 },
	#[error("Engine response could not be decoded: {message}")]
	Decode { message: String },
}
