#[derive(Debug, thiserror::Error)]
pub enum PortalError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("unknown role: {0}")]
    UnknownRole(String),
    #[error("no route matches path: {0}")]
    UnknownRoute(String),

    #[error("failed to create store directory: {0}")]
    StoreDirCreation(std::io::Error),
    #[error("failed to read store file: {0}")]
    StoreRead(std::io::Error),
    #[error("failed to write store file: {0}")]
    StoreWrite(std::io::Error),
    #[error("store file is not a JSON object of strings: {0}")]
    StoreFormat(serde_json::Error),
    #[error("failed to serialize store: {0}")]
    Serialization(serde_json::Error),
    #[error("failed to serialize user profile: {0}")]
    ProfileSerialization(serde_json::Error),

    #[error("failed to read route table: {0}")]
    RouteTableRead(std::io::Error),
    #[error("route table schema mismatch at {path}: {message}")]
    RouteTableSchema { path: String, message: String },
    #[error("invalid route table: {0}")]
    RouteTableInvalid(String),
}

pub type PortalResult<T> = std::result::Result<T, PortalError>;
