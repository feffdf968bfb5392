//! Error types shared by the HTTP wrapper, service layer and commands.

use std::path::PathBuf;

use thiserror::Error;

/// Failure of a single API request.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// DNS, connection, TLS or timeout failure.
    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to parse response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Invalid endpoint \"{endpoint}\": {source}")]
    InvalidEndpoint {
        endpoint: String,
        #[source]
        source: url::ParseError,
    },

    #[error("API key contains characters that are not valid in an HTTP header")]
    InvalidApiKey,

    #[error("Failed to create HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl ApiError {
    /// HTTP status of the response, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Invalid user input detected before any request is made.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("Invalid JSON schema: expected a JSON object or array")]
    InvalidSchema,

    #[error("Failed to read schema file {}: {source}", path.display())]
    SchemaFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in schema file {}: expected a JSON object or array", path.display())]
    InvalidSchemaFile { path: PathBuf },

    #[error("Use either --schema or --schema-file, not both")]
    ConflictingSchemaSources,
}
