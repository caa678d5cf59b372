//! Errors for this module.

/// The type of error embedded in an Error.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Error emitted when the unix socket of the docker daemon does not exist.
    #[error("Socket not found: {0}")]
    SocketNotFoundError(String),
    /// Error emitted when the daemon responds with a non-OK status code.
    #[error("Docker responded with status code {status_code}: {message}")]
    DockerResponseServerError {
        /// Status code returned by the docker daemon.
        status_code: u16,
        /// Message returned by the docker daemon.
        message: String,
    },
    /// Error emitted when the request or response exceeds the client timeout.
    #[error("Timeout error")]
    RequestTimeoutError,
    /// Error emitted when the response body is not valid JSON.
    #[error("Failed to parse JSON: {err}")]
    JsonParseError {
        /// The original serde error.
        #[from]
        err: serde_json::Error,
    },
    /// Error emitted when the response is valid JSON but not the expected array of containers.
    #[error("Expected a JSON array of containers, found {found}")]
    JsonShapeError {
        /// The kind of JSON value that was received instead.
        found: &'static str,
    },
    /// Error emitted when a container entry lacks a field or has the wrong type for it.
    #[error("Container entry {index} is malformed: {message}")]
    ContainerFieldError {
        /// Position of the entry in the response array.
        index: usize,
        /// Description of the missing or mistyped field.
        message: String,
    },
    /// Error emitted when a container's `ps` table lacks the `PID` or `COMMAND`/`CMD` column.
    #[error("Could not find PID or COMMAND/CMD columns for container {container_id}. Titles: {titles:?}")]
    ProcessColumnsError {
        /// Id of the container whose processes were requested.
        container_id: String,
        /// Column titles the daemon sent instead.
        titles: Vec<String>,
    },
    /// Error emitted when the query parameters fail to encode.
    #[error(transparent)]
    URLEncodedError {
        /// The original error emitted by serde_urlencoded.
        #[from]
        err: serde_urlencoded::ser::Error,
    },
    /// Error emitted when the request URL fails to parse.
    #[error(transparent)]
    URLParseError {
        /// The original error emitted by the url crate.
        #[from]
        err: url::ParseError,
    },
    /// Error emitted by the http crate when assembling the request.
    #[error(transparent)]
    HttpClientError {
        /// The original error emitted by the http crate.
        #[from]
        err: http::Error,
    },
    /// Error emitted while reading the response body.
    #[error("Error in the hyper response: {err}")]
    HyperResponseError {
        /// The original error emitted by hyper.
        #[from]
        err: hyper::Error,
    },
    /// Error emitted by the connection pool or connector of the client.
    #[error("Error in the hyper legacy client: {err}")]
    HyperLegacyError {
        /// The original error emitted by hyper-util.
        #[from]
        err: hyper_util::client::legacy::Error,
    },
    /// Generic I/O error.
    #[error(transparent)]
    IOError {
        /// The original I/O error.
        #[from]
        err: std::io::Error,
    },
}

impl Error {
    /// Whether this error happened while talking to the daemon, as opposed to while reading
    /// what it sent back.
    pub fn is_transport(&self) -> bool {
        !matches!(
            self,
            Error::JsonParseError { .. }
                | Error::JsonShapeError { .. }
                | Error::ContainerFieldError { .. }
                | Error::ProcessColumnsError { .. }
        )
    }
}

/// Error message payload returned by the daemon alongside non-OK status codes.
#[derive(Debug, Deserialize)]
pub(crate) struct DockerServerErrorMessage {
    pub(crate) message: String,
}
