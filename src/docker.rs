use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::request::Builder;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::{Request, Response};
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
#[cfg(unix)]
use hyperlocal::UnixConnector;
use serde::ser;
use serde::Serialize;
use tokio::time::timeout;

use std::env;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::errors::{DockerServerErrorMessage, Error};
use crate::uri::Uri;

/// The default `DOCKER_SOCKET` address that we will try to connect to.
pub const DEFAULT_SOCKET: &str = "unix:///run/docker.sock";

/// Default timeout for all requests is 2 minutes.
pub const DEFAULT_TIMEOUT: u64 = 120;

/// Default Client Version to communicate with the server.
pub const API_DEFAULT_VERSION: &ClientVersion = &ClientVersion {
    major_version: 1,
    minor_version: 41,
};

#[derive(Debug, Clone)]
pub(crate) enum ClientType {
    Unix,
    #[cfg(test)]
    Http,
}

/// Transport is the type representing the means of communication
/// with the Docker daemon.
///
/// Each transport usually encapsulate a hyper client
/// with various Connect traits fulfilled.
pub(crate) enum Transport {
    #[cfg(unix)]
    Unix {
        client: Client<UnixConnector, Full<Bytes>>,
    },
    #[cfg(test)]
    Mock {
        client: Client<yup_hyper_mock::HostToReplyConnector, Full<Bytes>>,
    },
}

impl fmt::Debug for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            #[cfg(unix)]
            Transport::Unix { .. } => write!(f, "Unix"),
            #[cfg(test)]
            Transport::Mock { .. } => write!(f, "Mock"),
        }
    }
}

/// Advisory version stub to use for communicating with the Server. The docker server will error if
/// a higher client version is used than is compatible with the server. Beware also, that the
/// docker server will return stubs for a higher version than the version set when communicating.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ClientVersion {
    /// The major version number.
    pub major_version: usize,
    /// The minor version number.
    pub minor_version: usize,
}

impl fmt::Display for ClientVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major_version, self.minor_version)
    }
}

// The docker daemon expects the filters parameter as a JSON document embedded in the query
pub(crate) fn serialize_as_json<T, S>(t: &T, s: S) -> Result<S::Ok, S::Error>
where
    T: Serialize,
    S: ser::Serializer,
{
    let json = serde_json::to_string(t).map_err(<S::Error as ser::Error>::custom)?;
    s.serialize_str(&json)
}

/// ---
/// Docker
///
/// The main interface for calling the Docker API. Construct a new Docker instance using
/// [connect_with_unix](Docker::connect_with_unix()) or
/// [connect_with_unix_defaults](Docker::connect_with_unix_defaults()).
///
/// The instance issues one request per call and keeps no connection alive between calls.
#[derive(Debug, Clone)]
pub struct Docker {
    pub(crate) transport: Arc<Transport>,
    pub(crate) client_type: ClientType,
    pub(crate) client_addr: String,
    pub(crate) client_timeout: Duration,
    pub(crate) version: ClientVersion,
}

#[cfg(unix)]
/// A Docker implementation typed to connect to a Unix socket.
impl Docker {
    /// Connect using a Unix socket with defaults that are signalled by environment variables.
    ///
    /// # Defaults
    ///
    ///  - The socket location defaults to the value of the `DOCKER_HOST` environment variable
    ///    when it is a `unix://` address, otherwise `/run/docker.sock`.
    ///  - The request timeout defaults to 2 minutes.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use container_activity::Docker;
    ///
    /// let connection = Docker::connect_with_unix_defaults().unwrap();
    /// ```
    pub fn connect_with_unix_defaults() -> Result<Docker, Error> {
        let socket_path = env::var("DOCKER_HOST").ok().and_then(|p| {
            if p.starts_with("unix://") {
                Some(p)
            } else {
                None
            }
        });

        let path = socket_path.as_deref();
        let path_ref: &str = path.unwrap_or(DEFAULT_SOCKET);

        Docker::connect_with_unix(path_ref, DEFAULT_TIMEOUT, API_DEFAULT_VERSION)
    }

    /// Connect using a Unix socket.
    ///
    /// # Arguments
    ///
    ///  - `path`: connection unix socket path, with or without a `unix://` prefix.
    ///  - `timeout`: the read/write timeout (seconds) to use for every hyper connection
    ///  - `client_version`: the client version to communicate with the server.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use container_activity::{API_DEFAULT_VERSION, Docker};
    ///
    /// let connection = Docker::connect_with_unix(
    ///     "/run/docker.sock", 120, API_DEFAULT_VERSION).unwrap();
    /// ```
    pub fn connect_with_unix(
        path: &str,
        timeout: u64,
        client_version: &ClientVersion,
    ) -> Result<Docker, Error> {
        let client_addr = path.replacen("unix://", "", 1);

        let unix_connector = UnixConnector;

        let mut client_builder = Client::builder(TokioExecutor::new());
        client_builder.pool_max_idle_per_host(0);

        let client = client_builder.build(unix_connector);
        let transport = Transport::Unix { client };
        let docker = Docker {
            transport: Arc::new(transport),
            client_type: ClientType::Unix,
            client_addr,
            client_timeout: Duration::from_secs(timeout),
            version: *client_version,
        };

        Ok(docker)
    }
}

#[cfg(test)]
impl Docker {
    /// Connect using the `HostToReplyConnector`. This connector is used for testing the
    /// response handling without a running daemon.
    pub(crate) fn connect_with_mock(
        connector: yup_hyper_mock::HostToReplyConnector,
        client_addr: String,
        timeout: u64,
        client_version: &ClientVersion,
    ) -> Result<Docker, Error> {
        let client_builder = Client::builder(TokioExecutor::new());
        let client = client_builder.build(connector);

        let docker = Docker {
            transport: Arc::new(Transport::Mock { client }),
            client_type: ClientType::Http,
            client_addr,
            client_timeout: Duration::from_secs(timeout),
            version: *client_version,
        };

        Ok(docker)
    }
}

impl Docker {
    /// Set the request timeout.
    ///
    /// This timeout bounds the whole exchange: connecting, writing the request and reading the
    /// complete response body.
    ///
    /// Default is 2 minutes.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client_timeout = timeout;
        self
    }

    /// Get the current timeout.
    pub fn timeout(&self) -> Duration {
        self.client_timeout
    }

    /// Return the currently set client version.
    pub fn client_version(&self) -> ClientVersion {
        self.version
    }

    pub(crate) fn build_request<O>(
        &self,
        path: &str,
        builder: Builder,
        query: Option<O>,
        payload: Result<Full<Bytes>, Error>,
    ) -> Result<Request<Full<Bytes>>, Error>
    where
        O: Serialize,
    {
        let uri = Uri::parse(
            &self.client_addr,
            &self.client_type,
            path,
            query,
            &self.version,
        )?;
        let request_uri: hyper::Uri = uri.try_into().map_err(http::Error::from)?;
        debug!("{}", &request_uri);

        Ok(builder
            .uri(request_uri)
            .header(CONTENT_TYPE, "application/json")
            .body(payload?)?)
    }

    pub(crate) async fn process_into_body(
        &self,
        req: Result<Request<Full<Bytes>>, Error>,
    ) -> Result<Bytes, Error> {
        let client_timeout = self.timeout();

        match timeout(client_timeout, self.process_request(req)).await {
            Ok(res) => res,
            Err(_) => {
                debug!("Request exceeded the {:?} client timeout", self.client_timeout);
                Err(Error::RequestTimeoutError)
            }
        }
    }

    async fn process_request(
        &self,
        req: Result<Request<Full<Bytes>>, Error>,
    ) -> Result<Bytes, Error> {
        let request = req?;

        self.check_socket()?;

        let response = self.execute_request(request).await?;

        let status = response.status();
        debug!("Response status: {}", status);

        if status.is_success() {
            let body = Docker::decode_into_bytes(response).await?;
            debug!("Read {} bytes of response body", body.len());
            Ok(body)
        } else {
            let contents = Docker::decode_into_string(response).await?;

            let mut message = String::new();
            if !contents.is_empty() {
                message = serde_json::from_str::<DockerServerErrorMessage>(&contents)
                    .map(|msg| msg.message)
                    .unwrap_or(contents);
            }
            Err(Error::DockerResponseServerError {
                status_code: status.as_u16(),
                message,
            })
        }
    }

    fn check_socket(&self) -> Result<(), Error> {
        match self.client_type {
            ClientType::Unix if !Path::new(&self.client_addr).exists() => {
                Err(Error::SocketNotFoundError(self.client_addr.clone()))
            }
            _ => Ok(()),
        }
    }

    async fn execute_request(
        &self,
        req: Request<Full<Bytes>>,
    ) -> Result<Response<Incoming>, Error> {
        let response = match *self.transport {
            #[cfg(unix)]
            Transport::Unix { ref client } => client.request(req).await?,
            #[cfg(test)]
            Transport::Mock { ref client } => client.request(req).await?,
        };

        Ok(response)
    }

    async fn decode_into_bytes(response: Response<Incoming>) -> Result<Bytes, Error> {
        Ok(response.into_body().collect().await?.to_bytes())
    }

    async fn decode_into_string(response: Response<Incoming>) -> Result<String, Error> {
        let body = Docker::decode_into_bytes(response).await?;

        Ok(String::from_utf8_lossy(&body).to_string())
    }
}
