//! Container API: list the containers known to the docker daemon.

use bytes::Bytes;
use http::request::Builder;
use http_body_util::Full;
use hyper::Method;
use serde::Serialize;
use serde_json::Value;

use super::Docker;
use crate::errors::Error;

use std::collections::HashMap;
use std::hash::Hash;

/// Number of characters of the container id shown in listings.
pub const SHORT_ID_LEN: usize = 12;

/// Parameters used in the [List Container API](Docker::list_containers_raw())
///
/// ## Examples
///
/// ```rust
/// use container_activity::container::ListContainersOptions;
///
/// use std::collections::HashMap;
/// use std::default::Default;
///
/// let mut filters = HashMap::new();
/// filters.insert("health", vec!["unhealthy"]);
///
/// ListContainersOptions{
///     all: true,
///     filters,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ListContainersOptions<T>
where
    T: Into<String> + Eq + Hash + Serialize,
{
    /// Return all containers. By default, only running containers are shown
    pub all: bool,
    /// Return this number of most recently created containers, including non-running ones
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<isize>,
    /// Return the size of container as fields `SizeRw` and `SizeRootFs`
    pub size: bool,
    /// Filters to process on the container list, encoded as JSON. Available filters include
    ///  - `ancestor`=`(<image-name>[:<tag>]`, `<image id>`, or `<image@digest>`)
    ///  - `exited=<int>` containers with exit code of `<int>`
    ///  - `label=key` or `label="key=value"` of a container label
    ///  - `name=<name>` a container's name
    ///  - `status=`(`created`|`restarting`|`running`|`removing`|`paused`|`exited`|`dead`)
    #[serde(serialize_with = "crate::docker::serialize_as_json")]
    pub filters: HashMap<T, Vec<T>>,
}

impl<T> ListContainersOptions<T>
where
    T: Into<String> + Eq + Hash + Serialize + From<&'static str>,
{
    /// Options restricting the listing to containers whose status is `running`.
    pub fn running() -> Self {
        let mut filters = HashMap::new();
        filters.insert(T::from("status"), vec![T::from("running")]);
        ListContainersOptions {
            all: false,
            limit: None,
            size: false,
            filters,
        }
    }
}

/// One element of the List Containers response, reduced to the fields shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ContainerSummary {
    /// Identifier assigned by the daemon, usually 64 hex characters.
    pub id: String,
    /// Names of the container, each conventionally starting with a `/`.
    pub names: Vec<String>,
    /// Image reference the container was created from.
    pub image: String,
}

impl ContainerSummary {
    /// Extract a summary from the `index`-th element of a List Containers response.
    ///
    /// Missing or mistyped `Id`, `Names` or `Image` fields, and an empty `Names` list, yield an
    /// [ContainerFieldError](Error::ContainerFieldError).
    pub fn from_value(index: usize, value: &Value) -> Result<ContainerSummary, Error> {
        let summary = ContainerSummary::decode(index, value)?;

        if summary.names.is_empty() {
            return Err(Error::ContainerFieldError {
                index,
                message: String::from("`Names` is empty"),
            });
        }

        Ok(summary)
    }

    /// Like [from_value](ContainerSummary::from_value), but an empty `Names` list is accepted.
    pub(crate) fn decode(index: usize, value: &Value) -> Result<ContainerSummary, Error> {
        <ContainerSummary as serde::Deserialize>::deserialize(value).map_err(|e| {
            Error::ContainerFieldError {
                index,
                message: e.to_string(),
            }
        })
    }

    /// The first [SHORT_ID_LEN] characters of the id, or the whole id when shorter.
    pub fn short_id(&self) -> &str {
        self.id_prefix(SHORT_ID_LEN)
    }

    /// The first `len` characters of the id, or the whole id when shorter.
    pub fn id_prefix(&self, len: usize) -> &str {
        match self.id.char_indices().nth(len) {
            Some((end, _)) => &self.id[..end],
            None => &self.id,
        }
    }

    /// The first name with its leading separator character dropped.
    pub fn display_name(&self) -> &str {
        let name = self.names.first().map(String::as_str).unwrap_or_default();
        let mut chars = name.chars();
        chars.next();
        chars.as_str()
    }
}

impl Docker {
    /// ---
    ///
    /// # List Containers
    ///
    /// Returns the undecoded body of the List Containers endpoint, so that callers can tell a
    /// malformed response apart from an empty one.
    ///
    /// # Arguments
    ///
    ///  - Optional [ListContainersOptions](ListContainersOptions) struct.
    ///
    /// # Returns
    ///
    ///  - The raw response body, wrapped in a Future.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// # use container_activity::Docker;
    /// # let docker = Docker::connect_with_unix_defaults().unwrap();
    /// use container_activity::container::ListContainersOptions;
    ///
    /// let options = Some(ListContainersOptions::<String>::running());
    ///
    /// docker.list_containers_raw(options);
    /// ```
    pub async fn list_containers_raw<T>(
        &self,
        options: Option<ListContainersOptions<T>>,
    ) -> Result<Bytes, Error>
    where
        T: Into<String> + Eq + Hash + Serialize,
    {
        let url = "/containers/json";

        let req = self.build_request(
            url,
            Builder::new().method(Method::GET),
            options,
            Ok(Full::new(Bytes::new())),
        );

        self.process_into_body(req).await
    }

    /// ---
    ///
    /// # List Running Containers
    ///
    /// Shorthand for [list_containers_raw](Docker::list_containers_raw()) with a
    /// `{"status":["running"]}` filter.
    pub async fn list_running_containers_raw(&self) -> Result<Bytes, Error> {
        self.list_containers_raw(Some(ListContainersOptions::<String>::running()))
            .await
    }
}
