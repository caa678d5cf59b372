//! Process API: the processes running inside each running container.

use bytes::Bytes;
use http::request::Builder;
use http_body_util::Full;
use hyper::Method;
use serde::Serialize;

use super::Docker;
use crate::container::{ContainerSummary, ListContainersOptions};
use crate::errors::Error;
use crate::report::parse_container_list;

use std::io::{self, Write};

/// Name given to a container whose `Names` list is empty.
pub const UNKNOWN_NAME: &str = "unknown";

/// Column header written by [write_process_table].
pub const PROCESS_TABLE_HEADER: &str = "HOST_PID\tNAME\tCONTAINER_ID\tCONTAINER_NAME\tCONTAINER_IMAGE";

/// Parameters used in the [Top Processes API](Docker::top_processes_raw())
///
/// ## Examples
///
/// ```rust
/// use container_activity::process::TopOptions;
///
/// TopOptions{
///     ps_args: "aux",
/// };
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TopOptions<T>
where
    T: Into<String> + Serialize,
{
    /// The arguments to pass to `ps`. For example, `aux`
    pub ps_args: T,
}

/// Result of the Top Processes API: a `ps` table with its column titles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ContainerTop {
    /// The ps column titles
    #[serde(default)]
    pub titles: Vec<String>,
    /// Each process running in the container, each an array of values
    /// corresponding to the titles. The daemon sends `null` when there is none.
    #[serde(default)]
    pub processes: Option<Vec<Vec<String>>>,
}

impl ContainerTop {
    /// Position of the `title` column, if the table has one.
    pub fn column_index(&self, title: &str) -> Option<usize> {
        self.titles.iter().position(|t| t == title)
    }

    fn command_index(&self) -> Option<usize> {
        self.column_index("COMMAND")
            .or_else(|| self.column_index("CMD"))
    }
}

/// One process of one container, as listed by [Docker::container_processes].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessRow {
    /// Process id as seen from the host.
    pub host_pid: String,
    /// The `COMMAND` (or `CMD`) column of the `ps` table.
    pub name: String,
    /// Container id, truncated to the requested length.
    pub container_id: String,
    /// First container name without its leading `/`, or [UNKNOWN_NAME].
    pub container_name: String,
    /// Image reference the container was created from.
    pub container_image: String,
}

/// The name shown for a container in the process table.
pub fn container_name(container: &ContainerSummary) -> &str {
    match container.names.first() {
        Some(name) => name.strip_prefix('/').unwrap_or(name),
        None => UNKNOWN_NAME,
    }
}

/// Turn the `ps` table of `container` into rows.
///
/// Fails with [ProcessColumnsError](Error::ProcessColumnsError) when the table has no `PID`
/// column or neither a `COMMAND` nor a `CMD` column. Processes too short to reach both columns
/// are left out.
pub fn process_rows(
    container: &ContainerSummary,
    top: &ContainerTop,
    id_length: usize,
) -> Result<Vec<ProcessRow>, Error> {
    let (pid_index, cmd_index) = match (top.column_index("PID"), top.command_index()) {
        (Some(pid), Some(cmd)) => (pid, cmd),
        _ => {
            return Err(Error::ProcessColumnsError {
                container_id: container.id.clone(),
                titles: top.titles.clone(),
            })
        }
    };

    let container_id = container.id_prefix(id_length);
    let container_name = container_name(container);

    Ok(top
        .processes
        .iter()
        .flatten()
        .filter(|process| process.len() > pid_index && process.len() > cmd_index)
        .map(|process| ProcessRow {
            host_pid: process[pid_index].clone(),
            name: process[cmd_index].clone(),
            container_id: container_id.to_string(),
            container_name: container_name.to_string(),
            container_image: container.image.clone(),
        })
        .collect())
}

/// Write `rows` as a tab separated table under [PROCESS_TABLE_HEADER].
pub fn write_process_table<O: Write>(rows: &[ProcessRow], out: &mut O) -> io::Result<()> {
    writeln!(out, "{PROCESS_TABLE_HEADER}")?;
    for row in rows {
        writeln!(
            out,
            "{}\t{}\t{}\t{}\t{}",
            row.host_pid, row.name, row.container_id, row.container_name, row.container_image
        )?;
    }
    Ok(())
}

impl Docker {
    /// ---
    ///
    /// # Top Processes
    ///
    /// List processes running inside a container, returning the undecoded body.
    ///
    /// # Arguments
    ///
    ///  - Container name or id as a string slice.
    ///  - Optional [Top Options](TopOptions) struct.
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
    /// use container_activity::process::TopOptions;
    ///
    /// let options = Some(TopOptions{
    ///     ps_args: "aux",
    /// });
    ///
    /// docker.top_processes_raw("fussybeaver", options);
    /// ```
    pub async fn top_processes_raw<T>(
        &self,
        container_name: &str,
        options: Option<TopOptions<T>>,
    ) -> Result<Bytes, Error>
    where
        T: Into<String> + Serialize,
    {
        let url = format!("/containers/{container_name}/top");

        let req = self.build_request(
            &url,
            Builder::new().method(Method::GET),
            options,
            Ok(Full::new(Bytes::new())),
        );

        self.process_into_body(req).await
    }

    /// ---
    ///
    /// # Container Processes
    ///
    /// List the processes of every running container, one request per container.
    ///
    /// The container listing itself must succeed. A container whose entry is malformed, whose
    /// `ps` table cannot be fetched or decoded, or whose table lacks the `PID` and
    /// `COMMAND`/`CMD` columns is left out with a warning. Containers keep the order of the
    /// listing.
    ///
    /// # Arguments
    ///
    ///  - Number of characters of the container id kept in each row.
    pub async fn container_processes(&self, id_length: usize) -> Result<Vec<ProcessRow>, Error> {
        let body = self
            .list_containers_raw(Some(ListContainersOptions::<String>::running()))
            .await?;

        let mut rows = Vec::new();
        for (index, element) in parse_container_list(&body)?.iter().enumerate() {
            let container = match ContainerSummary::decode(index, element) {
                Ok(container) => container,
                Err(e) => {
                    warn!("{}", e);
                    continue;
                }
            };

            let top = match self
                .top_processes_raw(&container.id, None::<TopOptions<String>>)
                .await
                .and_then(|body| Ok(serde_json::from_slice::<ContainerTop>(&body)?))
            {
                Ok(top) => top,
                Err(e) => {
                    warn!("Error getting processes for container {}: {}", container.id, e);
                    continue;
                }
            };

            match process_rows(&container, &top, id_length) {
                Ok(container_rows) => rows.extend(container_rows),
                Err(e) => warn!("{}", e),
            }
        }

        Ok(rows)
    }
}
