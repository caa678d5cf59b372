//! # container-activity: list running docker containers over the daemon's unix socket
//!
//! The crate issues a single `GET /containers/json` request, filtered to running containers,
//! against the Docker daemon's unix socket and renders the answer as a short listing of
//! container id, name and image.
//!
//! The request is built on [Hyper](https://github.com/hyperium/hyper) and
//! [hyperlocal](https://github.com/softprops/hyperlocal), driven by a
//! [Tokio](https://github.com/tokio-rs/tokio) runtime.
//!
//! # Usage
//!
//! ## Connecting with the docker daemon
//!
//! The client connects to the standard unix socket location `/run/docker.sock`, or to the
//! `unix://` address in the `DOCKER_HOST` environment variable. Use the
//! `Docker::connect_with_unix` method API to parameterise the interface.
//!
//! ```rust
//! use container_activity::Docker;
//! #[cfg(unix)]
//! Docker::connect_with_unix_defaults();
//! ```
//!
//! ## Listing running containers
//!
//! The transport returns the raw body so that [report::render] can distinguish an
//! unreachable daemon, an unparseable body, an error payload and an empty listing.
//!
//! ```rust,no_run
//! use container_activity::report::render;
//! use container_activity::Docker;
//!
//! # async fn run() -> std::io::Result<()> {
//! let docker = Docker::connect_with_unix_defaults().unwrap();
//! let outcome = docker.list_running_containers_raw().await;
//!
//! render(outcome, &mut std::io::stdout(), &mut std::io::stderr())?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Listing container processes
//!
//! [Docker::container_processes] asks each running container for its `ps` table and
//! flattens the answers into [process::ProcessRow]s.
#![deny(
    missing_docs,
    missing_debug_implementations,
    missing_copy_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unstable_features,
    unused_import_braces,
    unused_qualifications
)]
#![warn(rust_2018_idioms)]

#[macro_use]
extern crate serde_derive;
#[macro_use]
extern crate log;

// declare modules
pub mod container;
mod docker;
pub mod errors;
pub mod process;
pub mod report;
mod uri;

// publicly re-export
pub use crate::docker::{
    ClientVersion, Docker, API_DEFAULT_VERSION, DEFAULT_SOCKET, DEFAULT_TIMEOUT,
};
