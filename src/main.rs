//! Print the running containers of the local docker daemon.
//!
//! Failures are reported on stderr; the exit status is always zero.

use container_activity::errors::Error;
use container_activity::report::{self, Report};
use container_activity::Docker;

use std::io::{self, Write};

use tokio::runtime::Builder;

const BANNER: &str = "Docker Container Activity";

fn main() {
    env_logger::init();

    let stdout = io::stdout();
    let stderr = io::stderr();
    let (mut out, mut err) = (stdout.lock(), stderr.lock());

    if let Err(e) = app(&mut out, &mut err, |out, err| {
        run(Docker::connect_with_unix_defaults, out, err)
    }) {
        // the console itself is gone
        log::debug!("{}", e);
    }
}

/// Print the banner, then `run`; a failure escaping `run` is reported on `err`.
fn app<O, E, F>(out: &mut O, err: &mut E, run: F) -> io::Result<()>
where
    O: Write,
    E: Write,
    F: FnOnce(&mut O, &mut E) -> Result<Report, Error>,
{
    writeln!(out, "{BANNER}")?;

    match run(out, err) {
        Ok(report) => log::debug!("{:?}", report),
        Err(e) => writeln!(err, "An error occurred: {e}")?,
    }

    Ok(())
}

fn run<C, O, E>(connect: C, out: &mut O, err: &mut E) -> Result<Report, Error>
where
    C: FnOnce() -> Result<Docker, Error>,
    O: Write,
    E: Write,
{
    let rt = Builder::new_current_thread().enable_all().build()?;

    let docker = connect()?;
    let outcome = rt.block_on(docker.list_running_containers_raw());

    Ok(report::render(outcome, out, err)?)
}
