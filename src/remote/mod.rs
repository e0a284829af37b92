//! Remote command execution. The core only needs the literal stdout of a
//! scheduler CLI command.

mod local;
mod ssh;

use async_trait::async_trait;

use crate::config::{ConnectionConfig, ConnectionMode};
use crate::error::Result;

pub use local::LocalRunner;
pub use ssh::SshRunner;

#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, command: &str) -> Result<String>;
}

pub fn runner_for(connection: &ConnectionConfig) -> Box<dyn CommandRunner> {
    match connection.mode {
        ConnectionMode::Ssh => Box::new(SshRunner::from_config(connection)),
        ConnectionMode::Local => Box::new(LocalRunner),
    }
}

#[async_trait]
impl<T: CommandRunner + ?Sized> CommandRunner for Box<T> {
    async fn run(&self, command: &str) -> Result<String> {
        (**self).run(command).await
    }
}

/// Turn a finished process into stdout text. `transport_status` is the exit code
/// the transport itself uses for its own failures (255 for OpenSSH).
fn collect_output(
    command: &str,
    output: std::process::Output,
    transport_status: Option<i32>,
) -> Result<String> {
    let code = output.status.code();
    if code.is_none() || (transport_status.is_some() && code == transport_status) {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(crate::error::Error::transport(
            command,
            format!("exited with {:?}: {}", code, stderr.trim()),
        ));
    }
    if !output.status.success() {
        // grep -v and friends exit non-zero on empty output; the text is still valid.
        tracing::debug!(command, code = ?code, "command exited non-zero");
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
