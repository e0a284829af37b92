use async_trait::async_trait;
use tokio::process::Command;

use super::{CommandRunner, collect_output};
use crate::config::ConnectionConfig;
use crate::error::{Error, Result};

/// OpenSSH exits with 255 when the connection itself fails.
const SSH_TRANSPORT_STATUS: i32 = 255;

/// Runs commands on the cluster through the system `ssh` client, optionally hopping
/// through a gateway with `nc`. Authentication is left to the user's agent/keys.
#[derive(Debug, Clone)]
pub struct SshRunner {
    user: String,
    gateway: String,
    machine: String,
    port: u16,
}

impl SshRunner {
    pub fn from_config(connection: &ConnectionConfig) -> Self {
        SshRunner {
            user: connection.user.clone(),
            gateway: connection.gateway.clone(),
            machine: connection.machine.clone(),
            port: connection.port,
        }
    }

    fn destination(&self) -> String {
        if self.user.is_empty() {
            self.machine.clone()
        } else {
            format!("{}@{}", self.user, self.machine)
        }
    }

    pub(crate) fn args(&self, command: &str) -> Vec<String> {
        let mut args = vec![
            "-o".to_string(),
            "BatchMode=yes".to_string(),
            "-o".to_string(),
            "StrictHostKeyChecking=accept-new".to_string(),
            "-p".to_string(),
            self.port.to_string(),
        ];
        if !self.gateway.is_empty() {
            let jump = if self.user.is_empty() {
                self.gateway.clone()
            } else {
                format!("{}@{}", self.user, self.gateway)
            };
            args.push("-o".to_string());
            args.push(format!(
                "ProxyCommand=ssh {jump} -p 22 nc {} {}",
                self.machine, self.port
            ));
        }
        args.push(self.destination());
        args.push("--".to_string());
        args.push(command.to_string());
        args
    }
}

#[async_trait]
impl CommandRunner for SshRunner {
    async fn run(&self, command: &str) -> Result<String> {
        tracing::debug!(machine = %self.machine, command, "running remote command");
        let output = Command::new("ssh")
            .args(self.args(command))
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|err| Error::transport(command, err))?;
        collect_output(command, output, Some(SSH_TRANSPORT_STATUS))
    }
}
