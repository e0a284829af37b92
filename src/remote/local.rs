use async_trait::async_trait;
use tokio::process::Command;

use super::{CommandRunner, collect_output};
use crate::error::{Error, Result};

/// Runs commands through `sh -c` on this machine, for deployments on the head node.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalRunner;

#[async_trait]
impl CommandRunner for LocalRunner {
    async fn run(&self, command: &str) -> Result<String> {
        let output = Command::new("sh")
            .args(["-c", command])
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|err| Error::transport(command, err))?;
        collect_output(command, output, None)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn returns_stdout_verbatim() {
        let out = LocalRunner.run("printf 'a  b\\nc\\n'").await.unwrap();
        assert_eq!(out, "a  b\nc\n");
    }

    #[tokio::test]
    async fn multi_line_script_keeps_shell_state() {
        let out = LocalRunner
            .run("cd /tmp\necho \"$(pwd) 01:02:03\"")
            .await
            .unwrap();
        assert_eq!(out, "/tmp 01:02:03\n");
    }

    #[tokio::test]
    async fn non_zero_exit_still_returns_stdout() {
        let out = LocalRunner.run("printf 'x'; exit 1").await.unwrap();
        assert_eq!(out, "x");
    }
}
