use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A memory or swap value carried an unknown suffix or a non-numeric body.
    #[error("cannot normalize memory value `{value}`")]
    UnitCoercion { value: String },

    #[error("column `{column}` holds non-numeric value `{value}`")]
    Coercion { column: &'static str, value: String },

    #[error("malformed queue header `{line}`: {reason}")]
    QueueHeader { line: String, reason: String },

    /// The remote command runner could not reach the cluster.
    #[error("transport fault while running `{command}`: {reason}")]
    Transport { command: String, reason: String },

    #[error("notification failed: {0}")]
    Notify(String),

    #[error("snapshot store at {}: {source}", path.display())]
    Store {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("configuration: {0}")]
    Config(String),
}

impl Error {
    pub fn transport(command: &str, reason: impl ToString) -> Self {
        Error::Transport {
            command: command.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Only transport faults are worth restarting a cycle for; everything else
    /// would fail the same way again.
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport { .. })
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Notify(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_transport_faults_are_retryable() {
        assert!(Error::transport("qstat -f", "connection reset").is_transport());
        assert!(
            !Error::UnitCoercion {
                value: "12X".to_string()
            }
            .is_transport()
        );
        assert!(!Error::Notify("channel_not_found".to_string()).is_transport());
    }

    #[test]
    fn messages_name_the_offending_value() {
        let err = Error::Coercion {
            column: "load",
            value: "-NA-".to_string(),
        };
        assert_eq!(err.to_string(), "column `load` holds non-numeric value `-NA-`");
    }
}
