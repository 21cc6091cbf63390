use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine home directory")]
    NoHomeDir,

    #[error("{op} {}", .path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed kubeconfig document")]
    MalformedFragment(#[source] serde_yaml::Error),

    #[error("serializing kubeconfig")]
    Serialize(#[source] serde_yaml::Error),

    /// A file or stdin fragment carries no `current-context` to adopt as its
    /// imported name.
    #[error("fragment declares no current-context to name it by")]
    UnnamedFragment,

    /// The active configuration has no `current-context`, so a secret import
    /// has nothing to derive the merged name from.
    #[error("active configuration has no current-context")]
    NoActiveContext,

    #[error("no such context: {0}")]
    UnknownContext(String),

    #[error("context {context} references missing {kind} {name}")]
    DanglingReference {
        context: String,
        kind: &'static str,
        name: String,
    },
}

impl ConfigError {
    pub(crate) fn io(op: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        ConfigError::Io {
            op,
            path: path.into(),
            source,
        }
    }
}
