use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[clap(
    name = "kmerge",
    version,
    about = "Merge a kubeconfig from a cluster secret, file, or stdin into the active \
             configuration and switch to the imported context"
)]
pub struct Cli {
    /// Namespace holding the kubeconfig secret (picked interactively if omitted)
    #[clap(value_name = "NAMESPACE")]
    pub namespace: Option<String>,

    /// Name of the kubeconfig secret (picked interactively if omitted)
    #[clap(value_name = "SECRET")]
    pub secret: Option<String>,

    /// Override the server URL of every imported cluster
    #[clap(long, value_name = "URL", conflicts_with = "file")]
    pub url: Option<String>,

    /// Field path of the kubeconfig bytes within the secret
    #[clap(long, value_name = "PATH", default_value = "{.data.config}")]
    pub jsonpath: String,

    /// Import the given kubeconfig file instead of a secret
    #[clap(
        short,
        long,
        value_name = "FILE",
        conflicts_with_all = &["namespace", "secret"]
    )]
    pub file: Option<PathBuf>,

    /// Inline file-based certificate and key references before merging
    #[clap(long)]
    pub inline: bool,

    /// Delete a context from the active configuration
    #[clap(
        short,
        long,
        conflicts_with_all = &["namespace", "secret", "file", "url", "inline"]
    )]
    pub delete: bool,

    /// Open the active configuration in your editor
    #[clap(
        short,
        long,
        conflicts_with_all = &["namespace", "secret", "file", "url", "inline", "delete"]
    )]
    pub edit: bool,
}

/// Exit codes the wrapper scripts depend on.
pub mod exit {
    pub const USAGE: u8 = 1;
    pub const SELECTION_CANCELLED: u8 = 2;
    pub const SECRET_NOT_FOUND: u8 = 3;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positional_namespace_and_secret() {
        let cli = Cli::try_parse_from(["kmerge", "ns1", "my-secret"]).unwrap();
        assert_eq!(cli.namespace.as_deref(), Some("ns1"));
        assert_eq!(cli.secret.as_deref(), Some("my-secret"));
        assert_eq!(cli.jsonpath, "{.data.config}");
    }

    #[test]
    fn file_conflicts_with_positionals() {
        assert!(Cli::try_parse_from(["kmerge", "-f", "cfg.yaml", "ns1"]).is_err());
    }

    #[test]
    fn url_conflicts_with_file() {
        assert!(Cli::try_parse_from(["kmerge", "-f", "cfg.yaml", "--url", "https://x"]).is_err());
    }

    #[test]
    fn delete_stands_alone() {
        let cli = Cli::try_parse_from(["kmerge", "-d"]).unwrap();
        assert!(cli.delete);
        assert!(Cli::try_parse_from(["kmerge", "-d", "-e"]).is_err());
        assert!(Cli::try_parse_from(["kmerge", "-d", "ns1"]).is_err());
    }

    #[test]
    fn unknown_flags_are_rejected() {
        assert!(Cli::try_parse_from(["kmerge", "--bogus"]).is_err());
    }
}
