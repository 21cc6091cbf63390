mod cli;
mod cluster;
mod select;

use std::io::{self, IsTerminal as _, Read as _};
use std::process::{Command, ExitCode};
use std::{env, fs};

use anyhow::{bail, Context as _, Result};
use clap::Parser as _;
use console::style;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use kubeconf::{
    import_fragment, ConfigError, ConfigStore, ImportOptions, ImportOrigin, KubeConfig,
};

use crate::cli::{exit, Cli};
use crate::cluster::ClusterClient;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err)
            if matches!(
                err.kind(),
                clap::ErrorKind::DisplayHelp | clap::ErrorKind::DisplayVersion
            ) =>
        {
            let _ = err.print();
            return ExitCode::SUCCESS;
        }
        Err(err) => {
            let _ = err.print();
            return ExitCode::from(exit::USAGE);
        }
    };

    match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{} {err:#}", style("error:").red().bold());
            ExitCode::from(exit::USAGE)
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let store = ConfigStore::from_env()?;

    if cli.delete {
        return delete_context(&store);
    }
    if cli.edit {
        return edit_config(&store);
    }

    let (bytes, opts) = match resolve_fragment(&store, &cli).await? {
        Resolved::Fragment(bytes, opts) => (bytes, opts),
        Resolved::Cancelled(what) => {
            eprintln!("No {what} selected");
            return Ok(ExitCode::from(exit::SELECTION_CANCELLED));
        }
        Resolved::SecretNotFound { namespace, secret } => {
            eprintln!("Secret {secret} not found in namespace {namespace}");
            return Ok(ExitCode::from(exit::SECRET_NOT_FOUND));
        }
    };

    match import_fragment(&store, &bytes, &opts) {
        Ok(target) => {
            println!("Switched to context {}", style(&target).green());
            Ok(ExitCode::SUCCESS)
        }
        Err(err @ ConfigError::UnknownContext(_)) => {
            warn!(%err, "activation failed");
            eprintln!("Failed to merge kubeconfig, aborting");
            Ok(ExitCode::FAILURE)
        }
        Err(err) => Err(err.into()),
    }
}

enum Resolved {
    Fragment(Vec<u8>, ImportOptions),
    Cancelled(&'static str),
    SecretNotFound { namespace: String, secret: String },
}

/// Figure out where the fragment comes from: a file, piped stdin, or a
/// cluster secret (with interactive namespace/secret selection as needed).
async fn resolve_fragment(store: &ConfigStore, cli: &Cli) -> Result<Resolved> {
    if let Some(path) = &cli.file {
        let bytes =
            fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        return Ok(Resolved::Fragment(
            bytes,
            ImportOptions {
                origin: ImportOrigin::File,
                server_url: None,
                inline: cli.inline,
            },
        ));
    }

    if cli.namespace.is_none() && cli.secret.is_none() && !io::stdin().is_terminal() {
        if cli.url.is_some() {
            bail!("--url only applies to secret imports");
        }
        let mut bytes = Vec::new();
        io::stdin()
            .read_to_end(&mut bytes)
            .context("reading stdin")?;
        return Ok(Resolved::Fragment(
            bytes,
            ImportOptions {
                origin: ImportOrigin::Stdin,
                server_url: None,
                inline: cli.inline,
            },
        ));
    }

    let client = ClusterClient::connect(store.path()).await?;

    let namespace = match &cli.namespace {
        Some(ns) => ns.clone(),
        None => match select::pick("Namespace", &client.list_namespaces().await?)? {
            Some(ns) => ns,
            None => return Ok(Resolved::Cancelled("namespace")),
        },
    };

    let secret_name = match &cli.secret {
        Some(name) => name.clone(),
        None => match select::pick("Secret", &client.list_secrets(&namespace).await?)? {
            Some(name) => name,
            None => return Ok(Resolved::Cancelled("secret")),
        },
    };

    // existence gate: bail before any merge work if the secret is absent
    let secret = match client.fetch_secret(&namespace, &secret_name).await? {
        Some(secret) => secret,
        None => {
            return Ok(Resolved::SecretNotFound {
                namespace,
                secret: secret_name,
            })
        }
    };

    let bytes = cluster::extract_config_bytes(&secret, &cli.jsonpath)?;
    Ok(Resolved::Fragment(
        bytes,
        ImportOptions {
            origin: ImportOrigin::Secret {
                namespace,
                secret_name,
            },
            server_url: cli.url.clone(),
            inline: cli.inline,
        },
    ))
}

fn delete_context(store: &ConfigStore) -> Result<ExitCode> {
    let mut config = store.load_keyed()?;

    let name = match select::pick_context(&config.contexts)? {
        Some(name) => name,
        None => {
            eprintln!("No context selected");
            return Ok(ExitCode::from(exit::SELECTION_CANCELLED));
        }
    };

    if config.current_context.as_deref() == Some(name.as_str()) {
        eprintln!(
            "{} deleting the current context {name}",
            style("warning:").yellow().bold()
        );
    }

    config.remove_context(&name);
    store.backup()?;
    store.save(&KubeConfig::from(config))?;

    println!("Deleted context {}", style(&name).green());
    Ok(ExitCode::SUCCESS)
}

/// Hand the active configuration (and any extra KUBECONFIG entries) to the
/// user's editor; this program itself mutates nothing on this path.
fn edit_config(store: &ConfigStore) -> Result<ExitCode> {
    let paths = match env::var_os("KUBECONFIG") {
        Some(joined) => env::split_paths(&joined)
            .filter(|p| !p.as_os_str().is_empty())
            .collect(),
        None => vec![store.path().to_path_buf()],
    };

    let editor = env::var_os("VISUAL")
        .or_else(|| env::var_os("EDITOR"))
        .unwrap_or_else(|| "vi".into());

    let status = Command::new(&editor)
        .args(&paths)
        .status()
        .with_context(|| format!("launching {}", editor.to_string_lossy()))?;

    Ok(if status.success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
