use std::path::Path;

use anyhow::{bail, Context as _, Result};
use k8s_openapi::api::core::v1::{Namespace, Secret};
use kube::api::ListParams;
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Api, Client, Config};

/// Client against whatever cluster the active configuration's current
/// context points at.
pub struct ClusterClient {
    client: Client,
}

impl ClusterClient {
    pub async fn connect(config_path: &Path) -> Result<Self> {
        let kubeconfig = Kubeconfig::read_from(config_path)
            .with_context(|| format!("reading {}", config_path.display()))?;
        let config = Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default())
            .await
            .context("building client configuration")?;
        let client = Client::try_from(config)?;

        Ok(Self { client })
    }

    pub async fn list_namespaces(&self) -> Result<Vec<String>> {
        let api: Api<Namespace> = Api::all(self.client.clone());
        let list = api.list(&ListParams::default()).await?;
        Ok(list
            .items
            .iter()
            .filter_map(|ns| ns.metadata.name.clone())
            .collect())
    }

    pub async fn list_secrets(&self, namespace: &str) -> Result<Vec<String>> {
        let api: Api<Secret> = Api::namespaced(self.client.clone(), namespace);
        let list = api.list(&ListParams::default()).await?;
        Ok(list
            .items
            .iter()
            .filter_map(|s| s.metadata.name.clone())
            .collect())
    }

    /// `None` means the secret does not exist in the namespace; callers use
    /// that as the fail-fast gate before any merge work starts.
    pub async fn fetch_secret(&self, namespace: &str, name: &str) -> Result<Option<Secret>> {
        let api: Api<Secret> = Api::namespaced(self.client.clone(), namespace);
        api.get_opt(name).await.map_err(Into::into)
    }
}

/// Pull the kubeconfig bytes out of a secret. The field path accepts the
/// kubectl-style `{.data.<key>}` form or a bare data key; `k8s-openapi` has
/// already base64-decoded the values.
pub fn extract_config_bytes(secret: &Secret, field_path: &str) -> Result<Vec<u8>> {
    let key = data_key(field_path)?;
    let name = secret.metadata.name.as_deref().unwrap_or("<unnamed>");

    let data = secret
        .data
        .as_ref()
        .with_context(|| format!("secret {name} has no data"))?;
    let value = data
        .get(key)
        .with_context(|| format!("secret {name} has no '{key}' entry"))?;

    Ok(value.0.clone())
}

fn data_key(field_path: &str) -> Result<&str> {
    let key = field_path
        .trim()
        .trim_start_matches('{')
        .trim_end_matches('}')
        .trim_start_matches('.');
    let key = key.strip_prefix("data.").unwrap_or(key);

    if key.is_empty() {
        bail!("unsupported field path '{field_path}', expected {{.data.<key>}}");
    }

    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_jsonpath_selects_the_config_key() {
        assert_eq!(data_key("{.data.config}").unwrap(), "config");
    }

    #[test]
    fn bare_keys_and_dotted_keys_are_accepted() {
        assert_eq!(data_key("config").unwrap(), "config");
        assert_eq!(data_key("kubeconfig.yaml").unwrap(), "kubeconfig.yaml");
        assert_eq!(data_key("{.data.admin.conf}").unwrap(), "admin.conf");
    }

    #[test]
    fn empty_paths_are_rejected() {
        assert!(data_key("{.data.}").is_err());
        assert!(data_key("").is_err());
    }

    #[test]
    fn extracts_decoded_bytes_from_secret_data() {
        let mut secret = Secret::default();
        secret.metadata.name = Some("kubeconfig".into());
        secret.data = Some(
            [(
                "config".to_string(),
                k8s_openapi::ByteString(b"current-context: dev\n".to_vec()),
            )]
            .into_iter()
            .collect(),
        );

        let bytes = extract_config_bytes(&secret, "{.data.config}").unwrap();
        assert_eq!(bytes, b"current-context: dev\n");

        assert!(extract_config_bytes(&secret, "{.data.missing}").is_err());
    }
}
