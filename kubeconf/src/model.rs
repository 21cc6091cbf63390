use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_yaml::Value as YamlValue;

use crate::error::ConfigError;

// region: Context
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct ContextSpec {
    pub cluster: String,
    pub user: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// Anything else (extensions and the like) passes through untouched.
    #[serde(flatten)]
    pub rest: BTreeMap<String, YamlValue>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Context {
    pub name: String,
    pub context: ContextSpec,
}
// endregion

// region: Cluster
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct ClusterSpec {
    pub server: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate_authority: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate_authority_data: Option<String>,
    #[serde(flatten)]
    pub rest: BTreeMap<String, YamlValue>,
}

impl ClusterSpec {
    pub fn inline(&mut self) -> Result<(), ConfigError> {
        embed_file(
            &mut self.certificate_authority,
            &mut self.certificate_authority_data,
        )
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Cluster {
    pub name: String,
    pub cluster: ClusterSpec,
}
// endregion

// region: User
/// Credentials are opaque to the merge: the fields needed for inlining are
/// typed, everything else (exec plugins, auth-provider blocks, ...) rides
/// along in `rest`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct UserSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_certificate: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_certificate_data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_key: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_key_data: Option<String>,
    #[serde(flatten)]
    pub rest: BTreeMap<String, YamlValue>,
}

impl UserSpec {
    pub fn inline(&mut self) -> Result<(), ConfigError> {
        embed_file(&mut self.client_certificate, &mut self.client_certificate_data)?;
        embed_file(&mut self.client_key, &mut self.client_key_data)?;
        Ok(())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct User {
    pub name: String,
    pub user: UserSpec,
}
// endregion

fn embed_file(
    path_field: &mut Option<PathBuf>,
    data_field: &mut Option<String>,
) -> Result<(), ConfigError> {
    if data_field.is_some() {
        return Ok(());
    }

    let path = match path_field {
        Some(path) => path,
        None => return Ok(()),
    };

    let contents = fs::read_to_string(&path)
        .map_err(|source| ConfigError::io("reading", path.clone(), source))?;
    let embedded = contents
        .lines()
        .filter(|s| !(s.starts_with("-----") || s.is_empty()))
        .collect();

    *data_field = Some(embedded);
    *path_field = None;

    Ok(())
}

// region: Common
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum ApiVersion {
    #[serde(rename = "v1")]
    V1,
}

impl Default for ApiVersion {
    fn default() -> Self {
        ApiVersion::V1
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum Kind {
    Config,
}

impl Default for Kind {
    fn default() -> Self {
        Kind::Config
    }
}

fn empty_preferences() -> YamlValue {
    YamlValue::Mapping(serde_yaml::Mapping::new())
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct KubeConfig {
    #[serde(default)]
    pub kind: Kind,
    #[serde(rename = "apiVersion", default)]
    pub api_version: ApiVersion,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_context: Option<String>,
    #[serde(default = "empty_preferences")]
    pub preferences: YamlValue,
    #[serde(default)]
    pub clusters: Vec<Cluster>,
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub contexts: Vec<Context>,
}

impl Default for KubeConfig {
    fn default() -> Self {
        KubeConfig {
            kind: Kind::Config,
            api_version: ApiVersion::V1,
            current_context: None,
            preferences: empty_preferences(),
            clusters: Vec::new(),
            users: Vec::new(),
            contexts: Vec::new(),
        }
    }
}

impl KubeConfig {
    pub fn from_slice(bytes: &[u8]) -> Result<KubeConfig, ConfigError> {
        serde_yaml::from_slice(bytes).map_err(ConfigError::MalformedFragment)
    }

    pub fn read_from(path: impl AsRef<Path>) -> Result<KubeConfig, ConfigError> {
        let path = path.as_ref();
        let bytes =
            fs::read(path).map_err(|source| ConfigError::io("reading", path, source))?;
        Self::from_slice(&bytes)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self).map_err(ConfigError::Serialize)
    }

    /// Fold file-based certificate and key references into their embedded
    /// `*-data` forms, so the document survives being moved off this machine.
    pub fn inline(&mut self) -> Result<(), ConfigError> {
        for cluster in &mut self.clusters {
            cluster.cluster.inline()?;
        }

        for user in &mut self.users {
            user.user.inline()?;
        }

        Ok(())
    }
}
// endregion
