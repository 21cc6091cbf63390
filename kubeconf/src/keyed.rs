use std::collections::BTreeMap;

use serde_yaml::Value as YamlValue;

use crate::error::ConfigError;
use crate::model::{self, Cluster, ClusterSpec, Context, ContextSpec, User, UserSpec};

/// A kubeconfig indexed by entry name. Name uniqueness within each category
/// holds by construction, which is what makes the merge a plain map union.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyedConfig {
    pub current_context: Option<String>,
    pub preferences: YamlValue,
    pub clusters: BTreeMap<String, ClusterSpec>,
    pub users: BTreeMap<String, UserSpec>,
    pub contexts: BTreeMap<String, ContextSpec>,
}

impl From<model::KubeConfig> for KeyedConfig {
    fn from(kc: model::KubeConfig) -> Self {
        Self {
            current_context: kc.current_context,
            preferences: kc.preferences,
            clusters: kc
                .clusters
                .into_iter()
                .map(|cls| (cls.name, cls.cluster))
                .collect(),
            users: kc
                .users
                .into_iter()
                .map(|usr| (usr.name, usr.user))
                .collect(),
            contexts: kc
                .contexts
                .into_iter()
                .map(|ctx| (ctx.name, ctx.context))
                .collect(),
        }
    }
}

impl From<KeyedConfig> for model::KubeConfig {
    fn from(kc: KeyedConfig) -> Self {
        model::KubeConfig {
            kind: model::Kind::Config,
            api_version: model::ApiVersion::V1,
            current_context: kc.current_context,
            preferences: kc.preferences,
            clusters: kc
                .clusters
                .into_iter()
                .map(|(name, cluster)| Cluster { name, cluster })
                .collect(),
            users: kc
                .users
                .into_iter()
                .map(|(name, user)| User { name, user })
                .collect(),
            contexts: kc
                .contexts
                .into_iter()
                .map(|(name, context)| Context { name, context })
                .collect(),
        }
    }
}

impl KeyedConfig {
    /// Every context must point at a cluster and user that exist.
    pub fn check_references(&self) -> Result<(), ConfigError> {
        for (name, spec) in &self.contexts {
            if !self.clusters.contains_key(&spec.cluster) {
                return Err(ConfigError::DanglingReference {
                    context: name.clone(),
                    kind: "cluster",
                    name: spec.cluster.clone(),
                });
            }
            if !self.users.contains_key(&spec.user) {
                return Err(ConfigError::DanglingReference {
                    context: name.clone(),
                    kind: "user",
                    name: spec.user.clone(),
                });
            }
        }
        Ok(())
    }

    /// Removes only the context entry; its cluster and user stay.
    pub fn remove_context(&mut self, name: &str) -> bool {
        self.contexts.remove(name).is_some()
    }
}
