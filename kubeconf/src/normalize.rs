use crate::error::ConfigError;
use crate::model::KubeConfig;

/// Where an imported fragment came from. Secret imports get a derived name;
/// file and stdin fragments are assumed to already be well-named and keep
/// their own `current-context`.
#[derive(Debug, Clone, PartialEq)]
pub enum ImportOrigin {
    Secret {
        namespace: String,
        secret_name: String,
    },
    File,
    Stdin,
}

/// The single name everything in the fragment is rewritten to.
///
/// Secret imports: `<active current-context>-<namespace>-<secret name>`.
/// File and stdin imports: the fragment's own `current-context`.
pub fn target_name(
    fragment: &KubeConfig,
    origin: &ImportOrigin,
    active_context: Option<&str>,
) -> Result<String, ConfigError> {
    match origin {
        ImportOrigin::Secret {
            namespace,
            secret_name,
        } => {
            let current = active_context.ok_or(ConfigError::NoActiveContext)?;
            Ok(format!("{current}-{namespace}-{secret_name}"))
        }
        ImportOrigin::File | ImportOrigin::Stdin => fragment
            .current_context
            .clone()
            .ok_or(ConfigError::UnnamedFragment),
    }
}

/// Rewrite every cluster, user, and context (and each context's cluster/user
/// refs) to the target name. Fragments holding several clusters or users
/// collapse to one entry per category under that name.
pub fn normalize(mut fragment: KubeConfig, target: &str) -> KubeConfig {
    for cluster in &mut fragment.clusters {
        cluster.name = target.to_string();
    }

    for user in &mut fragment.users {
        user.name = target.to_string();
    }

    for context in &mut fragment.contexts {
        context.name = target.to_string();
        context.context.cluster = target.to_string();
        context.context.user = target.to_string();
    }

    fragment.current_context = Some(target.to_string());
    fragment
}

/// Point every cluster in the fragment at the given server URL. Applied
/// before renaming.
pub fn override_server(fragment: &mut KubeConfig, url: &str) {
    for cluster in &mut fragment.clusters {
        cluster.cluster.server = url.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fragment() -> KubeConfig {
        KubeConfig::from_slice(
            br#"
current-context: imported
clusters:
  - name: a
    cluster:
      server: https://a
  - name: b
    cluster:
      server: https://b
users:
  - name: a
    user:
      token: t
contexts:
  - name: imported
    context:
      cluster: a
      user: a
"#,
        )
        .unwrap()
    }

    #[test]
    fn secret_name_joins_context_namespace_and_secret() {
        let origin = ImportOrigin::Secret {
            namespace: "bar".into(),
            secret_name: "baz".into(),
        };
        let name = target_name(&fragment(), &origin, Some("foo")).unwrap();
        assert_eq!(name, "foo-bar-baz");
    }

    #[test]
    fn secret_import_needs_an_active_context() {
        let origin = ImportOrigin::Secret {
            namespace: "bar".into(),
            secret_name: "baz".into(),
        };
        let err = target_name(&fragment(), &origin, None).unwrap_err();
        assert!(matches!(err, ConfigError::NoActiveContext));
    }

    #[test]
    fn file_import_keeps_the_fragments_own_name() {
        let name = target_name(&fragment(), &ImportOrigin::File, Some("foo")).unwrap();
        assert_eq!(name, "imported");
    }

    #[test]
    fn unnamed_file_fragment_is_rejected() {
        let mut anon = fragment();
        anon.current_context = None;
        let err = target_name(&anon, &ImportOrigin::Stdin, None).unwrap_err();
        assert!(matches!(err, ConfigError::UnnamedFragment));
    }

    #[test]
    fn normalize_collapses_every_name_to_the_target() {
        let normalized = normalize(fragment(), "foo-bar-baz");

        for cluster in &normalized.clusters {
            assert_eq!(cluster.name, "foo-bar-baz");
        }
        for user in &normalized.users {
            assert_eq!(user.name, "foo-bar-baz");
        }
        for context in &normalized.contexts {
            assert_eq!(context.name, "foo-bar-baz");
            assert_eq!(context.context.cluster, "foo-bar-baz");
            assert_eq!(context.context.user, "foo-bar-baz");
        }
        assert_eq!(normalized.current_context.as_deref(), Some("foo-bar-baz"));
    }

    #[test]
    fn normalize_is_idempotent() {
        let once = normalize(fragment(), "foo-bar-baz");
        let twice = normalize(once.clone(), "foo-bar-baz");
        assert_eq!(once, twice);

        // File imports re-derive the same target from the rewritten
        // current-context, so a second full pass is also a fixpoint.
        let target = target_name(&once, &ImportOrigin::File, None).unwrap();
        assert_eq!(target, "foo-bar-baz");
    }

    #[test]
    fn override_server_rewrites_every_cluster() {
        let mut f = fragment();
        override_server(&mut f, "https://tunnel.local:6443");
        for cluster in &f.clusters {
            assert_eq!(cluster.cluster.server, "https://tunnel.local:6443");
        }
    }
}
