use crate::keyed::KeyedConfig;

/// Union of two configurations, keyed by name per category. Fragment entries
/// win on collision; everything non-colliding from both sides is kept. The
/// merged `current-context` is left unset, the switcher fills it in once the
/// target context has been validated.
pub fn merge(live: KeyedConfig, fragment: KeyedConfig) -> KeyedConfig {
    let mut merged = live;

    merged.clusters.extend(fragment.clusters);
    merged.users.extend(fragment.users);
    merged.contexts.extend(fragment.contexts);
    merged.current_context = None;

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::KubeConfig;

    fn keyed(yaml: &str) -> KeyedConfig {
        KeyedConfig::from(KubeConfig::from_slice(yaml.as_bytes()).unwrap())
    }

    fn live() -> KeyedConfig {
        keyed(
            r#"
current-context: old
clusters:
  - name: old
    cluster:
      server: https://old
users:
  - name: old
    user:
      token: old-token
contexts:
  - name: old
    context:
      cluster: old
      user: old
"#,
        )
    }

    #[test]
    fn non_colliding_entries_from_both_sides_are_kept() {
        let fragment = keyed(
            r#"
clusters:
  - name: new
    cluster:
      server: https://new
users:
  - name: new
    user:
      token: new-token
contexts:
  - name: new
    context:
      cluster: new
      user: new
"#,
        );

        let merged = merge(live(), fragment);

        assert_eq!(merged.clusters.len(), 2);
        assert_eq!(merged.users.len(), 2);
        assert_eq!(merged.contexts.len(), 2);
        assert!(merged.contexts.contains_key("old"));
        assert!(merged.contexts.contains_key("new"));
        merged.check_references().unwrap();
    }

    #[test]
    fn colliding_names_take_the_fragment_entry() {
        let fragment = keyed(
            r#"
clusters:
  - name: old
    cluster:
      server: https://replaced
users:
  - name: old
    user:
      token: replaced-token
contexts:
  - name: old
    context:
      cluster: old
      user: old
      namespace: shiny
"#,
        );

        let merged = merge(live(), fragment);

        assert_eq!(merged.clusters.len(), 1);
        assert_eq!(merged.clusters["old"].server, "https://replaced");
        assert_eq!(merged.users["old"].token.as_deref(), Some("replaced-token"));
        assert_eq!(merged.contexts["old"].namespace.as_deref(), Some("shiny"));
    }

    #[test]
    fn merged_current_context_is_unset() {
        let fragment = keyed("current-context: new\n");
        let merged = merge(live(), fragment);
        assert!(merged.current_context.is_none());
    }
}
