use tracing::debug;

use crate::error::ConfigError;
use crate::keyed::KeyedConfig;
use crate::model::KubeConfig;
use crate::store::ConfigStore;

/// Activate `target` against the merged view and promote it to be the live
/// configuration.
///
/// The validation gate runs strictly before any mutation of the live file,
/// and the backup is taken strictly before the overwrite: a failure anywhere
/// leaves the live file untouched, and a success is always reversible from
/// `<config>.bak`.
pub fn activate(
    store: &ConfigStore,
    mut merged: KeyedConfig,
    target: &str,
) -> Result<(), ConfigError> {
    if !merged.contexts.contains_key(target) {
        return Err(ConfigError::UnknownContext(target.to_string()));
    }
    merged.check_references()?;
    merged.current_context = Some(target.to_string());

    let rendered = KubeConfig::from(merged).to_yaml()?;

    store.backup()?;
    store.replace(&rendered)?;
    debug!(context = target, "switched active context");

    Ok(())
}
