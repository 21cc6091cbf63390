use std::fs;

use tracing::debug;

use crate::error::ConfigError;
use crate::keyed::KeyedConfig;
use crate::model::KubeConfig;
use crate::normalize::{self, ImportOrigin};
use crate::store::ConfigStore;
use crate::{merge, switch};

pub struct ImportOptions {
    pub origin: ImportOrigin,
    /// Rewrite every imported cluster's server URL before renaming.
    pub server_url: Option<String>,
    /// Fold file-based certificate/key references into embedded data.
    pub inline: bool,
}

/// Run the whole pipeline on raw fragment bytes: materialize in the scratch
/// dir, parse, normalize, merge with the live configuration, and switch to
/// the imported context. Returns the name of the context switched to.
///
/// Nothing outside the scratch dir is touched until the switcher's final
/// backup-and-rename; the scratch dir itself is dropped on every exit path.
pub fn import_fragment(
    store: &ConfigStore,
    bytes: &[u8],
    opts: &ImportOptions,
) -> Result<String, ConfigError> {
    let scratch = store.scratch_dir()?;
    let fragment_path = scratch.path().join("fragment.yaml");
    fs::write(&fragment_path, bytes)
        .map_err(|source| ConfigError::io("writing", &fragment_path, source))?;

    let mut fragment = KubeConfig::read_from(&fragment_path)?;
    if opts.inline {
        fragment.inline()?;
    }
    if let Some(url) = &opts.server_url {
        normalize::override_server(&mut fragment, url);
    }

    let live = store.load()?;
    let target = normalize::target_name(&fragment, &opts.origin, live.current_context.as_deref())?;
    debug!(name = %target, origin = ?opts.origin, "normalizing imported fragment");
    let fragment = normalize::normalize(fragment, &target);

    let merged = merge::merge(KeyedConfig::from(live), KeyedConfig::from(fragment));
    switch::activate(store, merged, &target)?;

    Ok(target)
}
