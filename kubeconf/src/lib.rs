pub mod error;
pub mod import;
pub mod keyed;
pub mod merge;
pub mod model;
pub mod normalize;
pub mod store;
pub mod switch;

use std::path::PathBuf;

pub use error::ConfigError;
pub use import::{import_fragment, ImportOptions};
pub use keyed::KeyedConfig;
pub use model::KubeConfig;
pub use normalize::ImportOrigin;
pub use store::ConfigStore;

pub fn kube_dir() -> Result<PathBuf, ConfigError> {
    dirs::home_dir()
        .map(|home| home.join(".kube"))
        .ok_or(ConfigError::NoHomeDir)
}
