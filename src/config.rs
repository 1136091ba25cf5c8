//! Tree configuration

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Largest `initial_capacity` a config file may ask for
pub const MAX_INITIAL_CAPACITY: usize = 1 << 20;

/// Tunables for a [`RadixTree`](crate::RadixTree)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeConfig {
    /// Run the structural assertion after each mutation. Only has an effect
    /// when assertions are compiled in (debug builds or the
    /// `integrity-checks` feature).
    #[serde(default = "default_verify_mutations")]
    pub verify_mutations: bool,

    /// Number of node slots to reserve up front, at most
    /// [`MAX_INITIAL_CAPACITY`]
    #[serde(default)]
    pub initial_capacity: usize,
}

fn default_verify_mutations() -> bool {
    true
}

impl Default for TreeConfig {
    fn default() -> Self {
        TreeConfig {
            verify_mutations: default_verify_mutations(),
            initial_capacity: 0,
        }
    }
}

impl TreeConfig {
    /// Load config from a JSON file, falling back to defaults if it is missing
    pub fn load(path: impl AsRef<Path>) -> crate::Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::from_json(&content)
        } else {
            Ok(Self::default())
        }
    }

    /// Save config as pretty-printed JSON
    pub fn save(&self, path: impl AsRef<Path>) -> crate::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn from_json(content: &str) -> crate::Result<Self> {
        let config: TreeConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> crate::Result<()> {
        if self.initial_capacity > MAX_INITIAL_CAPACITY {
            return Err(crate::Error::Config(format!(
                "initial_capacity {} exceeds the maximum of {}",
                self.initial_capacity, MAX_INITIAL_CAPACITY
            )));
        }
        Ok(())
    }
}
