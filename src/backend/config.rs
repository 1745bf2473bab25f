//! Backend configuration

use crate::batch::{Batch, DEFAULT_BATCH_CAPACITY, MAX_BATCH_QUADS};

/// Environment variable enabling [`BackendConfig::fill_removed_texture`].
pub const FILL_REMOVED_TEXTURE_VAR: &str = "REIN_BATCH_FILL_REMOVED_TEXTURE";
/// Environment variable overriding [`BackendConfig::batch_capacity`].
pub const BATCH_CAPACITY_VAR: &str = "REIN_BATCH_CAPACITY";

/// Rejected configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("batch capacity of {capacity} bytes cannot hold a single quad")]
    CapacityTooSmall { capacity: usize },
    #[error("batch capacity of {capacity} bytes holds {quads} quads, at most {max} fit 16-bit indices")]
    CapacityTooLarge {
        capacity: usize,
        quads: usize,
        max: usize,
    },
}

/// Texel patterns written into the atlas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtlasConfig {
    /// Every texel of a freshly created atlas.
    pub initial_fill: [u8; 4],
    /// Every texel after a wholesale clear.
    pub clear_fill: [u8; 4],
    /// Texels of a removed region, when removal filling is enabled.
    pub removed_fill: [u8; 4],
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            initial_fill: [0x80, 0x80, 0x80, 0x80],
            clear_fill: [0x00, 0xff, 0x00, 0xff],
            removed_fill: [0xff, 0x00, 0x00, 0xff],
        }
    }
}

/// Settings of a [`BatchRenderBackend`](super::BatchRenderBackend).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    /// Overwrite atlas regions on removal so stale images are easy to spot.
    pub fill_removed_texture: bool,
    /// Byte capacity of each batch's vertex and index buffer.
    pub batch_capacity: usize,
    pub atlas: AtlasConfig,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            fill_removed_texture: false,
            batch_capacity: DEFAULT_BATCH_CAPACITY,
            atlas: AtlasConfig::default(),
        }
    }
}

impl BackendConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by `REIN_BATCH_*` environment variables.
    ///
    /// Unparseable values are logged and ignored.
    pub fn from_env() -> Self {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(raw) = lookup(FILL_REMOVED_TEXTURE_VAR) {
            match parse_bool(&raw) {
                Some(value) => config.fill_removed_texture = value,
                None => tracing::warn!(
                    "ignoring {}={:?}: expected a boolean",
                    FILL_REMOVED_TEXTURE_VAR,
                    raw
                ),
            }
        }

        if let Some(raw) = lookup(BATCH_CAPACITY_VAR) {
            match raw.trim().parse() {
                Ok(value) => config.batch_capacity = value,
                Err(err) => {
                    tracing::warn!("ignoring {}={:?}: {}", BATCH_CAPACITY_VAR, raw, err)
                }
            }
        }

        config
    }

    pub fn fill_removed_texture(mut self, enabled: bool) -> Self {
        self.fill_removed_texture = enabled;
        self
    }

    pub fn batch_capacity(mut self, bytes: usize) -> Self {
        self.batch_capacity = bytes;
        self
    }

    pub fn atlas(mut self, atlas: AtlasConfig) -> Self {
        self.atlas = atlas;
        self
    }

    /// Largest quad count whose vertex indices stay below the restart index.
    pub const fn max_quads_per_batch() -> usize {
        MAX_BATCH_QUADS
    }

    /// Check that a batch holds at least one quad and that its indices fit
    /// in 16 bits without reaching the restart index.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let quads = Batch::<()>::max_quads(self.batch_capacity);
        if quads == 0 {
            return Err(ConfigError::CapacityTooSmall {
                capacity: self.batch_capacity,
            });
        }
        let max = Self::max_quads_per_batch();
        if quads > max {
            return Err(ConfigError::CapacityTooLarge {
                capacity: self.batch_capacity,
                quads,
                max,
            });
        }
        Ok(())
    }
}

/// Parse env-style booleans: `1/true/yes/on` and `0/false/no/off`.
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
