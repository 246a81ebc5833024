//! Configuration for the cache hierarchy simulator.
//!
//! This module defines the single configuration structure used to parameterize
//! a simulation. It provides:
//! 1. **Defaults:** Baseline geometry for L1, L2, the victim cache and the prefetcher.
//! 2. **Structure:** The flat `SimConfig` record, deserializable from JSON.
//! 3. **Validation:** Geometry checks performed before any structure is allocated.
//!
//! Configuration is supplied once, before the first access. The CLI loads it
//! from a JSON file and/or command-line flags; library users build it directly.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::common::constants::MAX_VICTIM_ENTRIES;
use crate::common::{ConfigError, Geometry, LevelId, SimError};

/// Default configuration constants for the simulator.
///
/// These values describe the baseline hierarchy used when a field is not
/// explicitly overridden.
mod defaults {
    /// L1 capacity: 2^12 = 4 KiB.
    pub const L1_C: u32 = 12;

    /// L1 associativity: 2^3 = 8 ways.
    pub const L1_S: u32 = 3;

    /// L2 capacity: 2^15 = 32 KiB.
    pub const L2_C: u32 = 15;

    /// L2 associativity: 2^5 = 32 ways.
    pub const L2_S: u32 = 5;

    /// Block size shared by every level: 2^5 = 32 bytes.
    pub const B: u32 = 5;

    /// Victim cache entries.
    pub const V: u32 = 3;

    /// Blocks prefetched into L2 after each L2 fill.
    pub const K: u32 = 2;
}

/// Root configuration structure containing all simulator settings.
///
/// All sizes are base-2 logarithms. `v = 0` disables the victim cache and
/// `k = 0` disables prefetching.
///
/// # Examples
///
/// Creating a default configuration:
///
/// ```
/// use cachesim_core::config::SimConfig;
///
/// let config = SimConfig::default();
/// assert_eq!(config.l1_c, 12);
/// assert!(config.validate().is_ok());
/// ```
///
/// Deserializing from JSON; missing fields take their defaults:
///
/// ```
/// use cachesim_core::config::SimConfig;
///
/// let config = SimConfig::from_json_str(r#"{ "l1_c": 10, "l1_s": 1, "v": 0 }"#).unwrap();
/// assert_eq!(config.l1_c, 10);
/// assert_eq!(config.l1_s, 1);
/// assert_eq!(config.v, 0);
/// assert_eq!(config.b, 5);
/// assert!(config.victim_geometry().unwrap().is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimConfig {
    /// L1 capacity, log2 bytes.
    #[serde(default = "SimConfig::default_l1_c")]
    pub l1_c: u32,

    /// L1 associativity, log2 ways.
    #[serde(default = "SimConfig::default_l1_s")]
    pub l1_s: u32,

    /// L2 capacity, log2 bytes.
    #[serde(default = "SimConfig::default_l2_c")]
    pub l2_c: u32,

    /// L2 associativity, log2 ways.
    #[serde(default = "SimConfig::default_l2_s")]
    pub l2_s: u32,

    /// Block size shared by all levels, log2 bytes.
    #[serde(default = "SimConfig::default_b")]
    pub b: u32,

    /// Victim cache entry count (`0` disables it).
    #[serde(default = "SimConfig::default_v")]
    pub v: u32,

    /// Prefetch degree (`0` disables the prefetcher).
    #[serde(default = "SimConfig::default_k")]
    pub k: u32,
}

impl SimConfig {
    const fn default_l1_c() -> u32 {
        defaults::L1_C
    }

    const fn default_l1_s() -> u32 {
        defaults::L1_S
    }

    const fn default_l2_c() -> u32 {
        defaults::L2_C
    }

    const fn default_l2_s() -> u32 {
        defaults::L2_S
    }

    const fn default_b() -> u32 {
        defaults::B
    }

    const fn default_v() -> u32 {
        defaults::V
    }

    const fn default_k() -> u32 {
        defaults::K
    }

    /// Parses a JSON configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::ConfigFormat`] if the document is malformed or
    /// names an unknown field. Geometry is not validated here.
    pub fn from_json_str(json: &str) -> Result<Self, SimError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Io`] if the file cannot be read, or
    /// [`SimError::ConfigFormat`] if it is not a valid configuration.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Geometry of the L1 cache.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if `l1_c < l1_s + b` or the level cannot be allocated.
    pub fn l1_geometry(&self) -> Result<Geometry, ConfigError> {
        Geometry::new(LevelId::L1, self.l1_c, self.b, self.l1_s)
    }

    /// Geometry of the L2 cache.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if `l2_c < l2_s + b` or the level cannot be allocated.
    pub fn l2_geometry(&self) -> Result<Geometry, ConfigError> {
        Geometry::new(LevelId::L2, self.l2_c, self.b, self.l2_s)
    }

    /// Geometry of the victim cache, or `None` when it is disabled.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if `v` is above the supported limit or the
    /// derived fully associative geometry is invalid.
    pub fn victim_geometry(&self) -> Result<Option<Geometry>, ConfigError> {
        if self.v == 0 {
            return Ok(None);
        }
        if self.v > MAX_VICTIM_ENTRIES {
            return Err(ConfigError::VictimCacheTooLarge {
                entries: self.v,
                max: MAX_VICTIM_ENTRIES,
            });
        }
        Geometry::fully_associative(LevelId::Victim, self.v, self.b).map(Some)
    }

    /// Checks every structure's geometry.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found, checking L1, then L2, then
    /// the victim cache.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let _ = self.l1_geometry()?;
        let _ = self.l2_geometry()?;
        let _ = self.victim_geometry()?;
        Ok(())
    }

    /// Returns `true` when the victim cache is configured.
    pub const fn has_victim_cache(&self) -> bool {
        self.v > 0
    }

    /// Returns `true` when the prefetcher is configured.
    pub const fn has_prefetcher(&self) -> bool {
        self.k > 0
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            l1_c: defaults::L1_C,
            l1_s: defaults::L1_S,
            l2_c: defaults::L2_C,
            l2_s: defaults::L2_S,
            b: defaults::B,
            v: defaults::V,
            k: defaults::K,
        }
    }
}
