//! Configuration types for loading marble jar scenarios from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! scenario. A scenario consists of:
//!
//! - [`EngineConfig`]     – canvas size, pacing and pairwise scan policy
//! - [`ParametersConfig`] – marble defaults and rest thresholds
//! - `owners`             – marble count per owner, one jar each
//! - `current_user`       – whose jar the viewer's drop/undo keys act on
//!
//! # YAML format
//!
//! ```yaml
//! engine:
//!   canvas: [250.0, 300.0]   # jar canvas width, height in pixels
//!   frame_rate: 60.0         # ticks per second for real-time runs
//!   drop_interval: 12        # ticks between queued drops
//!   pair_scan: "short_circuit"  # or "continue"
//!
//! parameters:
//!   radius: 10.0
//!   restitution: 0.6
//!   friction: 0.98
//!   gravity: 0.5
//!   rest_speed: 0.1
//!   rest_frames: 30
//!   floor_snap: 0.5
//!   grip: 2.0
//!   seed: 42
//!
//! owners:
//!   alice: 5
//!   bob: 2
//!
//! current_user: alice
//! ```
//!
//! Every field except `owners` may be left out and falls back to the
//! defaults shown above.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::simulation::params::PairScan;

/// Runtime engine configuration
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct EngineConfig {
    pub canvas: [f64; 2],     // width, height of each jar's canvas
    pub frame_rate: f64,      // real-time tick rate
    pub drop_interval: u32,   // ticks between two queued drops in one jar
    pub pair_scan: PairScan,  // what to do after a gated pair
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            canvas: [250.0, 300.0],
            frame_rate: 60.0,
            drop_interval: 12,
            pair_scan: PairScan::ShortCircuit,
        }
    }
}

/// Marble defaults and rest thresholds
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ParametersConfig {
    pub radius: f64,
    pub restitution: f64,
    pub friction: f64,
    pub gravity: f64,
    pub rest_speed: f64,
    pub rest_frames: u32,
    pub floor_snap: f64,
    pub grip: f64,
    pub seed: u64, // deterministic seed for drop positions
}

impl Default for ParametersConfig {
    fn default() -> Self {
        Self {
            radius: 10.0,
            restitution: 0.6,
            friction: 0.98,
            gravity: 0.5,
            rest_speed: 0.1,
            rest_frames: 30,
            floor_snap: 0.5,
            grip: 2.0,
            seed: 42,
        }
    }
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug, Clone)]
pub struct ScenarioConfig {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub parameters: ParametersConfig,
    pub owners: BTreeMap<String, u32>, // marble count per owner
    #[serde(default)]
    pub current_user: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_scenario() {
        let yaml = r#"
engine:
  canvas: [300.0, 400.0]
  frame_rate: 30.0
  drop_interval: 6
  pair_scan: "continue"
parameters:
  radius: 12.0
  restitution: 0.5
  friction: 0.97
  gravity: 0.4
  rest_speed: 0.2
  rest_frames: 20
  floor_snap: 0.3
  grip: 1.5
  seed: 9
owners:
  alice: 3
  bob: 1
current_user: bob
"#;
        let cfg: ScenarioConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.engine.canvas, [300.0, 400.0]);
        assert_eq!(cfg.engine.pair_scan, PairScan::Continue);
        assert_eq!(cfg.parameters.rest_frames, 20);
        assert_eq!(cfg.parameters.grip, 1.5);
        assert_eq!(cfg.owners["alice"], 3);
        assert_eq!(cfg.current_user.as_deref(), Some("bob"));
    }

    #[test]
    fn missing_sections_use_defaults() {
        let cfg: ScenarioConfig = serde_yaml::from_str("owners:\n  carol: 2\n").unwrap();
        assert_eq!(cfg.engine.drop_interval, 12);
        assert_eq!(cfg.engine.pair_scan, PairScan::ShortCircuit);
        assert_eq!(cfg.parameters.radius, 10.0);
        assert!(cfg.current_user.is_none());
    }
}
