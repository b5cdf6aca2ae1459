//! Build fully-initialized marble scenarios from configuration
//!
//! Takes a `ScenarioConfig` (YAML-facing) and produces the runtime bundle
//! `Scenario` containing:
//! - engine settings (`EngineSettings`)
//! - numerical parameters (`Parameters`)
//! - the jar layout shared by every owner (`JarGeometry`)
//! - the shelf of per-owner jars, loaded with settled marbles
//!
//! With the `viewer` feature the scenario is inserted into Bevy as a
//! `Resource` and ticked by the viewer's systems.

use crate::configuration::config::ScenarioConfig;
use crate::ownership::shelf::JarShelf;
use crate::simulation::error::EngineResult;
use crate::simulation::geometry::JarGeometry;
use crate::simulation::params::Parameters;
use crate::simulation::states::Material;

/// Runtime settings that are not physics
#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub canvas: [f64; 2],   // jar canvas width, height
    pub frame_rate: f64,    // ticks per second for real-time runs
    pub drop_interval: u32, // ticks between queued drops
}

#[cfg_attr(feature = "viewer", derive(bevy::prelude::Resource))]
#[derive(Debug, Clone)]
pub struct Scenario {
    pub engine: EngineSettings,
    pub parameters: Parameters,
    pub jar: JarGeometry,
    pub shelf: JarShelf,
}

impl Scenario {
    pub fn build_scenario(cfg: ScenarioConfig) -> EngineResult<Self> {
        let e_cfg = cfg.engine;
        let engine = EngineSettings {
            canvas: e_cfg.canvas,
            frame_rate: e_cfg.frame_rate,
            drop_interval: e_cfg.drop_interval,
        };

        // Parameters (runtime) from ParametersConfig
        let p_cfg = cfg.parameters;
        let parameters = Parameters {
            radius: p_cfg.radius,
            material: Material {
                restitution: p_cfg.restitution,
                friction: p_cfg.friction,
                gravity: p_cfg.gravity,
            },
            rest_speed: p_cfg.rest_speed,
            rest_frames: p_cfg.rest_frames,
            floor_snap: p_cfg.floor_snap,
            grip: p_cfg.grip,
            pair_scan: e_cfg.pair_scan,
            seed: p_cfg.seed,
        };

        let jar = JarGeometry::from_canvas(engine.canvas[0], engine.canvas[1])?;

        // Shelf: one jar per owner, existing marbles already at rest
        let mut shelf = JarShelf::new(jar, parameters.clone(), engine.drop_interval)?;
        if let Some(user) = cfg.current_user {
            shelf = shelf.with_current_user(user);
        }
        shelf.load(&cfg.owners)?;

        Ok(Self {
            engine,
            parameters,
            jar,
            shelf,
        })
    }
}
