//! Numerical and physical parameters for the simulation
//!
//! `Parameters` holds runtime settings:
//! - default marble radius and material (`radius`, `material`),
//! - rest detection thresholds (`rest_speed`, `rest_frames`),
//! - micro-bounce cutoff for every resting contact (`floor_snap`),
//! - sliding friction against the bowl and resting marbles (`grip`),
//! - pairwise scan policy and spawn seed

use serde::Deserialize;

use super::error::{EngineError, EngineResult};
use super::states::Material;

/// What the pairwise scan does after meeting a pair whose impulse is gated
/// off (the other body is coming toward the one being resolved).
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PairScan {
    /// Skip only that pair's impulse and keep exchanging impulses with the
    /// remaining bodies.
    #[serde(rename = "continue")]
    Continue,

    /// No more impulses for the current body this step. Later pairs are
    /// still pushed apart.
    #[default]
    #[serde(rename = "short_circuit")]
    ShortCircuit,
}

#[derive(Debug, Clone)]
pub struct Parameters {
    pub radius: f64,         // default marble radius
    pub material: Material,  // default marble material
    pub rest_speed: f64,     // speed below which a step counts as resting
    pub rest_frames: u32,    // resting steps tolerated before settling
    pub floor_snap: f64,     // rebound speeds below this are zeroed
    pub grip: f64,           // Coulomb coefficient for sliding contacts
    pub pair_scan: PairScan, // gated-pair policy
    pub seed: u64,           // deterministic spawn seed
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            radius: 10.0,
            material: Material::default(),
            rest_speed: 0.1,
            rest_frames: 30,
            floor_snap: 0.5,
            grip: 2.0,
            pair_scan: PairScan::ShortCircuit,
            seed: 42,
        }
    }
}

impl Parameters {
    /// Reject values that would break the collision or rest logic.
    pub fn validate(&self) -> EngineResult<()> {
        let bad = |name: &'static str, value: f64| Err(EngineError::InvalidParameter { name, value });

        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(EngineError::InvalidRadius(self.radius));
        }
        validate_material(&self.material)?;
        if !(self.rest_speed.is_finite() && self.rest_speed >= 0.0) {
            return bad("rest_speed", self.rest_speed);
        }
        if !(self.floor_snap.is_finite() && self.floor_snap >= 0.0) {
            return bad("floor_snap", self.floor_snap);
        }
        if !(self.grip.is_finite() && self.grip >= 0.0) {
            return bad("grip", self.grip);
        }
        Ok(())
    }
}

/// Restitution in [0, 1], friction in (0, 1], gravity finite and >= 0.
pub fn validate_material(m: &Material) -> EngineResult<()> {
    let bad = |name: &'static str, value: f64| Err(EngineError::InvalidParameter { name, value });

    if !(0.0..=1.0).contains(&m.restitution) {
        return bad("restitution", m.restitution);
    }
    if !(m.friction > 0.0 && m.friction <= 1.0) {
        return bad("friction", m.friction);
    }
    if !(m.gravity.is_finite() && m.gravity >= 0.0) {
        return bad("gravity", m.gravity);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(Parameters::default().validate().is_ok());
    }

    #[test]
    fn rejects_out_of_range_values() {
        let mut p = Parameters::default();
        p.radius = 0.0;
        assert_eq!(p.validate(), Err(EngineError::InvalidRadius(0.0)));

        let mut p = Parameters::default();
        p.material.restitution = 1.5;
        assert!(matches!(
            p.validate(),
            Err(EngineError::InvalidParameter { name: "restitution", .. })
        ));

        let mut p = Parameters::default();
        p.material.friction = 0.0;
        assert!(p.validate().is_err());

        let mut p = Parameters::default();
        p.rest_speed = f64::NAN;
        assert!(p.validate().is_err());

        let mut p = Parameters::default();
        p.grip = -1.0;
        assert!(matches!(p.validate(), Err(EngineError::InvalidParameter { name: "grip", .. })));
    }
}
