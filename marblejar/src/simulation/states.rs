//! Core state types for the marble simulation.
//!
//! - `Body`: one marble (position, velocity, radius, material, rest state)
//! - `Material`: per-body bounce / friction / gravity coefficients
//! - `BodySpec`: spawn request, turned into a `Body` by the simulation
//! - `BodySnapshot`: flat view handed to renderers and persistence
//!
//! World units are canvas pixels with y growing downward.

use std::fmt;

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use super::color::Rgb;

pub type NVec2 = Vector2<f64>;

/// Opaque identity of a body, stable for its lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BodyId(pub u64);

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Material coefficients applied every step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub restitution: f64, // bounce coefficient
    pub friction: f64,    // velocity decay factor per step
    pub gravity: f64,     // downward acceleration per step^2
}

impl Default for Material {
    fn default() -> Self {
        Self {
            restitution: 0.6,
            friction: 0.98,
            gravity: 0.5,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Body {
    pub id: BodyId,
    pub x: NVec2, // position
    pub v: NVec2, // velocity
    pub radius: f64,
    pub material: Material,
    pub color: Rgb,
    pub settled: bool,    // frozen, excluded from updates
    pub supported: bool,  // touched the jar or a resting marble in its last update
    pub rest_frames: u32, // consecutive slow steps
}

impl Body {
    pub fn speed(&self) -> f64 {
        self.v.norm()
    }

    /// Freeze the body in place.
    pub fn settle(&mut self) {
        self.settled = true;
        self.v = NVec2::zeros();
    }

    pub fn snapshot(&self) -> BodySnapshot {
        BodySnapshot {
            id: self.id,
            x: self.x.x,
            y: self.x.y,
            radius: self.radius,
            color: self.color,
            settled: self.settled,
        }
    }
}

/// Spawn request. Only the position is required; everything else falls back
/// to what the simulation picks (next id, palette colour, default radius and
/// material, zero velocity).
#[derive(Debug, Clone, PartialEq)]
pub struct BodySpec {
    pub x: NVec2,
    pub v: NVec2,
    pub id: Option<BodyId>,
    pub color: Option<Rgb>,
    pub radius: Option<f64>,
    pub material: Option<Material>,
}

impl BodySpec {
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            x: NVec2::new(x, y),
            v: NVec2::zeros(),
            id: None,
            color: None,
            radius: None,
            material: None,
        }
    }

    #[must_use]
    pub fn with_velocity(mut self, vx: f64, vy: f64) -> Self {
        self.v = NVec2::new(vx, vy);
        self
    }

    #[must_use]
    pub fn with_id(mut self, id: BodyId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: Rgb) -> Self {
        self.color = Some(color);
        self
    }

    #[must_use]
    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = Some(radius);
        self
    }

    #[must_use]
    pub fn with_material(mut self, material: Material) -> Self {
        self.material = Some(material);
        self
    }
}

/// Per-body state exposed to rendering and persistence collaborators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodySnapshot {
    pub id: BodyId,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub color: Rgb,
    pub settled: bool,
}
