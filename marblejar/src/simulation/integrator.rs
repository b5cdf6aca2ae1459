//! Fixed-step integrator for a single marble
//!
//! One step is one animation frame, so velocities are in units per step and
//! no `dt` appears in the update.

use super::states::Body;

/// Advance one body by one step using semi-implicit Euler.
/// Gravity kicks the velocity first, the position drifts with the new
/// velocity, then friction decays the velocity for the next step.
/// Settled bodies are left untouched.
pub fn euler_step(body: &mut Body) {
    if body.settled {
        return;
    }

    // Kick: v_y += g
    body.v.y += body.material.gravity;

    // Drift: x_n+1 = x_n + v
    body.x += body.v;

    // Friction is applied after the velocity was used for this step's move
    body.v *= body.material.friction;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::color::Rgb;
    use crate::simulation::states::{BodyId, Material, NVec2};
    use approx::assert_relative_eq;

    fn body(vx: f64, vy: f64) -> Body {
        Body {
            id: BodyId(1),
            x: NVec2::new(50.0, 50.0),
            v: NVec2::new(vx, vy),
            radius: 10.0,
            material: Material::default(),
            color: Rgb::default(),
            settled: false,
            supported: false,
            rest_frames: 0,
        }
    }

    #[test]
    fn velocity_updates_before_position() {
        let mut b = body(2.0, 1.0);
        euler_step(&mut b);

        // moved by the gravity-kicked velocity, not the decayed one
        assert_relative_eq!(b.x.x, 52.0);
        assert_relative_eq!(b.x.y, 51.5);
        assert_relative_eq!(b.v.x, 2.0 * 0.98);
        assert_relative_eq!(b.v.y, 1.5 * 0.98);
    }

    #[test]
    fn settled_body_is_frozen() {
        let mut b = body(0.0, 0.0);
        b.settled = true;
        euler_step(&mut b);

        assert_eq!(b.x, NVec2::new(50.0, 50.0));
        assert_eq!(b.v, NVec2::zeros());
    }
}
