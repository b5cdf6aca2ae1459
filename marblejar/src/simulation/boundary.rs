//! Jar boundary collisions
//!
//! Three regions, checked in order after integration:
//! - flat floor inside the floor's straight span,
//! - curved bowl wall from `curve_start` down to the floor,
//! - vertical side walls above `curve_start`.
//!
//! Floor and bowl can both fire in the same step; the side walls are only
//! considered when the body is above the bowl.
//!
//! The bowl's half-width at height `y` is `R * sqrt(1 - n^2)` with
//! `n = (y - curve_start) / (bottom - curve_start)`, i.e. the lower half of an
//! ellipse with semi-axes `R` and the curve height, centred at
//! `(center_x, curve_start)`. A penetrating body is moved back along that
//! ellipse's normal, so the correction always points up and inward.

use super::geometry::JarGeometry;
use super::params::Parameters;
use super::states::{Body, NVec2};

/// Newton steps used to pull a body back onto the bowl.
const BOWL_PROJECTION_STEPS: usize = 4;

/// Clamp `body` inside the jar and reflect its velocity on contact.
/// Returns true if any part of the jar was touched.
pub fn resolve_jar_collision(body: &mut Body, jar: &JarGeometry, params: &Parameters) -> bool {
    let on_floor = resolve_floor(body, jar, params.floor_snap);

    let on_side = if body.x.y >= jar.curve_start() {
        resolve_bowl(body, jar, params)
    } else {
        resolve_walls(body, jar)
    };
    on_floor || on_side
}

fn resolve_floor(body: &mut Body, jar: &JarGeometry, floor_snap: f64) -> bool {
    let r = body.radius;
    if body.x.y + r < jar.bottom() {
        return false;
    }

    // Only the straight part of the floor, the rest belongs to the bowl
    let dist_from_center = (body.x.x - jar.center_x()).abs();
    if dist_from_center > jar.curve_radius() - r {
        return false;
    }

    body.x.y = jar.bottom() - r;
    body.v.y *= -body.material.restitution;
    if body.v.y.abs() < floor_snap {
        body.v.y = 0.0;
    }
    true
}

fn resolve_bowl(body: &mut Body, jar: &JarGeometry, params: &Parameters) -> bool {
    let r = body.radius;
    let cx = jar.center_x();
    let dx = body.x.x - cx;

    if dx.abs() + r <= jar.bowl_half_width(body.x.y) {
        return false;
    }

    // Work on the right half; the left is mirrored
    let side = if dx < 0.0 { -1.0 } else { 1.0 };
    let (a, b) = (jar.curve_radius(), jar.curve_height());
    let outer = NVec2::new(dx.abs() + r, body.x.y - jar.curve_start());

    let n = NVec2::new(side * outer.x / (a * a), outer.y / (b * b)).normalize();
    let edge = project_onto_ellipse(outer, a, b);

    body.x.x = cx + side * (edge.x - r).max(0.0);
    // never push the body further down than it already is
    body.x.y = body.x.y.min(jar.curve_start() + edge.y);

    // Only a body moving into the wall is reflected: v' = v - 2 (v.n) n e.
    // A rebound slower than `floor_snap` is dropped and the body slides.
    let vn = body.v.dot(&n);
    if vn > 0.0 {
        let e = body.material.restitution;
        if vn * (2.0 * e - 1.0) < params.floor_snap {
            body.v -= vn * n;
            apply_grip(body, n, vn, params.grip);
        } else {
            body.v -= 2.0 * vn * e * n;
        }
    }
    true
}

/// Move `p` (relative to the ellipse centre, both coordinates >= 0) onto the
/// ellipse with semi-axes `a`, `b` along the gradient of its level set.
fn project_onto_ellipse(mut p: NVec2, a: f64, b: f64) -> NVec2 {
    for _ in 0..BOWL_PROJECTION_STEPS {
        let s = (p.x / a).hypot(p.y / b);
        if s <= 1.0 {
            break;
        }
        let grad = NVec2::new(p.x / (a * a * s), p.y / (b * b * s));
        p -= grad * ((s - 1.0) / grad.norm_squared());
    }
    p
}

fn resolve_walls(body: &mut Body, jar: &JarGeometry) -> bool {
    let r = body.radius;
    let mut hit = false;
    if body.x.x - r <= jar.left() {
        body.x.x = jar.left() + r;
        body.v.x *= -body.material.restitution;
        hit = true;
    }
    if body.x.x + r >= jar.right() {
        body.x.x = jar.right() - r;
        body.v.x *= -body.material.restitution;
        hit = true;
    }
    hit
}

/// Coulomb friction at a contact with unit normal `n`: the tangential
/// velocity loses up to `grip * absorbed`, where `absorbed` is the normal
/// speed the contact just took away.
pub(crate) fn apply_grip(body: &mut Body, n: NVec2, absorbed: f64, grip: f64) {
    let tangent = body.v - body.v.dot(&n) * n;
    let slip = tangent.norm();
    if slip == 0.0 {
        return;
    }
    body.v -= tangent * (slip.min(grip * absorbed) / slip);
}
