//! Marble-marble contact
//!
//! Direct O(n^2) scan: each active body checks every other body in
//! container order. Positional correction is split 50/50 between two active
//! bodies. A settled body is a static obstacle and takes none of it, and so
//! is an active one that is already resting on something and sits under the
//! body being resolved.

use super::boundary::apply_grip;
use super::params::{PairScan, Parameters};
use super::states::{Body, NVec2};

/// Minimum downward component of the contact normal for a supported active
/// marble to carry the one above it like a settled one would.
const SUPPORT_SLOPE: f64 = 0.3;

/// Outcome of resolving one pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    /// Not touching, or centres coincide
    None,
    /// Overlap corrected, velocities updated where needed
    Resolved,
    /// Overlap corrected, `other` still coming toward `this`; no impulse
    Approaching,
}

/// Resolve body `i` against every other body in `bodies`.
///
/// Marks body `i` as supported when it leans on a settled marble or a
/// carrying one.
pub fn resolve_collisions(bodies: &mut [Body], i: usize, params: &Parameters) {
    let mut impulses = true;

    for j in 0..bodies.len() {
        if j == i {
            continue;
        }

        let (this, other) = pair_mut(bodies, i, j);
        if other.settled || carries(other, this) {
            if resolve_static(this, other, params) != Contact::None {
                this.supported = true;
            }
            continue;
        }

        if !impulses {
            push_apart(this, other);
            continue;
        }
        let contact = resolve_pair(this, other);
        if contact == Contact::Approaching && params.pair_scan == PairScan::ShortCircuit {
            impulses = false;
        }
    }
}

/// Resolve overlap between two active bodies.
///
/// The normal `n` points from `this` to `other`, and each body is pushed
/// half the overlap along it. With `speed = (v_other - v_this) . n`, a
/// negative speed means `other` is still coming in and the pair only gets
/// the push. Otherwise `this` gains `speed * e * n` and `other` loses the
/// same, `e` being the restitution of `this` (equal masses assumed).
pub fn resolve_pair(this: &mut Body, other: &mut Body) -> Contact {
    let Some(n) = push_apart(this, other) else {
        return Contact::None;
    };

    let speed = (other.v - this.v).dot(&n);
    if speed < 0.0 {
        return Contact::Approaching;
    }

    let impulse = speed * this.material.restitution * n;
    this.v += impulse;
    other.v -= impulse;
    Contact::Resolved
}

/// Resolve overlap between an active body and one that does not move.
///
/// `this` takes the whole correction. If it is moving into the obstacle the
/// normal velocity is reflected with its restitution, the rebound is dropped
/// when slower than `floor_snap`, and the sliding velocity loses up to
/// `grip` times the absorbed normal speed.
pub fn resolve_static(this: &mut Body, obstacle: &Body, params: &Parameters) -> Contact {
    let Some((n, overlap)) = penetration(this, obstacle) else {
        return Contact::None;
    };

    this.x -= overlap * n;

    let vn = this.v.dot(&n);
    if vn > 0.0 {
        let mut rebound = vn * this.material.restitution;
        if rebound < params.floor_snap {
            rebound = 0.0;
        }
        this.v -= (vn + rebound) * n;
        apply_grip(this, n, vn, params.grip);
    }
    Contact::Resolved
}

/// Split the overlap 50/50. Returns the normal from `this` to `other`.
fn push_apart(this: &mut Body, other: &mut Body) -> Option<NVec2> {
    let (n, overlap) = penetration(this, other)?;

    let push = 0.5 * overlap * n;
    this.x -= push;
    other.x += push;
    Some(n)
}

/// `carrier` is resting on something and sits under `load` steeply enough
/// to hold it up.
fn carries(carrier: &Body, load: &Body) -> bool {
    if !carrier.supported {
        return false;
    }
    let d = carrier.x - load.x;
    let dist = d.norm();
    dist > 0.0 && d.y / dist > SUPPORT_SLOPE
}

/// Unit normal from `this` to `other` and the overlap depth, if touching.
/// Coincident centres have no usable normal and are skipped.
fn penetration(this: &Body, other: &Body) -> Option<(NVec2, f64)> {
    let d = other.x - this.x;
    let dist = d.norm();
    let min_dist = this.radius + other.radius;

    if dist <= 0.0 || dist >= min_dist {
        return None;
    }
    Some((d / dist, min_dist - dist))
}

/// Two distinct mutable elements of a slice.
fn pair_mut(bodies: &mut [Body], i: usize, j: usize) -> (&mut Body, &mut Body) {
    debug_assert_ne!(i, j);
    if i < j {
        let (lo, hi) = bodies.split_at_mut(j);
        (&mut lo[i], &mut hi[0])
    } else {
        let (lo, hi) = bodies.split_at_mut(i);
        (&mut hi[0], &mut lo[j])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::color::Rgb;
    use crate::simulation::states::{BodyId, Material};
    use approx::assert_relative_eq;

    fn body(id: u64, x: f64, y: f64, vx: f64, vy: f64) -> Body {
        Body {
            id: BodyId(id),
            x: NVec2::new(x, y),
            v: NVec2::new(vx, vy),
            radius: 10.0,
            material: Material::default(),
            color: Rgb::default(),
            settled: false,
            supported: false,
            rest_frames: 0,
        }
    }

    fn params() -> Parameters {
        Parameters::default()
    }

    #[test]
    fn head_on_pair_is_only_pushed_apart() {
        let mut a = body(1, 0.0, 0.0, 1.0, 0.0);
        let mut b = body(2, 15.0, 0.0, -1.0, 0.0);

        assert_eq!(resolve_pair(&mut a, &mut b), Contact::Approaching);

        assert_relative_eq!((b.x - a.x).norm(), 20.0, epsilon = 1e-12);
        assert_relative_eq!(a.x.x, -2.5, epsilon = 1e-12);
        assert_eq!(a.v, NVec2::new(1.0, 0.0));
        assert_eq!(b.v, NVec2::new(-1.0, 0.0));
    }

    #[test]
    fn pair_moving_apart_exchanges_impulse() {
        let mut a = body(1, 0.0, 0.0, -1.0, 0.0);
        let mut b = body(2, 15.0, 0.0, 1.0, 0.0);

        assert_eq!(resolve_pair(&mut a, &mut b), Contact::Resolved);
        // speed 2, e = 0.6
        assert_relative_eq!(a.v.x, -1.0 + 1.2, epsilon = 1e-12);
        assert_relative_eq!(b.v.x, 1.0 - 1.2, epsilon = 1e-12);
        assert_relative_eq!((b.x - a.x).norm(), 20.0, epsilon = 1e-12);
    }

    #[test]
    fn impulse_uses_considering_body_restitution() {
        let mut a = body(1, 0.0, 0.0, -1.0, 0.0);
        let mut b = body(2, 15.0, 0.0, 1.0, 0.0);
        a.material.restitution = 0.5;
        b.material.restitution = 1.0;

        resolve_pair(&mut a, &mut b);
        assert_relative_eq!(a.v.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(b.v.x, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn coincident_centres_are_skipped() {
        let mut a = body(1, 5.0, 5.0, 1.0, 0.0);
        let mut b = body(2, 5.0, 5.0, 0.0, 0.0);

        assert_eq!(resolve_pair(&mut a, &mut b), Contact::None);
        assert_eq!(a.x, b.x);
    }

    #[test]
    fn settled_obstacle_does_not_move() {
        let a = body(1, 0.0, 0.0, 0.0, 0.49);
        let mut b = body(2, 0.0, 19.5, 0.0, 0.0);
        b.settle();

        let mut bodies = vec![a, b];
        resolve_collisions(&mut bodies, 0, &params());
        let (a, b) = (&bodies[0], &bodies[1]);

        assert_eq!(b.x, NVec2::new(0.0, 19.5));
        assert_relative_eq!((b.x - a.x).norm(), 20.0, epsilon = 1e-12);
        assert!(a.supported);
        // slow approach is absorbed entirely
        assert_relative_eq!(a.v.norm(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn floor_snap_also_governs_settled_obstacles() {
        let a = body(1, 0.0, 0.0, 0.0, 0.49);
        let mut b = body(2, 0.0, 19.5, 0.0, 0.0);
        b.settle();
        let mut p = params();
        p.floor_snap = 0.2;

        let mut bodies = vec![a, b];
        resolve_collisions(&mut bodies, 0, &p);
        // rebound 0.294 is above the lowered cutoff, so it survives
        assert_relative_eq!(bodies[0].v.y, -0.49 * 0.6, epsilon = 1e-12);
    }

    #[test]
    fn fast_hit_on_settled_obstacle_rebounds() {
        let mut a = body(1, 0.0, 0.0, 0.0, 10.0);
        let mut b = body(2, 0.0, 15.0, 0.0, 0.0);
        b.settle();

        assert_eq!(resolve_static(&mut a, &b, &params()), Contact::Resolved);
        assert_relative_eq!(a.v.y, -6.0, epsilon = 1e-12);
        assert_relative_eq!(a.x.y, -5.0, epsilon = 1e-12);
    }

    #[test]
    fn grip_slows_sliding_over_an_obstacle() {
        let mut a = body(1, 0.0, 0.0, 3.0, 1.0);
        let mut b = body(2, 0.0, 15.0, 0.0, 0.0);
        b.settle();

        resolve_static(&mut a, &b, &params());
        // normal: 1 in, 0.6 back out; sliding 3 loses 2 * 1
        assert_relative_eq!(a.v.y, -0.6, epsilon = 1e-12);
        assert_relative_eq!(a.v.x, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn supported_marble_below_carries_the_one_above() {
        let mut below = body(1, 0.0, 15.0, 0.0, 0.0);
        below.supported = true;
        let mut beside = body(2, 15.0, -20.0, 0.0, 0.0);
        beside.supported = true;

        // straight below: static, takes no push
        let mut bodies = vec![body(0, 0.0, 0.0, 0.0, 1.0), below];
        resolve_collisions(&mut bodies, 0, &params());
        assert_eq!(bodies[1].x, NVec2::new(0.0, 15.0));
        assert_relative_eq!(bodies[0].x.y, -5.0, epsilon = 1e-12);
        assert!(bodies[0].supported);

        // level with it: shared 50/50 like any active pair
        let mut bodies = vec![body(0, 0.0, -20.0, 0.0, 0.0), beside];
        resolve_collisions(&mut bodies, 0, &params());
        assert_relative_eq!(bodies[1].x.x, 17.5, epsilon = 1e-12);
        assert!(!bodies[0].supported);
    }

    #[test]
    fn scan_policy_controls_impulses_after_a_gated_pair() {
        // body 1 coming toward body 0, body 2 moving away from it
        let make = || {
            vec![
                body(0, 100.0, 100.0, 0.0, 0.0),
                body(1, 85.0, 100.0, 2.0, 0.0),
                body(2, 115.0, 100.0, 2.0, 0.0),
            ]
        };
        let p = |pair_scan| Parameters {
            pair_scan,
            ..Parameters::default()
        };

        let mut cont = make();
        resolve_collisions(&mut cont, 0, &p(PairScan::Continue));
        assert_relative_eq!(cont[0].v.x, 1.2, epsilon = 1e-12);
        assert_relative_eq!(cont[2].v.x, 0.8, epsilon = 1e-12);

        let mut stop = make();
        resolve_collisions(&mut stop, 0, &p(PairScan::ShortCircuit));
        assert_eq!(stop[0].v.x, 0.0);
        assert_eq!(stop[2].v.x, 2.0);
        // still pushed apart
        assert_relative_eq!((stop[2].x - stop[0].x).norm(), 20.0, epsilon = 1e-12);
    }
}
