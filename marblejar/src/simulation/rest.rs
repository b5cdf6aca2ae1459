//! Rest detection: a body that stays slow long enough is frozen for good.

use super::boundary::resolve_jar_collision;
use super::geometry::JarGeometry;
use super::params::Parameters;
use super::states::Body;

/// Count a step towards rest, settling the body once it has been slower
/// than `rest_speed` for more than `rest_frames` consecutive steps.
///
/// The pace of a step is the smaller of the body's speed and `moved`, the
/// distance it covered since the step began, pushes from marbles updated
/// before it included. A marble pinned in a crevice picks up speed from
/// gravity every step and is pushed straight back.
///
/// Returns true on the step the body settles.
pub fn observe_rest(body: &mut Body, moved: f64, rest_speed: f64, rest_frames: u32) -> bool {
    if body.settled {
        return false;
    }

    if body.speed().min(moved) >= rest_speed {
        body.rest_frames = 0;
        return false;
    }

    body.rest_frames += 1;
    if body.rest_frames > rest_frames {
        body.settle();
        return true;
    }
    false
}

/// Fix the final resting place of the just-settled body `i`: back inside
/// the jar, then lifted straight up out of any settled marble it still
/// overlaps. Settled marbles never move again.
pub fn seat(bodies: &mut [Body], i: usize, jar: &JarGeometry, params: &Parameters) {
    let mut body = bodies[i].clone();
    resolve_jar_collision(&mut body, jar, params);

    // a lift can push the body into another settled marble above
    for _ in 0..=bodies.len() {
        let mut lifted = false;
        for (j, other) in bodies.iter().enumerate() {
            if j == i || !other.settled {
                continue;
            }
            let reach = body.radius + other.radius;
            let d = other.x - body.x;
            if d.norm() < reach && d.x.abs() < reach {
                body.x.y = other.x.y - (reach * reach - d.x * d.x).sqrt();
                lifted = true;
            }
        }
        if !lifted {
            break;
        }
    }

    bodies[i] = body;
}
