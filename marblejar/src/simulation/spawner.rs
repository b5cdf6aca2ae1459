//! Seeded placement of new marbles.
//!
//! Drops come in above the jar with a little random horizontal and downward
//! velocity; stacks lay out pre-settled marbles in rows from the floor up.
//! Same seed, same sequence of calls, same positions.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::geometry::JarGeometry;
use super::states::BodySpec;

/// Height above the canvas top at which drops appear.
pub const DROP_Y: f64 = -20.0;
/// Horizontal inset from the walls for drops.
const DROP_INSET: f64 = 20.0;

#[derive(Debug, Clone)]
pub struct Spawner {
    rng: StdRng,
}

impl Spawner {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// A marble dropped in from above the jar.
    pub fn drop_spec(&mut self, jar: &JarGeometry) -> BodySpec {
        let span = (jar.width() - 2.0 * DROP_INSET).max(0.0);
        let x = jar.left() + DROP_INSET + self.rng.gen::<f64>() * span;
        let vx = (self.rng.gen::<f64>() - 0.5) * 2.0;
        let vy = self.rng.gen::<f64>() * 2.0;

        BodySpec::at(x, DROP_Y).with_velocity(vx, vy)
    }

    /// Resting positions for `count` marbles of `radius` already in the jar.
    ///
    /// Rows are one diameter apart starting on the floor, and every row holds
    /// as many marbles as fit between the walls (or the bowl) at its height,
    /// at least a diameter apart. Rows fill bottom-up; the order within a row
    /// is shuffled so a partial top row lands at random slots.
    pub fn stack_specs(&mut self, jar: &JarGeometry, radius: f64, count: usize) -> Vec<BodySpec> {
        let mut specs = Vec::with_capacity(count);
        let mut row = 0;
        while specs.len() < count {
            let y = jar.bottom() - radius - 2.0 * radius * row as f64;
            let mut slots = row_slots(jar, radius, y);
            slots.shuffle(&mut self.rng);
            specs.extend(
                slots
                    .into_iter()
                    .take(count - specs.len())
                    .map(|x| BodySpec::at(x, y)),
            );
            row += 1;
        }
        specs
    }
}

/// Centres of evenly spaced marbles across the jar at height `y`.
fn row_slots(jar: &JarGeometry, radius: f64, y: f64) -> Vec<f64> {
    let wall = if y >= jar.curve_start() {
        jar.bowl_half_width(y)
    } else {
        0.5 * jar.width()
    };
    let half = (wall - radius).max(0.0);

    let gaps = (half / radius).floor() as usize;
    if gaps == 0 {
        return vec![jar.center_x()];
    }
    let step = 2.0 * half / gaps as f64;
    (0..=gaps).map(|k| jar.center_x() - half + step * k as f64).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_land_inside_the_mouth() {
        let jar = JarGeometry::default();
        let mut s = Spawner::new(7);
        for _ in 0..100 {
            let spec = s.drop_spec(&jar);
            assert!(spec.x.x >= jar.left() + 20.0 && spec.x.x <= jar.right() - 20.0);
            assert_eq!(spec.x.y, DROP_Y);
            assert!(spec.v.x.abs() <= 1.0);
            assert!((0.0..2.0).contains(&spec.v.y));
        }
    }

    #[test]
    fn same_seed_same_drops() {
        let jar = JarGeometry::default();
        let mut a = Spawner::new(3);
        let mut b = Spawner::new(3);
        for _ in 0..10 {
            assert_eq!(a.drop_spec(&jar), b.drop_spec(&jar));
        }
    }

    #[test]
    fn stacks_rise_from_the_floor() {
        let jar = JarGeometry::default();
        let specs = Spawner::new(1).stack_specs(&jar, 10.0, 4);
        assert_eq!(specs.len(), 4);

        // bottom row at 280 fits three marbles, the fourth starts the next row
        let mut ys: Vec<f64> = specs.iter().map(|s| s.x.y).collect();
        ys.dedup();
        assert_eq!(ys, vec![280.0, 260.0]);
    }

    #[test]
    fn stacked_marbles_fit_the_jar_without_overlap() {
        let jar = JarGeometry::default();
        let r = 10.0;
        let specs = Spawner::new(5).stack_specs(&jar, r, 60);
        assert_eq!(specs.len(), 60);

        for s in &specs {
            let (x, y) = (s.x.x, s.x.y);
            assert!(y <= jar.bottom() - r + 1e-9);
            assert!(x - r >= jar.left() - 1e-9 && x + r <= jar.right() + 1e-9);
            if y >= jar.curve_start() {
                assert!((x - jar.center_x()).abs() + r <= jar.bowl_half_width(y) + 1e-9, "({x}, {y}) pokes out of the bowl");
            }
        }
        for (i, a) in specs.iter().enumerate() {
            for b in &specs[i + 1..] {
                assert!((a.x - b.x).norm() >= 2.0 * r - 1e-9, "{:?} overlaps {:?}", a.x, b.x);
            }
        }
    }
}
