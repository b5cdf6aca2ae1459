use std::time::Instant;

use crate::simulation::engine::Simulation;
use crate::simulation::error::EngineResult;
use crate::simulation::geometry::JarGeometry;
use crate::simulation::params::Parameters;
use crate::simulation::states::BodySpec;

/// Helper to build a jar holding `n` falling marbles
/// Positions are deterministic, no rand needed
fn make_simulation(n: usize) -> EngineResult<Simulation> {
    // widen the jar with n so marbles start roughly ten per row
    let width = 250.0_f64.max(25.0 * (n as f64).sqrt() * 3.0);
    let height = 300.0 + 2.5 * n as f64;
    let jar = JarGeometry::from_canvas(width, height)?;
    let mut sim = Simulation::new(jar, Parameters::default())?;

    let cols = ((jar.width() - 40.0) / 22.0).floor().max(1.0) as usize;
    for i in 0..n {
        let i_f = i as f64;
        let x = jar.left() + 20.0 + (i % cols) as f64 * 22.0 + (i_f * 0.37).sin();
        let y = -20.0 - (i / cols) as f64 * 22.0;
        let spec = BodySpec::at(x, y).with_velocity((i_f * 0.13).cos(), 0.0);
        sim.spawn(spec)?;
    }
    Ok(sim)
}

/// Time `Simulation::step` for a range of marble counts
pub fn bench_step() -> EngineResult<()> {
    let ns = [10, 20, 40, 80, 160];
    let steps = 600; // ten seconds of frames at 60 Hz

    for n in ns {
        let mut sim = make_simulation(n)?;

        // Warm up
        sim.step();

        let t0 = Instant::now();
        for _ in 0..steps {
            sim.step();
        }
        let per_step = t0.elapsed().as_secs_f64() / steps as f64;

        println!(
            "N = {n:4}, step = {:10.3} us, settled = {:4}",
            per_step * 1.0e6,
            n - sim.active_count()
        );
    }
    Ok(())
}

/// Per-step cost against marble count, as CSV
/// Paste output directly into a spreadsheet to graph
pub fn bench_step_curve() -> EngineResult<()> {
    println!("N,step_us");

    for n in (10..=200).step_by(10) {
        let mut sim = make_simulation(n)?;
        let steps = 120;

        let t0 = Instant::now();
        for _ in 0..steps {
            sim.step();
        }
        let us = t0.elapsed().as_secs_f64() * 1.0e6 / steps as f64;

        println!("{},{:.3}", n, us);
    }
    Ok(())
}
