pub mod simulation;
pub mod configuration;
pub mod ownership;
#[cfg(feature = "viewer")]
pub mod visualization;
pub mod benchmark;

pub use simulation::states::{Body, BodyId, BodySnapshot, BodySpec, Material, NVec2};
pub use simulation::color::{Rgb, PALETTE};
pub use simulation::error::{EngineError, EngineResult, GeometryError};
pub use simulation::geometry::JarGeometry;
pub use simulation::params::{PairScan, Parameters};
pub use simulation::engine::Simulation;
pub use simulation::scheduler::{FrameClock, Scheduler, StepBudget, UntilSettled};
pub use simulation::scenario::{EngineSettings, Scenario};

pub use configuration::config::{EngineConfig, ParametersConfig, ScenarioConfig};

pub use ownership::changes::{detect_changes, OwnershipChanges, OwnershipCounts};
pub use ownership::shelf::{JarShelf, OwnerJar};

#[cfg(feature = "viewer")]
pub use visualization::jar_vis2d::run_2d;

pub use benchmark::benchmark::{bench_step, bench_step_curve};
