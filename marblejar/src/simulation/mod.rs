pub mod states;
pub mod color;
pub mod params;
pub mod error;
pub mod geometry;
pub mod integrator;
pub mod boundary;
pub mod collisions;
pub mod rest;
pub mod spawner;
pub mod scheduler;
pub mod engine;
pub mod scenario;
