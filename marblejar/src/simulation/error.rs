//! Error types for the marble engine.

use thiserror::Error;

use super::states::BodyId;

/// Rejected jar geometry. The engine never holds a geometry that failed
/// these checks, so the collision math can assume a well-formed jar.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    /// One of the bounds is NaN or infinite.
    #[error("Jar bounds must be finite (left={left}, right={right}, bottom={bottom}, curve_start={curve_start})")]
    NonFinite {
        left: f64,
        right: f64,
        bottom: f64,
        curve_start: f64,
    },

    /// Horizontal extent is empty or inverted.
    #[error("Invalid jar extent: left={left} must be less than right={right}")]
    InvalidExtent { left: f64, right: f64 },

    /// The curved section starts at or below the floor.
    #[error("Invalid jar curve: curve_start={curve_start} must be above bottom={bottom}")]
    InvalidCurve { curve_start: f64, bottom: f64 },

    /// Canvas too small to leave any room inside the jar margins.
    #[error("Canvas {width}x{height} is too small for a jar")]
    CanvasTooSmall { width: f64, height: f64 },
}

/// Errors surfaced by simulation operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// A spawn request reused an id that is already in the jar.
    #[error("Body id {0} is already present")]
    DuplicateId(BodyId),

    /// Body radius must be strictly positive and finite.
    #[error("Invalid body radius: {0}")]
    InvalidRadius(f64),

    /// Colour literal that is not `#RRGGBB`.
    #[error("Invalid colour literal: {0:?}")]
    InvalidColor(String),

    /// A physical parameter outside its allowed range.
    #[error("Invalid parameter {name}: {value}")]
    InvalidParameter { name: &'static str, value: f64 },
}

/// Result type for engine operations.
pub type EngineResult<T> = std::result::Result<T, EngineError>;
