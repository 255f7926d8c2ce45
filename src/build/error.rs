//! Error kinds produced by the build cycle.
//!
//! None of these cross the public operation boundary of the controller except
//! through `BuildController::new`; every other operation logs the error where
//! it is detected and abandons the call.
use std::fmt;

/// A collaborator the build cycle needs but could not obtain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dependency {
    Camera,
    Pawn,
    World,
    Mesh,
    Material,
    Preview,
    Scheduler,
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Dependency::Camera => "camera",
            Dependency::Pawn => "pawn",
            Dependency::World => "world",
            Dependency::Mesh => "preview mesh",
            Dependency::Material => "preview material",
            Dependency::Preview => "preview visual",
            Dependency::Scheduler => "scheduler",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BuildError {
    /// Camera, pawn, world, asset or preview unavailable.
    MissingDependency(Dependency),
    /// Degenerate trace input or output (zero direction, non-finite hit, ...).
    InvalidGeometry(&'static str),
    /// The object factory refused to spawn.
    SpawnRejected,
    /// Construction-time configuration is unusable.
    InvalidConfig(String),
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildError::MissingDependency(dep) => write!(f, "{dep} is unavailable"),
            BuildError::InvalidGeometry(what) => write!(f, "invalid geometry: {what}"),
            BuildError::SpawnRejected => f.write_str("object factory rejected the spawn"),
            BuildError::InvalidConfig(msg) => write!(f, "invalid build config: {msg}"),
        }
    }
}

impl std::error::Error for BuildError {}

impl From<Dependency> for BuildError {
    fn from(dep: Dependency) -> Self {
        BuildError::MissingDependency(dep)
    }
}
