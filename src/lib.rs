pub mod board;
pub mod chain;
pub mod constants;
pub mod detection;
pub mod error;
pub mod graph;
pub mod grid;
pub mod location;
pub mod placement;
pub mod planner;
pub mod registry;
pub mod spatial;
pub mod structure;

pub use board::{Board, StructureSpec};
pub use error::{PlannerError, PlannerResult};
pub use location::Location;
pub use planner::{plan_markers, Planner, PlannerBuilder, PlannerConfig};
pub use structure::StructureType;
