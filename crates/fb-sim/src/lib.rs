//! Movement simulation: a walkability grid with BFS pathfinding and a
//! tick-driven engine that walks agents toward their scene targets without
//! ever letting two of them share a tile.

pub mod engine;
pub mod grid;

pub use engine::{RenderedAgent, SimAgent, Simulation, SimulationState};
pub use grid::Grid;
