//! Scene synthesis: turns a workspace snapshot (agents + tasks + metrics)
//! into a renderable office scene with activity states, zone routing,
//! target tiles, occupancy, alerts, and a bounded event feed.

pub mod events;
pub mod rules;
pub mod synth;

pub use synth::SceneSynthesizer;
