pub mod scene;
pub mod simulate;
pub mod sprite;

use anyhow::Context;
use serde::de::DeserializeOwned;
use std::path::Path;

use fb_core::layout::FloorPlan;

/// Read and parse a JSON file.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

/// Load the floor plan from TOML, or fall back to the built-in office.
pub fn load_plan(path: Option<&Path>) -> anyhow::Result<FloorPlan> {
    match path {
        Some(path) => FloorPlan::load_from(path)
            .with_context(|| format!("loading floor plan {}", path.display())),
        None => Ok(FloorPlan::default()),
    }
}

/// Serialize a value to stdout as JSON.
pub fn print_json<T: serde::Serialize>(value: &T, pretty: bool) -> anyhow::Result<()> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", text);
    Ok(())
}
