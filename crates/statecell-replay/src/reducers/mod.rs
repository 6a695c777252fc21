//! Slice reducers available to the replay tool

pub mod counter;
pub mod todos;

use anyhow::{bail, Result};
use serde_json::Value;
use statecell::ReducerMap;

/// Names of the slices this tool knows how to reduce
pub const KNOWN_SLICES: &[&str] = &["counter", "todos"];

/// Register the reducer of every slice in `slices`
pub fn build(slices: &[String]) -> Result<ReducerMap<String, Value, Value>> {
    if slices.is_empty() {
        bail!("No state slices enabled, expected any of: {}", KNOWN_SLICES.join(", "));
    }

    let mut reducers = ReducerMap::new();
    for slice in slices {
        match slice.as_str() {
            "counter" => reducers.insert(slice.as_str(), counter::reduce),
            "todos" => reducers.insert(slice.as_str(), todos::reduce),
            other => bail!(
                "Unknown state slice '{}', expected any of: {}",
                other,
                KNOWN_SLICES.join(", ")
            ),
        }
    }
    Ok(reducers)
}
