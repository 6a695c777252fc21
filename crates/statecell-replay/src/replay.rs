//! Feeding an action log through a store

use crate::reducers;
use anyhow::{Context, Result};
use serde_json::Value;
use statecell::middleware::{apply_middleware, LoggingMiddleware, Middleware};
use statecell::{combine_reducers, Store, StoreBuilder};
use statecell_config::ReplayConfig;
use std::collections::BTreeMap;
use std::io::BufRead;

/// Combined state: one JSON value per slice
pub type AppState = BTreeMap<String, Value>;

/// Outcome of a replay
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReplaySummary {
    pub dispatched: usize,
    pub rejected: usize,
}

/// Build the store for the slices enabled in `config`
pub fn build_store(config: &ReplayConfig) -> Result<Store<AppState, Value>> {
    let reducer = combine_reducers(reducers::build(&config.slices)?);

    let mut builder = StoreBuilder::new(reducer);
    if config.log_actions {
        let middleware: Vec<Box<dyn Middleware<AppState, Value>>> =
            vec![Box::new(LoggingMiddleware::new())];
        builder = builder.enhancer(apply_middleware(middleware));
    }
    Ok(builder.build())
}

/// Dispatch every action read from `reader`
///
/// One JSON action per line. Blank lines and lines starting with `#` are
/// skipped. Lines that are not valid JSON, or that the store rejects, are
/// logged with their line number and counted as rejected.
pub fn replay(reader: impl BufRead, store: &Store<AppState, Value>) -> Result<ReplaySummary> {
    let mut summary = ReplaySummary::default();

    for (index, line) in reader.lines().enumerate() {
        let line_number = index + 1;
        let line = line.with_context(|| format!("Failed to read line {}", line_number))?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let action: Value = match serde_json::from_str(line) {
            Ok(action) => action,
            Err(e) => {
                log::warn!("Line {}: invalid JSON: {}", line_number, e);
                summary.rejected += 1;
                continue;
            }
        };

        match store.dispatch(action) {
            Ok(_) => summary.dispatched += 1,
            Err(e) => {
                log::warn!("Line {}: {}", line_number, e);
                summary.rejected += 1;
            }
        }
    }

    Ok(summary)
}

/// Render a state as JSON
pub fn render(state: &AppState, pretty: bool) -> Result<String> {
    let rendered = if pretty {
        serde_json::to_string_pretty(state)
    } else {
        serde_json::to_string(state)
    };
    rendered.context("Failed to render state")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::io::Cursor;

    const ACTIONS: &str = r#"
# warm up
{"type": "INCREMENT"}
{"type": "INCREMENT", "amount": 4}
{"type": "ADD_TODO", "text": "replay the log"}

42
{"no_type": true}
not json
{"type": "TOGGLE_TODO", "id": 1}
"#;

    fn config(slices: &[&str]) -> ReplayConfig {
        ReplayConfig {
            slices: slices.iter().map(|s| s.to_string()).collect(),
            ..ReplayConfig::default()
        }
    }

    #[test]
    fn test_replay_counts_and_state() {
        let store = build_store(&config(&["counter", "todos"])).unwrap();

        let summary = replay(Cursor::new(ACTIONS), &store).unwrap();

        assert_eq!(
            summary,
            ReplaySummary {
                dispatched: 4,
                rejected: 3
            }
        );
        let state = store.get_state().unwrap();
        assert_eq!(state["counter"], json!(5));
        assert_eq!(
            state["todos"],
            json!([{ "id": 1, "text": "replay the log", "done": true }])
        );
    }

    #[test]
    fn test_only_enabled_slices_in_state() {
        let store = build_store(&config(&["todos"])).unwrap();
        replay(Cursor::new(ACTIONS), &store).unwrap();

        let state = store.get_state().unwrap();
        assert_eq!(state.keys().collect::<Vec<_>>(), vec!["todos"]);
    }

    #[test]
    fn test_replay_without_logging_middleware() {
        let config = ReplayConfig {
            log_actions: false,
            ..config(&["counter"])
        };
        let store = build_store(&config).unwrap();

        replay(Cursor::new("{\"type\": \"DECREMENT\"}\n"), &store).unwrap();

        assert_eq!(store.get_state().unwrap()["counter"], json!(-1));
    }

    #[test]
    fn test_initial_state_is_bootstrapped() {
        let store = build_store(&config(&["counter", "todos"])).unwrap();
        let state = store.get_state().unwrap();

        assert_eq!(render(&state, false).unwrap(), r#"{"counter":0,"todos":[]}"#);
    }
}
