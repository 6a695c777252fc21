use serde_json::{json, Value};

/// Counter slice
///
/// - `INCREMENT` / `DECREMENT` by `amount` (default 1)
/// - `RESET` back to zero
pub fn reduce(state: Option<&Value>, action: &Value) -> Value {
    let count = state.and_then(Value::as_i64).unwrap_or(0);
    let amount = action["amount"].as_i64().unwrap_or(1);

    let next = match action["type"].as_str() {
        Some("INCREMENT") => count.saturating_add(amount),
        Some("DECREMENT") => count.saturating_sub(amount),
        Some("RESET") => 0,
        _ => count,
    };
    json!(next)
}
