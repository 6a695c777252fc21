use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Todo {
    pub id: u64,
    pub text: String,
    #[serde(default)]
    pub done: bool,
}

impl Todo {
    fn to_value(&self) -> Value {
        json!({ "id": self.id, "text": self.text, "done": self.done })
    }
}

fn load(state: Option<&Value>) -> Vec<Todo> {
    state
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| Todo::deserialize(item).ok())
                .collect()
        })
        .unwrap_or_default()
}

/// Todo list slice
///
/// - `ADD_TODO { text }` appends a new open todo, id one past the highest;
///   without `text` it is a no-op
/// - `TOGGLE_TODO { id }` flips `done`
/// - `REMOVE_TODO { id }` drops the todo
pub fn reduce(state: Option<&Value>, action: &Value) -> Value {
    let mut todos = load(state);
    let target = action["id"].as_u64();

    match action["type"].as_str() {
        Some("ADD_TODO") => {
            if let Some(text) = action["text"].as_str() {
                let id = todos.iter().map(|todo| todo.id + 1).max().unwrap_or(1);
                todos.push(Todo {
                    id,
                    text: text.to_string(),
                    done: false,
                });
            }
        }
        Some("TOGGLE_TODO") => {
            if let Some(todo) = todos.iter_mut().find(|todo| Some(todo.id) == target) {
                todo.done = !todo.done;
            }
        }
        Some("REMOVE_TODO") => todos.retain(|todo| Some(todo.id) != target),
        _ => {}
    }

    Value::Array(todos.iter().map(Todo::to_value).collect())
}
