use toml::{Value, map::Map};

/// Folds layers into one value; later layers win
pub(super) fn layer(values: impl IntoIterator<Item = Value>) -> Value {
    values
        .into_iter()
        .fold(Value::Table(Map::new()), overlay)
}

/// Deep-merges tables; any other `top` value replaces `base` outright,
/// arrays included
pub(super) fn overlay(base: Value, top: Value) -> Value {
    match (base, top) {
        (Value::Table(mut base), Value::Table(top)) => {
            for (key, value) in top {
                let merged = match base.remove(&key) {
                    Some(existing) => overlay(existing, value),
                    None => value,
                };
                base.insert(key, merged);
            }
            Value::Table(base)
        }
        (_, top) => top,
    }
}
