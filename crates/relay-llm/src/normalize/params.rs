use serde_json::{Map, Value};

use crate::types::GenerationOptions;

/// Map a generic parameter bag onto backend generation options
///
/// Only `temperature`, `top_p`, `max_tokens` and `stop` are read. A key that
/// is missing, null, or of an unusable type leaves its option unset; every
/// other key is ignored.
pub fn map_config(params: Option<&Map<String, Value>>) -> GenerationOptions {
    let Some(params) = params else {
        return GenerationOptions::default();
    };

    GenerationOptions {
        temperature: params.get("temperature").and_then(Value::as_f64),
        top_p: params.get("top_p").and_then(Value::as_f64),
        max_output_tokens: params.get("max_tokens").and_then(Value::as_i64),
        stop_sequences: params.get("stop").and_then(stop_sequences),
    }
}

fn stop_sequences(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::String(single) => Some(vec![single.clone()]),
        Value::Array(entries) => Some(
            entries
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_owned)
                .collect(),
        ),
        _ => None,
    }
}
