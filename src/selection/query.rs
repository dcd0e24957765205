use serde_json::Value;

/// Request fields concatenated into the retrieval query, in order.
const QUERY_FIELDS: [&str; 6] = [
    "projectName",
    "description",
    "additional_info",
    "keyCriteria",
    "services_needed",
    "request_type",
];

/// The parts of a free-form selection request the pipeline cares about.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SelectionQuery {
    /// Requested service, from `services_needed` or `service`
    pub service: Option<String>,
    /// Requested markets, from `target_markets`, `targetMarkets` or `markets`
    pub markets: Vec<String>,
    /// Newline-joined summary used for embedding and keyword matching
    pub text: String,
}

impl SelectionQuery {
    /// Read fields opportunistically. Anything missing or oddly typed is
    /// skipped; a non-object request just yields an empty query over its raw JSON.
    pub fn from_request(request: &Value) -> Self {
        let service = first_truthy(request, &["services_needed", "service"])
            .map(value_text)
            .filter(|s| !s.is_empty());

        let markets = match first_truthy(request, &["target_markets", "targetMarkets", "markets"]) {
            Some(Value::Array(items)) => items
                .iter()
                .filter(|v| is_truthy(v))
                .map(value_text)
                .collect(),
            Some(other) => vec![value_text(other)],
            None => Vec::new(),
        };

        let parts: Vec<String> = QUERY_FIELDS
            .iter()
            .filter_map(|key| {
                let lower = key.to_lowercase();
                first_truthy(request, &[key, lower.as_str()])
            })
            .map(value_text)
            .collect();

        let text = if parts.is_empty() {
            request.to_string()
        } else {
            parts.join("\n")
        };

        Self {
            service,
            markets,
            text,
        }
    }
}

fn first_truthy<'a>(request: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|k| request.get(k))
        .find(|v| is_truthy(v))
}

/// Empty strings, empty collections, zero, false and null count as absent.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Plain text for a field value; arrays are space-joined.
fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(value_text).collect::<Vec<_>>().join(" "),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
