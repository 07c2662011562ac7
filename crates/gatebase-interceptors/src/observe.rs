use std::collections::BTreeMap;

/// Stable label set for per-call metric and audit emission.
pub fn call_labels(
    method: &str,
    outcome: Option<&str>,
    identity: Option<&str>,
) -> BTreeMap<&'static str, String> {
    let mut map = BTreeMap::new();
    map.insert("method", method.to_string());
    if let Some(outcome) = outcome {
        map.insert("outcome", outcome.to_string());
    }
    if let Some(identity) = identity {
        map.insert("identity", identity.to_string());
    }
    map
}
