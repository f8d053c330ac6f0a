use serde_json::Value;

/// Assert a 200 success envelope and return its `data`.
pub fn assert_envelope_ok(status: u16, body: &Value) -> &Value {
    assert_eq!(status, 200, "Expected 200 OK, got {status}: {body}");
    assert_eq!(body["success"], true, "Expected success envelope: {body}");
    assert!(body["message"].is_string(), "Envelope without message: {body}");
    &body["data"]
}

/// Assert a failure envelope with the given status.
pub fn assert_envelope_error(status: u16, body: &Value, expected_status: u16) {
    assert_eq!(
        status, expected_status,
        "Expected status {expected_status}, got {status}: {body}"
    );
    assert_eq!(body["success"], false, "Expected failure envelope: {body}");
    assert!(body["data"].is_null(), "Failure envelope carries data: {body}");
}

/// Assert a 422 whose violation map has exactly `fields` as keys.
pub fn assert_violations(status: u16, body: &Value, fields: &[&str]) {
    assert_eq!(status, 422, "Expected 422, got {status}: {body}");
    let map = body
        .as_object()
        .unwrap_or_else(|| panic!("422 body is not an object: {body}"));
    let mut got: Vec<&str> = map.keys().map(String::as_str).collect();
    let mut want = fields.to_vec();
    got.sort_unstable();
    want.sort_unstable();
    assert_eq!(got, want, "Unexpected violation fields: {body}");
    for (field, messages) in map {
        let messages = messages.as_array().unwrap_or_else(|| panic!("{field}: {messages}"));
        assert!(!messages.is_empty(), "No messages for {field}");
    }
}
