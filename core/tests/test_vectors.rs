//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs, expected requests, simulated responses,
//! and expected parse results. Comparing parsed JSON (not raw strings) avoids
//! false negatives from field-ordering differences.

use profile_core::{
    EmailAvailability, HttpMethod, HttpRequest, HttpResponse, Profile, ProfileClient, UpdateProfile, UserId,
};

const BASE_URL: &str = "http://localhost:3000";

fn client() -> ProfileClient {
    ProfileClient::new(BASE_URL)
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn user_id(case: &serde_json::Value) -> UserId {
    case["input_user_id"].as_u64().unwrap()
}

fn simulated(case: &serde_json::Value) -> HttpResponse {
    let sim = &case["simulated_response"];
    HttpResponse::new(sim["status"].as_u64().unwrap() as u16, sim["body"].as_str().unwrap())
}

fn assert_request(name: &str, req: &HttpRequest, expected: &serde_json::Value) {
    assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
    assert_eq!(req.path, format!("{BASE_URL}{}", expected["path"].as_str().unwrap()), "{name}: path");

    match expected.get("headers") {
        Some(headers) => {
            let expected_headers: Vec<(String, String)> = headers
                .as_array()
                .unwrap()
                .iter()
                .map(|h| {
                    let arr = h.as_array().unwrap();
                    (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
                })
                .collect();
            assert_eq!(req.headers, expected_headers, "{name}: headers");
        }
        None => assert!(req.headers.is_empty(), "{name}: headers should be empty"),
    }

    match expected.get("body") {
        Some(body) => {
            let req_body: serde_json::Value = serde_json::from_slice(req.body.as_deref().unwrap()).unwrap();
            assert_eq!(&req_body, body, "{name}: body");
        }
        None => assert!(req.body.is_none(), "{name}: body should be None"),
    }
}

// ---------------------------------------------------------------------------
// Fetch
// ---------------------------------------------------------------------------

#[test]
fn fetch_profile_test_vectors() {
    let raw = include_str!("../../test-vectors/fetch_profile.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();

        let req = c.build_fetch_profile(user_id(case));
        assert_request(name, &req, &case["expected_request"]);

        let profile = c.parse_fetch_profile(simulated(case)).unwrap();
        let expected: Profile = serde_json::from_value(case["expected_result"].clone()).unwrap();
        assert_eq!(profile, expected, "{name}: parsed result");
    }
}

// ---------------------------------------------------------------------------
// Check email
// ---------------------------------------------------------------------------

#[test]
fn check_email_test_vectors() {
    let raw = include_str!("../../test-vectors/check_email.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();

        let req = c.build_check_email(case["input_email"].as_str().unwrap());
        assert_request(name, &req, &case["expected_request"]);

        let availability = c.parse_check_email(simulated(case)).unwrap();
        let expected: EmailAvailability = serde_json::from_value(case["expected_result"].clone()).unwrap();
        assert_eq!(availability, expected, "{name}: parsed result");
    }
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[test]
fn update_profile_test_vectors() {
    let raw = include_str!("../../test-vectors/update_profile.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let input: UpdateProfile = serde_json::from_value(case["input"].clone()).unwrap();

        let req = c.build_update_profile(user_id(case), &input).unwrap();
        assert_request(name, &req, &case["expected_request"]);

        let profile = c.parse_update_profile(simulated(case)).unwrap();
        let expected: Profile = serde_json::from_value(case["expected_result"].clone()).unwrap();
        assert_eq!(profile, expected, "{name}: parsed result");
    }
}

// ---------------------------------------------------------------------------
// Password reset
// ---------------------------------------------------------------------------

#[test]
fn password_reset_test_vectors() {
    let raw = include_str!("../../test-vectors/password_reset.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();

        let req = c.build_password_reset(user_id(case)).unwrap();
        assert_request(name, &req, &case["expected_request"]);

        c.parse_password_reset(simulated(case))
            .unwrap_or_else(|e| panic!("{name}: {e}"));
    }
}
