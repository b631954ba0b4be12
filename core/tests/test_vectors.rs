//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes credentials, inputs, expected requests,
//! simulated responses, and expected parse results. Query strings are
//! compared as decoded pairs and bodies as parsed JSON.

use putio_core::{
    ApiError, Credentials, HttpMethod, HttpRequest, HttpResponse, PutioClient, SearchFilters,
};
use serde_json::Value;

const BASE_URL: &str = "http://localhost:3000/v2";

fn client(vectors: &Value) -> PutioClient {
    let credentials: Credentials = serde_json::from_value(vectors["credentials"].clone()).unwrap();
    PutioClient::with_base_url(BASE_URL, credentials)
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        other => panic!("unknown method: {other}"),
    }
}

fn string_pairs(value: &Value) -> Vec<(String, String)> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|pair| {
            let arr = pair.as_array().unwrap();
            (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
        })
        .collect()
}

fn assert_request(name: &str, req: &HttpRequest, expected: &Value) {
    assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");

    let url = url::Url::parse(&req.url).unwrap();
    assert_eq!(
        &url[..url::Position::AfterPath],
        format!("{BASE_URL}{}", expected["path"].as_str().unwrap()),
        "{name}: path"
    );
    assert_eq!(req.query_pairs(), string_pairs(&expected["query"]), "{name}: query");

    if let Some(headers) = expected.get("headers") {
        assert_eq!(req.headers, string_pairs(headers), "{name}: headers");
    }
    assert!(req.body.is_none(), "{name}: body should be None");
}

fn simulated(case: &Value) -> HttpResponse {
    let sim = &case["simulated_response"];
    HttpResponse::new(
        sim["status"].as_u64().unwrap() as u16,
        sim["body"].as_str().unwrap(),
    )
}

fn assert_error(name: &str, err: ApiError, expected: &Value) {
    match expected["kind"].as_str().unwrap() {
        "Auth" => assert!(matches!(err, ApiError::Auth { .. }), "{name}: expected Auth"),
        "Status" => assert!(matches!(err, ApiError::Status { .. }), "{name}: expected Status"),
        other => panic!("{name}: unknown expected_error kind: {other}"),
    }
    assert_eq!(err.to_string(), expected["message"].as_str().unwrap(), "{name}: message");
}

// ---------------------------------------------------------------------------
// Access token
// ---------------------------------------------------------------------------

#[test]
fn access_token_test_vectors() {
    let raw = include_str!("../../test-vectors/access_token.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let c = client(&vectors);
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let code = case["input"]["code"].as_str().unwrap();
        let grant_type = case["input"]["grant_type"].as_str().unwrap();

        let req = c.build_get_access_token(code, grant_type).unwrap();
        assert_request(name, &req, &case["expected_request"]);

        let result = c.parse_get_access_token(simulated(case), code, grant_type);
        if let Some(expected_error) = case.get("expected_error") {
            assert_error(name, result.unwrap_err(), expected_error);
        } else {
            assert_eq!(result.unwrap(), case["expected_result"].as_str().unwrap(), "{name}: token");
        }
    }
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

#[test]
fn list_test_vectors() {
    let raw = include_str!("../../test-vectors/list.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let c = client(&vectors);
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let parent_id = case["input"]["parent_id"].as_u64().unwrap();

        let req = c.build_list_files(parent_id).unwrap();
        assert_request(name, &req, &case["expected_request"]);

        let result = c.parse_list_files(simulated(case), parent_id);
        if let Some(expected_error) = case.get("expected_error") {
            assert_error(name, result.unwrap_err(), expected_error);
        } else {
            assert_eq!(result.unwrap(), case["expected_result"], "{name}: parsed result");
        }
    }
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

#[test]
fn search_test_vectors() {
    let raw = include_str!("../../test-vectors/search.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let c = client(&vectors);
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let keyword = case["input"]["keyword"].as_str().unwrap();
        let filters: SearchFilters = serde_json::from_value(case["input"]["filters"].clone()).unwrap();

        let req = c.build_search_files(keyword, &filters).unwrap();
        assert_request(name, &req, &case["expected_request"]);

        let result = c.parse_search_files(simulated(case));
        if let Some(expected_error) = case.get("expected_error") {
            assert_error(name, result.unwrap_err(), expected_error);
        } else {
            assert_eq!(result.unwrap(), case["expected_result"], "{name}: parsed result");
        }
    }
}
