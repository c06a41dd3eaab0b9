use greeter::adapter::{dispatch, Options};
use greeter::router;
use http::header::CONTENT_TYPE;
use http::{Request, StatusCode};
use lambda_http::Body;

fn lambda_request(method: &str, uri: &str) -> lambda_http::Request {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("host", "abc123.execute-api.us-east-1.amazonaws.com")
        .body(Body::Empty)
        .unwrap()
}

#[tokio::test]
async fn lambda_get_root_returns_json_greeting() {
    let response = dispatch(router(), lambda_request("GET", "/"), &Options::default())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[CONTENT_TYPE], "application/json");
    match response.body() {
        Body::Text(text) => {
            let value: serde_json::Value = serde_json::from_str(text).unwrap();
            assert_eq!(value, serde_json::json!({ "message": "Hello World" }));
        }
        other => panic!("expected text body, got {:?}", other),
    }
}

#[tokio::test]
async fn lambda_stage_prefix_is_stripped() {
    let options = Options::default().base_path("/prod");

    let response = dispatch(router(), lambda_request("GET", "/prod"), &options)
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn lambda_unknown_path_is_not_found() {
    let response = dispatch(
        router(),
        lambda_request("GET", "/does-not-exist"),
        &Options::default(),
    )
    .await
    .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn lambda_delete_root_is_method_not_allowed() {
    let response = dispatch(router(), lambda_request("DELETE", "/"), &Options::default())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn lambda_responses_are_idempotent() {
    let app = router();
    let mut bodies = Vec::new();
    for _ in 0..3 {
        let response = dispatch(app.clone(), lambda_request("GET", "/"), &Options::default())
            .await
            .unwrap();
        bodies.push(format!("{:?}", response.body()));
    }

    assert!(bodies.windows(2).all(|pair| pair[0] == pair[1]));
}

#[tokio::test]
async fn lambda_stage_prefix_without_slashes_is_stripped() {
    let options = Options::default().base_path("prod");

    let response = dispatch(router(), lambda_request("GET", "/prod"), &options)
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
