use axum::{body::Body, response::Response};

#[track_caller]
pub(crate) fn assert_content_type(response: &Response<Body>, content_type: &str) {
    let content_type_header = response
        .headers()
        .get("content-type")
        .expect("content-type header missing");
    assert_eq!(content_type_header, content_type);
}

#[track_caller]
pub(crate) fn get_header(response: &Response<Body>, header_name: &str) -> String {
    let header_error_message = format!("Headers missing {header_name}");

    response
        .headers()
        .get(header_name)
        .expect(&header_error_message)
        .to_str()
        .expect("Could not convert to str")
        .to_string()
}

pub(crate) async fn get_body_text(response: Response<Body>) -> String {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Could not get response body");

    String::from_utf8(body.to_vec()).expect("Response body is not UTF-8")
}
