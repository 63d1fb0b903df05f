use super::helpers::{
    Part, assert_error, expect_status, post_files, read_json, send, spawn_app,
};
use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use serde_json::{Value, json};

#[tokio::test]
async fn detect_returns_boxes_per_file_in_upload_order() {
    let app = spawn_app();

    let res = post_files(
        &app,
        "/detect-face",
        &[
            Part::jpeg_with_faces("first.jpg", 1),
            Part::file("second.png", "image/png", "faces=2"),
        ],
    )
    .await;

    let res = expect_status(res, StatusCode::OK).await;
    let body: Value = read_json(res).await;
    assert_eq!(
        body,
        json!({
            "success_list": [
                { "filename": "first.jpg", "boxes": [[0, 8, 8, 0]] },
                { "filename": "second.png", "boxes": [[0, 8, 8, 0], [10, 18, 18, 10]] }
            ]
        })
    );
    assert_eq!(app.seen_count(), 2);
    app.assert_temp_files_released();
}

#[tokio::test]
async fn temp_files_use_jpg_suffix_even_for_png() {
    let app = spawn_app();

    let res = post_files(
        &app,
        "/detect-face",
        &[Part::file("face.png", "image/png", "faces=1")],
    )
    .await;
    expect_status(res, StatusCode::OK).await;

    let seen = app.faces.seen.lock().unwrap().clone();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].extension().unwrap(), "jpg");
    assert!(seen[0].starts_with(&app.temp_dir));
}

#[tokio::test]
async fn non_image_is_rejected() {
    let app = spawn_app();
    let res = post_files(
        &app,
        "/detect-face",
        &[Part::file("notes.txt", "text/plain", "faces=1")],
    )
    .await;
    assert_error(res, StatusCode::BAD_REQUEST, "File must be an image.").await;
    assert_eq!(app.seen_count(), 0);
}

#[tokio::test]
async fn gif_is_unsupported() {
    let app = spawn_app();
    let res = post_files(
        &app,
        "/detect-face",
        &[Part::file("anim.gif", "image/gif", "faces=1")],
    )
    .await;
    assert_error(
        res,
        StatusCode::BAD_REQUEST,
        "Unsupported image format. Only JPEG and PNG are allowed.",
    )
    .await;
}

#[tokio::test]
async fn oversized_file_is_rejected() {
    let app = spawn_app();
    let res = post_files(
        &app,
        "/detect-face",
        &[Part::file("big.jpg", "image/jpeg", vec![b'x'; 5 * 1024 * 1024 + 1])],
    )
    .await;
    assert_error(res, StatusCode::BAD_REQUEST, "File size exceeds the limit of 5MB.").await;
}

#[tokio::test]
async fn invalid_second_file_discards_first_result() {
    let app = spawn_app();
    let res = post_files(
        &app,
        "/detect-face",
        &[
            Part::jpeg_with_faces("good.jpg", 1),
            Part::file("bad.bmp", "image/bmp", "faces=1"),
        ],
    )
    .await;
    assert_error(
        res,
        StatusCode::BAD_REQUEST,
        "Unsupported image format. Only JPEG and PNG are allowed.",
    )
    .await;
    assert_eq!(app.seen_count(), 1);
    app.assert_temp_files_released();
}

#[tokio::test]
async fn faceless_first_file_stops_the_batch() {
    let app = spawn_app();
    let res = post_files(
        &app,
        "/detect-face",
        &[
            Part::jpeg_with_faces("empty.jpg", 0),
            Part::jpeg_with_faces("never.jpg", 1),
        ],
    )
    .await;
    assert_error(res, StatusCode::BAD_REQUEST, "No face detected.").await;
    assert_eq!(app.seen_count(), 1);
    app.assert_temp_files_released();
}

#[tokio::test]
async fn empty_upload_is_no_face() {
    let app = spawn_app();
    let res = post_files(&app, "/detect-face", &[]).await;
    assert_error(res, StatusCode::BAD_REQUEST, "No face detected.").await;
}

#[tokio::test]
async fn backend_failure_is_generic_500() {
    let app = spawn_app();
    let res = post_files(
        &app,
        "/detect-face",
        &[Part::file("boom.jpg", "image/jpeg", "explode")],
    )
    .await;
    assert_error(res, StatusCode::INTERNAL_SERVER_ERROR, "Could not detect faces").await;
    app.assert_temp_files_released();
}

#[tokio::test]
async fn single_file_field_name_is_accepted() {
    let app = spawn_app();
    let mut part = Part::jpeg_with_faces("single.jpg", 1);
    part.field = "file";

    let res = post_files(&app, "/detect-face", &[part]).await;
    let body: Value = read_json(expect_status(res, StatusCode::OK).await).await;
    assert_eq!(body["success_list"][0]["filename"], "single.jpg");
}

#[tokio::test]
async fn collect_errors_reports_failures_alongside_results() {
    let app = spawn_app();
    let res = post_files(
        &app,
        "/detect-face?collect_errors=true",
        &[
            Part::file("doc.pdf", "application/pdf", "faces=1"),
            Part::jpeg_with_faces("empty.jpg", 0),
            Part::jpeg_with_faces("face.jpg", 1),
        ],
    )
    .await;

    let body: Value = read_json(expect_status(res, StatusCode::OK).await).await;
    assert_eq!(
        body,
        json!({
            "success_list": [{ "filename": "face.jpg", "boxes": [[0, 8, 8, 0]] }],
            "failed_list": [
                { "filename": "doc.pdf", "error": "File must be an image." },
                { "filename": "empty.jpg", "error": "No face detected." }
            ]
        })
    );
    app.assert_temp_files_released();
}

#[tokio::test]
async fn malformed_multipart_is_bad_request() {
    let app = spawn_app();
    let req = Request::builder()
        .method("POST")
        .uri("/detect-face")
        .header(header::CONTENT_TYPE, "multipart/form-data; boundary=xyz")
        .body(Body::from("--xyz\r\nContent-Disposition: form-data; name=\"files\"\r\n"))
        .expect("failed to build request");

    let res = send(&app.app, req).await;
    assert_error(res, StatusCode::BAD_REQUEST, "Invalid multipart payload.").await;
}

#[tokio::test]
async fn non_multipart_body_is_json_bad_request() {
    let app = spawn_app();
    let req = Request::builder()
        .method("POST")
        .uri("/detect-face")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"files": []}"#))
        .expect("failed to build request");

    let res = send(&app.app, req).await;
    assert_eq!(res.headers()[header::CONTENT_TYPE], "application/json");
    assert_error(res, StatusCode::BAD_REQUEST, "Invalid multipart payload.").await;
    assert_eq!(app.seen_count(), 0);
}

#[tokio::test]
async fn bad_collect_errors_flag_is_json_bad_request() {
    let app = spawn_app();
    let res = post_files(
        &app,
        "/detect-face?collect_errors=1",
        &[Part::jpeg_with_faces("me.jpg", 1)],
    )
    .await;

    assert_error(res, StatusCode::BAD_REQUEST, "Invalid query string.").await;
    assert_eq!(app.seen_count(), 0);
}

#[tokio::test]
async fn cors_is_permissive_with_credentials() {
    let app = spawn_app();
    let req = Request::builder()
        .method("OPTIONS")
        .uri("/detect-face")
        .header(header::ORIGIN, "https://anywhere.example")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "x-custom")
        .body(Body::empty())
        .expect("failed to build preflight request");

    let res = send(&app.app, req).await;
    assert!(res.status().is_success());
    let headers = res.headers();
    assert_eq!(
        headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "https://anywhere.example"
    );
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_HEADERS], "x-custom");
}
