use super::helpers::{
    ENCODING_LEN, Part, assert_error, expect_status, post_files, read_json, spawn_app,
};
use axum::http::StatusCode;
use serde_json::Value;

async fn encode(parts: &[Part<'_>]) -> Value {
    let app = spawn_app();
    let res = post_files(&app, "/encode-face", parts).await;
    let body = read_json(expect_status(res, StatusCode::OK).await).await;
    app.assert_temp_files_released();
    body
}

#[tokio::test]
async fn single_face_returns_one_encoding() {
    let body = encode(&[Part::jpeg_with_faces("me.jpg", 1)]).await;

    let encoding = body["encoding"].as_array().expect("encoding must be an array");
    assert_eq!(encoding.len(), 1);
    assert_eq!(encoding[0].as_array().unwrap().len(), ENCODING_LEN);
    assert!(body.get("failed_list").is_none());
}

#[tokio::test]
async fn encodings_are_flattened_across_files() {
    let body = encode(&[
        Part::jpeg_with_faces("pair.jpg", 2),
        Part::jpeg_with_faces("nobody.jpg", 0),
        Part::file("solo.png", "image/png", "faces=1"),
    ])
    .await;

    let encoding = body["encoding"].as_array().unwrap();
    assert_eq!(encoding.len(), 3);
    assert_eq!(encoding[0][0], 0.0);
    assert!((encoding[1][0].as_f64().unwrap() - 0.1).abs() < 1e-6);
    assert_eq!(encoding[2][0], 0.0);
}

#[tokio::test]
async fn repeated_requests_are_identical() {
    let first = encode(&[Part::jpeg_with_faces("me.jpg", 1)]).await;
    let second = encode(&[Part::jpeg_with_faces("me.jpg", 1)]).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn no_faces_anywhere_is_bad_request() {
    let app = spawn_app();
    let res = post_files(
        &app,
        "/encode-face",
        &[
            Part::jpeg_with_faces("a.jpg", 0),
            Part::jpeg_with_faces("b.jpg", 0),
        ],
    )
    .await;
    assert_error(res, StatusCode::BAD_REQUEST, "No face detected.").await;
    assert_eq!(app.seen_count(), 2);
}

#[tokio::test]
async fn validation_failure_aborts_encode_batch() {
    let app = spawn_app();
    let res = post_files(
        &app,
        "/encode-face",
        &[
            Part::jpeg_with_faces("ok.jpg", 1),
            Part::file("clip.mp4", "video/mp4", "faces=1"),
        ],
    )
    .await;
    assert_error(res, StatusCode::BAD_REQUEST, "File must be an image.").await;
}

#[tokio::test]
async fn backend_failure_uses_encode_message() {
    let app = spawn_app();
    let res = post_files(
        &app,
        "/encode-face",
        &[Part::file("boom.jpg", "image/jpeg", "explode")],
    )
    .await;
    assert_error(
        res,
        StatusCode::INTERNAL_SERVER_ERROR,
        "Could not generate face encodings",
    )
    .await;
    app.assert_temp_files_released();
}

#[tokio::test]
async fn collect_errors_returns_partial_encodings() {
    let body = {
        let app = spawn_app();
        let res = post_files(
            &app,
            "/encode-face?collect_errors=true",
            &[
                Part::file("big.png", "image/png", vec![b'x'; 5 * 1024 * 1024 + 1]),
                Part::jpeg_with_faces("me.jpg", 1),
            ],
        )
        .await;
        read_json::<Value>(expect_status(res, StatusCode::OK).await).await
    };

    assert_eq!(body["encoding"].as_array().unwrap().len(), 1);
    assert_eq!(body["failed_list"][0]["filename"], "big.png");
    assert_eq!(
        body["failed_list"][0]["error"],
        "File size exceeds the limit of 5MB."
    );
}
