//! Integration tests for byte-range streaming over a real socket.

mod common;

use common::{payload, TestHarness};

#[tokio::test]
async fn full_stream_returns_every_byte() {
    let (h, addr) = TestHarness::with_server().await;
    let id = h.add_file("videos/movie.mp4", &payload(1000));

    let resp = reqwest::get(format!("http://{addr}/api/videos/{id}/stream"))
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers().get("content-type").unwrap().to_str().unwrap(),
        "video/mp4"
    );
    assert_eq!(
        resp.headers().get("accept-ranges").unwrap().to_str().unwrap(),
        "bytes"
    );
    assert_eq!(
        resp.headers().get("content-length").unwrap().to_str().unwrap(),
        "1000"
    );
    let body = resp.bytes().await.unwrap();
    assert_eq!(body.as_ref(), payload(1000).as_slice());
}

#[tokio::test]
async fn closed_range_returns_partial_content() {
    let (h, addr) = TestHarness::with_server().await;
    let id = h.add_file("videos/movie.mp4", &payload(1000));

    let client = reqwest::Client::new();
    let resp = client
        .get(format!("http://{addr}/api/videos/{id}/stream"))
        .header("Range", "bytes=100-199")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 206);
    assert_eq!(
        resp.headers().get("content-range").unwrap().to_str().unwrap(),
        "bytes 100-199/1000"
    );
    assert_eq!(
        resp.headers().get("content-length").unwrap().to_str().unwrap(),
        "100"
    );
    let body = resp.bytes().await.unwrap();
    assert_eq!(body.as_ref(), &payload(1000)[100..200]);
}

#[tokio::test]
async fn open_ended_range_streams_to_eof() {
    let (h, addr) = TestHarness::with_server().await;
    let id = h.add_file("music/song.mp3", &payload(1000));

    let client = reqwest::Client::new();
    let resp = client
        .get(format!("http://{addr}/api/music/{id}/stream"))
        .header("Range", "bytes=500-")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 206);
    assert_eq!(
        resp.headers().get("content-type").unwrap().to_str().unwrap(),
        "audio/mpeg"
    );
    assert_eq!(
        resp.headers().get("content-range").unwrap().to_str().unwrap(),
        "bytes 500-999/1000"
    );
    let body = resp.bytes().await.unwrap();
    assert_eq!(body.len(), 500);
    assert_eq!(body.as_ref(), &payload(1000)[500..]);
}

#[tokio::test]
async fn large_file_streams_in_chunks() {
    let (h, addr) = TestHarness::with_server().await;
    let size = 3 * 64 * 1024 + 17;
    let id = h.add_file("videos/big.mkv", &payload(size));

    let client = reqwest::Client::new();
    let resp = client
        .get(format!("http://{addr}/api/videos/{id}/stream"))
        .header("Range", "bytes=65000-200000")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 206);
    assert_eq!(
        resp.headers().get("content-type").unwrap().to_str().unwrap(),
        "video/x-matroska"
    );
    // The requested end lies past EOF and is clamped to the last byte.
    assert_eq!(
        resp.headers().get("content-range").unwrap().to_str().unwrap(),
        "bytes 65000-196624/196625"
    );
    assert_eq!(
        resp.headers().get("content-length").unwrap().to_str().unwrap(),
        "131625"
    );
    let body = resp.bytes().await.unwrap();
    assert_eq!(body.as_ref(), &payload(size)[65000..]);
}

#[tokio::test]
async fn unsatisfiable_range_is_416() {
    let h = TestHarness::new();
    let id = h.add_file("videos/movie.mp4", &payload(1000));

    let resp = h
        .request(
            axum::http::Request::get(format!("/api/videos/{id}/stream"))
                .header("range", "bytes=2000-3000")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(resp.status, 416);
    assert_eq!(resp.header("content-range"), "bytes */1000");
}

#[tokio::test]
async fn malformed_range_is_416() {
    let h = TestHarness::new();
    let id = h.add_file("videos/movie.mp4", &payload(10));

    let resp = h
        .request(
            axum::http::Request::get(format!("/api/videos/{id}/stream"))
                .header("range", "bytes=abc")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(resp.status, 416);
}

#[tokio::test]
async fn photo_full_uses_range_handler() {
    let h = TestHarness::new();
    let id = h.add_file("photos/pic.png", &payload(300));

    let resp = h.get(&format!("/api/photos/{id}/full")).await;
    assert_eq!(resp.status, 200);
    assert_eq!(resp.header("content-type"), "image/png");
    assert_eq!(resp.body.len(), 300);

    let resp = h
        .request(
            axum::http::Request::get(format!("/api/photos/{id}/full"))
                .header("range", "bytes=-100")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(resp.status, 206);
    assert_eq!(resp.header("content-range"), "bytes 200-299/300");
}

#[tokio::test]
async fn stream_rejects_ids_outside_collection_roots() {
    let h = TestHarness::new();
    // A music file is not reachable through the videos collection.
    let id = h.add_file("music/song.mp3", &payload(10));
    assert_eq!(h.get(&format!("/api/videos/{id}/stream")).await.status, 404);

    // Nor is anything outside every root.
    let id = h.add_file("secret.mp4", &payload(10));
    assert_eq!(h.get(&format!("/api/videos/{id}/stream")).await.status, 404);
}

#[tokio::test]
async fn stream_rejects_traversal_and_garbage_ids() {
    let h = TestHarness::new();
    h.add_file("secret.mp4", &payload(10));
    let traversal = carmine_common::MediaId::from_path(&h.path("videos/../secret.mp4"));
    let resp = h.get(&format!("/api/videos/{traversal}/stream")).await;
    assert_eq!(resp.status, 400);
    assert_eq!(resp.json()["code"], "invalid_id");

    let resp = h.get("/api/videos/%25%25%25/stream").await;
    assert_eq!(resp.status, 400);
}

#[tokio::test]
async fn stream_of_missing_file_is_404() {
    let h = TestHarness::new();
    let id = h.id_for("videos/never-existed.mp4");
    let resp = h.get(&format!("/api/videos/{id}/stream")).await;
    assert_eq!(resp.status, 404);
    assert_eq!(resp.json()["code"], "not_found");
}
