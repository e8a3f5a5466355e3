//! Functional tests for the card and gallery endpoints

mod common;

use axum::http::StatusCode;
use common::{create_test_app, get, ids, post, share};
use base64::{engine::general_purpose::STANDARD, Engine};

#[tokio::test]
async fn test_root_reports_online() {
    let app = create_test_app();
    let (status, body) = get(&app, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!({ "status": "online" }));
}

#[tokio::test]
async fn test_generate_returns_png_and_rarity() {
    let app = create_test_app();
    let (status, body) = get(&app, "/api/card/generate").await;
    assert_eq!(status, StatusCode::OK);

    let image = body["image"].as_str().unwrap();
    assert!(image.starts_with("data:image/png;base64,"));
    let payload = image.strip_prefix("data:image/png;base64,").unwrap();
    let png = STANDARD.decode(payload).unwrap();
    assert!(image::load_from_memory_with_format(&png, image::ImageFormat::Png).is_ok());

    let rarity = body["rarity"].as_str().unwrap();
    assert!(["Common", "Uncommon", "Rare", "Epic", "Legendary"].contains(&rarity));
}

#[tokio::test]
async fn test_generate_does_not_touch_gallery() {
    let app = create_test_app();
    get(&app, "/api/card/generate").await;

    let (_, body) = get(&app, "/api/gallery").await;
    assert_eq!(body["total"], 0);
}

#[tokio::test]
async fn test_gallery_empty_initially() {
    let app = create_test_app();
    let (status, body) = get(&app, "/api/gallery").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cards"], serde_json::json!([]));
    assert_eq!(body["total"], 0);
    assert_eq!(body["has_more"], false);
}

#[tokio::test]
async fn test_share_returns_new_card() {
    let app = create_test_app();
    let body = share(&app, "test_image").await;

    assert_eq!(body["id"], 1);
    assert_eq!(body["image"], "data:image/png;base64,test_image");
    assert_eq!(body["upvotes"], 0);
    assert!(body["created_at"].is_string());
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_shared_card_appears_in_recent() {
    let app = create_test_app();
    let shared = share(&app, "my_test_card").await;

    let (_, body) = get(&app, "/api/gallery?sort_by=recent&page=1&limit=50").await;
    let cards = body["cards"].as_array().unwrap();
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0]["id"], shared["id"]);
    assert_eq!(cards[0]["upvotes"], 0);
    assert_eq!(cards[0]["image"], "data:image/png;base64,my_test_card");
    assert_eq!(cards[0]["created_at"], shared["created_at"]);
}

#[tokio::test]
async fn test_gallery_sort_by_popular() {
    let app = create_test_app();
    for i in 1..=3 {
        share(&app, &format!("image{}", i)).await;
    }
    for _ in 0..3 {
        post(&app, "/api/gallery/1/upvote").await;
    }
    post(&app, "/api/gallery/2/upvote").await;

    let (status, body) = get(&app, "/api/gallery?sort_by=popular").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec![1, 2, 3]);

    let votes: Vec<_> = body["cards"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["upvotes"].as_i64().unwrap())
        .collect();
    assert_eq!(votes, vec![3, 1, 0]);
}

#[tokio::test]
async fn test_gallery_sort_by_recent() {
    let app = create_test_app();
    for i in 1..=3 {
        share(&app, &format!("image{}", i)).await;
    }

    let (_, body) = get(&app, "/api/gallery?sort_by=recent").await;
    assert_eq!(ids(&body), vec![3, 2, 1]);
}

#[tokio::test]
async fn test_gallery_invalid_sort_returns_400() {
    let app = create_test_app();
    let (status, body) = get(&app, "/api/gallery?sort_by=bogus").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["type"], "invalid_request_error");
}

#[tokio::test]
async fn test_gallery_malformed_numbers_return_json_400() {
    let app = create_test_app();

    for uri in [
        "/api/gallery?page=abc",
        "/api/gallery?page=-1",
        "/api/gallery?limit=1.5",
    ] {
        let (status, body) = get(&app, uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(body["error"]["type"], "invalid_request_error", "{}", uri);
        assert!(body["error"]["message"].as_str().unwrap().contains("Invalid request"));
    }
}

#[tokio::test]
async fn test_non_numeric_card_id_returns_json_400() {
    let app = create_test_app();

    let (status, body) = get(&app, "/api/gallery/abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["type"], "invalid_request_error");

    let (status, body) = post(&app, "/api/gallery/abc/upvote").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["type"], "invalid_request_error");
}

#[tokio::test]
async fn test_gallery_pagination() {
    let app = create_test_app();
    for i in 0..15 {
        share(&app, &format!("image{}", i)).await;
    }

    let (_, first) = get(&app, "/api/gallery?page=1&limit=10").await;
    assert_eq!(first["cards"].as_array().unwrap().len(), 10);
    assert_eq!(first["total"], 15);
    assert_eq!(first["has_more"], true);

    let (_, second) = get(&app, "/api/gallery?page=2&limit=10").await;
    assert_eq!(second["cards"].as_array().unwrap().len(), 5);
    assert_eq!(second["total"], 15);
    assert_eq!(second["has_more"], false);

    let mut all = ids(&first);
    all.extend(ids(&second));
    all.sort_unstable();
    all.dedup();
    assert_eq!(all.len(), 15);
}

#[tokio::test]
async fn test_gallery_limit_capped_at_100() {
    let app = create_test_app();
    for i in 0..105 {
        share(&app, &format!("image{}", i)).await;
    }

    let (status, body) = get(&app, "/api/gallery?limit=200").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cards"].as_array().unwrap().len(), 100);
    assert_eq!(body["total"], 105);
    assert_eq!(body["has_more"], true);
}

#[tokio::test]
async fn test_upvote_counts_up() {
    let app = create_test_app();
    let card = share(&app, "test").await;
    let uri = format!("/api/gallery/{}/upvote", card["id"]);

    for expected in 1..=3 {
        let (status, body) = post(&app, &uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["new_upvote_count"], expected);
        assert!(body["message"].is_string());
    }
}

#[tokio::test]
async fn test_downvotes_can_go_negative() {
    let app = create_test_app();
    let card = share(&app, "test").await;
    let uri = format!("/api/gallery/{}/downvote", card["id"]);

    let (_, first) = post(&app, &uri).await;
    assert_eq!(first["new_upvote_count"], -1);
    for _ in 0..4 {
        post(&app, &uri).await;
    }

    let (_, body) = get(&app, "/api/gallery").await;
    assert_eq!(body["cards"][0]["upvotes"], -5);
}

#[tokio::test]
async fn test_vote_on_unknown_card_returns_404() {
    let app = create_test_app();

    let (status, body) = post(&app, "/api/gallery/9999/upvote").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "card_not_found");

    let (status, _) = post(&app, "/api/gallery/9999/downvote").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_single_card() {
    let app = create_test_app();
    share(&app, "first").await;
    post(&app, "/api/gallery/1/upvote").await;

    let (status, body) = get(&app, "/api/gallery/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 1);
    assert_eq!(body["upvotes"], 1);
    assert_eq!(body["image"], "data:image/png;base64,first");

    let (status, _) = get(&app, "/api/gallery/42").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
