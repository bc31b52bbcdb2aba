//! Keyset pagination over a live listener.

use reqwest::{Method, StatusCode};
use std::collections::HashSet;

mod common;

#[tokio::test]
async fn two_then_one() {
    let server = common::start_server().await;
    let client = server.client();

    let mut ids = Vec::new();
    for i in 0..3 {
        ids.push(client.capture(Method::POST, &format!("{i}"), &[], "").await.unwrap().id);
    }

    let first = client.list(Some(2), None).await.unwrap();
    assert_eq!(first.webhooks.len(), 2);
    assert_eq!(first.webhooks[0].id, ids[2]);
    assert_eq!(first.next_cursor.as_deref(), Some(first.webhooks[1].id.as_str()));

    let second = client.list(Some(2), first.next_cursor.as_deref()).await.unwrap();
    assert_eq!(second.webhooks.len(), 1);
    assert_eq!(second.webhooks[0].id, ids[0]);
    assert_eq!(second.next_cursor, None);
}

#[tokio::test]
async fn walking_every_page_yields_each_record_once() {
    let server = common::start_server().await;
    let client = server.client();

    for i in 0..57 {
        client.capture(Method::POST, &format!("p/{i}"), &[], "").await.unwrap();
    }

    let all = client.list_all(10).await.unwrap();
    assert_eq!(all.len(), 57);
    let unique: HashSet<_> = all.iter().map(|w| w.id.clone()).collect();
    assert_eq!(unique.len(), 57);
    assert!(all.windows(2).all(|w| w[0].id > w[1].id));
    assert_eq!(all[0].pathname, "/p/56");
}

#[tokio::test]
async fn default_page_is_twenty() {
    let server = common::start_server().await;
    let client = server.client();
    for i in 0..25 {
        client.capture(Method::GET, &format!("{i}"), &[], "").await.unwrap();
    }

    let page = client.list(None, None).await.unwrap();
    assert_eq!(page.webhooks.len(), 20);
    assert!(page.next_cursor.is_some());
}

#[tokio::test]
async fn out_of_range_limit_is_rejected() {
    let server = common::start_server().await;
    for limit in ["0", "101", "abc"] {
        let response = reqwest::get(format!("{}/webhooks?limit={limit}", server.url))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "limit={limit}");
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["details"][0]["field"], "limit");
    }
}

#[tokio::test]
async fn malformed_cursor_is_rejected() {
    let server = common::start_server().await;
    let response = reqwest::get(format!("{}/webhooks?cursor=yesterday", server.url))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
