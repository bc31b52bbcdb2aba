//! Concurrent capture load.

use reqwest::Method;
use std::collections::HashSet;
use std::time::{Duration, Instant};

mod common;

#[tokio::test]
async fn concurrent_captures_all_land_with_unique_ids() {
    let server = common::start_server().await;

    let concurrency = 20;
    let requests_per_task = 25;
    let total_requests = concurrency * requests_per_task;

    let start = Instant::now();
    let mut tasks = Vec::new();
    for task in 0..concurrency {
        let client = server.client();
        tasks.push(tokio::spawn(async move {
            let mut results = Vec::new();
            for i in 0..requests_per_task {
                let req_start = Instant::now();
                let captured = client
                    .capture(Method::POST, &format!("load/{task}/{i}"), &[], "x")
                    .await
                    .unwrap();
                results.push((captured.id, req_start.elapsed()));
            }
            results
        }));
    }

    let mut ids = HashSet::new();
    let mut latencies: Vec<Duration> = Vec::new();
    for task in tasks {
        for (id, latency) in task.await.unwrap() {
            ids.insert(id);
            latencies.push(latency);
        }
    }
    let duration = start.elapsed();

    assert_eq!(ids.len(), total_requests);

    let listed = server.client().list_all(100).await.unwrap();
    assert_eq!(listed.len(), total_requests);
    assert!(listed.windows(2).all(|w| w[0].id > w[1].id));

    latencies.sort();
    println!("\n--- Capture Load Results ---");
    println!("Total Requests: {}", total_requests);
    println!("Concurrency:    {}", concurrency);
    println!("Total Duration: {:?}", duration);
    println!("Requests/sec:   {:.2}", total_requests as f64 / duration.as_secs_f64());
    println!("P50 Latency:    {:?}", latencies[latencies.len() / 2]);
    println!("P99 Latency:    {:?}", latencies[(latencies.len() as f64 * 0.99) as usize]);
    println!("----------------------------\n");
}
