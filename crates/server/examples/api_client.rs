//! Examples for using the embedding service API

use reqwest::Client;
use serde_json::json;

const SERVER_URL: &str = "http://localhost:8000";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let client = Client::new();

    // Example 1: Service metadata
    println!("1. Service Metadata:");
    let resp = client.get(SERVER_URL).send().await?;
    println!("Status: {}", resp.status());
    println!("Body: {}", resp.text().await?);
    println!();

    // Example 2: Health check
    println!("2. Health Check:");
    let resp = client.get(format!("{SERVER_URL}/health")).send().await?;
    println!("Status: {}", resp.status());
    println!("Body: {}", resp.text().await?);
    println!();

    // Example 3: Embed a batch of query texts
    println!("3. Embed Batch:");
    let resp = client
        .post(format!("{SERVER_URL}/embed"))
        .json(&json!({
            "texts": ["무선 이어폰", "삼성 노트북 최신형"]
        }))
        .send()
        .await?;
    println!("Status: {}", resp.status());
    let body: serde_json::Value = resp.json().await?;
    let embeddings = body["embeddings"].as_array().map_or(0, Vec::len);
    println!("Embeddings: {embeddings}, dims: {}", body["dims"]);
    println!();

    // Example 4: Embed passages for indexing
    println!("4. Embed Passages:");
    let resp = client
        .post(format!("{SERVER_URL}/embed"))
        .json(&json!({
            "texts": ["프리미엄 무선 이어폰. 뛰어난 음질을 자랑합니다."],
            "prefix": "passage: "
        }))
        .send()
        .await?;
    println!("Status: {}", resp.status());
    println!();

    // Example 5: Single text over GET
    println!("5. Embed Single:");
    let resp = client
        .get(format!("{SERVER_URL}/embed/single"))
        .query(&[("text", "노트북")])
        .send()
        .await?;
    println!("Status: {}", resp.status());
    let body: serde_json::Value = resp.json().await?;
    println!("dims: {}", body["dims"]);

    Ok(())
}
