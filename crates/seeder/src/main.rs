use anyhow::{Context, Result};
use tracing::info;

use seeder::bulk::{self, INDEX_NAME};
use seeder::catalog;
use seeder::client::SeedClient;

const BATCH_SIZE: usize = 20;
const DEFAULT_COUNT: usize = 100;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let count = std::env::args()
        .nth(1)
        .map(|arg| arg.parse::<usize>())
        .transpose()
        .context("product count must be a positive integer")?
        .unwrap_or(DEFAULT_COUNT);

    let es_host =
        std::env::var("ES_HOST").unwrap_or_else(|_| "http://localhost:9200".to_string());
    let embedding_host =
        std::env::var("EMBEDDING_HOST").unwrap_or_else(|_| "http://localhost:8000".to_string());

    info!(count, %es_host, %embedding_host, "starting product seed");

    let client = SeedClient::new(es_host, embedding_host)?;
    client
        .check_health()
        .await
        .context("dependent services are not ready")?;

    let products = catalog::generate_products(count);
    let mut indexed = 0usize;

    for batch in products.chunks(BATCH_SIZE) {
        let texts: Vec<String> = batch.iter().map(|p| p.embed_text()).collect();
        let embeddings = client
            .get_embeddings(&texts)
            .await
            .context("embedding request failed")?;

        let mut lines = Vec::with_capacity(batch.len() * 2);
        bulk::append_batch(&mut lines, batch, &embeddings, bulk::bulk_timestamp())?;
        let payload = bulk::finish_payload(lines);

        let response = client
            .send_bulk(payload)
            .await
            .context("bulk indexing failed")?;

        indexed += batch.len();
        info!(
            indexed,
            total = count,
            took_ms = response.took,
            "indexed batch"
        );
    }

    let stored = client.count_documents(INDEX_NAME).await?;
    info!(stored, index = INDEX_NAME, "seed complete");

    Ok(())
}
