//! NDJSON bulk payload assembly.
//!
//! Each product becomes an action line plus a document line; the document
//! carries the embedding vector returned for the product's text at the same
//! batch position, so the 1:1 order correspondence between texts sent to
//! `/embed` and vectors attached here is load-bearing.

use serde_json::json;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

use crate::catalog::Product;

pub const INDEX_NAME: &str = "product_index";

#[derive(Debug, Error)]
pub enum BulkError {
    #[error("got {embeddings} embeddings for {products} products")]
    CountMismatch { products: usize, embeddings: usize },
}

fn epoch_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Append one batch of products and their embeddings to the bulk payload.
///
/// `embeddings[i]` must be the vector for `products[i]`; a length mismatch is
/// rejected rather than silently zipped short.
pub fn append_batch(
    lines: &mut Vec<String>,
    products: &[Product],
    embeddings: &[Vec<f32>],
    timestamp_millis: u64,
) -> Result<(), BulkError> {
    if products.len() != embeddings.len() {
        return Err(BulkError::CountMismatch {
            products: products.len(),
            embeddings: embeddings.len(),
        });
    }

    for (product, vector) in products.iter().zip(embeddings) {
        let action = json!({"index": {"_index": INDEX_NAME, "_id": product.id}});
        lines.push(action.to_string());

        let doc = json!({
            "productId": product.id,
            "productName": product.name,
            "category": product.category,
            "brand": product.brand,
            "price": product.price,
            "stock": product.stock,
            "description": product.description,
            "productVector": vector,
            "createdAt": timestamp_millis,
            "updatedAt": timestamp_millis,
        });
        lines.push(doc.to_string());
    }

    Ok(())
}

/// Finalize the NDJSON body. The bulk API requires a trailing newline.
pub fn finish_payload(lines: Vec<String>) -> String {
    let mut payload = lines.join("\n");
    payload.push('\n');
    payload
}

/// Current wall-clock timestamp for `createdAt`/`updatedAt`.
pub fn bulk_timestamp() -> u64 {
    epoch_millis()
}
