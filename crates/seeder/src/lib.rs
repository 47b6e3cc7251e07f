//! Product catalog seeding for the search index.
//!
//! Generates a randomized Korean product catalog, embeds each product
//! through the embedding service with the passage prefix, and writes the
//! documents to the `product_index` index over the bulk API.

pub mod bulk;
pub mod catalog;
pub mod client;
