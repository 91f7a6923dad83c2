use serde::{Deserialize, Serialize};

/// A catalog entry. Catalog data is read-only as far as the order store is
/// concerned; the store only ever copies products into cart lines.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price_cents: i64,
    pub image: String,
    pub category: String,
    pub stock: u32,
    pub rating: f32,
    pub reviews: u32,
}
