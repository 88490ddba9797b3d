use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Product record as served by the catalog API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    pub title: String,
    pub price: f64,
    #[serde(default)]
    pub description: String,
    pub category: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub rating: Rating,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub rate: f64,
    pub count: u64,
}

/// Render-ready form of a [`Product`].
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayRecord {
    pub id: u64,
    pub title: String,
    pub full_title: String,
    pub price: String,
    pub description: String,
    pub image: String,
    pub rate: f64,
    pub review_count: u64,
    pub card_stars: [bool; 5],
    pub modal_stars: [bool; 5],
    pub category_label: String,
}

/// Load state of one screen region fed by a startup fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegionState {
    Loading,
    Ready,
    Failed(String),
}

/// Something on screen that reacts to a click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Control {
    Category(String),
    Details(u64),
    AddToCart(u64),
    ModalAddToCart(u64),
    CloseDetail,
}

/// Where an add-to-cart request came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddSource {
    Card,
    Detail,
    Delegated,
}

pub struct Toast {
    pub text: String,
    pub expires_at: Instant,
}
