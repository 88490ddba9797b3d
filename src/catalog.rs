use std::collections::HashMap;

use crate::categories::is_all;
use crate::models::Product;

/// Product list fetched at startup, with an id lookup over the full set.
#[derive(Debug, Default)]
pub struct ProductCatalog {
    products: Option<Vec<Product>>,
    by_id: HashMap<u64, usize>,
}

impl ProductCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&mut self, products: Vec<Product>) {
        self.by_id.clear();
        for (i, product) in products.iter().enumerate() {
            // first occurrence wins on duplicate ids
            self.by_id.entry(product.id).or_insert(i);
        }
        self.products = Some(products);
    }

    pub fn is_loaded(&self) -> bool {
        self.products.is_some()
    }

    pub fn len(&self) -> usize {
        self.products.as_ref().map(Vec::len).unwrap_or(0)
    }

    /// `None` until loaded. Order follows the server response.
    pub fn filtered_by(&self, category: &str) -> Option<Vec<&Product>> {
        let products = self.products.as_ref()?;
        if is_all(category) {
            Some(products.iter().collect())
        } else {
            Some(products.iter().filter(|p| p.category == category).collect())
        }
    }

    pub fn get(&self, id: u64) -> Option<&Product> {
        let products = self.products.as_ref()?;
        self.by_id.get(&id).and_then(|&i| products.get(i))
    }
}
