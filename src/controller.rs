use std::time::{Duration, Instant};

use crate::cart::CartStore;
use crate::catalog::ProductCatalog;
use crate::categories::CategoryIndex;
use crate::error::FetchError;
use crate::models::{AddSource, DisplayRecord, Product, RegionState, Toast};
use crate::present::present;

pub const CATEGORIES_FAILED: &str = "Failed to load categories. Please restart the app.";
pub const PRODUCTS_FAILED: &str = "Failed to load products. Please restart the app.";
pub const NO_PRODUCTS: &str = "No products found in this category.";

/// Grid cursor movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    Left,
    Right,
    Up,
    Down,
}

#[derive(Debug)]
pub enum Event {
    CategoriesLoaded(Result<Vec<String>, FetchError>),
    ProductsLoaded(Result<Vec<Product>, FetchError>),
    CategorySelected(String),
    NextCategory,
    PreviousCategory,
    DetailsRequested(u64),
    DetailsDismissed,
    AddToCart { product_id: u64, source: AddSource },
    MoveCursor(Move),
    ScrollDetail(i16),
    Tick(Instant),
    Quit,
}

/// Owns the session state and applies every event to it.
pub struct RenderController {
    categories: CategoryIndex,
    catalog: ProductCatalog,
    cart: CartStore,
    category_region: RegionState,
    product_region: RegionState,
    cursor: usize,
    columns: usize,
    detail: Option<u64>,
    detail_scroll: u16,
    toast: Option<Toast>,
    toast_duration: Duration,
    running: bool,
}

impl RenderController {
    pub fn new(cart: CartStore, toast_duration: Duration) -> Self {
        Self {
            categories: CategoryIndex::new(),
            catalog: ProductCatalog::new(),
            cart,
            category_region: RegionState::Loading,
            product_region: RegionState::Loading,
            cursor: 0,
            columns: 1,
            detail: None,
            detail_scroll: 0,
            toast: None,
            toast_duration,
            running: true,
        }
    }

    pub fn dispatch(&mut self, event: Event) {
        match event {
            Event::CategoriesLoaded(result) => self.on_categories_loaded(result),
            Event::ProductsLoaded(result) => self.on_products_loaded(result),
            Event::CategorySelected(category) => self.on_category_selected(&category),
            Event::NextCategory => {
                let next = self.categories.next().to_string();
                self.on_category_selected(&next);
            }
            Event::PreviousCategory => {
                let previous = self.categories.previous().to_string();
                self.on_category_selected(&previous);
            }
            Event::DetailsRequested(id) => self.on_details_requested(id),
            Event::DetailsDismissed => {
                self.detail = None;
                self.detail_scroll = 0;
            }
            Event::AddToCart { product_id, source } => self.on_add_to_cart(product_id, source),
            Event::MoveCursor(direction) => self.move_cursor(direction),
            Event::ScrollDetail(delta) => {
                if self.detail.is_some() {
                    self.detail_scroll = self.detail_scroll.saturating_add_signed(delta);
                }
            }
            Event::Tick(now) => {
                if self.toast.as_ref().is_some_and(|t| now >= t.expires_at) {
                    self.toast = None;
                }
            }
            Event::Quit => self.running = false,
        }
    }

    fn on_categories_loaded(&mut self, result: Result<Vec<String>, FetchError>) {
        if self.categories.is_loaded() {
            tracing::warn!("categories already loaded, ignoring second result");
            return;
        }
        match result {
            Ok(categories) => {
                tracing::info!(count = categories.len(), "categories loaded");
                self.categories.load(categories);
                self.category_region = RegionState::Ready;
            }
            Err(e) => {
                tracing::error!(error = %e, "category region unavailable");
                self.category_region = RegionState::Failed(CATEGORIES_FAILED.to_string());
            }
        }
    }

    fn on_products_loaded(&mut self, result: Result<Vec<Product>, FetchError>) {
        if self.catalog.is_loaded() {
            tracing::warn!("products already loaded, ignoring second result");
            return;
        }
        match result {
            Ok(products) => {
                self.catalog.load(products);
                tracing::info!(count = self.catalog.len(), "products loaded");
                self.product_region = RegionState::Ready;
                self.cursor = 0;
            }
            Err(e) => {
                tracing::error!(error = %e, "product region unavailable");
                self.product_region = RegionState::Failed(PRODUCTS_FAILED.to_string());
            }
        }
    }

    fn on_category_selected(&mut self, category: &str) {
        if self.categories.select(category) {
            tracing::debug!(category, "category selected");
            self.cursor = 0;
        } else {
            tracing::debug!(category, "ignoring unknown category");
        }
    }

    fn on_details_requested(&mut self, id: u64) {
        if self.catalog.get(id).is_some() {
            self.detail = Some(id);
            self.detail_scroll = 0;
        } else {
            tracing::debug!(id, "details requested for unknown product");
        }
    }

    fn on_add_to_cart(&mut self, id: u64, source: AddSource) {
        let Some(product) = self.catalog.get(id) else {
            tracing::debug!(id, ?source, "add to cart for unknown product");
            return;
        };
        let text = format!("{} added to cart!", product.title);
        let count = self.cart.increment();
        tracing::info!(id, ?source, count, "added to cart");
        self.toast = Some(Toast {
            text,
            expires_at: Instant::now() + self.toast_duration,
        });
    }

    fn move_cursor(&mut self, direction: Move) {
        let len = self.visible_len();
        if len == 0 {
            self.cursor = 0;
            return;
        }
        let columns = self.columns.max(1);
        self.cursor = match direction {
            Move::Left => self.cursor.saturating_sub(1),
            Move::Right => (self.cursor + 1).min(len - 1),
            Move::Up => self.cursor.checked_sub(columns).unwrap_or(self.cursor),
            Move::Down => {
                if self.cursor + columns < len {
                    self.cursor + columns
                } else {
                    self.cursor
                }
            }
        };
    }

    /// Grid width used for up/down cursor moves; set by the view each frame.
    pub fn set_columns(&mut self, columns: usize) {
        self.columns = columns.max(1);
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn category_region(&self) -> &RegionState {
        &self.category_region
    }

    pub fn product_region(&self) -> &RegionState {
        &self.product_region
    }

    pub fn categories(&self) -> &CategoryIndex {
        &self.categories
    }

    /// Products of the active category, `None` until the catalog is loaded.
    pub fn visible_products(&self) -> Option<Vec<&Product>> {
        self.catalog.filtered_by(self.categories.active())
    }

    pub fn visible_records(&self) -> Option<Vec<DisplayRecord>> {
        self.visible_products()
            .map(|products| products.into_iter().map(present).collect())
    }

    fn visible_len(&self) -> usize {
        self.visible_products().map(|p| p.len()).unwrap_or(0)
    }

    pub fn cursor(&self) -> usize {
        self.cursor.min(self.visible_len().saturating_sub(1))
    }

    pub fn focused_product_id(&self) -> Option<u64> {
        let products = self.visible_products()?;
        products.get(self.cursor()).map(|p| p.id)
    }

    pub fn detail_id(&self) -> Option<u64> {
        self.detail
    }

    pub fn detail_record(&self) -> Option<DisplayRecord> {
        self.detail.and_then(|id| self.catalog.get(id)).map(present)
    }

    pub fn detail_scroll(&self) -> u16 {
        self.detail_scroll
    }

    pub fn cart_count(&self) -> u64 {
        self.cart.get()
    }

    pub fn toast(&self) -> Option<&str> {
        self.toast.as_ref().map(|t| t.text.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::{FileStore, MemoryStore};
    use crate::catalog::tests::sample;

    fn controller() -> RenderController {
        RenderController::new(CartStore::in_memory(), Duration::from_millis(2000))
    }

    fn loaded() -> RenderController {
        let mut c = controller();
        c.dispatch(Event::CategoriesLoaded(Ok(vec![
            "electronics".into(),
            "jewelery".into(),
            "men's clothing".into(),
        ])));
        c.dispatch(Event::ProductsLoaded(Ok(sample())));
        c
    }

    fn visible_ids(c: &RenderController) -> Vec<u64> {
        c.visible_products().unwrap().iter().map(|p| p.id).collect()
    }

    fn parse_failure() -> FetchError {
        FetchError::Parse(serde_json::from_str::<Vec<String>>("{").unwrap_err())
    }

    #[test]
    fn regions_start_loading() {
        let c = controller();
        assert_eq!(c.category_region(), &RegionState::Loading);
        assert_eq!(c.product_region(), &RegionState::Loading);
        assert!(c.visible_products().is_none());
    }

    #[test]
    fn fetches_complete_in_any_order() {
        let mut c = controller();
        c.dispatch(Event::ProductsLoaded(Ok(sample())));
        assert_eq!(c.product_region(), &RegionState::Ready);
        assert_eq!(c.category_region(), &RegionState::Loading);
        assert_eq!(visible_ids(&c), vec![1, 2, 3, 4, 5]);

        c.dispatch(Event::CategoriesLoaded(Ok(vec!["jewelery".into()])));
        assert!(c.categories().is_active("all"));
        assert_eq!(visible_ids(&c), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn category_failure_leaves_products_alone() {
        let mut c = controller();
        c.dispatch(Event::CategoriesLoaded(Err(parse_failure())));
        c.dispatch(Event::ProductsLoaded(Ok(sample())));
        assert_eq!(c.category_region(), &RegionState::Failed(CATEGORIES_FAILED.to_string()));
        assert_eq!(c.product_region(), &RegionState::Ready);
    }

    #[test]
    fn product_failure_leaves_categories_alone() {
        let mut c = controller();
        c.dispatch(Event::ProductsLoaded(Err(parse_failure())));
        c.dispatch(Event::CategoriesLoaded(Ok(vec!["jewelery".into()])));
        assert_eq!(c.product_region(), &RegionState::Failed(PRODUCTS_FAILED.to_string()));
        assert_eq!(c.category_region(), &RegionState::Ready);
        assert!(c.visible_records().is_none());
    }

    #[test]
    fn selecting_filters_and_back_to_all_restores() {
        let mut c = loaded();
        let initial = visible_ids(&c);

        c.dispatch(Event::CategorySelected("jewelery".into()));
        assert_eq!(visible_ids(&c), vec![2, 5]);
        assert!(c.categories().is_active("jewelery"));

        c.dispatch(Event::CategorySelected("all".into()));
        assert_eq!(visible_ids(&c), initial);
    }

    #[test]
    fn unknown_category_keeps_selection() {
        let mut c = loaded();
        c.dispatch(Event::CategorySelected("electronics".into()));
        c.dispatch(Event::CategorySelected("garden".into()));
        assert_eq!(c.categories().active(), "electronics");
        assert_eq!(visible_ids(&c), vec![4]);
    }

    #[test]
    fn category_with_no_products_is_empty_not_unloaded() {
        let mut c = controller();
        c.dispatch(Event::CategoriesLoaded(Ok(vec!["garden".into()])));
        c.dispatch(Event::ProductsLoaded(Ok(sample())));
        c.dispatch(Event::CategorySelected("garden".into()));
        assert_eq!(c.visible_products().map(|p| p.len()), Some(0));
        assert_eq!(c.focused_product_id(), None);
    }

    #[test]
    fn cycling_categories() {
        let mut c = loaded();
        c.dispatch(Event::NextCategory);
        assert_eq!(c.categories().active(), "electronics");
        c.dispatch(Event::PreviousCategory);
        c.dispatch(Event::PreviousCategory);
        assert_eq!(c.categories().active(), "men's clothing");
    }

    #[test]
    fn add_to_cart_from_every_source() {
        let mut c = loaded();
        for source in [AddSource::Card, AddSource::Detail, AddSource::Delegated] {
            c.dispatch(Event::AddToCart { product_id: 3, source });
        }
        assert_eq!(c.cart_count(), 3);
        assert_eq!(c.toast(), Some("Product 3 added to cart!"));
    }

    #[test]
    fn add_resolves_against_full_catalog() {
        let mut c = loaded();
        c.dispatch(Event::CategorySelected("jewelery".into()));
        c.dispatch(Event::AddToCart { product_id: 4, source: AddSource::Delegated });
        assert_eq!(c.cart_count(), 1);
    }

    #[test]
    fn unknown_product_is_a_silent_noop() {
        let mut c = loaded();
        c.dispatch(Event::AddToCart { product_id: 99999, source: AddSource::Delegated });
        assert_eq!(c.cart_count(), 0);
        assert!(c.toast().is_none());

        c.dispatch(Event::DetailsRequested(99999));
        assert!(c.detail_record().is_none());
    }

    #[test]
    fn add_before_products_load_is_ignored() {
        let mut c = controller();
        c.dispatch(Event::AddToCart { product_id: 1, source: AddSource::Card });
        assert_eq!(c.cart_count(), 0);
    }

    #[test]
    fn cart_count_persists_across_controllers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.toml");

        let mut c = RenderController::new(
            CartStore::new(Box::new(FileStore::new(&path))),
            Duration::from_millis(10),
        );
        c.dispatch(Event::ProductsLoaded(Ok(sample())));
        c.dispatch(Event::AddToCart { product_id: 1, source: AddSource::Card });
        c.dispatch(Event::AddToCart { product_id: 2, source: AddSource::Card });

        let restarted = RenderController::new(
            CartStore::new(Box::new(FileStore::new(&path))),
            Duration::from_millis(10),
        );
        assert_eq!(restarted.cart_count(), 2);
    }

    #[test]
    fn toast_expires_on_tick() {
        let mut c = loaded();
        c.dispatch(Event::AddToCart { product_id: 1, source: AddSource::Detail });
        c.dispatch(Event::Tick(Instant::now()));
        assert!(c.toast().is_some());
        c.dispatch(Event::Tick(Instant::now() + Duration::from_secs(3)));
        assert!(c.toast().is_none());
    }

    #[test]
    fn details_open_until_dismissed() {
        let mut c = loaded();
        c.dispatch(Event::DetailsRequested(5));
        assert_eq!(c.detail_id(), Some(5));

        c.dispatch(Event::CategorySelected("electronics".into()));
        c.dispatch(Event::AddToCart { product_id: 5, source: AddSource::Detail });
        assert_eq!(c.detail_record().map(|r| r.id), Some(5));

        c.dispatch(Event::ScrollDetail(3));
        assert_eq!(c.detail_scroll(), 3);
        c.dispatch(Event::ScrollDetail(-5));
        assert_eq!(c.detail_scroll(), 0);

        c.dispatch(Event::DetailsDismissed);
        assert!(c.detail_id().is_none());
        assert_eq!(c.cart_count(), 1);
        assert_eq!(c.categories().active(), "electronics");
    }

    #[test]
    fn cursor_moves_within_grid() {
        let mut c = loaded();
        c.set_columns(2);
        assert_eq!(c.focused_product_id(), Some(1));
        c.dispatch(Event::MoveCursor(Move::Down));
        assert_eq!(c.focused_product_id(), Some(3));
        c.dispatch(Event::MoveCursor(Move::Right));
        assert_eq!(c.focused_product_id(), Some(4));
        c.dispatch(Event::MoveCursor(Move::Down));
        assert_eq!(c.focused_product_id(), Some(4));
        c.dispatch(Event::MoveCursor(Move::Right));
        c.dispatch(Event::MoveCursor(Move::Right));
        assert_eq!(c.focused_product_id(), Some(5));
        c.dispatch(Event::MoveCursor(Move::Up));
        assert_eq!(c.focused_product_id(), Some(3));

        c.dispatch(Event::CategorySelected("jewelery".into()));
        assert_eq!(c.focused_product_id(), Some(2));
    }

    #[test]
    fn second_load_is_ignored() {
        let mut c = loaded();
        c.dispatch(Event::ProductsLoaded(Ok(Vec::new())));
        assert_eq!(visible_ids(&c).len(), 5);
        c.dispatch(Event::CategoriesLoaded(Err(parse_failure())));
        assert_eq!(c.category_region(), &RegionState::Ready);
    }

    #[test]
    fn quit_stops_the_loop() {
        let mut c = controller();
        assert!(c.is_running());
        c.dispatch(Event::Quit);
        assert!(!c.is_running());
    }

    #[test]
    fn memory_store_counts() {
        let mut c = RenderController::new(
            CartStore::new(Box::new(MemoryStore::default())),
            Duration::from_millis(10),
        );
        c.dispatch(Event::ProductsLoaded(Ok(sample())));
        for _ in 0..4 {
            c.dispatch(Event::AddToCart { product_id: 2, source: AddSource::Card });
        }
        assert_eq!(c.cart_count(), 4);
    }
}
