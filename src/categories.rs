/// Pseudo-category meaning "no filter".
pub const ALL: &str = "all";

/// Known categories plus the active selection.
#[derive(Debug, Default)]
pub struct CategoryIndex {
    categories: Vec<String>,
    active: Option<String>,
    loaded: bool,
}

impl CategoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the known categories, keeping server order and dropping duplicates.
    pub fn load(&mut self, categories: Vec<String>) {
        let mut unique: Vec<String> = Vec::with_capacity(categories.len());
        for category in categories {
            if !unique.contains(&category) {
                unique.push(category);
            }
        }
        self.categories = unique;
        self.loaded = true;

        if self.active.as_ref().is_some_and(|a| !self.categories.contains(a)) {
            self.active = None;
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Returns `false` and leaves the selection alone for unknown categories.
    pub fn select(&mut self, category: &str) -> bool {
        if is_all(category) {
            self.active = None;
            true
        } else if self.categories.iter().any(|c| c == category) {
            self.active = Some(category.to_string());
            true
        } else {
            false
        }
    }

    /// Active category, `"all"` when unfiltered.
    pub fn active(&self) -> &str {
        self.active.as_deref().unwrap_or(ALL)
    }

    pub fn is_active(&self, category: &str) -> bool {
        match &self.active {
            None => is_all(category),
            Some(active) => active == category,
        }
    }

    /// Category after the active one, wrapping through "all".
    pub fn next(&self) -> &str {
        let position = self.position();
        let total = self.categories.len() + 1;
        self.at((position + 1) % total)
    }

    pub fn previous(&self) -> &str {
        let position = self.position();
        let total = self.categories.len() + 1;
        self.at((position + total - 1) % total)
    }

    // 0 is "all", n is categories[n - 1]
    fn position(&self) -> usize {
        match &self.active {
            None => 0,
            Some(active) => self
                .categories
                .iter()
                .position(|c| c == active)
                .map(|i| i + 1)
                .unwrap_or(0),
        }
    }

    fn at(&self, position: usize) -> &str {
        if position == 0 {
            ALL
        } else {
            &self.categories[position - 1]
        }
    }
}

pub fn is_all(category: &str) -> bool {
    category == "all" || category == "All"
}

/// `"men's clothing"` stays as is apart from the first letter, `"home-and-garden"` becomes
/// `"Home And Garden"`.
pub fn format_category_name(category: &str) -> String {
    if is_all(category) {
        return "All".to_string();
    }
    category
        .split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
