//! # Terminal Rendering
//!
//! Turns catalog state into plain-text output: one card per product plus the
//! transient status lines of the list view.
//!
//! ## Card Layout
//!
//! ```text
//! ----------------------------------------
//! Product : Essence Mascara Lash Princess
//! Essence | beauty | Rating:4.94 | 5 in stock
//! $9.99 | 7.17 %
//! Popular mascara
//! https://cdn.dummyjson.com/products/images/beauty/1/thumbnail.png
//! ```
//!
//! ## Status Lines
//!
//! - `Loading...` while a fetch is in flight
//! - `No more data to load.` once the catalog is exhausted
//! - `Error: <message>` when the last fetch failed

use crate::catalog::CatalogState;
use crate::models::Product;

pub const LOADING: &str = "Loading...";
pub const END_OF_RESULTS: &str = "No more data to load.";

const RULE: &str = "----------------------------------------";

/// Renders a single product card.
///
/// The brand is left out when the record has none.
pub fn render_card(product: &Product) -> String {
    let mut meta = Vec::with_capacity(4);
    if !product.brand.is_empty() {
        meta.push(product.brand.clone());
    }
    meta.push(product.category.clone());
    meta.push(format!("Rating:{}", product.rating));
    meta.push(format!("{} in stock", product.stock));

    format!(
        "{RULE}\nProduct : {}\n{}\n${} | {} %\n{}\n{}",
        product.title,
        meta.join(" | "),
        product.price,
        product.discount_percentage,
        product.description,
        product.thumbnail,
    )
}

/// Heading printed after the list was reset
pub fn render_header(state: &CatalogState) -> String {
    if state.search_query.is_empty() {
        "== Browsing all products ==".to_string()
    } else {
        format!("== Results for \"{}\" ==", state.search_query)
    }
}

/// Status lines for the current state, in display order
pub fn render_status(state: &CatalogState) -> Vec<String> {
    let mut lines = Vec::new();

    if state.is_loading {
        lines.push(LOADING.to_string());
    } else if !state.has_more {
        lines.push(END_OF_RESULTS.to_string());
    }

    if let Some(error) = &state.error {
        lines.push(format!("Error: {}", error.message()));
    }

    lines
}

/// Incrementally prints a changing catalog.
///
/// Remembers what was already shown so that each state change only emits the
/// newly appended cards and status lines that changed.
#[derive(Debug, Default)]
pub struct ListView {
    shown_items: usize,
    generation: u64,
    last_status: Vec<String>,
}

impl ListView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the lines to print for `state`, given everything printed so far
    pub fn update(&mut self, state: &CatalogState) -> Vec<String> {
        let mut out = Vec::new();

        if state.generation != self.generation {
            self.generation = state.generation;
            self.shown_items = 0;
            self.last_status.clear();
            out.push(render_header(state));
        }

        for product in state.items.get(self.shown_items..).unwrap_or(&[]) {
            out.push(render_card(product));
        }
        self.shown_items = state.items.len();

        let status = render_status(state);
        if status != self.last_status {
            out.extend(status.iter().cloned());
            self.last_status = status;
        }

        out
    }
}
