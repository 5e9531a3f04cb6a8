//! Presentation projection of the progress store.
//!
//! # Responsibility
//! - Group items by category for display, with per-group counters.
//!
//! # Invariants
//! - Input order is preserved within and across categories; feeding the
//!   store's `get_all` output yields categories and names in store order.
//! - Building a view has no side effects.

use crate::model::item::Item;
use serde::Serialize;

/// One item row as displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemView {
    pub name: String,
    pub blueprint: bool,
    pub mastered: bool,
}

/// Items of one category, in store order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryView {
    pub category: String,
    pub items: Vec<ItemView>,
    /// Items with the blueprint flag set.
    pub owned: usize,
    pub mastered: usize,
    pub total: usize,
}

impl CategoryView {
    fn new(category: String) -> Self {
        Self {
            category,
            items: Vec::new(),
            owned: 0,
            mastered: 0,
            total: 0,
        }
    }

    fn push(&mut self, item: Item) {
        self.total += 1;
        self.owned += usize::from(item.blueprint);
        self.mastered += usize::from(item.mastered);
        self.items.push(ItemView {
            name: item.name,
            blueprint: item.blueprint,
            mastered: item.mastered,
        });
    }
}

/// Grouped inventory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InventoryView {
    pub categories: Vec<CategoryView>,
    pub owned: usize,
    pub mastered: usize,
    pub total: usize,
}

impl InventoryView {
    pub fn category(&self, category: &str) -> Option<&CategoryView> {
        self.categories
            .iter()
            .find(|group| group.category == category)
    }
}

/// Groups items by category.
///
/// Consecutive items sharing a category form one group. Items from a
/// category that reappears after another one are merged into its first
/// group, so each category is listed once even for unsorted input.
pub fn build_view<I>(items: I) -> InventoryView
where
    I: IntoIterator<Item = Item>,
{
    let mut view = InventoryView::default();
    for item in items {
        view.total += 1;
        view.owned += usize::from(item.blueprint);
        view.mastered += usize::from(item.mastered);

        // Scanning from the back finds the current group first for sorted input.
        let position = match view
            .categories
            .iter()
            .rposition(|group| group.category == item.category)
        {
            Some(position) => position,
            None => {
                view.categories.push(CategoryView::new(item.category.clone()));
                view.categories.len() - 1
            }
        };
        view.categories[position].push(item);
    }
    view
}
