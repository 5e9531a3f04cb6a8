//! Inventory page rendering.

use arsenal_core::service::submission::{
    ACTION_FIELD, BULK_IMPORT_ACTION, IMPORT_FILE_FIELD,
};
use arsenal_core::{marker_key, FlagKind, InventoryView, ItemKey};
use handlebars::Handlebars;
use serde::Serialize;

const INDEX_TEMPLATE: &str = "index";

#[derive(Debug, Serialize)]
struct ItemRow<'a> {
    name: &'a str,
    blueprint: bool,
    mastered: bool,
    blueprint_field: String,
    mastered_field: String,
}

#[derive(Debug, Serialize)]
struct CategorySection<'a> {
    category: &'a str,
    owned: usize,
    mastered: usize,
    total: usize,
    items: Vec<ItemRow<'a>>,
}

#[derive(Debug, Serialize)]
struct IndexPage<'a> {
    categories: Vec<CategorySection<'a>>,
    owned: usize,
    mastered: usize,
    total: usize,
    action_field: &'static str,
    bulk_import_action: &'static str,
    import_file_field: &'static str,
    version: &'static str,
}

/// Renders pages from templates compiled at startup.
pub struct PageRenderer {
    registry: Handlebars<'static>,
}

impl PageRenderer {
    pub fn new() -> Result<Self, handlebars::TemplateError> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        registry.register_template_string(
            INDEX_TEMPLATE,
            include_str!("../../templates/index.hbs"),
        )?;
        Ok(Self { registry })
    }

    /// Renders the grouped inventory with one checkbox pair per item.
    pub fn index(&self, view: &InventoryView) -> Result<String, handlebars::RenderError> {
        let categories = view
            .categories
            .iter()
            .map(|group| CategorySection {
                category: group.category.as_str(),
                owned: group.owned,
                mastered: group.mastered,
                total: group.total,
                items: group
                    .items
                    .iter()
                    .map(|item| {
                        let key = ItemKey::new(group.category.as_str(), item.name.as_str());
                        ItemRow {
                            name: item.name.as_str(),
                            blueprint: item.blueprint,
                            mastered: item.mastered,
                            blueprint_field: marker_key(FlagKind::Blueprint, &key),
                            mastered_field: marker_key(FlagKind::Mastered, &key),
                        }
                    })
                    .collect(),
            })
            .collect();

        let page = IndexPage {
            categories,
            owned: view.owned,
            mastered: view.mastered,
            total: view.total,
            action_field: ACTION_FIELD,
            bulk_import_action: BULK_IMPORT_ACTION,
            import_file_field: IMPORT_FILE_FIELD,
            version: arsenal_core::core_version(),
        };
        self.registry.render(INDEX_TEMPLATE, &page)
    }
}
