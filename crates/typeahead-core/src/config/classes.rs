//! Class tokens resolved from the configured templates.

use super::WidgetConfig;

const MENU_CLASS_PLACEHOLDER: &str = "{menu-class}";
const CATEGORY_PLACEHOLDER: &str = "{category}";

/// Class tokens tagging the menu, its items, labels and category groups.
///
/// `{menu-class}` is substituted once at construction; `{category}` is
/// substituted per category bucket. Only the first occurrence of each
/// placeholder is replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassTokens {
    pub menu: String,
    pub label: String,
    pub item: String,
    category_template: String,
}

impl ClassTokens {
    #[must_use]
    pub fn resolve(config: &WidgetConfig) -> Self {
        let menu = config.menu_class.clone();
        let expand = |template: &str| template.replacen(MENU_CLASS_PLACEHOLDER, &menu, 1);

        Self {
            label: expand(&config.label_class),
            item: expand(&config.item_class),
            category_template: expand(&config.category_class),
            menu,
        }
    }

    /// Class token for the bucket of `category`
    #[must_use]
    pub fn category(&self, category: &str) -> String {
        self.category_template
            .replacen(CATEGORY_PLACEHOLDER, category, 1)
    }
}
