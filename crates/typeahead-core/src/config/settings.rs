use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use typeahead_types::{FieldNames, ResultItem};

/// Placeholder replaced by the query in remote URL templates
pub const QUERY_PLACEHOLDER: &str = "{query}";

/// Widget configuration.
///
/// Every option is optional; missing options take the defaults below. Option
/// names are camelCase on the wire, snake_case spellings
/// (`menu_class`, `label_name`, ...) are accepted as aliases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetConfig {
    /// Local candidates (JSON array) or a remote URL template (string)
    #[serde(default)]
    pub source: SourceConfig,

    /// Debounce delay in milliseconds
    #[serde(default = "default_delay")]
    pub delay: u64,

    /// Whether matching terms are emphasized in result labels
    #[serde(default = "default_highlight")]
    pub highlight: bool,

    /// Fade in duration for the menu (ms)
    #[serde(default = "default_fade", alias = "fade_in")]
    pub fade_in: u64,

    /// Fade out duration for the menu (ms)
    #[serde(default = "default_fade", alias = "fade_out")]
    pub fade_out: u64,

    #[serde(default = "default_menu_class", alias = "menu_class")]
    pub menu_class: String,

    /// Label class template, `{menu-class}` is substituted
    #[serde(default = "default_label_class", alias = "label_class")]
    pub label_class: String,

    /// Category class template, `{menu-class}` and `{category}` are substituted
    #[serde(default = "default_category_class", alias = "category_class")]
    pub category_class: String,

    /// Item class template, `{menu-class}` is substituted
    #[serde(default = "default_item_class", alias = "item_class")]
    pub item_class: String,

    #[serde(default = "default_label_name", alias = "label_name")]
    pub label_name: String,

    #[serde(default = "default_category_name", alias = "category_name")]
    pub category_name: String,

    /// Delay between blur and closing the menu (ms)
    #[serde(default = "default_blur_grace", alias = "blur_grace")]
    pub blur_grace: u64,

    /// Upper bound for a remote fetch (ms); unbounded when absent
    #[serde(default, alias = "fetch_timeout", skip_serializing_if = "Option::is_none")]
    pub fetch_timeout: Option<u64>,
}

/// Where results come from.
///
/// Deserializes untagged: an array is a local candidate list, a string is a
/// remote URL template containing `{query}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SourceConfig {
    Local(Vec<ResultItem>),
    Remote(String),
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self::Local(Vec::new())
    }
}

fn default_delay() -> u64 {
    500
}
fn default_highlight() -> bool {
    true
}
fn default_fade() -> u64 {
    200
}
fn default_menu_class() -> String {
    "mon-autocomplete".to_string()
}
fn default_label_class() -> String {
    "{menu-class}-label".to_string()
}
fn default_category_class() -> String {
    "{menu-class}-{category}".to_string()
}
fn default_item_class() -> String {
    "{menu-class}-item".to_string()
}
fn default_label_name() -> String {
    typeahead_types::DEFAULT_LABEL_FIELD.to_string()
}
fn default_category_name() -> String {
    typeahead_types::DEFAULT_CATEGORY_FIELD.to_string()
}
fn default_blur_grace() -> u64 {
    200
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            source: SourceConfig::default(),
            delay: default_delay(),
            highlight: default_highlight(),
            fade_in: default_fade(),
            fade_out: default_fade(),
            menu_class: default_menu_class(),
            label_class: default_label_class(),
            category_class: default_category_class(),
            item_class: default_item_class(),
            label_name: default_label_name(),
            category_name: default_category_name(),
            blur_grace: default_blur_grace(),
            fetch_timeout: None,
        }
    }
}

impl WidgetConfig {
    /// Config with a local candidate list and default options
    #[must_use]
    pub fn local<I, T>(candidates: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<ResultItem>,
    {
        Self {
            source: SourceConfig::Local(candidates.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    /// Config with a remote URL template and default options
    #[must_use]
    pub fn remote(url_template: impl Into<String>) -> Self {
        Self {
            source: SourceConfig::Remote(url_template.into()),
            ..Self::default()
        }
    }

    /// Parse config from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid JSON or an option has
    /// the wrong shape.
    pub fn from_json(content: &str) -> Result<Self> {
        super::validation::warn_unknown_fields(content, "widget options");
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from file. A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or contains invalid JSON.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Save config to file.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails or the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject option combinations the engine cannot honour.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` naming the offending option.
    pub fn validate(&self) -> Result<()> {
        if self.menu_class.is_empty() {
            return Err(crate::Error::Config("menuClass must not be empty".to_string()));
        }
        if self.label_name.is_empty() || self.category_name.is_empty() {
            return Err(crate::Error::Config(
                "labelName and categoryName must not be empty".to_string(),
            ));
        }
        if let SourceConfig::Remote(template) = &self.source
            && !template.contains(QUERY_PLACEHOLDER)
        {
            tracing::warn!(
                "Remote source template has no {} placeholder: {}",
                QUERY_PLACEHOLDER,
                template
            );
        }
        Ok(())
    }

    #[must_use]
    pub fn field_names(&self) -> FieldNames {
        FieldNames {
            label: self.label_name.clone(),
            category: self.category_name.clone(),
        }
    }

    #[must_use]
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay)
    }

    #[must_use]
    pub fn blur_grace(&self) -> Duration {
        Duration::from_millis(self.blur_grace)
    }

    #[must_use]
    pub fn fade_in(&self) -> Duration {
        Duration::from_millis(self.fade_in)
    }

    #[must_use]
    pub fn fade_out(&self) -> Duration {
        Duration::from_millis(self.fade_out)
    }

    #[must_use]
    pub fn fetch_timeout(&self) -> Option<Duration> {
        self.fetch_timeout.map(Duration::from_millis)
    }
}
