//! Shared types for the typeahead suggestion engine.
//!
//! This crate provides the result model (label and category extraction), the
//! render plan handed to renderers, and the event/update vocabulary exchanged
//! between `typeahead-core` and its host. All types are serializable so a host
//! can forward them across a process or FFI boundary unchanged.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::Write as _;

/// Default property name holding a result's label
pub const DEFAULT_LABEL_FIELD: &str = "label";

/// Default property name holding a result's category
pub const DEFAULT_CATEGORY_FIELD: &str = "type";

/// Field names used to read labels and categories out of structured results
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldNames {
    pub label: String,
    pub category: String,
}

impl Default for FieldNames {
    fn default() -> Self {
        Self {
            label: DEFAULT_LABEL_FIELD.to_string(),
            category: DEFAULT_CATEGORY_FIELD.to_string(),
        }
    }
}

/// One candidate returned by a result source.
///
/// Either a plain value (usually a string) or a structured record exposing a
/// label field and optionally a category field. Results carry no identity
/// beyond structural equality and are never deduplicated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultItem(Value);

impl ResultItem {
    #[must_use]
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Raw JSON value backing this result
    #[must_use]
    pub fn value(&self) -> &Value {
        &self.0
    }

    /// Label of this result.
    ///
    /// Uses the configured label field when the result exposes it, otherwise
    /// the whole result stands in as the label (plain string result sets, or
    /// records missing the field).
    #[must_use]
    pub fn label(&self, fields: &FieldNames) -> String {
        match self.field(&fields.label) {
            Some(value) => display_value(value),
            None => display_value(&self.0),
        }
    }

    /// Category of this result, `None` for the implicit uncategorized bucket
    #[must_use]
    pub fn category(&self, fields: &FieldNames) -> Option<String> {
        self.field(&fields.category).map(display_value)
    }

    fn field(&self, name: &str) -> Option<&Value> {
        self.0.as_object()?.get(name)
    }
}

impl From<Value> for ResultItem {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl From<&str> for ResultItem {
    fn from(label: &str) -> Self {
        Self(Value::String(label.to_string()))
    }
}

impl From<String> for ResultItem {
    fn from(label: String) -> Self {
        Self(Value::String(label))
    }
}

/// Strings display as-is; every other JSON value uses its compact form
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Open/closed state of the suggestion surface
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MenuState {
    #[default]
    Closed,
    Open,
}

/// A run of label text, either plain or emphasized (matched query)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum LabelSpan {
    Plain(String),
    Emphasis(String),
}

impl LabelSpan {
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Plain(text) | Self::Emphasis(text) => text,
        }
    }
}

/// The label element of a rendered item, tagged with the label class token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelElement {
    pub class: String,
    pub spans: Vec<LabelSpan>,
}

impl LabelElement {
    #[must_use]
    pub fn plain(class: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            spans: vec![LabelSpan::Plain(text.into())],
        }
    }

    /// Visible text of the label, emphasis runs included
    #[must_use]
    pub fn text(&self) -> String {
        self.spans.iter().map(LabelSpan::text).collect()
    }

    /// HTML-ish markup for hosts that render strings: text is escaped and
    /// emphasis runs are wrapped in `<strong>`.
    #[must_use]
    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        for span in &self.spans {
            match span {
                LabelSpan::Plain(text) => out.push_str(&escape_markup(text)),
                LabelSpan::Emphasis(text) => {
                    let _ = write!(out, "<strong>{}</strong>", escape_markup(text));
                }
            }
        }
        out
    }
}

fn escape_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// A piece of an item's visible content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContentNode {
    /// The label element (highlighted and read back on selection)
    Label(LabelElement),
    /// Host-defined markup produced by a custom formatter
    Markup { markup: String },
}

/// Visible content of one rendered item
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemContent {
    pub nodes: Vec<ContentNode>,
}

impl ItemContent {
    /// Default content: a single label element
    #[must_use]
    pub fn label(class: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            nodes: vec![ContentNode::Label(LabelElement::plain(class, text))],
        }
    }

    #[must_use]
    pub fn with_label(mut self, class: impl Into<String>, text: impl Into<String>) -> Self {
        self.nodes
            .push(ContentNode::Label(LabelElement::plain(class, text)));
        self
    }

    #[must_use]
    pub fn with_markup(mut self, markup: impl Into<String>) -> Self {
        self.nodes.push(ContentNode::Markup {
            markup: markup.into(),
        });
        self
    }

    pub fn labels(&self) -> impl Iterator<Item = &LabelElement> {
        self.nodes.iter().filter_map(|node| match node {
            ContentNode::Label(label) => Some(label),
            ContentNode::Markup { .. } => None,
        })
    }

    pub fn labels_mut(&mut self) -> impl Iterator<Item = &mut LabelElement> {
        self.nodes.iter_mut().filter_map(|node| match node {
            ContentNode::Label(label) => Some(label),
            ContentNode::Markup { .. } => None,
        })
    }

    /// Concatenated text of every label element (empty when there is none)
    #[must_use]
    pub fn label_text(&self) -> String {
        self.labels().map(LabelElement::text).collect()
    }
}

/// One entry of the suggestion list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedItem {
    /// Position of the backing result in the resolved result sequence
    pub index: usize,
    /// Item class token
    pub class: String,
    pub content: ItemContent,
}

impl RenderedItem {
    /// Text committed to the input when this item is selected
    #[must_use]
    pub fn label_text(&self) -> String {
        self.content.label_text()
    }
}

/// A titled group of items sharing one category value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryBucket {
    /// Category value as found on the results
    pub name: String,
    /// Category-scoped class token
    pub class: String,
    pub title: String,
    pub items: Vec<RenderedItem>,
}

/// A top-level entry of the menu: an uncategorized item or a category group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlanEntry {
    Item(RenderedItem),
    Category(CategoryBucket),
}

/// Complete description of what the suggestion surface displays for one
/// resolution. Each plan fully replaces the previous one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderPlan {
    /// Monotonic plan counter; clicks reference it
    pub generation: u64,
    /// Live input value the plan was built (and highlighted) against
    pub query: String,
    /// Menu container class token
    pub menu_class: String,
    pub entries: Vec<PlanEntry>,
}

impl RenderPlan {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every rendered item in document order
    pub fn items(&self) -> impl Iterator<Item = &RenderedItem> {
        self.entries.iter().flat_map(|entry| match entry {
            PlanEntry::Item(item) => std::slice::from_ref(item).iter(),
            PlanEntry::Category(bucket) => bucket.items.iter(),
        })
    }

    #[must_use]
    pub fn item_count(&self) -> usize {
        self.items().count()
    }

    /// Find a rendered item by the index of its backing result
    #[must_use]
    pub fn item(&self, index: usize) -> Option<&RenderedItem> {
        self.items().find(|item| item.index == index)
    }

    pub fn categories(&self) -> impl Iterator<Item = &CategoryBucket> {
        self.entries.iter().filter_map(|entry| match entry {
            PlanEntry::Category(bucket) => Some(bucket),
            PlanEntry::Item(_) => None,
        })
    }
}

/// Events sent from the host (input element and renderer) to the core
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WidgetEvent {
    /// Raw input change (keystroke) with the current input text
    Input { text: String },

    /// Input gained focus
    Focus,

    /// Input lost focus
    Blur,

    /// A rendered item was clicked
    ItemClicked { generation: u64, index: usize },

    /// Widget is being destroyed
    Teardown,
}

/// Notifications sent from the core to observers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WidgetUpdate {
    /// Menu opened (focus or resolution)
    Opened { fade_in_ms: u64 },

    /// Menu closed (blur, selection or empty query)
    Closed { fade_out_ms: u64 },

    /// A new render plan was installed
    Rendered { generation: u64, item_count: usize },

    /// An item was selected and its label written into the input
    Selected { value: String },

    /// Resolving a query failed (transport error, malformed payload, timeout)
    ResolutionFailed { query: String, message: String },
}
