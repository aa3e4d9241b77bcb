//! Grouping of resolved results into a render plan.

use crate::config::ClassTokens;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::trace;
use typeahead_types::{
    CategoryBucket, FieldNames, ItemContent, LabelElement, LabelSpan, PlanEntry, RenderPlan,
    RenderedItem, ResultItem,
};

/// Builds the visible content of one item.
///
/// Receives the result and the label class token; label elements in the
/// returned content are highlighted and read back on selection.
pub trait ItemFormatter: Send + Sync {
    fn format(&self, result: &ResultItem, label_class: &str) -> ItemContent;
}

impl<F> ItemFormatter for F
where
    F: Fn(&ResultItem, &str) -> ItemContent + Send + Sync,
{
    fn format(&self, result: &ResultItem, label_class: &str) -> ItemContent {
        self(result, label_class)
    }
}

/// Partitions results into category buckets and builds render plans
pub struct Presenter {
    tokens: ClassTokens,
    fields: FieldNames,
    highlight: bool,
    formatter: Option<Arc<dyn ItemFormatter>>,
    generation: u64,
}

impl fmt::Debug for Presenter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Presenter")
            .field("tokens", &self.tokens)
            .field("highlight", &self.highlight)
            .field("custom_format", &self.formatter.is_some())
            .field("generation", &self.generation)
            .finish()
    }
}

impl Presenter {
    #[must_use]
    pub fn new(
        tokens: ClassTokens,
        fields: FieldNames,
        highlight: bool,
        formatter: Option<Arc<dyn ItemFormatter>>,
    ) -> Self {
        Self {
            tokens,
            fields,
            highlight,
            formatter,
            generation: 0,
        }
    }

    #[must_use]
    pub fn tokens(&self) -> &ClassTokens {
        &self.tokens
    }

    /// Build a fresh plan for `results`.
    ///
    /// Results are visited in source order. A category bucket is created the
    /// first time its value is seen and placed at that point in the top-level
    /// sequence; uncategorized results go straight into the top level. No
    /// bucket survives from a previous call.
    pub fn present(&mut self, results: &[ResultItem], query: &str) -> RenderPlan {
        self.generation += 1;

        let mut entries: Vec<PlanEntry> = Vec::new();
        let mut buckets: HashMap<String, usize> = HashMap::new();

        for (index, result) in results.iter().enumerate() {
            let item = self.render_item(index, result, query);

            let Some(category) = result.category(&self.fields) else {
                entries.push(PlanEntry::Item(item));
                continue;
            };

            let slot = if let Some(&slot) = buckets.get(&category) {
                slot
            } else {
                trace!("New category bucket '{}'", category);
                entries.push(PlanEntry::Category(CategoryBucket {
                    class: self.tokens.category(&category),
                    title: category.clone(),
                    name: category.clone(),
                    items: Vec::new(),
                }));
                buckets.insert(category, entries.len() - 1);
                entries.len() - 1
            };

            if let Some(PlanEntry::Category(bucket)) = entries.get_mut(slot) {
                bucket.items.push(item);
            }
        }

        RenderPlan {
            generation: self.generation,
            query: query.to_string(),
            menu_class: self.tokens.menu.clone(),
            entries,
        }
    }

    fn render_item(&self, index: usize, result: &ResultItem, query: &str) -> RenderedItem {
        let mut content = match &self.formatter {
            Some(formatter) => formatter.format(result, &self.tokens.label),
            None => ItemContent::label(&self.tokens.label, result.label(&self.fields)),
        };

        if self.highlight {
            for label in content.labels_mut() {
                highlight_label(label, query);
            }
        }

        RenderedItem {
            index,
            class: self.tokens.item.clone(),
            content,
        }
    }
}

/// Lower-case the label text and emphasize the first occurrence of `query`.
///
/// The query itself is not case-folded, so a query with upper-case letters
/// never matches a highlighted label.
pub fn highlight_label(label: &mut LabelElement, query: &str) {
    let text = label.text().to_lowercase();
    label.spans = highlight_spans(&text, query);
}

fn highlight_spans(text: &str, query: &str) -> Vec<LabelSpan> {
    let found = if query.is_empty() {
        None
    } else {
        text.find(query)
    };

    let Some(start) = found else {
        return vec![LabelSpan::Plain(text.to_string())];
    };

    let end = start + query.len();
    let mut spans = Vec::with_capacity(3);
    if start > 0 {
        spans.push(LabelSpan::Plain(text[..start].to_string()));
    }
    spans.push(LabelSpan::Emphasis(text[start..end].to_string()));
    if end < text.len() {
        spans.push(LabelSpan::Plain(text[end..].to_string()));
    }
    spans
}
