//! Presenter and source resolution tests

use crate::config::{ClassTokens, WidgetConfig};
use crate::error::ResolutionError;
use crate::present::Presenter;
use crate::source::{Resolution, ResultSource, filter_local, parse_results};
use crate::source::NullTransport;
use proptest::prelude::*;
use serde_json::json;
use std::sync::Arc;
use typeahead_types::{FieldNames, ItemContent, PlanEntry, ResultItem};

fn presenter(highlight: bool) -> Presenter {
    let config = WidgetConfig::default();
    Presenter::new(
        ClassTokens::resolve(&config),
        config.field_names(),
        highlight,
        None,
    )
}

fn item(label: &str, category: Option<&str>) -> ResultItem {
    match category {
        Some(category) => ResultItem::new(json!({"label": label, "type": category})),
        None => ResultItem::new(json!({"label": label})),
    }
}

// ============================================================================
// Grouping
// ============================================================================

#[test]
fn test_buckets_in_first_seen_order() {
    let results = vec![
        item("A", Some("x")),
        item("B", Some("y")),
        item("C", Some("x")),
    ];
    let plan = presenter(false).present(&results, "");

    let buckets: Vec<(String, Vec<String>)> = plan
        .categories()
        .map(|b| (b.name.clone(), b.items.iter().map(|i| i.label_text()).collect()))
        .collect();
    assert_eq!(
        buckets,
        vec![
            ("x".to_string(), vec!["A".to_string(), "C".to_string()]),
            ("y".to_string(), vec!["B".to_string()]),
        ]
    );
}

#[test]
fn test_uncategorized_interleave_with_buckets() {
    let results = vec![
        item("one", None),
        item("two", Some("x")),
        item("three", None),
        item("four", Some("x")),
    ];
    let plan = presenter(false).present(&results, "");

    assert_eq!(plan.entries.len(), 3);
    assert!(matches!(&plan.entries[0], PlanEntry::Item(i) if i.label_text() == "one"));
    assert!(matches!(&plan.entries[1], PlanEntry::Category(b) if b.items.len() == 2));
    assert!(matches!(&plan.entries[2], PlanEntry::Item(i) if i.label_text() == "three"));
    assert_eq!(plan.item_count(), 4);
}

#[test]
fn test_empty_results_give_empty_plan() {
    let plan = presenter(true).present(&[], "zz");
    assert!(plan.is_empty());
    assert_eq!(plan.query, "zz");
    assert_eq!(plan.menu_class, "mon-autocomplete");
}

#[test]
fn test_each_pass_builds_fresh_plan() {
    let mut presenter = presenter(false);
    let first = presenter.present(&[item("A", Some("x"))], "");
    let second = presenter.present(&[item("B", Some("y"))], "");

    assert_eq!(first.generation, 1);
    assert_eq!(second.generation, 2);
    assert_eq!(second.categories().count(), 1);
    assert_eq!(second.categories().next().unwrap().name, "y");
}

#[test]
fn test_non_string_category_uses_json_text() {
    let results = vec![ResultItem::new(json!({"label": "v2", "type": 2}))];
    let plan = presenter(false).present(&results, "");
    let bucket = plan.categories().next().unwrap();
    assert_eq!(bucket.name, "2");
    assert_eq!(bucket.class, "mon-autocomplete-2");
}

#[test]
fn test_custom_field_names() {
    let config = WidgetConfig {
        label_name: "title".to_string(),
        category_name: "kind".to_string(),
        ..WidgetConfig::default()
    };
    let mut presenter = Presenter::new(
        ClassTokens::resolve(&config),
        config.field_names(),
        false,
        None,
    );
    let results = vec![ResultItem::new(json!({"title": "Dune", "kind": "book"}))];
    let plan = presenter.present(&results, "");
    let bucket = plan.categories().next().unwrap();
    assert_eq!(bucket.name, "book");
    assert_eq!(bucket.items[0].label_text(), "Dune");
}

#[test]
fn test_formatter_labels_are_highlighted() {
    let config = WidgetConfig::default();
    let formatter = |result: &ResultItem, label_class: &str| {
        ItemContent::label(label_class, result.label(&FieldNames::default()))
            .with_markup("<em>extra</em>")
            .with_label(label_class, "Second ap")
    };
    let mut presenter = Presenter::new(
        ClassTokens::resolve(&config),
        config.field_names(),
        true,
        Some(Arc::new(formatter)),
    );
    let plan = presenter.present(&[item("Apple", None)], "ap");
    let rendered = plan.items().next().unwrap();

    let markup: Vec<String> = rendered.content.labels().map(|l| l.to_markup()).collect();
    assert_eq!(markup, vec!["<strong>ap</strong>ple", "second <strong>ap</strong>"]);
    assert_eq!(rendered.label_text(), "applesecond ap");
}

proptest! {
    #[test]
    fn proptest_grouping_preserves_membership_and_order(
        categories in prop::collection::vec(prop::option::of(0u8..4), 0..40)
    ) {
        let results: Vec<ResultItem> = categories
            .iter()
            .enumerate()
            .map(|(i, c)| {
                let label = format!("r{i}");
                match c {
                    Some(c) => item(&label, Some(&format!("c{c}"))),
                    None => item(&label, None),
                }
            })
            .collect();

        let plan = presenter(false).present(&results, "");
        prop_assert_eq!(plan.item_count(), results.len());

        // Buckets appear in order of first occurrence, each exactly once
        let mut seen: Vec<String> = Vec::new();
        for c in categories.iter().flatten() {
            let name = format!("c{c}");
            if !seen.contains(&name) {
                seen.push(name);
            }
        }
        let names: Vec<String> = plan.categories().map(|b| b.name.clone()).collect();
        prop_assert_eq!(names, seen);

        // Items inside a bucket keep source order
        for bucket in plan.categories() {
            let indices: Vec<usize> = bucket.items.iter().map(|i| i.index).collect();
            let mut sorted = indices.clone();
            sorted.sort_unstable();
            prop_assert_eq!(indices, sorted);
        }
    }
}

// ============================================================================
// Sources
// ============================================================================

#[test]
fn test_filter_local_substring_case_sensitive() {
    let candidates: Vec<ResultItem> =
        ["Apple", "Banana", "Grape"].into_iter().map(ResultItem::from).collect();
    let fields = FieldNames::default();

    let labels = |query: &str| -> Vec<String> {
        filter_local(&candidates, query, &fields)
            .iter()
            .map(|r| r.label(&fields))
            .collect()
    };
    assert_eq!(labels("an"), vec!["Banana"]);
    assert!(labels("AN").is_empty());
    assert_eq!(labels("pe"), vec!["Grape"]);
    assert_eq!(labels("a").len(), 2);
}

#[test]
fn test_filter_local_matches_structured_labels() {
    let candidates = vec![
        item("Paris", Some("city")),
        ResultItem::new(json!({"name": "no label field"})),
    ];
    let fields = FieldNames::default();
    let matched = filter_local(&candidates, "Par", &fields);
    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].category(&fields).as_deref(), Some("city"));
}

#[test]
fn test_parse_results_accepts_arrays_only() {
    let parsed = parse_results(json!(["a", {"label": "b"}, 3])).unwrap();
    assert_eq!(parsed.len(), 3);
    assert!(parse_results(json!([])).unwrap().is_empty());

    assert_eq!(
        parse_results(json!({"items": []})),
        Err(ResolutionError::Malformed(
            "expected a JSON array, got an object".to_string()
        ))
    );
    assert!(parse_results(json!(null)).is_err());
}

#[test]
fn test_local_source_resolves_immediately() {
    let source = ResultSource::from(crate::SourceConfig::Local(vec![ResultItem::from("kiwi")]));
    assert!(!source.is_remote());
    match source.resolve("iw", &FieldNames::default(), &NullTransport) {
        Resolution::Ready(results) => assert_eq!(results.len(), 1),
        Resolution::Pending(_) => panic!("local source must resolve immediately"),
    }
}

#[tokio::test]
async fn test_remote_source_propagates_transport_error() {
    let source = ResultSource::from(crate::SourceConfig::Remote("/q?t={query}".to_string()));
    assert!(source.is_remote());
    let Resolution::Pending(fetch) = source.resolve("x", &FieldNames::default(), &NullTransport)
    else {
        panic!("remote source must resolve asynchronously");
    };
    assert!(matches!(fetch.await, Err(ResolutionError::Transport(_))));
}
