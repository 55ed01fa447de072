//! Property-based tests for the streaming builder and the formatter.
//!
//! These tests use proptest to generate random inputs and verify that
//! the core invariants hold under all conditions:
//!
//! 1. **Chunking invariance**: the incremental builder reconstructs the
//!    same document regardless of where fragment boundaries fall.
//! 2. **Monotonicity**: streamed snapshots only ever grow.
//! 3. **Totality**: the formatter never panics and always yields the
//!    declared cell count, whatever JSON value it is handed.
//!
//! # Running Property Tests
//!
//! ```bash
//! cargo test -p mocksmith --test property_tests
//!
//! # With more cases (slower but more thorough)
//! PROPTEST_CASES=10000 cargo test -p mocksmith --test property_tests
//! ```

use proptest::prelude::*;
use serde_json::{json, Map, Value};

use mocksmith::{
    format_cells, ColumnDefinition, FormatConfig, JsonStreamBuilder, StreamReducer, ValueType,
};

// =============================================================================
// Test Strategies
// =============================================================================

/// Arbitrary JSON values: nested containers over printable-ASCII strings
/// (quotes and backslashes included, to exercise escaping).
fn arb_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| json!(n)),
        (-1.0e9f64..1.0e9f64).prop_map(|f| json!(f)),
        "[ -~]{0,12}".prop_map(Value::String),
    ];
    leaf.prop_recursive(4, 32, 5, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..5).prop_map(Value::Array),
            prop::collection::vec(("[a-zA-Z0-9_]{1,8}", inner), 0..5).prop_map(object_of),
        ]
    })
}

/// Flat JSON objects, the shape of one streamed item.
fn arb_item() -> impl Strategy<Value = Value> {
    prop::collection::vec(("[a-z]{1,5}", "[ -~]{0,8}".prop_map(Value::String)), 0..4)
        .prop_map(object_of)
}

fn object_of(entries: Vec<(String, Value)>) -> Value {
    let mut map = Map::new();
    for (k, v) in entries {
        map.insert(k, v);
    }
    Value::Object(map)
}

/// Split `text` into fragments of `chunk_len` characters and feed them all.
fn feed_chunked(builder: &mut JsonStreamBuilder, text: &str, chunk_len: usize) {
    let chars: Vec<char> = text.chars().collect();
    for chunk in chars.chunks(chunk_len) {
        let fragment: String = chunk.iter().collect();
        builder.feed(&fragment).expect("well-formed input");
    }
}

// =============================================================================
// Chunking Invariance
// =============================================================================

proptest! {
    /// Feeding a serialized document in arbitrary-size fragments yields
    /// exactly what a one-shot parse of the same text yields.
    #[test]
    fn prop_chunked_parse_matches_one_shot(value in arb_json(), chunk_len in 1usize..9) {
        // Wrapped in an object so the document always ends on a structural
        // delimiter (a bare number at the root never self-terminates).
        let doc = json!({ "v": value });
        let text = serde_json::to_string(&doc).expect("serializable");

        let mut builder = JsonStreamBuilder::new();
        feed_chunked(&mut builder, &text, chunk_len);

        prop_assert!(builder.is_complete());
        let expected: Value = serde_json::from_str(&text).expect("valid JSON");
        prop_assert_eq!(builder.root(), Some(&expected));
    }

    /// Snapshots taken mid-stream never lose already-resolved structure:
    /// the final snapshot equals the completed document.
    #[test]
    fn prop_final_snapshot_equals_document(value in arb_json(), chunk_len in 1usize..9) {
        let doc = json!({ "v": value });
        let text = serde_json::to_string(&doc).expect("serializable");

        let mut builder = JsonStreamBuilder::new();
        feed_chunked(&mut builder, &text, chunk_len);

        prop_assert_eq!(builder.snapshot(), serde_json::from_str::<Value>(&text).expect("valid JSON"));
    }
}

// =============================================================================
// Reducer Monotonicity
// =============================================================================

proptest! {
    /// For any well-formed `{summary, data}` document and any fragment
    /// boundaries: item counts never shrink, summaries grow by prefix,
    /// and the last snapshot matches the document.
    #[test]
    fn prop_reducer_snapshots_grow_monotonically(
        summary in "[a-zA-Z0-9 ]{0,16}",
        items in prop::collection::vec(arb_item(), 0..6),
        chunk_len in 1usize..8,
    ) {
        let doc = json!({ "summary": summary, "data": items });
        let text = serde_json::to_string(&doc).expect("serializable");

        let mut reducer = StreamReducer::new("data");
        let mut snapshots = Vec::new();
        let chars: Vec<char> = text.chars().collect();
        for chunk in chars.chunks(chunk_len) {
            let fragment: String = chunk.iter().collect();
            reducer.apply(&fragment, &mut |s| snapshots.push(s)).expect("well-formed input");
        }

        prop_assert!(reducer.is_complete());
        for pair in snapshots.windows(2) {
            prop_assert!(pair[0].items.len() <= pair[1].items.len());
            prop_assert!(pair[1].summary.starts_with(pair[0].summary.as_str()));
        }
        let last = snapshots.last().expect("summary completion always emits");
        prop_assert_eq!(last.summary.as_str(), summary.as_str());
        prop_assert_eq!(&last.items, &items);
    }
}

// =============================================================================
// Formatter Totality
// =============================================================================

proptest! {
    /// `format_cells` accepts any JSON value for any column type without
    /// panicking, and the cell count depends only on the column definition.
    #[test]
    fn prop_format_cells_is_total(
        value in arb_json(),
        type_index in 0usize..11,
        split in any::<bool>(),
        csv in any::<bool>(),
    ) {
        let value_type = ValueType::all()[type_index];
        let mut definition = ColumnDefinition::new("c", value_type);
        if split {
            definition = definition.with_split();
        }

        let cells = format_cells(&definition, Some(&value), &FormatConfig::default(), csv);

        let expected = if split && value_type.fields().is_some() {
            value_type.cell_count()
        } else {
            1
        };
        prop_assert_eq!(cells.len(), expected);
    }

    /// Same input always renders the same cells.
    #[test]
    fn prop_format_cells_is_deterministic(value in arb_json(), type_index in 0usize..11) {
        let value_type = ValueType::all()[type_index];
        let definition = ColumnDefinition::new("c", value_type);
        let config = FormatConfig::default();

        let first = format_cells(&definition, Some(&value), &config, true);
        let second = format_cells(&definition, Some(&value), &config, true);
        prop_assert_eq!(first, second);
    }
}
