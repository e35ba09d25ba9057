//! Property-based tests for the structural editor invariants.
//!
//! Generates flat forms with a handful of typed cards, optional `ui:order`
//! permutations, `required` subsets and definition-based dependency groups,
//! then checks that editor operations keep `properties`, `required`,
//! `ui:order` and `dependencies` consistent.

use form_builder_core::dependency::{decode_possibilities, encode_possibilities};
use form_builder_core::{
    apply_intent, decode_pair, editor, encode_pair, CategoryRegistry, CodecFormat, ElementPath, Intent,
    Mods, Possibility, SchemaPair, TreeWalker,
};
use proptest::prelude::*;
use serde_json::{json, Map, Value};

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

/// Generate a property name; `newInputN` names are over-represented so the
/// fresh-name logic has collisions to avoid.
fn arb_prop_name() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => "[a-z][a-z0-9_]{0,8}",
        2 => (1usize..6).prop_map(|n| format!("newInput{n}")),
    ]
}

fn arb_leaf_schema() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(json!({ "type": "string" })),
        Just(json!({ "type": "integer", "minimum": 0 })),
        Just(json!({ "type": "number" })),
        Just(json!({ "type": "boolean" })),
        Just(json!({ "type": "string", "enum": ["x", "y"] })),
        Just(json!({ "type": "array", "items": { "type": "string" } })),
    ]
}

/// A flat form: unique names with schemas, plus flags for `required`,
/// an optional shuffled `ui:order` and dependency edges by index.
fn arb_form() -> impl Strategy<Value = SchemaPair> {
    proptest::collection::vec((arb_prop_name(), arb_leaf_schema(), any::<bool>()), 1..=7)
        .prop_flat_map(|fields| {
            let mut seen = Vec::new();
            let fields: Vec<(String, Value, bool)> = fields
                .into_iter()
                .filter(|(name, _, _)| {
                    if seen.contains(name) {
                        false
                    } else {
                        seen.push(name.clone());
                        true
                    }
                })
                .collect();
            let n = fields.len();
            (
                Just(fields),
                Just((0..n).collect::<Vec<usize>>()).prop_shuffle(),
                any::<bool>(),
                proptest::collection::vec((0..n, 0..n), 0..=3),
            )
        })
        .prop_map(|(fields, order, with_order, edges)| {
            let names: Vec<String> = fields.iter().map(|(name, _, _)| name.clone()).collect();
            let mut properties = Map::new();
            let mut required = Vec::new();
            for (name, schema, is_required) in &fields {
                properties.insert(name.clone(), schema.clone());
                if *is_required {
                    required.push(json!(name));
                }
            }
            let mut dependencies = Map::new();
            for (parent, child) in edges {
                if parent == child {
                    continue;
                }
                let group = encode_possibilities(
                    &names[parent],
                    &[Possibility::any_value(vec![names[child].clone()])],
                );
                dependencies.insert(names[parent].clone(), group);
            }
            let schema = json!({
                "type": "object",
                "properties": properties,
                "required": required,
                "dependencies": dependencies,
            });
            let uischema = if with_order {
                let ordered: Vec<&String> = order.iter().map(|&i| &names[i]).collect();
                json!({ "ui:order": ordered })
            } else {
                json!({})
            };
            SchemaPair::new(schema, uischema)
        })
}

fn names_of(pair: &SchemaPair) -> Vec<String> {
    pair.schema["properties"]
        .as_object()
        .map(|p| p.keys().cloned().collect())
        .unwrap_or_default()
}

fn walk_keys(pair: &SchemaPair) -> Vec<String> {
    let registry = CategoryRegistry::builtin();
    TreeWalker::new(&registry)
        .walk_pair(pair)
        .elements
        .into_iter()
        .map(|e| e.key)
        .collect()
}

fn arb_intent(names: Vec<String>) -> impl Strategy<Value = Intent> {
    let name = proptest::sample::select(names);
    prop_oneof![
        Just(Intent::AddCard { parent: ElementPath::root() }),
        Just(Intent::AddSection { parent: ElementPath::root() }),
        name.clone().prop_map(|n| Intent::Delete { path: n.as_str().into() }),
        name.clone().prop_map(|n| Intent::MoveUp { path: n.as_str().into() }),
        name.clone().prop_map(|n| Intent::MoveDown { path: n.as_str().into() }),
        (name.clone(), any::<bool>()).prop_map(|(n, required)| Intent::SetRequired {
            path: n.as_str().into(),
            required
        }),
        (name, "[a-z]{1,6}").prop_map(|(n, new_name)| Intent::Rename {
            path: n.as_str().into(),
            name: new_name
        }),
    ]
}

fn arb_form_and_intents() -> impl Strategy<Value = (SchemaPair, Vec<Intent>)> {
    arb_form().prop_flat_map(|pair| {
        let names = names_of(&pair);
        (Just(pair), proptest::collection::vec(arb_intent(names), 1..=6))
    })
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, ..Default::default() })]

    /// Property: addCard always picks a fresh name and appends it to ui:order.
    #[test]
    fn add_card_name_is_fresh(pair in arb_form()) {
        let before = names_of(&pair);
        let before_order = walk_keys(&pair);
        let next = editor::add_card(&pair, &ElementPath::root());
        let after = names_of(&next);

        prop_assert_eq!(after.len(), before.len() + 1);
        let added: Vec<&String> = after.iter().filter(|n| !before.contains(n)).collect();
        prop_assert_eq!(added.len(), 1);
        prop_assert!(added[0].starts_with("newInput"));

        let after_order = walk_keys(&next);
        prop_assert_eq!(&after_order[..before_order.len()], &before_order[..]);
        prop_assert_eq!(after_order.last(), Some(added[0]));
    }

    /// Property: walk follows ui:order exactly when it lists every property.
    #[test]
    fn walk_follows_ui_order(pair in arb_form()) {
        let keys = walk_keys(&pair);
        match pair.uischema.get("ui:order") {
            Some(order) => {
                let order: Vec<String> = serde_json::from_value(order.clone()).unwrap();
                prop_assert_eq!(keys, order);
            }
            None => prop_assert_eq!(keys, names_of(&pair)),
        }
    }

    /// Property: after delete, the name is gone from every list.
    #[test]
    fn delete_is_complete((pair, index) in arb_form().prop_flat_map(|p| {
        let n = names_of(&p).len();
        (Just(p), 0..n)
    })) {
        let name = names_of(&pair)[index].clone();
        let next = editor::delete_element(&pair, &ElementPath::new([name.as_str()]));

        prop_assert!(!names_of(&next).contains(&name));
        let required: Vec<String> = serde_json::from_value(next.schema["required"].clone()).unwrap();
        prop_assert!(!required.contains(&name));
        if let Some(order) = next.uischema.get("ui:order") {
            let order: Vec<String> = serde_json::from_value(order.clone()).unwrap();
            prop_assert!(!order.contains(&name));
        }
        let deps = next.schema["dependencies"].as_object().unwrap();
        prop_assert!(!deps.contains_key(&name));
        for (parent, group) in deps {
            for possibility in decode_possibilities(parent, group) {
                prop_assert!(!possibility.children.contains(&name));
            }
        }
    }

    /// Property: moveUp on the first and moveDown on the last child are no-ops.
    #[test]
    fn move_boundaries_are_noops(pair in arb_form()) {
        let keys = walk_keys(&pair);
        let first = ElementPath::new([keys[0].as_str()]);
        let last = ElementPath::new([keys[keys.len() - 1].as_str()]);
        prop_assert_eq!(&editor::move_up(&pair, &first), &pair);
        prop_assert_eq!(&editor::move_down(&pair, &last), &pair);
    }

    /// Property: any sequence of intents yields a pair that survives encode/decode.
    #[test]
    fn reencoding_is_idempotent((pair, intents) in arb_form_and_intents()) {
        let registry = CategoryRegistry::builtin();
        let mods = Mods::default();
        let mut current = pair;
        for intent in &intents {
            // Rename collisions are expected failures; the pair stays as it was.
            if let Ok(next) = apply_intent(&registry, &mods, &current, intent) {
                current = next;
            }
        }
        for format in [CodecFormat::Json, CodecFormat::Yaml] {
            let (schema, ui) = encode_pair(&current, format).unwrap();
            prop_assert_eq!(&decode_pair(&schema, &ui, format).unwrap(), &current);
        }
    }

    /// Property: definition-based groups decode back to what was encoded.
    #[test]
    fn dependency_round_trip(
        first in proptest::collection::btree_set("[a-z]{1,4}", 1..=2),
        second in proptest::collection::btree_set("[a-z]{1,4}", 1..=2),
    ) {
        let possibilities = vec![
            Possibility::any_value(first.into_iter().filter(|c| c != "p").collect()),
            Possibility::any_value(second.into_iter().filter(|c| c != "p").collect()),
        ];
        let encoded = encode_possibilities("p", &possibilities);
        prop_assert_eq!(decode_possibilities("p", &encoded), possibilities);
    }
}
