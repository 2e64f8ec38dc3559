//! Lazy rendering and expansion tests

use pretty_assertions::assert_eq;
use serde_json::json;
use seth::*;

fn load(doc: serde_json::Value) -> Session {
    Session::from_json(&doc, ViewerConfig::default()).unwrap()
}

fn path(s: &str) -> SlotPath {
    s.parse().unwrap()
}

// ═══════════════════════════════════════════════════════════════════════
// Documented Scenarios
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_reference_root_renders_single_leaf() {
    let session = load(json!({
        "dict": {"r1": {"type": "int", "value": 7}},
        "type": "*",
        "value": "r1"
    }));

    assert_eq!(session.root().leaf(), Some(&Scalar::Int(7)));
    assert!(session.root().children().is_empty());
    assert_eq!(
        to_tree_string(session.root(), &ViewConfig::default().with_show_references(false)),
        "int = 7\n"
    );
}

#[test]
fn test_struct_renders_stubs_and_expands_one_at_a_time() {
    let mut session = load(json!({
        "dict": {},
        "type": "struct",
        "value": {
            "a": {"type": "int", "value": 1},
            "b": {"type": "int", "value": 2}
        }
    }));

    let names: Vec<&str> = session.root().children().iter().map(Stub::name).collect();
    assert_eq!(names, vec!["a", "b"]);
    assert!(session
        .root()
        .children()
        .iter()
        .all(|stub| stub.state() == SlotState::Unexpanded));

    session.expand(&path("a")).unwrap();

    assert_eq!(session.slot(&path("a")).unwrap().leaf(), Some(&Scalar::Int(1)));
    assert_eq!(session.stub(&path("b")).unwrap().state(), SlotState::Unexpanded);
}

#[test]
fn test_missing_reference_marks_only_its_slot() {
    let mut session = load(json!({
        "dict": {"ok": {"type": "int", "value": 5}},
        "type": "struct",
        "value": {
            "gone": {"type": "*int", "value": "missing"},
            "here": {"type": "*int", "value": "ok"}
        }
    }));

    session.expand(&path("gone")).unwrap();
    session.expand(&path("here")).unwrap();

    assert_eq!(
        session.slot(&path("gone")).unwrap().error_marker(),
        Some(&RenderError::DanglingReference {
            id: RefId::from("missing")
        })
    );
    assert_eq!(session.slot(&path("here")).unwrap().leaf(), Some(&Scalar::Int(5)));
}

// ═══════════════════════════════════════════════════════════════════════
// Properties
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_scalar_kinds_render_literal_leaf() {
    let cases = vec![
        (json!({"dict": {}, "type": "int8", "value": -3}), "-3"),
        (json!({"dict": {}, "type": "uint16", "value": 9}), "9"),
        (json!({"dict": {}, "type": "float64", "value": 1.5}), "1.5"),
        (json!({"dict": {}, "type": "bool", "value": false}), "false"),
        (json!({"dict": {}, "type": "string", "value": "hi"}), "hi"),
    ];
    let config = RenderConfig::default();

    for (raw, literal) in cases {
        let doc = decode(&raw, &DecodeConfig::default()).unwrap();
        let slot = Renderer::new(&doc.table, &config).render(&doc.root);
        assert_eq!(slot.state(), SlotState::Expanded);
        assert_eq!(slot.leaf().map(ToString::to_string), Some(literal.to_string()));
    }
}

#[test]
fn test_reference_is_transparent() {
    let doc = decode(
        &json!({
            "dict": {
                "p": {"type": "main.point", "value": {
                    "x": {"type": "int", "value": 1},
                    "y": {"type": "int", "value": 2}
                }}
            },
            "type": "*main.point",
            "value": "p"
        }),
        &DecodeConfig::default(),
    )
    .unwrap();
    let config = RenderConfig::default();
    let renderer = Renderer::new(&doc.table, &config);

    let through_ref = renderer.render(&doc.root);
    let direct = renderer.render(doc.table.get("p").unwrap());

    assert!(through_ref.same_content(&direct));
    assert_eq!(through_ref.via, vec![RefId::from("p")]);
    assert!(direct.via.is_empty());
}

#[test]
fn test_child_order_follows_document_not_alphabet() {
    let session = load(json!({
        "dict": {},
        "type": "main.T",
        "value": {
            "zeta": {"type": "int", "value": 1},
            "alpha": {"type": "int", "value": 2},
            "mid": {"type": "int", "value": 3}
        }
    }));

    let names: Vec<&str> = session.root().children().iter().map(Stub::name).collect();
    assert_eq!(names, vec!["zeta", "alpha", "mid"]);
}

#[test]
fn test_child_order_is_independent_of_expansion_order() {
    let mut session = load(json!({
        "dict": {},
        "type": "main.T",
        "value": {
            "a": {"type": "int", "value": 1},
            "b": {"type": "int", "value": 2},
            "c": {"type": "int", "value": 3}
        }
    }));

    session.expand(&path("c")).unwrap();
    session.expand(&path("a")).unwrap();

    let names: Vec<&str> = session.root().children().iter().map(Stub::name).collect();
    assert_eq!(names, vec!["a", "b", "c"]);
}

#[test]
fn test_expand_is_idempotent() {
    let mut session = load(json!({
        "dict": {"n": {"type": "main.N", "value": {"v": {"type": "int", "value": 4}}}},
        "type": "main.T",
        "value": {"child": {"type": "*main.N", "value": "n"}}
    }));

    assert_eq!(session.expand(&path("child")).unwrap(), ExpandOutcome::Expanded);
    session.expand(&path("child/v")).unwrap();
    let once = session.root().clone();

    assert_eq!(
        session.expand(&path("child")).unwrap(),
        ExpandOutcome::AlreadyExpanded
    );
    assert_eq!(session.root(), &once);
    // the grandchild expanded earlier is still there
    assert!(session.stub(&path("child/v")).unwrap().is_expanded());
}

#[test]
fn test_nothing_below_first_level_is_materialised() {
    let session = load(json!({
        "dict": {},
        "type": "main.Outer",
        "value": {
            "inner": {"type": "main.Inner", "value": {
                "deep": {"type": "int", "value": 1}
            }}
        }
    }));

    let inner = session.root().child("inner").unwrap();
    assert!(!inner.is_expanded());
    assert!(inner.slot().is_none());
    assert_eq!(session.expanded_count(), 0);
}

// ═══════════════════════════════════════════════════════════════════════
// Cycles
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_composite_cycle_expands_one_level_per_request() {
    let mut session = load(json!({
        "dict": {
            "n1": {"type": "main.node", "value": {
                "value": {"type": "int", "value": 1},
                "next": {"type": "*main.node", "value": "n2"}
            }},
            "n2": {"type": "main.node", "value": {
                "value": {"type": "int", "value": 2},
                "next": {"type": "*main.node", "value": "n1"}
            }}
        },
        "type": "*main.node",
        "value": "n1"
    }));

    session.expand(&path("next")).unwrap();
    session.expand(&path("next/next")).unwrap();
    session.expand(&path("next/next/next")).unwrap();
    session.expand(&path("next/next/next/value")).unwrap();

    assert_eq!(
        session
            .slot(&path("next/next/next/value"))
            .unwrap()
            .leaf(),
        Some(&Scalar::Int(2))
    );
    assert!(!session.stub(&path("next/next/next/next")).unwrap().is_expanded());
}

#[test]
fn test_reference_only_cycle_becomes_marker() {
    let mut session = load(json!({
        "dict": {
            "a": {"type": "*T", "value": "b"},
            "b": {"type": "*T", "value": "a"}
        },
        "type": "holder",
        "value": {
            "loop": {"type": "*T", "value": "a"},
            "fine": {"type": "int", "value": 3}
        }
    }));

    session.expand(&path("loop")).unwrap();
    session.expand(&path("fine")).unwrap();

    assert_eq!(
        session.slot(&path("loop")).unwrap().error_marker(),
        Some(&RenderError::CyclicReference {
            chain: vec![RefId::from("a"), RefId::from("b"), RefId::from("a")]
        })
    );
    assert_eq!(session.slot(&path("fine")).unwrap().leaf(), Some(&Scalar::Int(3)));
}

#[test]
fn test_depth_expansion_is_bounded_by_config() {
    let doc = json!({
        "dict": {"self": {"type": "main.node", "value": {"next": "self"}}},
        "root": "self"
    });
    let config = ViewerConfig::default().with_render(RenderConfig::default().with_max_depth(3));
    let mut session = Session::from_json(&doc, config).unwrap();

    assert_eq!(session.expand_to_depth(&SlotPath::root(), 100).unwrap(), 3);
    assert_eq!(session.expanded_count(), 3);
}
