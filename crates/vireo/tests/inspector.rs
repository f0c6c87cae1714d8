//! Integration tests for tracing through vireo-inspector.

use std::sync::Arc;

use serde_json::json;
use vireo::dom::{self, Event, Node};
use vireo::{CompilerOptions, DataObject, UnknownDirectivePolicy, ViewModel};
use vireo_inspector::{
    to_kinds, BindingKind, CompileResult, EventCollector, EventKind, EventSinkTracer, FlowEvent,
};

fn root(markup: &str) -> Node {
    let root = Node::element("div");
    root.append_child(&dom::parse(markup).unwrap());
    root
}

fn traced(markup: &str, json: serde_json::Value) -> (ViewModel, Arc<EventCollector>) {
    let collector = Arc::new(EventCollector::new());
    let vm = ViewModel::builder()
        .data(DataObject::from_json(json).unwrap())
        .mount(root(markup))
        .method("noop", |_, _| Ok(()))
        .tracer(EventSinkTracer::new(collector.clone()))
        .build()
        .unwrap();
    (vm, collector)
}

fn expr(s: &str) -> String {
    s.to_string()
}

#[test]
fn test_compile_events() {
    use EventKind::*;

    let (_vm, collector) = traced(
        r#"<input v-model="name"><p>{{ name }}!</p><button @click="noop">x</button>"#,
        json!({"name": "a"}),
    );

    assert_eq!(
        to_kinds(&collector.trace()),
        vec![
            CompileStart { root: expr("<div>") },
            SubscriberCreated {
                expression: expr("name")
            },
            DirectiveBound {
                kind: BindingKind::Model,
                expression: expr("name")
            },
            SubscriberCreated {
                expression: expr(" name ")
            },
            DirectiveBound {
                kind: BindingKind::Interpolation,
                expression: expr(" name ")
            },
            DirectiveBound {
                kind: BindingKind::Event {
                    event: expr("click")
                },
                expression: expr("noop")
            },
            CompileEnd {
                result: CompileResult::Completed { subscribers: 2 }
            },
        ]
    );
}

#[test]
fn test_update_events_are_change_gated() {
    use EventKind::*;

    let (vm, collector) = traced("<p>{{a}} and {{b}}</p>", json!({"a": 1, "b": 2}));
    collector.clear();

    vm.set("a", 9).unwrap();
    assert_eq!(
        to_kinds(&collector.trace()),
        vec![
            SubscriberEvaluated {
                expression: expr("a")
            },
            ViewUpdated {
                expression: expr("a"),
                display: expr("9")
            },
        ]
    );

    collector.clear();
    vm.set("a", 9).unwrap();
    assert!(collector.is_empty());
}

#[test]
fn test_input_does_not_echo_into_its_own_node() {
    use EventKind::*;

    let (vm, collector) = traced(
        r#"<input v-model="name"><p>{{name}}</p>"#,
        json!({"name": "a"}),
    );
    collector.clear();

    let input = vm.root().query_selector("input").unwrap();
    input.simulate_input("b").unwrap();
    assert_eq!(input.value(), "b");
    assert_eq!(
        to_kinds(&collector.trace()),
        vec![
            SubscriberEvaluated {
                expression: expr("name")
            },
            SubscriberEvaluated {
                expression: expr("name")
            },
            ViewUpdated {
                expression: expr("name"),
                display: expr("b")
            },
        ]
    );

    // A data-side write still reaches the input.
    collector.clear();
    vm.set("name", "c").unwrap();
    assert_eq!(input.value(), "c");
    assert_eq!(collector.trace().view_updates().count(), 2);
}

#[test]
fn test_event_dispatch_is_traced() {
    let (vm, collector) = traced(r#"<button @click="noop">x</button>"#, json!({}));
    collector.clear();

    vm.root()
        .query_selector("button")
        .unwrap()
        .dispatch_event(Event::new("click"))
        .unwrap();
    assert_eq!(
        to_kinds(&collector.trace()),
        vec![EventKind::EventDispatched {
            event: expr("click"),
            method: expr("noop")
        }]
    );
}

#[test]
fn test_release_is_traced() {
    let (vm, collector) = traced("<p>{{a}}{{b}}</p>", json!({"a": 1, "b": 2}));
    let created: Vec<usize> = collector
        .events()
        .iter()
        .filter_map(|e| match e {
            FlowEvent::SubscriberCreated { subscriber, .. } => Some(*subscriber),
            _ => None,
        })
        .collect();
    collector.clear();

    drop(vm);
    let released: Vec<usize> = collector
        .events()
        .iter()
        .filter_map(|e| match e {
            FlowEvent::SubscriberReleased { subscriber } => Some(*subscriber),
            _ => None,
        })
        .collect();
    assert_eq!(released, created);
}

#[test]
fn test_skipped_directive_is_traced() {
    let collector = Arc::new(EventCollector::new());
    ViewModel::builder()
        .data(DataObject::new())
        .mount(root(r#"<p v-if="x">y</p>"#))
        .options(CompilerOptions::default().with_unknown_directive(UnknownDirectivePolicy::Skip))
        .tracer(EventSinkTracer::new(collector.clone()))
        .build()
        .unwrap();

    assert!(collector.trace().has_event(|e| matches!(
        e,
        FlowEvent::DirectiveSkipped { attribute, .. } if attribute == "v-if"
    )));
}

#[test]
fn test_failed_compile_is_traced() {
    let collector = Arc::new(EventCollector::new());
    let result = ViewModel::builder()
        .data(DataObject::new().with("a", 1))
        .mount(root(r#"<p>{{ a }}</p><p v-if="x">y</p>"#))
        .tracer(EventSinkTracer::new(collector.clone()))
        .build();
    assert!(result.is_err());

    let trace = collector.trace();
    let (_, result, _) = trace.compile_ends().next().unwrap();
    assert!(matches!(
        result,
        CompileResult::Failed { message } if message.contains("v-if")
    ));
    // The subscriber created before the failure is released again.
    assert!(trace.has_event(|e| matches!(e, FlowEvent::SubscriberReleased { .. })));
}

#[test]
fn test_trace_serializes() {
    let (vm, collector) = traced("<p>{{ a }}</p>", json!({"a": 1}));
    vm.set("a", 2).unwrap();

    let trace = collector.trace();
    let text = serde_json::to_string(&trace).unwrap();
    let back: vireo_inspector::ExecutionTrace = serde_json::from_str(&text).unwrap();
    assert_eq!(back, trace);
}
