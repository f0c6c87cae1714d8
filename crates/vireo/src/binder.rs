//! The binder set: one function per directive kind.
//!
//! Every binder seeds the view from the data, creates subscribers that push later changes
//! into the view, and records what it created in the pass's [`Bindings`].

use std::rc::Rc;

use vireo_reactive::{ReadContext, Runtime, SubscriberId};

use crate::accessor;
use crate::compiler::Bindings;
use crate::data::DataObject;
use crate::dom::Node;
use crate::error::{Error, Result};
use crate::options::CompilerOptions;
use crate::template::Template;
use crate::tracer::{BindingKind, SpanId, Tracer};
use crate::value::Value;
use crate::view_model::{MethodTable, WeakViewModel};

/// Everything a binder needs from the view model being built.
pub(crate) struct BindContext {
    pub(crate) data: DataObject,
    pub(crate) runtime: Runtime,
    pub(crate) methods: Rc<MethodTable>,
    pub(crate) vm: WeakViewModel,
    pub(crate) tracer: Rc<dyn Tracer>,
    pub(crate) options: CompilerOptions,
}

impl BindContext {
    /// Create a subscriber on `expression` whose changes are handed to `apply`.
    ///
    /// `apply` returns whether the view actually changed; only then is the update traced.
    fn watch(&self, expression: &str, apply: impl Fn(&Value) -> bool + 'static) -> SubscriberId {
        // The id only exists once the seeding read is done.
        let id_slot = Rc::new(std::cell::Cell::new(None::<SubscriberId>));

        let read = {
            let data = self.data.clone();
            let tracer = self.tracer.clone();
            let expression = expression.to_string();
            let id_slot = id_slot.clone();
            move |cx: &ReadContext| {
                if let Some(id) = id_slot.get() {
                    tracer.on_subscriber_evaluated(id, &expression);
                }
                accessor::read(&expression, &data, cx)
            }
        };
        let callback = {
            let tracer = self.tracer.clone();
            let expression = expression.to_string();
            let id_slot = id_slot.clone();
            move |value: &Value| {
                if !apply(value) {
                    return;
                }
                if let Some(id) = id_slot.get() {
                    tracer.on_view_updated(id, &expression, &value.to_display_string());
                }
            }
        };

        let id = self.runtime.watch(read, Value::same_value, callback);
        id_slot.set(Some(id));
        self.tracer.on_subscriber_created(id, expression);
        id
    }

    fn read_untracked(&self, expression: &str) -> Value {
        accessor::read(expression, &self.data, &ReadContext::untracked())
    }
}

/// `v-model`: display the field in the node's value and write user input back.
pub(crate) fn bind_model(
    cx: &BindContext,
    span_id: SpanId,
    node: &Node,
    expression: &str,
    bindings: &mut Bindings,
) {
    let target = node.clone();
    // Input writes back the node's own value, so that update leaves the node alone.
    let id = cx.watch(expression, move |value| {
        let display = value.to_display_string();
        if target.value() == display {
            return false;
        }
        target.set_value(display);
        true
    });
    bindings.push(id);
    node.set_value(cx.read_untracked(expression).to_display_string());

    let vm = cx.vm.clone();
    let write_to = expression.to_string();
    node.add_event_listener("input", move |event| {
        let (Some(vm), Some(target)) = (vm.upgrade(), event.target()) else {
            return Ok(());
        };
        accessor::write(&write_to, vm.data(), Value::String(target.value()));
        Ok(())
    });
    bindings.add_listener();
    cx.tracer
        .on_directive_bound(span_id, &BindingKind::Model, expression);
}

/// `v-text`: replace the node's text with the field's display form.
pub(crate) fn bind_text(
    cx: &BindContext,
    span_id: SpanId,
    node: &Node,
    expression: &str,
    bindings: &mut Bindings,
) {
    let target = node.clone();
    let id = cx.watch(expression, move |value| {
        target.set_text_content(value.to_display_string());
        true
    });
    bindings.push(id);
    node.set_text_content(cx.read_untracked(expression).to_display_string());
    cx.tracer.on_directive_bound(span_id, &BindingKind::Text, expression);
}

/// `{{ }}` markers in a text node.
///
/// Each marker gets its own subscriber, and any one of them re-renders the whole text.
pub(crate) fn bind_interpolation(
    cx: &BindContext,
    span_id: SpanId,
    node: &Node,
    template: Template,
    bindings: &mut Bindings,
) {
    let template = Rc::new(template);
    for expression in template.expressions() {
        let target = node.clone();
        let template = template.clone();
        let data = cx.data.clone();
        let id = cx.watch(expression, move |_| {
            target.set_text_content(render(&template, &data));
            true
        });
        bindings.push(id);
        cx.tracer
            .on_directive_bound(span_id, &BindingKind::Interpolation, expression);
    }
    node.set_text_content(render(&template, &cx.data));
}

/// `v-on:event` / `@event`: run a method from the method table with the view model as
/// its context.
pub(crate) fn bind_event(
    cx: &BindContext,
    span_id: SpanId,
    node: &Node,
    event: &str,
    method: &str,
    bindings: &mut Bindings,
) -> Result<()> {
    let method = method.trim();
    if !cx.methods.contains_key(method) {
        return Err(Error::UnknownMethod {
            name: method.to_string(),
        });
    }
    let vm = cx.vm.clone();
    let name = method.to_string();
    node.add_event_listener(event, move |event| match vm.upgrade() {
        Some(vm) => vm.call(&name, event).map_err(anyhow::Error::from),
        None => Ok(()),
    });
    bindings.add_listener();
    cx.tracer.on_directive_bound(
        span_id,
        &BindingKind::Event {
            event: event.to_string(),
        },
        method,
    );
    Ok(())
}

fn render(template: &Template, data: &DataObject) -> String {
    template.render(|expression| {
        accessor::read(expression, data, &ReadContext::untracked()).to_display_string()
    })
}
