//! The template compiler: walks a node tree and binds every directive and marker.

use vireo_reactive::{Runtime, SubscriberId};

use crate::binder::{self, BindContext};
use crate::directive::Directive;
use crate::dom::Node;
use crate::error::{Error, Result};
use crate::options::UnknownDirectivePolicy;
use crate::template::Template;
use crate::tracer::{CompileOutcome, SpanId, Tracer};

/// What one compile pass created.
///
/// Subscribers stay registered until [`Bindings::release`] hands them back to the
/// runtime.
#[derive(Debug, Default)]
pub struct Bindings {
    subscribers: Vec<SubscriberId>,
    listeners: usize,
}

impl Bindings {
    /// Subscribers in creation order.
    pub fn subscribers(&self) -> &[SubscriberId] {
        &self.subscribers
    }

    /// Number of subscribers.
    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    /// Returns true if the pass created no subscribers.
    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    /// Number of event listeners the pass attached.
    pub fn listener_count(&self) -> usize {
        self.listeners
    }

    /// Release every subscriber from its dependency sets. Returns how many were released.
    pub fn release(&mut self, runtime: &Runtime, tracer: &dyn Tracer) -> usize {
        let mut released = 0;
        for id in self.subscribers.drain(..) {
            if runtime.release(id) {
                tracer.on_subscriber_released(id);
                released += 1;
            }
        }
        released
    }

    pub(crate) fn push(&mut self, id: SubscriberId) {
        self.subscribers.push(id);
    }

    pub(crate) fn add_listener(&mut self) {
        self.listeners += 1;
    }
}

/// One compile pass over a view root.
pub(crate) struct Compiler<'cx> {
    cx: &'cx BindContext,
    span_id: SpanId,
    bindings: Bindings,
}

impl<'cx> Compiler<'cx> {
    pub(crate) fn new(cx: &'cx BindContext) -> Self {
        Self {
            cx,
            span_id: cx.tracer.new_span_id(),
            bindings: Bindings::default(),
        }
    }

    /// Compile the children of `root`.
    ///
    /// The children are moved into a fragment, compiled there, and moved back in one
    /// append. They are moved back even when compilation fails, in which case the
    /// subscribers created so far are released before the error is returned.
    pub(crate) fn compile_root(mut self, root: &Node) -> Result<Bindings> {
        let cx = self.cx;
        let tracer = &cx.tracer;
        tracer.on_compile_start(self.span_id, &format!("{root:?}"));

        let fragment = root.take_children();
        let result = self.compile(&fragment);
        root.append_child(&fragment);

        match result {
            Ok(()) => {
                tracer.on_compile_end(
                    self.span_id,
                    CompileOutcome::Completed {
                        subscribers: self.bindings.len(),
                    },
                );
                Ok(self.bindings)
            }
            Err(err) => {
                self.bindings.release(&self.cx.runtime, &**tracer);
                tracer.on_compile_end(
                    self.span_id,
                    CompileOutcome::Failed {
                        message: err.to_string(),
                    },
                );
                Err(err)
            }
        }
    }

    /// Compile every child of `node`, depth first, in document order.
    fn compile(&mut self, node: &Node) -> Result<()> {
        for child in node.children() {
            if child.is_element() {
                self.compile_element(&child)?;
            } else if child.is_text() {
                self.compile_text(&child);
            }
            if child.has_children() {
                self.compile(&child)?;
            }
        }
        Ok(())
    }

    fn compile_element(&mut self, node: &Node) -> Result<()> {
        for attribute in node.attributes() {
            let directive = match Directive::parse(&attribute.name, &self.cx.options) {
                None => continue,
                Some(Ok(directive)) => directive,
                Some(Err(Error::UnknownDirective { name }))
                    if self.cx.options.unknown_directive == UnknownDirectivePolicy::Skip =>
                {
                    self.cx.tracer.on_directive_skipped(self.span_id, &name);
                    continue;
                }
                Some(Err(err)) => return Err(err),
            };
            let (cx, span_id, bindings) = (self.cx, self.span_id, &mut self.bindings);
            match directive {
                Directive::Model => {
                    binder::bind_model(cx, span_id, node, &attribute.value, bindings)
                }
                Directive::Text => binder::bind_text(cx, span_id, node, &attribute.value, bindings),
                Directive::On { event } => {
                    binder::bind_event(cx, span_id, node, &event, &attribute.value, bindings)?
                }
            }
        }
        Ok(())
    }

    fn compile_text(&mut self, node: &Node) {
        let template = Template::parse(&node.text_content(), &self.cx.options.delimiters);
        if template.has_markers() {
            binder::bind_interpolation(self.cx, self.span_id, node, template, &mut self.bindings);
        }
    }
}
