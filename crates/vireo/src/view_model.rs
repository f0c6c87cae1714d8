//! The facade: data, view root and method table tied together.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use vireo_reactive::Runtime;

use crate::binder::BindContext;
use crate::compiler::{Bindings, Compiler};
use crate::data::DataObject;
use crate::dom::{Event, Node};
use crate::error::{Error, Result};
use crate::options::CompilerOptions;
use crate::tracer::{NoopTracer, Tracer};
use crate::value::Value;

/// A method callable from event bindings. It runs with the view model as its context.
pub type Method = Rc<dyn Fn(&ViewModel, &Event) -> anyhow::Result<()>>;

pub(crate) type MethodTable = ahash::HashMap<String, Method>;

/// Builder for [`ViewModel`].
pub struct ViewModelBuilder {
    data: Option<DataObject>,
    root: Option<Result<Node>>,
    methods: MethodTable,
    options: CompilerOptions,
    tracer: Rc<dyn Tracer>,
}

impl Default for ViewModelBuilder {
    fn default() -> Self {
        Self {
            data: None,
            root: None,
            methods: MethodTable::default(),
            options: CompilerOptions::default(),
            tracer: Rc::new(NoopTracer),
        }
    }
}

impl ViewModelBuilder {
    /// The data object to observe. It is intercepted in place.
    pub fn data(mut self, data: DataObject) -> Self {
        self.data = Some(data);
        self
    }

    /// Mount on a node; its children are the template.
    pub fn mount(mut self, root: Node) -> Self {
        self.root = Some(Ok(root));
        self
    }

    /// Mount on the first descendant of `document` matching `selector`.
    ///
    /// A selector that matches nothing fails [`ViewModelBuilder::build`] with
    /// [`Error::RootNotFound`].
    pub fn mount_selector(mut self, document: &Node, selector: &str) -> Self {
        let root = document
            .query_selector(selector)
            .ok_or_else(|| Error::RootNotFound {
                selector: selector.to_string(),
            });
        self.root = Some(root);
        self
    }

    /// Register a method under `name`, replacing any previous one.
    pub fn method(
        mut self,
        name: impl Into<String>,
        method: impl Fn(&ViewModel, &Event) -> anyhow::Result<()> + 'static,
    ) -> Self {
        self.methods.insert(name.into(), Rc::new(method));
        self
    }

    /// Compiler options.
    pub fn options(mut self, options: CompilerOptions) -> Self {
        self.options = options;
        self
    }

    /// Tracer receiving compile and update events.
    pub fn tracer(mut self, tracer: impl Tracer) -> Self {
        self.tracer = Rc::new(tracer);
        self
    }

    /// Intercept the data, compile the root, and expose the top-level fields.
    pub fn build(self) -> Result<ViewModel> {
        let data = self.data.ok_or(Error::NoData)?;
        let root = self.root.ok_or(Error::NoRoot)??;

        data.intercept();
        let vm = ViewModel {
            inner: Rc::new(ViewModelInner {
                data,
                root,
                runtime: Runtime::new(),
                methods: Rc::new(self.methods),
                options: self.options,
                tracer: self.tracer,
                bindings: RefCell::new(Bindings::default()),
                keys: RefCell::new(Vec::new()),
                destroyed: Cell::new(false),
            }),
        };

        let cx = vm.bind_context();
        let bindings = Compiler::new(&cx).compile_root(&vm.inner.root)?;
        *vm.inner.bindings.borrow_mut() = bindings;
        *vm.inner.keys.borrow_mut() = vm.inner.data.keys();
        Ok(vm)
    }
}

struct ViewModelInner {
    data: DataObject,
    root: Node,
    runtime: Runtime,
    methods: Rc<MethodTable>,
    options: CompilerOptions,
    tracer: Rc<dyn Tracer>,
    bindings: RefCell<Bindings>,
    keys: RefCell<Vec<String>>,
    destroyed: Cell<bool>,
}

impl ViewModelInner {
    fn release(&self) -> usize {
        self.bindings
            .borrow_mut()
            .release(&self.runtime, &*self.tracer)
    }
}

impl Drop for ViewModelInner {
    fn drop(&mut self) {
        self.release();
    }
}

/// A live view: a data object bound to a view root.
///
/// Cheap to clone; clones are handles to the same view model. Top-level data fields that
/// existed at build time are exposed as properties through [`ViewModel::get`] and
/// [`ViewModel::set`].
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use vireo::{dom, DataObject, ViewModel};
///
/// let document = dom::parse(r#"<div id="app"><p>{{ greeting }}, {{ name }}!</p></div>"#)?;
/// let vm = ViewModel::builder()
///     .data(DataObject::from_json(json!({ "greeting": "Hello", "name": "world" })).unwrap())
///     .mount_selector(&document, "#app")
///     .build()?;
///
/// assert_eq!(vm.root().text_content(), "Hello, world!");
/// vm.set("name", "vireo")?;
/// assert_eq!(vm.root().text_content(), "Hello, vireo!");
/// # Ok::<(), vireo::Error>(())
/// ```
#[derive(Clone)]
pub struct ViewModel {
    inner: Rc<ViewModelInner>,
}

impl ViewModel {
    /// Start building a view model.
    pub fn builder() -> ViewModelBuilder {
        ViewModelBuilder::default()
    }

    /// Current value of a property. Non-properties read as `Undefined`.
    pub fn get(&self, key: &str) -> Value {
        if !self.has_property(key) {
            return Value::Undefined;
        }
        self.inner.data.get(key)
    }

    /// Write a property through to the data object.
    ///
    /// Returns whether the value changed; subscribers have already run when this returns.
    pub fn set(&self, key: &str, value: impl Into<Value>) -> Result<bool> {
        if !self.has_property(key) {
            return Err(Error::UnknownProperty {
                name: key.to_string(),
            });
        }
        Ok(self.inner.data.set(key, value))
    }

    /// Property names, in data order.
    pub fn keys(&self) -> Vec<String> {
        self.inner.keys.borrow().clone()
    }

    /// Returns true if `key` is a property.
    pub fn has_property(&self, key: &str) -> bool {
        self.inner.keys.borrow().iter().any(|k| k == key)
    }

    /// The observed data object.
    pub fn data(&self) -> &DataObject {
        &self.inner.data
    }

    /// The view root.
    pub fn root(&self) -> &Node {
        &self.inner.root
    }

    /// The runtime owning this view model's subscribers.
    pub fn runtime(&self) -> &Runtime {
        &self.inner.runtime
    }

    /// The options the view was compiled with.
    pub fn options(&self) -> &CompilerOptions {
        &self.inner.options
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.inner.runtime.len()
    }

    /// Number of event listeners the compile pass attached.
    pub fn listener_count(&self) -> usize {
        self.inner.bindings.borrow().listener_count()
    }

    /// Run a method from the method table with this view model as context.
    pub fn call(&self, method: &str, event: &Event) -> Result<()> {
        let Some(f) = self.inner.methods.get(method).cloned() else {
            return Err(Error::UnknownMethod {
                name: method.to_string(),
            });
        };
        self.inner.tracer.on_event_dispatched(event.kind(), method);
        f(self, event).map_err(Error::from)
    }

    /// Tear the view down: release every subscriber and detach the event bindings.
    ///
    /// The view keeps its last rendered state. Data writes no longer reach it and
    /// view events no longer reach the data or the methods. Returns the number of
    /// subscribers released.
    pub fn destroy(&self) -> usize {
        self.inner.destroyed.set(true);
        self.inner.release()
    }

    /// Returns true once [`ViewModel::destroy`] has run.
    pub fn is_destroyed(&self) -> bool {
        self.inner.destroyed.get()
    }

    pub(crate) fn downgrade(&self) -> WeakViewModel {
        WeakViewModel(Rc::downgrade(&self.inner))
    }

    fn bind_context(&self) -> BindContext {
        BindContext {
            data: self.inner.data.clone(),
            runtime: self.inner.runtime.clone(),
            methods: self.inner.methods.clone(),
            vm: self.downgrade(),
            tracer: self.inner.tracer.clone(),
            options: self.inner.options.clone(),
        }
    }
}

impl fmt::Debug for ViewModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewModel")
            .field("data", &self.inner.data)
            .field("root", &self.inner.root)
            .field("subscribers", &self.subscriber_count())
            .field("destroyed", &self.is_destroyed())
            .finish()
    }
}

/// A view model handle that does not keep it alive. Event listeners hold these.
#[derive(Clone)]
pub(crate) struct WeakViewModel(Weak<ViewModelInner>);

impl WeakViewModel {
    /// The view model, unless it was dropped or destroyed.
    pub(crate) fn upgrade(&self) -> Option<ViewModel> {
        let inner = self.0.upgrade()?;
        if inner.destroyed.get() {
            return None;
        }
        Some(ViewModel { inner })
    }
}
