#![deny(missing_docs)]
//! vireo: a minimal reactive view-binding engine.
//!
//! A [`ViewModel`] ties three things together:
//!
//! - a [`DataObject`], whose fields are intercepted so that reads can be tracked and
//!   writes notify whoever read them;
//! - a view root in the in-memory [`dom`], whose template syntax is compiled into live
//!   bindings;
//! - a method table used by event bindings.
//!
//! # Template syntax
//!
//! | Form | Meaning |
//! |---|---|
//! | `{{ expr }}` in text | interpolated read, the whole text re-rendered on change |
//! | `v-model="expr"` | two-way value binding |
//! | `v-text="expr"` | one-way text binding |
//! | `v-on:event="method"` | event binding |
//! | `@event="method"` | event binding shorthand |
//!
//! An expression is a single top-level field name, surrounding whitespace ignored.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use vireo::{dom, DataObject, ViewModel};
//!
//! let document = dom::parse(
//!     r#"<div id="app"><input v-model="name"><p>Hi {{ name }}</p><button @click="reset">x</button></div>"#,
//! )?;
//! let vm = ViewModel::builder()
//!     .data(DataObject::from_json(json!({ "name": "a" })).unwrap())
//!     .mount_selector(&document, "#app")
//!     .method("reset", |vm, _event| {
//!         vm.set("name", "")?;
//!         Ok(())
//!     })
//!     .build()?;
//!
//! let input = vm.root().query_selector("input").unwrap();
//! input.simulate_input("b")?;
//! assert_eq!(vm.root().text_content(), "Hi bx");
//!
//! let button = vm.root().query_selector("button").unwrap();
//! button.dispatch_event(dom::Event::new("click"))?;
//! assert_eq!(input.value(), "");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Updates are synchronous
//!
//! A write notifies every subscriber of the written field on the same call stack, and a
//! subscriber callback may write further fields. The only cycle guard is that writing a
//! value equal to the current one does nothing, so mutually dependent writes that never
//! settle on equal values recurse until the stack overflows. Avoiding such cycles is the
//! caller's job.

pub mod accessor;
mod binder;
mod compiler;
mod data;
pub mod directive;
pub mod dom;
mod error;
pub mod observer;
mod options;
pub mod template;
pub mod tracer;
mod value;
mod view_model;

pub use compiler::Bindings;
pub use data::DataObject;
pub use directive::Directive;
pub use error::{Error, Result};
pub use options::{CompilerOptions, Delimiters, UnknownDirectivePolicy};
pub use template::{Segment, Template};
pub use tracer::{BindingKind, CompileOutcome, NoopTracer, SpanId, Tracer};
pub use value::{Array, Value};
pub use view_model::{Method, ViewModel, ViewModelBuilder};

pub use vireo_reactive::{Runtime, SubscriberId};
