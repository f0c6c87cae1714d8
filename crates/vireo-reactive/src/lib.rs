#![deny(missing_docs)]
//! Reactive primitives for the vireo view-binding engine.
//!
//! This crate holds the dependency-tracking half of vireo:
//!
//! - [`Cell`]: a value plus the [`Dep`] of everything that read it while tracking.
//! - [`Dep`]: an ordered list of subscribers, notified in registration order.
//! - [`Runtime`]: owns subscribers and hands out [`SubscriberId`]s so they can be released.
//! - [`TrackingScope`] / [`ReadContext`]: the explicit "who is reading" context. Only the
//!   seeding read of a subscriber runs under a tracking context; later reads are untracked.
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use std::cell::RefCell;
//! use vireo_reactive::{Cell, Runtime};
//!
//! let runtime = Runtime::new();
//! let cell = Rc::new(Cell::new(1));
//! let seen = Rc::new(RefCell::new(Vec::new()));
//!
//! let source = cell.clone();
//! let sink = seen.clone();
//! runtime.watch(
//!     move |cx| source.read(cx),
//!     |a: &i32, b: &i32| a == b,
//!     move |v: &i32| sink.borrow_mut().push(*v),
//! );
//!
//! cell.write(2, |a, b| a == b);
//! cell.write(2, |a, b| a == b);
//! assert_eq!(*seen.borrow(), vec![2]);
//! ```

mod cell;
mod dep;
mod runtime;
mod tracking;
mod watcher;

pub use cell::{Cell, RevisionCounter};
pub use dep::Dep;
pub use runtime::{Runtime, SubscriberId};
pub use tracking::{ReadContext, TrackingScope};
pub use watcher::{Subscriber, Watcher};
