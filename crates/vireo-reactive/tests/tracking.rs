//! Dependency tracking through the public API.

use std::cell::RefCell;
use std::rc::Rc;

use vireo_reactive::{Cell, Runtime};

fn eq(a: &i32, b: &i32) -> bool {
    a == b
}

type Log = Rc<RefCell<Vec<(&'static str, i32)>>>;

fn watch(runtime: &Runtime, cell: &Rc<Cell<i32>>, name: &'static str, log: &Log) {
    let source = cell.clone();
    let log = log.clone();
    runtime.watch(
        move |cx| source.read(cx),
        eq,
        move |v: &i32| log.borrow_mut().push((name, *v)),
    );
}

#[test]
fn test_only_the_seeding_read_registers() {
    let runtime = Runtime::new();
    let a = Rc::new(Cell::new(1));
    let b = Rc::new(Cell::new(10));
    let log = Log::default();

    watch(&runtime, &a, "a", &log);
    assert_eq!(runtime.active_subscriber(), None);

    // Plain reads outside a seeding read never register anyone.
    let _ = b.get();
    let _ = a.get();
    assert_eq!(a.dep().len(), 1);
    assert!(b.dep().is_empty());

    // Updates re-read untracked, so notifying does not grow the set.
    for value in 2..5 {
        a.write(value, eq);
    }
    assert_eq!(a.dep().len(), 1);
    assert_eq!(*log.borrow(), vec![("a", 2), ("a", 3), ("a", 4)]);
}

#[test]
fn test_notification_is_change_gated_and_ordered() {
    let runtime = Runtime::new();
    let a = Rc::new(Cell::new(1));
    let b = Rc::new(Cell::new(1));
    let log = Log::default();

    watch(&runtime, &a, "first", &log);
    watch(&runtime, &b, "other", &log);
    watch(&runtime, &a, "second", &log);

    assert!(!a.write(1, eq));
    assert!(log.borrow().is_empty());

    assert!(a.write(7, eq));
    assert_eq!(*log.borrow(), vec![("first", 7), ("second", 7)]);
}

#[test]
fn test_duplicate_registration_fires_update_twice() {
    let runtime = Runtime::new();
    let a = Rc::new(Cell::new(1));
    let calls = Rc::new(std::cell::Cell::new(0));

    let source = a.clone();
    let counter = calls.clone();
    let id = runtime.watch(
        move |cx| source.read(cx) + source.read(cx),
        eq,
        move |_| counter.set(counter.get() + 1),
    );
    assert_eq!(a.dep().len(), 2);
    assert_eq!(runtime.sources(id), 2);

    // Both entries run; the second sees an unchanged value and stays silent.
    a.write(2, eq);
    assert_eq!(calls.get(), 1);
}

#[test]
fn test_release_stops_notifications() {
    let runtime = Runtime::new();
    let a = Rc::new(Cell::new(1));
    let log = Log::default();

    watch(&runtime, &a, "a", &log);
    let ids = a.dep().subscribers();
    assert_eq!(ids.len(), 1);

    assert!(runtime.release(ids[0]));
    assert!(!runtime.release(ids[0]));
    assert!(a.dep().is_empty());

    a.write(2, eq);
    assert!(log.borrow().is_empty());
}

#[test]
fn test_dropping_runtime_stops_notifications() {
    let a = Rc::new(Cell::new(1));
    let log = Log::default();
    {
        let runtime = Runtime::new();
        watch(&runtime, &a, "a", &log);
    }
    assert_eq!(a.dep().len(), 0);
    assert_eq!(a.dep().notify(), 0);
    a.write(2, eq);
    assert!(log.borrow().is_empty());
}

#[test]
fn test_callback_writing_back_converges() {
    let runtime = Runtime::new();
    let a = Rc::new(Cell::new(0));
    let seen = Rc::new(RefCell::new(Vec::new()));

    // Clamp every write to at most 10 from inside the callback.
    let source = a.clone();
    let target = a.clone();
    let sink = seen.clone();
    runtime.watch(
        move |cx| source.read(cx),
        eq,
        move |v: &i32| {
            sink.borrow_mut().push(*v);
            if *v > 10 {
                target.write(10, eq);
            }
        },
    );

    a.write(25, eq);
    assert_eq!(a.get(), 10);
    assert_eq!(*seen.borrow(), vec![25, 10]);
}

#[test]
fn test_release_is_scoped_to_its_runtime() {
    let a = Rc::new(Cell::new(1));
    let log = Log::default();
    let first = Runtime::new();
    let second = Runtime::new();

    watch(&first, &a, "first", &log);
    watch(&second, &a, "second", &log);
    assert_eq!(a.dep().len(), 2);

    first.release_all();
    assert_eq!(a.dep().len(), 1);
    assert_eq!(second.len(), 1);

    a.write(2, eq);
    assert_eq!(*log.borrow(), vec![("second", 2)]);

    // Dropping the other runtime's handles ends the last registration.
    drop(second);
    assert!(a.dep().is_empty());
}
