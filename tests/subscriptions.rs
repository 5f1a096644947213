//! Tests for change notification.
//!
//! Subscribers of any handle are registered with the root. They run once per actual change,
//! whichever handle the change went through, and never for updates that change nothing.

use pure_undo::{Store, Value, array, object, path};
use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

fn walks() -> Value {
    object! {
        "numberOfWalks" => 2876,
        "animals" => array![
            object! { "name" => "Aiofe", "age" => 6 },
            object! { "name" => "Sen", "age" => 8 },
        ],
    }
}

fn increment(d: &mut pure_undo::Draft<'_>, key: &str) {
    d.set_with(key, |n| Value::from(n.as_i64().unwrap_or(0) + 1));
}

fn counter(store: &Store) -> (Rc<Cell<u32>>, pure_undo::Subscription) {
    let count = Rc::new(Cell::new(0));
    let inner = Rc::clone(&count);
    let subscription = store.subscribe(move || inner.set(inner.get() + 1));
    (count, subscription)
}

#[test]
fn subscribers_run_after_changes() {
    let store = Store::new(walks());
    let (count, _subscription) = counter(&store);
    assert_eq!(count.get(), 0);

    store.update(|d| increment(d, "numberOfWalks")).unwrap();
    assert_eq!(count.get(), 1);
}

#[test]
fn unchanged_updates_do_not_notify() {
    let store = Store::new(walks());
    let (count, _subscription) = counter(&store);

    let walks = store.state().get("numberOfWalks").cloned().unwrap();
    store.merge(object! { "numberOfWalks" => walks }).unwrap();
    store.undo().unwrap();
    store.redo().unwrap();
    assert_eq!(count.get(), 0);
}

#[test]
fn view_updates_notify_root_subscribers() {
    let store = Store::new(walks());
    let sen = store.store_for(path!["animals", 1]);
    let (count, _subscription) = counter(&store);

    sen.update(|d| increment(d, "age")).unwrap();
    assert_eq!(count.get(), 1);
}

#[test]
fn views_can_be_subscribed_to() {
    let store = Store::new(walks());
    let sen = store.store_for(path!["animals", 1]);
    let (count, _subscription) = counter(&sen);

    sen.update(|d| increment(d, "age")).unwrap();
    store.update(|d| increment(d, "numberOfWalks")).unwrap();
    assert_eq!(count.get(), 2);
    assert_eq!(store.subscriber_count(), 1);
}

#[test]
fn subscriptions_can_be_cancelled() {
    let store = Store::new(walks());
    let (count, subscription) = counter(&store);

    store.update(|d| increment(d, "numberOfWalks")).unwrap();
    store.update(|d| increment(d, "numberOfWalks")).unwrap();
    assert_eq!(count.get(), 2);

    subscription.unsubscribe();
    subscription.unsubscribe();
    assert!(!subscription.is_active());
    store.update(|d| increment(d, "numberOfWalks")).unwrap();
    assert_eq!(count.get(), 2);
}

#[test]
fn undo_and_redo_notify() {
    let store = Store::new(walks());
    store.update(|d| increment(d, "numberOfWalks")).unwrap();
    let (count, _subscription) = counter(&store);

    store.undo().unwrap();
    store.redo().unwrap();
    assert_eq!(count.get(), 2);
}

#[test]
fn subscribers_see_the_new_state_in_registration_order() {
    let store = Store::new(object! { "n" => 0 });
    let seen = Rc::new(RefCell::new(Vec::new()));
    for name in ["first", "second"] {
        let seen = Rc::clone(&seen);
        let view = store.store_for("n");
        let _ = store.subscribe(move || {
            let n = view.state().as_i64().unwrap_or(-1);
            seen.borrow_mut().push(format!("{name}:{n}"));
        });
    }

    store.merge(object! { "n" => 1 }).unwrap();
    assert_eq!(*seen.borrow(), ["first:1", "second:1"]);
}

#[test]
fn unsubscribing_during_notification() {
    let store = Store::new(object! { "n" => 0 });
    let late = Rc::new(RefCell::new(None::<pure_undo::Subscription>));

    // the canceller runs first and removes `late`, which still runs in that pass
    let cancel = Rc::clone(&late);
    let _canceller = store.subscribe(move || {
        if let Some(subscription) = cancel.borrow().as_ref() {
            subscription.unsubscribe();
        }
    });
    let (count, subscription) = counter(&store);
    *late.borrow_mut() = Some(subscription);

    store.merge(object! { "n" => 1 }).unwrap();
    assert_eq!(count.get(), 1);
    store.merge(object! { "n" => 2 }).unwrap();
    assert_eq!(count.get(), 1);
    assert_eq!(store.subscriber_count(), 1);
}

#[test]
fn subscribers_may_update_the_store() {
    let store = Store::new(object! { "n" => 0, "double" => 0 });
    let handle = store.clone();
    let _subscription = store.subscribe(move || {
        let n = handle.state().get("n").and_then(Value::as_i64).unwrap_or(0);
        handle.merge(object! { "double" => n * 2 }).unwrap();
    });

    store.merge(object! { "n" => 21 }).unwrap();
    assert_eq!(store.state(), object! { "n" => 21, "double" => 42 });

    // one entry for the outer update, one for the subscriber's
    assert_eq!(store.history_len(), 2);
}

#[test]
fn nested_updates_finish_before_later_subscribers_run() {
    let store = Store::new(object! { "n" => 0, "m" => 0 });
    let seen = Rc::new(RefCell::new(Vec::new()));

    let mirror = store.clone();
    let _mirror = store.subscribe(move || {
        let n = mirror.state().get("n").cloned().unwrap_or_default();
        mirror.merge(object! { "m" => n }).unwrap();
    });
    let log = Rc::clone(&seen);
    let reader = store.clone();
    let _logger = store.subscribe(move || log.borrow_mut().push(reader.state().to_string()));

    store.merge(object! { "n" => 1 }).unwrap();
    // the nested pass logs first, then the outer pass resumes with the settled state
    assert_eq!(*seen.borrow(), [r#"{"m":1,"n":1}"#, r#"{"m":1,"n":1}"#]);
}

#[test]
fn updates_without_patches_notify_on_change_only() {
    let store = Store::new(walks());
    let (count, _subscription) = counter(&store);

    store.merge_without_patches(object! { "owner" => "Siobhan" }).unwrap();
    assert_eq!(count.get(), 1);

    store.merge_without_patches(object! { "owner" => "Siobhan" }).unwrap();
    store.update_without_patches(|d| d.set("owner", "Siobhan")).unwrap();
    assert_eq!(count.get(), 1);
    assert_eq!(store.history_len(), 0);
}
