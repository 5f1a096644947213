//! Tests for undo/redo.
//!
//! All handles of a tree share one linear history. Undo and redo past either end are no-ops,
//! recording after an undo discards what could have been redone, and updates that change
//! nothing are never recorded.

use pure_undo::{HistoryConfig, Store, Value, array, object, path};

fn walks() -> Value {
    object! {
        "numberOfWalks" => 2876,
        "animals" => array![
            object! { "name" => "Aiofe", "age" => 6 },
            object! { "name" => "Sen", "age" => 8 },
        ],
    }
}

fn walk_count(store: &Store) -> i64 {
    store
        .state()
        .get("numberOfWalks")
        .and_then(Value::as_i64)
        .unwrap_or_default()
}

fn animal_count(store: &Store) -> usize {
    store.state().get("animals").map_or(0, Value::len)
}

fn push_animal(store: &Store, name: &str, age: i64) {
    store
        .update(|d| d.at("animals").push(object! { "name" => name, "age" => age }))
        .unwrap();
}

#[test]
fn undo_and_redo_stop_at_the_ends() {
    let store = Store::new(walks());
    store.update(|d| d.set("numberOfWalks", 1000)).unwrap();
    assert_eq!(walk_count(&store), 1000);

    store.undo().unwrap();
    assert_eq!(walk_count(&store), 2876);
    store.undo().unwrap();
    assert_eq!(walk_count(&store), 2876);
    assert!(!store.can_undo());

    store.redo().unwrap();
    assert_eq!(walk_count(&store), 1000);
    store.redo().unwrap();
    assert_eq!(walk_count(&store), 1000);
    assert!(!store.can_redo());
}

#[test]
fn views_share_the_root_history() {
    let store = Store::new(walks());
    push_animal(&store, "Odin", 5);
    let odin = store.store_for(path!["animals", 2]);
    assert_eq!(*odin.state().get("name").unwrap(), "Odin");

    odin.update(|d| d.set("name", "NewOdin")).unwrap();
    odin.undo().unwrap();
    assert_eq!(*odin.state().get("name").unwrap(), "Odin");
    odin.redo().unwrap();
    assert_eq!(*odin.state().get("name").unwrap(), "NewOdin");

    store.undo().unwrap();
    assert_eq!(odin.state(), object! { "age" => 5, "name" => "Odin" });
    store.redo().unwrap();
    assert_eq!(odin.state(), object! { "age" => 5, "name" => "NewOdin" });

    assert_eq!(odin.patches(), store.patches());
    let patches: Vec<String> = store.patches().iter().map(ToString::to_string).collect();
    insta::assert_debug_snapshot!(patches, @r#"
    [
        "insert /animals/2 = {\"age\":5,\"name\":\"Odin\"}",
        "set /animals/2/name = \"NewOdin\"",
    ]
    "#);
}

#[test]
fn recording_after_undo_discards_redo_entries() {
    let store = Store::new(walks());
    push_animal(&store, "Odin", 5);
    push_animal(&store, "Animal-4", 4);
    push_animal(&store, "Animal-5", 5);
    assert_eq!(animal_count(&store), 5);

    store.undo().unwrap();
    store.undo().unwrap();
    assert_eq!(animal_count(&store), 3);

    push_animal(&store, "Animal-4", 4);
    assert_eq!(store.history_pointer(), Some(1));
    assert_eq!(animal_count(&store), 4);

    store.redo().unwrap();
    assert_eq!(animal_count(&store), 4);
    store.redo().unwrap();
    assert_eq!(animal_count(&store), 4);

    store.undo().unwrap();
    assert_eq!(animal_count(&store), 3);
}

#[test]
fn unchanged_updates_are_not_recorded() {
    let store = Store::new(walks());
    for _ in 0..4 {
        store.update(|d| d.set("numberOfWalks", 1000)).unwrap();
    }
    assert_eq!(store.patches().len(), 1);

    store.merge(object! { "numberOfWalks" => 1000 }).unwrap();
    store.update(|_| {}).unwrap();
    assert_eq!(store.history_len(), 1);
}

#[test]
fn rewriting_nan_is_not_recorded() {
    let store = Store::new(object! { "ratio" => 0.5 });
    for _ in 0..4 {
        store.update(|d| d.set("ratio", f64::NAN)).unwrap();
    }
    assert_eq!(store.history_len(), 1);

    store.merge(object! { "ratio" => -f64::NAN }).unwrap();
    assert_eq!(store.history_len(), 1);
}

#[test]
fn updates_without_patches_survive_undo() {
    let store = Store::new(object! {
        "animals" => object! {
            "1" => object! { "name" => "a" },
            "2" => object! { "name" => "b" },
        },
    });
    store
        .update(|d| d.at("animals").set(3, object! { "name" => "c" }))
        .unwrap();
    store
        .update_without_patches(|d| d.at("animals").set(4, object! { "name" => "d" }))
        .unwrap();
    assert_eq!(store.history_len(), 1);

    store.undo().unwrap();
    let state = store.state();
    insta::assert_snapshot!(
        state.get("animals").unwrap(),
        @r#"{"1":{"name":"a"},"2":{"name":"b"},"4":{"name":"d"}}"#
    );

    store.redo().unwrap();
    let state = store.state();
    insta::assert_snapshot!(
        state.get("animals").unwrap(),
        @r#"{"1":{"name":"a"},"2":{"name":"b"},"3":{"name":"c"},"4":{"name":"d"}}"#
    );
}

#[test]
fn clear_history_keeps_the_state() {
    let store = Store::new(walks());
    store.merge(object! { "numberOfWalks" => 1 }).unwrap();
    store.merge(object! { "numberOfWalks" => 2 }).unwrap();
    store.undo().unwrap();

    store.clear_history();
    assert_eq!(walk_count(&store), 1);
    assert_eq!(store.history_len(), 0);
    assert_eq!(store.history_pointer(), None);
    assert!(!store.can_undo() && !store.can_redo());

    store.undo().unwrap();
    assert_eq!(walk_count(&store), 1);
}

#[test]
fn inverse_patches_mirror_forward_patches() {
    let store = Store::new(walks());
    store
        .update(|d| {
            d.at("animals").remove(0);
            d.set("owner", "Siobhan");
        })
        .unwrap();

    let forward = store.patches();
    let inverse = store.inverse_patches();
    assert_eq!(forward.len(), 1);
    insta::assert_snapshot!(forward[0], @r#"
    remove /animals/0
    set /owner = "Siobhan"
    "#);
    insta::assert_snapshot!(inverse[0], @r#"
    remove /owner
    insert /animals/0 = {"age":6,"name":"Aiofe"}
    "#);
    assert_eq!(inverse[0].apply(&store.state()).unwrap(), walks());
}

#[test]
fn depth_limit_drops_the_oldest_entries() {
    let store = Store::with_config(walks(), HistoryConfig::new(2));
    for n in 0..4 {
        store.merge(object! { "numberOfWalks" => n }).unwrap();
    }
    assert_eq!(store.history_len(), 2);
    assert_eq!(store.history_pointer(), Some(1));

    store.undo().unwrap();
    store.undo().unwrap();
    store.undo().unwrap();
    assert_eq!(walk_count(&store), 1);
}
