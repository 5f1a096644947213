// (c) Copyright 2025 Helsing GmbH. All rights reserved.
//! Views give each part of an application a store of its own, while the tree keeps a
//! single snapshot and a single history.

use pure_undo::{Path, Store, Updater, Value, array, object, path};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let store = Store::new(object! {
        "animals" => array![
            object! { "name" => "Aiofe", "age" => 6 },
            object! { "name" => "Sen", "age" => 8 },
        ],
    });

    // A view by path. Views of views compose.
    let animals = store.store_for("animals");
    let aiofe = animals.store_for(0usize);
    println!("{} lives at {}", aiofe.state(), aiofe.path()?);

    // A view chosen from the data itself: it follows Sen wherever Sen moves.
    let sen = store.store_for(|state: &Value| -> Option<Path> {
        let index = state
            .get("animals")?
            .as_array()?
            .iter()
            .position(|a| a.get("name").and_then(Value::as_str) == Some("Sen"))?;
        Some(path!["animals", index])
    });
    animals.update(|d| d.insert(0, object! { "name" => "Bran", "age" => 1 }))?;
    println!("Sen moved to {}", sen.path()?);

    // Updating through a view replaces the root, sharing every part off the edited path.
    let before = store.state();
    sen.merge(object! { "isBad" => false })?;
    let after = store.state();
    let untouched = |state: &Value| state.pointer(&path!["animals", 1]).cloned();
    if let (Some(old), Some(new)) = (untouched(&before), untouched(&after)) {
        println!("Aiofe shared between snapshots: {}", old.ptr_eq(&new));
    }

    // A bound updater for code that should only ever change one part.
    let update_aiofe = store.updater_for(path!["animals", 1]);
    update_aiofe(Updater::merge(object! { "isBad" => true }))?;
    update_aiofe(Updater::mutate(|d| d.set("age", 7)))?;

    println!("{}", store.state());
    Ok(())
}
