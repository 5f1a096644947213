// (c) Copyright 2025 Helsing GmbH. All rights reserved.
//! Every update is recorded as a forward and an inverse patch. Undo and redo replay them
//! against the current snapshot.

use pure_undo::{HistoryConfig, Store, array, object, path};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let store = Store::with_config(
        object! { "animals" => array![object! { "name" => "Aiofe", "age" => 6 }] },
        HistoryConfig::new(100),
    );

    store.update(|d| d.at("animals").push(object! { "name" => "Odin", "age" => 5 }))?;
    let odin = store.store_for(path!["animals", 1]);
    odin.update(|d| d.set("name", "NewOdin"))?;

    for (entry, inverse) in store.patches().iter().zip(store.inverse_patches()) {
        println!("do:\n{entry}\nundo:\n{inverse}\n");
    }

    // Views share the root's history: undoing through `odin` or `store` is the same thing.
    odin.undo()?;
    println!("after undo: {}", odin.state());
    store.redo()?;
    println!("after redo: {}", odin.state());

    // Recording after an undo discards what could have been redone.
    store.undo()?;
    store.undo()?;
    store.merge(object! { "owner" => "Siobhan" })?;
    println!(
        "can redo: {}, entries: {}, pointer: {:?}",
        store.can_redo(),
        store.history_len(),
        store.history_pointer()
    );

    // Updates outside the history survive undo.
    store.merge_without_patches(object! { "visits" => 3 })?;
    store.undo()?;
    println!("{}", store.state());
    Ok(())
}
