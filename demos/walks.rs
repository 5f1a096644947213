// (c) Copyright 2025 Helsing GmbH. All rights reserved.
//! A dog walker's book-keeping: read the state, edit it through a recipe and through a
//! partial object, and watch the changes arrive at a subscriber.

use pure_undo::{Store, Value, array, object};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let store = Store::new(object! {
        "numberOfWalks" => 2876,
        "animals" => array![
            object! { "name" => "Aiofe", "age" => 6 },
            object! { "name" => "Sen", "age" => 8 },
        ],
    });

    // Subscribers run after every change, whichever handle made it.
    let log = store.clone();
    let _subscription = store.subscribe(move || {
        println!("state is now {}", log.state());
    });

    // A recipe edits a draft. The snapshot it started from stays untouched.
    let before = store.state();
    store.update(|d| {
        d.set_with("numberOfWalks", |n| Value::from(n.as_i64().unwrap_or(0) + 1));
    })?;
    println!("walks before: {}", before.get("numberOfWalks").unwrap_or(&Value::Null));

    // A partial object is merged onto the target.
    store.merge(object! { "owner" => "Siobhan" })?;

    // Writing the value that is already there changes nothing and notifies no one.
    store.merge(object! { "owner" => "Siobhan" })?;

    // Arrays are edited through the draft of their parent.
    store.update(|d| d.at("animals").push(object! { "name" => "Odin", "age" => 5 }))?;

    println!("{} updates recorded", store.history_len());
    Ok(())
}
