// (c) Copyright 2025 Helsing GmbH. All rights reserved.
//! Application state defined as Rust types, stored as a document and read back.

use pure_undo::{Store, object, path};
use serde::{Deserialize, Serialize};
use std::error::Error;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Walks {
    number_of_walks: u32,
    animals: Vec<Animal>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Animal {
    name: String,
    age: u8,
}

fn main() -> Result<(), Box<dyn Error>> {
    let store = Store::from_serialize(&Walks {
        number_of_walks: 2876,
        animals: vec![
            Animal {
                name: "Aiofe".into(),
                age: 6,
            },
            Animal {
                name: "Sen".into(),
                age: 8,
            },
        ],
    })?;

    store.store_for(path!["animals", 1]).merge(object! { "age" => 9 })?;
    let sen: Animal = store.store_for(path!["animals", 1]).state_as()?;
    println!("{sen:?}");

    store.undo()?;
    let walks: Walks = store.state_as()?;
    println!("{walks:#?}");

    let json = serde_json::Value::from(&store.state());
    println!("{json}");
    Ok(())
}
