//! Example: Local, session and temporary stores

use std::time::Duration;

use lunar_storage::Store;
use serde_json::json;

fn main() {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let path = std::env::temp_dir().join("lunar-storage-example.json");

    // Persistent store
    let mut store = Store::local(&path, None);

    // Session-scoped store
    let mut session = Store::session(None);

    // Temporary store, data expires after five minutes
    let mut temp = Store::session(Some(Duration::from_secs(5 * 60)));

    println!("previous settings: {:?}", store.get("settings"));
    println!("previous session: {:?}", session.get_many(&["id", "token"]));

    store
        .set(
            "settings",
            json!({
                "renew": false,
                "persist": true,
                "auth": { "method": "facebook" }
            }),
        )
        .expect("settings serialize");

    session
        .import([
            ("id", json!(4211)),
            ("token", json!("QFTUrzm5HMGJugMpjEDrxdMP")),
        ])
        .expect("session entries serialize");

    temp.set("nonce", 7).expect("nonce serializes");

    println!("settings: {:?}", store.get("settings"));
    println!("session: {:?}", session.get_many(&["id", "token"]));
    println!("temp nonce: {:?}", temp.get("nonce"));

    store.remove("settings");
    session.remove_many(&["id", "token"]);

    let _ = std::fs::remove_file(&path);
}
