// tests/seen_store.rs
use std::fs;
use std::path::PathBuf;

use promo_bot::store::{SeenSet, SeenStore};

fn tmp_dir(name: &str) -> PathBuf {
    let mut p = std::env::temp_dir();
    p.push(format!("promo_bot_store_{}", name));
    let _ = fs::remove_dir_all(&p);
    fs::create_dir_all(&p).unwrap();
    p
}

#[test]
fn missing_file_loads_empty() {
    let dir = tmp_dir("missing");
    let store = SeenStore::new(dir.join("seen.json"));
    assert!(store.load().is_empty());
}

#[test]
fn malformed_content_loads_empty() {
    let dir = tmp_dir("malformed");
    let path = dir.join("seen.json");
    let store = SeenStore::new(&path);
    for bad in ["", "   ", "not json", "{\"a\": 1}", "[1, 2]", "[\"a\", 3]", "[\"unterminated"] {
        fs::write(&path, bad).unwrap();
        assert!(store.load().is_empty(), "{bad:?}");
    }
    fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();
    assert!(store.load().is_empty());
}

#[test]
fn unreadable_path_loads_empty() {
    // A directory where the file should be
    let dir = tmp_dir("is_dir");
    let store = SeenStore::new(&dir);
    assert!(store.load().is_empty());
}

#[test]
fn save_then_load_keeps_every_id() {
    let dir = tmp_dir("roundtrip");
    let path = dir.join("nested").join("seen.json");
    let store = SeenStore::new(&path);

    let seen: SeenSet = ["40% Off Home Kit", "https://cdn.example.com/hero.jpg", "Ünïcode sale"]
        .into_iter()
        .collect();
    store.save(&seen).unwrap();

    assert_eq!(store.load(), seen);
    assert!(!dir.join("nested").join("seen.json.tmp").exists());

    // On disk it's a plain JSON array of strings
    let raw: Vec<String> = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw.len(), 3);
}

#[test]
fn save_overwrites_and_set_only_grows() {
    let dir = tmp_dir("grow");
    let store = SeenStore::new(dir.join("seen.json"));

    let mut seen = store.load();
    assert!(seen.insert("first deal here"));
    store.save(&seen).unwrap();

    let mut again = store.load();
    assert!(!again.insert("first deal here"));
    assert!(again.insert("second deal here"));
    store.save(&again).unwrap();

    let last = store.load();
    assert_eq!(last.len(), 2);
    assert!(last.contains("first deal here"));
    assert!(last.contains("second deal here"));
}
