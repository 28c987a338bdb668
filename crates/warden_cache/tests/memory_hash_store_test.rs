//! Tests for the in-memory hash store.

use std::sync::Arc;
use warden_cache::{HashStore, MemoryHashStore};

#[tokio::test]
async fn test_set_get_delete() {
    let store: MemoryHashStore<&str, &str, String> = MemoryHashStore::new();

    store.set(&"h", &"f", &"x".to_string()).await.unwrap();
    assert_eq!(store.get(&"h", &"f").await.unwrap(), Some("x".to_string()));

    store.delete(&"h", &"f").await.unwrap();
    assert_eq!(store.get(&"h", &"f").await.unwrap(), None);

    // Deleting again is not an error.
    store.delete(&"h", &"f").await.unwrap();
}

#[tokio::test]
async fn test_set_if_absent() {
    let store: MemoryHashStore<&str, u64, u64> = MemoryHashStore::new();

    assert!(store.set_if_absent(&"mutes", &1, &10).await.unwrap());
    assert!(!store.set_if_absent(&"mutes", &1, &20).await.unwrap());
    assert_eq!(store.get(&"mutes", &1).await.unwrap(), Some(10));
}

#[tokio::test]
async fn test_empty_string_is_distinct_from_absent() {
    let store: MemoryHashStore<&str, &str, String> = MemoryHashStore::new();
    store.set(&"prefixes", &"guild", &String::new()).await.unwrap();

    assert_eq!(
        store.get(&"prefixes", &"guild").await.unwrap(),
        Some(String::new())
    );
    assert!(store.exists(&"prefixes", &"guild").await.unwrap());
    assert!(!store.exists(&"prefixes", &"other").await.unwrap());
}

#[tokio::test]
async fn test_length_all_and_values() {
    let store: MemoryHashStore<String, u32, bool> = MemoryHashStore::new();
    let hash = "logging:411804307302776833".to_string();

    assert_eq!(store.length(&hash).await.unwrap(), 0);
    assert!(store.all(&hash).await.unwrap().is_empty());
    assert!(store.values(&hash).await.unwrap().is_empty());

    store.set(&hash, &1, &true).await.unwrap();
    store.set(&hash, &2, &false).await.unwrap();

    assert_eq!(store.length(&hash).await.unwrap(), 2);
    let all = store.all(&hash).await.unwrap();
    assert_eq!(all.get("1"), Some(&true));
    assert_eq!(all.get("2"), Some(&false));

    let mut values = store.values(&hash).await.unwrap();
    values.sort();
    assert_eq!(values, vec![false, true]);
}

#[tokio::test]
async fn test_remove_whole_hash() {
    let store: MemoryHashStore<&str, &str, i32> = MemoryHashStore::new();
    store.set(&"h", &"a", &1).await.unwrap();
    store.set(&"h", &"b", &2).await.unwrap();

    assert!(store.remove(&"h").await.unwrap());
    assert_eq!(store.length(&"h").await.unwrap(), 0);
    assert!(!store.remove(&"h").await.unwrap());
}

#[tokio::test]
async fn test_clone_shares_data() {
    let store: MemoryHashStore<&str, &str, i32> = MemoryHashStore::new();
    let handle = store.clone();
    handle.set(&"h", &"f", &5).await.unwrap();
    assert_eq!(store.get(&"h", &"f").await.unwrap(), Some(5));
}

#[tokio::test]
async fn test_usable_as_trait_object() {
    let store: Arc<dyn HashStore<String, String, String>> = Arc::new(MemoryHashStore::new());
    store
        .set(&"h".to_string(), &"f".to_string(), &"v".to_string())
        .await
        .unwrap();
    assert_eq!(
        store.get(&"h".to_string(), &"f".to_string()).await.unwrap(),
        Some("v".to_string())
    );
}

#[tokio::test]
async fn test_concurrent_set_if_absent_has_single_winner() {
    let store: MemoryHashStore<&'static str, &'static str, u32> = MemoryHashStore::new();
    let mut handles = Vec::new();
    for i in 0..16u32 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            store.set_if_absent(&"locks", &"owner", &i).await.unwrap()
        }));
    }

    let mut winners = 0;
    for handle in handles {
        if handle.await.unwrap() {
            winners += 1;
        }
    }
    assert_eq!(winners, 1);
}
