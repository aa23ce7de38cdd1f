//! Registry implementation
//!
//! A concurrent keyed store of entities with derived external paths.

use std::collections::HashMap;
use std::fmt::Display;
use std::hash::Hash;

use parking_lot::Mutex;

use super::error::RegistryError;
use crate::bus::{Event, EventBus};
use crate::entity::{Base, Entity};

/// Bounds required of registry keys
///
/// `Display` renders the key into paths and event ids.
pub trait RegistryKey: Eq + Hash + Clone + Display + Send + Sync + 'static {}

impl<K> RegistryKey for K where K: Eq + Hash + Clone + Display + Send + Sync + 'static {}

struct Inner<K, V> {
    entries: HashMap<K, V>,
    basepath: String,
}

impl<K: RegistryKey, V: Entity> Inner<K, V> {
    fn path_of(&self, key: &K) -> String {
        format!("{}{}", self.basepath, key)
    }

    fn stamp(&self, key: &K, value: &mut V) {
        value.base_mut().meta.path = self.path_of(key);
    }

    fn stamp_all(&mut self) {
        let basepath = &self.basepath;
        for (key, value) in self.entries.iter_mut() {
            value.base_mut().meta.path = format!("{}{}", basepath, key);
        }
    }
}

/// Central store for one kind of entity
///
/// Thread-safe via a single `Mutex`. Registries are small and read far more
/// often than written, and one lock keeps every operation linearizable.
/// Events are published while the lock is held; publishing is O(1) and
/// never waits on subscribers.
pub struct Registry<K, V> {
    inner: Mutex<Inner<K, V>>,
    events: EventBus<Event>,
}

impl<K: RegistryKey, V: Entity> Registry<K, V> {
    /// Create an empty registry with an empty basepath
    pub fn new() -> Self {
        Self::with_prefix("")
    }

    /// Create an empty registry with the given basepath
    pub fn with_prefix(basepath: impl Into<String>) -> Self {
        Self {
            inner: Mutex::new(Inner {
                entries: HashMap::new(),
                basepath: basepath.into(),
            }),
            events: EventBus::new(),
        }
    }

    /// Set the basepath
    ///
    /// Meant to be called once before traffic begins. Every stored path is
    /// recomputed; no event is emitted.
    pub fn set_prefix(&self, basepath: impl Into<String>) {
        let mut inner = self.inner.lock();
        inner.basepath = basepath.into();
        inner.stamp_all();
    }

    /// The basepath, which is also the topic of this registry's events
    pub fn prefix(&self) -> String {
        self.inner.lock().basepath.clone()
    }

    /// This registry's change bus
    pub fn events(&self) -> &EventBus<Event> {
        &self.events
    }

    /// Get a copy of the entity stored under `key`
    pub fn get(&self, key: &K) -> Option<V> {
        self.inner.lock().entries.get(key).cloned()
    }

    /// Whether `key` is present
    pub fn contains(&self, key: &K) -> bool {
        self.inner.lock().entries.contains_key(key)
    }

    /// Store `value` under `key`, replacing any previous value
    pub fn put(&self, key: K, mut value: V) {
        let mut inner = self.inner.lock();
        inner.stamp(&key, &mut value);

        tracing::debug!(
            topic = %inner.basepath,
            key = %key,
            "Entity stored"
        );

        let event = Event::new(inner.basepath.clone(), key.to_string());
        inner.entries.insert(key, value);
        self.events.publish(event);
    }

    /// Remove the entity under `key`
    ///
    /// Emits an event only if something was removed.
    pub fn remove(&self, key: &K) -> Option<V> {
        let mut inner = self.inner.lock();
        let removed = inner.entries.remove(key);

        if removed.is_some() {
            tracing::debug!(topic = %inner.basepath, key = %key, "Entity removed");
            self.events
                .publish(Event::new(inner.basepath.clone(), key.to_string()));
        }

        removed
    }

    /// Drop every stored entity matching `should_drop`, then store all of
    /// `new_values`
    ///
    /// Lets a producer that owns a slice of the registry (say, the tabs of
    /// one browser) refresh that slice without touching the rest. One bulk
    /// event is emitted for the whole operation.
    pub fn replace<F>(&self, new_values: HashMap<K, V>, should_drop: F)
    where
        F: Fn(&V) -> bool,
    {
        let mut inner = self.inner.lock();

        let before = inner.entries.len();
        inner.entries.retain(|_, value| !should_drop(value));
        let dropped = before - inner.entries.len();
        let added = new_values.len();

        for (key, mut value) in new_values {
            inner.stamp(&key, &mut value);
            inner.entries.insert(key, value);
        }

        tracing::debug!(
            topic = %inner.basepath,
            dropped = dropped,
            added = added,
            entries = inner.entries.len(),
            "Registry partially replaced"
        );

        self.events.publish(Event::bulk(inner.basepath.clone()));
    }

    /// Swap the entire contents for `new_set`
    ///
    /// Used by producers that rescan everything. One bulk event is emitted.
    pub fn replace_all(&self, new_set: HashMap<K, V>) {
        let mut inner = self.inner.lock();
        inner.entries = new_set;
        inner.stamp_all();

        tracing::debug!(
            topic = %inner.basepath,
            entries = inner.entries.len(),
            "Registry replaced"
        );

        self.events.publish(Event::bulk(inner.basepath.clone()));
    }

    /// Snapshot of every stored entity, in no particular order
    pub fn get_all(&self) -> Vec<V> {
        self.inner.lock().entries.values().cloned().collect()
    }

    /// Snapshot of the `Base` of every entity not omitted from search
    pub fn get_for_search(&self) -> Vec<Base> {
        self.inner
            .lock()
            .entries
            .values()
            .filter(|value| !value.omit_from_search())
            .map(|value| value.base().clone())
            .collect()
    }

    /// Paths of every stored entity
    pub fn get_paths(&self) -> Vec<String> {
        self.inner
            .lock()
            .entries
            .values()
            .map(|value| value.base().meta.path.clone())
            .collect()
    }

    /// Number of stored entities
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Invoke the post capability of the entity under `key`
    ///
    /// The entity is looked up under the lock; the capability runs on the
    /// snapshot after the lock is released.
    pub fn post(&self, key: &K, action: &str) -> Result<(), RegistryError> {
        let (path, value) = self.lookup(key)?;
        match value.as_postable() {
            Some(postable) => {
                tracing::debug!(path = %path, action = action, "Posting action");
                postable.post(action)
            }
            None => Err(RegistryError::NotAllowed(path)),
        }
    }

    /// Invoke the delete capability of the entity under `key`
    pub fn delete(&self, key: &K) -> Result<(), RegistryError> {
        let (path, value) = self.lookup(key)?;
        match value.as_deletable() {
            Some(deletable) => {
                tracing::debug!(path = %path, "Deleting");
                deletable.delete()
            }
            None => Err(RegistryError::NotAllowed(path)),
        }
    }

    fn lookup(&self, key: &K) -> Result<(String, V), RegistryError> {
        let inner = self.inner.lock();
        let path = inner.path_of(key);
        match inner.entries.get(key) {
            Some(value) => Ok((path, value.clone())),
            None => Err(RegistryError::NotFound(path)),
        }
    }
}

impl<K: RegistryKey, V: Entity> Default for Registry<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use serde::Serialize;

    use super::*;
    use crate::entity::{Deletable, Kind, Postable};

    #[derive(Clone, Serialize)]
    struct Item {
        #[serde(flatten)]
        base: Base,
        owner: String,
        hidden: bool,
        #[serde(skip)]
        posts: Arc<AtomicUsize>,
    }

    impl Item {
        fn new(title: &str, owner: &str) -> Self {
            Self {
                base: Base::new(title, "", "", Kind::Tab),
                owner: owner.to_string(),
                hidden: false,
                posts: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    impl Entity for Item {
        fn base(&self) -> &Base {
            &self.base
        }

        fn base_mut(&mut self) -> &mut Base {
            &mut self.base
        }

        fn omit_from_search(&self) -> bool {
            self.hidden
        }

        fn as_postable(&self) -> Option<&dyn Postable> {
            Some(self)
        }
    }

    impl Postable for Item {
        fn post(&self, action: &str) -> Result<(), RegistryError> {
            if action.is_empty() {
                self.posts.fetch_add(1, Ordering::Relaxed);
                Ok(())
            } else {
                Err(RegistryError::UnknownAction {
                    path: self.base.meta.path.clone(),
                    action: action.to_string(),
                })
            }
        }
    }

    #[derive(Clone, Serialize)]
    struct Plain {
        #[serde(flatten)]
        base: Base,
    }

    impl Entity for Plain {
        fn base(&self) -> &Base {
            &self.base
        }

        fn base_mut(&mut self) -> &mut Base {
            &mut self.base
        }

        fn as_deletable(&self) -> Option<&dyn Deletable> {
            None
        }
    }

    fn registry() -> Registry<String, Item> {
        Registry::with_prefix("/tab/")
    }

    fn drain(sub: &mut crate::bus::Subscription<Event>) -> Vec<Event> {
        std::iter::from_fn(|| sub.try_next()).collect()
    }

    #[test]
    fn test_put_stamps_path() {
        let registry = registry();
        registry.put("a1".to_string(), Item::new("Rust docs", "chrome"));

        let item = registry.get(&"a1".to_string()).unwrap();
        assert_eq!(item.base.meta.path, "/tab/a1");
        assert_eq!(item.base.title, "Rust docs");
    }

    #[test]
    fn test_put_overwrites_and_emits() {
        let registry = registry();
        let mut sub = registry.events().subscribe();

        registry.put("a1".to_string(), Item::new("first", "chrome"));
        registry.put("a1".to_string(), Item::new("second", "chrome"));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get(&"a1".to_string()).unwrap().base.title, "second");
        assert_eq!(
            drain(&mut sub),
            vec![Event::new("/tab/", "a1"), Event::new("/tab/", "a1")]
        );
    }

    #[test]
    fn test_numeric_keys() {
        let registry: Registry<u64, Item> = Registry::with_prefix("/window/");
        registry.put(42, Item::new("Terminal", ""));

        assert_eq!(registry.get(&42).unwrap().base.meta.path, "/window/42");
        assert_eq!(registry.get_paths(), vec!["/window/42".to_string()]);
    }

    #[test]
    fn test_remove() {
        let registry = registry();
        registry.put("a1".to_string(), Item::new("x", "chrome"));
        let mut sub = registry.events().subscribe();

        let removed = registry.remove(&"a1".to_string());
        assert!(removed.is_some());
        assert!(registry.get(&"a1".to_string()).is_none());
        assert_eq!(drain(&mut sub), vec![Event::new("/tab/", "a1")]);
    }

    #[test]
    fn test_remove_absent_is_silent() {
        let registry = registry();
        let mut sub = registry.events().subscribe();

        assert!(registry.remove(&"nope".to_string()).is_none());
        assert!(drain(&mut sub).is_empty());
    }

    #[test]
    fn test_replace_drops_only_matching() {
        let registry = registry();
        registry.put("c1".to_string(), Item::new("chrome one", "chrome"));
        registry.put("c2".to_string(), Item::new("chrome two", "chrome"));
        registry.put("f1".to_string(), Item::new("firefox one", "firefox"));
        let mut sub = registry.events().subscribe();

        let mut fresh = HashMap::new();
        fresh.insert("c3".to_string(), Item::new("chrome three", "chrome"));
        registry.replace(fresh, |item| item.owner == "chrome");

        let mut paths = registry.get_paths();
        paths.sort();
        assert_eq!(paths, vec!["/tab/c3".to_string(), "/tab/f1".to_string()]);
        assert_eq!(
            registry.get(&"f1".to_string()).unwrap().base.title,
            "firefox one"
        );
        assert_eq!(drain(&mut sub), vec![Event::bulk("/tab/")]);
    }

    #[test]
    fn test_replace_with_empty_set_clears_slice() {
        let registry = registry();
        registry.put("c1".to_string(), Item::new("chrome one", "chrome"));
        registry.put("f1".to_string(), Item::new("firefox one", "firefox"));

        registry.replace(HashMap::new(), |item| item.owner == "firefox");

        assert_eq!(registry.len(), 1);
        assert!(registry.contains(&"c1".to_string()));
    }

    #[test]
    fn test_replace_all() {
        let registry = registry();
        registry.put("old".to_string(), Item::new("old", "chrome"));
        let mut sub = registry.events().subscribe();

        let mut set = HashMap::new();
        let mut stale = Item::new("new one", "chrome");
        stale.base.meta.path = "/somewhere/else".to_string();
        set.insert("n1".to_string(), stale);
        set.insert("n2".to_string(), Item::new("new two", "chrome"));
        registry.replace_all(set);

        let mut all = registry.get_all();
        all.sort_by(|a, b| a.base.meta.path.cmp(&b.base.meta.path));
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].base.meta.path, "/tab/n1");
        assert_eq!(all[1].base.meta.path, "/tab/n2");
        assert!(registry.get(&"old".to_string()).is_none());
        assert_eq!(drain(&mut sub), vec![Event::bulk("/tab/")]);
    }

    #[test]
    fn test_set_prefix_restamps() {
        let registry: Registry<String, Item> = Registry::new();
        registry.put("x".to_string(), Item::new("x", ""));
        assert_eq!(registry.get_paths(), vec!["x".to_string()]);

        registry.set_prefix("/bookmark/");
        assert_eq!(registry.prefix(), "/bookmark/");
        assert_eq!(registry.get_paths(), vec!["/bookmark/x".to_string()]);
    }

    #[test]
    fn test_get_for_search_skips_omitted() {
        let registry = registry();
        let mut hidden = Item::new("hidden", "chrome");
        hidden.hidden = true;
        registry.put("h".to_string(), hidden);
        registry.put("v".to_string(), Item::new("visible", "chrome"));

        let bases = registry.get_for_search();
        assert_eq!(bases.len(), 1);
        assert_eq!(bases[0].title, "visible");
        assert_eq!(bases[0].meta.path, "/tab/v");
    }

    #[test]
    fn test_post_dispatch() {
        let registry = registry();
        let item = Item::new("x", "chrome");
        let posts = Arc::clone(&item.posts);
        registry.put("x".to_string(), item);

        registry.post(&"x".to_string(), "").unwrap();
        assert_eq!(posts.load(Ordering::Relaxed), 1);

        assert_eq!(
            registry.post(&"x".to_string(), "explode"),
            Err(RegistryError::UnknownAction {
                path: "/tab/x".to_string(),
                action: "explode".to_string(),
            })
        );
        assert_eq!(
            registry.post(&"missing".to_string(), ""),
            Err(RegistryError::NotFound("/tab/missing".to_string()))
        );
    }

    #[test]
    fn test_dispatch_without_capability() {
        let registry: Registry<String, Plain> = Registry::with_prefix("/device/");
        registry.put(
            "bat0".to_string(),
            Plain {
                base: Base::new("Battery", "", "", Kind::Device),
            },
        );

        assert_eq!(
            registry.post(&"bat0".to_string(), ""),
            Err(RegistryError::NotAllowed("/device/bat0".to_string()))
        );
        assert_eq!(
            registry.delete(&"bat0".to_string()),
            Err(RegistryError::NotAllowed("/device/bat0".to_string()))
        );
    }

    #[test]
    fn test_concurrent_readers_never_see_partial_replace() {
        let registry = Arc::new(registry());
        let mut initial = HashMap::new();
        for i in 0..50 {
            initial.insert(format!("a{}", i), Item::new("a", "a"));
        }
        registry.replace_all(initial);

        let writer = {
            let registry = Arc::clone(&registry);
            std::thread::spawn(move || {
                for round in 0..200 {
                    let owner = if round % 2 == 0 { "b" } else { "a" };
                    let mut set = HashMap::new();
                    for i in 0..50 {
                        set.insert(format!("{}{}", owner, i), Item::new(owner, owner));
                    }
                    registry.replace_all(set);
                }
            })
        };

        for _ in 0..200 {
            let all = registry.get_all();
            assert_eq!(all.len(), 50);
            let owner = &all[0].owner;
            assert!(all.iter().all(|item| &item.owner == owner));
        }

        writer.join().unwrap();
    }
}
