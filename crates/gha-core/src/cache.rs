use std::cell::RefCell;
use std::collections::HashMap;
use std::hash::Hash;

/// Memoizes values by key until [`MemoCache::clear`] is called.
///
/// Single-threaded by construction; stored values are handed out by clone, so
/// `V` is normally an `Arc`.
#[derive(Debug)]
pub struct MemoCache<K, V> {
    entries: RefCell<HashMap<K, V>>,
}

impl<K, V> Default for MemoCache<K, V> {
    fn default() -> Self {
        Self {
            entries: RefCell::new(HashMap::new()),
        }
    }
}

impl<K, V> MemoCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &K) -> Option<V> {
        self.entries.borrow().get(key).cloned()
    }

    /// Returns the stored value for `key`, computing and storing it on a miss.
    /// A failed computation stores nothing.
    pub fn get_or_try_insert_with<E, F>(&self, key: K, compute: F) -> Result<V, E>
    where
        F: FnOnce() -> Result<V, E>,
    {
        if let Some(hit) = self.get(&key) {
            return Ok(hit);
        }
        let value = compute()?;
        self.entries.borrow_mut().insert(key, value.clone());
        Ok(value)
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::sync::Arc;

    use super::MemoCache;

    #[test]
    fn computes_once_per_key() {
        let cache = MemoCache::<&str, Arc<String>>::new();
        let calls = Cell::new(0);

        let compute = || {
            calls.set(calls.get() + 1);
            Ok::<_, ()>(Arc::new(format!("value-{}", calls.get())))
        };

        let first = cache.get_or_try_insert_with("a", compute).expect("first");
        let second = cache.get_or_try_insert_with("a", compute).expect("second");
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(calls.get(), 1);

        let other = cache.get_or_try_insert_with("b", compute).expect("other key");
        assert_eq!(other.as_str(), "value-2");
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn failures_are_not_stored() {
        let cache = MemoCache::<u8, u8>::new();
        let err = cache
            .get_or_try_insert_with(1, || Err::<u8, _>("boom"))
            .expect_err("compute failed");
        assert_eq!(err, "boom");
        assert!(cache.is_empty());

        let value = cache
            .get_or_try_insert_with(1, || Ok::<_, &str>(7))
            .expect("retry succeeds");
        assert_eq!(value, 7);
    }

    #[test]
    fn clear_forces_recompute() {
        let cache = MemoCache::<u8, u8>::new();
        cache.get_or_try_insert_with(1, || Ok::<_, ()>(1)).expect("insert");
        cache.clear();
        assert!(cache.get(&1).is_none());
        let value = cache
            .get_or_try_insert_with(1, || Ok::<_, ()>(2))
            .expect("recompute");
        assert_eq!(value, 2);
    }
}
