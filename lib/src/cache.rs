use crate::constraint::Constraint;
use log::debug;
use std::convert::Infallible;
use std::result::Result;
use std::sync::Mutex;
use std::sync::PoisonError;

/// How a [`ConstraintCache`] treats a constraint list it has not seen before.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum CacheMode {
    /// Every miss recomputes from scratch.
    General,
    /// Constraints are assumed to only ever be added. When the previous list is a subset of the
    /// new one, the miss handler is asked to narrow the previous value with just the new
    /// constraints.
    Monotonic,
}

/// Describes a cache miss to the function that computes the new value.
#[derive(Debug)]
pub enum CacheMiss<'a, V> {
    /// There is no usable previous value; compute from the full source.
    Fresh,
    /// The previous value was computed from a subset of the current constraints. It only needs to
    /// be narrowed by the `added` constraints.
    Narrow {
        previous: &'a V,
        added: Vec<&'a Constraint>,
    },
}

struct CacheEntry<K, V> {
    key: K,
    constraints: Vec<Constraint>,
    value: V,
}

/// Remembers the last constraint list (plus a key, such as a policy) and the value computed for
/// it.
///
/// Lookups and updates happen under one lock, so concurrent callers on the same instance are
/// serialized. The cache only ever memoizes: the value returned is always what the compute
/// function would produce for the given constraints.
pub struct ConstraintCache<K, V> {
    mode: CacheMode,
    last: Mutex<Option<CacheEntry<K, V>>>,
}

impl<K, V> ConstraintCache<K, V>
where
    K: PartialEq + Clone,
    V: Clone,
{
    pub fn new(mode: CacheMode) -> ConstraintCache<K, V> {
        ConstraintCache {
            mode,
            last: Mutex::new(None),
        }
    }

    /// Returns the cached value if `key` and `constraints` match the last call, else computes and
    /// caches a new value.
    pub fn get_or_update<F>(&self, key: &K, constraints: &[Constraint], compute: F) -> V
    where
        F: FnOnce(CacheMiss<'_, V>) -> V,
    {
        match self.try_get_or_update(key, constraints, |miss| {
            Ok::<V, Infallible>(compute(miss))
        }) {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }

    /// Like [`ConstraintCache::get_or_update`], but for computations that can fail. Failures are
    /// not cached.
    pub fn try_get_or_update<F, E>(
        &self,
        key: &K,
        constraints: &[Constraint],
        compute: F,
    ) -> Result<V, E>
    where
        F: FnOnce(CacheMiss<'_, V>) -> Result<V, E>,
    {
        let mut last = self.last.lock().unwrap_or_else(PoisonError::into_inner);
        let value = match last.as_ref() {
            Some(entry) if entry.key == *key && is_same_set(&entry.constraints, constraints) => {
                debug!("Cache hit for {} constraints", constraints.len());
                return Ok(entry.value.clone());
            }
            Some(entry)
                if self.mode == CacheMode::Monotonic
                    && entry.key == *key
                    && is_subset(&entry.constraints, constraints) =>
            {
                let added: Vec<&Constraint> = constraints
                    .iter()
                    .filter(|constraint| !entry.constraints.contains(constraint))
                    .collect();
                debug!(
                    "Narrowing cached value with {} new constraints",
                    added.len()
                );
                compute(CacheMiss::Narrow {
                    previous: &entry.value,
                    added,
                })?
            }
            _ => {
                debug!("Computing value for {} constraints", constraints.len());
                compute(CacheMiss::Fresh)?
            }
        };
        *last = Some(CacheEntry {
            key: key.clone(),
            constraints: constraints.to_vec(),
            value: value.clone(),
        });
        Ok(value)
    }

    /// Forgets the last value.
    pub fn clear(&self) {
        *self.last.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

fn is_subset(smaller: &[Constraint], larger: &[Constraint]) -> bool {
    smaller.iter().all(|constraint| larger.contains(constraint))
}

fn is_same_set(a: &[Constraint], b: &[Constraint]) -> bool {
    a == b || (is_subset(a, b) && is_subset(b, a))
}
