//! Loaded-or-not list cache.

/// A cached list that is either not fetched yet or holds the last fetch.
///
/// An empty `Loaded` list is a real answer from the server and is served
/// from cache like any other.
#[derive(Debug, Clone, PartialEq)]
pub enum EntityCache<T> {
    NotLoaded,
    Loaded(Vec<T>),
}

impl<T> Default for EntityCache<T> {
    fn default() -> Self {
        EntityCache::NotLoaded
    }
}

impl<T> EntityCache<T> {
    pub fn get(&self) -> Option<&[T]> {
        match self {
            EntityCache::Loaded(items) => Some(items),
            EntityCache::NotLoaded => None,
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, EntityCache::Loaded(_))
    }

    /// Replaces the cached list.
    pub fn store(&mut self, items: Vec<T>) {
        *self = EntityCache::Loaded(items);
    }

    /// Forgets the cached list so the next read goes to the server.
    pub fn invalidate(&mut self) {
        *self = EntityCache::NotLoaded;
    }
}
