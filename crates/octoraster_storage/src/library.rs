use crate::{ImportError, Octree};

use ahash::AHashMap;
use std::borrow::Borrow;
use std::collections::hash_map::Entry;
use std::hash::Hash;
use std::sync::Arc;

/// Shares one imported `Octree` among every object that uses the same asset.
///
/// Loading is all-or-nothing: a failed import inserts nothing, so the library never holds a partial tree.
#[derive(Debug)]
pub struct OctreeLibrary<K = String> {
    octrees: AHashMap<K, Arc<Octree>>,
}

impl<K> Default for OctreeLibrary<K> {
    fn default() -> Self {
        Self {
            octrees: AHashMap::default(),
        }
    }
}

impl<K> OctreeLibrary<K>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached octree for `key`, running `load` only if there is none yet.
    pub fn get_or_load(
        &mut self,
        key: K,
        load: impl FnOnce() -> Result<Octree, ImportError>,
    ) -> Result<Arc<Octree>, ImportError> {
        match self.octrees.entry(key) {
            Entry::Occupied(entry) => Ok(entry.get().clone()),
            Entry::Vacant(entry) => {
                let octree = Arc::new(load()?);

                Ok(entry.insert(octree).clone())
            }
        }
    }

    #[inline]
    pub fn get<Q>(&self, key: &Q) -> Option<&Arc<Octree>>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.octrees.get(key)
    }

    /// Replaces any octree already stored under `key`. Objects keep whichever `Arc` they already hold.
    pub fn insert(&mut self, key: K, octree: Octree) -> Arc<Octree> {
        let octree = Arc::new(octree);
        self.octrees.insert(key, octree.clone());

        octree
    }

    pub fn remove<Q>(&mut self, key: &Q) -> Option<Arc<Octree>>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.octrees.remove(key)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.octrees.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.octrees.is_empty()
    }
}

// ████████╗███████╗███████╗████████╗███████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝
//    ██║   █████╗  ███████╗   ██║   ███████╗
//    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║
//    ██║   ███████╗███████║   ██║   ███████║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝
