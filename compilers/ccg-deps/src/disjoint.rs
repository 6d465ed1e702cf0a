use std::collections::HashMap;
use std::hash::Hash;

/// Disjoint-set forest with union by rank and path compression.
///
/// Keys never inserted are their own singleton class, so lookups of
/// untouched ids need no bookkeeping.
#[derive(Debug, Clone, Default)]
pub struct DisjointSet<K> {
    parent: HashMap<K, K>,
    rank: HashMap<K, u8>,
}

/// Outcome of `DisjointSet::union`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Merge<K> {
    pub root: K,
    /// The former root that now points at `root`, if two classes merged.
    pub absorbed: Option<K>,
}

impl<K: Copy + Eq + Hash> DisjointSet<K> {
    pub fn new() -> Self {
        Self {
            parent: HashMap::new(),
            rank: HashMap::new(),
        }
    }

    pub fn contains(&self, key: K) -> bool {
        self.parent.contains_key(&key)
    }

    /// Representative of `key`'s class, compressing the path behind it.
    pub fn find(&mut self, key: K) -> K {
        let mut root = key;
        while let Some(&parent) = self.parent.get(&root) {
            if parent == root {
                break;
            }
            root = parent;
        }

        let mut current = key;
        while current != root {
            match self.parent.insert(current, root) {
                Some(next) => current = next,
                None => {
                    // never inserted: singleton, undo the insert
                    self.parent.remove(&current);
                    break;
                }
            }
        }
        root
    }

    /// Representative without mutating the forest.
    pub fn root(&self, key: K) -> K {
        let mut root = key;
        while let Some(&parent) = self.parent.get(&root) {
            if parent == root {
                break;
            }
            root = parent;
        }
        root
    }

    /// Merges the classes of `a` and `b`. On equal rank `a`'s root wins.
    pub fn union(&mut self, a: K, b: K) -> Merge<K> {
        let root_a = self.find(a);
        let root_b = self.find(b);
        self.parent.entry(root_a).or_insert(root_a);
        self.parent.entry(root_b).or_insert(root_b);

        if root_a == root_b {
            return Merge {
                root: root_a,
                absorbed: None,
            };
        }

        let rank_a = self.rank.get(&root_a).copied().unwrap_or(0);
        let rank_b = self.rank.get(&root_b).copied().unwrap_or(0);
        let (root, absorbed) = if rank_a >= rank_b {
            (root_a, root_b)
        } else {
            (root_b, root_a)
        };

        self.parent.insert(absorbed, root);
        if rank_a == rank_b {
            self.rank.insert(root, rank_a.saturating_add(1));
        }
        Merge {
            root,
            absorbed: Some(absorbed),
        }
    }

    /// Points every key straight at its representative.
    pub fn compress(&mut self) {
        let keys: Vec<K> = self.parent.keys().copied().collect();
        for key in keys {
            let root = self.root(key);
            self.parent.insert(key, root);
        }
    }

    pub fn len(&self) -> usize {
        self.parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }
}
