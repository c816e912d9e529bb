//! # Ordered Dictionary
//!
//! The balanced ordered container behind the event queue, the sweep status
//! and the chain-end store. All three need the same operations: ordered
//! insert under a caller-supplied comparator, removal by handle, neighbor
//! queries, and extract-min. That rules out a plain heap (no arbitrary
//! removal) and a `BTreeMap` (the comparators read the event arena, not
//! the key).
//!
//! The implementation is an arena-allocated treap with parent links. Keys
//! are `u32` indices into whatever arena the caller owns; comparators are
//! closures over that arena, passed per call so the borrow of the arena
//! stays outside the dictionary. Priorities come from a splitmix64 counter
//! seeded at construction, so the tree shape (and with it every traversal)
//! is deterministic for a given insertion sequence.

/// Index into [`Dict::nodes`].
pub type NodeIdx = u32;

/// Null handle.
pub const NIL: NodeIdx = u32::MAX;

#[derive(Debug, Clone)]
struct Node {
    key: u32,
    prio: u64,
    left: NodeIdx,
    right: NodeIdx,
    parent: NodeIdx,
}

/// An ordered dictionary of `u32` keys.
///
/// ## Example
///
/// ```rust
/// use poly_bool::dict::Dict;
///
/// let mut d = Dict::new();
/// for key in [3u32, 1, 2] {
///     d.insert_multi(key, |a, b| a.cmp(&b));
/// }
/// assert_eq!(d.extract_min(), Some(1));
/// assert_eq!(d.extract_min(), Some(2));
/// assert_eq!(d.extract_min(), Some(3));
/// assert_eq!(d.extract_min(), None);
/// ```
#[derive(Debug)]
pub struct Dict {
    nodes: Vec<Node>,
    root: NodeIdx,
    free: Vec<NodeIdx>,
    rng: u64,
    len: usize,
}

impl Default for Dict {
    fn default() -> Self {
        Self::new()
    }
}

impl Dict {
    /// Create an empty dictionary.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            root: NIL,
            free: Vec::new(),
            rng: 0x5851_F42D_4C95_7F2D,
            len: 0,
        }
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the dictionary is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root == NIL
    }

    /// Key stored at a handle.
    #[must_use]
    pub fn key(&self, node: NodeIdx) -> u32 {
        self.nodes[node as usize].key
    }

    /// Insert a key; equal keys land after their equals (duplicates
    /// allowed). Returns the new handle.
    ///
    /// The comparator is called as `cmp(inserted_key, existing_key)`.
    pub fn insert_multi(
        &mut self,
        key: u32,
        mut cmp: impl FnMut(u32, u32) -> std::cmp::Ordering,
    ) -> NodeIdx {
        self.insert_impl(key, &mut cmp, true)
            .expect("insert_multi never rejects")
    }

    /// Insert a key unless an equal key exists; on conflict nothing is
    /// inserted and the existing handle is returned as `Err`.
    ///
    /// The comparator is called as `cmp(inserted_key, existing_key)`.
    pub fn insert_unique(
        &mut self,
        key: u32,
        mut cmp: impl FnMut(u32, u32) -> std::cmp::Ordering,
    ) -> Result<NodeIdx, NodeIdx> {
        self.insert_impl(key, &mut cmp, false)
    }

    fn insert_impl(
        &mut self,
        key: u32,
        cmp: &mut dyn FnMut(u32, u32) -> std::cmp::Ordering,
        dup: bool,
    ) -> Result<NodeIdx, NodeIdx> {
        use std::cmp::Ordering;

        // find attachment point
        let mut parent = NIL;
        let mut cur = self.root;
        let mut go_right = false;
        while cur != NIL {
            let ord = cmp(key, self.nodes[cur as usize].key);
            match ord {
                Ordering::Equal if !dup => return Err(cur),
                Ordering::Less => {
                    parent = cur;
                    go_right = false;
                    cur = self.nodes[cur as usize].left;
                }
                _ => {
                    parent = cur;
                    go_right = true;
                    cur = self.nodes[cur as usize].right;
                }
            }
        }

        let node = self.alloc(key, parent);
        if parent == NIL {
            self.root = node;
        } else if go_right {
            self.nodes[parent as usize].right = node;
        } else {
            self.nodes[parent as usize].left = node;
        }

        // restore the heap property on priorities
        while self.nodes[node as usize].parent != NIL {
            let p = self.nodes[node as usize].parent;
            if self.nodes[p as usize].prio <= self.nodes[node as usize].prio {
                break;
            }
            self.rotate_up(node);
        }

        self.len += 1;
        Ok(node)
    }

    /// Remove an entry by handle.
    pub fn remove(&mut self, node: NodeIdx) {
        // rotate down to a leaf, preferring the lower-priority child
        loop {
            let n = &self.nodes[node as usize];
            let (l, r) = (n.left, n.right);
            let child = match (l, r) {
                (NIL, NIL) => break,
                (l, NIL) => l,
                (NIL, r) => r,
                (l, r) => {
                    if self.nodes[l as usize].prio < self.nodes[r as usize].prio {
                        l
                    } else {
                        r
                    }
                }
            };
            self.rotate_up(child);
        }
        // detach the leaf
        let parent = self.nodes[node as usize].parent;
        if parent == NIL {
            self.root = NIL;
        } else if self.nodes[parent as usize].left == node {
            self.nodes[parent as usize].left = NIL;
        } else {
            self.nodes[parent as usize].right = NIL;
        }
        self.release(node);
        self.len -= 1;
    }

    /// Handle of the smallest entry, or [`NIL`].
    #[must_use]
    pub fn min(&self) -> NodeIdx {
        if self.root == NIL {
            return NIL;
        }
        let mut cur = self.root;
        while self.nodes[cur as usize].left != NIL {
            cur = self.nodes[cur as usize].left;
        }
        cur
    }

    /// Remove and return the smallest key.
    pub fn extract_min(&mut self) -> Option<u32> {
        let node = self.min();
        if node == NIL {
            return None;
        }
        let key = self.key(node);
        self.remove(node);
        Some(key)
    }

    /// In-order successor handle, or [`NIL`].
    #[must_use]
    pub fn next(&self, node: NodeIdx) -> NodeIdx {
        let right = self.nodes[node as usize].right;
        if right != NIL {
            let mut cur = right;
            while self.nodes[cur as usize].left != NIL {
                cur = self.nodes[cur as usize].left;
            }
            return cur;
        }
        let mut cur = node;
        let mut parent = self.nodes[cur as usize].parent;
        while parent != NIL && self.nodes[parent as usize].right == cur {
            cur = parent;
            parent = self.nodes[cur as usize].parent;
        }
        parent
    }

    /// In-order predecessor handle, or [`NIL`].
    #[must_use]
    pub fn prev(&self, node: NodeIdx) -> NodeIdx {
        let left = self.nodes[node as usize].left;
        if left != NIL {
            let mut cur = left;
            while self.nodes[cur as usize].right != NIL {
                cur = self.nodes[cur as usize].right;
            }
            return cur;
        }
        let mut cur = node;
        let mut parent = self.nodes[cur as usize].parent;
        while parent != NIL && self.nodes[parent as usize].left == cur {
            cur = parent;
            parent = self.nodes[cur as usize].parent;
        }
        parent
    }

    // -------------------------------------------------------------------------
    // internals
    // -------------------------------------------------------------------------

    fn alloc(&mut self, key: u32, parent: NodeIdx) -> NodeIdx {
        let prio = self.next_prio();
        let node = Node {
            key,
            prio,
            left: NIL,
            right: NIL,
            parent,
        };
        if let Some(idx) = self.free.pop() {
            self.nodes[idx as usize] = node;
            idx
        } else {
            self.nodes.push(node);
            (self.nodes.len() - 1) as NodeIdx
        }
    }

    fn release(&mut self, node: NodeIdx) {
        self.free.push(node);
    }

    fn next_prio(&mut self) -> u64 {
        // splitmix64; fixed seed keeps tree shapes reproducible
        self.rng = self.rng.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.rng;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Rotate `node` one level up, keeping order and parent links intact.
    fn rotate_up(&mut self, node: NodeIdx) {
        let parent = self.nodes[node as usize].parent;
        debug_assert_ne!(parent, NIL);
        let grand = self.nodes[parent as usize].parent;

        if self.nodes[parent as usize].left == node {
            // right rotation
            let b = self.nodes[node as usize].right;
            self.nodes[parent as usize].left = b;
            if b != NIL {
                self.nodes[b as usize].parent = parent;
            }
            self.nodes[node as usize].right = parent;
        } else {
            // left rotation
            let b = self.nodes[node as usize].left;
            self.nodes[parent as usize].right = b;
            if b != NIL {
                self.nodes[b as usize].parent = parent;
            }
            self.nodes[node as usize].left = parent;
        }
        self.nodes[parent as usize].parent = node;
        self.nodes[node as usize].parent = grand;

        if grand == NIL {
            self.root = node;
        } else if self.nodes[grand as usize].left == parent {
            self.nodes[grand as usize].left = node;
        } else {
            self.nodes[grand as usize].right = node;
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(d: &mut Dict) -> Vec<u32> {
        let mut out = Vec::new();
        while let Some(k) = d.extract_min() {
            out.push(k);
        }
        out
    }

    #[test]
    fn extracts_in_sorted_order() {
        let mut d = Dict::new();
        for key in [5u32, 1, 4, 2, 3, 0, 9, 7, 8, 6] {
            d.insert_multi(key, |a, b| a.cmp(&b));
        }
        assert_eq!(drain(&mut d), (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn remove_by_handle_keeps_order() {
        let mut d = Dict::new();
        let mut handles = Vec::new();
        for key in 0..16u32 {
            handles.push(d.insert_multi(key, |a, b| a.cmp(&b)));
        }
        for &h in handles.iter().step_by(2) {
            d.remove(h);
        }
        assert_eq!(drain(&mut d), vec![1, 3, 5, 7, 9, 11, 13, 15]);
    }

    #[test]
    fn unique_insert_reports_conflicts() {
        let mut d = Dict::new();
        let first = d.insert_unique(7, |a, b| a.cmp(&b)).unwrap();
        let second = d.insert_unique(7, |a, b| a.cmp(&b));
        assert_eq!(second, Err(first));
        assert_eq!(d.len(), 1);
    }

    #[test]
    fn neighbors_walk_in_order() {
        let mut d = Dict::new();
        for key in [4u32, 2, 6, 1, 3, 5, 7] {
            d.insert_multi(key, |a, b| a.cmp(&b));
        }
        let mut cur = d.min();
        let mut last = NIL;
        let mut seen = Vec::new();
        while cur != NIL {
            seen.push(d.key(cur));
            last = cur;
            cur = d.next(cur);
        }
        assert_eq!(seen, vec![1, 2, 3, 4, 5, 6, 7]);

        let mut back = Vec::new();
        let mut cur = last;
        while cur != NIL {
            back.push(d.key(cur));
            cur = d.prev(cur);
        }
        assert_eq!(back, vec![7, 6, 5, 4, 3, 2, 1]);
    }

    #[test]
    fn duplicate_keys_all_survive() {
        let mut d = Dict::new();
        // identical compare ranks: insertion order decides
        for key in [1u32, 1, 1, 0] {
            d.insert_multi(key, |a, b| a.cmp(&b));
        }
        assert_eq!(drain(&mut d), vec![0, 1, 1, 1]);
    }

    #[test]
    fn tree_shape_is_deterministic() {
        let build = || {
            let mut d = Dict::new();
            for key in (0..64u32).rev() {
                d.insert_multi(key, |a, b| a.cmp(&b));
            }
            drain(&mut d)
        };
        assert_eq!(build(), build());
    }

    #[test]
    fn handles_survive_interleaved_churn() {
        let mut d = Dict::new();
        let h3 = d.insert_multi(3, |a, b| a.cmp(&b));
        let _h1 = d.insert_multi(1, |a, b| a.cmp(&b));
        let h2 = d.insert_multi(2, |a, b| a.cmp(&b));
        d.remove(h3);
        let _h4 = d.insert_multi(4, |a, b| a.cmp(&b));
        d.remove(h2);
        assert_eq!(drain(&mut d), vec![1, 4]);
    }
}
