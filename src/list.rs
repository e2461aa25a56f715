// model = "claude-opus-4-5"
// created = "2026-08-01"
// modified = "2026-08-02"
// driver = "Isaac Clayton"

//! Indexable skip list
//!
//! A sequence container addressed by position, like a `Vec`, but with
//! O(log n) insertion and removal at arbitrary indices. Elements live on the
//! densest level of a multi-level linked structure; each node on a sparser
//! level records the number of base positions to its successor, so finding
//! position i is a descent that sums distances instead of a linear walk.
//!
//! # Structure
//!
//! All nodes live in an arena (`Vec<Node<T>>`) and link to each other with
//! `u32` handles. There is no sentinel head: the root is the tower of the
//! element at position 0, which always spans every level.
//!
//! ```text
//! level 2:  a[5] ----------------------------> f[.]
//! level 1:  a[2] --------> c[3] ------------> f[.]
//! level 0:  a -> b -> c -> d -> e -> f
//! ```
//!
//! `x[d]` is a sparser node whose distance to its successor is d; `[.]` is a
//! node with no successor, whose distance slot is meaningless.
//!
//! # Access cache
//!
//! The list remembers the descent path of the last positional access and
//! reuses it for any later access at an equal or larger index. Iterating by
//! index with a stride therefore costs about one link hop per visited
//! element rather than a full descent, without the list having to hand out
//! an iterator object. The cache is invalidated by any mutation at or
//! before the cached position. It lives in a `RefCell`, which is also why
//! the container is deliberately `!Sync`: even reads are stateful.
//!
//! # Building
//!
//! `push_front` is the fastest way to build a list: it runs in constant
//! time by handing the full-height root tower to the new element and
//! re-drawing a level count for the element it displaces. `push_back` is
//! constant amortized thanks to the cache. For sequences that stay short,
//! plain `Vec` insertion is faster in practice; the crossover for
//! mid-sequence mutation is around a few thousand elements.

use std::cell::RefCell;
use std::fmt;
use std::mem::MaybeUninit;
use std::ops;

use rand_pcg::Pcg32;

use crate::levels::{estimate_levels, sample_levels, MAX_LEVELS};

/// Node handle. u32 halves the link footprint vs usize on 64-bit.
type Idx = u32;

/// Null handle marker.
const NIL: Idx = Idx::MAX;

/// Positions below this are found faster by plain descent than through the
/// cache, so they are not cached.
const MIN_CACHED_INDEX: usize = 8;

/// A node on one level of the skip list.
///
/// `elem` is initialized exactly when the node is live on the densest level
/// (`down == NIL`). On sparser levels the payload is `dist`, the number of
/// densest-level positions to the successor on the same level; it is stale
/// whenever `next == NIL`.
struct Node<T> {
    elem: MaybeUninit<T>,
    dist: usize,
    next: Idx,
    down: Idx,
}

/// Descent path of the most recent positional access.
///
/// `prevs[k]` is the last node visited on level k (sparsest first) before
/// dropping down, and `prev_indices[k]` its base position. A later search
/// for any position >= `index` may start from `prevs[0]` instead of the
/// root.
struct IndexCache {
    index: Option<usize>,
    prevs: Vec<Idx>,
    prev_indices: Vec<usize>,
}

impl IndexCache {
    fn new() -> IndexCache {
        IndexCache {
            index: None,
            prevs: Vec::new(),
            prev_indices: Vec::new(),
        }
    }

    fn invalidate(&mut self) {
        self.index = None;
        self.prevs.clear();
        self.prev_indices.clear();
    }
}

/// An indexable skip list.
///
/// The API mirrors the positional slice of `Vec`: bounds-violating indices
/// panic, and `get`/`get_mut` are the non-panicking variants. Mutating
/// operations take `&mut self`; shared reads update the internal access
/// cache, so the type is not `Sync`.
pub struct SkipVec<T> {
    nodes: Vec<Node<T>>,
    free_list: Vec<Idx>,
    /// Head of the sparsest level; the position-0 tower. NIL iff empty.
    root: Idx,
    /// Number of levels above the densest.
    n_levels: usize,
    len: usize,
    /// None until seeded, either explicitly or lazily on first use.
    rand: Option<Pcg32>,
    cache: RefCell<IndexCache>,
}

impl<T> SkipVec<T> {
    pub fn new() -> SkipVec<T> {
        SkipVec {
            nodes: Vec::new(),
            free_list: Vec::new(),
            root: NIL,
            n_levels: 0,
            len: 0,
            rand: None,
            cache: RefCell::new(IndexCache::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Seed the level generator. If called at all, this should be called
    /// before the first operation on the list; otherwise the generator
    /// seeds itself lazily from thread-local entropy. The low bit of
    /// `state` is forced on (the generator state must be odd).
    pub fn seed(&mut self, state: u64, stream: u64) {
        self.rand = Some(Pcg32::new(state | 1, stream));
    }

    /// Copy the generator state from another list. Like [`SkipVec::seed`],
    /// only meaningful immediately after creation.
    pub fn seed_from(&mut self, other: &SkipVec<T>) {
        self.rand = other.rand.clone();
    }

    fn rng(&mut self) -> &mut Pcg32 {
        self.rand
            .get_or_insert_with(|| Pcg32::new(rand::random::<u64>() | 1, rand::random()))
    }

    // --- Arena ---

    fn node(&self, idx: Idx) -> &Node<T> {
        &self.nodes[idx as usize]
    }

    fn node_mut(&mut self, idx: Idx) -> &mut Node<T> {
        &mut self.nodes[idx as usize]
    }

    fn alloc(&mut self, node: Node<T>) -> Idx {
        if let Some(idx) = self.free_list.pop() {
            self.nodes[idx as usize] = node;
            idx
        } else {
            let idx = self.nodes.len() as Idx;
            self.nodes.push(node);
            idx
        }
    }

    /// Return a slot to the free list. The payload, if any, must already
    /// have been moved out or dropped.
    fn free_slot(&mut self, idx: Idx) {
        self.free_list.push(idx);
    }

    fn densest_head(&self) -> Idx {
        let mut idx = self.root;
        while self.node(idx).down != NIL {
            idx = self.node(idx).down;
        }
        idx
    }

    // --- Descent ---

    /// Walk from `idx` to the densest-level node `offset` base positions
    /// further on, descending as the distances allow.
    fn descend(&self, mut idx: Idx, mut offset: usize) -> Idx {
        loop {
            let node = self.node(idx);
            if node.down == NIL {
                break;
            }
            if node.next != NIL && offset >= node.dist {
                offset -= node.dist;
                idx = node.next;
            } else {
                idx = node.down;
            }
        }
        for _ in 0..offset {
            idx = self.node(idx).next;
        }
        idx
    }

    /// Like [`SkipVec::descend`], but records, for every level above the
    /// densest, the last node visited before dropping down and its base
    /// position. `prevs` and `prev_indices` must hold `n_levels` entries.
    fn descend_recorded(
        &self,
        mut idx: Idx,
        target: usize,
        prevs: &mut [Idx],
        prev_indices: &mut [usize],
    ) -> Idx {
        let mut level = 0;
        let mut pos = 0;
        loop {
            let node = self.node(idx);
            if node.down == NIL {
                break;
            }
            prevs[level] = idx;
            prev_indices[level] = pos;
            if node.next != NIL && target - pos >= node.dist {
                pos += node.dist;
                idx = node.next;
            } else {
                idx = node.down;
                level += 1;
            }
        }
        while pos < target {
            pos += 1;
            idx = self.node(idx).next;
        }
        idx
    }

    /// Recording descent seeded from the cache when the cache covers a
    /// position at or before the target.
    fn descend_cached(
        &self,
        target: usize,
        prevs: &mut [Idx],
        prev_indices: &mut [usize],
    ) -> Idx {
        let seed = {
            let cache = self.cache.borrow();
            if cache.index.is_some_and(|ci| ci <= target) && !cache.prevs.is_empty() {
                Some((cache.prevs[0], cache.prev_indices[0]))
            } else {
                None
            }
        };
        match seed {
            Some((start, start_pos)) => {
                let node =
                    self.descend_recorded(start, target - start_pos, prevs, prev_indices);
                for pi in prev_indices.iter_mut() {
                    *pi += start_pos;
                }
                node
            }
            None => self.descend_recorded(self.root, target, prevs, prev_indices),
        }
    }

    fn store_cache(&self, index: usize, prevs: &[Idx], prev_indices: &[usize]) {
        let mut cache = self.cache.borrow_mut();
        cache.prevs.resize(prevs.len(), NIL);
        cache.prev_indices.resize(prev_indices.len(), 0);
        cache.prevs.copy_from_slice(prevs);
        cache.prev_indices.copy_from_slice(prev_indices);
        cache.index = Some(index);
    }

    /// Find the densest-level node at position `i`, going through the
    /// cache for indices large enough to be worth it. Caller checks
    /// bounds.
    fn locate(&self, i: usize) -> Idx {
        if i < MIN_CACHED_INDEX {
            return self.descend(self.root, i);
        }

        // Fixed-size so the path arrays stay on the stack.
        let nl = self.n_levels;
        let mut prevs = [NIL; MAX_LEVELS];
        let mut prev_indices = [0usize; MAX_LEVELS];
        let node = self.descend_cached(i, &mut prevs[..nl], &mut prev_indices[..nl]);
        self.store_cache(i, &prevs[..nl], &prev_indices[..nl]);
        node
    }

    // --- Accessors ---

    pub fn get(&self, i: usize) -> Option<&T> {
        if i >= self.len {
            return None;
        }
        let idx = self.locate(i);
        Some(unsafe { self.node(idx).elem.assume_init_ref() })
    }

    pub fn get_mut(&mut self, i: usize) -> Option<&mut T> {
        if i >= self.len {
            return None;
        }
        let idx = self.locate(i);
        Some(unsafe { self.nodes[idx as usize].elem.assume_init_mut() })
    }

    pub fn first(&self) -> Option<&T> {
        self.get(0)
    }

    pub fn last(&self) -> Option<&T> {
        if self.len == 0 {
            return None;
        }
        self.get(self.len - 1)
    }

    /// Overwrite the element at index `i`.
    pub fn set(&mut self, i: usize, value: T) {
        assert!(i < self.len, "index {} out of bounds (len {})", i, self.len);
        let idx = self.locate(i);
        unsafe { *self.nodes[idx as usize].elem.assume_init_mut() = value };
    }

    /// Apply `f` to the element at index `i` in place.
    pub fn update<F: FnOnce(&mut T)>(&mut self, i: usize, f: F) {
        assert!(i < self.len, "index {} out of bounds (len {})", i, self.len);
        let idx = self.locate(i);
        f(unsafe { self.nodes[idx as usize].elem.assume_init_mut() });
    }

    // --- Insertion ---

    /// Insert `elem` before position `index`, or at the end when `index`
    /// equals the length.
    pub fn insert(&mut self, index: usize, elem: T) {
        assert!(
            index <= self.len,
            "index {} out of bounds (len {})",
            index,
            self.len
        );

        let cache = self.cache.get_mut();
        if cache.index.is_some_and(|ci| ci >= index) {
            cache.invalidate();
        }

        if index == 0 {
            self.insert_first(elem);
            self.len += 1;
            return;
        }

        let nl = self.n_levels;
        let mut prevs = [NIL; MAX_LEVELS];
        let mut prev_indices = [0usize; MAX_LEVELS];
        let node = self.descend_cached(index - 1, &mut prevs[..nl], &mut prev_indices[..nl]);
        if index - 1 >= MIN_CACHED_INDEX {
            self.store_cache(index - 1, &prevs[..nl], &prev_indices[..nl]);
        }

        let fresh = self.alloc(Node {
            elem: MaybeUninit::new(elem),
            dist: 0,
            next: self.node(node).next,
            down: NIL,
        });
        self.node_mut(node).next = fresh;

        let drawn = sample_levels(self.rng());
        let mut above = fresh;
        let mut prev_i = nl as isize - 1;
        let mut level = 1;
        while level < MAX_LEVELS && level <= drawn {
            let prev = if prev_i >= 0 {
                let p = prevs[prev_i as usize];
                prev_i -= 1;
                Some(p)
            } else {
                None
            };
            above = self.add_level(prev, above, level, index);
            level += 1;
        }

        // Levels above the new tower: the covering span gained one
        // position.
        while prev_i >= 0 {
            self.node_mut(prevs[prev_i as usize]).dist += 1;
            prev_i -= 1;
        }

        self.len += 1;
    }

    pub fn push_front(&mut self, elem: T) {
        self.insert_first(elem);
        self.len += 1;
    }

    pub fn push_back(&mut self, elem: T) {
        self.insert(self.len, elem);
    }

    pub fn pop_front(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        Some(self.remove(0))
    }

    pub fn pop_back(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        Some(self.remove(self.len - 1))
    }

    /// Prepend without disturbing the level distribution.
    ///
    /// The first element must carry the full root tower. If every prepended
    /// element kept a full tower, repeated prepending would make every node
    /// maximal and descents linear. So the new element takes over the root
    /// tower and the displaced element re-draws its level count, as if it
    /// had just been inserted behind an old root.
    fn insert_first(&mut self, elem: T) {
        self.cache.get_mut().invalidate();

        if self.len == 0 {
            self.root = self.alloc(Node {
                elem: MaybeUninit::new(elem),
                dist: 0,
                next: NIL,
                down: NIL,
            });
            return;
        }

        // A fresh tower for the new first element, one node per level,
        // sparsest on top.
        let mut top = self.alloc(Node {
            elem: MaybeUninit::uninit(),
            dist: 0,
            next: NIL,
            down: NIL,
        });
        for _ in 0..self.n_levels {
            top = self.alloc(Node {
                elem: MaybeUninit::uninit(),
                dist: 0,
                next: NIL,
                down: top,
            });
        }

        let promoted = sample_levels(self.rng());

        let mut old = self.root;
        let mut new = top;
        // Levels the displaced root loses: the new head absorbs the old
        // head's span, one position longer.
        for _ in 0..self.n_levels.saturating_sub(promoted) {
            let (old_next, old_dist, old_down) = {
                let o = self.node(old);
                (o.next, o.dist, o.down)
            };
            {
                let n = self.node_mut(new);
                n.next = old_next;
                n.dist = old_dist + 1;
            }
            self.free_slot(old);
            old = old_down;
            new = self.node(new).down;
        }
        // Levels the displaced root keeps: it sits at position 1 now.
        while self.node(new).down != NIL {
            let old_down = self.node(old).down;
            {
                let n = self.node_mut(new);
                n.next = old;
                n.dist = 1;
            }
            old = old_down;
            new = self.node(new).down;
        }
        self.node_mut(new).next = old;
        self.node_mut(new).elem = MaybeUninit::new(elem);

        self.root = top;

        if promoted > self.n_levels {
            let grow = promoted - self.n_levels;
            self.grow_root(grow);
            self.n_levels += grow;
        }
    }

    /// Clone the tower of `node` one level up, splicing it after `prev`
    /// (or after the root when the level has no other node yet) and fixing
    /// the distances on either side. Grows the root tower first if the
    /// level does not exist yet. Returns the new top of the tower.
    fn add_level(&mut self, prev: Option<Idx>, node: Idx, level: usize, index: usize) -> Idx {
        if level > self.n_levels {
            self.cache.get_mut().invalidate();
            self.grow_root(level - self.n_levels);
            self.n_levels = level;
        }

        let clone = self.alloc(Node {
            elem: MaybeUninit::uninit(),
            dist: 0,
            next: NIL,
            down: node,
        });

        match prev {
            None => {
                let root = self.root;
                self.node_mut(root).next = clone;
                self.node_mut(root).dist = index;
            }
            Some(prev) => {
                let old_next = self.node(prev).next;
                let old_dist = self.node(prev).dist;
                self.node_mut(clone).next = old_next;
                self.node_mut(prev).next = clone;

                let d = self.span_between(self.node(prev).down, node);
                if old_next != NIL {
                    self.node_mut(clone).dist = old_dist - d + 1;
                }
                self.node_mut(prev).dist = d;
            }
        }

        clone
    }

    /// Base positions from `from` to `to`, both on the same level, walked
    /// on that level.
    fn span_between(&self, from: Idx, to: Idx) -> usize {
        let mut d = 0;
        let mut idx = from;
        while idx != to {
            let node = self.node(idx);
            d += if node.down == NIL { 1 } else { node.dist };
            if node.next == NIL {
                panic!("span walk ran past the end of a level");
            }
            idx = node.next;
        }
        d
    }

    /// Add `n` levels on top of the root tower. The current root node
    /// stays the top so that outstanding handles to it keep working; its
    /// old contents move into a clone one level down.
    fn grow_root(&mut self, n: usize) {
        for _ in 0..n {
            let root = self.root;
            let (next, down, dist) = {
                let r = self.node(root);
                (r.next, r.down, r.dist)
            };
            let elem = std::mem::replace(&mut self.node_mut(root).elem, MaybeUninit::uninit());
            let clone = self.alloc(Node { elem, dist, next, down });
            let r = self.node_mut(root);
            r.down = clone;
            r.next = NIL;
            // r.dist is stale, which is fine without a successor.
        }
    }

    // --- Removal ---

    /// Remove and return the element at `index`.
    pub fn remove(&mut self, index: usize) -> T {
        assert!(
            index < self.len,
            "index {} out of bounds (len {})",
            index,
            self.len
        );

        let cache = self.cache.get_mut();
        if cache.index.is_some_and(|ci| ci >= index) {
            cache.invalidate();
        }

        if self.len == 1 {
            let head = self.densest_head();
            let elem = unsafe { self.node(head).elem.assume_init_read() };
            self.nodes.clear();
            self.free_list.clear();
            self.root = NIL;
            self.n_levels = 0;
            self.len = 0;
            return elem;
        }

        if index == 0 {
            let elem = self.remove_first();
            self.len -= 1;
            return elem;
        }

        let nl = self.n_levels;
        let mut prevs = [NIL; MAX_LEVELS];
        let mut prev_indices = [0usize; MAX_LEVELS];
        let node =
            self.descend_recorded(self.root, index - 1, &mut prevs[..nl], &mut prev_indices[..nl]);

        let removed = self.node(node).next;
        let elem = unsafe { self.node(removed).elem.assume_init_read() };
        self.unlink(node, index, &prevs[..nl], &prev_indices[..nl]);
        self.len -= 1;
        self.store_cache(index - 1, &prevs[..nl], &prev_indices[..nl]);
        elem
    }

    /// Unlink the densest-level successor of `node` (the element at
    /// `index`) and every sparser clone of it, repairing distances. The
    /// payload must already have been read out.
    fn unlink(&mut self, node: Idx, index: usize, prevs: &[Idx], prev_indices: &[usize]) {
        let removed = self.node(node).next;
        let after = self.node(removed).next;
        self.node_mut(node).next = after;
        self.free_slot(removed);

        for k in (0..prevs.len()).rev() {
            let prev = prevs[k];
            let pi = prev_indices[k];
            if self.node(prev).next == NIL {
                continue;
            }
            let d = self.node(prev).dist;
            if index == d + pi {
                // The successor is the removed element's clone on this
                // level: link past it and merge the spans.
                let clone = self.node(prev).next;
                let (clone_next, clone_dist) = {
                    let c = self.node(clone);
                    (c.next, c.dist)
                };
                let p = self.node_mut(prev);
                p.dist = clone_dist + d - 1;
                p.next = clone_next;
                self.free_slot(clone);
            } else if index < d + pi {
                // The span covers the removed position and shrinks by one.
                self.node_mut(prev).dist = d - 1;
            } else {
                panic!("removal at {} outside the recorded span", index);
            }
        }
    }

    /// Remove the head element of a list of length >= 2. The tower at
    /// position 1 is raised to full height and becomes the new root.
    fn remove_first(&mut self) -> T {
        // Root levels whose only member is the departing head disappear.
        while self.node(self.root).next == NIL && self.node(self.root).down != NIL {
            let down = self.node(self.root).down;
            self.free_slot(self.root);
            self.root = down;
            self.n_levels -= 1;
        }

        let mut prev = NIL;
        let mut new_root = NIL;
        let mut n = self.root;
        while self.node(n).down != NIL {
            let (dist, next, down) = {
                let node = self.node(n);
                (node.dist, node.next, node.down)
            };
            // If the head's span is longer than one, the element at
            // position 1 has no presence on this level yet and gets a
            // spliced node carrying the remaining distance.
            let successor = if dist > 1 {
                self.alloc(Node {
                    elem: MaybeUninit::uninit(),
                    dist: dist - 1,
                    next,
                    down: NIL,
                })
            } else {
                next
            };
            if prev == NIL {
                new_root = successor;
            } else {
                self.node_mut(prev).down = successor;
            }
            prev = successor;
            self.free_slot(n);
            n = down;
        }

        let next = self.node(n).next;
        if prev == NIL {
            new_root = next;
        } else {
            self.node_mut(prev).down = next;
        }
        let elem = unsafe { self.node(n).elem.assume_init_read() };
        self.free_slot(n);
        self.root = new_root;
        elem
    }

    /// Keep the first `n` elements. A no-op when `n` equals the length;
    /// equivalent to [`SkipVec::clear`] when `n` is zero. After cutting,
    /// the level count is re-estimated for the new length and excess
    /// sparse levels are dropped.
    pub fn truncate(&mut self, n: usize) {
        assert!(n <= self.len, "index {} out of bounds (len {})", n, self.len);
        if n == self.len {
            return;
        }
        if n == 0 {
            self.clear();
            return;
        }

        let cache = self.cache.get_mut();
        if cache.index.is_some_and(|ci| ci >= n) {
            cache.invalidate();
        }

        let nl = self.n_levels;
        let mut prevs = [NIL; MAX_LEVELS];
        let mut prev_indices = [0usize; MAX_LEVELS];
        let node = self.descend_cached(n - 1, &mut prevs[..nl], &mut prev_indices[..nl]);

        let tail = self.node(node).next;
        self.node_mut(node).next = NIL;
        self.free_dense_chain(tail);
        for &prev in &prevs[..nl] {
            let tail = self.node(prev).next;
            self.node_mut(prev).next = NIL;
            self.free_sparse_chain(tail);
        }

        self.len = n;

        let estimated = estimate_levels(self.rng(), n);
        if estimated < self.n_levels {
            self.drop_levels(self.n_levels - estimated);
        }
    }

    /// Drop the `n` sparsest levels, freeing their chains. The cached
    /// descent path loses the same number of leading entries so it keeps
    /// matching the level numbering.
    fn drop_levels(&mut self, n: usize) {
        for _ in 0..n {
            let down = self.node(self.root).down;
            self.free_sparse_chain(self.root);
            self.root = down;
        }
        self.n_levels -= n;

        let cache = self.cache.get_mut();
        if cache.index.is_some() {
            let k = n.min(cache.prevs.len());
            cache.prevs.drain(..k);
            cache.prev_indices.drain(..k);
        }
    }

    /// Free a severed densest-level chain, dropping the payloads.
    fn free_dense_chain(&mut self, mut idx: Idx) {
        while idx != NIL {
            let next = self.node(idx).next;
            unsafe { self.nodes[idx as usize].elem.assume_init_drop() };
            self.free_slot(idx);
            idx = next;
        }
    }

    /// Free a severed sparser-level chain. No payloads to drop.
    fn free_sparse_chain(&mut self, mut idx: Idx) {
        while idx != NIL {
            let next = self.node(idx).next;
            self.free_slot(idx);
            idx = next;
        }
    }

    /// Exchange the elements at `i1` and `i2`. The node structure and all
    /// distances are untouched.
    pub fn swap(&mut self, i1: usize, i2: usize) {
        assert!(i1 < self.len, "index {} out of bounds (len {})", i1, self.len);
        assert!(i2 < self.len, "index {} out of bounds (len {})", i2, self.len);
        if i1 == i2 {
            return;
        }
        let (i1, i2) = if i1 < i2 { (i1, i2) } else { (i2, i1) };

        let nl = self.n_levels;
        let mut prevs = [NIL; MAX_LEVELS];
        let mut prev_indices = [0usize; MAX_LEVELS];
        let node1 = self.descend_recorded(self.root, i1, &mut prevs[..nl], &mut prev_indices[..nl]);
        if i1 >= MIN_CACHED_INDEX {
            self.store_cache(i1, &prevs[..nl], &prev_indices[..nl]);
        }

        let (start, offset) = if nl > 0 {
            (prevs[0], prev_indices[0])
        } else {
            (self.root, 0)
        };
        let node2 = self.descend(start, i2 - offset);

        // Distinct positions mean distinct slots, so the arena can be
        // split around the higher one.
        let (lo, hi) = if node1 < node2 {
            (node1 as usize, node2 as usize)
        } else {
            (node2 as usize, node1 as usize)
        };
        let (left, right) = self.nodes.split_at_mut(hi);
        std::mem::swap(&mut left[lo].elem, &mut right[0].elem);
    }

    /// Empty the list. Afterwards it behaves like a freshly created one,
    /// except that the generator state is kept.
    pub fn clear(&mut self) {
        if self.root != NIL {
            let mut idx = self.densest_head();
            while idx != NIL {
                let next = self.node(idx).next;
                unsafe { self.nodes[idx as usize].elem.assume_init_drop() };
                idx = next;
            }
        }
        self.nodes.clear();
        self.free_list.clear();
        self.root = NIL;
        self.n_levels = 0;
        self.len = 0;
        self.cache.get_mut().invalidate();
    }

    // --- Iteration ---

    /// Visit elements of `[from, to)` in order until `f` returns false.
    /// Bounds are permissive: `from` and `to` may equal the length, and an
    /// empty range is a no-op that does not even search for a node.
    pub fn iterate_range<F: FnMut(&mut T) -> bool>(&mut self, from: usize, to: usize, mut f: F) {
        self.iterate_range_i(from, to, |_, elem| f(elem));
    }

    /// Like [`SkipVec::iterate_range`], with the element index passed to
    /// the visitor.
    pub fn iterate_range_i<F: FnMut(usize, &mut T) -> bool>(&mut self, from: usize, to: usize, mut f: F) {
        assert!(from <= self.len, "index {} out of bounds (len {})", from, self.len);
        assert!(to <= self.len, "index {} out of bounds (len {})", to, self.len);
        if to <= from {
            return;
        }

        let mut idx = self.locate(from);
        for i in from..to {
            let keep_going = f(i, unsafe { self.nodes[idx as usize].elem.assume_init_mut() });
            if !keep_going {
                return;
            }
            idx = self.node(idx).next;
        }
    }

    pub fn iterate<F: FnMut(&mut T) -> bool>(&mut self, f: F) {
        self.iterate_range(0, self.len, f);
    }

    pub fn iterate_i<F: FnMut(usize, &mut T) -> bool>(&mut self, f: F) {
        self.iterate_range_i(0, self.len, f);
    }

    /// Visit every element of `[from, to)`; the visitor cannot halt the
    /// walk, which saves it the bother of returning a flag.
    pub fn for_all_range<F: FnMut(&mut T)>(&mut self, from: usize, to: usize, mut f: F) {
        self.iterate_range(from, to, |elem| {
            f(elem);
            true
        });
    }

    pub fn for_all_range_i<F: FnMut(usize, &mut T)>(&mut self, from: usize, to: usize, mut f: F) {
        self.iterate_range_i(from, to, |i, elem| {
            f(i, elem);
            true
        });
    }

    pub fn for_all<F: FnMut(&mut T)>(&mut self, f: F) {
        self.for_all_range(0, self.len, f);
    }

    pub fn for_all_i<F: FnMut(usize, &mut T)>(&mut self, f: F) {
        self.for_all_range_i(0, self.len, f);
    }

    /// Shared iterator over the elements in order. Walks the densest level
    /// directly and leaves the access cache alone.
    pub fn iter(&self) -> Iter<'_, T> {
        let cur = if self.root == NIL {
            NIL
        } else {
            self.densest_head()
        };
        Iter { list: self, cur }
    }
}

impl<T: Clone> SkipVec<T> {
    /// A new list holding clones of positions `[from, to)`. `from` and
    /// `to` may be anywhere up to and including the length; `to <= from`
    /// yields an empty list without touching the node graph. The new
    /// list's generator is unseeded.
    pub fn copy_range(&self, from: usize, to: usize) -> SkipVec<T> {
        assert!(from <= self.len, "index {} out of bounds (len {})", from, self.len);
        assert!(to <= self.len, "index {} out of bounds (len {})", to, self.len);

        let mut out = SkipVec::new();
        for i in (from..to).rev() {
            out.push_front(self[i].clone());
        }
        out
    }

    /// Clone positions `[from, to)` into the front of `dst`, which must
    /// hold at least `to - from` elements. Empty ranges are a no-op that
    /// skips the node search.
    pub fn copy_range_to_slice(&self, from: usize, to: usize, dst: &mut [T]) {
        assert!(from <= self.len, "index {} out of bounds (len {})", from, self.len);
        assert!(to <= self.len, "index {} out of bounds (len {})", to, self.len);
        if to <= from {
            return;
        }

        let mut idx = self.locate(from);
        for slot in dst[..to - from].iter_mut() {
            *slot = unsafe { self.node(idx).elem.assume_init_ref() }.clone();
            idx = self.node(idx).next;
        }
    }

    /// `copy_range_to_slice` over the whole list.
    pub fn copy_to_slice(&self, dst: &mut [T]) {
        self.copy_range_to_slice(0, self.len, dst);
    }

    pub fn to_vec(&self) -> Vec<T> {
        let mut out = Vec::with_capacity(self.len);
        out.extend(self.iter().cloned());
        out
    }
}

impl<T> Default for SkipVec<T> {
    fn default() -> SkipVec<T> {
        SkipVec::new()
    }
}

impl<T> Drop for SkipVec<T> {
    fn drop(&mut self) {
        self.clear();
    }
}

/// Deep clone. The level structure is reproduced exactly; the generator
/// state and the access cache are not copied, so the clone seeds itself
/// lazily unless [`SkipVec::seed`] or [`SkipVec::seed_from`] is called
/// first.
impl<T: Clone> Clone for SkipVec<T> {
    fn clone(&self) -> SkipVec<T> {
        // Handles are arena offsets, so cloning slot for slot preserves
        // every link. Only live densest-level slots hold payloads worth
        // cloning; everything else is carried over as links.
        let mut nodes: Vec<Node<T>> = Vec::with_capacity(self.nodes.len());
        for node in &self.nodes {
            nodes.push(Node {
                elem: MaybeUninit::uninit(),
                dist: node.dist,
                next: node.next,
                down: node.down,
            });
        }
        if self.root != NIL {
            let mut idx = self.densest_head();
            while idx != NIL {
                let node = self.node(idx);
                let value = unsafe { node.elem.assume_init_ref() }.clone();
                nodes[idx as usize].elem = MaybeUninit::new(value);
                idx = node.next;
            }
        }
        SkipVec {
            nodes,
            free_list: self.free_list.clone(),
            root: self.root,
            n_levels: self.n_levels,
            len: self.len,
            rand: None,
            cache: RefCell::new(IndexCache::new()),
        }
    }
}

impl<T> ops::Index<usize> for SkipVec<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        match self.get(index) {
            Some(elem) => elem,
            None => panic!("index {} out of bounds (len {})", index, self.len),
        }
    }
}

impl<T> ops::IndexMut<usize> for SkipVec<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        let len = self.len;
        match self.get_mut(index) {
            Some(elem) => elem,
            None => panic!("index {} out of bounds (len {})", index, len),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for SkipVec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for SkipVec<T> {
    fn eq(&self, other: &SkipVec<T>) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for SkipVec<T> {}

impl<T> FromIterator<T> for SkipVec<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> SkipVec<T> {
        let mut list = SkipVec::new();
        list.extend(iter);
        list
    }
}

impl<T> Extend<T> for SkipVec<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for elem in iter {
            self.push_back(elem);
        }
    }
}

pub struct Iter<'a, T> {
    list: &'a SkipVec<T>,
    cur: Idx,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.cur == NIL {
            return None;
        }
        let node = self.list.node(self.cur);
        self.cur = node.next;
        Some(unsafe { node.elem.assume_init_ref() })
    }
}

impl<'a, T> IntoIterator for &'a SkipVec<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

#[cfg(test)]
impl<T> SkipVec<T> {
    pub(crate) fn level_count(&self) -> usize {
        self.n_levels + 1
    }

    fn cache_index(&self) -> Option<usize> {
        self.cache.borrow().index
    }

    /// Walk the whole structure and assert every internal invariant: the
    /// densest level holds exactly `len` elements, each level head sits at
    /// position 0, and every stored distance equals the real base-position
    /// gap to the successor.
    fn check_invariants(&self) {
        use std::collections::HashMap;

        if self.root == NIL {
            assert_eq!(self.len, 0, "empty root but len = {}", self.len);
            return;
        }
        assert!(self.n_levels <= MAX_LEVELS, "level count {} too high", self.n_levels);

        let mut base: HashMap<Idx, usize> = HashMap::new();
        let mut idx = self.densest_head();
        let mut pos = 0;
        while idx != NIL {
            base.insert(idx, pos);
            pos += 1;
            idx = self.node(idx).next;
        }
        assert_eq!(pos, self.len, "densest level holds {} of {} elements", pos, self.len);

        let resolve = |mut idx: Idx| -> usize {
            while self.node(idx).down != NIL {
                idx = self.node(idx).down;
            }
            base[&idx]
        };

        let mut heads = Vec::new();
        let mut head = self.root;
        while head != NIL {
            heads.push(head);
            head = self.node(head).down;
        }
        assert_eq!(heads.len(), self.n_levels + 1, "head chain length mismatch");

        for (level, &head) in heads.iter().enumerate().take(self.n_levels) {
            assert_eq!(resolve(head), 0, "level {} head not at position 0", level);
            let mut idx = head;
            while idx != NIL {
                let next = self.node(idx).next;
                if next != NIL {
                    let gap = resolve(next) - resolve(idx);
                    assert!(gap >= 1, "level {} zero-width span", level);
                    assert_eq!(
                        self.node(idx).dist,
                        gap,
                        "level {} distance mismatch at position {}",
                        level,
                        resolve(idx),
                    );
                }
                idx = next;
            }
        }
    }
}
