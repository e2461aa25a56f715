// model = "claude-opus-4-5"
// created = "2026-08-01"
// modified = "2026-08-02"
// driver = "Isaac Clayton"

//! skipvec - positional sequence containers backed by an indexable skip
//! list.
//!
//! [`SkipVec`] behaves like a `Vec` addressed by index, with O(log n)
//! insertion and removal anywhere in the sequence. [`BufferedSkipVec`]
//! wraps it with two small end buffers for workloads that mostly push and
//! pop at the ends.
//!
//! # Quick start
//!
//! ```
//! use skipvec::SkipVec;
//!
//! let mut list = SkipVec::new();
//! list.seed(1, 2); // optional, for reproducible structure
//! for i in 0..1000 {
//!     list.push_back(i);
//! }
//! list.insert(500, -1);
//! assert_eq!(list[500], -1);
//! assert_eq!(list.remove(500), -1);
//! assert_eq!(list.len(), 1000);
//! ```
//!
//! # When to use this over a Vec
//!
//! A `Vec` shifts half the sequence on every mid-sequence insertion, yet
//! for a thousand elements or fewer the shift is a fast memmove and the
//! `Vec` usually wins. The skip list pulls ahead from roughly ten thousand
//! elements upward when insertions and removals land in the middle. It is
//! also slower to build element by element, since every element allocates
//! a node; if a sequence is built once and rarely edited, the build can
//! dominate the total cost.
//!
//! The cheapest way to build a list is [`SkipVec::push_front`] in reverse
//! order, which runs in constant time per element. [`SkipVec::push_back`]
//! is constant amortized through the access cache.
//!
//! # Indexed reads and the access cache
//!
//! Every list remembers the descent path of its last positional access and
//! restarts from there for any access at an equal or larger index, so
//! forward scans by index cost about one hop per element. Mutations
//! invalidate the memory exactly as far as they disturb it. The
//! `iterate`/`for_all` families and [`SkipVec::iter`] are still the fastest
//! way to walk elements in order.
//!
//! Each list owns a PCG32 generator for its level draws. Lists seed
//! themselves lazily from thread-local entropy; call [`SkipVec::seed`] or
//! [`SkipVec::seed_from`] right after creation when reproducible structure
//! is wanted, e.g. in tests.

pub mod buffered;
mod levels;
pub mod list;
pub mod slice;

pub use buffered::BufferedSkipVec;
pub use list::{Iter, SkipVec};
