// model = "claude-opus-4-5"
// created = "2026-08-01"
// modified = "2026-08-02"
// driver = "Isaac Clayton"

//! In-place operations on contiguous buffers, and the random operation
//! generator used by the shadow-sequence tests.
//!
//! The three buffer primitives exist so the buffered wrapper's routing code
//! reads the same for every region. They inherit `Vec` semantics: inserting
//! at the length appends (so insertion into an empty buffer at index 0 is
//! fine), and out-of-range indices are the caller's problem.

use std::fmt;

use rand_core::RngCore;
use rand_pcg::Pcg32;

/// Insert `elem` at `index`, shifting the tail right.
pub fn insert<T>(buf: &mut Vec<T>, index: usize, elem: T) {
    buf.insert(index, elem);
}

/// Remove and return the element at `index`, shifting the tail left.
pub fn remove<T>(buf: &mut Vec<T>, index: usize) -> T {
    buf.remove(index)
}

/// Exchange the elements at `i1` and `i2`.
pub fn swap<T>(buf: &mut [T], i1: usize, i2: usize) {
    buf.swap(i1, i2);
}

/// One step of a random editing session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpKind {
    Insert,
    Remove,
    Swap,
}

/// An operation together with its operands. `index2` is only meaningful
/// for swaps, `elem` only for insertions.
#[derive(Clone, Copy, Debug)]
pub struct Op {
    pub kind: OpKind,
    pub index1: usize,
    pub index2: usize,
    pub elem: i64,
}

/// Apply `op` to a plain vector, the reference model for the list types.
pub fn apply_to_vec(op: &Op, buf: &mut Vec<i64>) {
    match op.kind {
        OpKind::Insert => insert(buf, op.index1, op.elem),
        OpKind::Remove => {
            remove(buf, op.index1);
        }
        OpKind::Swap => swap(buf, op.index1, op.index2),
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            OpKind::Insert => write!(f, "insert {} at index {}", self.elem, self.index1),
            OpKind::Remove => write!(f, "remove element at index {}", self.index1),
            OpKind::Swap => write!(f, "swap indices {} and {}", self.index1, self.index2),
        }
    }
}

/// Generate `n` operations that are valid when applied in order, starting
/// from an empty sequence. Insertions, swaps and removals are drawn in
/// roughly equal proportion once the sequence is non-empty.
pub fn gen_ops(rng: &mut Pcg32, n: usize) -> Vec<Op> {
    let mut ops = Vec::with_capacity(n);
    let mut len = 0usize;

    for _ in 0..n {
        let r = rng.next_u32();
        if len == 0 || r < u32::MAX / 3 {
            ops.push(Op {
                kind: OpKind::Insert,
                index1: (r as usize) % (len + 1),
                index2: 0,
                elem: (r % 100) as i64,
            });
            len += 1;
        } else if r < u32::MAX / 3 * 2 {
            ops.push(Op {
                kind: OpKind::Swap,
                index1: (r as usize) % len,
                index2: (rng.next_u32() as usize) % len,
                elem: 0,
            });
        } else {
            ops.push(Op {
                kind: OpKind::Remove,
                index1: (r as usize) % len,
                index2: 0,
                elem: 0,
            });
            len -= 1;
        }
    }

    ops
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_into_empty_appends() {
        let mut buf = Vec::new();
        insert(&mut buf, 0, 7);
        assert_eq!(buf, vec![7]);
    }

    #[test]
    fn insert_shifts_tail() {
        let mut buf = vec![1, 2, 4];
        insert(&mut buf, 2, 3);
        assert_eq!(buf, vec![1, 2, 3, 4]);
        insert(&mut buf, 4, 5);
        assert_eq!(buf, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn remove_shifts_tail() {
        let mut buf = vec![1, 2, 3, 4];
        assert_eq!(remove(&mut buf, 1), 2);
        assert_eq!(buf, vec![1, 3, 4]);
    }

    #[test]
    fn swap_exchanges() {
        let mut buf = vec![1, 2, 3];
        swap(&mut buf, 0, 2);
        assert_eq!(buf, vec![3, 2, 1]);
    }

    #[test]
    fn generated_ops_stay_in_bounds() {
        let mut rng = Pcg32::new(12345, 67891);
        let ops = gen_ops(&mut rng, 2000);
        assert_eq!(ops.len(), 2000);

        let mut len = 0usize;
        let mut kinds = [0usize; 3];
        for op in &ops {
            match op.kind {
                OpKind::Insert => {
                    assert!(op.index1 <= len);
                    len += 1;
                    kinds[0] += 1;
                }
                OpKind::Remove => {
                    assert!(op.index1 < len);
                    len -= 1;
                    kinds[1] += 1;
                }
                OpKind::Swap => {
                    assert!(op.index1 < len && op.index2 < len);
                    kinds[2] += 1;
                }
            }
        }
        // All three kinds show up in a long enough session.
        assert!(kinds.iter().all(|&k| k > 100), "kinds = {:?}", kinds);
    }
}
