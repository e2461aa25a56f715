// model = "claude-opus-4-5"
// created = "2026-08-02"
// modified = "2026-08-02"
// driver = "Isaac Clayton"

//! Shadow-sequence tests for the buffered wrapper. The buffered list must
//! be observationally identical to the core list, so the same lockstep
//! comparison against a `Vec` applies, with extra pushing at the ends to
//! keep the buffers and the spill policy busy.

use rand_core::RngCore;
use rand_pcg::Pcg32;

use skipvec::slice::{apply_to_vec, gen_ops, Op, OpKind};
use skipvec::BufferedSkipVec;

const SEED: (u64, u64) = (12345, 67891);

fn apply_to_list(op: &Op, list: &mut BufferedSkipVec<i64>) {
    match op.kind {
        OpKind::Insert => list.insert(op.index1, op.elem),
        OpKind::Remove => {
            list.remove(op.index1);
        }
        OpKind::Swap => list.swap(op.index1, op.index2),
    }
}

#[test]
fn random_op_sequences_match_vec() {
    const NOPS: usize = 600;
    const NITERS: usize = 10;

    let mut op_rng = Pcg32::new(SEED.0, SEED.1);
    let mut list = BufferedSkipVec::new();
    list.seed(SEED.0, SEED.1);

    for iter in 0..NITERS {
        let ops = gen_ops(&mut op_rng, NOPS);
        list.clear();
        let mut shadow: Vec<i64> = Vec::new();

        for (step, op) in ops.iter().enumerate() {
            // Mix in end pushes so the buffers fill and spill.
            if step % 3 == 0 {
                let v = op_rng.next_u32() as i64 % 1000;
                if step % 6 == 0 {
                    list.push_front(v);
                    shadow.insert(0, v);
                } else {
                    list.push_back(v);
                    shadow.push(v);
                }
            }

            apply_to_vec(op, &mut shadow);
            apply_to_list(op, &mut list);

            assert_eq!(
                list.len(),
                shadow.len(),
                "iter {} step {} ({})",
                iter,
                step,
                op
            );
            if step % 25 == 0 {
                for (i, &want) in shadow.iter().enumerate() {
                    assert_eq!(list[i], want, "iter {} step {} index {}", iter, step, i);
                }
            }
        }

        for (i, &want) in shadow.iter().enumerate() {
            assert_eq!(list[i], want, "iter {} final index {}", iter, i);
        }

        let mut visited = 0;
        list.for_all_i(|i, elem| {
            assert_eq!(*elem, shadow[i], "iter {} visitor index {}", iter, i);
            visited += 1;
        });
        assert_eq!(visited, shadow.len());

        let copy = list.clone();
        assert_eq!(copy.to_vec(), shadow, "iter {} clone", iter);
    }
}

#[test]
fn copy_range_round_trip() {
    let mut list = BufferedSkipVec::new();
    list.seed(SEED.0, SEED.1);
    list.copy_range(0, 0); // empty range of an empty list is fine

    for i in 0..1000 {
        list.push_front(i);
    }

    for i in 0..500 {
        let empty = list.copy_range(i, i);
        assert!(empty.is_empty());

        let copy = list.copy_range(i, 1000 - i);
        assert_eq!(copy.len(), 1000 - 2 * i);
        for j in 0..copy.len() {
            assert_eq!(copy[j], list[i + j], "range start {} offset {}", i, j);
        }
    }
}

#[test]
fn copy_range_to_slice_round_trip() {
    let mut list = BufferedSkipVec::new();
    list.seed(SEED.0, SEED.1);

    let mut empty: Vec<i64> = Vec::new();
    list.copy_range_to_slice(0, 0, &mut empty);

    for i in 0..1000 {
        list.push_front(i);
    }

    let mut buf = vec![0i64; 1000];
    for i in 0..500 {
        list.copy_range_to_slice(i, i, &mut buf);
        list.copy_range_to_slice(i, 1000 - i, &mut buf);
        for j in 0..1000 - 2 * i {
            assert_eq!(buf[j], list[i + j], "range start {} offset {}", i, j);
        }
    }
}

#[test]
fn mixed_end_pushes_then_mid_edits() {
    let mut list = BufferedSkipVec::new();
    list.seed(SEED.0, SEED.1);
    let mut shadow: Vec<i64> = Vec::new();

    for i in 0..2000 {
        if i % 2 == 0 {
            list.push_back(i);
            shadow.push(i);
        } else {
            list.push_front(i);
            shadow.insert(0, i);
        }
    }

    for k in 0..200i64 {
        let at = (k as usize * 7) % (shadow.len() + 1);
        list.insert(at, -k);
        shadow.insert(at, -k);
        let at = (k as usize * 13) % shadow.len();
        assert_eq!(list.remove(at), shadow.remove(at), "round {}", k);
    }

    assert_eq!(list.len(), shadow.len());
    assert_eq!(list.to_vec(), shadow);
}
