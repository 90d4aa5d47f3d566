#![cfg(test)]

// Property tests for ChainHashMap kept inside the crate so the chain
// invariants can be checked alongside the public behavior.

use crate::bucket_hasher::BucketHasher;
use crate::chain_hash_map::{ChainHashMap, Handle, InsertError};
use core::num::NonZeroUsize;
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use std::collections::{BTreeSet, HashMap, HashSet};

// Pool-indexed operations to improve shrinking: indices shrink to earlier keys,
// pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Set(usize, i32),
    Insert(usize, i32),
    InsertWith(usize, i32),
    Remove(usize),
    Take(usize),
    RemoveHandle(usize),
    Get(usize),
    Contains(String),
    Mutate(usize, i32),
    Iterate,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z]{0,5}", 1..=8).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let contains_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Set(i, v)),
            (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Insert(i, v)),
            (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::InsertWith(i, v)),
            idx.clone().prop_map(OpI::Remove),
            idx.clone().prop_map(OpI::Take),
            idx.clone().prop_map(OpI::RemoveHandle),
            idx.clone().prop_map(OpI::Get),
            prop_oneof![
                contains_pool.prop_map(|s: String| s),
                "[a-z]{0,5}".prop_map(|s| s)
            ]
            .prop_map(OpI::Contains),
            (idx.clone(), any::<i32>()).prop_map(|(i, d)| OpI::Mutate(i, d)),
            Just(OpI::Iterate),
        ];
        proptest::collection::vec(op, 1..60).prop_map(move |ops| (pool.clone(), ops))
    })
}

// Every live key sits in exactly one chain, the chain its bucket function names,
// and chain lengths add up to `len()`.
fn check_chains<S: BucketHasher>(sut: &ChainHashMap<i32, S>) -> Result<(), TestCaseError> {
    let mut seen = HashSet::new();
    let mut total = 0;
    for b in 0..sut.bucket_count() {
        let keys: Vec<&str> = sut.bucket_keys(b).expect("bucket in range").collect();
        prop_assert_eq!(Some(keys.len()), sut.bucket_len(b));
        total += keys.len();
        for k in keys {
            prop_assert_eq!(sut.bucket_of(k), b);
            prop_assert!(seen.insert(k.to_string()), "key {:?} chained twice", k);
        }
    }
    prop_assert_eq!(total, sut.len());
    Ok(())
}

// State-machine equivalence against std::collections::HashMap.
fn run_scenario<S: BucketHasher>(
    mut sut: ChainHashMap<i32, S>,
    pool: Vec<String>,
    ops: Vec<OpI>,
) -> Result<(), TestCaseError> {
    let mut model: HashMap<String, i32> = HashMap::new();
    let mut stale: Vec<Handle> = Vec::new();
    let mut default_calls = 0usize;

    for op in ops {
        match op {
            OpI::Set(i, v) => {
                let k = &pool[i];
                let prev = sut.set(k.as_str(), v);
                prop_assert_eq!(prev, model.insert(k.clone(), v));
            }
            OpI::Insert(i, v) => {
                let k = &pool[i];
                let already = model.contains_key(k);
                match sut.insert(k.clone(), v) {
                    Ok(h) => {
                        prop_assert!(!already, "insert must fail on duplicate");
                        prop_assert_eq!(h.value(&sut), Some(&v));
                        model.insert(k.clone(), v);
                    }
                    Err(InsertError::DuplicateKey) => {
                        prop_assert!(already, "duplicate error only when key exists");
                    }
                }
            }
            OpI::InsertWith(i, v) => {
                let k = &pool[i];
                let already = model.contains_key(k);
                let before = default_calls;
                let res = sut.insert_with(k.as_str(), || {
                    default_calls += 1;
                    v
                });
                match res {
                    Ok(_) => {
                        prop_assert!(!already);
                        prop_assert_eq!(default_calls, before + 1);
                        model.insert(k.clone(), v);
                    }
                    Err(InsertError::DuplicateKey) => {
                        prop_assert!(already);
                        prop_assert_eq!(default_calls, before, "default must not run on duplicate");
                    }
                }
            }
            OpI::Remove(i) => {
                let k = &pool[i];
                let handle = sut.find(k);
                let removed = sut.remove(k);
                prop_assert_eq!(removed, model.remove(k).is_some());
                if let Some(h) = handle {
                    stale.push(h);
                }
                prop_assert!(sut.get(k).is_none());
            }
            OpI::Take(i) => {
                let k = &pool[i];
                match (sut.take(k), model.remove(k)) {
                    (Some((kk, vv)), Some(mv)) => {
                        prop_assert_eq!(&kk, k);
                        prop_assert_eq!(vv, mv);
                    }
                    (None, None) => {}
                    (s, m) => prop_assert!(false, "take mismatch: {:?} vs {:?}", s, m),
                }
            }
            OpI::RemoveHandle(i) => {
                let k = &pool[i];
                if let Some(h) = sut.find(k) {
                    let (kk, vv) = sut.remove_handle(h).expect("live handle removes");
                    prop_assert_eq!(&kk, k);
                    prop_assert_eq!(Some(vv), model.remove(k));
                    stale.push(h);
                } else {
                    prop_assert!(!model.contains_key(k));
                }
            }
            OpI::Get(i) => {
                let k = &pool[i];
                prop_assert_eq!(sut.get(k), model.get(k));
                prop_assert_eq!(sut.find(k).is_some(), model.contains_key(k));
            }
            OpI::Contains(s) => {
                prop_assert_eq!(sut.contains_key(&s), model.contains_key(&s));
            }
            OpI::Mutate(i, d) => {
                let k = &pool[i];
                if let Some(v) = sut.get_mut(k) {
                    *v = v.saturating_add(d);
                    let mv = model.get_mut(k).expect("present in model");
                    *mv = mv.saturating_add(d);
                } else {
                    prop_assert!(!model.contains_key(k));
                }
            }
            OpI::Iterate => {
                let s_keys: BTreeSet<String> =
                    sut.iter().map(|(_, k, _)| k.to_string()).collect();
                let m_keys: BTreeSet<String> = model.keys().cloned().collect();
                prop_assert_eq!(s_keys, m_keys);
            }
        }

        for &h in &stale {
            prop_assert!(h.value(&sut).is_none());
        }
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        check_chains(&sut)?;
    }
    Ok(())
}

// Every key lands in bucket 0, so all entries share one chain.
#[derive(Clone, Copy, Default)]
struct SingleChain;
impl BucketHasher for SingleChain {
    fn bucket_of(&self, _key: &str, _bucket_count: NonZeroUsize) -> usize {
        0
    }
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]

    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario(), buckets in 1usize..=16) {
        let sut = ChainHashMap::with_bucket_count(buckets).expect("non-zero bucket count");
        run_scenario(sut, pool, ops)?;
    }

    // Same invariants under worst-case collisions.
    #[test]
    fn prop_state_machine_single_chain((pool, ops) in arb_scenario()) {
        run_scenario(ChainHashMap::with_hasher(SingleChain), pool, ops)?;
    }
}
