//! Production rules for composite carriers: optionals, tuples, arrays,
//! sequences, dictionaries and smart pointers.
//!
//! Optional and collection carriers are where the recursion guard bites:
//! once exhausted they force absent/empty values, which is what terminates
//! self-referential type graphs at a deterministic chain length.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::hash::Hash;
use std::rc::Rc;
use std::sync::Arc;

use rand::Rng;

use crate::config::OptionalMode;
use crate::error::SpecimenError;
use crate::session::Session;
use crate::specimen::Specimen;

// ============================================================================
// Optional wrapper
// ============================================================================

impl<T: Specimen> Specimen for Option<T> {
    fn specimen(session: &mut Session<'_>) -> Result<Self, SpecimenError> {
        if session.guard().exhausted() {
            return Ok(None);
        }
        let present = match session.options().optional_mode {
            OptionalMode::AlwaysPresent => true,
            OptionalMode::CoinFlip => session.rng().gen_bool(0.5),
        };
        if present {
            Ok(Some(session.synthesize::<T>()?))
        } else {
            Ok(None)
        }
    }
}

// ============================================================================
// Smart pointers (transparent)
// ============================================================================

impl<T: Specimen> Specimen for Box<T> {
    fn specimen(session: &mut Session<'_>) -> Result<Self, SpecimenError> {
        Ok(Box::new(session.synthesize::<T>()?))
    }
}

impl<T: Specimen> Specimen for Rc<T> {
    fn specimen(session: &mut Session<'_>) -> Result<Self, SpecimenError> {
        Ok(Rc::new(session.synthesize::<T>()?))
    }
}

impl<T: Specimen> Specimen for Arc<T> {
    fn specimen(session: &mut Session<'_>) -> Result<Self, SpecimenError> {
        Ok(Arc::new(session.synthesize::<T>()?))
    }
}

// ============================================================================
// Tuples (arity 1..=8, components left to right)
// ============================================================================

macro_rules! impl_tuple_specimen {
    ($($component:ident),+) => {
        impl<$($component: Specimen),+> Specimen for ($($component,)+) {
            fn specimen(session: &mut Session<'_>) -> Result<Self, SpecimenError> {
                Ok(($(session.synthesize::<$component>()?,)+))
            }
        }
    };
}

impl_tuple_specimen!(A);
impl_tuple_specimen!(A, B);
impl_tuple_specimen!(A, B, C);
impl_tuple_specimen!(A, B, C, D);
impl_tuple_specimen!(A, B, C, D, E);
impl_tuple_specimen!(A, B, C, D, E, F);
impl_tuple_specimen!(A, B, C, D, E, F, G);
impl_tuple_specimen!(A, B, C, D, E, F, G, H);

// ============================================================================
// Arrays
// ============================================================================

// Rank and per-dimension size are carried by the Rust type itself; nested
// arrays give multi-dimensional shapes. Every cell is filled independently.
impl<T: Specimen, const N: usize> Specimen for [T; N] {
    fn specimen(session: &mut Session<'_>) -> Result<Self, SpecimenError> {
        let mut cells = Vec::with_capacity(N);
        for _ in 0..N {
            cells.push(session.synthesize::<T>()?);
        }
        cells
            .try_into()
            .map_err(|_| SpecimenError::internal("array cell count mismatch"))
    }
}

// ============================================================================
// Sequences
// ============================================================================

impl<T: Specimen> Specimen for Vec<T> {
    fn specimen(session: &mut Session<'_>) -> Result<Self, SpecimenError> {
        if session.guard().exhausted() {
            return Ok(Vec::new());
        }
        let count = session.element_count();
        let mut items = Vec::with_capacity(count);
        for _ in 0..count {
            items.push(session.synthesize::<T>()?);
        }
        Ok(items)
    }
}

impl<T: Specimen> Specimen for VecDeque<T> {
    fn specimen(session: &mut Session<'_>) -> Result<Self, SpecimenError> {
        Ok(session.synthesize::<Vec<T>>()?.into())
    }
}

// ============================================================================
// Dictionaries and sets
// ============================================================================

// Key uniqueness is enforced by stopping on the first collision rather than
// retrying: the requested size is a soft upper bound that may undershoot but
// is never exceeded.

impl<K, V> Specimen for HashMap<K, V>
where
    K: Specimen + Eq + Hash,
    V: Specimen,
{
    fn specimen(session: &mut Session<'_>) -> Result<Self, SpecimenError> {
        if session.guard().exhausted() {
            return Ok(HashMap::new());
        }
        let target = session.dictionary_target();
        let mut map = HashMap::with_capacity(target);
        for _ in 0..target {
            let key = session.synthesize::<K>()?;
            if map.contains_key(&key) {
                break;
            }
            let value = session.synthesize::<V>()?;
            map.insert(key, value);
        }
        Ok(map)
    }
}

impl<K, V> Specimen for BTreeMap<K, V>
where
    K: Specimen + Ord,
    V: Specimen,
{
    fn specimen(session: &mut Session<'_>) -> Result<Self, SpecimenError> {
        if session.guard().exhausted() {
            return Ok(BTreeMap::new());
        }
        let target = session.dictionary_target();
        let mut map = BTreeMap::new();
        for _ in 0..target {
            let key = session.synthesize::<K>()?;
            if map.contains_key(&key) {
                break;
            }
            let value = session.synthesize::<V>()?;
            map.insert(key, value);
        }
        Ok(map)
    }
}

impl<T> Specimen for HashSet<T>
where
    T: Specimen + Eq + Hash,
{
    fn specimen(session: &mut Session<'_>) -> Result<Self, SpecimenError> {
        if session.guard().exhausted() {
            return Ok(HashSet::new());
        }
        let target = session.dictionary_target();
        let mut set = HashSet::with_capacity(target);
        for _ in 0..target {
            let item = session.synthesize::<T>()?;
            if !set.insert(item) {
                break;
            }
        }
        Ok(set)
    }
}

impl<T> Specimen for BTreeSet<T>
where
    T: Specimen + Ord,
{
    fn specimen(session: &mut Session<'_>) -> Result<Self, SpecimenError> {
        if session.guard().exhausted() {
            return Ok(BTreeSet::new());
        }
        let target = session.dictionary_target();
        let mut set = BTreeSet::new();
        for _ in 0..target {
            let item = session.synthesize::<T>()?;
            if !set.insert(item) {
                break;
            }
        }
        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FillOptions, OptionalMode};
    use crate::testutil::{with_options, with_session};

    #[test]
    fn test_option_reaches_both_variants() {
        with_session(61, |session| {
            let values: Vec<Option<u32>> = (0..100)
                .map(|_| session.synthesize().unwrap())
                .collect();
            assert!(values.iter().any(|v| v.is_some()));
            assert!(values.iter().any(|v| v.is_none()));
        });
    }

    #[test]
    fn test_always_present_mode_never_yields_none() {
        let options = FillOptions {
            optional_mode: OptionalMode::AlwaysPresent,
            ..FillOptions::default()
        };
        with_options(options, 67, |session| {
            for _ in 0..100 {
                let value: Option<u32> = session.synthesize().unwrap();
                assert!(value.is_some());
            }
        });
    }

    #[test]
    fn test_sequence_length_within_bounds() {
        let options = FillOptions {
            min_count: 2,
            max_count: 6,
            ..FillOptions::default()
        };
        with_options(options, 71, |session| {
            for _ in 0..50 {
                let items: Vec<u8> = session.synthesize().unwrap();
                assert!(items.len() >= 2 && items.len() <= 6);

                let deque: VecDeque<u8> = session.synthesize().unwrap();
                assert!(deque.len() >= 2 && deque.len() <= 6);
            }
        });
    }

    #[test]
    fn test_dictionary_never_exceeds_max_count() {
        let options = FillOptions {
            min_count: 1,
            max_count: 10,
            ..FillOptions::default()
        };
        with_options(options, 73, |session| {
            for _ in 0..100 {
                let map: HashMap<String, String> = session.synthesize().unwrap();
                assert!(!map.is_empty());
                assert!(map.len() <= 10);
            }
        });
    }

    #[test]
    fn test_dictionary_undershoots_on_collision() {
        // bool keys collide after at most two distinct values, so maps with
        // a large requested size must still stop early.
        let options = FillOptions {
            min_count: 1,
            max_count: 50,
            ..FillOptions::default()
        };
        with_options(options, 79, |session| {
            for _ in 0..50 {
                let map: BTreeMap<bool, u8> = session.synthesize().unwrap();
                assert!(map.len() <= 2);
            }
        });
    }

    #[test]
    fn test_sets_enforce_uniqueness() {
        with_session(83, |session| {
            for _ in 0..50 {
                let set: HashSet<u8> = session.synthesize().unwrap();
                assert!(set.len() <= session.options().max_count);

                let ordered: BTreeSet<u16> = session.synthesize().unwrap();
                assert!(ordered.len() <= session.options().max_count);
            }
        });
    }

    #[test]
    fn test_eight_tuple_fully_populated() {
        with_session(89, |session| {
            let value: (u8, i16, u32, i64, f32, f64, bool, char) =
                session.synthesize().unwrap();
            assert_ne!(value.0, 0);
            assert_ne!(value.1, 0);
            assert_ne!(value.2, 0);
            assert_ne!(value.3, 0);
            assert_ne!(value.4, 0.0);
            assert_ne!(value.5, 0.0);
            assert!(value.7.is_ascii_alphanumeric());
        });
    }

    #[test]
    fn test_array_cells_filled_independently() {
        with_session(97, |session| {
            let cells: [u64; 16] = session.synthesize().unwrap();
            assert!(cells.iter().all(|c| *c != 0));
            // 16 independent draws over u64 virtually never repeat
            let mut seen: Vec<u64> = cells.to_vec();
            seen.sort_unstable();
            seen.dedup();
            assert!(seen.len() > 1);

            let grid: [[u8; 3]; 3] = session.synthesize().unwrap();
            assert!(grid.iter().flatten().all(|c| *c != 0));
        });
    }

    struct Link {
        next: Option<Box<Link>>,
    }

    impl Specimen for Link {
        fn specimen(session: &mut Session<'_>) -> Result<Self, SpecimenError> {
            session.composite(|session| {
                Ok(Link {
                    next: session.property("next")?,
                })
            })
        }
    }

    #[test]
    fn test_self_referential_chain_is_depth_bounded() {
        let options = FillOptions {
            max_depth: 4,
            optional_mode: OptionalMode::AlwaysPresent,
            ..FillOptions::default()
        };
        with_options(options, 101, |session| {
            for _ in 0..20 {
                let root: Link = session.synthesize().unwrap();
                let mut links = 0;
                let mut cursor = &root;
                while let Some(next) = cursor.next.as_deref() {
                    links += 1;
                    cursor = next;
                }
                assert_eq!(links, 4);
            }
        });
    }
}
