//! Process wide storage of the [`EnumMap`] of each type.
//!
//! Every type gets a leaked [`OnceLock`] slot, found by [`TypeId`]. The shared table is guarded by
//! a lock, which is only held to find or insert a slot. Building a map happens outside of it, so
//! building the map of one type can request the maps of other types.
//!
//! Each thread remembers the slots it has looked up, so after the first lookup of a type on a
//! thread, finding its slot again takes no lock and cannot wait for other threads registering
//! other types.
use std::{
    any::{Any, TypeId},
    cell::RefCell,
    sync::{OnceLock, PoisonError, RwLock},
};

use zwohash::HashMap;

use crate::{EnumMap, EnumMapError, MappedEnum};

pub(crate) type Slot<E> = OnceLock<Result<EnumMap<E>, EnumMapError>>;

type AnySlot = &'static (dyn Any + Send + Sync);

static TABLE: OnceLock<RwLock<HashMap<TypeId, AnySlot>>> = OnceLock::new();

thread_local! {
    static SEEN: RefCell<HashMap<TypeId, AnySlot>> = RefCell::new(HashMap::default());
}

/// The slot holding the map of `E`, created empty on first request.
pub(crate) fn slot<E: MappedEnum>() -> &'static Slot<E> {
    let id = TypeId::of::<E>();

    let slot = match SEEN.with(|seen| seen.borrow().get(&id).copied()) {
        Some(slot) => slot,
        None => {
            let slot = shared_slot::<E>(id);
            SEEN.with(|seen| seen.borrow_mut().insert(id, slot));
            slot
        }
    };

    slot.downcast_ref::<Slot<E>>()
        .expect("registry slots are keyed by the TypeId of their enum")
}

fn shared_slot<E: MappedEnum>(id: TypeId) -> AnySlot {
    let table = TABLE.get_or_init(Default::default);

    let found = table
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&id)
        .copied();
    if let Some(slot) = found {
        return slot;
    }

    let mut table = table.write().unwrap_or_else(PoisonError::into_inner);
    *table.entry(id).or_insert_with(|| {
        let slot: AnySlot = Box::leak(Box::new(Slot::<E>::new()));
        slot
    })
}

#[cfg(test)]
mod tests {
    use std::{sync::mpsc, thread, time::Duration};

    use super::*;
    use crate::{enum_map, Enumerator};

    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
    struct Known(u8);

    impl MappedEnum for Known {
        type Repr = u8;

        fn enumerators() -> Vec<Enumerator<Self>> {
            vec![Enumerator::new("One", Known(1))]
        }

        fn from_repr(repr: u8) -> Self {
            Known(repr)
        }

        fn to_repr(self) -> u8 {
            self.0
        }
    }

    #[test]
    fn known_slots_ignore_table_lock() {
        let (done_send, done_recv) = mpsc::channel();
        thread::spawn(move || {
            let first = enum_map::<Known>().unwrap();

            // Another thread registering a type holds the table lock.
            let table = TABLE.get_or_init(Default::default);
            let _guard = table.write().unwrap_or_else(PoisonError::into_inner);

            let again = enum_map::<Known>().unwrap();
            done_send
                .send(std::ptr::eq(first, again) && again.to_utf8_key(Known(1)).as_str() == "One")
                .unwrap();
        });

        assert_eq!(done_recv.recv_timeout(Duration::from_secs(10)), Ok(true));
    }

    #[test]
    fn slots_are_shared_between_threads() {
        let here = slot::<Known>() as *const Slot<Known> as usize;
        let there = thread::spawn(|| slot::<Known>() as *const Slot<Known> as usize)
            .join()
            .unwrap();
        assert_eq!(here, there);
    }
}
