//! Generational arena backing unit and squad storage
//!
//! Removal frees the slot for reuse and bumps its generation, so indices
//! handed out before the removal stop resolving.

use crate::core::types::GenIndex;

#[derive(Debug, Clone)]
enum Slot<T> {
    Occupied { generation: u32, value: T },
    Free { generation: u32, next_free: Option<u32> },
}

#[derive(Debug, Clone)]
pub struct Arena<T> {
    slots: Vec<Slot<T>>,
    free_head: Option<u32>,
    len: usize,
}

impl<T> Arena<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_head: None,
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn insert(&mut self, value: T) -> GenIndex {
        self.insert_with(|_| value)
    }

    /// Insert a value that needs to know its own index
    pub fn insert_with(&mut self, make: impl FnOnce(GenIndex) -> T) -> GenIndex {
        self.len += 1;
        if let Some(slot) = self.free_head {
            let entry = &mut self.slots[slot as usize];
            let (generation, next_free) = match entry {
                Slot::Free {
                    generation,
                    next_free,
                } => (*generation, *next_free),
                Slot::Occupied { .. } => unreachable!("free list points at an occupied slot"),
            };
            let index = GenIndex::new(slot, generation);
            *entry = Slot::Occupied {
                generation,
                value: make(index),
            };
            self.free_head = next_free;
            return index;
        }

        let slot = self.slots.len() as u32;
        let index = GenIndex::new(slot, 0);
        self.slots.push(Slot::Occupied {
            generation: 0,
            value: make(index),
        });
        index
    }

    pub fn get(&self, index: GenIndex) -> Option<&T> {
        match self.slots.get(index.slot as usize)? {
            Slot::Occupied { generation, value } if *generation == index.generation => Some(value),
            _ => None,
        }
    }

    pub fn get_mut(&mut self, index: GenIndex) -> Option<&mut T> {
        match self.slots.get_mut(index.slot as usize)? {
            Slot::Occupied { generation, value } if *generation == index.generation => Some(value),
            _ => None,
        }
    }

    pub fn contains(&self, index: GenIndex) -> bool {
        self.get(index).is_some()
    }

    pub fn remove(&mut self, index: GenIndex) -> Option<T> {
        let entry = self.slots.get_mut(index.slot as usize)?;
        match entry {
            Slot::Occupied { generation, .. } if *generation == index.generation => {}
            _ => return None,
        }

        let freed = Slot::Free {
            generation: index.generation.wrapping_add(1),
            next_free: self.free_head,
        };
        let old = std::mem::replace(entry, freed);
        self.free_head = Some(index.slot);
        self.len -= 1;

        match old {
            Slot::Occupied { value, .. } => Some(value),
            Slot::Free { .. } => None,
        }
    }

    /// Live entries in slot order
    pub fn iter(&self) -> impl Iterator<Item = (GenIndex, &T)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(slot, entry)| match entry {
                Slot::Occupied { generation, value } => {
                    Some((GenIndex::new(slot as u32, *generation), value))
                }
                Slot::Free { .. } => None,
            })
    }
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}
