//! Generational Arena
//!
//! Backing store for DOM nodes. Handles carry a generation counter so a
//! handle to a removed slot never resolves to whatever reuses that slot.

/// Handle into an [`Arena`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GenIndex {
    pub index: u32,
    pub generation: u32,
}

enum Entry<T> {
    Occupied { generation: u32, value: T },
    Vacant { generation: u32, next_free: Option<u32> },
}

impl<T> Entry<T> {
    fn generation(&self) -> u32 {
        match self {
            Entry::Occupied { generation, .. } | Entry::Vacant { generation, .. } => *generation,
        }
    }
}

pub struct Arena<T> {
    entries: Vec<Entry<T>>,
    free_head: Option<u32>,
    len: usize,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Arena<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            free_head: None,
            len: 0,
        }
    }

    pub fn allocate(&mut self, value: T) -> GenIndex {
        self.len += 1;
        if let Some(index) = self.free_head {
            if let Some(&Entry::Vacant { generation, next_free }) = self.entries.get(index as usize) {
                self.free_head = next_free;
                self.entries[index as usize] = Entry::Occupied { generation, value };
                return GenIndex { index, generation };
            }
        }

        let index = self.entries.len() as u32;
        self.entries.push(Entry::Occupied { generation: 0, value });
        GenIndex { index, generation: 0 }
    }

    pub fn get(&self, id: GenIndex) -> Option<&T> {
        match self.entries.get(id.index as usize)? {
            Entry::Occupied { generation, value } if *generation == id.generation => Some(value),
            _ => None,
        }
    }

    pub fn get_mut(&mut self, id: GenIndex) -> Option<&mut T> {
        match self.entries.get_mut(id.index as usize)? {
            Entry::Occupied { generation, value } if *generation == id.generation => Some(value),
            _ => None,
        }
    }

    /// Free the slot behind `id`, returning its value. Stale handles are a no-op.
    pub fn remove(&mut self, id: GenIndex) -> Option<T> {
        let slot = self.entries.get_mut(id.index as usize)?;
        if !matches!(slot, Entry::Occupied { generation, .. } if *generation == id.generation) {
            return None;
        }
        let vacant = Entry::Vacant {
            generation: slot.generation().wrapping_add(1),
            next_free: self.free_head,
        };
        let Entry::Occupied { value, .. } = std::mem::replace(slot, vacant) else {
            return None;
        };
        self.free_head = Some(id.index);
        self.len -= 1;
        Some(value)
    }

    pub fn contains(&self, id: GenIndex) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Live entries in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (GenIndex, &T)> {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(i, entry)| match entry {
                Entry::Occupied { generation, value } => Some((
                    GenIndex {
                        index: i as u32,
                        generation: *generation,
                    },
                    value,
                )),
                Entry::Vacant { .. } => None,
            })
    }
}
