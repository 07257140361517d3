//! Fixed-capacity entity slots
//!
//! Allocation always takes the lowest free index. A full store is a
//! capacity policy, not an error: `allocate` hands the entity back.

use crate::Position;
use crate::consts::BLANK;
use crate::host::{Display, Glyph};

/// Index of a slot within its store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId(usize);

impl SlotId {
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Anything drawn as a single glyph
pub trait Sprite {
    fn position(&self) -> Position;
    fn glyph(&self) -> Glyph;
}

#[derive(Debug, Clone)]
pub struct Slots<T, const N: usize> {
    slots: [Option<T>; N],
}

impl<T, const N: usize> Default for Slots<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const N: usize> Slots<T, N> {
    pub fn new() -> Self {
        Self {
            slots: std::array::from_fn(|_| None),
        }
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    /// Occupy the lowest free slot, or return the entity if all are taken
    pub fn allocate(&mut self, entity: T) -> Result<SlotId, T> {
        match self.slots.iter().position(Option::is_none) {
            Some(index) => {
                self.slots[index] = Some(entity);
                Ok(SlotId(index))
            }
            None => Err(entity),
        }
    }

    pub fn get(&self, id: SlotId) -> Option<&T> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
    }

    pub fn is_active(&self, id: SlotId) -> bool {
        self.get(id).is_some()
    }

    /// Active entities in slot order
    pub fn active(&self) -> impl Iterator<Item = (SlotId, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|e| (SlotId(i), e)))
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_full(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }
}

impl<T: Sprite, const N: usize> Slots<T, N> {
    /// Free a slot and erase its glyph. Releasing a free slot does nothing.
    pub fn release(&mut self, id: SlotId, display: &mut impl Display) -> Option<T> {
        let entity = self.slots.get_mut(id.0)?.take()?;
        let pos = entity.position();
        display.set_glyph(BLANK, pos.x, pos.y);
        Some(entity)
    }

    /// Free every slot, erasing each glyph
    pub fn release_all(&mut self, display: &mut impl Display) -> Vec<T> {
        (0..N)
            .filter_map(|i| self.release(SlotId(i), display))
            .collect()
    }
}
