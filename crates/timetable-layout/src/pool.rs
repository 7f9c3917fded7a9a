#![forbid(unsafe_code)]

//! Renderable pooling and the live materialized set.
//!
//! The engine never constructs or draws a renderable. It asks an
//! [`ItemPool`] for a handle when a period enters the window and gives the
//! handle back when the period leaves it. Every acquired handle is released
//! exactly once, and no item index is ever live twice.

use std::collections::BTreeMap;

use timetable_core::geometry::Rect;

/// Host-side pool of renderable handles.
pub trait ItemPool {
    type Handle;

    /// Obtain a renderable bound to `item_index`. Must succeed for any index
    /// in range of the current dataset.
    fn acquire(&mut self, item_index: usize) -> Self::Handle;

    /// Return a handle obtained from [`acquire`](Self::acquire).
    fn release(&mut self, handle: Self::Handle);
}

impl<P: ItemPool + ?Sized> ItemPool for &mut P {
    type Handle = P::Handle;

    fn acquire(&mut self, item_index: usize) -> Self::Handle {
        (**self).acquire(item_index)
    }

    fn release(&mut self, handle: Self::Handle) {
        (**self).release(handle);
    }
}

/// A live handle and where it was laid out.
#[derive(Debug, Clone)]
pub(crate) struct Placed<H> {
    pub handle: H,
    pub column: usize,
    pub rect: Rect,
}

/// Read-only view of one materialized item.
#[derive(Debug)]
pub struct MaterializedItem<'a, H> {
    pub item_index: usize,
    pub column: usize,
    pub rect: Rect,
    pub handle: &'a H,
}

/// Live handles keyed by item index.
#[derive(Debug, Clone)]
pub(crate) struct MaterializedSet<H> {
    items: BTreeMap<usize, Placed<H>>,
}

impl<H> Default for MaterializedSet<H> {
    fn default() -> Self {
        Self {
            items: BTreeMap::new(),
        }
    }
}

impl<H> MaterializedSet<H> {
    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[inline]
    pub fn contains(&self, item_index: usize) -> bool {
        self.items.contains_key(&item_index)
    }

    #[inline]
    pub fn rect(&self, item_index: usize) -> Option<Rect> {
        self.items.get(&item_index).map(|p| p.rect)
    }

    pub fn get(&self, item_index: usize) -> Option<MaterializedItem<'_, H>> {
        self.items.get(&item_index).map(|p| MaterializedItem {
            item_index,
            column: p.column,
            rect: p.rect,
            handle: &p.handle,
        })
    }

    /// Record a freshly acquired handle. Returns the handle back if the item
    /// was already live, so the caller can release it.
    pub fn insert(&mut self, item_index: usize, placed: Placed<H>) -> Result<(), H> {
        if self.items.contains_key(&item_index) {
            return Err(placed.handle);
        }
        self.items.insert(item_index, placed);
        Ok(())
    }

    pub fn remove(&mut self, item_index: usize) -> Option<H> {
        self.items.remove(&item_index).map(|p| p.handle)
    }

    /// Move every live item by `(dx, dy)`.
    pub fn offset_all(&mut self, dx: i32, dy: i32) {
        for placed in self.items.values_mut() {
            placed.rect = placed.rect.offset(dx, dy);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = MaterializedItem<'_, H>> {
        self.items.iter().map(|(&item_index, p)| MaterializedItem {
            item_index,
            column: p.column,
            rect: p.rect,
            handle: &p.handle,
        })
    }

    /// Remove everything, yielding the handles in item order.
    pub fn drain(&mut self) -> impl Iterator<Item = H> {
        std::mem::take(&mut self.items)
            .into_values()
            .map(|p| p.handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placed(handle: u32, column: usize, y: i32) -> Placed<u32> {
        Placed {
            handle,
            column,
            rect: Rect::new(0, y, 10, 10),
        }
    }

    #[test]
    fn insert_rejects_live_duplicate() {
        let mut set = MaterializedSet::default();
        assert!(set.insert(4, placed(1, 0, 0)).is_ok());
        assert_eq!(set.insert(4, placed(2, 0, 0)), Err(2));
        assert_eq!(set.len(), 1);
        assert_eq!(set.get(4).map(|m| *m.handle), Some(1));
    }

    #[test]
    fn offset_all_moves_rects() {
        let mut set = MaterializedSet::default();
        set.insert(0, placed(0, 0, 0)).unwrap();
        set.insert(1, placed(1, 1, 10)).unwrap();
        set.offset_all(5, -20);
        assert_eq!(set.rect(0), Some(Rect::new(5, -20, 10, 10)));
        assert_eq!(set.rect(1), Some(Rect::new(5, -10, 10, 10)));
    }

    #[test]
    fn drain_empties_in_item_order() {
        let mut set = MaterializedSet::default();
        set.insert(3, placed(30, 0, 0)).unwrap();
        set.insert(1, placed(10, 0, 0)).unwrap();
        let handles: Vec<u32> = set.drain().collect();
        assert_eq!(handles, vec![10, 30]);
        assert!(set.is_empty());
    }
}
