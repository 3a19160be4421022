//! Interrupt-safe bounded list
//!
//! Elements occupy the contiguous prefix `[0, len)` in insertion order.
//! Removing an element shifts everything after it one slot toward the
//! front, so indices held across a removal are invalid.

use core::cell::RefCell;
use core::fmt;
use core::sync::atomic::{AtomicUsize, Ordering};

use critical_section::{CriticalSection, Mutex};
use heapless::Vec;
use rtl_core::{critical, RtlError, RtlResult, RtlStats};

struct Slots<T, const N: usize> {
    items: Vec<T, N>,
    stats: RtlStats,
}

impl<T: Copy, const N: usize> Slots<T, N> {
    const fn new() -> Self {
        Self {
            items: Vec::new(),
            stats: RtlStats::new(N),
        }
    }
}

/// Fixed-capacity ordered list shared between an interrupt handler and the
/// main loop.
///
/// Synchronization follows [`BoundedQueue`](crate::BoundedQueue):
/// [`add`](Self::add) masks interrupts before the capacity check,
/// [`remove_at`](Self::remove_at) checks for an empty list before masking.
///
/// # Caller obligations
///
/// Only one context may remove elements. The value scan in
/// [`remove_item`](Self::remove_item) runs with interrupts enabled and
/// relies on nobody else reordering the list between the scan and the
/// removal. Appends from an interrupt handler during the scan are fine.
pub struct BoundedList<T, const N: usize = 10> {
    slots: Mutex<RefCell<Slots<T, N>>>,
    len: AtomicUsize,
}

impl<T: Copy, const N: usize> BoundedList<T, N> {
    const CAPACITY_CHECK: () = rtl_core::assert_capacity::<N>();

    /// Create a new empty list
    pub const fn new() -> Self {
        let () = Self::CAPACITY_CHECK;
        Self {
            slots: Mutex::new(RefCell::new(Slots::new())),
            len: AtomicUsize::new(0),
        }
    }

    /// Append an item at the end of the list
    pub fn add(&self, item: T) -> RtlResult<()> {
        let added = critical::with(|cs| {
            let mut slots = self.slots.borrow_ref_mut(cs);
            if slots.items.push(item).is_err() {
                slots.stats.on_reject();
                return false;
            }
            slots.stats.on_insert();
            self.len.store(slots.items.len(), Ordering::Relaxed);
            true
        });

        if added {
            Ok(())
        } else {
            log::trace!("list full ({} slots), item dropped", N);
            Err(RtlError::ListFull)
        }
    }

    /// Remove the element at `index` and return it
    ///
    /// Elements after `index` move one position toward the front.
    pub fn remove_at(&self, index: usize) -> RtlResult<T> {
        if self.is_empty() {
            return Err(RtlError::Empty);
        }

        let removed: RtlResult<T> = critical::with(|cs| {
            let mut slots = self.slots.borrow_ref_mut(cs);
            let len = slots.items.len();
            if index >= len {
                return Err(RtlError::IndexOutOfRange { index, len });
            }
            let item = slots.items.remove(index);
            slots.stats.on_remove();
            self.len.store(len - 1, Ordering::Relaxed);
            Ok(item)
        });

        if let Err(err) = removed {
            log::trace!("list remove_at({}) rejected: {}", index, err);
        }
        removed
    }

    /// Copy the element at `index`, `None` when `index >= len()`
    pub fn get(&self, index: usize) -> Option<T> {
        critical::with(|cs| self.slots.borrow_ref(cs).items.get(index).copied())
    }

    /// Copy the element at `index` without bounds checking or masking
    /// interrupts.
    ///
    /// Meant for tight, trusted iteration where the caller already knows
    /// the list layout.
    ///
    /// # Safety
    ///
    /// `index` must be below [`len`](Self::len), and no other context may
    /// add or remove elements while the call runs (call it from the context
    /// that owns the list with interrupts masked, or before the interrupt
    /// handler that shares it is enabled).
    #[allow(unsafe_code)]
    pub unsafe fn get_unchecked(&self, index: usize) -> T {
        // SAFETY: the caller's exclusivity guarantee stands in for a held
        // critical section.
        let cs = unsafe { CriticalSection::new() };
        let slots = self.slots.borrow(cs).as_ptr();
        // SAFETY: no `RefCell` borrow is live (exclusivity) and
        // `index < len` keeps the read inside the vector.
        unsafe { *(&(*slots).items).get_unchecked(index) }
    }

    /// Occupied elements as a mutable slice
    ///
    /// The `&mut self` receiver proves no interrupt handler can reach the
    /// list, so no critical section is needed.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self.slots.get_mut().get_mut().items.as_mut_slice()
    }

    /// Copy of the occupied elements, taken in one critical section
    pub fn snapshot(&self) -> Vec<T, N> {
        critical::with(|cs| self.slots.borrow_ref(cs).items.clone())
    }

    /// Drop every element
    pub fn clear(&self) {
        critical::with(|cs| {
            let mut slots = self.slots.borrow_ref_mut(cs);
            slots.items.clear();
            slots.stats.on_clear();
            self.len.store(0, Ordering::Relaxed);
        });
    }

    /// Get the number of elements
    #[inline]
    pub fn len(&self) -> usize {
        self.len.load(Ordering::Relaxed)
    }

    /// Check if the list is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check if the list is full
    #[inline]
    pub fn is_full(&self) -> bool {
        self.len() == N
    }

    /// Get the maximum capacity of the list
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Snapshot of the list statistics
    pub fn stats(&self) -> RtlStats {
        critical::with(|cs| self.slots.borrow_ref(cs).stats)
    }

    /// Reset the high-water mark and rejection counter
    pub fn reset_stats(&self) {
        critical::with(|cs| self.slots.borrow_ref_mut(cs).stats.reset());
    }
}

impl<T: Copy + PartialEq, const N: usize> BoundedList<T, N> {
    /// Index of the first element equal to `item`
    ///
    /// Each element is read in its own short critical section, so the scan
    /// never masks interrupts for longer than one copy.
    pub fn position(&self, item: &T) -> Option<usize> {
        (0..self.len()).find(|&index| self.get(index).as_ref() == Some(item))
    }

    /// Check if any element equals `item`
    pub fn contains(&self, item: &T) -> bool {
        self.position(item).is_some()
    }

    /// Remove the first element equal to `item`, returning where it was
    pub fn remove_item(&self, item: &T) -> RtlResult<usize> {
        if self.is_empty() {
            return Err(RtlError::Empty);
        }

        let index = self.position(item).ok_or(RtlError::NotFound)?;
        self.remove_at(index)?;
        Ok(index)
    }
}

impl<T: Copy, const N: usize> Default for BoundedList<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy + fmt::Debug, const N: usize> fmt::Debug for BoundedList<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.snapshot().iter()).finish()
    }
}

#[cfg(feature = "defmt")]
impl<T: Copy, const N: usize> defmt::Format for BoundedList<T, N> {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "BoundedList{{len: {}, capacity: {}}}", self.len(), N);
    }
}
