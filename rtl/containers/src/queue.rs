//! Interrupt-safe bounded FIFO queue

use core::cell::RefCell;
use core::fmt;
use core::sync::atomic::{AtomicUsize, Ordering};

use critical_section::Mutex;
use heapless::Deque;
use rtl_core::{critical, RtlError, RtlResult, RtlStats};

/// Ring storage guarded by the queue's mutex. The element count is mirrored
/// in [`BoundedQueue::len`] so the emptiness check can be made without
/// entering a critical section.
struct Ring<T, const N: usize> {
    items: Deque<T, N>,
    stats: RtlStats,
}

impl<T: Copy, const N: usize> Ring<T, N> {
    const fn new() -> Self {
        Self {
            items: Deque::new(),
            stats: RtlStats::new(N),
        }
    }

    fn push(&mut self, item: T) -> bool {
        match self.items.push_back(item) {
            Ok(()) => {
                self.stats.on_insert();
                true
            }
            Err(_) => {
                self.stats.on_reject();
                false
            }
        }
    }

    fn pop(&mut self) -> Option<T> {
        let item = self.items.pop_front()?;
        self.stats.on_remove();
        Some(item)
    }

    fn clear(&mut self) {
        self.items.clear();
        self.stats.on_clear();
    }
}

/// Fixed-capacity FIFO ring buffer shared between an interrupt handler and
/// the main loop.
///
/// Every operation takes `&self`, so a queue normally lives in a `static`:
///
/// ```
/// use rtl_containers::BoundedQueue;
///
/// static RX: BoundedQueue<u8, 4> = BoundedQueue::new();
///
/// // interrupt handler
/// RX.add(b'x').ok();
///
/// // main loop
/// while let Some(byte) = RX.remove() {
///     assert_eq!(byte, b'x');
/// }
/// ```
///
/// # Synchronization
///
/// [`add`](Self::add) masks interrupts *before* testing for a full queue,
/// so the check and the insert are one atomic step and any context may
/// produce. [`remove`](Self::remove) and [`peek`](Self::peek) test for an
/// empty queue *first* and only then mask interrupts. They run on every pass
/// of the main loop and find the queue empty almost every time; a stale
/// "empty" just leaves the item for the next pass.
///
/// # Caller obligations
///
/// At most one context may consume (call `remove`, `peek` or `clear`) and
/// at most one interrupt handler may use a given queue. Two consumers
/// reintroduce a check-then-act race that the queue does not guard against.
pub struct BoundedQueue<T, const N: usize = 10> {
    ring: Mutex<RefCell<Ring<T, N>>>,
    len: AtomicUsize,
}

impl<T: Copy, const N: usize> BoundedQueue<T, N> {
    const CAPACITY_CHECK: () = rtl_core::assert_capacity::<N>();

    /// Create a new empty queue
    pub const fn new() -> Self {
        let () = Self::CAPACITY_CHECK;
        Self {
            ring: Mutex::new(RefCell::new(Ring::new())),
            len: AtomicUsize::new(0),
        }
    }

    /// Append an item at the back of the queue
    ///
    /// Returns [`RtlError::QueueFull`] without touching the stored items
    /// when the queue is at capacity.
    pub fn add(&self, item: T) -> RtlResult<()> {
        let queued = critical::with(|cs| {
            let mut ring = self.ring.borrow_ref_mut(cs);
            let queued = ring.push(item);
            self.len.store(ring.items.len(), Ordering::Relaxed);
            queued
        });

        if queued {
            Ok(())
        } else {
            log::trace!("queue full ({} slots), item dropped", N);
            Err(RtlError::QueueFull)
        }
    }

    /// Take the oldest item from the queue
    pub fn remove(&self) -> Option<T> {
        if self.is_empty() {
            return None;
        }

        critical::with(|cs| {
            let mut ring = self.ring.borrow_ref_mut(cs);
            let item = ring.pop();
            self.len.store(ring.items.len(), Ordering::Relaxed);
            item
        })
    }

    /// Copy the oldest item without removing it
    pub fn peek(&self) -> Option<T> {
        if self.is_empty() {
            return None;
        }

        critical::with(|cs| self.ring.borrow_ref(cs).items.front().copied())
    }

    /// Drop every queued item
    pub fn clear(&self) {
        critical::with(|cs| {
            self.ring.borrow_ref_mut(cs).clear();
            self.len.store(0, Ordering::Relaxed);
        });
    }

    /// Check if the queue is empty
    ///
    /// Unsynchronized: the answer may already be stale when it returns.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check if the queue is full
    ///
    /// Unsynchronized, like [`is_empty`](Self::is_empty).
    #[inline]
    pub fn is_full(&self) -> bool {
        self.len() == N
    }

    /// Get the number of queued items
    #[inline]
    pub fn len(&self) -> usize {
        self.len.load(Ordering::Relaxed)
    }

    /// Get the maximum capacity of the queue
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Snapshot of the queue statistics
    pub fn stats(&self) -> RtlStats {
        critical::with(|cs| self.ring.borrow_ref(cs).stats)
    }

    /// Reset the high-water mark and rejection counter
    pub fn reset_stats(&self) {
        critical::with(|cs| self.ring.borrow_ref_mut(cs).stats.reset());
    }
}

impl<T: Copy, const N: usize> Default for BoundedQueue<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy, const N: usize> fmt::Debug for BoundedQueue<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundedQueue")
            .field("len", &self.len())
            .field("capacity", &N)
            .finish()
    }
}

#[cfg(feature = "defmt")]
impl<T: Copy, const N: usize> defmt::Format for BoundedQueue<T, N> {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "BoundedQueue{{len: {}, capacity: {}}}", self.len(), N);
    }
}
