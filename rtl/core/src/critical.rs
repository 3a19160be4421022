//! Critical Section Management
//!
//! Scoped, globally exclusive regions with interrupt preemption suspended.
//! The platform mechanism comes from the `critical-section` crate: on a
//! single-core Cortex-M the application links `cortex-m` with the
//! `critical-section-single-core` feature (PRIMASK save/disable/restore),
//! hosted builds link `critical-section` with its `std` feature.
//!
//! Every entry is paired with exactly one exit by the [`CriticalGuard`]
//! drop, early returns and unwinding included. Nested entries restore the
//! state they observed, so only the outermost exit re-enables interrupts.
//!
//! Keep the work done inside short and bounded: while a guard is alive no
//! interrupt handler runs on this core.

use core::marker::PhantomData;

use critical_section::{CriticalSection, RestoreState};

/// RAII guard for a critical section
///
/// Automatically exits the critical section when dropped. The guard is
/// `!Send`: it has to be released on the context that entered.
///
/// Guards must be dropped in the reverse order they were created, which
/// ordinary lexical scoping already guarantees.
#[must_use = "the critical section is exited as soon as the guard is dropped"]
pub struct CriticalGuard {
    restore: RestoreState,
    _not_send: PhantomData<*mut ()>,
}

impl CriticalGuard {
    fn enter() -> Self {
        // SAFETY: the matching release happens exactly once, in `Drop`.
        // The guard cannot leave this context and is dropped in LIFO order.
        let restore = unsafe { critical_section::acquire() };

        CriticalGuard {
            restore,
            _not_send: PhantomData,
        }
    }

    /// Token for borrowing `critical_section::Mutex` protected data
    #[inline]
    pub fn token(&self) -> CriticalSection<'_> {
        // SAFETY: the section is held for as long as `self` is borrowed.
        unsafe { CriticalSection::new() }
    }
}

impl Drop for CriticalGuard {
    fn drop(&mut self) {
        // SAFETY: paired with the acquire in `enter`, released once.
        unsafe { critical_section::release(self.restore) }
    }
}

/// Enter a critical section
///
/// Returns a guard that will automatically exit the critical section when dropped.
///
/// # Examples
///
/// ```
/// use rtl_core::critical;
///
/// let guard = critical::enter();
/// // interrupts are masked here
/// critical::exit(guard);
/// ```
#[inline]
pub fn enter() -> CriticalGuard {
    CriticalGuard::enter()
}

/// Exit a critical section
///
/// Normally handled by dropping the guard returned from [`enter`]; this
/// spells the exit out at call sites that want it visible.
#[inline]
pub fn exit(guard: CriticalGuard) {
    drop(guard);
}

/// Run `f` inside a critical section and return its result
#[inline]
pub fn with<R>(f: impl FnOnce(CriticalSection<'_>) -> R) -> R {
    let guard = enter();
    f(guard.token())
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;
    use critical_section::Mutex;

    #[test]
    fn test_guard_raii() {
        static CELL: Mutex<Cell<u8>> = Mutex::new(Cell::new(0));

        {
            let guard = enter();
            CELL.borrow(guard.token()).set(1);
        }
        let guard = enter();
        assert_eq!(CELL.borrow(guard.token()).get(), 1);
        exit(guard);
    }

    #[test]
    fn test_nesting_collapses() {
        static CELL: Mutex<Cell<u32>> = Mutex::new(Cell::new(0));

        let outer = enter();
        {
            let inner = enter();
            CELL.borrow(inner.token()).set(1);
            with(|cs| CELL.borrow(cs).set(2));
        }
        // Still inside the outer section after the inner exits
        assert_eq!(CELL.borrow(outer.token()).get(), 2);
        exit(outer);
    }

    #[test]
    fn test_with_returns_value() {
        static CELL: Mutex<Cell<u32>> = Mutex::new(Cell::new(0));

        let value = with(|cs| {
            CELL.borrow(cs).set(7);
            CELL.borrow(cs).get() * 2
        });
        assert_eq!(value, 14);
    }

    #[test]
    fn test_guard_token_borrows_mutex() {
        static CELL: Mutex<Cell<u8>> = Mutex::new(Cell::new(1));

        let guard = enter();
        let cs = guard.token();
        CELL.borrow(cs).set(CELL.borrow(cs).get() + 1);
        assert!(CELL.borrow(cs).get() >= 2);
    }
}
