//! Critical section and error tests for rtl-core
//! These run on x86 hosts through critical-section's std implementation.

use std::cell::Cell;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use critical_section::Mutex;
use rtl_core::{critical, RtlError};

#[test]
fn test_mutual_exclusion() {
    static COUNTER: Mutex<Cell<u32>> = Mutex::new(Cell::new(0));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            thread::spawn(|| {
                for _ in 0..500 {
                    let guard = critical::enter();
                    let cell = COUNTER.borrow(guard.token());
                    let current = cell.get();
                    thread::yield_now();
                    cell.set(current + 1);
                    critical::exit(guard);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(critical::with(|cs| COUNTER.borrow(cs).get()), 4000);
}

#[test]
fn test_guard_released_on_early_return() {
    fn find_even(values: &[u32]) -> Option<u32> {
        let _guard = critical::enter();
        for &value in values {
            if value % 2 == 0 {
                return Some(value);
            }
        }
        None
    }

    assert_eq!(find_even(&[1, 3, 4, 5]), Some(4));
    assert_eq!(find_even(&[1, 3]), None);

    // The section is free again: another thread can enter it.
    let entered = thread::spawn(|| critical::with(|_| true)).join().unwrap();
    assert!(entered);
}

#[test]
fn test_guard_released_on_panic() {
    let result = thread::spawn(|| {
        let _guard = critical::enter();
        panic!("handler fault");
    })
    .join();
    assert!(result.is_err());

    let shared = Arc::new(Mutex::new(Cell::new(1u8)));
    let worker = Arc::clone(&shared);
    thread::spawn(move || critical::with(|cs| worker.borrow(cs).set(2)))
        .join()
        .unwrap();
    assert_eq!(critical::with(|cs| shared.borrow(cs).get()), 2);
}

#[test]
fn test_inner_exit_keeps_outer_section() {
    static ENTERED: AtomicBool = AtomicBool::new(false);

    let outer = critical::enter();
    let inner = critical::enter();
    critical::exit(inner);

    let contender = thread::spawn(|| {
        critical::with(|_| ENTERED.store(true, Ordering::SeqCst));
    });

    // Only the outermost exit releases the section
    thread::sleep(Duration::from_millis(50));
    assert!(!ENTERED.load(Ordering::SeqCst));

    critical::exit(outer);
    contender.join().unwrap();
    assert!(ENTERED.load(Ordering::SeqCst));
}

#[test]
fn test_error_display() {
    assert_eq!(RtlError::QueueFull.to_string(), "Queue is full");
    assert_eq!(RtlError::ListFull.to_string(), "List is full");
    assert_eq!(RtlError::Empty.to_string(), "Container is empty");
    assert_eq!(
        RtlError::IndexOutOfRange { index: 3, len: 2 }.to_string(),
        "Index 3 out of range for length 2"
    );
    assert_eq!(RtlError::NotFound.to_string(), "Element not found");
}
