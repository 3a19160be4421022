#![no_std]
#![deny(unsafe_op_in_unsafe_fn)]

//! # RTL Core
//!
//! Shared building blocks for the RTL fixed-capacity containers: the error
//! type every container reports through, the interrupt-masking critical
//! section they synchronize with, and the capacity statistics they keep.

#[cfg(feature = "std")]
extern crate std;

use core::fmt;

pub mod critical;
pub mod stats;

pub use critical::CriticalGuard;
pub use stats::RtlStats;

/// RTL library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Result type used throughout the RTL containers
pub type RtlResult<T> = Result<T, RtlError>;

/// Error types for container operations
///
/// None of these are fatal. A full container or a missing element is an
/// expected steady-state outcome and the caller decides whether to drop,
/// retry or report it upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RtlError {
    /// Queue is at capacity, the item was not stored
    QueueFull,
    /// List is at capacity, the item was not stored
    ListFull,
    /// Container holds no elements
    Empty,
    /// Index is not below the current element count
    IndexOutOfRange {
        /// Requested index
        index: usize,
        /// Element count at the time of the request
        len: usize,
    },
    /// No element compared equal to the requested value
    NotFound,
}

impl fmt::Display for RtlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RtlError::QueueFull => write!(f, "Queue is full"),
            RtlError::ListFull => write!(f, "List is full"),
            RtlError::Empty => write!(f, "Container is empty"),
            RtlError::IndexOutOfRange { index, len } => {
                write!(f, "Index {} out of range for length {}", index, len)
            }
            RtlError::NotFound => write!(f, "Element not found"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for RtlError {}

#[cfg(feature = "defmt")]
impl defmt::Format for RtlError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            RtlError::QueueFull => defmt::write!(fmt, "QueueFull"),
            RtlError::ListFull => defmt::write!(fmt, "ListFull"),
            RtlError::Empty => defmt::write!(fmt, "Empty"),
            RtlError::IndexOutOfRange { index, len } => {
                defmt::write!(fmt, "IndexOutOfRange({}, len {})", index, len)
            }
            RtlError::NotFound => defmt::write!(fmt, "NotFound"),
        }
    }
}

/// Compile-time capacity check shared by the containers.
///
/// Evaluate through an associated const so a zero capacity fails the build
/// at the point of instantiation.
pub const fn assert_capacity<const N: usize>() {
    assert!(N > 0, "container capacity must be non-zero");
}
