#![no_std]
#![deny(unsafe_code)]
#![deny(unsafe_op_in_unsafe_fn)]

//! # RTL Containers
//!
//! Fixed-capacity containers shared between interrupt handlers and the main
//! loop of a single-core firmware: [`BoundedQueue`], a FIFO ring buffer,
//! and [`BoundedList`], an ordered array-backed list.
//!
//! Neither container allocates, blocks or retries. A full container and a
//! missing element are ordinary [`RtlError`] outcomes the caller handles.
//! Each operation protects itself with a short critical section from
//! [`rtl_core::critical`]; every call completes in bounded time.
//!
//! Capacity is a const generic and defaults to ten slots.

pub mod list;
pub mod queue;

pub use list::*;
pub use queue::*;
pub use rtl_core::{RtlError, RtlResult, RtlStats};
