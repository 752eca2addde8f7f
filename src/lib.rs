//! Random-access read/modify/write cost of bit-packed booleans versus one
//! byte per boolean.
//!
//! One shared index workload is applied to a [`byte_array::ByteArray`] and a
//! [`bit_array::PackedBitArray`], both backed by memory from
//! [`mem::PreFaultAllocator`] so page faults stay out of the timed loops.

pub mod bench;
pub mod bit_array;
pub mod bitset;
pub mod byte_array;
pub mod config;
pub mod error;
pub mod logging;
pub mod mem;
#[cfg(feature = "panic_handler")]
pub mod panic;
pub mod storage;
pub mod timer;
pub mod workload;
