// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Leaf Project

//! Testing utilities for the string boundary bridge
//!
//! Doubles for both sides of the boundary: entry points that record what
//! crossed, and an allocator that counts (or refuses) native allocations.
//!
//! # Example
//!
//! ```ignore
//! use leaf_bridge::StringBoundaryBridge;
//! use leaf_testing::*;
//!
//! let bridge = StringBoundaryBridge::with_allocator(RecordingEntry::new(), CountingAllocator::new());
//! bridge.invoke("Hello from Rust")?;
//!
//! assert_eq!(bridge.entry().messages(), vec![b"Hello from Rust\0".to_vec()]);
//! bridge.allocator().assert_balanced(1);
//! ```

pub mod alloc;
pub mod entry;
pub mod linked;

pub use alloc::CountingAllocator;
pub use entry::{PanickingEntry, RecordingEntry};
pub use linked::{recording_hello, take_recorded_messages};
