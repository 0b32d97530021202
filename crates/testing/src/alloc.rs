// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Leaf Project

use std::{
	collections::HashMap,
	ptr::NonNull,
	sync::atomic::{AtomicBool, AtomicUsize, Ordering},
};

use leaf_bridge::{LibcAllocator, NativeAllocator};
use parking_lot::Mutex;

/// C heap allocator that counts allocations and releases
///
/// Can be told to refuse allocations to simulate an out-of-memory native heap.
#[derive(Debug, Default)]
pub struct CountingAllocator {
	allocations: AtomicUsize,
	releases: AtomicUsize,
	mismatched: AtomicUsize,
	refuse: AtomicBool,
	/// Live allocations, address to size
	live: Mutex<HashMap<usize, usize>>,
}

impl CountingAllocator {
	pub fn new() -> Self {
		Self::default()
	}

	/// An allocator whose every allocation fails
	pub fn refusing() -> Self {
		let allocator = Self::new();
		allocator.set_refuse(true);
		allocator
	}

	pub fn set_refuse(&self, refuse: bool) {
		self.refuse.store(refuse, Ordering::SeqCst);
	}

	pub fn allocations(&self) -> usize {
		self.allocations.load(Ordering::SeqCst)
	}

	pub fn releases(&self) -> usize {
		self.releases.load(Ordering::SeqCst)
	}

	/// Releases whose pointer or size did not match a live allocation
	pub fn mismatched(&self) -> usize {
		self.mismatched.load(Ordering::SeqCst)
	}

	/// Allocations not yet released
	pub fn live(&self) -> usize {
		self.live.lock().len()
	}

	/// Assert `expected` allocations happened and every one was released once
	pub fn assert_balanced(&self, expected: usize) {
		assert_eq!(self.allocations(), expected, "allocation count");
		assert_eq!(self.releases(), expected, "release count");
		assert_eq!(self.live(), 0, "live allocations");
		assert_eq!(self.mismatched(), 0, "mismatched releases");
	}
}

impl NativeAllocator for CountingAllocator {
	fn allocate(&self, size: usize) -> Option<NonNull<u8>> {
		if self.refuse.load(Ordering::SeqCst) {
			return None;
		}

		let ptr = LibcAllocator.allocate(size)?;
		self.allocations.fetch_add(1, Ordering::SeqCst);
		self.live.lock().insert(ptr.as_ptr() as usize, size);
		Some(ptr)
	}

	unsafe fn release(&self, ptr: NonNull<u8>, size: usize) {
		self.releases.fetch_add(1, Ordering::SeqCst);
		match self.live.lock().remove(&(ptr.as_ptr() as usize)) {
			Some(allocated) if allocated == size => {}
			_ => {
				self.mismatched.fetch_add(1, Ordering::SeqCst);
			}
		}
		unsafe { LibcAllocator.release(ptr, size) }
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_counts_balanced_cycle() {
		let allocator = CountingAllocator::new();
		let ptr = allocator.allocate(4).unwrap();
		assert_eq!(allocator.live(), 1);

		unsafe { allocator.release(ptr, 4) };
		allocator.assert_balanced(1);
	}

	#[test]
	fn test_detects_size_mismatch() {
		let allocator = CountingAllocator::new();
		let ptr = allocator.allocate(4).unwrap();

		unsafe { allocator.release(ptr, 8) };
		assert_eq!(allocator.mismatched(), 1);
	}

	#[test]
	fn test_refusing() {
		let allocator = CountingAllocator::refusing();
		assert!(allocator.allocate(4).is_none());
		assert_eq!(allocator.allocations(), 0);

		allocator.set_refuse(false);
		let ptr = allocator.allocate(4).unwrap();
		unsafe { allocator.release(ptr, 4) };
		allocator.assert_balanced(1);
	}
}
