// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Leaf Project

//! Native memory used for foreign buffers

use std::{ptr::NonNull, sync::Arc};

/// Source of the memory lent to the foreign entry point
pub trait NativeAllocator {
	/// Allocate `size` bytes, `None` when the allocation fails
	fn allocate(&self, size: usize) -> Option<NonNull<u8>>;

	/// Return memory obtained from [`NativeAllocator::allocate`]
	///
	/// # Safety
	/// - `ptr` must come from `allocate` on this allocator with the same `size`
	/// - `ptr` must not be used after this call
	/// - This function must be called exactly once per allocation
	unsafe fn release(&self, ptr: NonNull<u8>, size: usize);
}

/// The C heap, `malloc` and `free`
#[derive(Debug, Default, Clone, Copy)]
pub struct LibcAllocator;

impl NativeAllocator for LibcAllocator {
	fn allocate(&self, size: usize) -> Option<NonNull<u8>> {
		if size == 0 {
			return None;
		}
		NonNull::new(unsafe { libc::malloc(size) }.cast::<u8>())
	}

	unsafe fn release(&self, ptr: NonNull<u8>, _size: usize) {
		unsafe { libc::free(ptr.as_ptr().cast()) }
	}
}

impl<A: NativeAllocator + ?Sized> NativeAllocator for &A {
	fn allocate(&self, size: usize) -> Option<NonNull<u8>> {
		(**self).allocate(size)
	}

	unsafe fn release(&self, ptr: NonNull<u8>, size: usize) {
		unsafe { (**self).release(ptr, size) }
	}
}

impl<A: NativeAllocator + ?Sized> NativeAllocator for Arc<A> {
	fn allocate(&self, size: usize) -> Option<NonNull<u8>> {
		(**self).allocate(size)
	}

	unsafe fn release(&self, ptr: NonNull<u8>, size: usize) {
		unsafe { (**self).release(ptr, size) }
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_libc_allocate_and_release() {
		let allocator = LibcAllocator;
		let ptr = allocator.allocate(16).unwrap();
		unsafe {
			ptr.as_ptr().write_bytes(0xAB, 16);
			assert_eq!(*ptr.as_ptr().add(15), 0xAB);
			allocator.release(ptr, 16);
		}
	}

	#[test]
	fn test_libc_zero_size_is_refused() {
		assert!(LibcAllocator.allocate(0).is_none());
	}
}
