// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Leaf Project

use std::{
	ffi::{CStr, c_char},
	fmt,
	ptr::{self, NonNull},
	slice,
};

use leaf_abi::NUL;
use tracing::trace;

use crate::{alloc::NativeAllocator, error::BridgeError, text::TextValue};

/// NUL-terminated copy of a text value in native memory
///
/// The buffer is owned by whoever holds the guard. Dropping it returns the
/// memory to the allocator that produced it, exactly once, on every exit path
/// including unwinding. Callees only ever see a borrowed [`CStr`] view, which
/// cannot outlive the guard.
pub struct ForeignBuffer<'a, A: NativeAllocator + ?Sized> {
	ptr: NonNull<u8>,
	/// Allocation size, terminator included
	size: usize,
	allocator: &'a A,
}

impl<'a, A: NativeAllocator + ?Sized> ForeignBuffer<'a, A> {
	/// Encode `text` and copy it into a fresh buffer
	pub fn new(text: &TextValue<'_>, allocator: &'a A) -> Result<Self, BridgeError> {
		Self::from_encoded(text.encode()?, allocator)
	}

	/// Copy already encoded bytes into a fresh buffer.
	///
	/// `bytes` must not contain a NUL byte.
	pub(crate) fn from_encoded(bytes: &[u8], allocator: &'a A) -> Result<Self, BridgeError> {
		debug_assert!(!bytes.contains(&NUL));

		let failure = || BridgeError::AllocationFailure {
			text_len: bytes.len(),
		};
		let size = bytes.len().checked_add(1).ok_or_else(failure)?;
		let ptr = allocator.allocate(size).ok_or_else(failure)?;

		unsafe {
			ptr::copy_nonoverlapping(bytes.as_ptr(), ptr.as_ptr(), bytes.len());
			ptr.as_ptr().add(bytes.len()).write(NUL);
		}

		trace!(size, "foreign buffer allocated");
		Ok(Self {
			ptr,
			size,
			allocator,
		})
	}

	pub fn as_ptr(&self) -> *const c_char {
		self.ptr.as_ptr().cast_const().cast()
	}

	pub fn as_c_str(&self) -> &CStr {
		// SAFETY: the buffer holds exactly one NUL, at its end
		unsafe { CStr::from_bytes_with_nul_unchecked(self.as_bytes_with_nul()) }
	}

	pub fn as_bytes_with_nul(&self) -> &[u8] {
		// SAFETY: `ptr` is valid for `size` initialized bytes until drop
		unsafe { slice::from_raw_parts(self.ptr.as_ptr(), self.size) }
	}

	/// Allocation size, terminator included
	pub fn size(&self) -> usize {
		self.size
	}
}

impl<A: NativeAllocator + ?Sized> Drop for ForeignBuffer<'_, A> {
	fn drop(&mut self) {
		// SAFETY: allocated by `self.allocator` with `self.size`, released only here
		unsafe { self.allocator.release(self.ptr, self.size) };
		trace!(size = self.size, "foreign buffer released");
	}
}

impl<A: NativeAllocator + ?Sized> fmt::Debug for ForeignBuffer<'_, A> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ForeignBuffer").field("ptr", &self.ptr).field("size", &self.size).finish()
	}
}
