// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Leaf Project

use core::{ffi::c_char, fmt};

use crate::constants::{THREAD_SAFETY_CONCURRENT, THREAD_SAFETY_SERIALIZED};

/// Signature of the exported `hello` function
///
/// # Parameters
/// - `message`: NUL-terminated string, borrowed for the duration of the call
///
/// # Safety
/// - `message` must point to a valid NUL-terminated byte sequence
/// - The callee must not free `message` or keep it after returning
pub type HelloFn = unsafe extern "C" fn(message: *const c_char);

/// Thread-safety declared by the owner of a native entry point
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ThreadSafety {
	/// Safe for concurrent calls
	Concurrent = THREAD_SAFETY_CONCURRENT,
	/// Requires external serialization
	#[default]
	Serialized = THREAD_SAFETY_SERIALIZED,
}

impl ThreadSafety {
	/// Decode a raw thread-safety flag, `None` for unknown values
	pub const fn from_raw(raw: u32) -> Option<Self> {
		match raw {
			THREAD_SAFETY_CONCURRENT => Some(ThreadSafety::Concurrent),
			THREAD_SAFETY_SERIALIZED => Some(ThreadSafety::Serialized),
			_ => None,
		}
	}

	#[inline]
	pub const fn requires_serialization(self) -> bool {
		matches!(self, ThreadSafety::Serialized)
	}
}

impl fmt::Display for ThreadSafety {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ThreadSafety::Concurrent => f.write_str("concurrent"),
			ThreadSafety::Serialized => f.write_str("serialized"),
		}
	}
}
