// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Leaf Project

//! Capabilities that accept a borrowed C string
//!
//! The `&CStr` argument is the whole contract: it is valid and NUL-terminated
//! for the duration of [`ForeignEntry::call`], and the callee has no way to
//! keep or free it past that.

use std::{ffi::CStr, fmt, sync::Arc};

use leaf_abi::{HelloFn, ThreadSafety};
use parking_lot::Mutex;

use crate::serial;

pub trait ForeignEntry {
	fn call(&self, message: &CStr);

	/// Whether concurrent calls are allowed, as declared by the entry's owner
	fn thread_safety(&self) -> ThreadSafety {
		ThreadSafety::Serialized
	}

	/// Lock held around each call of a `Serialized` entry
	///
	/// Every handle on the same callee must return the same lock. The default
	/// is a single lock shared by all entries that keep this default.
	fn serial_lock(&self) -> &Mutex<()> {
		serial::shared_lock()
	}
}

impl<E: ForeignEntry + ?Sized> ForeignEntry for &E {
	fn call(&self, message: &CStr) {
		(**self).call(message)
	}

	fn thread_safety(&self) -> ThreadSafety {
		(**self).thread_safety()
	}

	fn serial_lock(&self) -> &Mutex<()> {
		(**self).serial_lock()
	}
}

impl<E: ForeignEntry + ?Sized> ForeignEntry for Box<E> {
	fn call(&self, message: &CStr) {
		(**self).call(message)
	}

	fn thread_safety(&self) -> ThreadSafety {
		(**self).thread_safety()
	}

	fn serial_lock(&self) -> &Mutex<()> {
		(**self).serial_lock()
	}
}

impl<E: ForeignEntry + ?Sized> ForeignEntry for Arc<E> {
	fn call(&self, message: &CStr) {
		(**self).call(message)
	}

	fn thread_safety(&self) -> ThreadSafety {
		(**self).thread_safety()
	}

	fn serial_lock(&self) -> &Mutex<()> {
		(**self).serial_lock()
	}
}

/// Entry point linked into the process, e.g. through an `extern "C"` block
#[derive(Clone, Copy)]
pub struct LinkedEntry {
	function: HelloFn,
	thread_safety: ThreadSafety,
	serial: &'static Mutex<()>,
}

impl LinkedEntry {
	/// # Safety
	/// - `function` must implement the `void hello(const char*)` contract
	/// - It must not retain or free the message pointer
	/// - It must honour `thread_safety`
	pub unsafe fn new(function: HelloFn, thread_safety: ThreadSafety) -> Self {
		Self {
			function,
			thread_safety,
			serial: serial::function_lock(function),
		}
	}
}

impl ForeignEntry for LinkedEntry {
	fn call(&self, message: &CStr) {
		// SAFETY: guaranteed by the constructor's contract
		unsafe { (self.function)(message.as_ptr()) }
	}

	fn thread_safety(&self) -> ThreadSafety {
		self.thread_safety
	}

	fn serial_lock(&self) -> &Mutex<()> {
		self.serial
	}
}

impl fmt::Debug for LinkedEntry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("LinkedEntry")
			.field("function", &(self.function as *const ()))
			.field("thread_safety", &self.thread_safety)
			.finish()
	}
}

/// Entry point implemented by a Rust closure
pub struct FnEntry<F> {
	function: F,
	thread_safety: ThreadSafety,
	serial: Mutex<()>,
}

impl<F: Fn(&CStr)> FnEntry<F> {
	pub fn new(function: F) -> Self {
		Self {
			function,
			thread_safety: ThreadSafety::Concurrent,
			serial: Mutex::new(()),
		}
	}

	pub fn with_thread_safety(mut self, thread_safety: ThreadSafety) -> Self {
		self.thread_safety = thread_safety;
		self
	}
}

impl<F: Fn(&CStr)> ForeignEntry for FnEntry<F> {
	fn call(&self, message: &CStr) {
		(self.function)(message)
	}

	fn thread_safety(&self) -> ThreadSafety {
		self.thread_safety
	}

	fn serial_lock(&self) -> &Mutex<()> {
		&self.serial
	}
}

#[cfg(test)]
mod tests {
	use std::{
		ffi::c_char,
		ptr,
		sync::atomic::{AtomicUsize, Ordering},
	};

	use super::*;

	static LINKED_CALLS: AtomicUsize = AtomicUsize::new(0);
	static LINKED_LEN: AtomicUsize = AtomicUsize::new(0);

	unsafe extern "C" fn counting_hello(message: *const c_char) {
		let message = unsafe { CStr::from_ptr(message) };
		LINKED_LEN.store(message.to_bytes().len(), Ordering::SeqCst);
		LINKED_CALLS.fetch_add(1, Ordering::SeqCst);
	}

	#[test]
	fn test_linked_entry_passes_pointer() {
		let entry = unsafe { LinkedEntry::new(counting_hello, ThreadSafety::Concurrent) };
		entry.call(c"Hello from Rust");

		assert_eq!(LINKED_CALLS.load(Ordering::SeqCst), 1);
		assert_eq!(LINKED_LEN.load(Ordering::SeqCst), 15);
		assert_eq!(entry.thread_safety(), ThreadSafety::Concurrent);
	}

	#[test]
	fn test_fn_entry_defaults_to_concurrent() {
		let calls = AtomicUsize::new(0);
		let entry = FnEntry::new(|_: &CStr| {
			calls.fetch_add(1, Ordering::SeqCst);
		});
		entry.call(c"x");

		assert_eq!(calls.load(Ordering::SeqCst), 1);
		assert_eq!(entry.thread_safety(), ThreadSafety::Concurrent);
		assert_eq!(entry.with_thread_safety(ThreadSafety::Serialized).thread_safety(), ThreadSafety::Serialized);
	}

	#[test]
	fn test_forwarding_impls_keep_declaration() {
		let entry = FnEntry::new(|_: &CStr| {}).with_thread_safety(ThreadSafety::Serialized);
		let boxed: Box<dyn ForeignEntry> = Box::new(entry);
		assert_eq!(boxed.thread_safety(), ThreadSafety::Serialized);

		let shared = Arc::new(FnEntry::new(|_: &CStr| {}));
		assert_eq!(shared.thread_safety(), ThreadSafety::Concurrent);
	}

	#[test]
	fn test_entries_on_one_function_share_a_lock() {
		let first = unsafe { LinkedEntry::new(counting_hello, ThreadSafety::Serialized) };
		let second = unsafe { LinkedEntry::new(counting_hello, ThreadSafety::Serialized) };
		assert!(ptr::eq(first.serial_lock(), second.serial_lock()));

		let shared = Arc::new(FnEntry::new(|_: &CStr| {}));
		let other = shared.clone();
		assert!(ptr::eq(shared.serial_lock(), other.serial_lock()));
		assert!(!ptr::eq(shared.serial_lock(), FnEntry::new(|_: &CStr| {}).serial_lock()));
	}
}
