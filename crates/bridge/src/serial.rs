// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Leaf Project

//! Locks that keep `Serialized` entry points single-threaded
//!
//! The lock belongs to whatever the entry calls, not to the bridge driving it:
//! two entries resolving the same native function share one lock, however many
//! bridges or library handles sit in front of them.

use std::collections::HashMap;

use leaf_abi::HelloFn;
use once_cell::sync::Lazy;
use parking_lot::Mutex;

static SHARED: Mutex<()> = Mutex::new(());

static FUNCTIONS: Lazy<Mutex<HashMap<usize, &'static Mutex<()>>>> = Lazy::new(|| Mutex::new(HashMap::new()));

/// Lock for entries that cannot name what they call
pub fn shared_lock() -> &'static Mutex<()> {
	&SHARED
}

/// Lock for the native function at `function`'s address
///
/// One lock is created per distinct function and lives for the rest of the
/// process.
pub fn function_lock(function: HelloFn) -> &'static Mutex<()> {
	let address = function as usize;
	let mut functions = FUNCTIONS.lock();
	*functions.entry(address).or_insert_with(|| &*Box::leak(Box::new(Mutex::new(()))))
}

#[cfg(test)]
mod tests {
	use std::{
		ffi::c_char,
		ptr,
		sync::atomic::{AtomicUsize, Ordering},
	};

	use super::*;

	static FIRST: AtomicUsize = AtomicUsize::new(0);
	static SECOND: AtomicUsize = AtomicUsize::new(0);

	unsafe extern "C" fn first(_: *const c_char) {
		FIRST.fetch_add(1, Ordering::Relaxed);
	}

	unsafe extern "C" fn second(_: *const c_char) {
		SECOND.fetch_add(2, Ordering::Relaxed);
	}

	#[test]
	fn test_same_function_same_lock() {
		assert!(ptr::eq(function_lock(first), function_lock(first)));
	}

	#[test]
	fn test_distinct_functions_distinct_locks() {
		assert!(!ptr::eq(function_lock(first), function_lock(second)));
		assert!(!ptr::eq(function_lock(first), shared_lock()));
	}
}
