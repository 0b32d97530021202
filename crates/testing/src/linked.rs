// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Leaf Project

//! A C-ABI `hello` for exercising [`LinkedEntry`](leaf_bridge::LinkedEntry)

use std::{
	cell::RefCell,
	ffi::{CStr, c_char},
};

thread_local! {
	static RECORDED: RefCell<Vec<Vec<u8>>> = const { RefCell::new(Vec::new()) };
}

/// Records the message on the calling thread
///
/// # Safety
/// - `message` must be a valid NUL-terminated string
pub unsafe extern "C" fn recording_hello(message: *const c_char) {
	if message.is_null() {
		return;
	}

	let bytes = unsafe { CStr::from_ptr(message) }.to_bytes_with_nul().to_vec();
	RECORDED.with(|recorded| recorded.borrow_mut().push(bytes));
}

/// Messages recorded by [`recording_hello`] on this thread, oldest first
pub fn take_recorded_messages() -> Vec<Vec<u8>> {
	RECORDED.with(|recorded| recorded.take())
}
