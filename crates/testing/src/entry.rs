// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Leaf Project

use std::{
	ffi::CStr,
	sync::atomic::{AtomicBool, AtomicUsize, Ordering},
	thread,
	time::Duration,
};

use leaf_abi::ThreadSafety;
use leaf_bridge::ForeignEntry;
use parking_lot::Mutex;

/// Entry point that records every message it receives, terminator included
#[derive(Debug)]
pub struct RecordingEntry {
	messages: Mutex<Vec<Vec<u8>>>,
	thread_safety: ThreadSafety,
	hold: Duration,
	in_flight: AtomicBool,
	overlaps: AtomicUsize,
	serial: Mutex<()>,
}

impl RecordingEntry {
	pub fn new() -> Self {
		Self {
			messages: Mutex::new(Vec::new()),
			thread_safety: ThreadSafety::Concurrent,
			hold: Duration::ZERO,
			in_flight: AtomicBool::new(false),
			overlaps: AtomicUsize::new(0),
			serial: Mutex::new(()),
		}
	}

	pub fn with_thread_safety(mut self, thread_safety: ThreadSafety) -> Self {
		self.thread_safety = thread_safety;
		self
	}

	/// Stay inside each call for `hold`, widening the window for overlaps
	pub fn with_hold(mut self, hold: Duration) -> Self {
		self.hold = hold;
		self
	}

	pub fn messages(&self) -> Vec<Vec<u8>> {
		self.messages.lock().clone()
	}

	pub fn calls(&self) -> usize {
		self.messages.lock().len()
	}

	/// Calls that started while another call was still running
	pub fn overlaps(&self) -> usize {
		self.overlaps.load(Ordering::SeqCst)
	}
}

impl Default for RecordingEntry {
	fn default() -> Self {
		Self::new()
	}
}

impl ForeignEntry for RecordingEntry {
	fn call(&self, message: &CStr) {
		if self.in_flight.swap(true, Ordering::SeqCst) {
			self.overlaps.fetch_add(1, Ordering::SeqCst);
		}

		self.messages.lock().push(message.to_bytes_with_nul().to_vec());
		if !self.hold.is_zero() {
			thread::sleep(self.hold);
		}

		self.in_flight.store(false, Ordering::SeqCst);
	}

	fn thread_safety(&self) -> ThreadSafety {
		self.thread_safety
	}

	fn serial_lock(&self) -> &Mutex<()> {
		&self.serial
	}
}

/// Entry point that panics after observing the message
#[derive(Debug, Default)]
pub struct PanickingEntry {
	calls: AtomicUsize,
}

impl PanickingEntry {
	pub const MESSAGE: &'static str = "entry point fault";

	pub fn new() -> Self {
		Self::default()
	}

	pub fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}
}

impl ForeignEntry for PanickingEntry {
	fn call(&self, _message: &CStr) {
		self.calls.fetch_add(1, Ordering::SeqCst);
		panic!("{}", Self::MESSAGE);
	}

	fn thread_safety(&self) -> ThreadSafety {
		ThreadSafety::Concurrent
	}
}
