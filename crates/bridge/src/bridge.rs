// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Leaf Project

use std::{
	any::Any,
	panic::{AssertUnwindSafe, catch_unwind},
	sync::atomic::{AtomicU64, Ordering},
};

use tracing::{debug, debug_span, error};

use crate::{
	alloc::{LibcAllocator, NativeAllocator},
	buffer::ForeignBuffer,
	entry::ForeignEntry,
	error::BridgeError,
	stage::{Invocation, Stage, StageObserver},
	text::TextValue,
};

/// Performs one safe call across the language boundary per invocation
///
/// Every invocation owns its own [`ForeignBuffer`]. Entries declared
/// [`Serialized`](leaf_abi::ThreadSafety::Serialized) are called under their
/// own [`serial_lock`](ForeignEntry::serial_lock), so the guarantee holds
/// across every bridge sharing the entry.
pub struct StringBoundaryBridge<E, A = LibcAllocator> {
	entry: E,
	allocator: A,
	invocations: AtomicU64,
	observer: Option<Box<StageObserver>>,
}

impl<E: ForeignEntry> StringBoundaryBridge<E> {
	pub fn new(entry: E) -> Self {
		Self::with_allocator(entry, LibcAllocator)
	}
}

impl<E: ForeignEntry, A: NativeAllocator> StringBoundaryBridge<E, A> {
	pub fn with_allocator(entry: E, allocator: A) -> Self {
		Self {
			entry,
			allocator,
			invocations: AtomicU64::new(0),
			observer: None,
		}
	}

	/// Report every stage each invocation enters
	pub fn with_stage_observer<F>(mut self, observer: F) -> Self
	where
		F: Fn(Stage) + Send + Sync + 'static,
	{
		self.observer = Some(Box::new(observer));
		self
	}

	pub fn entry(&self) -> &E {
		&self.entry
	}

	pub fn allocator(&self) -> &A {
		&self.allocator
	}

	/// Number of invocations started so far
	pub fn invocations(&self) -> u64 {
		self.invocations.load(Ordering::Relaxed)
	}

	/// Encode `text`, lend it to the entry point, release it.
	///
	/// The buffer is released before this returns, whatever the outcome.
	pub fn invoke<'t>(&self, text: impl Into<TextValue<'t>>) -> Result<(), BridgeError> {
		let text = text.into();
		let id = self.invocations.fetch_add(1, Ordering::Relaxed) + 1;

		let span = debug_span!("bridge::invoke", invocation = id, len = text.len());
		let _enter = span.enter();

		let mut invocation = Invocation::new(id, self.observer.as_deref());

		let bytes = match text.encode() {
			Ok(bytes) => bytes,
			Err(err) => {
				debug!(%err, "text rejected");
				invocation.advance(Stage::Failed);
				return Err(err);
			}
		};
		invocation.advance(Stage::Encoded);

		let buffer = match ForeignBuffer::from_encoded(bytes, &self.allocator) {
			Ok(buffer) => buffer,
			Err(err) => {
				error!(%err, "foreign buffer allocation failed");
				invocation.advance(Stage::Failed);
				return Err(err);
			}
		};
		invocation.advance(Stage::Allocated);

		let outcome = self.call(&buffer, &mut invocation);

		drop(buffer);
		invocation.advance(Stage::Released);

		match outcome {
			Ok(()) => {
				invocation.advance(Stage::Done);
				debug!(stage = %invocation.stage(), "invocation complete");
				Ok(())
			}
			Err(err) => {
				invocation.advance(Stage::Failed);
				Err(err)
			}
		}
	}

	fn call(&self, buffer: &ForeignBuffer<'_, A>, invocation: &mut Invocation<'_>) -> Result<(), BridgeError> {
		let serialize = self.entry.thread_safety().requires_serialization();
		let _serial = serialize.then(|| self.entry.serial_lock().lock());

		invocation.advance(Stage::CallInFlight);
		let message = buffer.as_c_str();

		catch_unwind(AssertUnwindSafe(|| self.entry.call(message))).map_err(|payload| {
			let message = panic_message(payload.as_ref());
			error!("foreign call panicked: {}", message);
			BridgeError::ForeignFault {
				message,
			}
		})
	}
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
	if let Some(s) = payload.downcast_ref::<&str>() {
		s.to_string()
	} else if let Some(s) = payload.downcast_ref::<String>() {
		s.clone()
	} else {
		"Unknown panic".to_string()
	}
}
