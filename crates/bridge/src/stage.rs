// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Leaf Project

//! Per-invocation lifecycle of a boundary crossing
//!
//! ```text
//! Idle -> Encoded -> Allocated -> CallInFlight -> Released -> Done
//!   |        |                                        |
//!   +--------+------------> Failed <------------------+
//! ```
//!
//! Once `Allocated` is reached the only way to `Failed` is through `Released`,
//! so a failed invocation never leaves a buffer behind.

use std::fmt::{self, Display, Formatter};

use tracing::{error, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
	Idle,
	Encoded,
	Allocated,
	CallInFlight,
	Released,
	Done,
	Failed,
}

impl Stage {
	pub const fn can_advance_to(self, next: Stage) -> bool {
		matches!(
			(self, next),
			(Stage::Idle, Stage::Encoded)
				| (Stage::Encoded, Stage::Allocated)
				| (Stage::Allocated, Stage::CallInFlight)
				| (Stage::CallInFlight, Stage::Released)
				| (Stage::Released, Stage::Done)
				| (Stage::Idle, Stage::Failed)
				| (Stage::Encoded, Stage::Failed)
				| (Stage::Released, Stage::Failed)
		)
	}

	pub const fn is_terminal(self) -> bool {
		matches!(self, Stage::Done | Stage::Failed)
	}
}

impl Display for Stage {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			Stage::Idle => f.write_str("idle"),
			Stage::Encoded => f.write_str("encoded"),
			Stage::Allocated => f.write_str("allocated"),
			Stage::CallInFlight => f.write_str("call in flight"),
			Stage::Released => f.write_str("released"),
			Stage::Done => f.write_str("done"),
			Stage::Failed => f.write_str("failed"),
		}
	}
}

/// Callback receiving every stage an invocation enters
pub type StageObserver = dyn Fn(Stage) + Send + Sync;

/// Tracks the stage of one invocation and reports every transition
pub(crate) struct Invocation<'a> {
	id: u64,
	stage: Stage,
	observer: Option<&'a StageObserver>,
}

impl<'a> Invocation<'a> {
	pub(crate) fn new(id: u64, observer: Option<&'a StageObserver>) -> Self {
		Self {
			id,
			stage: Stage::Idle,
			observer,
		}
	}

	/// Move to `next`. An illegal transition is refused and leaves the stage as it was.
	pub(crate) fn advance(&mut self, next: Stage) -> bool {
		if !self.stage.can_advance_to(next) {
			error!(invocation = self.id, from = %self.stage, to = %next, "illegal stage transition refused");
			return false;
		}
		trace!(invocation = self.id, from = %self.stage, to = %next, "stage transition");

		self.stage = next;
		if let Some(observer) = self.observer {
			observer(next);
		}
		true
	}

	pub(crate) fn stage(&self) -> Stage {
		self.stage
	}
}
