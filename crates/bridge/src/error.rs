// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Leaf Project

use std::fmt::{self, Display, Formatter};

/// Why a text value cannot be represented as a C string
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodingIssue {
	#[error("embedded NUL byte at offset {position}")]
	InteriorNul {
		position: usize,
	},

	#[error("text is not valid unicode")]
	InvalidUnicode,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BridgeError {
	#[error("cannot encode text as a C string: {issue}")]
	EncodingFailure {
		issue: EncodingIssue,
	},

	#[error("cannot allocate a foreign buffer for {text_len} bytes of text")]
	AllocationFailure {
		text_len: usize,
	},

	#[error("foreign call faulted: {message}")]
	ForeignFault {
		message: String,
	},
}

impl BridgeError {
	/// The stage of the boundary crossing that failed
	pub fn stage(&self) -> FailedStage {
		match self {
			BridgeError::EncodingFailure {
				..
			} => FailedStage::Encoding,
			BridgeError::AllocationFailure {
				..
			} => FailedStage::Allocation,
			BridgeError::ForeignFault {
				..
			} => FailedStage::Call,
		}
	}
}

impl From<EncodingIssue> for BridgeError {
	fn from(issue: EncodingIssue) -> Self {
		BridgeError::EncodingFailure {
			issue,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailedStage {
	Encoding,
	Allocation,
	Call,
}

impl FailedStage {
	pub const fn as_str(self) -> &'static str {
		match self {
			FailedStage::Encoding => "encoding",
			FailedStage::Allocation => "allocation",
			FailedStage::Call => "call",
		}
	}
}

impl Display for FailedStage {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}
