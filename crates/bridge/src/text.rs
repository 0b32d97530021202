// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Leaf Project

use std::{
	borrow::Cow,
	ffi::{OsStr, OsString},
	fmt::{self, Display, Formatter},
};

use leaf_abi::NUL;

use crate::error::{BridgeError, EncodingIssue};

/// Immutable UTF-8 text handed to the bridge by the caller
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TextValue<'a>(Cow<'a, str>);

impl<'a> TextValue<'a> {
	pub fn new(text: impl Into<Cow<'a, str>>) -> Self {
		Self(text.into())
	}

	/// Borrow an OS string, failing when it is not valid unicode
	pub fn from_os_str(text: &'a OsStr) -> Result<Self, BridgeError> {
		text.to_str().map(Self::new).ok_or(EncodingIssue::InvalidUnicode.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// Length in bytes, without the terminator
	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn into_owned(self) -> TextValue<'static> {
		TextValue(Cow::Owned(self.0.into_owned()))
	}

	/// The bytes to place in front of the terminator.
	///
	/// Text with an embedded NUL is rejected rather than truncated at it.
	pub fn encode(&self) -> Result<&[u8], BridgeError> {
		let bytes = self.0.as_bytes();
		match bytes.iter().position(|&b| b == NUL) {
			Some(position) => Err(EncodingIssue::InteriorNul {
				position,
			}
			.into()),
			None => Ok(bytes),
		}
	}
}

impl TextValue<'static> {
	pub fn from_os_string(text: OsString) -> Result<Self, BridgeError> {
		text.into_string().map(Self::new).map_err(|_| EncodingIssue::InvalidUnicode.into())
	}
}

impl<'a> From<&'a str> for TextValue<'a> {
	fn from(text: &'a str) -> Self {
		Self::new(text)
	}
}

impl<'a> From<&'a String> for TextValue<'a> {
	fn from(text: &'a String) -> Self {
		Self::new(text.as_str())
	}
}

impl From<String> for TextValue<'static> {
	fn from(text: String) -> Self {
		Self::new(text)
	}
}

impl Display for TextValue<'_> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}
