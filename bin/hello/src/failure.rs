// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Leaf Project

use leaf_bridge::{BridgeError, ConfigError, LoadError};

/// Everything that stops the greeting, by stage
#[derive(Debug, thiserror::Error)]
pub enum Failure {
	#[error(transparent)]
	Config(#[from] ConfigError),

	#[error(transparent)]
	Load(#[from] LoadError),

	#[error(transparent)]
	Bridge(#[from] BridgeError),
}

impl Failure {
	pub fn stage(&self) -> &'static str {
		match self {
			Failure::Config(_) => "config",
			Failure::Load(_) => "load",
			Failure::Bridge(err) => err.stage().as_str(),
		}
	}

	pub fn exit_status(&self) -> u8 {
		match self {
			Failure::Bridge(_) => 1,
			Failure::Config(_) | Failure::Load(_) => 2,
		}
	}
}
