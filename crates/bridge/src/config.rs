// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 Leaf Project

//! Where to find the entry point and what to send it

use std::{ffi::OsString, path::PathBuf};

use leaf_abi::{HELLO_SYMBOL, ThreadSafety};

pub const ENV_LIBRARY: &str = "LEAF_LIBRARY";
pub const ENV_SYMBOL: &str = "LEAF_SYMBOL";
pub const ENV_MESSAGE: &str = "LEAF_MESSAGE";
pub const ENV_CONCURRENT: &str = "LEAF_CONCURRENT";

pub const DEFAULT_MESSAGE: &str = "Hello from Rust";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
	#[error("no library configured, pass --library or set LEAF_LIBRARY")]
	MissingLibrary,

	#[error("invalid value for {name}: {reason}")]
	InvalidEnv {
		name: &'static str,
		reason: String,
	},
}

/// Configuration for one bridged entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeConfig {
	/// Shared library exporting the entry point.
	pub library: PathBuf,
	/// Exported symbol name.
	pub symbol: String,
	/// Thread-safety declared for the entry point.
	pub thread_safety: ThreadSafety,
	/// Text handed to the entry point, checked for unicode when it is encoded.
	pub message: OsString,
}

impl BridgeConfig {
	pub fn builder() -> BridgeConfigBuilder {
		BridgeConfigBuilder::default()
	}
}

/// Builds a [`BridgeConfig`]; later settings override earlier ones
#[derive(Debug, Clone, Default)]
pub struct BridgeConfigBuilder {
	library: Option<PathBuf>,
	symbol: Option<String>,
	thread_safety: Option<ThreadSafety>,
	message: Option<OsString>,
}

impl BridgeConfigBuilder {
	pub fn with_library(mut self, library: impl Into<PathBuf>) -> Self {
		self.library = Some(library.into());
		self
	}

	pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
		self.symbol = Some(symbol.into());
		self
	}

	pub fn with_thread_safety(mut self, thread_safety: ThreadSafety) -> Self {
		self.thread_safety = Some(thread_safety);
		self
	}

	pub fn with_message(mut self, message: impl Into<OsString>) -> Self {
		self.message = Some(message.into());
		self
	}

	/// Apply the `LEAF_*` process environment variables
	pub fn with_env(self) -> Result<Self, ConfigError> {
		self.with_env_lookup(|name| std::env::var_os(name))
	}

	/// Apply `LEAF_*` variables read through `lookup`
	pub fn with_env_lookup<F>(mut self, lookup: F) -> Result<Self, ConfigError>
	where
		F: Fn(&str) -> Option<OsString>,
	{
		if let Some(library) = lookup(ENV_LIBRARY) {
			self.library = Some(PathBuf::from(library));
		}
		if let Some(symbol) = lookup(ENV_SYMBOL) {
			self.symbol = Some(unicode(ENV_SYMBOL, symbol)?);
		}
		if let Some(message) = lookup(ENV_MESSAGE) {
			self.message = Some(message);
		}
		if let Some(concurrent) = lookup(ENV_CONCURRENT) {
			self.thread_safety = Some(parse_concurrent(&unicode(ENV_CONCURRENT, concurrent)?)?);
		}
		Ok(self)
	}

	pub fn build(self) -> Result<BridgeConfig, ConfigError> {
		Ok(BridgeConfig {
			library: self.library.ok_or(ConfigError::MissingLibrary)?,
			symbol: self.symbol.unwrap_or_else(|| HELLO_SYMBOL.to_string()),
			thread_safety: self.thread_safety.unwrap_or_default(),
			message: self.message.unwrap_or_else(|| OsString::from(DEFAULT_MESSAGE)),
		})
	}
}

fn unicode(name: &'static str, value: OsString) -> Result<String, ConfigError> {
	value.into_string().map_err(|_| ConfigError::InvalidEnv {
		name,
		reason: "not valid unicode".to_string(),
	})
}

fn parse_concurrent(value: &str) -> Result<ThreadSafety, ConfigError> {
	match value.trim().to_ascii_lowercase().as_str() {
		"1" | "true" | "yes" | "on" => Ok(ThreadSafety::Concurrent),
		"0" | "false" | "no" | "off" => Ok(ThreadSafety::Serialized),
		other => Err(ConfigError::InvalidEnv {
			name: ENV_CONCURRENT,
			reason: format!("expected a boolean, got `{other}`"),
		}),
	}
}

#[cfg(test)]
mod tests {
	use std::collections::HashMap;

	use super::*;

	fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<OsString> {
		let vars: HashMap<String, OsString> =
			vars.iter().map(|(k, v)| (k.to_string(), OsString::from(v))).collect();
		move |name: &str| vars.get(name).cloned()
	}

	#[test]
	fn test_defaults() {
		let config = BridgeConfig::builder().with_library("/opt/leaf/libleaf.so").build().unwrap();

		assert_eq!(config.library, PathBuf::from("/opt/leaf/libleaf.so"));
		assert_eq!(config.symbol, "hello");
		assert_eq!(config.message, OsString::from("Hello from Rust"));
		assert_eq!(config.thread_safety, ThreadSafety::Serialized);
	}

	#[test]
	fn test_missing_library() {
		assert_eq!(BridgeConfig::builder().build(), Err(ConfigError::MissingLibrary));
	}

	#[test]
	fn test_env_is_applied() {
		let config = BridgeConfig::builder()
			.with_env_lookup(env(&[
				(ENV_LIBRARY, "libleaf.so"),
				(ENV_SYMBOL, "greet"),
				(ENV_MESSAGE, "hey"),
				(ENV_CONCURRENT, "TRUE"),
			]))
			.unwrap()
			.build()
			.unwrap();

		assert_eq!(config.library, PathBuf::from("libleaf.so"));
		assert_eq!(config.symbol, "greet");
		assert_eq!(config.message, OsString::from("hey"));
		assert_eq!(config.thread_safety, ThreadSafety::Concurrent);
	}

	#[test]
	fn test_later_settings_override_env() {
		let config = BridgeConfig::builder()
			.with_env_lookup(env(&[(ENV_LIBRARY, "from-env.so"), (ENV_CONCURRENT, "1")]))
			.unwrap()
			.with_library("from-args.so")
			.with_thread_safety(ThreadSafety::Serialized)
			.build()
			.unwrap();

		assert_eq!(config.library, PathBuf::from("from-args.so"));
		assert_eq!(config.thread_safety, ThreadSafety::Serialized);
	}

	#[test]
	fn test_unset_env_keeps_builder_values() {
		let config = BridgeConfig::builder()
			.with_library("kept.so")
			.with_message("kept")
			.with_env_lookup(env(&[]))
			.unwrap()
			.build()
			.unwrap();

		assert_eq!(config.library, PathBuf::from("kept.so"));
		assert_eq!(config.message, OsString::from("kept"));
	}

	#[cfg(unix)]
	#[test]
	fn test_non_unicode_message_is_kept_for_encoding() {
		use std::os::unix::ffi::OsStrExt;

		let raw = std::ffi::OsStr::from_bytes(b"caf\xe9").to_os_string();
		let lookup = move |name: &str| (name == ENV_MESSAGE).then(|| raw.clone());

		let config = BridgeConfig::builder()
			.with_library("libleaf.so")
			.with_env_lookup(lookup)
			.unwrap()
			.build()
			.unwrap();

		assert_eq!(config.message.as_encoded_bytes(), b"caf\xe9");
	}

	#[test]
	fn test_bad_concurrent_flag() {
		let err = BridgeConfig::builder().with_env_lookup(env(&[(ENV_CONCURRENT, "maybe")])).unwrap_err();

		assert_eq!(
			err,
			ConfigError::InvalidEnv {
				name: ENV_CONCURRENT,
				reason: "expected a boolean, got `maybe`".to_string()
			}
		);
	}

	#[test]
	fn test_parse_concurrent_flags() {
		assert_eq!(parse_concurrent(" yes "), Ok(ThreadSafety::Concurrent));
		assert_eq!(parse_concurrent("off"), Ok(ThreadSafety::Serialized));
		assert_eq!(parse_concurrent("0"), Ok(ThreadSafety::Serialized));
	}
}
