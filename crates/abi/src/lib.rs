// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Leaf Project

//! C ABI definitions for the leaf `hello` entry point
//!
//! This crate describes the one foreign function the host calls into:
//!
//! ```c
//! void hello(const char* message);
//! ```
//!
//! The caller guarantees `message` is non-null, NUL-terminated and readable for
//! the duration of the call. The callee must not retain the pointer after it
//! returns and must not free it.

// #![cfg_attr(not(debug_assertions), deny(warnings))]

pub mod constants;
pub mod entry;

pub use constants::*;
pub use entry::*;
