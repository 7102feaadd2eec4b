//! # WRAITH Shared
//!
//! Plain-data math types used by both the network layer and the renderer.
//!
//! ## CRITICAL RULE
//!
//! This crate must NEVER depend on:
//! - `wgpu`
//! - Any GPU or window-related crate
//!
//! Everything here is `Copy`, `#[repr(C)]` and `Pod` so it can be stored
//! inline in ring buffers and handed across FFI or GPU boundaries untouched.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod math;

pub use math::{Quaternion, Vec3};
