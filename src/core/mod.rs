//! Core module
//!
//! Install and launch pipeline for Eaglercraft.

pub mod extract;
pub mod gpu;
pub mod install;
pub mod launch;
pub mod locate;
pub mod platform;
pub mod store;
