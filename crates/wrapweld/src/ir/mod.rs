//! Intermediate Representation (IR) for wrapweld
//!
//! This module provides the metadata model consumed by synthesis
//! (library, class and callable descriptors) and the binding records
//! it produces.

pub mod binding;
pub mod module;
pub mod symbol;

pub use binding::*;
pub use module::*;
pub use symbol::*;
