//! Small shared utilities for the `lumen` crates.
//!
//! - [`hash`]: hash containers with a fixed, process-stable seed.
//! - [`for_each_arity!`]: expands a macro once per supported call arity.
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// Modules

mod arity;

pub mod hash;
