//! # voxspec-contracts
//!
//! Shared types and error definitions for the voxspec prompt pipeline.
//!
//! All crates in the workspace import from here. No prompt logic lives in
//! this crate, only data definitions, small completeness predicates, and the
//! error type.

pub mod builder;
pub mod error;
pub mod harness;
pub mod spec;
