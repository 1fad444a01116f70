//! Service layer for multi-step operations.
//!
//! Routes stay thin; anything that composes more than one gateway call
//! lives here.

pub mod case_flow;
