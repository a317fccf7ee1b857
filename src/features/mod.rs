//! Feature implementations for mindful.

pub mod meditation;
