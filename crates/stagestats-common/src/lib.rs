//! Shared utilities for the Stagestats workspace
//!
//! Provides the pieces every Stagestats binary needs regardless of what it
//! does: centralized logging configuration and content hashing.

pub mod hash;
pub mod logging;
