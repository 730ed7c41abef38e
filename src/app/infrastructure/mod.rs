//! Infrastructure layer - external integrations and utilities.
//!
//! This module contains code that interfaces with external systems:
//! - FLTK buffer utilities
//! - Platform-specific detection
//! - Logging setup
//! - Error types

pub mod buffer;
pub mod error;
pub mod logging;
pub mod platform;
