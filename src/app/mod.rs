//! Application layer.
//!
//! # Structure
//!
//! - `domain/` - Core data structures (ids, Registry, Settings, Messages)
//! - `controllers/` - Orchestration (Workspace)
//! - `services/` - Business operations (line-based file I/O)
//! - `infrastructure/` - External integrations (FLTK buffer, platform, logging, error)

pub mod controllers;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-exports for convenient external access
pub use controllers::workspace::Workspace;
pub use domain::{AppSettings, FontChoice, FrameId, GroupId, Message, ThemeMode};
pub use infrastructure::buffer::buffer_text_no_leak;
pub use infrastructure::error::{AppError, Result};
pub use infrastructure::platform::detect_system_dark_mode;
