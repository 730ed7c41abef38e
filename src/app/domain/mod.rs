//! Domain layer - core data structures and types.
//!
//! - Frame and group ids, and the view/toolkit seams
//! - The window registry
//! - Application settings
//! - Message types for the event system

pub mod messages;
pub mod registry;
pub mod settings;
pub mod view;

pub use messages::Message;
pub use registry::{Group, Registry, RemovedFrame, window_title};
pub use settings::{AppSettings, FontChoice, ThemeMode};
pub use view::{FrameId, FrameView, GroupId, Span, Toolkit};
