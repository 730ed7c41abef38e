//! Services layer - business operations and utilities.

pub mod text_file;
