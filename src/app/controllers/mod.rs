//! Controllers layer - orchestration and coordination.

pub mod workspace;
