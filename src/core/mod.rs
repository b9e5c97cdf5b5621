// src/core/mod.rs — Job registry, dispatch, and shared types

pub mod orchestrator;
pub mod registry;
pub mod types;
