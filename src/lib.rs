// src/lib.rs — Library root for powjob

pub mod cli;
pub mod core;
pub mod diagnostics;
pub mod infra;
pub mod runner;
