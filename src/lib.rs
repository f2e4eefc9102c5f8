//! Taskline - Warehouse Terminal Process Engine
//!
//! This crate interprets versioned process definitions (sequenced steps,
//! branching, comparisons, calculations, database statements, and terminal
//! dialog screens) to drive scanner and workstation terminals through
//! multi-step workflows, pausing for user input and resuming when it arrives.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
