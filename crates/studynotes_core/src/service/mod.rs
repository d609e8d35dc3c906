//! Core use-case services.
//!
//! # Responsibility
//! - Merge partial note updates without clobbering unrelated blocks.
//! - Orchestrate store, segmentation and generation into use-case APIs.
//! - Keep CLI/UI layers decoupled from storage details.

pub mod merge;
pub mod note_service;
