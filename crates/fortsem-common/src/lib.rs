//! Common types and utilities for the fortsem semantic query engine.
//!
//! This crate provides foundational types used across all fortsem crates:
//! - Source spans and locations (`Span`, `SourceLocation`)
//! - Structured message payloads (`SemanticMessage`, `MessageAttachment`)
//! - Centralized limits and thresholds

// Span - Source location tracking (byte offsets)
pub mod span;
pub use span::{SourceLocation, Span};

// Structured message payloads returned to semantic-analysis callers
pub mod messages;
pub use messages::{MessageAttachment, SemanticMessage, Severity};

// Centralized limits and thresholds
pub mod limits;
