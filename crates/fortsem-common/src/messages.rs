//! Structured message payloads.
//!
//! Queries that detect user-visible rule violations (accessibility,
//! ambiguity) return one of these payloads to the caller. The engine only
//! assembles the payload; formatting and emission are the caller's
//! responsibility.

use serde::Serialize;

use crate::span::SourceLocation;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub enum Severity {
    Error,
    Warning,
    Message,
}

/// A secondary location attached to a primary message, e.g. the declaration
/// a violation refers back to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MessageAttachment {
    pub text: String,
    pub location: SourceLocation,
}

/// A primary message plus zero or more attached secondary locations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SemanticMessage {
    pub severity: Severity,
    pub text: String,
    pub location: SourceLocation,
    pub attachments: Vec<MessageAttachment>,
}

impl SemanticMessage {
    pub fn error(text: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            severity: Severity::Error,
            text: text.into(),
            location,
            attachments: Vec::new(),
        }
    }

    pub fn attach(mut self, text: impl Into<String>, location: SourceLocation) -> Self {
        self.attachments.push(MessageAttachment { text: text.into(), location });
        self
    }
}
