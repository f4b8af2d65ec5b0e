//! Centralized limits and thresholds for the semantic query engine.
//!
//! This module provides shared constants for recursion depths and iteration
//! counts used throughout the codebase. Centralizing these values:
//! - Prevents duplicate definitions with inconsistent values
//! - Documents the rationale for each limit
//!
//! Every limit here backs a *contract* check: the graph handed to the query
//! layer is supposed to be finite and acyclic along the guarded edges, so
//! exceeding a limit indicates a malformed graph, not a large program.

/// Maximum number of association links (use/host) that `get_ultimate` will
/// follow before treating the chain as a contract violation.
///
/// Association chains are acyclic by construction of the resolver that built
/// the graph; real chains are at most a handful of links deep (one per
/// USE rename plus one host step per nesting level).
pub const MAX_ASSOCIATION_DEPTH: u32 = 256;

/// Maximum number of parent links a scope walk will follow.
///
/// Scope nesting is bounded by the program's lexical structure; the deepest
/// practical chains (module > subprogram > BLOCK > BLOCK ...) stay far below
/// this.
pub const MAX_SCOPE_WALK_DEPTH: u32 = 512;

/// Maximum number of interface/binding indirections followed when resolving
/// a procedure to its interface or subprogram body.
pub const MAX_PROC_RESOLUTION_DEPTH: u32 = 64;
