//! Storage association: grouping of EQUIVALENCE'd symbols into maximal
//! contiguous overlap regions.
//!
//! Most scopes have no EQUIVALENCE, and this is a fast no-op for them.

use fortsem_symbols::{ScopeId, SemanticsContext, SymbolId};
use rustc_hash::FxHashSet;

use crate::resolve::find_common_block_containing;

fn offset_and_size(ctx: &SemanticsContext, symbol: SymbolId) -> (u64, u64) {
    ctx.symbol(symbol)
        .object_details()
        .map(|object| (object.offset, object.size))
        .unwrap_or((0, 0))
}

/// Group the symbols named in `scope`'s EQUIVALENCE sets into maximal
/// contiguous storage-overlap regions.
///
/// Symbols are ordered by ascending offset, ties broken by descending size
/// (several symbols may share an offset), then by name for determinism. The
/// sweep starts a new group whenever the next symbol's offset has reached
/// the running end-offset of the current group, or the symbol belongs to a
/// different COMMON block (or none) than the group.
pub fn get_storage_associations(ctx: &SemanticsContext, scope: ScopeId) -> Vec<Vec<SymbolId>> {
    let mut distinct = FxHashSet::default();
    for set in &ctx.scope(scope).equivalence_sets {
        for object in set {
            distinct.insert(object.symbol);
        }
    }
    let mut associated: Vec<SymbolId> = distinct.into_iter().collect();
    associated.sort_by(|&a, &b| {
        let (offset_a, size_a) = offset_and_size(ctx, a);
        let (offset_b, size_b) = offset_and_size(ctx, b);
        offset_a
            .cmp(&offset_b)
            .then(size_b.cmp(&size_a))
            .then_with(|| ctx.symbol(a).name.cmp(&ctx.symbol(b).name))
    });
    let mut result: Vec<Vec<SymbolId>> = Vec::new();
    let mut limit = 0u64;
    let mut current_common: Option<SymbolId> = None;
    for symbol in associated {
        let this_common = find_common_block_containing(ctx, symbol);
        let (offset, size) = offset_and_size(ctx, symbol);
        if result.is_empty() || offset >= limit || this_common != current_common {
            // Start a new group
            result.push(Vec::new());
            limit = 0;
            current_common = this_common;
        }
        result
            .last_mut()
            .expect("group list is non-empty here")
            .push(symbol);
        limit = limit.max(offset + size);
    }
    result
}
