//! Final toolchain selection.
//!
//! Runs once every probe has reported. Priority is GNU, then Clang, then
//! MSVC, applied per family for the exact-match pass and per field when
//! assembling a combo.

use std::path::PathBuf;

use crate::core::{Compilers, Family, PerFamily, ProbeResult, ToolchainIdentity, ToolchainResult};

/// First value `pick` yields when walking families in priority order.
pub fn first_in_priority<'a, T: ?Sized>(
    results: &'a PerFamily<ProbeResult>,
    pick: impl Fn(&'a ProbeResult) -> Option<&'a T>,
) -> Option<(Family, &'a T)> {
    results
        .iter()
        .find_map(|(family, result)| pick(result).map(|v| (family, v)))
}

/// Pick the single best toolchain from completed probe results.
///
/// 1. The first family with both a C++ compiler and a debugger.
/// 2. Otherwise a combo filling C, C++ and debugger independently.
/// 3. If the combo has no compiler, whatever `fallback` yields.
/// 4. Otherwise the (possibly empty) combo.
pub fn select(
    results: &PerFamily<ProbeResult>,
    fallback: impl FnOnce() -> Option<ToolchainResult>,
) -> ToolchainResult {
    if let Some((family, result)) = first_in_priority(results, |r| r.is_complete().then_some(r)) {
        tracing::debug!("{} toolchain is complete", family);
        return ToolchainResult::from_probe(family, result);
    }

    let combo = assemble_combo(results);
    if combo.is_usable() {
        return combo;
    }

    match fallback() {
        Some(embedded) => embedded,
        None => combo,
    }
}

/// Fill every field from the highest-priority family that has it.
///
/// A family that found no compiler is not a candidate, so its debugger is
/// never borrowed.
pub fn assemble_combo(results: &PerFamily<ProbeResult>) -> ToolchainResult {
    ToolchainResult {
        identity: ToolchainIdentity::Combo,
        compilers: Compilers {
            c: first_field(results, |r| &r.compilers.c),
            cpp: first_field(results, |r| &r.compilers.cpp),
        },
        debugger: first_field(results, |r| &r.debugger),
    }
}

fn first_field<'a>(
    results: &'a PerFamily<ProbeResult>,
    field: impl Fn(&'a ProbeResult) -> &'a Option<PathBuf>,
) -> Option<PathBuf> {
    first_in_priority(results, |r| {
        if r.has_compiler() {
            field(r).as_ref()
        } else {
            None
        }
    })
    .map(|(_, p)| p.clone())
}
