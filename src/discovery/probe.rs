//! Per-family toolchain probe.

use crate::core::{Compilers, Family, ProbeResult};

use super::lookup::ExecutableLookup;

/// Probe one toolchain family.
///
/// The C compiler, C++ compiler and debugger lookups run concurrently. Any
/// subset may be found; missing executables are simply absent.
pub async fn probe(family: Family, lookup: &dyn ExecutableLookup) -> ProbeResult {
    let tools = family.tools();

    let (c, cpp, debugger) = if tools.c == tools.cpp {
        let (cc, debugger) = tokio::join!(lookup.find(tools.c), find_opt(lookup, tools.debugger));
        (cc.clone(), cc, debugger)
    } else {
        tokio::join!(
            lookup.find(tools.c),
            lookup.find(tools.cpp),
            find_opt(lookup, tools.debugger)
        )
    };

    let result = ProbeResult {
        compilers: Compilers { c, cpp },
        debugger,
    };
    tracing::debug!(
        "probe {}: c={:?} cpp={:?} debugger={:?}",
        family,
        result.compilers.c,
        result.compilers.cpp,
        result.debugger
    );
    result
}

async fn find_opt(lookup: &dyn ExecutableLookup, name: Option<&str>) -> Option<std::path::PathBuf> {
    match name {
        Some(name) => lookup.find(name).await,
        None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScriptedLookup;
    use std::path::PathBuf;

    #[tokio::test]
    async fn test_probe_gnu_complete() {
        let lookup = ScriptedLookup::new()
            .found("gcc", "/usr/bin/gcc")
            .found("g++", "/usr/bin/g++")
            .found("gdb", "/usr/bin/gdb");

        let result = probe(Family::Gnu, &lookup).await;
        assert_eq!(result.compilers.c, Some(PathBuf::from("/usr/bin/gcc")));
        assert_eq!(result.compilers.cpp, Some(PathBuf::from("/usr/bin/g++")));
        assert_eq!(result.debugger, Some(PathBuf::from("/usr/bin/gdb")));
    }

    #[tokio::test]
    async fn test_probe_partial_result() {
        let lookup = ScriptedLookup::new().found("clang++", "/usr/bin/clang++");

        let result = probe(Family::Clang, &lookup).await;
        assert_eq!(result.compilers.c, None);
        assert_eq!(result.compilers.cpp, Some(PathBuf::from("/usr/bin/clang++")));
        assert_eq!(result.debugger, None);
        assert!(result.has_compiler());
    }

    #[tokio::test]
    async fn test_probe_nothing_found() {
        let lookup = ScriptedLookup::new();
        let result = probe(Family::Gnu, &lookup).await;
        assert_eq!(result, ProbeResult::empty());
    }

    #[tokio::test]
    async fn test_probe_msvc_looks_up_cl_once() {
        let lookup = ScriptedLookup::new().found("cl", "C:/VS/bin/cl.exe");

        let result = probe(Family::Msvc, &lookup).await;
        assert_eq!(result.compilers.c, Some(PathBuf::from("C:/VS/bin/cl.exe")));
        assert_eq!(result.compilers.cpp, result.compilers.c);
        assert_eq!(result.debugger, None);
        assert_eq!(lookup.calls("cl"), 1);
        assert_eq!(lookup.total_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_probe_lookups_run_concurrently() {
        use std::time::Duration;
        use tokio::time::Instant;

        let lookup = ScriptedLookup::new()
            .found_after("gcc", "/usr/bin/gcc", Duration::from_millis(100))
            .found_after("g++", "/usr/bin/g++", Duration::from_millis(100))
            .found_after("gdb", "/usr/bin/gdb", Duration::from_millis(100));

        let start = Instant::now();
        let result = probe(Family::Gnu, &lookup).await;
        assert!(result.is_complete());
        assert!(start.elapsed() < Duration::from_millis(200));
    }
}
