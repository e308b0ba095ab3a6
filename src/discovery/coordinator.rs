//! Discovery coordinator.
//!
//! Launches one probe per family, records results as they arrive and
//! publishes two milestones per run:
//!
//! - **first usable**: the first probe (in completion order) that found a
//!   compiler. Fast but not necessarily the best choice.
//! - **final**: the [`select`] outcome once every probe has reported.
//!
//! Each milestone is a `watch` channel holding `Option<Arc<ToolchainResult>>`.
//! A new run publishes `None` on both, so callers that subscribed before the
//! reset keep waiting and are settled by the new run.
//!
//! State is guarded by a plain mutex that is never held across an `.await`;
//! probe completions are therefore applied one at a time.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::watch;

use crate::core::{Family, PerFamily, ProbeResult, ToolchainResult};
use crate::util::config::DiscoveryConfig;

use super::embedded::EmbeddedResolver;
use super::lookup::ExecutableLookup;
use super::probe::probe;
use super::selection::select;

type Milestone = Option<Arc<ToolchainResult>>;

#[derive(Debug, Default)]
struct DiscoveryState {
    /// Incremented by every run; completions from older runs are dropped.
    run: u64,
    results: PerFamily<Option<ProbeResult>>,
    completed: PerFamily<bool>,
    first_usable: Milestone,
    final_selection: Milestone,
    in_flight: bool,
}

struct Inner {
    lookup: Arc<dyn ExecutableLookup>,
    embedded: EmbeddedResolver,
    probe_timeout: Option<Duration>,
    state: Mutex<DiscoveryState>,
    first_tx: watch::Sender<Milestone>,
    final_tx: watch::Sender<Milestone>,
}

/// Read-only view of the coordinator state.
#[derive(Debug, Clone)]
pub struct DiscoverySnapshot {
    /// Number of discovery runs started so far.
    pub runs_started: u64,
    pub completed: PerFamily<bool>,
    pub first_usable: Milestone,
    pub final_selection: Milestone,
    pub in_flight: bool,
}

/// Toolchain discovery engine.
///
/// Cloning is cheap; all clones share one discovery state.
#[derive(Clone)]
pub struct DiscoveryCoordinator {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for DiscoveryCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscoveryCoordinator")
            .field("embedded", &self.inner.embedded)
            .field("probe_timeout", &self.inner.probe_timeout)
            .field("state", &*self.lock())
            .finish()
    }
}

impl DiscoveryCoordinator {
    /// Create a coordinator.
    ///
    /// `probe_timeout` bounds each family probe; a probe that exceeds it is
    /// reported as having found nothing.
    pub fn new(
        lookup: Arc<dyn ExecutableLookup>,
        embedded: EmbeddedResolver,
        probe_timeout: Option<Duration>,
    ) -> Self {
        let (first_tx, _) = watch::channel(None);
        let (final_tx, _) = watch::channel(None);

        DiscoveryCoordinator {
            inner: Arc::new(Inner {
                lookup,
                embedded,
                probe_timeout,
                state: Mutex::new(DiscoveryState::default()),
                first_tx,
                final_tx,
            }),
        }
    }

    /// Create a coordinator from discovery settings.
    pub fn from_config(config: &DiscoveryConfig) -> Self {
        let embedded = match &config.embedded_dir {
            Some(dir) => EmbeddedResolver::new(dir),
            None => EmbeddedResolver::beside_current_exe(),
        };
        DiscoveryCoordinator::new(
            Arc::from(config.lookup_method().into_lookup()),
            embedded,
            config.probe_timeout(),
        )
    }

    /// Get a toolchain as soon as one is usable.
    ///
    /// Resolves with whichever milestone of the current run settles first.
    /// Later calls return the cached final (or first-usable) result without
    /// probing again. Starts a run if none is in flight.
    pub async fn request_toolchain(&self) -> Arc<ToolchainResult> {
        let (first_rx, final_rx) = {
            let mut state = self.lock();
            if let Some(selected) = &state.final_selection {
                return Arc::clone(selected);
            }
            if let Some(first) = &state.first_usable {
                return Arc::clone(first);
            }

            let receivers = (self.inner.first_tx.subscribe(), self.inner.final_tx.subscribe());
            if !state.in_flight {
                self.start_run(&mut state);
            }
            receivers
        };

        // Both milestones can be ready at once when the last probe is also the
        // first usable one; the first-usable value is published first.
        tokio::select! {
            biased;
            Some(result) = settled(first_rx) => result,
            Some(result) = settled(final_rx) => result,
            else => Arc::new(ToolchainResult::empty_combo()),
        }
    }

    /// Get the final selection, waiting for every probe if necessary.
    pub async fn final_toolchain(&self) -> Arc<ToolchainResult> {
        let final_rx = {
            let mut state = self.lock();
            if let Some(selected) = &state.final_selection {
                return Arc::clone(selected);
            }

            let receiver = self.inner.final_tx.subscribe();
            if !state.in_flight {
                self.start_run(&mut state);
            }
            receiver
        };

        settled(final_rx)
            .await
            .unwrap_or_else(|| Arc::new(ToolchainResult::empty_combo()))
    }

    /// Start probing in the background without waiting.
    ///
    /// Does nothing if a run is in flight or a final selection exists.
    /// Probes are spawned onto the current tokio runtime, so this must be
    /// called from within one.
    pub fn start_discovery(&self) {
        let mut state = self.lock();
        if !state.in_flight && state.final_selection.is_none() {
            self.start_run(&mut state);
        }
    }

    /// Discard all results and start a new run.
    ///
    /// Completions still arriving from the previous run are ignored. Callers
    /// already waiting are settled by the new run. Like
    /// [`start_discovery`](Self::start_discovery), it must be called from
    /// within a tokio runtime.
    pub fn rediscover(&self) {
        let mut state = self.lock();
        self.start_run(&mut state);
    }

    /// Copy of the current state, for status reporting and tests.
    pub fn snapshot(&self) -> DiscoverySnapshot {
        let state = self.lock();
        DiscoverySnapshot {
            runs_started: state.run,
            completed: state.completed.clone(),
            first_usable: state.first_usable.clone(),
            final_selection: state.final_selection.clone(),
            in_flight: state.in_flight,
        }
    }

    fn start_run(&self, state: &mut DiscoveryState) {
        state.run += 1;
        state.results = PerFamily::default();
        state.completed = PerFamily::default();
        state.first_usable = None;
        state.final_selection = None;
        state.in_flight = true;
        self.inner.first_tx.send_replace(None);
        self.inner.final_tx.send_replace(None);

        let run = state.run;
        tracing::debug!("starting toolchain discovery run {}", run);

        for family in Family::ALL {
            let this = self.clone();
            tokio::spawn(async move {
                let result = this.run_probe(family).await;
                this.on_probe_complete(run, family, result);
            });
        }
    }

    /// Run one probe, mapping panics and timeouts to an empty result.
    async fn run_probe(&self, family: Family) -> ProbeResult {
        let lookup = Arc::clone(&self.inner.lookup);
        let task = tokio::spawn(async move { probe(family, &*lookup).await });
        let abort = task.abort_handle();

        let joined = match self.inner.probe_timeout {
            Some(limit) => match tokio::time::timeout(limit, task).await {
                Ok(joined) => joined,
                Err(_) => {
                    abort.abort();
                    tracing::warn!("{} probe timed out after {:?}", family, limit);
                    return ProbeResult::empty();
                }
            },
            None => task.await,
        };

        joined.unwrap_or_else(|e| {
            tracing::warn!("{} probe failed: {}", family, e);
            ProbeResult::empty()
        })
    }

    fn on_probe_complete(&self, run: u64, family: Family, result: ProbeResult) {
        let mut state = self.lock();
        if state.run != run {
            tracing::debug!("ignoring {} result from superseded run {}", family, run);
            return;
        }
        if state.completed[family] {
            tracing::warn!("duplicate {} result in run {}", family, run);
            return;
        }

        state.completed[family] = true;

        if state.first_usable.is_none() && result.has_compiler() {
            let first = Arc::new(ToolchainResult::from_probe(family, &result));
            tracing::info!("first usable toolchain: {}", family);
            state.first_usable = Some(Arc::clone(&first));
            self.inner.first_tx.send_replace(Some(first));
        }
        state.results[family] = Some(result);

        if Family::ALL.iter().all(|&f| state.completed[f]) {
            let results = PerFamily::from_fn(|f| state.results[f].clone().unwrap_or_default());
            let selected = Arc::new(select(&results, || self.inner.embedded.resolve()));
            tracing::info!(
                "selected {} toolchain (c: {:?}, c++: {:?}, debugger: {:?})",
                selected.identity,
                selected.compilers.c,
                selected.compilers.cpp,
                selected.debugger
            );

            state.final_selection = Some(Arc::clone(&selected));
            state.in_flight = false;
            self.inner.final_tx.send_replace(Some(selected));
        }
    }

    fn lock(&self) -> MutexGuard<'_, DiscoveryState> {
        self.inner.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Wait until a milestone holds a value.
///
/// Returns `None` only if the sender is gone.
async fn settled(mut rx: watch::Receiver<Milestone>) -> Milestone {
    let value = rx.wait_for(Option::is_some).await.ok()?;
    value.as_ref().map(Arc::clone)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ToolchainIdentity;
    use crate::test_support::{write_embedded_toolchain, ScriptedLookup};
    use std::path::PathBuf;
    use tempfile::TempDir;

    const MS: Duration = Duration::from_millis(1);

    fn coordinator(lookup: &ScriptedLookup) -> DiscoveryCoordinator {
        DiscoveryCoordinator::new(
            Arc::new(lookup.clone()),
            EmbeddedResolver::disabled(),
            None,
        )
    }

    fn all_tools(lookup: ScriptedLookup, delays: [u64; 3]) -> ScriptedLookup {
        let [gnu, clang, msvc] = delays.map(|d| MS * d as u32);
        lookup
            .found_after("gcc", "/usr/bin/gcc", gnu)
            .found_after("g++", "/usr/bin/g++", gnu)
            .found_after("gdb", "/usr/bin/gdb", gnu)
            .found_after("clang", "/usr/bin/clang", clang)
            .found_after("clang++", "/usr/bin/clang++", clang)
            .found_after("lldb", "/usr/bin/lldb", clang)
            .found_after("cl", "C:/VS/bin/cl.exe", msvc)
    }

    async fn wait_until(
        coordinator: &DiscoveryCoordinator,
        pred: impl Fn(&DiscoverySnapshot) -> bool,
    ) -> DiscoverySnapshot {
        for _ in 0..10_000 {
            let snapshot = coordinator.snapshot();
            if pred(&snapshot) {
                return snapshot;
            }
            tokio::time::sleep(MS).await;
        }
        panic!("condition not reached: {:?}", coordinator.snapshot());
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_usable_follows_arrival_order() {
        // Clang finishes first even though GNU has priority.
        let lookup = all_tools(ScriptedLookup::new(), [100, 10, 200]);
        let coordinator = coordinator(&lookup);

        let fast = coordinator.request_toolchain().await;
        assert_eq!(fast.identity, ToolchainIdentity::Clang);

        let best = coordinator.final_toolchain().await;
        assert_eq!(best.identity, ToolchainIdentity::Gnu);

        let snapshot = coordinator.snapshot();
        assert_eq!(
            snapshot.first_usable.unwrap().identity,
            ToolchainIdentity::Clang
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_final_waits_for_every_probe() {
        let lookup = all_tools(ScriptedLookup::new(), [0, 0, 0]);
        let gate = lookup.gate("cl");
        let coordinator = coordinator(&lookup);

        coordinator.start_discovery();
        let snapshot =
            wait_until(&coordinator, |s| s.completed.gnu && s.completed.clang).await;
        assert!(!snapshot.completed.msvc);
        assert!(snapshot.final_selection.is_none());
        assert!(snapshot.in_flight);
        assert!(snapshot.first_usable.is_some());

        gate.open();
        let selected = coordinator.final_toolchain().await;
        assert_eq!(selected.identity, ToolchainIdentity::Gnu);

        let snapshot = coordinator.snapshot();
        assert!(snapshot.completed.msvc);
        assert!(!snapshot.in_flight);
    }

    #[tokio::test(start_paused = true)]
    async fn test_selection_independent_of_completion_order() {
        let orders = [[10, 20, 30], [30, 20, 10], [20, 30, 10]];
        let mut selections = Vec::new();

        for delays in orders {
            let lookup = ScriptedLookup::new()
                .found_after("gcc", "/usr/bin/gcc", MS * delays[0])
                .missing_after("g++", MS * delays[0])
                .found_after("clang++", "/usr/bin/clang++", MS * delays[1])
                .found_after("lldb", "/usr/bin/lldb", MS * delays[1])
                .missing_after("cl", MS * delays[2]);
            let coordinator = coordinator(&lookup);
            selections.push(coordinator.final_toolchain().await);
        }

        assert_eq!(selections[0].identity, ToolchainIdentity::Clang);
        assert!(selections.iter().all(|s| **s == *selections[0]));
    }

    #[tokio::test(start_paused = true)]
    async fn test_completed_prior_run_is_reused() {
        let lookup = all_tools(ScriptedLookup::new(), [5, 5, 5]);
        let coordinator = coordinator(&lookup);

        let first = coordinator.final_toolchain().await;
        let calls = lookup.total_calls();

        let again = coordinator.request_toolchain().await;
        let and_again = coordinator.request_toolchain().await;
        coordinator.start_discovery();

        assert!(Arc::ptr_eq(&first, &again));
        assert!(Arc::ptr_eq(&first, &and_again));
        assert_eq!(lookup.total_calls(), calls);
        assert_eq!(coordinator.snapshot().runs_started, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_requests_share_one_run() {
        let lookup = all_tools(ScriptedLookup::new(), [20, 20, 20]);
        let coordinator = coordinator(&lookup);

        let (a, b) = tokio::join!(coordinator.request_toolchain(), coordinator.request_toolchain());
        assert!(a.is_usable());
        assert!(b.is_usable());

        wait_until(&coordinator, |s| s.final_selection.is_some()).await;
        assert_eq!(coordinator.snapshot().runs_started, 1);
        // gcc, g++, gdb, clang, clang++, lldb, cl
        assert_eq!(lookup.total_calls(), 7);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_compiler_settles_through_final_milestone() {
        let tmp = TempDir::new().unwrap();
        write_embedded_toolchain(tmp.path(), &["gcc", "gdb"]);

        let lookup = ScriptedLookup::new().found("gdb", "/usr/bin/gdb");
        let coordinator = DiscoveryCoordinator::new(
            Arc::new(lookup.clone()),
            EmbeddedResolver::new(tmp.path()),
            None,
        );

        let result = coordinator.request_toolchain().await;
        assert_eq!(result.identity, ToolchainIdentity::Embedded);
        assert_eq!(
            result.compilers.c,
            EmbeddedResolver::new(tmp.path()).c_compiler_path()
        );
        assert!(coordinator.snapshot().first_usable.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_nothing_anywhere_yields_empty_combo() {
        let lookup = ScriptedLookup::new();
        let coordinator = coordinator(&lookup);

        let result = coordinator.request_toolchain().await;
        assert_eq!(result.identity, ToolchainIdentity::Combo);
        assert!(result.compilers.c.is_none());
        assert!(result.compilers.cpp.is_none());
        assert!(!result.is_usable());
    }

    #[tokio::test(start_paused = true)]
    async fn test_hung_probe_times_out() {
        let lookup = all_tools(ScriptedLookup::new(), [0, 0, 0]);
        let _never_opened = lookup.gate("cl");
        let coordinator = DiscoveryCoordinator::new(
            Arc::new(lookup.clone()),
            EmbeddedResolver::disabled(),
            Some(Duration::from_secs(1)),
        );

        let selected = coordinator.final_toolchain().await;
        assert_eq!(selected.identity, ToolchainIdentity::Gnu);
        assert!(coordinator.snapshot().completed.msvc);
    }

    #[tokio::test(start_paused = true)]
    async fn test_panicking_probe_counts_as_completed() {
        let lookup = all_tools(ScriptedLookup::new(), [0, 0, 0]).panics("gdb");
        let coordinator = coordinator(&lookup);

        let selected = coordinator.final_toolchain().await;
        // GNU is reported empty, so Clang is the first complete family.
        assert_eq!(selected.identity, ToolchainIdentity::Clang);
        let snapshot = coordinator.snapshot();
        assert!(snapshot.completed.gnu && snapshot.completed.clang && snapshot.completed.msvc);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rediscover_replaces_results() {
        let lookup = all_tools(ScriptedLookup::new(), [0, 0, 0]);
        let coordinator = coordinator(&lookup);

        let before = coordinator.final_toolchain().await;
        assert_eq!(before.identity, ToolchainIdentity::Gnu);

        lookup.set("gdb", None);
        coordinator.rediscover();
        let snapshot = coordinator.snapshot();
        assert!(snapshot.final_selection.is_none());
        assert!(snapshot.first_usable.is_none());

        let after = coordinator.final_toolchain().await;
        assert_eq!(after.identity, ToolchainIdentity::Clang);
        assert_eq!(coordinator.snapshot().runs_started, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_request_prefers_first_usable_when_run_ends() {
        // GNU is the only family with a compiler and reports last, so both
        // milestones settle in the same completion.
        let lookup = ScriptedLookup::new()
            .found_after("gcc", "/usr/bin/gcc", MS * 10)
            .missing_after("g++", MS * 10);
        let coordinator = coordinator(&lookup);

        for _ in 0..8 {
            coordinator.rediscover();
            let fast = coordinator.request_toolchain().await;
            assert_eq!(fast.identity, ToolchainIdentity::Gnu);

            let best = coordinator.final_toolchain().await;
            assert_eq!(best.identity, ToolchainIdentity::Combo);
            assert_eq!(best.compilers.c, fast.compilers.c);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_waiter_survives_rediscover() {
        let lookup = ScriptedLookup::new();
        let gate = lookup.gate("gcc");
        let lookup = lookup.found("gcc", "/usr/bin/gcc");
        let coordinator = coordinator(&lookup);

        let waiter = tokio::spawn({
            let coordinator = coordinator.clone();
            async move { coordinator.request_toolchain().await }
        });
        wait_until(&coordinator, |s| s.completed.clang && s.completed.msvc).await;

        coordinator.rediscover();
        gate.open();

        let result = waiter.await.unwrap();
        assert_eq!(result.identity, ToolchainIdentity::Gnu);
        assert_eq!(result.compilers.c, Some(PathBuf::from("/usr/bin/gcc")));
        assert_eq!(coordinator.snapshot().runs_started, 2);
    }
}
