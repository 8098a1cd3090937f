//! The attachment loop: locate, identify, recompute, classify, sleep
//!
//! One background task owns the relationship to the target process. Each
//! iteration it makes sure a live target is held (locating one if not),
//! identifies the target's build once per handle, then recomputes every
//! registered property in registration order, stopping at the first failure.
//! The failure class becomes the published [`AttachmentState`], which also
//! selects how long to sleep before the next iteration.

use crate::core::types::{AttachError, AttachmentState, KnownVersion, SyncError, SyncResult};
use crate::sync::property::Monitored;
use crate::target::{Target, TargetCell};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// Locates target processes and identifies their builds.
///
/// The loop owns its provider exclusively, so `locate` can keep state
/// (enumeration caches, last-seen pid) without synchronization.
pub trait TargetProvider: Send + 'static {
    /// Finds and opens the target process.
    fn locate(&mut self) -> Result<Arc<dyn Target>, AttachError>;

    /// Identifies the build of a freshly located target, if recognized.
    /// Called once per live handle; an unrecognized build is not an error.
    fn identify(&self, target: &dyn Target) -> Option<KnownVersion>;
}

/// How long the loop sleeps after an iteration, by resulting state.
#[derive(Debug, Clone, Copy)]
pub struct PollIntervals {
    /// Between healthy recompute passes.
    pub attached: Duration,
    /// After a resolve or read failure, while the process is still up.
    pub searching: Duration,
    /// While no target process exists.
    pub not_running: Duration,
}

impl Default for PollIntervals {
    fn default() -> Self {
        PollIntervals {
            attached: Duration::from_millis(200),
            searching: Duration::from_secs(2),
            not_running: Duration::from_secs(10),
        }
    }
}

impl PollIntervals {
    fn for_state(&self, state: AttachmentState) -> Duration {
        match state {
            AttachmentState::Stopped => Duration::ZERO,
            AttachmentState::ProcessNotRunning => self.not_running,
            AttachmentState::AddressNotFound | AttachmentState::AddressUnreadable => self.searching,
            AttachmentState::Attached => self.attached,
        }
    }
}

struct Shared {
    registry: Mutex<Vec<Arc<dyn Monitored>>>,
    target: TargetCell,
    state: watch::Sender<AttachmentState>,
    stop: watch::Sender<bool>,
    intervals: PollIntervals,
}

impl Shared {
    fn publish(&self, state: AttachmentState) {
        let changed = self.state.send_if_modified(|current| {
            if *current == state {
                false
            } else {
                *current = state;
                true
            }
        });
        if changed {
            info!(%state, "attachment state changed");
        }
    }

    fn invalidate_all(&self) {
        for property in self.registry.lock().expect("registry lock poisoned").iter() {
            property.invalidate();
        }
    }

    fn drop_target(&self) {
        self.target.clear();
        self.invalidate_all();
    }

    /// One pass of the loop body; returns the state to publish.
    fn iteration(&self, provider: &mut dyn TargetProvider) -> AttachmentState {
        let target: Arc<dyn Target> = match self.target.get() {
            Some(target) if target.is_alive() => target,
            Some(_) => {
                // An exited process decides this pass on its own; locating
                // a replacement waits for the next one, so the state always
                // passes through ProcessNotRunning.
                info!("target process exited");
                self.drop_target();
                return AttachmentState::ProcessNotRunning;
            }
            None => match provider.locate() {
                Ok(target) => {
                    info!("target process located");
                    self.target.set(Arc::clone(&target));
                    target
                }
                Err(error) => {
                    debug!(%error, "no target process");
                    return AttachmentState::ProcessNotRunning;
                }
            },
        };

        if target.version().is_none() {
            if let Some(version) = provider.identify(target.as_ref()) {
                info!(version = %version.version, "target build identified");
                target.set_version(version);
            }
        }

        let registry: Vec<Arc<dyn Monitored>> = {
            let guard = self.registry.lock().expect("registry lock poisoned");
            guard.clone()
        };
        for property in &registry {
            if let Err(error) = property.recompute(target.as_ref()) {
                if !target.is_alive() {
                    info!("target process exited mid-iteration");
                    self.drop_target();
                    return AttachmentState::ProcessNotRunning;
                }
                // Partial copies happen routinely while the target is mid-load.
                if error.is_partial_copy() {
                    debug!(property = property.name(), %error, "recompute hit a partial copy");
                } else {
                    warn!(property = property.name(), %error, "recompute failed");
                }
                return match error {
                    SyncError::Resolve(_) => AttachmentState::AddressNotFound,
                    _ => AttachmentState::AddressUnreadable,
                };
            }
        }
        AttachmentState::Attached
    }

    async fn run(self: Arc<Self>, mut provider: Box<dyn TargetProvider>) {
        let mut stop = self.stop.subscribe();
        loop {
            if *stop.borrow() {
                break;
            }
            let state = self.iteration(provider.as_mut());
            self.publish(state);

            let interval = self.intervals.for_state(state);
            tokio::select! {
                _ = sleep(interval) => {}
                changed = stop.changed() => {
                    if changed.is_err() || *stop.borrow() {
                        break;
                    }
                }
            }
        }
        self.drop_target();
        self.publish(AttachmentState::Stopped);
        info!("attachment loop stopped");
    }
}

/// Owner of the attachment loop and the property registry.
///
/// One-shot: a service instance runs its loop at most once, and a stopped
/// service stays stopped.
pub struct SyncService {
    shared: Arc<Shared>,
    started: AtomicBool,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl SyncService {
    pub fn new(intervals: PollIntervals) -> Self {
        SyncService {
            shared: Arc::new(Shared {
                registry: Mutex::new(Vec::new()),
                target: TargetCell::new(),
                state: watch::Sender::new(AttachmentState::Stopped),
                stop: watch::Sender::new(false),
                intervals,
            }),
            started: AtomicBool::new(false),
            task: Mutex::new(None),
        }
    }

    /// Adds a property to the recompute pass. Registration order is the
    /// recompute order, so failures are attributed deterministically.
    pub fn register(&self, property: Arc<dyn Monitored>) {
        self.shared
            .registry
            .lock()
            .expect("registry lock poisoned")
            .push(property);
    }

    /// The shared slot writable properties read their target from.
    pub fn target_cell(&self) -> TargetCell {
        self.shared.target.clone()
    }

    /// Subscribes to attachment state transitions.
    pub fn state(&self) -> watch::Receiver<AttachmentState> {
        self.shared.state.subscribe()
    }

    pub fn current_state(&self) -> AttachmentState {
        *self.shared.state.borrow()
    }

    /// Starts the attachment loop with `provider`.
    ///
    /// Fails with [`SyncError::AlreadyAttached`] if the loop was ever
    /// started on this instance, including after a stop.
    pub fn attach(&self, provider: impl TargetProvider) -> SyncResult<()> {
        if self.started.swap(true, Ordering::SeqCst) {
            return Err(SyncError::AlreadyAttached);
        }
        let task = tokio::spawn(Arc::clone(&self.shared).run(Box::new(provider)));
        *self.task.lock().expect("task lock poisoned") = Some(task);
        Ok(())
    }

    /// Stops the loop and waits for it to finish its current iteration.
    /// The iteration body is never interrupted midway.
    pub async fn stop(&self) {
        let _ = self.shared.stop.send(true);
        let task = self.task.lock().expect("task lock poisoned").take();
        if let Some(task) = task {
            let _ = task.await;
        } else {
            // Never started: still present a coherent terminal state.
            self.shared.publish(AttachmentState::Stopped);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{MemValue, MemoryAddress};
    use crate::sync::property::RemoteProperty;
    use crate::target::fake::FakeTarget;
    use std::collections::VecDeque;

    /// Provider whose locate results are scripted up front; once the script
    /// is exhausted it keeps reporting not-found.
    struct ScriptedProvider {
        script: VecDeque<Option<Arc<FakeTarget>>>,
        version: Option<KnownVersion>,
    }

    impl ScriptedProvider {
        fn new(script: Vec<Option<Arc<FakeTarget>>>) -> Self {
            ScriptedProvider {
                script: script.into_iter().collect(),
                version: None,
            }
        }
    }

    impl TargetProvider for ScriptedProvider {
        fn locate(&mut self) -> Result<Arc<dyn Target>, AttachError> {
            match self.script.pop_front().flatten() {
                Some(target) => Ok(target),
                None => Err(AttachError::ProcessNotFound("target.exe".to_string())),
            }
        }

        fn identify(&self, _target: &dyn Target) -> Option<KnownVersion> {
            self.version.clone()
        }
    }

    fn fast_intervals() -> PollIntervals {
        PollIntervals {
            attached: Duration::from_millis(1),
            searching: Duration::from_millis(1),
            not_running: Duration::from_millis(1),
        }
    }

    #[tokio::test]
    async fn test_interval_selection() {
        let intervals = PollIntervals::default();
        assert_eq!(
            intervals.for_state(AttachmentState::Attached),
            Duration::from_millis(200)
        );
        assert_eq!(
            intervals.for_state(AttachmentState::AddressNotFound),
            Duration::from_secs(2)
        );
        assert_eq!(
            intervals.for_state(AttachmentState::AddressUnreadable),
            Duration::from_secs(2)
        );
        assert_eq!(
            intervals.for_state(AttachmentState::ProcessNotRunning),
            Duration::from_secs(10)
        );
        assert_eq!(
            intervals.for_state(AttachmentState::Stopped),
            Duration::ZERO
        );
    }

    #[tokio::test]
    async fn test_attach_twice_fails() {
        let service = SyncService::new(fast_intervals());
        service
            .attach(ScriptedProvider::new(vec![]))
            .unwrap();
        let err = service
            .attach(ScriptedProvider::new(vec![]))
            .unwrap_err();
        assert!(matches!(err, SyncError::AlreadyAttached));
        service.stop().await;
    }

    #[tokio::test]
    async fn test_attach_after_stop_fails() {
        let service = SyncService::new(fast_intervals());
        service.attach(ScriptedProvider::new(vec![])).unwrap();
        service.stop().await;
        assert_eq!(service.current_state(), AttachmentState::Stopped);

        let err = service.attach(ScriptedProvider::new(vec![])).unwrap_err();
        assert!(matches!(err, SyncError::AlreadyAttached));
    }

    #[tokio::test]
    async fn test_reaches_attached_and_recomputes() {
        let target = Arc::new(FakeTarget::new(0x400000));
        target.load_bytes(0x1000, &5i32.encode());

        let service = SyncService::new(fast_intervals());
        let prop = RemoteProperty::<i32>::new("heat", MemoryAddress::fixed(0x1000));
        service.register(prop.clone());

        let mut state = service.state();
        service
            .attach(ScriptedProvider::new(vec![Some(target.clone())]))
            .unwrap();

        state
            .wait_for(|s| *s == AttachmentState::Attached)
            .await
            .unwrap();
        assert_eq!(prop.get(), Some(5));
        assert!(!service.target_cell().is_empty());

        service.stop().await;
        assert_eq!(service.current_state(), AttachmentState::Stopped);
        assert!(service.target_cell().is_empty());
        assert_eq!(prop.get(), None);
    }

    #[tokio::test]
    async fn test_not_running_until_located() {
        let target = Arc::new(FakeTarget::new(0x400000));
        let service = SyncService::new(fast_intervals());

        let mut state = service.state();
        service
            .attach(ScriptedProvider::new(vec![None, None, Some(target)]))
            .unwrap();

        state
            .wait_for(|s| *s == AttachmentState::ProcessNotRunning)
            .await
            .unwrap();
        state
            .wait_for(|s| *s == AttachmentState::Attached)
            .await
            .unwrap();
        service.stop().await;
    }

    #[tokio::test]
    async fn test_resolve_failure_maps_to_address_not_found() {
        let target = Arc::new(FakeTarget::new(0x400000));
        let service = SyncService::new(fast_intervals());
        // Versioned chain with no identified build never resolves.
        let prop = RemoteProperty::<i32>::new("heat", MemoryAddress::versioned(vec![0x4]));
        service.register(prop);

        let mut state = service.state();
        service
            .attach(ScriptedProvider::new(vec![Some(target)]))
            .unwrap();

        state
            .wait_for(|s| *s == AttachmentState::AddressNotFound)
            .await
            .unwrap();
        service.stop().await;
    }

    #[tokio::test]
    async fn test_read_failure_maps_to_address_unreadable() {
        let target = Arc::new(FakeTarget::new(0x400000));
        // Fixed address, nothing mapped there: short read.
        let service = SyncService::new(fast_intervals());
        let prop = RemoteProperty::<i32>::new("heat", MemoryAddress::fixed(0x1000));
        service.register(prop);

        let mut state = service.state();
        service
            .attach(ScriptedProvider::new(vec![Some(target)]))
            .unwrap();

        state
            .wait_for(|s| *s == AttachmentState::AddressUnreadable)
            .await
            .unwrap();
        service.stop().await;
    }

    #[tokio::test]
    async fn test_dead_target_overrides_failure_class() {
        let target = Arc::new(FakeTarget::new(0x400000));
        target.load_bytes(0x1000, &5i32.encode());

        let service = SyncService::new(fast_intervals());
        let prop = RemoteProperty::<i32>::new("heat", MemoryAddress::fixed(0x1000));
        service.register(prop.clone());

        let mut state = service.state();
        service
            .attach(ScriptedProvider::new(vec![Some(target.clone())]))
            .unwrap();
        state
            .wait_for(|s| *s == AttachmentState::Attached)
            .await
            .unwrap();

        target.kill();
        state
            .wait_for(|s| *s == AttachmentState::ProcessNotRunning)
            .await
            .unwrap();
        assert!(service.target_cell().is_empty());
        assert_eq!(prop.get(), None);
        service.stop().await;
    }

    #[test]
    fn test_exit_surfaces_not_running_before_replacement() {
        let first = Arc::new(FakeTarget::new(0x400000));
        first.load_bytes(0x1000, &1i32.encode());
        let second = Arc::new(FakeTarget::new(0x400000));
        second.load_bytes(0x1000, &2i32.encode());

        let service = SyncService::new(fast_intervals());
        let prop = RemoteProperty::<i32>::new("heat", MemoryAddress::fixed(0x1000));
        service.register(prop.clone());

        let mut provider = ScriptedProvider::new(vec![Some(first.clone()), Some(second)]);
        assert_eq!(
            service.shared.iteration(&mut provider),
            AttachmentState::Attached
        );
        assert_eq!(prop.get(), Some(1));

        // The exited handle decides this pass on its own, even though a
        // replacement process is already there to be located.
        first.kill();
        assert_eq!(
            service.shared.iteration(&mut provider),
            AttachmentState::ProcessNotRunning
        );
        assert!(service.shared.target.is_empty());
        assert_eq!(prop.get(), None);

        assert_eq!(
            service.shared.iteration(&mut provider),
            AttachmentState::Attached
        );
        assert_eq!(prop.get(), Some(2));
    }

    #[tokio::test]
    async fn test_identify_runs_once_per_handle() {
        let target = Arc::new(FakeTarget::new(0x400000));
        let version = KnownVersion {
            version: "2.8.0".to_string(),
            base_offset: 0x1E2760,
            exe_sha256: String::new(),
        };

        let mut provider = ScriptedProvider::new(vec![Some(target.clone())]);
        provider.version = Some(version.clone());

        let service = SyncService::new(fast_intervals());
        let mut state = service.state();
        service.attach(provider).unwrap();

        state
            .wait_for(|s| *s == AttachmentState::Attached)
            .await
            .unwrap();
        assert_eq!(target.version(), Some(version));
        service.stop().await;
    }
}
