//! Render service: the bridge between producer threads and the render thread
//!
//! This module is the concurrency core of the crate. Any number of threads
//! publish updates through a [`ServiceHandle`]; every update becomes a
//! [`Command`] carrying copies of its arguments, appended to an unbounded
//! channel. One dedicated render thread (the only thread ever allowed to
//! touch the [`Visualizer`] tree after construction) drains the whole
//! channel once per frame and applies the commands in FIFO order.
//!
//! Producers never block on render work: enqueueing is a channel send, and
//! the channel is created before the thread exists, so every command sent
//! before the first drain is applied in submission order even when several
//! producers race the lazy start-up.
//!
//! # Lifecycle
//!
//! `Stopped → Starting → Running → Stopping → Stopped`. Starting an already
//! Starting/Running service is a no-op. The service starts on demand: the
//! first enqueued command spawns the render thread, so instrumented code
//! needs no explicit initialization. [`RenderService::stop`] (also run on
//! drop) flags the thread, wakes it with a [`Command::Shutdown`], joins it,
//! and discards whatever was still queued; updates enqueued once shutdown
//! has begun are silently dropped.
//!
//! # Reads
//!
//! There is no synchronous cross-thread read path, on purpose. Code that
//! needs to observe the tree registers a frame hook
//! ([`RenderService::with_frame_hook`]) and reads from inside it, on the
//! render thread, after that frame's commands were applied.

pub mod worker;

use crate::config::ServiceOptions;
use crate::model::{GraphConfig, StructureBuilder, Visualizer, DEFAULT_TAB_ID};
use crate::render::{HeadlessBackend, RenderBackend};
use crate::types::ScalarValue;
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

/// Deferred structure rebuild callback
pub type StructureFn = Box<dyn FnOnce(&mut StructureBuilder<'_>) + Send>;

/// Deferred tree mutation callback
pub type ApplyFn = Box<dyn FnOnce(&mut Visualizer) + Send>;

/// Factory producing the render backend, called on the render thread
pub type BackendFactory = Box<dyn Fn() -> Box<dyn RenderBackend> + Send>;

/// Per-frame consumer-thread callback
pub type FrameHook = Box<dyn FnMut(&mut Visualizer, &FrameContext) + Send>;

/// Timing information handed to the frame hook
#[derive(Debug, Clone, Copy)]
pub struct FrameContext {
    /// Time since the render thread entered its loop
    pub elapsed: Duration,
    /// Time since the previous frame
    pub delta: Duration,
    /// Frames rendered before this one
    pub frame: u64,
}

/// A deferred mutation, applied on the render thread in FIFO order
///
/// Each variant captures copies of the producer's arguments; nothing is
/// borrowed across the thread boundary.
pub enum Command {
    /// Set a named scalar on a tab
    SetScalar {
        tab: String,
        key: String,
        value: ScalarValue,
    },
    /// Push one graph sample, optionally (re)configuring the series
    PushSample {
        tab: String,
        key: String,
        sample: f32,
        config: Option<GraphConfig>,
    },
    /// Append graph samples in order, optionally (re)configuring the series
    ExtendSamples {
        tab: String,
        key: String,
        samples: Vec<f32>,
        config: Option<GraphConfig>,
    },
    /// Rebuild a named structure via its builder callback
    UpdateStructure {
        tab: String,
        key: String,
        build: StructureFn,
    },
    /// Empty a tab (created if missing, like every other tab access)
    ClearTab { tab: String },
    /// Replace the root window title
    SetWindowTitle(String),
    /// Show or hide the root window
    SetVisible(bool),
    /// Run an arbitrary closure against the tree
    Apply(ApplyFn),
    /// Force the render loop to exit after the current batch
    Shutdown,
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Command::SetScalar { tab, key, value } => f
                .debug_struct("SetScalar")
                .field("tab", tab)
                .field("key", key)
                .field("value", value)
                .finish(),
            Command::PushSample {
                tab, key, sample, ..
            } => f
                .debug_struct("PushSample")
                .field("tab", tab)
                .field("key", key)
                .field("sample", sample)
                .finish(),
            Command::ExtendSamples {
                tab, key, samples, ..
            } => f
                .debug_struct("ExtendSamples")
                .field("tab", tab)
                .field("key", key)
                .field("len", &samples.len())
                .finish(),
            Command::UpdateStructure { tab, key, .. } => f
                .debug_struct("UpdateStructure")
                .field("tab", tab)
                .field("key", key)
                .finish(),
            Command::ClearTab { tab } => f.debug_struct("ClearTab").field("tab", tab).finish(),
            Command::SetWindowTitle(title) => f.debug_tuple("SetWindowTitle").field(title).finish(),
            Command::SetVisible(visible) => f.debug_tuple("SetVisible").field(visible).finish(),
            Command::Apply(_) => f.write_str("Apply(..)"),
            Command::Shutdown => f.write_str("Shutdown"),
        }
    }
}

/// Service lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Status {
    /// No render thread exists
    Stopped = 0,
    /// The render thread is spawning / initializing its backend
    Starting = 1,
    /// The render thread is looping
    Running = 2,
    /// Shutdown has begun; late updates are dropped
    Stopping = 3,
}

impl Status {
    fn from_u8(value: u8) -> Status {
        match value {
            1 => Status::Starting,
            2 => Status::Running,
            3 => Status::Stopping,
            _ => Status::Stopped,
        }
    }
}

pub(crate) struct ServiceInner {
    pub(crate) options: ServiceOptions,
    pub(crate) command_tx: Sender<Command>,
    pub(crate) command_rx: Receiver<Command>,
    pub(crate) status: AtomicU8,
    pub(crate) stop_requested: AtomicBool,
    pub(crate) thread: Mutex<Option<JoinHandle<()>>>,
    pub(crate) backend_factory: Mutex<BackendFactory>,
    pub(crate) frame_hook: Mutex<Option<FrameHook>>,
}

impl ServiceInner {
    pub(crate) fn status(&self) -> Status {
        Status::from_u8(self.status.load(Ordering::SeqCst))
    }

    fn transition(&self, from: Status, to: Status) -> bool {
        self.status
            .compare_exchange(from as u8, to as u8, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    pub(crate) fn discard_pending(&self) {
        let mut discarded = 0usize;
        while self.command_rx.try_recv().is_ok() {
            discarded += 1;
        }
        if discarded > 0 {
            tracing::debug!(discarded, "discarded queued commands");
        }
    }
}

fn ensure_started(inner: &Arc<ServiceInner>) {
    if inner.stop_requested.load(Ordering::Acquire) {
        return;
    }
    // No-op unless we are the thread that flips Stopped -> Starting.
    if !inner.transition(Status::Stopped, Status::Starting) {
        return;
    }

    let mut slot = inner.thread.lock().unwrap_or_else(|e| e.into_inner());
    // A previous render thread may have exited on its own (platform close,
    // backend failure); reap it before spawning the next one.
    if let Some(previous) = slot.take() {
        let _ = previous.join();
    }

    let worker_inner = Arc::clone(inner);
    match std::thread::Builder::new()
        .name("televis-render".to_string())
        .spawn(move || worker::RenderWorker::new(worker_inner).run())
    {
        Ok(handle) => *slot = Some(handle),
        Err(e) => {
            tracing::error!("failed to spawn render thread: {e}");
            inner.status.store(Status::Stopped as u8, Ordering::SeqCst);
        }
    }
}

fn post(inner: &Arc<ServiceInner>, command: Command) {
    if inner.stop_requested.load(Ordering::Acquire) {
        // Shutdown has begun; fire-and-forget means this is dropped silently.
        return;
    }
    ensure_started(inner);
    let _ = inner.command_tx.send(command);
}

/// The render service context object
///
/// Owns the render thread and the visualizer tree. Construct one per
/// embedding application, keep it alive for the lifetime of the
/// instrumentation, and hand out [`ServiceHandle`]s to producer threads.
/// Dropping the service stops and joins the render thread.
pub struct RenderService {
    inner: Arc<ServiceInner>,
}

impl RenderService {
    /// Create a stopped service with the headless backend
    ///
    /// The command channel exists from this point on, so updates enqueued
    /// before the thread's first drain are delivered in submission order.
    pub fn new(options: ServiceOptions) -> Self {
        let (command_tx, command_rx) = unbounded();
        Self {
            inner: Arc::new(ServiceInner {
                options,
                command_tx,
                command_rx,
                status: AtomicU8::new(Status::Stopped as u8),
                stop_requested: AtomicBool::new(false),
                thread: Mutex::new(None),
                backend_factory: Mutex::new(Box::new(|| Box::new(HeadlessBackend::new()))),
                frame_hook: Mutex::new(None),
            }),
        }
    }

    /// Install the render backend factory
    ///
    /// The factory runs on the render thread each time it starts, because
    /// window and GPU contexts are thread-affine.
    pub fn with_backend(
        self,
        factory: impl Fn() -> Box<dyn RenderBackend> + Send + 'static,
    ) -> Self {
        *self
            .inner
            .backend_factory
            .lock()
            .unwrap_or_else(|e| e.into_inner()) = Box::new(factory);
        self
    }

    /// Install a per-frame callback running on the render thread
    ///
    /// The hook runs after that frame's commands were applied and before
    /// the frame is rendered. This is the sanctioned place to read the
    /// tree synchronously.
    pub fn with_frame_hook(
        self,
        hook: impl FnMut(&mut Visualizer, &FrameContext) + Send + 'static,
    ) -> Self {
        *self
            .inner
            .frame_hook
            .lock()
            .unwrap_or_else(|e| e.into_inner()) = Some(Box::new(hook));
        self
    }

    /// Get a cloneable producer handle
    pub fn handle(&self) -> ServiceHandle {
        ServiceHandle {
            inner: Arc::clone(&self.inner),
        }
    }

    /// Spawn the render thread if it is not already starting or running
    pub fn start(&self) {
        ensure_started(&self.inner);
    }

    /// Stop the render thread and discard queued commands
    ///
    /// Blocks until the thread has exited (at most one frame interval).
    /// Safe to call repeatedly, when never started, and concurrently with
    /// producer updates; late updates are silently dropped.
    pub fn stop(&self) {
        let inner = &self.inner;
        // Flag first: racing producers must neither enqueue nor restart.
        inner.stop_requested.store(true, Ordering::Release);
        inner.transition(Status::Starting, Status::Stopping);
        inner.transition(Status::Running, Status::Stopping);

        // Wake the loop even if it is idle between frames.
        let _ = inner.command_tx.send(Command::Shutdown);

        let handle = inner
            .thread
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        if let Some(handle) = handle {
            if handle.join().is_err() {
                tracing::error!("render thread panicked during shutdown");
            }
        }

        inner.discard_pending();
        inner.status.store(Status::Stopped as u8, Ordering::SeqCst);
        inner.stop_requested.store(false, Ordering::Release);
    }

    /// Whether the render thread is up and looping
    ///
    /// The only signal producers get about backend failures: a service
    /// whose backend failed to initialize reports not running.
    pub fn is_running(&self) -> bool {
        self.inner.status() == Status::Running
    }

    /// Current lifecycle state
    pub fn status(&self) -> Status {
        self.inner.status()
    }
}

impl Drop for RenderService {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Cloneable fire-and-forget producer handle
///
/// Every method copies its arguments, enqueues a command, and returns
/// immediately; none of them can fail and none of them block on render
/// work. The first update after construction (or after a stop) starts the
/// render thread on demand.
#[derive(Clone)]
pub struct ServiceHandle {
    inner: Arc<ServiceInner>,
}

impl ServiceHandle {
    /// Address a tab by id
    pub fn tab(&self, id: impl Into<String>) -> TabHandle {
        TabHandle {
            inner: Arc::clone(&self.inner),
            tab: id.into(),
        }
    }

    /// Set a named scalar on the default tab
    pub fn value(&self, key: impl Into<String>, value: impl Into<ScalarValue>) {
        self.tab(DEFAULT_TAB_ID).value(key, value);
    }

    /// Push one graph sample on the default tab
    pub fn sample(&self, key: impl Into<String>, sample: f32) {
        self.tab(DEFAULT_TAB_ID).sample(key, sample);
    }

    /// Push one graph sample on the default tab, (re)configuring the series
    pub fn sample_with(&self, key: impl Into<String>, sample: f32, config: GraphConfig) {
        self.tab(DEFAULT_TAB_ID).sample_with(key, sample, config);
    }

    /// Append graph samples on the default tab
    pub fn samples(&self, key: impl Into<String>, samples: impl IntoIterator<Item = f32>) {
        self.tab(DEFAULT_TAB_ID).samples(key, samples);
    }

    /// Rebuild a named structure on the default tab
    pub fn structure(
        &self,
        key: impl Into<String>,
        build: impl FnOnce(&mut StructureBuilder<'_>) + Send + 'static,
    ) {
        self.tab(DEFAULT_TAB_ID).structure(key, build);
    }

    /// Empty the default tab
    pub fn clear(&self) {
        self.tab(DEFAULT_TAB_ID).clear();
    }

    /// Replace the root window title
    pub fn set_window_title(&self, title: impl Into<String>) {
        post(&self.inner, Command::SetWindowTitle(title.into()));
    }

    /// Show or hide the root window
    pub fn set_visible(&self, visible: bool) {
        post(&self.inner, Command::SetVisible(visible));
    }

    /// Run an arbitrary closure against the tree on the render thread
    ///
    /// The escape hatch for everything without a typed command: tile
    /// manipulation, tab removal, bulk edits.
    pub fn defer(&self, f: impl FnOnce(&mut Visualizer) + Send + 'static) {
        post(&self.inner, Command::Apply(Box::new(f)));
    }

    /// Whether the render thread is up and looping
    pub fn is_running(&self) -> bool {
        self.inner.status() == Status::Running
    }
}

/// A [`ServiceHandle`] scoped to one tab id
///
/// Tabs are created lazily on the render thread when the first command
/// addressing them is applied.
#[derive(Clone)]
pub struct TabHandle {
    inner: Arc<ServiceInner>,
    tab: String,
}

impl TabHandle {
    /// The tab id this handle addresses
    pub fn id(&self) -> &str {
        &self.tab
    }

    /// Set a named scalar
    pub fn value(&self, key: impl Into<String>, value: impl Into<ScalarValue>) {
        post(
            &self.inner,
            Command::SetScalar {
                tab: self.tab.clone(),
                key: key.into(),
                value: value.into(),
            },
        );
    }

    /// Push one graph sample
    pub fn sample(&self, key: impl Into<String>, sample: f32) {
        post(
            &self.inner,
            Command::PushSample {
                tab: self.tab.clone(),
                key: key.into(),
                sample,
                config: None,
            },
        );
    }

    /// Push one graph sample, (re)configuring the series first
    pub fn sample_with(&self, key: impl Into<String>, sample: f32, config: GraphConfig) {
        post(
            &self.inner,
            Command::PushSample {
                tab: self.tab.clone(),
                key: key.into(),
                sample,
                config: Some(config),
            },
        );
    }

    /// Append graph samples in order
    pub fn samples(&self, key: impl Into<String>, samples: impl IntoIterator<Item = f32>) {
        post(
            &self.inner,
            Command::ExtendSamples {
                tab: self.tab.clone(),
                key: key.into(),
                samples: samples.into_iter().collect(),
                config: None,
            },
        );
    }

    /// Append graph samples in order, (re)configuring the series first
    pub fn samples_with(
        &self,
        key: impl Into<String>,
        samples: impl IntoIterator<Item = f32>,
        config: GraphConfig,
    ) {
        post(
            &self.inner,
            Command::ExtendSamples {
                tab: self.tab.clone(),
                key: key.into(),
                samples: samples.into_iter().collect(),
                config: Some(config),
            },
        );
    }

    /// Rebuild a named structure via a builder callback
    ///
    /// The callback runs on the render thread during the drain that
    /// delivers this command.
    pub fn structure(
        &self,
        key: impl Into<String>,
        build: impl FnOnce(&mut StructureBuilder<'_>) + Send + 'static,
    ) {
        post(
            &self.inner,
            Command::UpdateStructure {
                tab: self.tab.clone(),
                key: key.into(),
                build: Box::new(build),
            },
        );
    }

    /// Empty this tab's scalars, graphs, and structures
    pub fn clear(&self) {
        post(
            &self.inner,
            Command::ClearTab {
                tab: self.tab.clone(),
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{FrameInput, MockRenderBackend};

    fn wait_for_status(service: &RenderService, status: Status) -> bool {
        let deadline = std::time::Instant::now() + Duration::from_secs(5);
        while std::time::Instant::now() < deadline {
            if service.status() == status {
                return true;
            }
            std::thread::sleep(Duration::from_millis(1));
        }
        false
    }

    #[test]
    fn test_backend_driven_in_fixed_order() {
        let service = RenderService::new(ServiceOptions::default()).with_backend(|| {
            let mut mock = MockRenderBackend::new();
            let mut seq = mockall::Sequence::new();
            mock.expect_init()
                .times(1)
                .in_sequence(&mut seq)
                .returning(|_| Ok(()));
            mock.expect_poll()
                .times(1)
                .in_sequence(&mut seq)
                .returning(|| FrameInput::tick(Duration::ZERO));
            mock.expect_render()
                .times(1)
                .in_sequence(&mut seq)
                .returning(|_| Ok(()));
            mock.expect_poll()
                .times(1)
                .in_sequence(&mut seq)
                .returning(|| FrameInput {
                    delta: Duration::ZERO,
                    close_requested: true,
                });
            mock.expect_shutdown()
                .times(1)
                .in_sequence(&mut seq)
                .return_const(());
            Box::new(mock)
        });

        service.start();
        // Close on the second poll ends the loop; the mock verifies the
        // init -> poll -> render -> poll -> shutdown order on drop.
        assert!(wait_for_status(&service, Status::Stopped));
        service.stop();
    }

    #[test]
    fn test_render_error_stops_the_thread() {
        let service = RenderService::new(ServiceOptions::default()).with_backend(|| {
            let mut mock = MockRenderBackend::new();
            mock.expect_init().returning(|_| Ok(()));
            mock.expect_poll()
                .returning(|| FrameInput::tick(Duration::ZERO));
            mock.expect_render().returning(|_| {
                Err(crate::error::TelevisError::Backend(
                    "lost surface".to_string(),
                ))
            });
            mock.expect_shutdown().return_const(());
            Box::new(mock)
        });

        service.start();
        assert!(wait_for_status(&service, Status::Stopped));
        assert!(!service.is_running());
        service.stop();
    }

    #[test]
    fn test_new_service_is_stopped() {
        let service = RenderService::new(ServiceOptions::default());
        assert_eq!(service.status(), Status::Stopped);
        assert!(!service.is_running());
    }

    #[test]
    fn test_stop_when_never_started_is_safe() {
        let service = RenderService::new(ServiceOptions::default());
        service.stop();
        service.stop();
        assert_eq!(service.status(), Status::Stopped);
    }

    #[test]
    fn test_command_debug_hides_closures() {
        let build: StructureFn = Box::new(|_| {});
        let cmd = Command::UpdateStructure {
            tab: "telemetry".to_string(),
            key: "player".to_string(),
            build,
        };
        let repr = format!("{:?}", cmd);
        assert!(repr.contains("UpdateStructure"));
        assert!(repr.contains("player"));

        let cmd = Command::Apply(Box::new(|_| {}));
        assert_eq!(format!("{:?}", cmd), "Apply(..)");
    }

    #[test]
    fn test_stop_discards_residual_commands() {
        let service = RenderService::new(ServiceOptions::default());
        let handle = service.handle();
        handle.tab("metrics").value("score", 42);
        service.stop();
        // Whatever the worker did not apply was discarded with the stop.
        assert!(service.inner.command_rx.try_recv().is_err());
        assert_eq!(service.status(), Status::Stopped);
    }

    #[test]
    fn test_updates_during_stop_are_dropped() {
        let service = RenderService::new(ServiceOptions::default());
        service.inner.stop_requested.store(true, Ordering::Release);
        service.handle().value("score", 42);
        // Dropped at the producer side: nothing reached the channel and
        // nothing restarted the thread.
        assert!(service.inner.command_rx.try_recv().is_err());
        assert_eq!(service.status(), Status::Stopped);
        service.inner.stop_requested.store(false, Ordering::Release);
    }
}
