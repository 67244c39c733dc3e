//! Render thread loop
//!
//! [`RenderWorker`] owns the visualizer tree and the render backend,
//! exclusively, for the lifetime of the thread. Each pass around the loop:
//! poll platform events, drain the whole command channel and apply the
//! batch in FIFO order, run the frame hook, render, then sleep toward the
//! configured frame rate. The loop exits on a stop request, a platform
//! close, a [`Command::Shutdown`], or a backend error; exit is observable
//! within one frame interval.
//!
//! # Failure isolation
//!
//! A backend that fails to initialize (or to render) takes down only this
//! thread: the error is logged, queued commands are discarded, and the
//! service reports not running. Nothing propagates to producers.

use crate::model::Visualizer;
use crate::service::{Command, ServiceInner, Status};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::FrameContext;

pub(crate) struct RenderWorker {
    inner: Arc<ServiceInner>,
    root: Visualizer,
    frame: u64,
    start_time: Instant,
    last_frame_time: Instant,
}

impl RenderWorker {
    pub(crate) fn new(inner: Arc<ServiceInner>) -> Self {
        let root = Visualizer::with_title(inner.options.window.title.clone());
        Self {
            inner,
            root,
            frame: 0,
            start_time: Instant::now(),
            last_frame_time: Instant::now(),
        }
    }

    pub(crate) fn run(mut self) {
        let mut backend = {
            let factory = self
                .inner
                .backend_factory
                .lock()
                .unwrap_or_else(|e| e.into_inner());
            (*factory)()
        };

        if let Err(e) = backend.init(&self.inner.options.window) {
            tracing::error!("render backend failed to initialize: {e}");
            self.inner.discard_pending();
            self.inner
                .status
                .store(Status::Stopped as u8, Ordering::SeqCst);
            return;
        }

        self.inner.transition(Status::Starting, Status::Running);
        tracing::info!("render thread started");

        loop {
            if self.inner.stop_requested.load(Ordering::Acquire) {
                break;
            }

            let input = backend.poll();
            if input.close_requested {
                tracing::info!("close requested by platform");
                break;
            }

            let shutdown = self.drain_commands();

            self.run_frame_hook(input.delta);

            if let Err(e) = backend.render(&mut self.root) {
                tracing::error!("render failed: {e}");
                break;
            }
            self.frame += 1;

            if shutdown {
                break;
            }

            self.rate_limit();
        }

        backend.shutdown();
        self.inner.discard_pending();
        // When stop() initiated the exit it owns the transition to Stopped;
        // self-initiated exits (close, shutdown command, backend error)
        // reset the status here.
        self.inner.transition(Status::Running, Status::Stopped);
        tracing::info!(frames = self.frame, "render thread stopped");
    }

    /// Swap out the entire queue, then apply the batch in FIFO order
    ///
    /// The channel is only touched while collecting; no command runs with
    /// producers excluded. Returns true when the batch contained a
    /// [`Command::Shutdown`]. The rest of the batch is still applied, as
    /// those commands were enqueued before shutdown was requested.
    fn drain_commands(&mut self) -> bool {
        let pending: Vec<Command> = self.inner.command_rx.try_iter().collect();
        let mut shutdown = false;
        for command in pending {
            if matches!(command, Command::Shutdown) {
                shutdown = true;
                continue;
            }
            self.apply(command);
        }
        shutdown
    }

    fn apply(&mut self, command: Command) {
        match command {
            Command::SetScalar { tab, key, value } => {
                self.root.ensure_tab(&tab).set_value(key, value);
            }
            Command::PushSample {
                tab,
                key,
                sample,
                config,
            } => {
                let tab = self.root.ensure_tab(&tab);
                match config {
                    Some(config) => tab.push_sample_with(key, sample, config),
                    None => tab.push_sample(key, sample),
                };
            }
            Command::ExtendSamples {
                tab,
                key,
                samples,
                config,
            } => {
                let tab = self.root.ensure_tab(&tab);
                match config {
                    Some(config) => tab.extend_samples_with(key, samples, config),
                    None => tab.extend_samples(key, samples),
                };
            }
            Command::UpdateStructure { tab, key, build } => {
                self.root.ensure_tab(&tab).update_structure(key, build);
            }
            Command::ClearTab { tab } => {
                self.root.ensure_tab(&tab).clear();
            }
            Command::SetWindowTitle(title) => self.root.set_title(title),
            Command::SetVisible(visible) => self.root.set_visible(visible),
            Command::Apply(f) => f(&mut self.root),
            Command::Shutdown => {}
        }
    }

    fn run_frame_hook(&mut self, delta: Duration) {
        let ctx = FrameContext {
            elapsed: self.start_time.elapsed(),
            delta,
            frame: self.frame,
        };
        let mut hook = self
            .inner
            .frame_hook
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        if let Some(hook) = hook.as_mut() {
            hook(&mut self.root, &ctx);
        }
    }

    fn rate_limit(&mut self) {
        let hz = self.inner.options.frame_rate_hz;
        if hz == 0 {
            std::thread::yield_now();
            return;
        }

        let target_interval = Duration::from_micros(1_000_000 / hz as u64);
        let elapsed = self.last_frame_time.elapsed();
        if elapsed < target_interval {
            std::thread::sleep(target_interval - elapsed);
        }
        self.last_frame_time = Instant::now();
    }
}
