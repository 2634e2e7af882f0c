//! The viewer: live model set, playback controls and the tick loop.
//!
//! ```rust,ignore
//! use kinescope::{LoadSource, NullRenderer, Viewer, ViewerConfig};
//!
//! let mut viewer = Viewer::new(ViewerConfig::default(), NullRenderer)?;
//! viewer.spawn_load(LoadSource::Fixture(0));
//!
//! // on every display refresh:
//! for event in viewer.poll_loads() { /* surface failures */ }
//! viewer.tick();
//! ```

use slotmap::SlotMap;

use crate::config::ViewerConfig;
use crate::errors::{KinescopeError, LoadError, PlaybackError, Result, ValidationError};
use crate::loader::{LoadSlot, LoadSource, LoadTask, LoaderPipeline};
use crate::playback::{
    self, ModelHandle, PlaybackClock, PlaybackModel, PlaybackState, PlaybackStatus,
    SceneModelBuilder,
};
use crate::render::{NullRenderer, Renderer};
use crate::schema::AnimationLog;
use crate::scene::Scene;
use crate::utils::task;
use crate::utils::time::{HostClock, TimeSource};

/// Outcome of committing one finished load.
#[derive(Debug)]
pub enum LoadEvent {
    Loaded { handle: ModelHandle, label: String },
    Failed { label: String, error: LoadError },
}

/// What an eligible tick did.
#[derive(Debug, Default)]
pub struct TickReport {
    /// Elapsed seconds fed to the frame mapper.
    pub elapsed: f64,
    /// Models halted during this tick.
    pub faults: Vec<(ModelHandle, PlaybackError)>,
}

#[derive(Debug)]
pub enum TickOutcome {
    /// Less than one tick interval since the previous eligible tick.
    Skipped,
    Rendered(TickReport),
}

impl TickOutcome {
    #[must_use]
    pub fn is_rendered(&self) -> bool {
        matches!(self, Self::Rendered(_))
    }
}

pub struct Viewer<R: Renderer = NullRenderer> {
    config: ViewerConfig,
    scene: Scene,
    renderer: R,
    models: SlotMap<ModelHandle, PlaybackModel>,
    state: PlaybackState,
    clock: PlaybackClock,
    time: Box<dyn TimeSource>,
    loader: LoaderPipeline,
}

impl<R: Renderer> Viewer<R> {
    pub fn new(config: ViewerConfig, renderer: R) -> Result<Self> {
        Self::with_time_source(config, renderer, HostClock::new())
    }

    pub fn with_time_source(
        config: ViewerConfig,
        renderer: R,
        time: impl TimeSource + 'static,
    ) -> Result<Self> {
        config.validate()?;
        let now = time.now();
        Ok(Self {
            state: PlaybackState::new(now, config.autoplay, config.speed),
            clock: PlaybackClock::new(config.fps, now),
            config,
            scene: Scene::new(),
            renderer,
            models: SlotMap::with_key(),
            time: Box::new(time),
            loader: LoaderPipeline::new(),
        })
    }

    #[must_use]
    pub fn now(&self) -> f64 {
        self.time.now()
    }

    // ========================================================================
    // Playback controls
    // ========================================================================

    pub fn play(&mut self) {
        let now = self.time.now();
        self.state.play(now);
        log::debug!("Playback resumed at {now:.3}s");
    }

    pub fn pause(&mut self) {
        let now = self.time.now();
        self.state.pause(now);
        log::debug!("Playback paused at {now:.3}s");
    }

    /// Sets the signed playback rate: negative plays backwards, zero holds
    /// the current frames. Non-finite values are ignored.
    pub fn set_speed(&mut self, speed: f64) {
        if !speed.is_finite() {
            log::warn!("Ignoring non-finite speed {speed}");
            return;
        }
        self.state.set_speed(self.time.now(), speed);
    }

    /// Seeks so that the next eligible tick maps `seconds` of elapsed time.
    pub fn set_time(&mut self, seconds: f64) {
        if !seconds.is_finite() {
            log::warn!("Ignoring non-finite seek target {seconds}");
            return;
        }
        self.state.set_time(seconds);
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.state.is_playing()
    }

    #[must_use]
    pub fn speed(&self) -> f64 {
        self.state.speed()
    }

    #[must_use]
    pub fn status(&self) -> PlaybackStatus {
        self.state.status(self.time.now())
    }

    // ========================================================================
    // Live model set
    // ========================================================================

    /// Builds `log` into the scene and appends it to the live set. The model
    /// is driven from the next eligible tick on.
    pub fn add_log(
        &mut self,
        log: &AnimationLog,
        label: &str,
    ) -> std::result::Result<ModelHandle, ValidationError> {
        let mut model = SceneModelBuilder::build(&mut self.scene, log)?;
        model.set_label(label);
        let root = model.root();
        let handle = self.models.insert(model);

        self.renderer.on_model_added(&self.scene, root);
        log::info!(
            "Model '{label}' registered: {} groups, {} frames ({} live)",
            log.groups.len(),
            log.frames.len(),
            self.models.len()
        );
        Ok(handle)
    }

    /// Removes a model and its scene subtree.
    pub fn unload(&mut self, handle: ModelHandle) -> Result<()> {
        let model = self
            .models
            .remove(handle)
            .ok_or(KinescopeError::ModelNotFound)?;

        self.renderer.on_model_removed(&self.scene, model.root());
        self.scene.remove_node(model.root());
        log::info!(
            "Model '{}' unloaded ({} scene nodes left)",
            model.label(),
            self.scene.node_count()
        );
        Ok(())
    }

    /// Unloads every model.
    pub fn clear(&mut self) {
        for (_, model) in self.models.drain() {
            self.renderer.on_model_removed(&self.scene, model.root());
            self.scene.remove_node(model.root());
            log::info!("Model '{}' unloaded", model.label());
        }
    }

    /// Lets a halted model advance again. Returns the fault that halted it.
    pub fn resume_model(&mut self, handle: ModelHandle) -> Result<Option<PlaybackError>> {
        let model = self
            .models
            .get_mut(handle)
            .ok_or(KinescopeError::ModelNotFound)?;
        let reason = model.resume();
        if reason.is_some() {
            log::info!("Model '{}' resumed", model.label());
        }
        Ok(reason)
    }

    #[must_use]
    pub fn model(&self, handle: ModelHandle) -> Option<&PlaybackModel> {
        self.models.get(handle)
    }

    pub fn models(&self) -> impl Iterator<Item = (ModelHandle, &PlaybackModel)> {
        self.models.iter()
    }

    #[must_use]
    pub fn model_count(&self) -> usize {
        self.models.len()
    }

    // ========================================================================
    // Loading
    // ========================================================================

    /// Starts a load on the primary slot, superseding any pending one. The
    /// caller drives the returned task; its result is committed by
    /// [`poll_loads`](Self::poll_loads).
    pub fn begin_load(&mut self, source: LoadSource) -> LoadTask {
        self.begin_load_in(LoadSlot::PRIMARY, source)
    }

    pub fn begin_load_in(&mut self, slot: LoadSlot, source: LoadSource) -> LoadTask {
        self.loader.request(slot, source)
    }

    /// Starts a load on the primary slot and runs it in the background.
    pub fn spawn_load(&mut self, source: LoadSource) {
        task::spawn(self.begin_load(source));
    }

    /// Spawns the configured startup load, if any.
    pub fn start(&mut self) {
        match self.config.source.clone() {
            Some(source) => self.spawn_load(source.into_load_source()),
            None => log::info!("No startup source; waiting for a dropped log"),
        }
    }

    pub fn cancel_load(&mut self, slot: LoadSlot) -> bool {
        self.loader.cancel(slot)
    }

    #[must_use]
    pub fn pending_loads(&self) -> usize {
        self.loader.pending()
    }

    /// Commits finished loads into the live set. Call between ticks.
    ///
    /// Failures are logged and returned; no partial model is ever registered.
    pub fn poll_loads(&mut self) -> Vec<LoadEvent> {
        let mut events = Vec::new();
        for completion in self.loader.drain() {
            let label = completion.label;
            let outcome = completion
                .result
                .and_then(|log| self.add_log(&log, &label).map_err(LoadError::from));

            events.push(match outcome {
                Ok(handle) => LoadEvent::Loaded { handle, label },
                Err(error) => {
                    log::error!("Failed to load '{label}': {error}");
                    LoadEvent::Failed { label, error }
                }
            });
        }
        events
    }

    // ========================================================================
    // Tick loop
    // ========================================================================

    pub fn tick(&mut self) -> TickOutcome {
        let now = self.time.now();
        self.tick_at(now)
    }

    /// Runs one scheduling opportunity at `now`.
    ///
    /// On an eligible tick every non-halted model is mapped and posed, world
    /// matrices are refreshed and the renderer draws, whether or not playback
    /// is running. A model whose frame cannot be applied is halted and
    /// reported; the others still advance.
    pub fn tick_at(&mut self, now: f64) -> TickOutcome {
        if !self.clock.poll(now) {
            return TickOutcome::Skipped;
        }

        let elapsed = self.state.advance(now);
        let speed = self.state.speed();
        let mut report = TickReport {
            elapsed,
            faults: Vec::new(),
        };

        for (handle, model) in &mut self.models {
            if model.is_halted() {
                continue;
            }
            let previous = model.current_frame();
            let frame = playback::map_frame(model, elapsed, speed);

            match playback::apply(&mut self.scene, model, frame) {
                Ok(()) => {
                    if frame != previous {
                        log::trace!("Model '{}': frame {previous} -> {frame}", model.label());
                    }
                }
                Err(error) => {
                    log::error!("Model '{}' halted: {error}", model.label());
                    model.halt(error.clone());
                    report.faults.push((handle, error));
                }
            }
        }

        self.scene.update_matrix_world();
        self.renderer.render(&self.scene);
        TickOutcome::Rendered(report)
    }

    /// Forwards a new output size to the renderer. Zero sizes are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.renderer.resize(width, height);
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[must_use]
    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    #[must_use]
    pub fn clock(&self) -> &PlaybackClock {
        &self.clock
    }
}
