use std::time::Duration;

use glam::Vec2;
use portal_audio::{AudioDevice, NullAudioDevice, SoundManager};
use portal_input::{Bindings, Window};
use portal_kernel::{PhysicsSystem, PlayerSystem, World};
use portal_render::{Camera, DebugTextRenderer, Hud, Renderer, TitleHud, UiRenderer};
use portal_scene::{SceneLoader, YamlSceneLoader};
use portal_tools::FpsCounter;

use crate::clock::{Clock, SystemClock};
use crate::config::{GameConfig, StartupPolicy, StepMode};
use crate::error::{FrameError, StartupError};
use crate::scheduler::{Scheduler, Tick};
use crate::stepper::SimulationStepper;
use crate::view::refresh_camera;

/// Lifecycle of a game. `Closed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Uninitialized,
    Initializing,
    Running,
    Closed,
}

/// Collects collaborators and brings a [`Game`] up.
///
/// Anything not supplied gets a default: system clock, null audio device,
/// text renderer, title HUD and the YAML scene loader.
pub struct GameBuilder<W: Window> {
    config: GameConfig,
    window: W,
    clock: Box<dyn Clock>,
    audio_device: Box<dyn AudioDevice>,
    renderer: Box<dyn Renderer>,
    ui: Option<Box<dyn UiRenderer>>,
    loader: Box<dyn SceneLoader>,
    bindings: Bindings,
}

impl<W: Window> GameBuilder<W> {
    pub fn new(config: GameConfig, window: W) -> Self {
        Self {
            config,
            window,
            clock: Box::new(SystemClock::new()),
            audio_device: Box::new(NullAudioDevice::new()),
            renderer: Box::new(DebugTextRenderer::new()),
            ui: None,
            loader: Box::new(YamlSceneLoader::new()),
            bindings: Bindings::default(),
        }
    }

    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn audio_device(mut self, device: impl AudioDevice + 'static) -> Self {
        self.audio_device = Box::new(device);
        self
    }

    pub fn renderer(mut self, renderer: impl Renderer + 'static) -> Self {
        self.renderer = Box::new(renderer);
        self
    }

    pub fn ui_renderer(mut self, ui: impl UiRenderer + 'static) -> Self {
        self.ui = Some(Box::new(ui));
        self
    }

    pub fn scene_loader(mut self, loader: impl SceneLoader + 'static) -> Self {
        self.loader = Box::new(loader);
        self
    }

    pub fn bindings(mut self, bindings: Bindings) -> Self {
        self.bindings = bindings;
        self
    }

    /// Create the window, acquire audio, build the world and load the
    /// initial scene.
    ///
    /// On failure the window (if it was created) is closed again and the
    /// error is returned; there is no half-initialized game.
    pub fn build(self) -> Result<Game<W>, StartupError> {
        let _span = tracing::info_span!("startup").entered();
        tracing::info!(
            state = ?GameState::Initializing,
            title = %self.config.title,
            "game initializing"
        );
        if let Err(e) = self.config.validate() {
            return Err(report(e.into()));
        }

        let GameBuilder {
            config,
            mut window,
            clock,
            audio_device,
            mut renderer,
            ui,
            mut loader,
            bindings,
        } = self;

        let (width, height) = (config.window.width, config.window.height);
        if let Err(e) = window.create(&config.title, width, height) {
            return Err(abort(&mut window, e.into()));
        }
        if config.cursor_visible {
            window.unlock_mouse();
        } else {
            window.lock_mouse();
        }

        let sound = match SoundManager::init(&config.audio, audio_device) {
            Ok(sound) => sound,
            Err(e) if config.startup_policy == StartupPolicy::Degraded => {
                tracing::warn!(error = %e, "audio unavailable, continuing muted");
                SoundManager::muted()
            }
            Err(e) => return Err(abort(&mut window, e.into())),
        };

        let mut world = World::new();
        if let Err(e) = world.create() {
            return Err(abort(&mut window, e.into()));
        }
        world
            .system_transaction()
            .add_system(PlayerSystem)
            .add_system(PhysicsSystem::default());

        let viewport = window.size();
        if let Err(e) = renderer.set_viewport(viewport.0, viewport.1) {
            return Err(abort(&mut window, e.into()));
        }
        let ui = ui.unwrap_or_else(|| Box::new(TitleHud::new(config.title.clone())));

        let scene = config.scene_path();
        if let Err(e) = loader.load(&mut world, &scene) {
            return Err(abort(&mut window, e.into()));
        }
        if let Err(source) = world.player() {
            return Err(abort(&mut window, StartupError::NoPlayer { path: scene, source }));
        }

        let now = clock.now_millis();
        let scheduler = Scheduler::new(config.scheduler, now);
        tracing::info!(
            state = ?GameState::Running,
            scene = %scene.display(),
            entities = world.entity_count(),
            "game running"
        );

        Ok(Game {
            config,
            state: GameState::Running,
            cleaned_up: false,
            window,
            clock,
            scheduler,
            stepper: SimulationStepper::new(),
            sound,
            world,
            camera: Camera::default(),
            renderer,
            ui,
            bindings,
            fps: FpsCounter::new(),
            viewport,
            last_render: now,
            last_tick: None,
            frames: 0,
        })
    }
}

fn report(error: StartupError) -> StartupError {
    tracing::error!(%error, "startup failed");
    error
}

fn abort<W: Window>(window: &mut W, error: StartupError) -> StartupError {
    window.close();
    report(error)
}

/// A running game: the world, its collaborators and the frame loop.
pub struct Game<W: Window> {
    config: GameConfig,
    state: GameState,
    cleaned_up: bool,
    window: W,
    clock: Box<dyn Clock>,
    scheduler: Scheduler,
    stepper: SimulationStepper,
    sound: SoundManager,
    world: World,
    camera: Camera,
    renderer: Box<dyn Renderer>,
    ui: Box<dyn UiRenderer>,
    bindings: Bindings,
    fps: FpsCounter,
    viewport: (u32, u32),
    last_render: u64,
    last_tick: Option<Tick>,
    frames: u64,
}

impl<W: Window> std::fmt::Debug for Game<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Game")
            .field("state", &self.state)
            .field("scheduler", &self.scheduler)
            .field("world", &self.world)
            .field("camera", &self.camera)
            .field("fps", &self.fps.fps())
            .field("frames", &self.frames)
            .finish_non_exhaustive()
    }
}

impl<W: Window> Game<W> {
    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == GameState::Running
    }

    /// Stop the loop. There is no way back to running.
    pub fn close(&mut self) {
        if self.state != GameState::Closed {
            self.state = GameState::Closed;
            tracing::info!(state = ?GameState::Closed, frames = self.frames, "game closed");
        }
    }

    /// Pump window events, close on the quit key or a close request, and
    /// hand the frame's player intent to the world.
    pub fn process_input(&mut self) {
        if !self.is_running() {
            return;
        }
        self.window.process_events();
        if self.window.close_requested() || self.window.is_key_down(self.config.quit_key) {
            self.close();
            return;
        }
        // Look not yet consumed by a step carries over to the next frame.
        let mut controls = self.window.input_mut().take_controls(&self.bindings);
        controls.look += self.world.controls().look;
        self.world.set_controls(controls);
    }

    /// Run the simulation steps the clock says are due.
    pub fn update(&mut self) -> Result<Tick, FrameError> {
        if !self.is_running() {
            return Err(FrameError::NotRunning);
        }
        let tick = self.scheduler.tick(self.clock.now_millis());
        let _span =
            tracing::info_span!("update", steps = tick.steps, tick = self.world.tick()).entered();

        match self.config.step_mode {
            StepMode::Quantized => {
                let dt = Duration::from_millis(self.scheduler.skip_time_ms());
                for _ in 0..tick.steps {
                    self.stepper.advance(&mut self.world, &mut self.sound, dt)?;
                    self.consume_look();
                }
            }
            StepMode::WallClock => {
                let dt = Duration::from_millis(tick.elapsed_ms);
                self.stepper.advance(&mut self.world, &mut self.sound, dt)?;
                self.consume_look();
            }
        }
        self.world.drain_events();
        self.last_tick = Some(tick);
        Ok(tick)
    }

    // Look deltas are per frame; later steps of the same frame must not turn again.
    fn consume_look(&mut self) {
        let mut controls = self.world.controls();
        controls.look = Vec2::ZERO;
        self.world.set_controls(controls);
    }

    /// Rebuild the camera from the player, draw the world and the HUD, and
    /// present.
    pub fn render(&mut self) -> Result<(), FrameError> {
        if !self.is_running() {
            return Err(FrameError::NotRunning);
        }
        let size = self.window.size();
        if size != self.viewport {
            self.renderer.set_viewport(size.0, size.1)?;
            self.viewport = size;
        }

        let view = self.world.player_view()?;
        refresh_camera(&mut self.camera, &view, size.0, size.1);

        let now = self.scheduler.current();
        let dt_secs = now.saturating_sub(self.last_render) as f64 / 1000.0;
        self.renderer.render(&self.world, &self.camera, dt_secs)?;

        let hud = Hud {
            fps: self.fps.fps(),
            frame: self.frames,
            tick: self.world.tick(),
            interpolation: self.last_tick.map_or(0.0, |t| t.interpolation),
            player_position: view.transform.position,
        };
        self.ui.render(&self.world, &hud, &mut self.window)?;

        self.fps.count_cycle(self.clock.now_millis());
        self.window.swap_buffers();
        self.last_render = now;
        self.frames += 1;
        Ok(())
    }

    /// One pass of input, update and render. Update and render are skipped
    /// once input has closed the game.
    pub fn frame(&mut self) -> Result<(), FrameError> {
        self.process_input();
        if !self.is_running() {
            return Ok(());
        }
        self.update()?;
        self.render()
    }

    /// Drive frames until the game closes, then clean up. A frame error
    /// stops the loop; cleanup still happens before it is returned.
    pub fn run(&mut self) -> Result<(), FrameError> {
        let mut result = Ok(());
        while self.is_running() {
            if let Err(e) = self.frame() {
                tracing::error!(error = %e, frame = self.frames, "frame failed");
                result = Err(e);
                break;
            }
        }
        self.clean_up();
        result
    }

    /// Close the game, destroy the world, release audio and close the
    /// window. Safe to call more than once.
    pub fn clean_up(&mut self) {
        self.close();
        if self.cleaned_up {
            return;
        }
        self.cleaned_up = true;
        self.sound.shutdown();
        self.world.destroy();
        self.window.close();
        tracing::info!(
            frames = self.frames,
            ticks = self.scheduler.total_steps(),
            "game cleaned up"
        );
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn window(&self) -> &W {
        &self.window
    }

    pub fn window_mut(&mut self) -> &mut W {
        &mut self.window
    }

    pub fn sound(&self) -> &SoundManager {
        &self.sound
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn fps(&self) -> &FpsCounter {
        &self.fps
    }

    /// Frames presented so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn last_tick(&self) -> Option<Tick> {
        self.last_tick
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::{Path, PathBuf};

    use glam::Vec3;
    use portal_common::Transform;
    use portal_ecs::Player;
    use portal_input::{HeadlessWindow, Key, WindowError};
    use portal_scene::{SceneError, SceneSummary};

    use crate::clock::ManualClock;

    /// Spawns a single player, optionally without the player component.
    struct OnePlayer {
        with_player: bool,
    }

    impl SceneLoader for OnePlayer {
        fn load(&mut self, world: &mut World, _path: &Path) -> Result<SceneSummary, SceneError> {
            let id = world.spawn(Transform::default().with_scale(Vec3::new(1.0, 1.8, 1.0)));
            if self.with_player {
                world.components_mut().set_player(id, Player::default());
            }
            Ok(SceneSummary {
                name: None,
                entities: 1,
                players: usize::from(self.with_player),
            })
        }
    }

    impl Game<HeadlessWindow> {
        fn update_after_input(&mut self) -> Tick {
            self.process_input();
            self.update().unwrap()
        }
    }

    fn build(clock: &ManualClock) -> Game<HeadlessWindow> {
        GameBuilder::new(GameConfig::default(), HeadlessWindow::default())
            .clock(clock.clone())
            .scene_loader(OnePlayer { with_player: true })
            .build()
            .unwrap()
    }

    #[test]
    fn build_runs_and_locks_mouse() {
        let game = build(&ManualClock::new(0));
        assert_eq!(game.state(), GameState::Running);
        assert!(game.window().is_created());
        assert!(game.window().is_mouse_locked());
        assert_eq!(game.world().system_names(), vec!["player", "physics"]);
    }

    #[test]
    fn visible_cursor_leaves_mouse_free() {
        let config = GameConfig {
            cursor_visible: true,
            ..GameConfig::default()
        };
        let game = GameBuilder::new(config, HeadlessWindow::default())
            .clock(ManualClock::new(0))
            .scene_loader(OnePlayer { with_player: true })
            .build()
            .unwrap();
        assert!(!game.window().is_mouse_locked());
    }

    #[test]
    fn scene_without_player_aborts() {
        let err = GameBuilder::new(GameConfig::default(), HeadlessWindow::default())
            .clock(ManualClock::new(0))
            .scene_loader(OnePlayer { with_player: false })
            .build()
            .unwrap_err();
        assert!(matches!(err, StartupError::NoPlayer { .. }));
    }

    #[test]
    fn window_failure_aborts() {
        let mut window = HeadlessWindow::default();
        window.close();
        let err = GameBuilder::new(GameConfig::default(), window)
            .clock(ManualClock::new(0))
            .scene_loader(OnePlayer { with_player: true })
            .build()
            .unwrap_err();
        assert!(matches!(err, StartupError::Window(WindowError::Closed)));
    }

    #[test]
    fn invalid_config_aborts() {
        let mut config = GameConfig::default();
        config.scheduler.max_skip = 0;
        let err = GameBuilder::new(config, HeadlessWindow::default())
            .clock(ManualClock::new(0))
            .scene_loader(OnePlayer { with_player: true })
            .build()
            .unwrap_err();
        assert!(matches!(err, StartupError::Config(_)));
    }

    #[test]
    fn missing_scene_file_aborts() {
        let config = GameConfig {
            map_path: Some(PathBuf::from("/no/such/scene.yaml")),
            ..GameConfig::default()
        };
        let err = GameBuilder::new(config, HeadlessWindow::default())
            .clock(ManualClock::new(0))
            .build()
            .unwrap_err();
        assert!(matches!(err, StartupError::Scene(SceneError::Io { .. })));
    }

    #[test]
    fn quantized_update_steps_by_skip_time() {
        let clock = ManualClock::new(0);
        let mut game = build(&clock);
        clock.set(48);
        let tick = game.update().unwrap();
        assert_eq!(tick.steps, 3);
        assert_eq!(game.world().tick(), 3);
        assert_eq!(game.world().elapsed(), Duration::from_millis(48));
    }

    #[test]
    fn wall_clock_update_advances_once_with_real_time() {
        let clock = ManualClock::new(0);
        let config = GameConfig {
            step_mode: StepMode::WallClock,
            ..GameConfig::default()
        };
        let mut game = GameBuilder::new(config, HeadlessWindow::default())
            .clock(clock.clone())
            .scene_loader(OnePlayer { with_player: true })
            .build()
            .unwrap();

        clock.set(40);
        game.update().unwrap();
        assert_eq!(game.world().tick(), 1);
        assert_eq!(game.world().elapsed(), Duration::from_millis(40));

        // No step owed, the world still advances by the real delta.
        let tick = game.update().unwrap();
        assert_eq!(tick.steps, 0);
        assert_eq!(game.world().tick(), 2);
    }

    #[test]
    fn look_from_a_frame_without_steps_is_kept() {
        let clock = ManualClock::new(0);
        let mut game = build(&clock);
        let sensitivity = game.world().player_view().unwrap().player.look_sensitivity;

        game.window_mut().move_pointer(100.0, 0.0);
        let tick = game.update_after_input();
        assert_eq!(tick.steps, 0);
        assert_eq!(game.world().player_view().unwrap().player.yaw(), 0.0);

        clock.set(16);
        let tick = game.update_after_input();
        assert_eq!(tick.steps, 1);
        let yaw = game.world().player_view().unwrap().player.yaw();
        assert!((yaw + 100.0 * sensitivity).abs() < 1e-6, "yaw {yaw}");

        // Consumed by that step; a later step does not turn again.
        clock.set(32);
        game.update_after_input();
        let again = game.world().player_view().unwrap().player.yaw();
        assert_eq!(again, yaw);
    }

    #[test]
    fn update_leaves_no_world_events_behind() {
        let clock = ManualClock::new(0);
        let mut game = build(&clock);
        clock.set(32);
        game.update().unwrap();
        assert!(game.world().events().is_empty());
    }

    #[test]
    fn quit_key_closes_for_good() {
        let clock = ManualClock::new(0);
        let mut game = build(&clock);
        game.window_mut().press(Key::Q);
        game.frame().unwrap();
        assert!(!game.is_running());
        assert_eq!(game.frames(), 0);

        game.window_mut().release(Key::Q);
        game.process_input();
        assert_eq!(game.state(), GameState::Closed);
        assert!(matches!(game.update(), Err(FrameError::NotRunning)));
    }

    #[test]
    fn close_request_closes() {
        let mut game = build(&ManualClock::new(0));
        game.window_mut().request_close();
        game.process_input();
        assert_eq!(game.state(), GameState::Closed);
    }

    #[test]
    fn render_places_camera_at_eye_height() {
        let clock = ManualClock::new(0);
        let mut game = build(&clock);
        game.render().unwrap();
        assert_eq!(game.camera().position, Vec3::new(0.0, 1.8, 0.0));
        assert_eq!(game.camera().aspect, 1280.0 / 720.0);
        assert_eq!(game.window().frames_presented(), 1);
        assert!(game.window().title().starts_with("Portal |"));
    }

    #[test]
    fn render_follows_window_resize() {
        let mut game = build(&ManualClock::new(0));
        game.window_mut().resize(1920, 1080);
        game.process_input();
        game.render().unwrap();
        assert_eq!(game.camera().aspect, 1920.0 / 1080.0);
    }

    #[test]
    fn clean_up_is_idempotent() {
        let mut game = build(&ManualClock::new(0));
        game.clean_up();
        game.clean_up();
        assert_eq!(game.state(), GameState::Closed);
        assert!(!game.world().is_alive());
        assert!(game.window().is_closed());
    }

    #[test]
    fn run_stops_on_quit_and_cleans_up() {
        let clock = ManualClock::new(0);
        let mut game = build(&clock);
        game.window_mut().press(Key::Q);
        game.run().unwrap();
        assert!(game.window().is_closed());
        assert!(!game.world().is_alive());
    }
}
