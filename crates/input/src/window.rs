use std::collections::VecDeque;

use crate::action::Key;
use crate::state::InputState;

/// Errors from window backends.
#[derive(Debug, thiserror::Error)]
pub enum WindowError {
    #[error("failed to create window: {0}")]
    Create(String),
    #[error("window already closed")]
    Closed,
}

/// What the game loop needs from a window.
pub trait Window {
    fn create(&mut self, title: &str, width: u32, height: u32) -> Result<(), WindowError>;

    /// Pump pending platform events into the input state. Never blocks.
    fn process_events(&mut self);

    fn input(&self) -> &InputState;

    fn input_mut(&mut self) -> &mut InputState;

    fn is_key_down(&self, key: Key) -> bool {
        self.input().is_key_down(key)
    }

    /// The user asked the platform to close the window.
    fn close_requested(&self) -> bool;

    /// Drawable size in pixels. Backends never report a zero height.
    fn size(&self) -> (u32, u32);

    fn lock_mouse(&mut self);

    fn unlock_mouse(&mut self);

    fn is_mouse_locked(&self) -> bool;

    fn set_title(&mut self, title: &str);

    /// Present the finished frame.
    fn swap_buffers(&mut self);

    fn close(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum ScriptedEvent {
    Key { key: Key, pressed: bool },
    Pointer { dx: f32, dy: f32 },
    Resize { width: u32, height: u32 },
    CloseRequested,
}

/// A window with no platform behind it.
///
/// Events are queued by the caller and delivered on the next
/// `process_events`, the same point a real backend would deliver them.
#[derive(Debug, Clone)]
pub struct HeadlessWindow {
    title: String,
    size: (u32, u32),
    created: bool,
    closed: bool,
    close_requested: bool,
    mouse_locked: bool,
    input: InputState,
    queued: VecDeque<ScriptedEvent>,
    frames_presented: u64,
}

impl HeadlessWindow {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            title: String::new(),
            size: (width, height),
            created: false,
            closed: false,
            close_requested: false,
            mouse_locked: false,
            input: InputState::new(),
            queued: VecDeque::new(),
            frames_presented: 0,
        }
    }

    pub fn press(&mut self, key: Key) {
        self.queued.push_back(ScriptedEvent::Key { key, pressed: true });
    }

    pub fn release(&mut self, key: Key) {
        self.queued.push_back(ScriptedEvent::Key {
            key,
            pressed: false,
        });
    }

    pub fn move_pointer(&mut self, dx: f32, dy: f32) {
        self.queued.push_back(ScriptedEvent::Pointer { dx, dy });
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.queued
            .push_back(ScriptedEvent::Resize { width, height });
    }

    pub fn request_close(&mut self) {
        self.queued.push_back(ScriptedEvent::CloseRequested);
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn is_created(&self) -> bool {
        self.created
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }
}

impl Default for HeadlessWindow {
    fn default() -> Self {
        Self::new(1280, 720)
    }
}

impl Window for HeadlessWindow {
    fn create(&mut self, title: &str, width: u32, height: u32) -> Result<(), WindowError> {
        if self.closed {
            return Err(WindowError::Closed);
        }
        self.title = title.to_string();
        self.size = (width.max(1), height.max(1));
        self.created = true;
        tracing::debug!(title, width, height, "headless window created");
        Ok(())
    }

    fn process_events(&mut self) {
        while let Some(event) = self.queued.pop_front() {
            match event {
                ScriptedEvent::Key { key, pressed } => self.input.handle_key(key, pressed),
                ScriptedEvent::Pointer { dx, dy } => self.input.handle_pointer(dx, dy),
                ScriptedEvent::Resize { width, height } => {
                    self.size = (width.max(1), height.max(1));
                }
                ScriptedEvent::CloseRequested => self.close_requested = true,
            }
        }
    }

    fn input(&self) -> &InputState {
        &self.input
    }

    fn input_mut(&mut self) -> &mut InputState {
        &mut self.input
    }

    fn close_requested(&self) -> bool {
        self.close_requested
    }

    fn size(&self) -> (u32, u32) {
        self.size
    }

    fn lock_mouse(&mut self) {
        self.mouse_locked = true;
    }

    fn unlock_mouse(&mut self) {
        self.mouse_locked = false;
    }

    fn is_mouse_locked(&self) -> bool {
        self.mouse_locked
    }

    fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    fn swap_buffers(&mut self) {
        self.frames_presented += 1;
    }

    fn close(&mut self) {
        self.closed = true;
    }
}
