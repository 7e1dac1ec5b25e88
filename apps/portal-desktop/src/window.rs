//! winit window driven by pumping, so the game keeps ownership of the loop.

use std::time::Duration;

use portal_input::{InputState, Key, Window, WindowError};
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{DeviceEvent, DeviceId, ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{CursorGrabMode, WindowAttributes, WindowId};

/// Attempts at pumping the loop while waiting for the platform to hand us a window.
const CREATE_ATTEMPTS: u32 = 100;

pub struct WinitWindow {
    event_loop: EventLoop<()>,
    handler: Handler,
}

#[derive(Default)]
struct Handler {
    pending: Option<WindowAttributes>,
    window: Option<winit::window::Window>,
    create_error: Option<String>,
    input: InputState,
    size: (u32, u32),
    close_requested: bool,
    mouse_locked: bool,
}

impl WinitWindow {
    pub fn new() -> Result<Self, WindowError> {
        let event_loop = EventLoop::new().map_err(|e| WindowError::Create(e.to_string()))?;
        event_loop.set_control_flow(ControlFlow::Poll);
        Ok(Self {
            event_loop,
            handler: Handler::default(),
        })
    }

    fn pump(&mut self) {
        let status = self
            .event_loop
            .pump_app_events(Some(Duration::ZERO), &mut self.handler);
        if let PumpStatus::Exit(code) = status {
            tracing::debug!(code, "event loop exited");
            self.handler.close_requested = true;
        }
    }
}

impl ApplicationHandler for Handler {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let Some(attrs) = self.pending.take() else {
            return;
        };
        match event_loop.create_window(attrs) {
            Ok(window) => {
                let size = window.inner_size();
                self.size = (size.width.max(1), size.height.max(1));
                self.window = Some(window);
            }
            Err(e) => self.create_error = Some(e.to_string()),
        }
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => self.close_requested = true,
            WindowEvent::Resized(size) => {
                self.size = (size.width.max(1), size.height.max(1));
            }
            WindowEvent::Focused(false) => self.input.clear(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        ..
                    },
                ..
            } => {
                if let Some(key) = map_key(code) {
                    self.input.handle_key(key, state == ElementState::Pressed);
                }
            }
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            if self.mouse_locked {
                self.input.handle_pointer(delta.0 as f32, delta.1 as f32);
            }
        }
    }
}

fn map_key(code: KeyCode) -> Option<Key> {
    let key = match code {
        KeyCode::KeyW => Key::W,
        KeyCode::KeyA => Key::A,
        KeyCode::KeyS => Key::S,
        KeyCode::KeyD => Key::D,
        KeyCode::KeyQ => Key::Q,
        KeyCode::KeyE => Key::E,
        KeyCode::Space => Key::Space,
        KeyCode::Escape => Key::Escape,
        KeyCode::ShiftLeft => Key::LeftShift,
        KeyCode::ControlLeft => Key::LeftControl,
        KeyCode::ArrowUp => Key::Up,
        KeyCode::ArrowDown => Key::Down,
        KeyCode::ArrowLeft => Key::Left,
        KeyCode::ArrowRight => Key::Right,
        _ => return None,
    };
    Some(key)
}

impl Window for WinitWindow {
    fn create(&mut self, title: &str, width: u32, height: u32) -> Result<(), WindowError> {
        self.handler.pending = Some(
            winit::window::Window::default_attributes()
                .with_title(title)
                .with_inner_size(PhysicalSize::new(width, height)),
        );
        for _ in 0..CREATE_ATTEMPTS {
            self.pump();
            if let Some(e) = self.handler.create_error.take() {
                return Err(WindowError::Create(e));
            }
            if self.handler.window.is_some() {
                tracing::info!(title, width, height, "window created");
                return Ok(());
            }
            if self.handler.close_requested {
                return Err(WindowError::Closed);
            }
        }
        Err(WindowError::Create("platform never resumed the application".into()))
    }

    fn process_events(&mut self) {
        self.pump();
    }

    fn input(&self) -> &InputState {
        &self.handler.input
    }

    fn input_mut(&mut self) -> &mut InputState {
        &mut self.handler.input
    }

    fn close_requested(&self) -> bool {
        self.handler.close_requested
    }

    fn size(&self) -> (u32, u32) {
        self.handler.size
    }

    fn lock_mouse(&mut self) {
        let Some(window) = &self.handler.window else {
            return;
        };
        let grabbed = window
            .set_cursor_grab(CursorGrabMode::Locked)
            .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined));
        if let Err(e) = grabbed {
            tracing::warn!("cursor grab unavailable: {e}");
        }
        window.set_cursor_visible(false);
        self.handler.mouse_locked = true;
    }

    fn unlock_mouse(&mut self) {
        let Some(window) = &self.handler.window else {
            return;
        };
        if let Err(e) = window.set_cursor_grab(CursorGrabMode::None) {
            tracing::warn!("cursor release failed: {e}");
        }
        window.set_cursor_visible(true);
        self.handler.mouse_locked = false;
    }

    fn is_mouse_locked(&self) -> bool {
        self.handler.mouse_locked
    }

    fn set_title(&mut self, title: &str) {
        if let Some(window) = &self.handler.window {
            window.set_title(title);
        }
    }

    fn swap_buffers(&mut self) {
        if let Some(window) = &self.handler.window {
            window.pre_present_notify();
            window.request_redraw();
        }
    }

    fn close(&mut self) {
        if self.handler.window.take().is_some() {
            self.handler.mouse_locked = false;
            self.handler.input.clear();
            tracing::info!("window closed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movement_keys_are_mapped() {
        assert_eq!(map_key(KeyCode::KeyW), Some(Key::W));
        assert_eq!(map_key(KeyCode::ArrowLeft), Some(Key::Left));
        assert_eq!(map_key(KeyCode::KeyQ), Some(Key::Q));
    }

    #[test]
    fn unknown_keys_are_ignored() {
        assert_eq!(map_key(KeyCode::F12), None);
    }
}
