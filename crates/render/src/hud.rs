use glam::Vec3;
use portal_input::Window;
use portal_kernel::World;

use crate::renderer::RenderError;

/// Numbers shown on top of the scene.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Hud {
    pub fps: u32,
    pub frame: u64,
    pub tick: u64,
    /// How far real time sits between the previous and next simulation step.
    pub interpolation: f32,
    pub player_position: Vec3,
}

/// Draws the overlay after the scene has been rendered.
pub trait UiRenderer {
    fn render(
        &mut self,
        world: &World,
        hud: &Hud,
        window: &mut dyn Window,
    ) -> Result<(), RenderError>;
}

/// Shows the HUD in the window title.
///
/// The title is only rewritten when the text changes, so a steady frame
/// rate costs nothing per frame.
#[derive(Debug, Clone)]
pub struct TitleHud {
    base: String,
    current: String,
}

impl TitleHud {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            current: String::new(),
        }
    }

    pub fn text(&self) -> &str {
        &self.current
    }

    fn format(&self, world: &World, hud: &Hud) -> String {
        let p = hud.player_position;
        format!(
            "{} | {} fps | {} entities | pos ({:.1}, {:.1}, {:.1})",
            self.base,
            hud.fps,
            world.entity_count(),
            p.x,
            p.y,
            p.z
        )
    }
}

impl UiRenderer for TitleHud {
    fn render(
        &mut self,
        world: &World,
        hud: &Hud,
        window: &mut dyn Window,
    ) -> Result<(), RenderError> {
        let text = self.format(world, hud);
        if text != self.current {
            window.set_title(&text);
            self.current = text;
        }
        Ok(())
    }
}
