use std::fmt::Write as _;

use portal_kernel::World;

use crate::camera::{Camera, Projection};

/// Errors from frame renderers.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("viewport has zero area ({width}x{height})")]
    EmptyViewport { width: u32, height: u32 },
    #[error("render backend failure: {0}")]
    Backend(String),
}

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer reads world state and a camera, then produces output. It
/// never mutates the world; world truth is kernel-owned.
pub trait Renderer {
    /// Called when the drawable area changes, and once at startup.
    fn set_viewport(&mut self, width: u32, height: u32) -> Result<(), RenderError>;

    /// Render one frame. `dt_secs` is the time since the previous frame.
    fn render(&mut self, world: &World, camera: &Camera, dt_secs: f64) -> Result<(), RenderError>;
}

/// Debug text renderer.
///
/// Produces a human-readable description of each frame, kept in memory and
/// emitted at trace level. Backs the headless runner and tests.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    viewport: (u32, u32),
    frames: u64,
    last_frame: String,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    /// Text of the most recent frame.
    pub fn last_frame(&self) -> &str {
        &self.last_frame
    }

    fn describe(&self, world: &World, camera: &Camera, dt_secs: f64) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "=== Frame {} (tick={}, dt={:.3}s, viewport={}x{}) ===",
            self.frames, world.tick(), dt_secs, self.viewport.0, self.viewport.1
        );
        let _ = writeln!(out, "Entities: {}", world.entity_count());
        let fov = match camera.projection {
            Projection::Perspective { fov_y } => format!("fov={:.0}", fov_y.to_degrees()),
            Projection::Orthographic { height } => format!("ortho={height:.1}"),
        };
        let f = camera.forward();
        let _ = writeln!(
            out,
            "Camera: eye=({:.2}, {:.2}, {:.2}) dir=({:.2}, {:.2}, {:.2}) aspect={:.3} {fov}",
            camera.position.x, camera.position.y, camera.position.z, f.x, f.y, f.z, camera.aspect,
        );

        for (id, data) in world.entities() {
            let p = data.transform.position;
            let name = world
                .components()
                .get_name(*id)
                .map_or("-", |n| n.0.as_str());
            let _ = writeln!(
                out,
                "  [{}] {name} pos=({:.2}, {:.2}, {:.2})",
                id.short(),
                p.x,
                p.y,
                p.z
            );
        }
        out
    }
}

impl Renderer for DebugTextRenderer {
    fn set_viewport(&mut self, width: u32, height: u32) -> Result<(), RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::EmptyViewport { width, height });
        }
        self.viewport = (width, height);
        Ok(())
    }

    fn render(&mut self, world: &World, camera: &Camera, dt_secs: f64) -> Result<(), RenderError> {
        self.last_frame = self.describe(world, camera, dt_secs);
        self.frames += 1;
        tracing::trace!(frame = self.frames, "\n{}", self.last_frame);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use portal_common::Transform;

    #[test]
    fn debug_renderer_empty_world() {
        let world = World::new();
        let mut renderer = DebugTextRenderer::new();
        renderer.render(&world, &Camera::default(), 0.016).unwrap();

        let output = renderer.last_frame();
        assert!(output.contains("tick=0"));
        assert!(output.contains("Entities: 0"));
        assert!(output.contains("fov=60"));
        assert_eq!(renderer.frames(), 1);
    }

    #[test]
    fn debug_renderer_with_entities() {
        let mut world = World::new();
        world.spawn(Transform::default());
        let id = world.spawn(Transform::from_position(Vec3::new(1.0, 2.0, 3.0)));
        world.components_mut().set_name(id, "box");

        let mut renderer = DebugTextRenderer::new();
        renderer.render(&world, &Camera::default(), 0.0).unwrap();
        let output = renderer.last_frame();

        assert!(output.contains("Entities: 2"));
        assert!(output.contains("box pos=(1.00, 2.00, 3.00)"));
    }

    #[test]
    fn zero_viewport_is_rejected() {
        let mut renderer = DebugTextRenderer::new();
        assert!(matches!(
            renderer.set_viewport(640, 0),
            Err(RenderError::EmptyViewport { .. })
        ));
        renderer.set_viewport(640, 480).unwrap();
        assert_eq!(renderer.viewport(), (640, 480));
    }
}
