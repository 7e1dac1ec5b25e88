//! Camera derivation from the controlled entity.

use glam::Vec3;
use portal_kernel::{PlayerView, World, WorldError};
use portal_render::Camera;

/// Point `camera` through the eyes of `view`.
///
/// The eye sits above the entity's position by its vertical scale, and the
/// orientation is the head orientation, copied as is. Every camera field the
/// frame depends on is overwritten, so the result depends only on the inputs.
///
/// `height` must be non-zero. Windows never report a zero height (they clamp
/// to one pixel), and debug builds assert it; in release builds a zero height
/// yields an infinite aspect ratio.
pub fn refresh_camera(camera: &mut Camera, view: &PlayerView, width: u32, height: u32) {
    debug_assert_ne!(height, 0, "viewport height must be non-zero");
    camera.set_perspective();
    camera.set_aspect(width as f32 / height as f32);
    let eye = view.transform.position + Vec3::new(0.0, view.transform.scale.y, 0.0);
    camera.set_position(eye);
    camera.set_orientation(view.player.head_orientation());
}

/// Look up the controlled entity in `world` and refresh `camera` from it.
pub fn prepare_camera(
    camera: &mut Camera,
    world: &World,
    width: u32,
    height: u32,
) -> Result<(), WorldError> {
    let view = world.player_view()?;
    refresh_camera(camera, &view, width, height);
    Ok(())
}
