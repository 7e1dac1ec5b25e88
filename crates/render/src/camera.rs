use glam::{Mat4, Quat, Vec3};

/// How the camera maps view space to clip space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    /// Vertical field of view in radians.
    Perspective { fov_y: f32 },
    /// Height of the view volume in world units.
    Orthographic { height: f32 },
}

impl Projection {
    pub const DEFAULT_FOV_Y: f32 = 1.047_197_6; // 60 degrees
}

/// Camera with position, orientation, and projection parameters.
///
/// Holds no identity of its own; whoever owns it rewrites it every frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub orientation: Quat,
    pub projection: Projection,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            projection: Projection::Perspective {
                fov_y: Projection::DEFAULT_FOV_Y,
            },
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl Camera {
    /// Switch to a perspective projection with the default field of view.
    pub fn set_perspective(&mut self) {
        self.projection = Projection::Perspective {
            fov_y: Projection::DEFAULT_FOV_Y,
        };
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    pub fn set_orientation(&mut self, orientation: Quat) {
        self.orientation = orientation;
    }

    pub fn forward(&self) -> Vec3 {
        self.orientation * Vec3::NEG_Z
    }

    pub fn up(&self) -> Vec3 {
        self.orientation * Vec3::Y
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_to_rh(self.position, self.forward(), self.up())
    }

    pub fn projection_matrix(&self) -> Mat4 {
        match self.projection {
            Projection::Perspective { fov_y } => {
                Mat4::perspective_rh(fov_y, self.aspect, self.near, self.far)
            }
            Projection::Orthographic { height } => {
                let half_h = height * 0.5;
                let half_w = half_h * self.aspect;
                Mat4::orthographic_rh(-half_w, half_w, -half_h, half_h, self.near, self.far)
            }
        }
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_camera() {
        let cam = Camera::default();
        let vp = cam.view_projection();
        // Should produce a valid matrix (no NaN)
        assert!(!vp.is_nan());
        assert_eq!(cam.forward(), Vec3::NEG_Z);
    }

    #[test]
    fn set_perspective_restores_default_fov() {
        let mut cam = Camera {
            projection: Projection::Orthographic { height: 10.0 },
            ..Camera::default()
        };
        cam.set_perspective();
        assert_eq!(
            cam.projection,
            Projection::Perspective {
                fov_y: Projection::DEFAULT_FOV_Y
            }
        );
    }

    #[test]
    fn view_matrix_moves_eye_to_origin() {
        let mut cam = Camera::default();
        cam.set_position(Vec3::new(1.0, 2.0, 3.0));
        let eye = cam.view_matrix().transform_point3(cam.position);
        assert!(eye.length() < 1e-5);
    }

    #[test]
    fn point_ahead_lands_inside_clip_space() {
        let mut cam = Camera::default();
        cam.set_orientation(Quat::from_rotation_y(std::f32::consts::FRAC_PI_2));
        let ahead = cam.position + cam.forward() * 5.0;
        let clip = cam.view_projection().project_point3(ahead);
        assert!(clip.x.abs() < 1e-4 && clip.y.abs() < 1e-4);
        assert!((0.0..=1.0).contains(&clip.z));
    }

    #[test]
    fn orthographic_projection_is_finite() {
        let cam = Camera {
            projection: Projection::Orthographic { height: 10.0 },
            ..Camera::default()
        };
        assert!(cam.projection_matrix().is_finite());
    }
}
