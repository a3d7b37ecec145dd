use glam::{Mat4, Vec3};

/// Perspective camera looking down -Z at the origin.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera {
    /// Vertical field of view in degrees.
    pub fov_y_deg: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
}

impl Camera {
    pub fn at_distance(z: f32) -> Self {
        Self {
            fov_y_deg: 75.0,
            aspect: 1.0,
            near: 0.1,
            far: 1000.0,
            position: Vec3::new(0.0, 0.0, z),
        }
    }

    /// Sets the aspect ratio from a surface size. Degenerate sizes are ignored.
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.aspect = width / height;
        }
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, Vec3::ZERO, Vec3::Y)
    }

    /// Right-handed projection with a `[0, 1]` depth range.
    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y_deg.to_radians(), self.aspect, self.near, self.far)
    }
}

/// Ambient + one directional light.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LightSet {
    pub ambient: f32,
    pub directional: f32,
    /// Position the directional light shines from, toward the origin.
    pub direction_from: Vec3,
}

impl Default for LightSet {
    fn default() -> Self {
        Self {
            ambient: 0.5,
            directional: 1.0,
            direction_from: Vec3::new(10.0, 10.0, 10.0),
        }
    }
}

impl LightSet {
    /// Unit vector pointing from the scene toward the light.
    pub fn to_light(&self) -> Vec3 {
        self.direction_from.normalize_or_zero()
    }
}
