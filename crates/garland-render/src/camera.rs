//! Orbit camera

use garland_core::{mat4_mul, Vec3};

/// A camera orbiting a target point. The viewer drives yaw/pitch/distance
/// from mouse input; the renderer reads `view_proj` and the basis vectors
/// for billboarding.
pub struct OrbitCamera {
    pub target: Vec3,
    pub distance: f32,
    /// Horizontal angle in radians
    pub yaw: f32,
    /// Vertical angle in radians
    pub pitch: f32,
    /// Field of view in degrees
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    pub aspect: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            target: Vec3::new(0.0, 1.0, 0.0),
            distance: 26.0,
            yaw: 0.4,
            pitch: 0.25,
            fov: 50.0,
            near: 0.1,
            far: 400.0,
            aspect: 16.0 / 9.0,
        }
    }
}

impl OrbitCamera {
    pub fn new() -> Self {
        Self::default()
    }

    /// Camera world position from the orbit parameters
    pub fn position(&self) -> Vec3 {
        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();
        self.target + Vec3::new(x, y, z)
    }

    pub fn orbit(&mut self, d_yaw: f32, d_pitch: f32) {
        self.yaw += d_yaw;
        // Keep away from the poles
        self.pitch = (self.pitch + d_pitch).clamp(-1.5, 1.5);
    }

    pub fn zoom(&mut self, delta: f32) {
        self.distance = (self.distance - delta).clamp(5.0, 150.0);
    }

    /// Unit right vector of the view basis (for camera-facing quads)
    pub fn right(&self) -> Vec3 {
        let forward = (self.target - self.position()).normalized();
        forward.cross(&Vec3::UP).normalized()
    }

    /// Unit up vector of the view basis
    pub fn up(&self) -> Vec3 {
        let forward = (self.target - self.position()).normalized();
        self.right().cross(&forward).normalized()
    }

    /// Combined view-projection matrix (column-major) for GPU upload
    pub fn view_proj(&self) -> [[f32; 4]; 4] {
        mat4_mul(&self.projection(), &self.view())
    }

    fn view(&self) -> [[f32; 4]; 4] {
        let eye = self.position();
        let f = (self.target - eye).normalized();
        let r = f.cross(&Vec3::UP).normalized();
        let u = r.cross(&f);

        [
            [r.x, u.x, -f.x, 0.0],
            [r.y, u.y, -f.y, 0.0],
            [r.z, u.z, -f.z, 0.0],
            [-r.dot(&eye), -u.dot(&eye), f.dot(&eye), 1.0],
        ]
    }

    fn projection(&self) -> [[f32; 4]; 4] {
        // wgpu clip space: z in [0, 1]
        let f = 1.0 / (self.fov.to_radians() / 2.0).tan();
        let nf = 1.0 / (self.near - self.far);

        [
            [f / self.aspect, 0.0, 0.0, 0.0],
            [0.0, f, 0.0, 0.0],
            [0.0, 0.0, self.far * nf, -1.0],
            [0.0, 0.0, self.near * self.far * nf, 0.0],
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_respects_distance() {
        let cam = OrbitCamera::default();
        let d = (cam.position() - cam.target).length();
        assert!((d - cam.distance).abs() < 1e-4);
    }

    #[test]
    fn zoom_clamps() {
        let mut cam = OrbitCamera::default();
        cam.zoom(1000.0);
        assert_eq!(cam.distance, 5.0);
        cam.zoom(-1000.0);
        assert_eq!(cam.distance, 150.0);
    }

    #[test]
    fn basis_is_orthonormal() {
        let mut cam = OrbitCamera::default();
        cam.orbit(0.7, -0.3);
        let r = cam.right();
        let u = cam.up();
        assert!((r.length() - 1.0).abs() < 1e-4);
        assert!((u.length() - 1.0).abs() < 1e-4);
        assert!(r.dot(&u).abs() < 1e-4);
    }

    #[test]
    fn target_projects_to_clip_center() {
        let cam = OrbitCamera::default();
        let m = cam.view_proj();
        let t = cam.target;
        // Column-major multiply of (t, 1)
        let x = m[0][0] * t.x + m[1][0] * t.y + m[2][0] * t.z + m[3][0];
        let y = m[0][1] * t.x + m[1][1] * t.y + m[2][1] * t.z + m[3][1];
        let w = m[0][3] * t.x + m[1][3] * t.y + m[2][3] * t.z + m[3][3];
        assert!((x / w).abs() < 1e-4);
        assert!((y / w).abs() < 1e-4);
    }
}
