//! Camera transform pipeline
//!
//! World space -> camera space (view) -> clip space (projection) ->
//! screen pixels (viewport), with the homogeneous divide last. All three
//! matrices start as identity, so a fresh camera passes points through
//! unchanged.
//!
//! Depth mapping is tied to the framebuffer contract (greater depth =
//! nearer the viewer): the viewport matrix sends the near plane to
//! [`DEPTH_SCALE`] and the far plane to 0.

use glam::{Mat4, Vec3, Vec4};

/// Screen-space depth of the near plane; the far plane maps to 0.
pub const DEPTH_SCALE: f32 = 255.0;

/// Homogeneous w below this magnitude is treated as a clipped point.
const W_EPSILON: f32 = 1e-6;

#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub view: Mat4,
    pub projection: Mat4,
    pub viewport: Mat4,
}

impl Camera {
    pub fn new() -> Self {
        Self {
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
            viewport: Mat4::IDENTITY,
        }
    }

    /// Build the view matrix looking from `eye` toward `center`.
    ///
    /// Orthonormal basis: `z = normalize(eye - center)`, `x = normalize(up
    /// x z)`, `y = z x x`. The rotation rows are the basis vectors and the
    /// translation is by `-eye`, so the camera origin maps to the world
    /// origin.
    pub fn look_at(&mut self, eye: Vec3, center: Vec3, up: Vec3) {
        let z = (eye - center).normalize();
        let x = up.cross(z).normalize();
        let y = z.cross(x);

        self.view = Mat4::from_cols(
            Vec4::new(x.x, y.x, z.x, 0.0),
            Vec4::new(x.y, y.y, z.y, 0.0),
            Vec4::new(x.z, y.z, z.z, 0.0),
            Vec4::new(-x.dot(eye), -y.dot(eye), -z.dot(eye), 1.0),
        );
    }

    /// Symmetric-frustum perspective projection (NDC z in [0, 1], near at
    /// 0).
    pub fn perspective(&mut self, fov_y: f32, aspect: f32, near: f32, far: f32) {
        self.projection = Mat4::perspective_rh(fov_y, aspect, near, far);
    }

    /// Map NDC to the pixel rectangle at `(x, y)` sized `w` x `h`.
    ///
    /// NDC y = +1 lands on the top scanline (row 0 is the top of the
    /// buffer), and NDC z in [0, 1] remaps to [DEPTH_SCALE, 0] so nearer
    /// points get the greater depth.
    pub fn viewport(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.viewport = Mat4::from_cols(
            Vec4::new(w / 2.0, 0.0, 0.0, 0.0),
            Vec4::new(0.0, -h / 2.0, 0.0, 0.0),
            Vec4::new(0.0, 0.0, -DEPTH_SCALE, 0.0),
            Vec4::new(x + w / 2.0, y + h / 2.0, DEPTH_SCALE, 1.0),
        );
    }

    /// Transform a world-space point to screen space.
    ///
    /// Returns `None` when the homogeneous w vanishes (point in the
    /// camera plane), instead of letting the divide produce inf/NaN.
    pub fn transform(&self, p: Vec3) -> Option<Vec3> {
        let clip = self.viewport * self.projection * self.view * p.extend(1.0);
        if clip.w.abs() < W_EPSILON {
            return None;
        }
        Some(clip.truncate() / clip.w)
    }

}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-3;

    #[test]
    fn test_identity_camera_passes_through() {
        let cam = Camera::new();
        let p = Vec3::new(1.5, -2.0, 7.0);
        let out = cam.transform(p).unwrap();
        assert!((out - p).length() < EPS);
    }

    #[test]
    fn test_look_at_maps_eye_to_origin() {
        let mut cam = Camera::new();
        let eye = Vec3::new(3.0, 4.0, 5.0);
        cam.look_at(eye, Vec3::ZERO, Vec3::Y);
        let out = cam.transform(eye).unwrap();
        assert!(out.length() < EPS, "eye should land at the origin, got {out:?}");
    }

    #[test]
    fn test_look_at_center_is_straight_ahead() {
        let mut cam = Camera::new();
        cam.look_at(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y);
        // Center sits on the -z axis in camera space, 5 units out
        let out = cam.transform(Vec3::ZERO).unwrap();
        assert!(out.x.abs() < EPS && out.y.abs() < EPS);
        assert!((out.z + 5.0).abs() < EPS);
    }

    #[test]
    fn test_viewport_centers_ndc_origin() {
        let mut cam = Camera::new();
        cam.viewport(0.0, 0.0, 100.0, 80.0);
        let out = cam.transform(Vec3::ZERO).unwrap();
        assert!((out.x - 50.0).abs() < EPS);
        assert!((out.y - 40.0).abs() < EPS);
    }

    #[test]
    fn test_viewport_depth_range() {
        let mut cam = Camera::new();
        cam.viewport(0.0, 0.0, 100.0, 100.0);
        // NDC near plane (z = 0) gets the winning depth
        let near = cam.transform(Vec3::new(0.0, 0.0, 0.0)).unwrap();
        assert!((near.z - DEPTH_SCALE).abs() < EPS);
        // NDC far plane (z = 1) maps to the far sentinel 0
        let far = cam.transform(Vec3::new(0.0, 0.0, 1.0)).unwrap();
        assert!(far.z.abs() < EPS);
    }

    #[test]
    fn test_viewport_flips_y() {
        let mut cam = Camera::new();
        cam.viewport(0.0, 0.0, 100.0, 100.0);
        // NDC top (+1) is the top scanline
        let top = cam.transform(Vec3::new(0.0, 1.0, 0.0)).unwrap();
        assert!(top.y.abs() < EPS);
        let bottom = cam.transform(Vec3::new(0.0, -1.0, 0.0)).unwrap();
        assert!((bottom.y - 100.0).abs() < EPS);
    }

    #[test]
    fn test_perspective_depth_ordering() {
        let mut cam = Camera::new();
        cam.look_at(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO, Vec3::Y);
        cam.perspective(std::f32::consts::FRAC_PI_3, 1.0, 1.0, 100.0);
        cam.viewport(0.0, 0.0, 100.0, 100.0);

        let near = cam.transform(Vec3::new(0.0, 0.0, 5.0)).unwrap();
        let far = cam.transform(Vec3::new(0.0, 0.0, -5.0)).unwrap();
        assert!(near.z > far.z, "nearer point must carry the greater depth");
    }

    #[test]
    fn test_zero_w_is_clipped() {
        let mut cam = Camera::new();
        cam.perspective(std::f32::consts::FRAC_PI_3, 1.0, 0.1, 100.0);
        // A point in the camera plane has w == 0 after projection
        assert!(cam.transform(Vec3::new(1.0, 2.0, 0.0)).is_none());
    }
}
