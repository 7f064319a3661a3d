//! Camera types and screen-to-world ray generation for picking.
//!
//! A [`Camera`] is a yaw/pitch first-person camera and a [`Projection`]
//! holds the perspective parameters together with the viewport size in
//! physical pixels. [`SceneCamera`] pairs both so a scene can turn pointer
//! coordinates into pick rays.

use cgmath::{InnerSpace, Matrix4, Point3, Rad, Vector3, perspective};

use crate::data_structures::ray::Ray;

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub position: Point3<f32>,
    pub yaw: Rad<f32>,
    pub pitch: Rad<f32>,
}

impl Camera {
    pub fn new<V: Into<Point3<f32>>, Y: Into<Rad<f32>>, P: Into<Rad<f32>>>(
        position: V,
        yaw: Y,
        pitch: P,
    ) -> Self {
        Self {
            position: position.into(),
            yaw: yaw.into(),
            pitch: pitch.into(),
        }
    }

    /// Unit vector the camera looks along. A yaw of -90° with zero pitch looks down -Z.
    pub fn forward(&self) -> Vector3<f32> {
        let (sin_pitch, cos_pitch) = self.pitch.0.sin_cos();
        let (sin_yaw, cos_yaw) = self.yaw.0.sin_cos();
        Vector3::new(cos_pitch * cos_yaw, sin_pitch, cos_pitch * sin_yaw).normalize()
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_to_rh(self.position, self.forward(), Vector3::unit_y())
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projection {
    width: u32,
    height: u32,
    aspect: f32,
    fovy: Rad<f32>,
    znear: f32,
    zfar: f32,
}

impl Projection {
    pub fn new<F: Into<Rad<f32>>>(width: u32, height: u32, fovy: F, znear: f32, zfar: f32) -> Self {
        Self {
            width,
            height,
            aspect: width as f32 / height.max(1) as f32,
            fovy: fovy.into(),
            znear,
            zfar,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.aspect = width as f32 / height.max(1) as f32;
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

/// A camera with its projection, as used by a scene for pointer picking.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneCamera {
    pub camera: Camera,
    pub projection: Projection,
}

impl SceneCamera {
    pub fn new(camera: Camera, projection: Projection) -> Self {
        Self { camera, projection }
    }

    pub fn view_proj(&self) -> Matrix4<f32> {
        self.projection.calc_matrix() * self.camera.calc_matrix()
    }

    /// Builds the world-space ray through the pixel `(x, y)`.
    ///
    /// Pixel coordinates start at the top-left corner of the viewport with y
    /// pointing down, matching winit's cursor positions.
    pub fn ray_from_screen(&self, x: f32, y: f32) -> Ray {
        let (width, height) = self.projection.size();
        let ndc_x = 2.0 * x / width.max(1) as f32 - 1.0;
        let ndc_y = 1.0 - 2.0 * y / height.max(1) as f32;

        let forward = self.camera.forward();
        let right = forward.cross(Vector3::unit_y()).normalize();
        let up = right.cross(forward);
        let half_height = (self.projection.fovy.0 / 2.0).tan();
        let half_width = half_height * self.projection.aspect;

        let direction = forward + right * (ndc_x * half_width) + up * (ndc_y * half_height);
        Ray::new(self.camera.position, direction)
    }
}
