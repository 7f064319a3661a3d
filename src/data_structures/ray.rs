use cgmath::{EuclideanSpace, InnerSpace};

use crate::data_structures::mesh::MeshId;

// Below this the ray is treated as parallel to the triangle plane.
const EPSILON: f32 = 1e-6;

/// A half-line in world space. `direction` is always normalised.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: cgmath::Point3<f32>,
    pub direction: cgmath::Vector3<f32>,
}

impl Ray {
    pub fn new(origin: cgmath::Point3<f32>, direction: cgmath::Vector3<f32>) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    pub fn at(&self, distance: f32) -> cgmath::Point3<f32> {
        self.origin + self.direction * distance
    }

    /// Möller–Trumbore ray/triangle test. Returns the distance along the ray
    /// for hits in front of the origin.
    pub fn intersect_triangle(
        &self,
        a: cgmath::Point3<f32>,
        b: cgmath::Point3<f32>,
        c: cgmath::Point3<f32>,
    ) -> Option<f32> {
        let edge1 = b - a;
        let edge2 = c - a;
        let p = self.direction.cross(edge2);
        let det = edge1.dot(p);
        if det.abs() < EPSILON {
            return None;
        }
        let inv_det = 1.0 / det;
        let t_vec = self.origin.to_vec() - a.to_vec();
        let u = t_vec.dot(p) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }
        let q = t_vec.cross(edge1);
        let v = self.direction.dot(q) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }
        let distance = edge2.dot(q) * inv_det;
        (distance > EPSILON).then_some(distance)
    }
}

/// Result of a nearest-hit pick. A miss is represented by `None` at the call site.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PickingInfo {
    pub picked_mesh: MeshId,
    pub distance: f32,
    pub picked_point: cgmath::Point3<f32>,
}
