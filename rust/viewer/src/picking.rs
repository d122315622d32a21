// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pointer ray picking against floor solids

use massing_lite_geometry::{Mesh, Point3, Vector3};

/// Pointer ray in scene coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Point3<f64>,
    /// Unit direction
    pub direction: Vector3<f64>,
}

impl Ray {
    /// Ray from `origin` along `direction`; `None` for a zero direction
    pub fn new(origin: Point3<f64>, direction: Vector3<f64>) -> Option<Self> {
        Some(Self {
            origin,
            direction: direction.try_normalize(1e-12)?,
        })
    }

    /// Ray from `origin` through `target`
    pub fn through(origin: Point3<f64>, target: Point3<f64>) -> Option<Self> {
        Self::new(origin, target - origin)
    }

    #[inline]
    pub fn at(&self, distance: f64) -> Point3<f64> {
        self.origin + self.direction * distance
    }
}

/// Möller–Trumbore ray-triangle intersection.
///
/// Returns the distance along the ray to the hit, if the triangle is in
/// front of the origin. Both faces count.
pub fn ray_triangle(ray: &Ray, v0: &Point3<f64>, v1: &Point3<f64>, v2: &Point3<f64>) -> Option<f64> {
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;

    let h = ray.direction.cross(&edge2);
    let a = edge1.dot(&h);

    if a.abs() < 1e-12 {
        return None; // ray parallel to triangle
    }

    let f = 1.0 / a;
    let s = ray.origin - v0;
    let u = f * s.dot(&h);

    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(&edge1);
    let v = f * ray.direction.dot(&q);

    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(&q);
    (t > 1e-12).then_some(t)
}

/// Nearest hit distance between a ray and any triangle of `mesh`
pub fn ray_mesh(ray: &Ray, mesh: &Mesh) -> Option<f64> {
    mesh.triangles()
        .filter_map(|[a, b, c]| ray_triangle(ray, &a, &b, &c))
        .min_by(f64::total_cmp)
}
