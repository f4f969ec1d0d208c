//! Ray-sphere intersection via the quadratic formula.

use glint_geom::{Bbox3, MaterialId};
use glint_math::{Point3, Vec3};

use crate::{Intersection, Primitive, Ray};

/// A sphere primitive.
#[derive(Debug, Clone, Copy)]
pub struct Sphere {
    /// Center of the sphere.
    pub center: Point3,
    /// Radius of the sphere. Non-positive radii hit nothing.
    pub radius: f64,
    /// Material handle for shading.
    pub material: MaterialId,
}

impl Sphere {
    /// Create a sphere.
    pub fn new(center: Point3, radius: f64, material: MaterialId) -> Self {
        Self {
            center,
            radius,
            material,
        }
    }

    /// Both quadratic roots in ascending order, ignoring the interval.
    fn roots(&self, ray: &Ray) -> Option<(f64, f64)> {
        if self.radius <= 0.0 {
            return None;
        }
        let oc = ray.origin - self.center;
        let d = ray.direction.as_ref();
        // a is 1 for unit directions; kept explicit.
        let a = d.dot(d);
        let b = 2.0 * oc.dot(d);
        let c = oc.dot(&oc) - self.radius * self.radius;
        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return None;
        }
        let sqrt_disc = discriminant.sqrt();
        Some(((-b - sqrt_disc) / (2.0 * a), (-b + sqrt_disc) / (2.0 * a)))
    }

    /// Smallest root strictly inside the ray interval, falling back to
    /// the larger root when the origin sits inside the sphere.
    fn hit_parameter(&self, ray: &Ray) -> Option<f64> {
        let (t_near, t_far) = self.roots(ray)?;
        if t_near > ray.min_t && t_near < ray.max_t {
            Some(t_near)
        } else if t_far > ray.min_t && t_far < ray.max_t {
            Some(t_far)
        } else {
            None
        }
    }
}

impl Primitive for Sphere {
    fn bounds(&self) -> Bbox3 {
        let r = Vec3::new(self.radius, self.radius, self.radius);
        Bbox3::new(self.center - r, self.center + r)
    }

    fn intersect_any(&self, ray: &mut Ray) -> bool {
        match self.hit_parameter(ray) {
            Some(t) => {
                ray.max_t = t;
                true
            }
            None => false,
        }
    }

    fn intersect_closest<'p>(&'p self, ray: &mut Ray, isect: &mut Intersection<'p>) -> bool {
        let t = match self.hit_parameter(ray) {
            Some(t) => t,
            None => return false,
        };
        ray.max_t = t;
        isect.t = t;
        isect.primitive = Some(self);
        // Outward normal, never re-oriented toward the ray.
        isect.normal = (ray.at(t) - self.center) / self.radius;
        isect.material = Some(self.material);
        true
    }

    fn material(&self) -> Option<MaterialId> {
        Some(self.material)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_sphere() -> Sphere {
        Sphere::new(Point3::new(0.0, 0.0, 0.0), 1.0, MaterialId(5))
    }

    #[test]
    fn test_sphere_hit_front() {
        let sphere = unit_sphere();
        let mut ray = Ray::new(Point3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, 1.0));
        let mut isect = Intersection::default();

        assert!(sphere.intersect_closest(&mut ray, &mut isect));
        assert!((isect.t - 4.0).abs() < 1e-12);
        assert!((ray.max_t - 4.0).abs() < 1e-12);
        assert!((isect.normal.z - -1.0).abs() < 1e-12);
        assert!(isect.normal.x.abs() < 1e-12);
        assert_eq!(isect.material, Some(MaterialId(5)));
    }

    #[test]
    fn test_sphere_origin_inside() {
        let sphere = unit_sphere();
        // The near root is behind the origin; the far root counts.
        let mut ray = Ray::new(Point3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
        let mut isect = Intersection::default();

        assert!(sphere.intersect_closest(&mut ray, &mut isect));
        assert!((isect.t - 1.0).abs() < 1e-12);
        // Normal stays outward even though the ray leaves from inside.
        assert!((isect.normal.x - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_sphere_min_t_skips_near_root() {
        let sphere = unit_sphere();
        // Roots at t=4 and t=6; min_t=4.5 rejects the near one.
        let mut ray = Ray::with_interval(
            Point3::new(0.0, 0.0, -5.0),
            Vec3::new(0.0, 0.0, 1.0),
            4.5,
            f64::INFINITY,
        );
        let mut isect = Intersection::default();

        assert!(sphere.intersect_closest(&mut ray, &mut isect));
        assert!((isect.t - 6.0).abs() < 1e-12);
        assert!((isect.normal.z - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_sphere_behind_misses() {
        let sphere = unit_sphere();
        let mut ray = Ray::new(Point3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, 1.0));
        let mut isect = Intersection::default();

        // Both roots are negative: no hit, nothing written.
        assert!(!sphere.intersect_closest(&mut ray, &mut isect));
        assert_eq!(ray.max_t, f64::INFINITY);
        assert!(!isect.is_hit());
    }

    #[test]
    fn test_sphere_wide_miss() {
        let sphere = unit_sphere();
        let mut ray = Ray::new(Point3::new(0.0, 2.0, -5.0), Vec3::new(0.0, 0.0, 1.0));
        assert!(!sphere.intersect_any(&mut ray));
        assert_eq!(ray.max_t, f64::INFINITY);
    }

    #[test]
    fn test_sphere_zero_radius_misses() {
        let sphere = Sphere::new(Point3::new(0.0, 0.0, 0.0), 0.0, MaterialId(0));
        let mut ray = Ray::new(Point3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, 1.0));
        assert!(!sphere.intersect_any(&mut ray));
    }

    #[test]
    fn test_sphere_interval_excludes_both_roots() {
        let sphere = unit_sphere();
        // Roots at 4 and 6; the interval (4.5, 5.5) contains neither.
        let mut ray = Ray::with_interval(
            Point3::new(0.0, 0.0, -5.0),
            Vec3::new(0.0, 0.0, 1.0),
            4.5,
            5.5,
        );
        assert!(!sphere.intersect_any(&mut ray));
        assert_eq!(ray.max_t, 5.5);
    }

    #[test]
    fn test_sphere_bounds() {
        let sphere = Sphere::new(Point3::new(1.0, 2.0, 3.0), 2.0, MaterialId(0));
        let bounds = sphere.bounds();
        assert!((bounds.min.x - -1.0).abs() < 1e-12);
        assert!((bounds.min.y - 0.0).abs() < 1e-12);
        assert!((bounds.min.z - 1.0).abs() < 1e-12);
        assert!((bounds.max.x - 3.0).abs() < 1e-12);
        assert!((bounds.max.y - 4.0).abs() < 1e-12);
        assert!((bounds.max.z - 5.0).abs() < 1e-12);
    }
}
