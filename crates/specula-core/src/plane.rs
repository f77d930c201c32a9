use glam::{Mat4, Vec3, Vec4};
use serde::{Deserialize, Serialize};

/// The set of points `x` with `normal · x == distance`.
///
/// `normal` is expected to be unit length; `distance` is the signed offset of
/// the plane from the origin, measured along the normal.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    pub normal: Vec3,
    pub distance: f32,
}

impl Plane {
    pub fn new(normal: Vec3, distance: f32) -> Self {
        Self { normal, distance }
    }

    /// Plane through `point` facing `normal`. The normal is normalized here.
    pub fn from_point_normal(point: Vec3, normal: Vec3) -> Self {
        let normal = normal.normalize();
        Self {
            normal,
            distance: normal.dot(point),
        }
    }

    pub fn from_points(a: Vec3, b: Vec3, c: Vec3) -> Self {
        let normal = (b - a).cross(c - a).normalize();
        Self {
            normal,
            distance: normal.dot(a),
        }
    }

    pub fn signed_distance(&self, point: Vec3) -> f32 {
        self.normal.dot(point) - self.distance
    }

    pub fn flip(&self) -> Self {
        Self {
            normal: -self.normal,
            distance: -self.distance,
        }
    }

    pub fn reflect_point(&self, point: Vec3) -> Vec3 {
        point - 2.0 * self.signed_distance(point) * self.normal
    }

    pub fn reflect_direction(&self, direction: Vec3) -> Vec3 {
        direction - 2.0 * self.normal.dot(direction) * self.normal
    }
}

/// Affine matrix mirroring points and directions across `plane`.
///
/// The linear part is `I - 2nnᵀ` and the translation is `2 * distance * n`,
/// so `transform_point3` fixes every point on the plane and
/// `transform_vector3` reflects directions without translating them.
pub fn reflection_matrix(plane: &Plane) -> Mat4 {
    let n = plane.normal;
    let d = plane.distance;

    Mat4::from_cols(
        Vec4::new(
            1.0 - 2.0 * n.x * n.x,
            -2.0 * n.x * n.y,
            -2.0 * n.x * n.z,
            0.0,
        ),
        Vec4::new(
            -2.0 * n.y * n.x,
            1.0 - 2.0 * n.y * n.y,
            -2.0 * n.y * n.z,
            0.0,
        ),
        Vec4::new(
            -2.0 * n.z * n.x,
            -2.0 * n.z * n.y,
            1.0 - 2.0 * n.z * n.z,
            0.0,
        ),
        Vec4::new(2.0 * d * n.x, 2.0 * d * n.y, 2.0 * d * n.z, 1.0),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-4;

    fn sample_planes() -> Vec<Plane> {
        vec![
            Plane::from_point_normal(Vec3::ZERO, Vec3::Z),
            Plane::from_point_normal(Vec3::new(0.0, 2.0, 0.0), Vec3::Y),
            Plane::from_point_normal(Vec3::new(1.0, -3.0, 4.0), Vec3::new(1.0, 1.0, 0.0)),
            Plane::from_point_normal(Vec3::new(-7.5, 0.25, 3.0), Vec3::new(-0.2, 0.9, 0.4)),
            Plane::from_points(
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
                Vec3::new(0.0, 0.0, 1.0),
            ),
        ]
    }

    fn sample_vectors() -> Vec<Vec3> {
        vec![
            Vec3::ZERO,
            Vec3::new(1.0, 2.0, 3.0),
            Vec3::new(-5.0, 0.5, 8.0),
            Vec3::new(10.0, -10.0, 0.1),
        ]
    }

    /// Points on the plane in a small grid around its closest point to the origin.
    fn points_on(plane: &Plane) -> Vec<Vec3> {
        let origin = plane.normal * plane.distance;
        let tangent = plane.normal.any_orthonormal_vector();
        let bitangent = plane.normal.cross(tangent);

        let mut points = Vec::new();
        for u in [-3.0, 0.0, 2.5] {
            for v in [-1.0, 0.0, 4.0] {
                points.push(origin + tangent * u + bitangent * v);
            }
        }
        points
    }

    #[test]
    fn points_on_plane_are_fixed() {
        for plane in sample_planes() {
            let matrix = reflection_matrix(&plane);
            for point in points_on(&plane) {
                assert!(
                    matrix.transform_point3(point).abs_diff_eq(point, EPSILON),
                    "{point:?} moved when mirrored across {plane:?}"
                );
            }
        }
    }

    #[test]
    fn reflecting_twice_is_identity() {
        for plane in sample_planes() {
            let matrix = reflection_matrix(&plane);
            assert!((matrix * matrix).abs_diff_eq(Mat4::IDENTITY, EPSILON));

            for v in sample_vectors() {
                let point = matrix.transform_point3(matrix.transform_point3(v));
                let direction = matrix.transform_vector3(matrix.transform_vector3(v));
                assert!(point.abs_diff_eq(v, EPSILON));
                assert!(direction.abs_diff_eq(v, EPSILON));
            }
        }
    }

    #[test]
    fn matrix_agrees_with_plane_helpers() {
        for plane in sample_planes() {
            let matrix = reflection_matrix(&plane);
            for v in sample_vectors() {
                assert!(matrix
                    .transform_point3(v)
                    .abs_diff_eq(plane.reflect_point(v), EPSILON));
                assert!(matrix
                    .transform_vector3(v)
                    .abs_diff_eq(plane.reflect_direction(v), EPSILON));
            }
        }
    }

    #[test]
    fn mirror_across_z_plane() {
        let plane = Plane::from_point_normal(Vec3::ZERO, Vec3::Z);
        let matrix = reflection_matrix(&plane);

        assert!(matrix
            .transform_point3(Vec3::new(0.0, 0.0, -5.0))
            .abs_diff_eq(Vec3::new(0.0, 0.0, 5.0), EPSILON));
        assert!(matrix
            .transform_vector3(Vec3::Z)
            .abs_diff_eq(Vec3::NEG_Z, EPSILON));
    }

    #[test]
    fn offset_plane_translates_points() {
        let plane = Plane::from_point_normal(Vec3::new(0.0, 2.0, 0.0), Vec3::Y);
        assert!((plane.distance - 2.0).abs() < EPSILON);
        assert!(reflection_matrix(&plane)
            .transform_point3(Vec3::ZERO)
            .abs_diff_eq(Vec3::new(0.0, 4.0, 0.0), EPSILON));
        assert!((plane.flip().signed_distance(Vec3::ZERO) - 2.0).abs() < EPSILON);
    }
}
