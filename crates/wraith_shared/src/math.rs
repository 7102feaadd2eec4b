//! Mathematical types shared between the network layer and the renderer.
//!
//! These are the canonical representations the interpolation engine stores in
//! its ring buffers.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Below this length a quaternion carries no usable rotation.
pub const QUATERNION_EPSILON: f32 = 1e-6;

/// 3D Vector - position, velocity, direction
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Vec3 {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
    /// Z component
    pub z: f32,
}

impl Vec3 {
    /// Creates a new Vec3
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Zero vector
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// Unit X vector
    pub const X: Self = Self::new(1.0, 0.0, 0.0);

    /// Unit Y vector
    pub const Y: Self = Self::new(0.0, 1.0, 0.0);

    /// Unit Z vector
    pub const Z: Self = Self::new(0.0, 0.0, 1.0);

    /// Converts to array
    #[must_use]
    pub const fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    /// Creates from array
    #[must_use]
    pub const fn from_array(arr: [f32; 3]) -> Self {
        Self::new(arr[0], arr[1], arr[2])
    }

    /// Dot product
    #[must_use]
    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Length squared (avoids sqrt)
    #[must_use]
    pub fn length_squared(self) -> f32 {
        self.dot(self)
    }

    /// Length
    #[must_use]
    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    /// True when no component is NaN or infinite.
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Component-wise linear interpolation.
    ///
    /// Written as `a * (1 - t) + b * t` so that `t = 0` yields `self` and
    /// `t = 1` yields `other` bit-for-bit.
    #[must_use]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let s = 1.0 - t;
        Self::new(
            self.x * s + other.x * t,
            self.y * s + other.y * t,
            self.z * s + other.z * t,
        )
    }
}

impl std::ops::Add for Vec3 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

/// Quaternion for rotations
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Quaternion {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
    /// Z component
    pub z: f32,
    /// W component
    pub w: f32,
}

impl Quaternion {
    /// Creates a new quaternion
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Identity rotation
    pub const IDENTITY: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    /// Creates from `[x, y, z, w]`
    #[must_use]
    pub const fn from_array(arr: [f32; 4]) -> Self {
        Self::new(arr[0], arr[1], arr[2], arr[3])
    }

    /// Converts to `[x, y, z, w]`
    #[must_use]
    pub const fn to_array(self) -> [f32; 4] {
        [self.x, self.y, self.z, self.w]
    }

    /// Rotation of `angle` radians around `axis`. The axis need not be unit length.
    #[must_use]
    pub fn from_axis_angle(axis: Vec3, angle: f32) -> Self {
        let len = axis.length();
        if len <= QUATERNION_EPSILON {
            return Self::IDENTITY;
        }
        let half = angle * 0.5;
        let s = half.sin() / len;
        Self::new(axis.x * s, axis.y * s, axis.z * s, half.cos())
    }

    /// 4D dot product
    #[must_use]
    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w
    }

    /// Length
    #[must_use]
    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }

    /// True when no component is NaN or infinite.
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite() && self.w.is_finite()
    }

    /// Returns the unit quaternion, or `None` if the length is degenerate.
    #[must_use]
    pub fn normalized(self) -> Option<Self> {
        let len = self.length();
        if !len.is_finite() || len <= QUATERNION_EPSILON {
            return None;
        }
        Some(self * (1.0 / len))
    }

    /// Angle in radians of the rotation taking `self` to `other`.
    ///
    /// Both inputs are expected to be unit length.
    #[must_use]
    pub fn angle_to(self, other: Self) -> f32 {
        2.0 * self.dot(other).abs().min(1.0).acos()
    }

    /// Normalised linear interpolation along the shortest arc.
    #[must_use]
    pub fn nlerp(self, other: Self, t: f32) -> Self {
        let end = if self.dot(other) < 0.0 { -other } else { other };
        let s = 1.0 - t;
        let blended = Self::new(
            self.x * s + end.x * t,
            self.y * s + end.y * t,
            self.z * s + end.z * t,
            self.w * s + end.w * t,
        );
        blended.normalized().unwrap_or(self)
    }

    /// Spherical interpolation along the shortest arc.
    ///
    /// `t <= 0` returns `self` and `t >= 1` returns `other` exactly. Nearly
    /// parallel inputs fall back to [`Quaternion::nlerp`].
    #[must_use]
    pub fn slerp(self, other: Self, t: f32) -> Self {
        if t <= 0.0 {
            return self;
        }
        if t >= 1.0 {
            return other;
        }

        let mut cos_half = self.dot(other);
        let mut end = other;
        if cos_half < 0.0 {
            cos_half = -cos_half;
            end = -other;
        }

        if cos_half >= 1.0 - QUATERNION_EPSILON {
            return self.nlerp(end, t);
        }

        let sin_half = (1.0 - cos_half * cos_half).sqrt();
        let half_theta = sin_half.atan2(cos_half);
        let a = ((1.0 - t) * half_theta).sin() / sin_half;
        let b = (t * half_theta).sin() / sin_half;

        Self::new(
            self.x * a + end.x * b,
            self.y * a + end.y * b,
            self.z * a + end.z * b,
            self.w * a + end.w * b,
        )
    }
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl std::ops::Neg for Quaternion {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z, -self.w)
    }
}

impl std::ops::Mul<f32> for Quaternion {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs, self.w * rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn test_vec3_operations() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);

        let sum = a + b;
        assert_eq!(sum.x, 5.0);
        assert_eq!(sum.y, 7.0);
        assert_eq!(sum.z, 9.0);

        let dot = a.dot(b);
        assert_eq!(dot, 32.0); // 1*4 + 2*5 + 3*6
    }

    #[test]
    fn test_vec3_lerp_endpoints_exact() {
        let a = Vec3::new(0.1, -7.3, 1e6);
        let b = Vec3::new(3.3, 2.2, -4.0);

        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);

        let mid = Vec3::ZERO.lerp(Vec3::new(10.0, -4.0, 2.0), 0.5);
        assert_eq!(mid, Vec3::new(5.0, -2.0, 1.0));
    }

    #[test]
    fn test_vec3_is_finite() {
        assert!(Vec3::new(1.0, 2.0, 3.0).is_finite());
        assert!(!Vec3::new(f32::NAN, 0.0, 0.0).is_finite());
        assert!(!Vec3::new(0.0, f32::INFINITY, 0.0).is_finite());
    }

    #[test]
    fn test_quaternion_normalized_rejects_zero() {
        assert!(Quaternion::new(0.0, 0.0, 0.0, 0.0).normalized().is_none());

        let q = Quaternion::new(0.0, 0.0, 0.0, 2.0).normalized().unwrap();
        assert_eq!(q, Quaternion::IDENTITY);
    }

    #[test]
    fn test_slerp_midpoint_angle() {
        let a = Quaternion::IDENTITY;
        let b = Quaternion::from_axis_angle(Vec3::Y, FRAC_PI_2);

        let mid = a.slerp(b, 0.5);
        assert!(approx(mid.length(), 1.0));
        assert!(approx(a.angle_to(mid), FRAC_PI_2 * 0.5));
        assert!(approx(mid.angle_to(b), FRAC_PI_2 * 0.5));
    }

    #[test]
    fn test_slerp_endpoints_exact() {
        let a = Quaternion::from_axis_angle(Vec3::X, 0.3);
        let b = Quaternion::from_axis_angle(Vec3::Z, 1.2);

        assert_eq!(a.slerp(b, 0.0), a);
        assert_eq!(a.slerp(b, 1.0), b);
    }

    #[test]
    fn test_slerp_takes_shortest_path() {
        let a = Quaternion::IDENTITY;
        // Same rotation as a 0.2 rad turn, expressed in the opposite hemisphere.
        let b = -Quaternion::from_axis_angle(Vec3::Y, 0.2);

        let mid = a.slerp(b, 0.5);
        assert!(approx(a.angle_to(mid), 0.1));
    }

    #[test]
    fn test_slerp_nearly_parallel_stays_unit() {
        let a = Quaternion::from_axis_angle(Vec3::Y, 1.0);
        let b = Quaternion::from_axis_angle(Vec3::Y, 1.0 + 1e-5);

        let q = a.slerp(b, 0.25);
        assert!(q.is_finite());
        assert!(approx(q.length(), 1.0));
    }

    #[test]
    fn test_from_axis_angle_half_turn() {
        let q = Quaternion::from_axis_angle(Vec3::Z, PI);
        assert!(approx(q.z, 1.0));
        assert!(approx(q.w, 0.0));
    }
}
