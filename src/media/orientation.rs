//! Display orientation classification and correction.
//!
//! Phone footage carries its physical recording orientation as an affine
//! transform on the video track rather than rotated pixels. Classification is
//! a pure function of the track's natural size and that transform; the
//! resolver then produces the corrective transform that renders the footage
//! upright in the output.

use std::f64::consts::PI;

/// 2-D affine transform in the row-vector convention:
/// `(x', y') = (x, y) * [a b; c d] + (tx, ty)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub tx: f64,
    pub ty: f64,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        tx: 0.0,
        ty: 0.0,
    };

    /// Pure translation by `(x, y)`.
    pub fn translation(x: f64, y: f64) -> Self {
        Self {
            tx: x,
            ty: y,
            ..Self::IDENTITY
        }
    }

    /// Pure rotation by `radians`, counter-clockwise.
    pub fn rotation(radians: f64) -> Self {
        let (sin, cos) = radians.sin_cos();
        Self {
            a: cos,
            b: sin,
            c: -sin,
            d: cos,
            tx: 0.0,
            ty: 0.0,
        }
    }

    /// Rotate the linear part of this transform, keeping the translation.
    /// Matches the translate-then-rotate composition the corrective
    /// transforms are built from.
    pub fn rotated(self, radians: f64) -> Self {
        let (sin, cos) = radians.sin_cos();
        Self {
            a: cos * self.a + sin * self.c,
            b: cos * self.b + sin * self.d,
            c: -sin * self.a + cos * self.c,
            d: -sin * self.b + cos * self.d,
            tx: self.tx,
            ty: self.ty,
        }
    }

    /// Rotation angle of the linear part, in degrees in `(-180, 180]`.
    pub fn rotation_degrees(&self) -> f64 {
        self.b.atan2(self.a).to_degrees()
    }

    /// Reconstruct the canonical recording transform for a container
    /// rotation tag.
    ///
    /// Containers that only carry a rotation angle still imply the full
    /// affine transform phone cameras write: the translation keeps the
    /// rotated frame inside the natural-size rectangle, which is exactly
    /// what the classification table keys on.
    pub fn for_rotation(degrees: f64, natural_size: (f64, f64)) -> Self {
        let (width, height) = natural_size;
        let normalized = ((degrees.round() as i64 % 360) + 360) % 360;

        match normalized {
            0 => Self::IDENTITY,
            90 => Self::translation(height, 0.0).rotated(PI / 2.0),
            180 => Self::translation(width, height).rotated(PI),
            270 => Self::translation(0.0, width).rotated(-PI / 2.0),
            _ => Self::rotation(degrees.to_radians()),
        }
    }

    /// Component-wise comparison with tolerance, for trig results.
    pub fn approx_eq(&self, other: &Transform, eps: f64) -> bool {
        (self.a - other.a).abs() <= eps
            && (self.b - other.b).abs() <= eps
            && (self.c - other.c).abs() <= eps
            && (self.d - other.d).abs() <= eps
            && (self.tx - other.tx).abs() <= eps
            && (self.ty - other.ty).abs() <= eps
    }
}

/// Physical orientation the footage was recorded in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    LandscapeRight,
    LandscapeLeft,
    Portrait,
    PortraitUpsideDown,
}

/// Tolerance for matching transform translations against pixel dimensions.
const EPS: f64 = 0.5;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= EPS
}

/// Classify the recording orientation of a video track.
///
/// Checked in order, first match wins; anything that matches none of the
/// canonical translations is treated as portrait.
pub fn classify(natural_size: (f64, f64), transform: &Transform) -> Orientation {
    let (width, height) = natural_size;
    let (tx, ty) = (transform.tx, transform.ty);

    if close(tx, width) && close(ty, height) {
        Orientation::LandscapeRight
    } else if close(tx, 0.0) && close(ty, 0.0) {
        Orientation::LandscapeLeft
    } else if close(tx, 0.0) && close(ty, width) {
        Orientation::PortraitUpsideDown
    } else {
        Orientation::Portrait
    }
}

/// Corrective transform for the output video track.
///
/// Translate by `(height, -(width - height) / 2)`, then rotate by the angle
/// that undoes the recording orientation: +90° for portrait, 180° for
/// landscape-right, -90° for portrait-upside-down. Landscape-left footage is
/// already upright and gets the identity.
pub fn corrective_transform(natural_size: (f64, f64), orientation: Orientation) -> Transform {
    let (width, height) = natural_size;
    let base = Transform::translation(height, -(width - height) / 2.0);

    match orientation {
        Orientation::Portrait => base.rotated(PI / 2.0),
        Orientation::LandscapeRight => base.rotated(PI),
        Orientation::PortraitUpsideDown => base.rotated(-PI / 2.0),
        Orientation::LandscapeLeft => Transform::IDENTITY,
    }
}

/// Classify and correct in one step.
pub fn resolve(natural_size: (f64, f64), transform: &Transform) -> (Orientation, Transform) {
    let orientation = classify(natural_size, transform);
    (orientation, corrective_transform(natural_size, orientation))
}
