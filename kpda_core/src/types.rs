//! Core types shared by the decoder, the flip logic and the target encoder.

use core::ops::{Add, Mul, Sub};

/// A 2D point in pixel or heatmap space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point2 {
    /// Horizontal coordinate (column axis).
    pub x: f32,
    /// Vertical coordinate (row axis).
    pub y: f32,
}

impl Point2 {
    /// Create a new point.
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    #[inline]
    pub fn distance(self, other: Self) -> f32 {
        let d = self - other;
        libm::sqrtf(d.x * d.x + d.y * d.y)
    }
}

impl Add for Point2 {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point2 {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Point2 {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

/// Visibility state of an annotated or decoded keypoint.
///
/// Flags follow the annotation convention: 1 visible, 0 occluded, -1 absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Visibility {
    /// The landmark is visible in the image.
    Visible,
    /// The landmark exists but is hidden.
    Occluded,
    /// The landmark does not exist for this garment or carries no evidence.
    #[default]
    Absent,
}

impl Visibility {
    /// Parse an annotation flag. Anything other than 1 or 0 is treated as absent.
    #[inline]
    pub const fn from_flag(flag: i8) -> Self {
        match flag {
            1 => Visibility::Visible,
            0 => Visibility::Occluded,
            _ => Visibility::Absent,
        }
    }

    /// The annotation flag for this state.
    #[inline]
    pub const fn flag(self) -> i8 {
        match self {
            Visibility::Visible => 1,
            Visibility::Occluded => 0,
            Visibility::Absent => -1,
        }
    }

    /// Whether the landmark exists (visible or occluded).
    #[inline]
    pub const fn is_present(self) -> bool {
        !matches!(self, Visibility::Absent)
    }
}

/// A single keypoint: position plus visibility.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Keypoint {
    /// Horizontal pixel coordinate.
    pub x: f32,
    /// Vertical pixel coordinate.
    pub y: f32,
    /// Visibility state.
    pub visibility: Visibility,
}

impl Keypoint {
    /// Create a new keypoint.
    #[inline]
    pub const fn new(x: f32, y: f32, visibility: Visibility) -> Self {
        Self { x, y, visibility }
    }

    /// Create a visible keypoint.
    #[inline]
    pub const fn visible(x: f32, y: f32) -> Self {
        Self::new(x, y, Visibility::Visible)
    }

    /// Position as a point.
    #[inline]
    pub const fn position(&self) -> Point2 {
        Point2::new(self.x, self.y)
    }
}

/// Width and height of an image in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImageSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl ImageSize {
    /// Create a new image size.
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// The larger of the two sides.
    #[inline]
    pub const fn max_side(&self) -> u32 {
        if self.width > self.height {
            self.width
        } else {
            self.height
        }
    }

    /// Whether either side is zero.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Image centre, used as the fallback position for keypoints with no evidence.
    #[inline]
    pub fn center(&self) -> Point2 {
        Point2::new(self.width as f32 / 2.0, self.height as f32 / 2.0)
    }
}

/// How a heatmap peak is turned into a coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DecodeMethod {
    /// Centre of the maximum cell.
    Max,
    /// Maximum cell shifted a quarter cell towards the larger neighbour.
    #[default]
    MaxOffset,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visibility_flags() {
        assert_eq!(Visibility::from_flag(1), Visibility::Visible);
        assert_eq!(Visibility::from_flag(0), Visibility::Occluded);
        assert_eq!(Visibility::from_flag(-1), Visibility::Absent);
        assert_eq!(Visibility::from_flag(7), Visibility::Absent);

        for v in [Visibility::Visible, Visibility::Occluded, Visibility::Absent] {
            assert_eq!(Visibility::from_flag(v.flag()), v);
        }
        assert!(Visibility::Occluded.is_present());
        assert!(!Visibility::Absent.is_present());
    }

    #[test]
    fn test_point_distance() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(3.0, 4.0);
        assert!((a.distance(b) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_image_size_center() {
        let size = ImageSize::new(640, 480);
        assert_eq!(size.max_side(), 640);
        assert_eq!(size.center(), Point2::new(320.0, 240.0));
        assert!(ImageSize::new(0, 10).is_empty());
    }
}
