//! Clothing categories and their keypoint layouts.

use std::fmt;
use std::str::FromStr;

use kpda_core::ConjugatePermutation;
use serde::{Deserialize, Serialize};

const BLOUSE: &[&str] = &[
    "neckline_left",
    "neckline_right",
    "center_front",
    "shoulder_left",
    "shoulder_right",
    "armpit_left",
    "armpit_right",
    "cuff_left_in",
    "cuff_left_out",
    "cuff_right_in",
    "cuff_right_out",
    "top_hem_left",
    "top_hem_right",
];

const OUTWEAR: &[&str] = &[
    "neckline_left",
    "neckline_right",
    "shoulder_left",
    "shoulder_right",
    "armpit_left",
    "armpit_right",
    "waistline_left",
    "waistline_right",
    "cuff_left_in",
    "cuff_left_out",
    "cuff_right_in",
    "cuff_right_out",
    "top_hem_left",
    "top_hem_right",
];

const DRESS: &[&str] = &[
    "neckline_left",
    "neckline_right",
    "center_front",
    "shoulder_left",
    "shoulder_right",
    "armpit_left",
    "armpit_right",
    "waistline_left",
    "waistline_right",
    "cuff_left_in",
    "cuff_left_out",
    "cuff_right_in",
    "cuff_right_out",
    "hemline_left",
    "hemline_right",
];

const SKIRT: &[&str] = &[
    "waistband_left",
    "waistband_right",
    "hemline_left",
    "hemline_right",
];

const TROUSERS: &[&str] = &[
    "waistband_left",
    "waistband_right",
    "crotch",
    "bottom_left_in",
    "bottom_left_out",
    "bottom_right_in",
    "bottom_right_out",
];

/// Garment category; each has its own keypoint set and its own model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClothingType {
    /// Shirts and blouses.
    Blouse,
    /// Coats and jackets.
    Outwear,
    /// Dresses.
    Dress,
    /// Skirts.
    Skirt,
    /// Trousers and shorts.
    Trousers,
}

impl ClothingType {
    /// Every category, in a fixed order.
    pub const ALL: [ClothingType; 5] = [
        ClothingType::Blouse,
        ClothingType::Outwear,
        ClothingType::Dress,
        ClothingType::Skirt,
        ClothingType::Trousers,
    ];

    /// Lowercase name, used in file names and checkpoint tags.
    pub fn as_str(self) -> &'static str {
        match self {
            ClothingType::Blouse => "blouse",
            ClothingType::Outwear => "outwear",
            ClothingType::Dress => "dress",
            ClothingType::Skirt => "skirt",
            ClothingType::Trousers => "trousers",
        }
    }

    /// Keypoint names in channel order.
    pub fn keypoint_names(self) -> &'static [&'static str] {
        match self {
            ClothingType::Blouse => BLOUSE,
            ClothingType::Outwear => OUTWEAR,
            ClothingType::Dress => DRESS,
            ClothingType::Skirt => SKIRT,
            ClothingType::Trousers => TROUSERS,
        }
    }

    /// Number of keypoints (heatmap channels).
    pub fn num_keypoints(self) -> usize {
        self.keypoint_names().len()
    }

    /// Channel index of a named keypoint.
    pub fn keypoint_index(self, name: &str) -> Option<usize> {
        self.keypoint_names().iter().position(|&n| n == name)
    }

    /// Left/right pairs, found by swapping `left` and `right` in each name.
    pub fn conjugate_pairs(self) -> Vec<(usize, usize)> {
        let names = self.keypoint_names();
        names
            .iter()
            .enumerate()
            .filter(|(_, name)| name.contains("left"))
            .filter_map(|(i, name)| {
                let mirrored = name.replace("left", "right");
                self.keypoint_index(&mirrored).map(|j| (i, j))
            })
            .collect()
    }

    /// Validated channel permutation for flip alignment.
    pub fn conjugate_permutation(self) -> kpda_core::Result<ConjugatePermutation> {
        ConjugatePermutation::from_pairs(self.num_keypoints(), &self.conjugate_pairs())
    }

    /// Keypoints whose distance normalizes the error metric.
    pub fn reference_pair(self) -> (usize, usize) {
        let (a, b) = match self {
            ClothingType::Blouse | ClothingType::Outwear | ClothingType::Dress => {
                ("armpit_left", "armpit_right")
            }
            ClothingType::Skirt | ClothingType::Trousers => ("waistband_left", "waistband_right"),
        };
        // Both names appear in every list that selects them.
        (
            self.keypoint_index(a).unwrap_or(0),
            self.keypoint_index(b).unwrap_or(1),
        )
    }
}

impl fmt::Display for ClothingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown clothing category.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown clothing type {0:?} (expected blouse, outwear, dress, skirt or trousers)")]
pub struct ParseClothingTypeError(pub String);

impl FromStr for ClothingType {
    type Err = ParseClothingTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ClothingType::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseClothingTypeError(s.to_string()))
    }
}
