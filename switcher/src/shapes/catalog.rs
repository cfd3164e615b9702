use std::str::FromStr;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::{Mask, ParseError};

/// One of the 25 figures that can be claimed.
///
/// `H1`..`H18` are the hard figures (five cells), `S1`..`S7` the simple ones (four cells).
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ShapeId {
    #[serde(rename = "h1")]
    H1,
    #[serde(rename = "h2")]
    H2,
    #[serde(rename = "h3")]
    H3,
    #[serde(rename = "h4")]
    H4,
    #[serde(rename = "h5")]
    H5,
    #[serde(rename = "h6")]
    H6,
    #[serde(rename = "h7")]
    H7,
    #[serde(rename = "h8")]
    H8,
    #[serde(rename = "h9")]
    H9,
    #[serde(rename = "h10")]
    H10,
    #[serde(rename = "h11")]
    H11,
    #[serde(rename = "h12")]
    H12,
    #[serde(rename = "h13")]
    H13,
    #[serde(rename = "h14")]
    H14,
    #[serde(rename = "h15")]
    H15,
    #[serde(rename = "h16")]
    H16,
    #[serde(rename = "h17")]
    H17,
    #[serde(rename = "h18")]
    H18,
    #[serde(rename = "s1")]
    S1,
    #[serde(rename = "s2")]
    S2,
    #[serde(rename = "s3")]
    S3,
    #[serde(rename = "s4")]
    S4,
    #[serde(rename = "s5")]
    S5,
    #[serde(rename = "s6")]
    S6,
    #[serde(rename = "s7")]
    S7,
}

use ShapeId::*;

/// The base orientation of every figure, in the same order as [`ShapeId`].
static TEMPLATES: [(ShapeId, &str, &[&[u8]]); 25] = [
    (H1, "h1", &[&[1, 0, 0], &[1, 1, 1], &[1, 0, 0]]),
    (H2, "h2", &[&[1, 1, 0, 0], &[0, 1, 1, 1]]),
    (H3, "h3", &[&[0, 0, 1, 1], &[1, 1, 1, 0]]),
    (H4, "h4", &[&[1, 0, 0], &[1, 1, 0], &[0, 1, 1]]),
    (H5, "h5", &[&[1, 1, 1, 1, 1]]),
    (H6, "h6", &[&[1, 0, 0], &[1, 0, 0], &[1, 1, 1]]),
    (H7, "h7", &[&[1, 1, 1, 1], &[0, 0, 0, 1]]),
    (H8, "h8", &[&[0, 0, 0, 1], &[1, 1, 1, 1]]),
    (H9, "h9", &[&[0, 0, 1], &[1, 1, 1], &[0, 1, 0]]),
    (H10, "h10", &[&[0, 0, 1], &[1, 1, 1], &[1, 0, 0]]),
    (H11, "h11", &[&[1, 0, 0], &[1, 1, 1], &[0, 1, 0]]),
    (H12, "h12", &[&[1, 0, 0], &[1, 1, 1], &[0, 0, 1]]),
    (H13, "h13", &[&[1, 1, 1, 1], &[0, 0, 1, 0]]),
    (H14, "h14", &[&[0, 0, 1, 0], &[1, 1, 1, 1]]),
    (H15, "h15", &[&[0, 1, 1], &[1, 1, 1]]),
    (H16, "h16", &[&[1, 0, 1], &[1, 1, 1]]),
    (H17, "h17", &[&[0, 1, 0], &[1, 1, 1], &[0, 1, 0]]),
    (H18, "h18", &[&[1, 1, 1], &[0, 1, 1]]),
    (S1, "s1", &[&[0, 1, 1], &[1, 1, 0]]),
    (S2, "s2", &[&[1, 1], &[1, 1]]),
    (S3, "s3", &[&[1, 1, 0], &[0, 1, 1]]),
    (S4, "s4", &[&[0, 1, 0], &[1, 1, 1]]),
    (S5, "s5", &[&[1, 1, 1], &[0, 0, 1]]),
    (S6, "s6", &[&[1, 1, 1, 1]]),
    (S7, "s7", &[&[0, 0, 1], &[1, 1, 1]]),
];

/// The distinct rotations of every figure, indexed by `ShapeId as usize`.
static VARIANTS: Lazy<Vec<Vec<Mask>>> = Lazy::new(|| {
    TEMPLATES
        .iter()
        .map(|&(_, _, rows)| {
            let mut variants: Vec<Mask> = Vec::with_capacity(4);
            let mut mask = Mask::from_rows(rows);
            for _ in 0..4 {
                if !variants.contains(&mask) {
                    variants.push(mask);
                }
                mask = mask.rotate_cw();
            }
            variants
        })
        .collect()
});

impl ShapeId {
    pub const ALL: [ShapeId; 25] = [
        H1, H2, H3, H4, H5, H6, H7, H8, H9, H10, H11, H12, H13, H14, H15, H16, H17, H18, S1, S2,
        S3, S4, S5, S6, S7,
    ];

    pub const HARD: [ShapeId; 18] = [
        H1, H2, H3, H4, H5, H6, H7, H8, H9, H10, H11, H12, H13, H14, H15, H16, H17, H18,
    ];

    pub const SIMPLE: [ShapeId; 7] = [S1, S2, S3, S4, S5, S6, S7];

    pub fn is_simple(self) -> bool {
        self >= S1
    }

    /// The wire code, e.g. `"h5"`.
    pub fn code(self) -> &'static str {
        TEMPLATES[self as usize].1
    }

    /// The figure in its base orientation.
    pub fn template(self) -> Mask {
        Mask::from_rows(TEMPLATES[self as usize].2)
    }

    /// All distinct 90° rotations of the figure: one, two or four masks.
    pub fn variants(self) -> &'static [Mask] {
        &VARIANTS[self as usize]
    }

    /// Is `mask` exactly one of the rotations of this figure?
    pub fn matches(self, mask: Mask) -> bool {
        self.variants().contains(&mask)
    }

    /// Finds the figure that `mask` is a rotation of, if any.
    ///
    /// Rotations are pairwise distinct across figures, so there is at most one.
    pub fn identify(mask: Mask) -> Option<ShapeId> {
        ShapeId::ALL.into_iter().find(|shape| shape.matches(mask))
    }
}

impl std::fmt::Display for ShapeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for ShapeId {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TEMPLATES
            .iter()
            .find(|&&(_, code, _)| code == s)
            .map(|&(shape, _, _)| shape)
            .ok_or_else(|| ParseError::InvalidShape {
                found: String::from(s),
            })
    }
}
