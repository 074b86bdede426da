//! Zone catalog: the scenes of the world in travel order, with their
//! normalized (0..1) land silhouettes.

use bevy::prelude::*;

use crate::shared::SceneId;

pub struct ZoneDef {
    pub id: SceneId,
    pub name: &'static str,
    pub outline: Option<&'static [(f32, f32)]>,
}

impl ZoneDef {
    pub fn outline_points(&self) -> Option<Vec<Vec2>> {
        self.outline
            .map(|points| points.iter().map(|&(x, y)| Vec2::new(x, y)).collect())
    }
}

/// Matanuska-Susitna Valley.
const ALASKA: &[(f32, f32)] = &[
    (0.10, 0.20), (0.18, 0.12), (0.32, 0.10), (0.45, 0.15),
    (0.55, 0.10), (0.68, 0.14), (0.78, 0.22), (0.86, 0.32),
    (0.90, 0.44), (0.86, 0.58), (0.78, 0.66), (0.67, 0.73),
    (0.58, 0.78), (0.46, 0.82), (0.34, 0.78), (0.26, 0.70),
    (0.22, 0.62), (0.18, 0.53), (0.16, 0.46), (0.12, 0.35),
];

/// Prairie Pothole Region: jagged oval.
const PRAIRIE_POTHOLE: &[(f32, f32)] = &[
    (0.20, 0.18), (0.32, 0.12), (0.46, 0.12), (0.58, 0.16),
    (0.70, 0.22), (0.80, 0.34), (0.84, 0.46), (0.82, 0.58),
    (0.74, 0.70), (0.62, 0.78), (0.48, 0.82), (0.36, 0.80),
    (0.26, 0.72), (0.18, 0.62), (0.14, 0.50), (0.16, 0.36),
];

/// Leelanau Peninsula: elongated semi-peninsula.
const LEELANAU: &[(f32, f32)] = &[
    (0.30, 0.15), (0.42, 0.12), (0.54, 0.16), (0.62, 0.22),
    (0.68, 0.30), (0.70, 0.40), (0.68, 0.52), (0.62, 0.62),
    (0.54, 0.70), (0.44, 0.76), (0.34, 0.78), (0.24, 0.74),
    (0.20, 0.64), (0.22, 0.52), (0.24, 0.40), (0.26, 0.28),
];

pub const ZONES: &[ZoneDef] = &[
    ZoneDef {
        id: 1,
        name: "Homestead",
        outline: None,
    },
    ZoneDef {
        id: 2,
        name: "Matanuska-Susitna Valley, Alaska",
        outline: Some(ALASKA),
    },
    ZoneDef {
        id: 3,
        name: "Prairie Pothole Region, North Dakota",
        outline: Some(PRAIRIE_POTHOLE),
    },
    ZoneDef {
        id: 4,
        name: "Leelanau Peninsula, Michigan",
        outline: Some(LEELANAU),
    },
];
