//! Colorization of scalar grids and semantic labels

use crate::colormap::Colormap;
use crate::projection::{is_occupied, RangeProjection};
use lidarvis_core::{Rgb, EMPTY_COLOR};
use ndarray::Array2;
use rayon::prelude::*;
use std::collections::{BTreeMap, HashMap};

/// An RGB image, row-major, row 0 at the lowest elevation
pub type ColorImage = Array2<Rgb>;

/// Preferred color for labels that have no entry in the table
pub const UNKNOWN_LABEL_COLOR: Rgb = [255, 0, 255];

/// Power-law exponent for range images
pub const RANGE_POWER: f32 = 16.0;
/// Power-law exponent for per-point range colors in the 3D view
pub const POINT_RANGE_POWER: f32 = 2.0;
/// Power-law exponent for remissions
pub const REMISSION_POWER: f32 = 1.0;

/// What a scalar value measures; decides which values count as data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    /// Strictly positive distances
    Range,
    /// Non-negative intensities
    Remission,
    /// Non-negative error values
    Error,
}

impl ScalarKind {
    pub fn is_valid(self, value: f32) -> bool {
        match self {
            ScalarKind::Range => value.is_finite() && value > 0.0,
            ScalarKind::Remission | ScalarKind::Error => is_occupied(value),
        }
    }
}

/// Remap valid values with `x^(1/power)` and min-max normalize them to `0..=255`.
///
/// Invalid values map to `None`. When all valid values are equal they map
/// to 0.
pub fn normalize_scalars(values: &[f32], kind: ScalarKind, power: f32) -> Vec<Option<u8>> {
    let power = if power > 0.0 { power } else { 1.0 };
    let remapped: Vec<Option<f32>> = values
        .par_iter()
        .map(|&v| kind.is_valid(v).then(|| v.powf(1.0 / power)))
        .collect();

    let (min, max) = remapped
        .iter()
        .flatten()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let span = max - min;

    remapped
        .par_iter()
        .map(|v| {
            v.map(|v| {
                if span > f32::EPSILON {
                    ((v - min) / span * 255.0) as u8
                } else {
                    0
                }
            })
        })
        .collect()
}

/// Colorize scalar values through `cmap`; invalid values become black
pub fn colorize_scalars(values: &[f32], kind: ScalarKind, power: f32, cmap: &Colormap) -> Vec<Rgb> {
    normalize_scalars(values, kind, power)
        .into_par_iter()
        .map(|index| index.map_or(EMPTY_COLOR, |i| cmap.lookup(i)))
        .collect()
}

/// Colorize a scalar grid, keeping its shape
pub fn colorize_grid(grid: &Array2<f32>, kind: ScalarKind, power: f32, cmap: &Colormap) -> ColorImage {
    let values: Vec<f32> = grid.iter().copied().collect();
    let colors = colorize_scalars(&values, kind, power, cmap);
    Array2::from_shape_vec(grid.raw_dim(), colors)
        .unwrap_or_else(|_| Array2::from_elem(grid.raw_dim(), EMPTY_COLOR))
}

/// Fixed class id to color table
#[derive(Debug, Clone, PartialEq)]
pub struct LabelColorTable {
    colors: BTreeMap<u32, Rgb>,
    reverse: HashMap<Rgb, u32>,
    unknown: Rgb,
}

impl LabelColorTable {
    pub fn new(colors: BTreeMap<u32, Rgb>) -> Self {
        let mut reverse = HashMap::with_capacity(colors.len());
        // iterate in id order so the lowest id wins a shared color
        for (&id, &color) in &colors {
            match reverse.get(&color) {
                Some(&owner) => log::warn!(
                    "Classes {} and {} share color {:?}; it decodes to {}",
                    owner,
                    id,
                    color,
                    owner
                ),
                None => {
                    reverse.insert(color, id);
                }
            }
        }

        let unknown = std::iter::once(UNKNOWN_LABEL_COLOR)
            .chain((0..=u8::MAX).flat_map(|g| (0..=u8::MAX).map(move |b| [255, g, b])))
            .find(|c| *c != EMPTY_COLOR && !reverse.contains_key(c))
            .unwrap_or(UNKNOWN_LABEL_COLOR);
        if unknown != UNKNOWN_LABEL_COLOR {
            log::debug!("Unknown labels are drawn as {:?}", unknown);
        }

        Self {
            colors,
            reverse,
            unknown,
        }
    }

    pub fn color(&self, label: u32) -> Rgb {
        self.colors.get(&label).copied().unwrap_or(self.unknown)
    }

    /// Color of labels missing from the table; never the color of a known class
    pub fn unknown_color(&self) -> Rgb {
        self.unknown
    }

    /// Recover a class id from its exact color.
    ///
    /// Classes sharing a color cannot be told apart; the color decodes to the
    /// lowest id that uses it.
    pub fn decode(&self, color: Rgb) -> Option<u32> {
        self.reverse.get(&color).copied()
    }

    pub fn class_ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.colors.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Per-point label colors
    pub fn colorize_labels(&self, labels: &[u32]) -> Vec<Rgb> {
        labels.par_iter().map(|&l| self.color(l)).collect()
    }

    /// Decode a color image back into a class map; black pixels hold no data
    pub fn decode_image(&self, image: &ColorImage) -> Array2<Option<u32>> {
        image.map(|&c| if c == EMPTY_COLOR { None } else { self.decode(c) })
    }
}

/// Label color image of a projection, `None` for unlabeled scans
pub fn label_image(projection: &RangeProjection, table: &LabelColorTable) -> Option<ColorImage> {
    projection
        .label
        .as_ref()
        .map(|labels| labels.map(|l| l.map_or(EMPTY_COLOR, |l| table.color(l))))
}

/// Range image colored with viridis after a `x^(1/16)` remap
pub fn range_image(projection: &RangeProjection, cmap: &Colormap) -> ColorImage {
    colorize_grid(&projection.range, ScalarKind::Range, RANGE_POWER, cmap)
}

/// Remission image, `None` when the scan carries no remissions
pub fn remission_image(projection: &RangeProjection, cmap: &Colormap) -> Option<ColorImage> {
    projection
        .remission
        .as_ref()
        .map(|grid| colorize_grid(grid, ScalarKind::Remission, REMISSION_POWER, cmap))
}
