//! Source/target comparison
//!
//! Two projections of the same grid size are compared pixel by pixel. Pixels
//! with no data in the source are forced empty in the target first, so missing
//! source data never shows up as a difference.

use crate::colorize::{label_image, ColorImage, LabelColorTable};
use crate::projection::{is_occupied, RangeProjection, EMPTY};
use lidarvis_core::{Error, Result, EMPTY_COLOR};
use ndarray::{Array2, Zip};
use std::collections::{BTreeMap, HashMap};

/// Scalar scores of one comparison
#[derive(Debug, Clone, PartialEq)]
pub struct EvalSummary {
    /// Mean IoU over the classes present in the source, `None` without labels on both sides
    pub mean_iou: Option<f64>,
    /// Fraction of labeled source pixels whose target class matches
    pub accuracy: Option<f64>,
    /// Mean squared range error over source pixels with data
    pub mse: f64,
    /// IoU of every class present in the source
    pub class_iou: BTreeMap<u32, f64>,
}

/// Difference images plus summary scores
#[derive(Debug, Clone, PartialEq)]
pub struct FrameDifference {
    pub label_diff: Option<ColorImage>,
    pub range_diff: Array2<f32>,
    pub remission_diff: Option<Array2<f32>>,
    pub summary: EvalSummary,
}

fn check_shape(expected: (usize, usize), found: (usize, usize)) -> Result<()> {
    if expected != found {
        return Err(Error::DimensionMismatch { expected, found });
    }
    Ok(())
}

/// Squared range error per pixel.
///
/// Source pixels without data stay [`EMPTY`]. A target pixel without data
/// under a source pixel with data counts as range 0.
pub fn range_difference(source: &Array2<f32>, target: &Array2<f32>) -> Result<Array2<f32>> {
    check_shape(source.dim(), target.dim())?;
    Ok(Zip::from(source).and(target).map_collect(|&s, &t| {
        if !is_occupied(s) {
            return EMPTY;
        }
        let t = if is_occupied(t) { t } else { 0.0 };
        (s - t).powi(2)
    }))
}

/// Absolute remission difference per pixel, same masking as [`range_difference`]
pub fn remission_difference(source: &Array2<f32>, target: &Array2<f32>) -> Result<Array2<f32>> {
    check_shape(source.dim(), target.dim())?;
    Ok(Zip::from(source).and(target).map_collect(|&s, &t| {
        if !is_occupied(s) {
            return EMPTY;
        }
        let t = if is_occupied(t) { t } else { 0.0 };
        (s - t).abs()
    }))
}

/// Absolute per-channel color difference; black source pixels have no data
pub fn label_difference(source: &ColorImage, target: &ColorImage) -> Result<ColorImage> {
    check_shape(source.dim(), target.dim())?;
    Ok(Zip::from(source).and(target).map_collect(|s, t| {
        let t = if *s == EMPTY_COLOR { EMPTY_COLOR } else { *t };
        [0, 1, 2].map(|c| s[c].abs_diff(t[c]))
    }))
}

/// Mean of the squared error over source pixels with data; 0 when there are none
pub fn mean_squared_error(source: &Array2<f32>, range_diff: &Array2<f32>) -> f64 {
    let (sum, count) = Zip::from(source)
        .and(range_diff)
        .fold((0.0f64, 0usize), |(sum, count), &s, &d| {
            if is_occupied(s) {
                (sum + d as f64, count + 1)
            } else {
                (sum, count)
            }
        });
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

#[derive(Default)]
struct ClassCounts {
    true_positive: u64,
    false_positive: u64,
    false_negative: u64,
}

/// IoU per source class, mean IoU and pixel accuracy.
///
/// Only pixels labeled in the source are evaluated; classes that do not occur
/// in the source are left out of the mean. With nothing to evaluate both
/// scores are 1.
pub fn evaluate_labels(
    source: &Array2<Option<u32>>,
    target: &Array2<Option<u32>>,
) -> Result<(f64, f64, BTreeMap<u32, f64>)> {
    check_shape(source.dim(), target.dim())?;

    let mut counts: HashMap<u32, ClassCounts> = HashMap::new();
    let mut evaluated = 0u64;
    let mut correct = 0u64;

    Zip::from(source).and(target).for_each(|s, t| {
        let Some(s) = *s else {
            return;
        };
        evaluated += 1;
        if *t == Some(s) {
            correct += 1;
            counts.entry(s).or_default().true_positive += 1;
        } else {
            counts.entry(s).or_default().false_negative += 1;
            if let Some(t) = *t {
                counts.entry(t).or_default().false_positive += 1;
            }
        }
    });

    if evaluated == 0 {
        return Ok((1.0, 1.0, BTreeMap::new()));
    }

    // a class occurs in the source iff it has a true positive or a false negative
    let class_iou: BTreeMap<u32, f64> = counts
        .iter()
        .filter(|(_, c)| c.true_positive + c.false_negative > 0)
        .map(|(&class, c)| {
            let union = c.true_positive + c.false_positive + c.false_negative;
            (class, c.true_positive as f64 / union as f64)
        })
        .collect();

    let mean_iou = class_iou.values().sum::<f64>() / class_iou.len() as f64;
    let accuracy = correct as f64 / evaluated as f64;
    Ok((mean_iou, accuracy, class_iou))
}

/// Compare a source projection against a target projection of the same size
pub fn compare(
    source: &RangeProjection,
    target: &RangeProjection,
    table: &LabelColorTable,
) -> Result<FrameDifference> {
    check_shape(source.shape(), target.shape())?;

    let range_diff = range_difference(&source.range, &target.range)?;
    let mse = mean_squared_error(&source.range, &range_diff);

    let remission_diff = match (&source.remission, &target.remission) {
        (Some(s), Some(t)) => Some(remission_difference(s, t)?),
        _ => None,
    };

    let label_diff = match (label_image(source, table), label_image(target, table)) {
        (Some(s), Some(t)) => Some(label_difference(&s, &t)?),
        _ => None,
    };

    let (mean_iou, accuracy, class_iou) = match (&source.label, &target.label) {
        (Some(s), Some(t)) => {
            let (iou, acc, per_class) = evaluate_labels(s, t)?;
            (Some(iou), Some(acc), per_class)
        }
        _ => (None, None, BTreeMap::new()),
    };

    Ok(FrameDifference {
        label_diff,
        range_diff,
        remission_diff,
        summary: EvalSummary {
            mean_iou,
            accuracy,
            mse,
            class_iou,
        },
    })
}
