//! Bounding-box helpers for the site map
//!
//! A bbox is four `[longitude, latitude]` corners in SW, SE, NE, NW order.
//! Latitudes clamp at the poles; longitudes are left unclamped by
//! `scale_bbox` because callers wrap across the antimeridian using
//! [`calc_translation`].

use crate::errors::{AppError, Result};

/// Four `[longitude, latitude]` corners: SW, SE, NE, NW
pub type BBox = [[f64; 2]; 4];

const WORLD_WIDTH: f64 = 360.0;
const WORLD_HEIGHT: f64 = 180.0;
const LAT_LIMIT: f64 = 90.0;
const LON_BOUNDARY: f64 = 180.0;

fn width(bbox: &BBox) -> f64 {
    bbox[1][0] - bbox[0][0]
}

fn height(bbox: &BBox) -> f64 {
    bbox[2][1] - bbox[1][1]
}

fn center(bbox: &BBox) -> (f64, f64) {
    (
        (bbox[0][0] + bbox[1][0]) / 2.0,
        (bbox[1][1] + bbox[2][1]) / 2.0,
    )
}

fn from_extent(left: f64, bottom: f64, right: f64, top: f64) -> BBox {
    [[left, bottom], [right, bottom], [right, top], [left, top]]
}

/// True iff the polygon spans the whole world
pub fn is_zoom0(bbox: &BBox) -> bool {
    height(bbox) >= WORLD_HEIGHT && width(bbox) >= WORLD_WIDTH
}

/// Double width and height around the center, clamping latitudes to
/// [-90, 90]; longitudes are not clamped
pub fn scale_bbox(bbox: &BBox) -> BBox {
    let (cx, cy) = center(bbox);
    let half_width = width(bbox);
    let half_height = height(bbox);

    let bottom = (cy - half_height).clamp(-LAT_LIMIT, LAT_LIMIT);
    let top = (cy + half_height).clamp(-LAT_LIMIT, LAT_LIMIT);
    from_extent(cx - half_width, bottom, cx + half_width, top)
}

/// Shrink an oversized polygon symmetrically around its center until it
/// fits inside a world extent
pub fn truncate_bbox(bbox: &BBox) -> BBox {
    let (cx, cy) = center(bbox);
    let mut w = width(bbox);
    let mut h = height(bbox);

    if w <= WORLD_WIDTH && h <= WORLD_HEIGHT {
        return *bbox;
    }
    w = w.min(WORLD_WIDTH);
    h = h.min(WORLD_HEIGHT);
    from_extent(cx - w / 2.0, cy - h / 2.0, cx + w / 2.0, cy + h / 2.0)
}

/// For a polygon within world dimensions, the antimeridian boundary it
/// crosses (+180 or -180) and the integer translation factor that brings
/// it back into range
///
/// Returns `None` when the polygon stays inside [-180, 180]. Fails when
/// the polygon exceeds world dimensions; truncate first.
pub fn calc_translation(polygon: &BBox) -> Result<Option<(f64, i64)>> {
    if width(polygon) > WORLD_WIDTH || height(polygon) > WORLD_HEIGHT {
        return Err(AppError::Internal {
            message: format!(
                "polygon exceeds world dimensions: {}x{}",
                width(polygon),
                height(polygon)
            ),
        });
    }

    let left = polygon[0][0];
    let right = polygon[1][0];

    if right > LON_BOUNDARY {
        let factor = -((right + LON_BOUNDARY) / WORLD_WIDTH).floor() as i64;
        Ok(Some((LON_BOUNDARY, factor)))
    } else if left < -LON_BOUNDARY {
        let factor = ((-LON_BOUNDARY - left) / WORLD_WIDTH).ceil() as i64;
        Ok(Some((-LON_BOUNDARY, factor)))
    } else {
        Ok(None)
    }
}
