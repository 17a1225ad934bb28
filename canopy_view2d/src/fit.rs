// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use canopy_affine::AffineTransform;
use kurbo::{Rect, Size};

use crate::settings::ControllerSettings;

/// Computes the transform that fits `content` (world space) into a viewport of
/// `viewport` size whose origin is the screen origin.
///
/// The content center maps to the viewport center and the scale is
/// `min(width / content_width, height / content_height)`, clamped to the zoom
/// limits in `settings`. When one content axis has zero extent the other axis
/// alone decides the scale; when both do, the content is only centered.
///
/// Returns the identity for `None` or non-finite content, and `None` when the
/// viewport has no positive area.
#[must_use]
pub fn fit_transform(
    viewport: Size,
    content: Option<Rect>,
    settings: &ControllerSettings,
) -> Option<AffineTransform> {
    let (w, h) = (viewport.width, viewport.height);
    if !(w.is_finite() && h.is_finite() && w > 0.0 && h > 0.0) {
        return None;
    }
    let Some(content) = content.filter(|r| r.is_finite()) else {
        return Some(AffineTransform::IDENTITY);
    };
    let content = content.abs();

    let sx = (content.width() > 0.0).then(|| w / content.width());
    let sy = (content.height() > 0.0).then(|| h / content.height());
    let scale = match (sx, sy) {
        (Some(sx), Some(sy)) => sx.min(sy),
        (Some(s), None) | (None, Some(s)) => s,
        (None, None) => 1.0,
    };
    let scale = settings.clamp_zoom(scale);

    let view_center = Rect::from_origin_size((0.0, 0.0), viewport).center();
    Some(
        AffineTransform::translate(view_center.to_vec2())
            .compose(AffineTransform::scale_uniform(scale))
            .compose(AffineTransform::translate(-content.center().to_vec2())),
    )
}
