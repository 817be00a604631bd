// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Overlay renderer
//!
//! Turns normalized bounding boxes into a human-inspectable annotated image.
//! Rendering is a pure function of (base image, labels, options): every box
//! is validated before the first pixel is touched, so a failed render leaves
//! the image untouched and re-rendering onto a fresh copy of the same base
//! is pixel-identical.

pub mod palette;

use ab_glyph::{FontVec, PxScale};
use image::RgbImage;
use imageproc::drawing::{draw_hollow_rect_mut, draw_text_mut};
use imageproc::rect::Rect;
use thiserror::Error;
use tracing::warn;

use crate::detector::{BoundingBoxInstance, DetectionLabel};

pub use palette::color_for_label;

#[derive(Debug, Error)]
pub enum OverlayError {
    #[error(
        "Invalid bounding box for label '{label}': left={left}, top={top}, width={width}, height={height}"
    )]
    InvalidBoundingBox {
        label: String,
        left: f32,
        top: f32,
        width: f32,
        height: f32,
    },
}

/// Pixel-space rectangle computed from bounding-box fractions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl PixelRect {
    pub fn from_fractions(instance: &BoundingBoxInstance, image_width: u32, image_height: u32) -> Self {
        Self {
            left: instance.left * image_width as f32,
            top: instance.top * image_height as f32,
            width: instance.width * image_width as f32,
            height: instance.height * image_height as f32,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OverlayOptions {
    /// Clamp out-of-range fractions into [0,1] instead of failing. Off by
    /// default: out-of-range boxes are a malformed response, not cosmetics.
    pub clamp_boxes: bool,
    /// Outline thickness in pixels
    pub border_width: u32,
    /// Label text height in pixels
    pub font_size: f32,
}

impl Default for OverlayOptions {
    fn default() -> Self {
        Self {
            clamp_boxes: false,
            border_width: 2,
            font_size: 18.0,
        }
    }
}

pub struct OverlayRenderer {
    options: OverlayOptions,
    font: Option<FontVec>,
}

impl OverlayRenderer {
    pub fn new(options: OverlayOptions) -> Self {
        Self {
            options,
            font: None,
        }
    }

    /// Attach a font for label text. Without one, rectangles are still drawn
    /// and a warning is logged when text would have been rendered.
    pub fn with_font(mut self, font: FontVec) -> Self {
        self.font = Some(font);
        self
    }

    /// Draw every localized instance onto `image`. Labels with zero
    /// instances draw nothing; they only appear in the textual summary.
    pub fn render(
        &self,
        image: &mut RgbImage,
        labels: &[DetectionLabel],
    ) -> Result<(), OverlayError> {
        let (width, height) = image.dimensions();

        // Validate everything up front so an error never leaves the image
        // partially annotated.
        let mut draws = Vec::new();
        for label in labels {
            for instance in &label.instances {
                let instance = self.checked_instance(&label.name, instance)?;
                draws.push((label, PixelRect::from_fractions(&instance, width, height)));
            }
        }

        if !draws.is_empty() && self.font.is_none() {
            warn!("no font loaded; drawing rectangles without label text");
        }

        for (label, rect) in draws {
            self.draw_instance(image, label, rect);
        }
        Ok(())
    }

    fn checked_instance(
        &self,
        label: &str,
        instance: &BoundingBoxInstance,
    ) -> Result<BoundingBoxInstance, OverlayError> {
        let has_nan = [instance.left, instance.top, instance.width, instance.height]
            .iter()
            .any(|v| v.is_nan());

        if self.options.clamp_boxes && !has_nan {
            let left = instance.left.clamp(0.0, 1.0);
            let top = instance.top.clamp(0.0, 1.0);
            let clamped = BoundingBoxInstance {
                left,
                top,
                width: instance.width.clamp(0.0, 1.0 - left),
                height: instance.height.clamp(0.0, 1.0 - top),
            };
            if in_range(&clamped) {
                return Ok(clamped);
            }
        }

        if in_range(instance) {
            Ok(*instance)
        } else {
            Err(OverlayError::InvalidBoundingBox {
                label: label.to_string(),
                left: instance.left,
                top: instance.top,
                width: instance.width,
                height: instance.height,
            })
        }
    }

    fn draw_instance(&self, image: &mut RgbImage, label: &DetectionLabel, rect: PixelRect) {
        let color = palette::color_for_label(&label.name);
        let left = rect.left.round() as i32;
        let top = rect.top.round() as i32;
        // A detected instance is never invisible: sub-pixel boxes get 1px
        let box_width = (rect.width.round() as u32).max(1);
        let box_height = (rect.height.round() as u32).max(1);

        let base = Rect::at(left, top).of_size(box_width, box_height);
        for i in 0..self.options.border_width {
            let ring = Rect::at(base.left() - i as i32, base.top() - i as i32)
                .of_size(base.width() + 2 * i, base.height() + 2 * i);
            draw_hollow_rect_mut(image, ring, color);
        }

        if let Some(font) = &self.font {
            let text = format!("{} {:.2}%", label.name, label.confidence);
            let scale = PxScale::from(self.options.font_size);
            let text_height = self.options.font_size.ceil() as i32;
            let text_top = text_anchor(top, text_height, self.options.border_width);
            draw_text_mut(image, color, left, text_top, scale, font, &text);
        }
    }
}

/// Above the top-left corner by convention; below it when above would land
/// off-canvas.
fn text_anchor(box_top: i32, text_height: i32, border_width: u32) -> i32 {
    let above = box_top - text_height - 2;
    if above >= 0 {
        above
    } else {
        box_top + border_width as i32 + 2
    }
}

fn in_range(instance: &BoundingBoxInstance) -> bool {
    // NaN fails every comparison, so it is rejected here too
    instance.left >= 0.0
        && instance.top >= 0.0
        && instance.width >= 0.0
        && instance.height >= 0.0
        && instance.left + instance.width <= 1.0
        && instance.top + instance.height <= 1.0
}

/// Console summary: every label gets a line pair, localized or not. Zero
/// labels produce an empty summary.
pub fn summary(labels: &[DetectionLabel]) -> String {
    let mut out = String::new();
    for label in labels {
        out.push_str(&format!(
            "Label: {}\nConfidence: {:.2}%\n",
            label.name, label.confidence
        ));
    }
    out
}
