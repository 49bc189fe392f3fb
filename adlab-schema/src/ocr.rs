//! OCR service wire types (`POST /ocr/detect`).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrDetectRequest {
    pub image_url: String,
}

/// `[x, y]` in image pixels.
pub type Point = [f64; 2];

/// Quadrilateral text box as reported by the detector, with derived metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub top_left: Point,
    pub top_right: Point,
    pub bottom_right: Point,
    pub bottom_left: Point,
    pub center: Point,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn corners(&self) -> [Point; 4] {
        [
            self.top_left,
            self.top_right,
            self.bottom_right,
            self.bottom_left,
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRegion {
    pub text: String,
    pub bounding_box: BoundingBox,
    #[serde(default)]
    pub area: f64,
    #[serde(default)]
    pub aspect_ratio: f64,
}
