// Core data models for the Mood Light application

use image::{imageops, RgbImage};

/// Represents a single video frame with RGB data
#[derive(Clone, Debug)]
pub struct Frame {
    /// Raw RGB pixel data (width * height * 3 bytes)
    pub data: Vec<u8>,
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
}

impl Frame {
    /// Creates a new Frame with the given parameters
    pub fn new(data: Vec<u8>, width: u32, height: u32) -> Self {
        Self {
            data,
            width,
            height,
        }
    }

    /// Returns the frame flipped around its vertical axis (selfie view).
    ///
    /// A frame whose buffer does not match its dimensions is returned as is.
    pub fn mirrored(self) -> Self {
        let (width, height) = (self.width, self.height);
        if self.data.len() != width as usize * height as usize * 3 {
            return self;
        }
        match RgbImage::from_raw(width, height, self.data) {
            Some(img) => Self::new(imageops::flip_horizontal(&img).into_raw(), width, height),
            None => Self::new(Vec::new(), width, height),
        }
    }
}

/// Color in canonical red, green, blue order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Same color in the display's blue, green, red channel order
    pub const fn to_bgr(self) -> Bgr {
        Bgr {
            b: self.b,
            g: self.g,
            r: self.r,
        }
    }
}

/// Color in display channel order (blue, green, red)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Bgr {
    pub b: u8,
    pub g: u8,
    pub r: u8,
}

impl Bgr {
    pub const fn new(b: u8, g: u8, r: u8) -> Self {
        Self { b, g, r }
    }

    pub const fn to_rgb(self) -> Rgb {
        Rgb::new(self.r, self.g, self.b)
    }

    /// Channel triple in storage order `(b, g, r)`
    pub const fn as_tuple(self) -> (u8, u8, u8) {
        (self.b, self.g, self.r)
    }
}

/// Result of emotion detection: the top label and its confidence
#[derive(Clone, Debug, PartialEq)]
pub struct EmotionResult {
    /// Lowercase emotion label as produced by the detector
    pub emotion: String,
    /// Confidence level (0.0 to 1.0)
    pub confidence: f32,
}

impl EmotionResult {
    /// Creates a new EmotionResult
    pub fn new(emotion: impl Into<String>, confidence: f32) -> Self {
        Self {
            emotion: emotion.into(),
            confidence,
        }
    }

    /// Returns the confidence as a percentage (0-100)
    pub fn confidence_percent(&self) -> u8 {
        (self.confidence.clamp(0.0, 1.0) * 100.0).round() as u8
    }
}

impl std::fmt::Display for EmotionResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({}% confidence)",
            self.emotion,
            self.confidence_percent()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bgr_reverses_rgb() {
        let rgb = Rgb::new(255, 220, 0);
        let bgr = rgb.to_bgr();
        assert_eq!(bgr.as_tuple(), (0, 220, 255));
        assert_eq!(bgr.to_rgb(), rgb);
    }

    #[test]
    fn mirrored_swaps_columns() {
        // 2x1 image: red pixel then blue pixel
        let frame = Frame::new(vec![255, 0, 0, 0, 0, 255], 2, 1);
        let flipped = frame.mirrored();
        assert_eq!(flipped.data, vec![0, 0, 255, 255, 0, 0]);
        assert_eq!((flipped.width, flipped.height), (2, 1));
    }

    #[test]
    fn confidence_percent_rounds_and_clamps() {
        assert_eq!(EmotionResult::new("happy", 0.876).confidence_percent(), 88);
        assert_eq!(EmotionResult::new("happy", 1.7).confidence_percent(), 100);
        assert_eq!(
            EmotionResult::new("sad", 0.5).to_string(),
            "sad (50% confidence)"
        );
    }
}
