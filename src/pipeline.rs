// Per-frame mood processing: smooth the detection and resolve the panel color

use crate::color::{resolve_color, resolve_color_name};
use crate::models::{Bgr, EmotionResult};
use crate::mood_table::MoodTable;
use crate::smoother::EmotionHistory;
use std::sync::Arc;

/// Mood used before the smoother has seen any label
pub const FALLBACK_MOOD: &str = "neutral";

/// Everything the display needs for one processed frame
#[derive(Clone, Debug, PartialEq)]
pub struct MoodReading {
    /// Raw detector label for this frame
    pub detected: Option<String>,
    pub confidence: f32,
    /// Smoothed mood label
    pub mood: String,
    pub color: Bgr,
    pub color_name: String,
}

impl MoodReading {
    /// Status line, e.g. `Detected: happy (0.87) | Mood: happy`
    pub fn status_line(&self) -> String {
        format!(
            "Detected: {} ({:.2}) | Mood: {}",
            self.detected.as_deref().unwrap_or("None"),
            self.confidence,
            self.mood
        )
    }
}

/// Owns the smoothing window and shares the read-only mood table
pub struct MoodPipeline {
    table: Arc<MoodTable>,
    history: EmotionHistory,
}

impl MoodPipeline {
    pub fn new(table: Arc<MoodTable>, window: usize) -> Self {
        Self {
            table,
            history: EmotionHistory::new(window),
        }
    }

    /// Feeds one detector result through the smoother and resolves the color
    pub fn process(&mut self, detection: Option<&EmotionResult>) -> MoodReading {
        let detected = detection
            .map(|d| d.emotion.clone())
            .filter(|label| !label.is_empty());
        let confidence = detection.map(|d| d.confidence).unwrap_or(0.0);

        if let Some(label) = &detected {
            self.history.observe(label);
        }

        let mood = self
            .history
            .majority_label()
            .unwrap_or(FALLBACK_MOOD)
            .to_string();

        MoodReading {
            color: resolve_color(&self.table, Some(mood.as_str())),
            color_name: resolve_color_name(&self.table, Some(mood.as_str())),
            detected,
            confidence,
            mood,
        }
    }

    pub fn history(&self) -> &EmotionHistory {
        &self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::NEUTRAL_COLOR;
    use crate::models::Rgb;
    use crate::mood_table::MoodEntry;

    fn pipeline(window: usize) -> MoodPipeline {
        let table = MoodTable::from_entries([
            MoodEntry::new("happy", "Joyful", "Warm Yellow", Rgb::new(255, 220, 0)),
            MoodEntry::new("neutral", "Calm", "Soft White", Rgb::new(240, 240, 235)),
        ]);
        MoodPipeline::new(Arc::new(table), window)
    }

    #[test]
    fn no_detection_yet_falls_back_to_neutral() {
        let mut pipeline = pipeline(10);
        let reading = pipeline.process(None);
        assert_eq!(reading.mood, "neutral");
        assert_eq!(reading.detected, None);
        assert_eq!(reading.color_name, "Soft White");
        assert_eq!(reading.status_line(), "Detected: None (0.00) | Mood: neutral");
    }

    #[test]
    fn neutral_fallback_without_table_row_uses_default_color() {
        let mut pipeline = MoodPipeline::new(Arc::new(MoodTable::default()), 10);
        let reading = pipeline.process(None);
        assert_eq!(reading.color, NEUTRAL_COLOR);
        assert_eq!(reading.color_name, "neutral");
    }

    #[test]
    fn smoothed_mood_survives_a_noisy_frame() {
        let mut pipeline = pipeline(10);
        pipeline.process(Some(&EmotionResult::new("happy", 0.9)));
        pipeline.process(Some(&EmotionResult::new("happy", 0.8)));
        let reading = pipeline.process(Some(&EmotionResult::new("sad", 0.456)));

        assert_eq!(reading.detected.as_deref(), Some("sad"));
        assert_eq!(reading.mood, "happy");
        assert_eq!(reading.color, Rgb::new(255, 220, 0).to_bgr());
        assert_eq!(reading.status_line(), "Detected: sad (0.46) | Mood: happy");
    }

    #[test]
    fn missed_frames_keep_last_mood() {
        let mut pipeline = pipeline(10);
        pipeline.process(Some(&EmotionResult::new("happy", 0.7)));
        let reading = pipeline.process(None);
        assert_eq!(reading.mood, "happy");
        assert_eq!(pipeline.history().len(), 1);
    }

    #[test]
    fn empty_label_counts_as_no_detection() {
        let mut pipeline = pipeline(10);
        let reading = pipeline.process(Some(&EmotionResult::new("", 0.3)));
        assert_eq!(reading.detected, None);
        assert!(pipeline.history().is_empty());
    }
}
