// One capture session: frame source, detector and mood pipeline driven step by step

use crate::camera::FrameSource;
use crate::emotion::EmotionDetector;
use crate::error::Result;
use crate::models::Frame;
use crate::pipeline::{MoodPipeline, MoodReading};
use tracing::{debug, warn};

/// Output of one loop iteration
#[derive(Clone, Debug)]
pub struct FrameOutcome {
    /// Frame as it should be displayed
    pub frame: Frame,
    pub reading: MoodReading,
}

pub struct MoodSession<S, D> {
    source: S,
    detector: D,
    pipeline: MoodPipeline,
    mirror: bool,
    frames_processed: u64,
}

impl<S: FrameSource, D: EmotionDetector> MoodSession<S, D> {
    pub fn new(source: S, detector: D, pipeline: MoodPipeline, mirror: bool) -> Self {
        Self {
            source,
            detector,
            pipeline,
            mirror,
            frames_processed: 0,
        }
    }

    /// Reads, detects and smooths one frame.
    ///
    /// A frame read error is returned and ends the session; a detector error
    /// only costs this frame its detection.
    pub fn step(&mut self) -> Result<FrameOutcome> {
        let mut frame = self.source.read_frame()?;
        if self.mirror {
            frame = frame.mirrored();
        }

        let detection = match self.detector.top_emotion(&frame) {
            Ok(detection) => detection,
            Err(e) => {
                warn!("Emotion detection failed: {}", e);
                None
            }
        };

        if let Some(detection) = &detection {
            debug!("Detected {}", detection);
        }

        let reading = self.pipeline.process(detection.as_ref());
        self.frames_processed += 1;
        debug!("{}", reading.status_line());

        Ok(FrameOutcome { frame, reading })
    }

    pub fn frames_processed(&self) -> u64 {
        self.frames_processed
    }

    /// Releases the frame source
    pub fn release(&mut self) {
        self.source.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MoodLightError;
    use crate::models::{EmotionResult, Rgb};
    use crate::mood_table::{MoodEntry, MoodTable};
    use std::collections::VecDeque;
    use std::sync::Arc;

    struct ScriptedCamera {
        frames: VecDeque<Frame>,
        released: bool,
    }

    impl FrameSource for ScriptedCamera {
        fn read_frame(&mut self) -> Result<Frame> {
            self.frames
                .pop_front()
                .ok_or_else(|| MoodLightError::FrameRead("end of script".to_string()))
        }

        fn release(&mut self) {
            self.released = true;
        }
    }

    /// Reports the first pixel's red value as the emotion
    struct PixelDetector;

    impl EmotionDetector for PixelDetector {
        fn top_emotion(&mut self, frame: &Frame) -> Result<Option<EmotionResult>> {
            match frame.data.first() {
                Some(255) => Ok(Some(EmotionResult::new("happy", 0.9))),
                Some(0) => Ok(None),
                _ => Err(MoodLightError::FaceDetection("bad frame".to_string())),
            }
        }
    }

    fn session(frames: Vec<Frame>, mirror: bool) -> MoodSession<ScriptedCamera, PixelDetector> {
        let table = MoodTable::from_entries([MoodEntry::new(
            "happy",
            "Joyful",
            "Warm Yellow",
            Rgb::new(255, 220, 0),
        )]);
        MoodSession::new(
            ScriptedCamera {
                frames: frames.into(),
                released: false,
            },
            PixelDetector,
            MoodPipeline::new(Arc::new(table), 10),
            mirror,
        )
    }

    fn pixel(red: u8) -> Frame {
        Frame::new(vec![red, 0, 0], 1, 1)
    }

    #[test]
    fn step_produces_smoothed_reading() {
        let mut session = session(vec![pixel(255), pixel(0)], false);

        let first = session.step().unwrap();
        assert_eq!(first.reading.mood, "happy");
        assert_eq!(first.reading.color_name, "Warm Yellow");

        let second = session.step().unwrap();
        assert_eq!(second.reading.detected, None);
        assert_eq!(second.reading.mood, "happy");
        assert_eq!(session.frames_processed(), 2);
    }

    #[test]
    fn detector_error_counts_as_no_detection() {
        let mut session = session(vec![pixel(7)], false);
        let outcome = session.step().unwrap();
        assert_eq!(outcome.reading.mood, "neutral");
        assert_eq!(outcome.reading.status_line(), "Detected: None (0.00) | Mood: neutral");
    }

    #[test]
    fn frame_read_failure_ends_session() {
        let mut session = session(vec![], false);
        assert!(matches!(session.step(), Err(MoodLightError::FrameRead(_))));
        assert_eq!(session.frames_processed(), 0);
    }

    #[test]
    fn mirror_flips_before_detection() {
        // left pixel black, right pixel red: mirrored, the detector sees red first
        let frame = Frame::new(vec![0, 0, 0, 255, 0, 0], 2, 1);
        let mut session = session(vec![frame], true);
        let outcome = session.step().unwrap();
        assert_eq!(outcome.frame.data, vec![255, 0, 0, 0, 0, 0]);
        assert_eq!(outcome.reading.detected.as_deref(), Some("happy"));
    }

    #[test]
    fn release_reaches_source() {
        let mut session = session(vec![], false);
        session.release();
        assert!(session.source.released);
    }
}
