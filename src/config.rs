// Command line configuration

use crate::smoother::DEFAULT_WINDOW;
use clap::Parser;
use std::path::PathBuf;

/// Mood Light: reads the webcam, detects facial emotion and paints a panel
/// in the matching color.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
pub struct AppArgs {
    /// CSV dataset mapping emotions to moods and colors.
    #[arg(long, default_value = "mood_color_mapping.csv")]
    pub mapping: PathBuf,
    /// Number of recent detections used for majority-vote smoothing.
    #[arg(long, default_value_t = DEFAULT_WINDOW, value_parser = parse_window)]
    pub window: usize,
    /// Camera device index; the next index is tried if this one fails.
    #[arg(long, default_value_t = 0)]
    pub camera_index: u32,
    /// Haar cascade used for face detection.
    #[arg(long, default_value = "assets/models/haarcascade_frontalface_default.xml")]
    pub cascade: PathBuf,
    /// ONNX emotion classification model.
    #[arg(long, default_value = "assets/models/emotion.onnx")]
    pub model: PathBuf,
    /// Detections below this confidence are treated as no detection.
    #[arg(long, default_value_t = 0.0)]
    pub min_confidence: f32,
    /// Show the camera feed unmirrored.
    #[arg(long, default_value_t = false)]
    pub no_mirror: bool,
    /// Log file path.
    #[arg(long, default_value = "mood_light.log")]
    pub log_file: PathBuf,
}

fn parse_window(value: &str) -> Result<usize, String> {
    let window: usize = value
        .parse()
        .map_err(|_| format!("`{value}` is not a positive integer"))?;
    if window == 0 {
        return Err("window must be at least 1".to_string());
    }
    Ok(window)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = AppArgs::try_parse_from(["mood-light"]).unwrap();
        assert_eq!(args.mapping, PathBuf::from("mood_color_mapping.csv"));
        assert_eq!(args.window, 10);
        assert_eq!(args.camera_index, 0);
        assert_eq!(args.min_confidence, 0.0);
        assert!(!args.no_mirror);
    }

    #[test]
    fn overrides() {
        let args = AppArgs::try_parse_from([
            "mood-light",
            "--mapping",
            "moods.csv",
            "--window",
            "4",
            "--no-mirror",
        ])
        .unwrap();
        assert_eq!(args.mapping, PathBuf::from("moods.csv"));
        assert_eq!(args.window, 4);
        assert!(args.no_mirror);
    }

    #[test]
    fn zero_window_is_rejected() {
        assert!(AppArgs::try_parse_from(["mood-light", "--window", "0"]).is_err());
        assert!(AppArgs::try_parse_from(["mood-light", "--window", "ten"]).is_err());
    }
}
