// Emotion detection: Haar cascade face finder + ONNX emotion classifier

use crate::error::{MoodLightError, Result};
use crate::models::{EmotionResult, Frame};
use opencv::core::{Mat, Rect, Size, Vector};
use opencv::imgproc;
use opencv::objdetect::CascadeClassifier;
use opencv::prelude::*;
use ort::session::Session;
use ort::value::Value;
use std::path::Path;
use tracing::{debug, error, info};

/// Side length of the square classifier input
const INPUT_SIZE: usize = 260;

/// Labels reported by the classifier, indexed by model output class.
/// The model's eighth class (contempt) is folded into `disgust`.
const CLASS_LABELS: [&str; 8] = [
    "angry", "disgust", "fear", "happy", "sad", "surprise", "neutral", "disgust",
];

/// Anything that can name the dominant emotion in a frame
pub trait EmotionDetector {
    /// Returns the top emotion, or `None` when no face is found.
    fn top_emotion(&mut self, frame: &Frame) -> Result<Option<EmotionResult>>;
}

/// Face detector using OpenCV Haar Cascade
pub struct FaceDetector {
    classifier: CascadeClassifier,
}

impl FaceDetector {
    /// Loads the Haar Cascade classifier from `cascade_path`
    pub fn new(cascade_path: &Path) -> Result<Self> {
        let path = cascade_path.to_string_lossy();
        let classifier = CascadeClassifier::new(&path).map_err(|e| {
            error!("Failed to load Haar Cascade: {}", e);
            MoodLightError::ModelLoad(format!("Haar Cascade load failed: {e}"))
        })?;

        if classifier.empty()? {
            return Err(MoodLightError::ModelLoad(format!(
                "Haar Cascade classifier at {path} is empty"
            )));
        }

        Ok(Self { classifier })
    }

    /// Finds the largest face in the RGB image
    pub fn largest_face(&mut self, rgb: &Mat) -> Result<Option<Rect>> {
        let mut gray = Mat::default();
        imgproc::cvt_color(
            rgb,
            &mut gray,
            imgproc::COLOR_RGB2GRAY,
            0,
            opencv::core::AlgorithmHint::ALGO_HINT_DEFAULT,
        )
        .map_err(|e| MoodLightError::FaceDetection(format!("Failed to convert to grayscale: {e}")))?;

        let mut faces = Vector::<Rect>::new();
        self.classifier
            .detect_multi_scale(
                &gray,
                &mut faces,
                1.1,
                5,
                0,
                Size::new(40, 40),
                Size::new(0, 0),
            )
            .map_err(|e| MoodLightError::FaceDetection(format!("Face detection failed: {e}")))?;

        Ok(faces.iter().max_by_key(|face| face.width * face.height))
    }
}

/// Wraps raw RGB bytes as an owned 3-channel OpenCV Mat
fn frame_to_mat(frame: &Frame) -> Result<Mat> {
    let flat = Mat::from_slice(&frame.data)
        .map_err(|e| MoodLightError::FrameProcessing(format!("Failed to create Mat: {e}")))?;
    let shaped = flat
        .reshape(3, frame.height as i32)
        .map_err(|e| MoodLightError::FrameProcessing(format!("Failed to reshape Mat: {e}")))?;
    shaped
        .try_clone()
        .map_err(|e| MoodLightError::FrameProcessing(format!("Failed to copy Mat: {e}")))
}

/// Crops the face, resizes it to the model input and scales to [0, 1].
/// Output is HWC ordered RGB.
fn preprocess_face(rgb: &Mat, face: Rect) -> Result<Vec<f32>> {
    let roi = Mat::roi(rgb, face)
        .map_err(|e| MoodLightError::FrameProcessing(format!("Failed to crop face: {e}")))?;
    let cropped = roi
        .try_clone()
        .map_err(|e| MoodLightError::FrameProcessing(format!("Failed to clone face ROI: {e}")))?;

    let mut resized = Mat::default();
    imgproc::resize(
        &cropped,
        &mut resized,
        Size::new(INPUT_SIZE as i32, INPUT_SIZE as i32),
        0.0,
        0.0,
        imgproc::INTER_LINEAR,
    )
    .map_err(|e| MoodLightError::FrameProcessing(format!("Failed to resize face: {e}")))?;

    let data = resized.data_bytes().map_err(|e| {
        MoodLightError::FrameProcessing(format!("Failed to get resized data: {e}"))
    })?;

    Ok(data.iter().map(|&pixel| pixel as f32 / 255.0).collect())
}

/// Reorders an interleaved HWC buffer into planar CHW
fn hwc_to_chw(hwc: &[f32], height: usize, width: usize, channels: usize) -> Vec<f32> {
    let mut chw = vec![0.0f32; channels * height * width];
    for h in 0..height {
        for w in 0..width {
            for c in 0..channels {
                chw[c * height * width + h * width + w] = hwc[(h * width + w) * channels + c];
            }
        }
    }
    chw
}

/// Numerically stable softmax
fn softmax(logits: &[f32]) -> Vec<f32> {
    let max_logit = logits.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
    let exp: Vec<f32> = logits.iter().map(|&x| (x - max_logit).exp()).collect();
    let sum: f32 = exp.iter().sum();
    exp.into_iter().map(|x| x / sum).collect()
}

/// Index and probability of the most likely class
fn top_class(probabilities: &[f32]) -> Option<(usize, f32)> {
    probabilities
        .iter()
        .copied()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
}

/// Label for a model output index; unknown indices map to `neutral`
fn label_for_class(index: usize) -> &'static str {
    CLASS_LABELS.get(index).copied().unwrap_or("neutral")
}

/// Emotion classifier using ONNX Runtime
pub struct EmotionClassifier {
    session: Session,
}

impl EmotionClassifier {
    /// Loads the ONNX model from `model_path`
    pub fn new(model_path: &Path) -> Result<Self> {
        let session = Session::builder()
            .map_err(|e| {
                MoodLightError::ModelLoad(format!("Failed to create session builder: {e}"))
            })?
            .commit_from_file(model_path)
            .map_err(|e| {
                error!("Failed to load ONNX model: {}", e);
                MoodLightError::ModelLoad(format!("ONNX model load failed: {e}"))
            })?;

        Ok(Self { session })
    }

    /// Classifies a preprocessed HWC face; returns (label, probability)
    pub fn classify(&mut self, face_hwc: &[f32]) -> Result<(&'static str, f32)> {
        let chw = hwc_to_chw(face_hwc, INPUT_SIZE, INPUT_SIZE, 3);
        let input = ndarray::Array4::from_shape_vec((1, 3, INPUT_SIZE, INPUT_SIZE), chw)
            .map_err(|e| MoodLightError::OnnxRuntime(format!("Failed to create input array: {e}")))?;
        let input_tensor = Value::from_array(input)?;

        let outputs = self.session.run(ort::inputs![input_tensor])?;
        let (_, output) = outputs
            .iter()
            .next()
            .ok_or_else(|| MoodLightError::OnnxRuntime("No output from model".to_string()))?;
        let (_, logits) = output.try_extract_tensor::<f32>()?;

        let probabilities = softmax(logits);
        let (index, probability) = top_class(&probabilities)
            .ok_or_else(|| MoodLightError::OnnxRuntime("No probabilities in output".to_string()))?;

        Ok((label_for_class(index), probability))
    }
}

/// Face detection followed by classification of the largest face
pub struct EmotionAnalyzer {
    face_detector: FaceDetector,
    classifier: EmotionClassifier,
    min_confidence: f32,
}

impl EmotionAnalyzer {
    pub fn new(cascade_path: &Path, model_path: &Path, min_confidence: f32) -> Result<Self> {
        let face_detector = FaceDetector::new(cascade_path)?;
        let classifier = EmotionClassifier::new(model_path)?;
        info!("Emotion models loaded");

        Ok(Self {
            face_detector,
            classifier,
            min_confidence,
        })
    }
}

impl EmotionDetector for EmotionAnalyzer {
    fn top_emotion(&mut self, frame: &Frame) -> Result<Option<EmotionResult>> {
        let rgb = frame_to_mat(frame)?;
        let Some(face) = self.face_detector.largest_face(&rgb)? else {
            return Ok(None);
        };

        let preprocessed = preprocess_face(&rgb, face)?;
        let (label, confidence) = self.classifier.classify(&preprocessed)?;

        if confidence < self.min_confidence {
            debug!("Dropping {} at {:.2} (below threshold)", label, confidence);
            return Ok(None);
        }

        Ok(Some(EmotionResult::new(label, confidence)))
    }
}
