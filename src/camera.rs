// Camera module for webcam capture

use crate::error::{MoodLightError, Result};
use crate::models::Frame;
use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{CameraIndex, RequestedFormat, RequestedFormatType};
use nokhwa::Camera;
use tracing::{error, info};

/// Anything that hands out frames on demand
pub trait FrameSource {
    /// Blocks until the next frame is available. An error ends the session.
    fn read_frame(&mut self) -> Result<Frame>;

    /// Releases the underlying device
    fn release(&mut self) {}
}

/// Owns the webcam stream for the lifetime of a session
pub struct CameraManager {
    camera: Camera,
    is_streaming: bool,
}

impl CameraManager {
    /// Opens the camera at `index` (falling back to `index + 1`) and starts
    /// streaming.
    pub fn open(index: u32) -> Result<Self> {
        // 640x480 at 30 FPS is plenty for face detection
        let requested_format = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(
            nokhwa::utils::CameraFormat::new(
                nokhwa::utils::Resolution::new(640, 480),
                nokhwa::utils::FrameFormat::YUYV,
                30,
            ),
        ));

        let camera = Self::open_first(&candidate_indices(index), requested_format)
            .map_err(|e| {
                error!("Could not open webcam: {}", e);
                MoodLightError::CaptureUnavailable(format!(
                    "Could not open camera {index}. Make sure a camera is connected, \
                     no other app is using it and camera permissions are granted. Error: {e}"
                ))
            })?;

        let mut manager = Self {
            camera,
            is_streaming: false,
        };
        manager.start_stream()?;
        info!("Camera opened: {}", manager.camera_info());
        Ok(manager)
    }

    /// Returns the first camera that opens, or the last error
    fn open_first(indices: &[u32], requested_format: RequestedFormat) -> Result<Camera> {
        let mut last_err =
            MoodLightError::CaptureUnavailable("no camera index to try".to_string());
        for &candidate in indices {
            match Self::try_open_camera(candidate, requested_format) {
                Ok(camera) => return Ok(camera),
                Err(e) => last_err = e,
            }
        }
        Err(last_err)
    }

    fn try_open_camera(index: u32, requested_format: RequestedFormat) -> Result<Camera> {
        Camera::new(CameraIndex::Index(index), requested_format).map_err(MoodLightError::from)
    }

    /// Starts the stream and checks that it actually delivers a frame
    fn start_stream(&mut self) -> Result<()> {
        self.camera.open_stream()?;
        self.is_streaming = true;

        // Give the device a moment before the first read
        std::thread::sleep(std::time::Duration::from_millis(200));

        self.camera.frame().map(|_| ()).map_err(|e| {
            error!("Camera stream not working: {}", e);
            MoodLightError::CaptureUnavailable(format!(
                "Camera stream not working: {e}. Make sure camera permissions are granted."
            ))
        })
    }

    /// Lists available camera devices
    pub fn list_devices() -> Result<Vec<String>> {
        let devices = nokhwa::query(nokhwa::utils::ApiBackend::Auto).map_err(|e| {
            MoodLightError::CaptureUnavailable(format!("Failed to query cameras: {e}"))
        })?;

        Ok(devices
            .iter()
            .map(|info| info.human_name().to_string())
            .collect())
    }

    /// Returns the current camera resolution
    pub fn resolution(&self) -> (u32, u32) {
        let res = self.camera.resolution();
        (res.width(), res.height())
    }

    /// Returns the camera's human readable name
    pub fn camera_info(&self) -> String {
        self.camera.info().human_name().to_string()
    }

    /// Stops the stream; safe to call more than once
    pub fn stop_stream(&mut self) {
        if !self.is_streaming {
            return;
        }
        self.is_streaming = false;

        if let Err(e) = self.camera.stop_stream() {
            error!("Error stopping camera stream: {}", e);
        } else {
            info!("Camera released");
        }
    }
}

impl FrameSource for CameraManager {
    fn read_frame(&mut self) -> Result<Frame> {
        let frame_data = self
            .camera
            .frame()
            .map_err(|e| MoodLightError::FrameRead(e.to_string()))?;

        let buffer = frame_data
            .decode_image::<RgbFormat>()
            .map_err(|e| MoodLightError::FrameRead(format!("Failed to decode frame: {e}")))?;

        let (width, height) = (buffer.width(), buffer.height());
        Ok(Frame::new(buffer.into_raw(), width, height))
    }

    fn release(&mut self) {
        self.stop_stream();
    }
}

impl Drop for CameraManager {
    fn drop(&mut self) {
        self.stop_stream();
    }
}

/// Device indices to try for `index`: the index itself, then the next one.
/// Some systems start device numbering at 1.
fn candidate_indices(index: u32) -> Vec<u32> {
    std::iter::once(index).chain(index.checked_add(1)).collect()
}
