// UI module: camera feed with status overlay and the mood light panel

use crate::camera::FrameSource;
use crate::emotion::EmotionDetector;
use crate::models::{Bgr, Frame};
use crate::pipeline::MoodReading;
use crate::session::MoodSession;
use tracing::{error, info};

/// Side length of the mood light panel in points
const PANEL_SIZE: f32 = 300.0;

/// Converts display-order color to egui's RGB color
pub fn panel_color(color: Bgr) -> egui::Color32 {
    let rgb = color.to_rgb();
    egui::Color32::from_rgb(rgb.r, rgb.g, rgb.b)
}

/// Text lines painted on the panel: color name and mood, uppercased
pub fn panel_lines(reading: &MoodReading) -> (String, String) {
    (
        reading.color_name.to_uppercase(),
        format!("({})", reading.mood.to_uppercase()),
    )
}

/// Main application window; each repaint is one iteration of the capture loop
pub struct MoodLightApp<S, D> {
    session: MoodSession<S, D>,
    camera_texture: Option<egui::TextureHandle>,
    latest: Option<MoodReading>,
    finished: bool,
}

impl<S: FrameSource, D: EmotionDetector> MoodLightApp<S, D> {
    pub fn new(session: MoodSession<S, D>) -> Self {
        Self {
            session,
            camera_texture: None,
            latest: None,
            finished: false,
        }
    }

    /// Runs one session step and uploads the frame; a read failure ends the session
    fn advance(&mut self, ctx: &egui::Context) {
        match self.session.step() {
            Ok(outcome) => {
                self.update_camera_texture(ctx, &outcome.frame);
                self.latest = Some(outcome.reading);
            }
            Err(e) => {
                error!("Failed to read from camera: {}", e);
                self.finish(ctx);
            }
        }
    }

    fn update_camera_texture(&mut self, ctx: &egui::Context, frame: &Frame) {
        let expected = frame.width as usize * frame.height as usize * 3;
        if frame.data.len() != expected {
            return;
        }
        let color_image = egui::ColorImage::from_rgb(
            [frame.width as usize, frame.height as usize],
            &frame.data,
        );
        match &mut self.camera_texture {
            Some(texture) => texture.set(color_image, egui::TextureOptions::LINEAR),
            None => {
                self.camera_texture =
                    Some(ctx.load_texture("camera", color_image, egui::TextureOptions::LINEAR))
            }
        }
    }

    fn finish(&mut self, ctx: &egui::Context) {
        if self.finished {
            return;
        }
        self.finished = true;
        self.session.release();
        info!(
            "Session ended after {} frames",
            self.session.frames_processed()
        );
        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
    }

    /// Renders the camera feed with the mood panel in the top-right corner
    fn render(&self, ctx: &egui::Context) {
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                let available = ui.available_size();

                if let Some(texture) = &self.camera_texture {
                    let texture_size = texture.size_vec2();
                    let aspect_ratio = texture_size.x / texture_size.y;

                    // Fit while keeping aspect ratio
                    let mut width = available.x;
                    let mut height = width / aspect_ratio;
                    if height > available.y {
                        height = available.y;
                        width = height * aspect_ratio;
                    }
                    let offset = egui::pos2((available.x - width) / 2.0, (available.y - height) / 2.0);

                    ui.put(
                        egui::Rect::from_min_size(offset, egui::vec2(width, height)),
                        egui::Image::new(texture).fit_to_exact_size(egui::vec2(width, height)),
                    );
                }

                let Some(reading) = &self.latest else {
                    return;
                };
                let painter = ui.painter();

                painter.text(
                    egui::pos2(10.0, 30.0),
                    egui::Align2::LEFT_CENTER,
                    reading.status_line(),
                    egui::FontId::proportional(18.0),
                    egui::Color32::from_rgb(0, 255, 0),
                );

                let panel = egui::Rect::from_min_size(
                    egui::pos2(available.x - PANEL_SIZE - 30.0, 30.0),
                    egui::vec2(PANEL_SIZE, PANEL_SIZE),
                );
                painter.rect_filled(panel, 0.0, panel_color(reading.color));

                let (name, mood) = panel_lines(reading);
                painter.text(
                    panel.left_top() + egui::vec2(10.0, 160.0),
                    egui::Align2::LEFT_CENTER,
                    name,
                    egui::FontId::proportional(24.0),
                    egui::Color32::BLACK,
                );
                painter.text(
                    panel.left_top() + egui::vec2(10.0, 200.0),
                    egui::Align2::LEFT_CENTER,
                    mood,
                    egui::FontId::proportional(20.0),
                    egui::Color32::BLACK,
                );
            });
    }
}

impl<S: FrameSource, D: EmotionDetector> eframe::App for MoodLightApp<S, D> {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.finished {
            return;
        }
        if ctx.input(|i| i.key_pressed(egui::Key::Q)) {
            info!("Quit requested");
            self.finish(ctx);
            return;
        }

        self.advance(ctx);
        self.render(ctx);
        ctx.request_repaint();
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        if !self.finished {
            self.finished = true;
            self.session.release();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(color_name: &str, mood: &str) -> MoodReading {
        MoodReading {
            detected: None,
            confidence: 0.0,
            mood: mood.to_string(),
            color: Bgr::new(0, 220, 255),
            color_name: color_name.to_string(),
        }
    }

    #[test]
    fn panel_color_restores_rgb_order() {
        assert_eq!(
            panel_color(Bgr::new(0, 220, 255)),
            egui::Color32::from_rgb(255, 220, 0)
        );
    }

    #[test]
    fn panel_lines_are_uppercased() {
        let (name, mood) = panel_lines(&reading("Warm Yellow", "happy"));
        assert_eq!(name, "WARM YELLOW");
        assert_eq!(mood, "(HAPPY)");
    }
}
