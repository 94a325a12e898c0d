// Library exports for Mood Light - webcam mood panel

pub mod camera;
pub mod color;
pub mod config;
pub mod emotion;
pub mod error;
pub mod models;
pub mod mood_table;
pub mod pipeline;
pub mod session;
pub mod smoother;
pub mod ui;
