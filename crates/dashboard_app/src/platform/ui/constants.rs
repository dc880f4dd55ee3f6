use std::time::Duration;

use eframe::egui::Color32;

pub const WINDOW_WIDTH: f32 = 1100.0;
pub const WINDOW_HEIGHT: f32 = 760.0;

/// Upper bound between frames; polling timers are checked on every frame.
pub const TICK_INTERVAL: Duration = Duration::from_millis(250);

pub const SUCCESS: Color32 = Color32::from_rgb(60, 170, 90);
pub const ERROR: Color32 = Color32::from_rgb(220, 80, 70);
pub const WARNING: Color32 = Color32::from_rgb(230, 170, 40);
pub const MUTED: Color32 = Color32::GRAY;

pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
