use eframe::egui;
use std::time::Duration;

/// Fixed tunables. Nothing here is persisted; every run starts from `Default`.
#[derive(Debug, Clone)]
pub struct Settings {
    pub title: &'static str,
    pub window_size: egui::Vec2,
    pub first_poll_delay: Duration,
    pub poll_interval: Duration,
    /// Probed on the search path in order at startup.
    pub candidates: &'static [&'static str],
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            title: "dump1090",
            window_size: egui::vec2(420.0, 420.0),
            first_poll_delay: Duration::from_millis(1500),
            poll_interval: Duration::from_millis(2000),
            candidates: &["dump1090", "dump1090-fa", "dump1090-mutability"],
        }
    }
}
