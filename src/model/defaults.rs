use chrono::{Duration, NaiveDate};
use egui::Color32;

/// Colors handed out to new epics.
pub const EPIC_PALETTE: &[Color32] = &[
    Color32::from_rgb(79, 70, 229),  // indigo
    Color32::from_rgb(16, 185, 129), // emerald
    Color32::from_rgb(59, 130, 246), // blue
    Color32::from_rgb(139, 92, 246), // violet
    Color32::from_rgb(236, 72, 153), // pink
    Color32::from_rgb(245, 158, 11), // amber
    Color32::from_rgb(239, 68, 68),  // red
    Color32::from_rgb(6, 182, 212),  // cyan
];

/// Cosmetic defaults for newly created epics.
pub trait EpicDefaults: std::fmt::Debug {
    fn color(&mut self) -> Color32;

    /// Date range for an epic created directly at `anchor`.
    fn initial_range(&mut self, anchor: NaiveDate) -> (NaiveDate, NaiveDate);
}

/// Cycles through a fixed palette; ranges last a fixed number of days.
#[derive(Debug, Clone)]
pub struct PaletteDefaults {
    palette: Vec<Color32>,
    next: usize,
    duration_days: i64,
}

impl PaletteDefaults {
    pub fn new(duration_days: i64) -> Self {
        Self {
            palette: EPIC_PALETTE.to_vec(),
            next: 0,
            duration_days: duration_days.max(0),
        }
    }
}

impl Default for PaletteDefaults {
    fn default() -> Self {
        Self::new(14)
    }
}

impl EpicDefaults for PaletteDefaults {
    fn color(&mut self) -> Color32 {
        if self.palette.is_empty() {
            return Color32::from_rgb(59, 130, 246);
        }
        let color = self.palette[self.next % self.palette.len()];
        self.next = self.next.wrapping_add(1);
        color
    }

    fn initial_range(&mut self, anchor: NaiveDate) -> (NaiveDate, NaiveDate) {
        (anchor, anchor + Duration::days(self.duration_days))
    }
}
