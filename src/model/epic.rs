use chrono::NaiveDate;
use egui::Color32;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Result, TimelineError};

/// A schedulable, time-boxed work item drawn as a horizontal bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Epic {
    pub id: Uuid,
    /// May stay empty until the user names it.
    pub name: String,
    /// `None` until the epic has been positioned on the timeline.
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[serde(with = "color_serde")]
    pub color: Color32,
    /// Unplaced epics follow the pointer until their row is clicked.
    pub is_placed: bool,
}

impl Epic {
    /// Create an unplaced epic with no dates.
    pub fn new(name: impl Into<String>, color: Color32) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            start_date: None,
            end_date: None,
            color,
            is_placed: false,
        }
    }

    /// Create an epic already positioned on the timeline.
    pub fn placed(
        name: impl Into<String>,
        start: NaiveDate,
        end: NaiveDate,
        color: Color32,
    ) -> Self {
        Self {
            start_date: Some(start),
            end_date: Some(end),
            is_placed: true,
            ..Self::new(name, color)
        }
    }

    /// Both dates, when the epic has them.
    pub fn dates(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.start_date?, self.end_date?))
    }

    /// Apply the fields present in `patch`. Leaves the epic untouched and
    /// fails if the result would end before it starts.
    pub fn apply(&mut self, patch: &EpicPatch) -> Result<()> {
        let start = patch.start_date.or(self.start_date);
        let end = patch.end_date.or(self.end_date);
        if let (Some(start), Some(end)) = (start, end) {
            if start > end {
                return Err(TimelineError::InvertedRange { start, end });
            }
        }

        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        self.start_date = start;
        self.end_date = end;
        if let Some(color) = patch.color {
            self.color = color;
        }
        if let Some(is_placed) = patch.is_placed {
            self.is_placed = is_placed;
        }
        Ok(())
    }
}

/// A partial update. Absent fields are left as they are.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EpicPatch {
    pub name: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub color: Option<Color32>,
    pub is_placed: Option<bool>,
}

impl EpicPatch {
    pub fn dates(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start_date: Some(start),
            end_date: Some(end),
            ..Default::default()
        }
    }

    pub fn start(start: NaiveDate) -> Self {
        Self {
            start_date: Some(start),
            ..Default::default()
        }
    }

    pub fn end(end: NaiveDate) -> Self {
        Self {
            end_date: Some(end),
            ..Default::default()
        }
    }

    pub fn renamed(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn with_placed(mut self, is_placed: bool) -> Self {
        self.is_placed = Some(is_placed);
        self
    }
}

/// Serde helper for `Color32`.
mod color_serde {
    use egui::Color32;
    use serde::{self, Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(color: &Color32, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let rgba = [color.r(), color.g(), color.b(), color.a()];
        rgba.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Color32, D::Error>
    where
        D: Deserializer<'de>,
    {
        let rgba: [u8; 4] = Deserialize::deserialize(deserializer)?;
        Ok(Color32::from_rgba_premultiplied(
            rgba[0], rgba[1], rgba[2], rgba[3],
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn new_epic_is_unplaced() {
        let epic = Epic::new("", Color32::RED);
        assert!(!epic.is_placed);
        assert_eq!(epic.dates(), None);
    }

    #[test]
    fn patch_touches_only_present_fields() {
        let mut epic = Epic::placed("Search", d(2024, 3, 1), d(2024, 3, 15), Color32::RED);
        epic.apply(&EpicPatch::start(d(2024, 3, 5))).unwrap();
        assert_eq!(epic.dates(), Some((d(2024, 3, 5), d(2024, 3, 15))));
        assert_eq!(epic.name, "Search");

        epic.apply(&EpicPatch::renamed("Search v2")).unwrap();
        assert_eq!(epic.name, "Search v2");
        assert_eq!(epic.dates(), Some((d(2024, 3, 5), d(2024, 3, 15))));
    }

    #[test]
    fn inverting_patch_is_rejected() {
        let mut epic = Epic::placed("Search", d(2024, 3, 1), d(2024, 3, 15), Color32::RED);
        let err = epic.apply(&EpicPatch::start(d(2024, 3, 20))).unwrap_err();
        assert!(matches!(err, TimelineError::InvertedRange { .. }));
        assert_eq!(epic.dates(), Some((d(2024, 3, 1), d(2024, 3, 15))));
    }

    #[test]
    fn color_survives_json() {
        let epic = Epic::placed("Search", d(2024, 3, 1), d(2024, 3, 15), Color32::from_rgb(16, 185, 129));
        let json = serde_json::to_string(&epic).unwrap();
        let back: Epic = serde_json::from_str(&json).unwrap();
        assert_eq!(back, epic);
    }
}
