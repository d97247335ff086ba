use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Epic;

/// A named grouping of epics. Only used for display grouping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sprint {
    pub id: Uuid,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub epics: Vec<Epic>,
}

impl Sprint {
    pub fn new(name: impl Into<String>, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            start_date,
            end_date,
            epics: Vec::new(),
        }
    }

    pub fn epic(&self, id: Uuid) -> Option<&Epic> {
        self.epics.iter().find(|e| e.id == id)
    }

    pub fn epic_mut(&mut self, id: Uuid) -> Option<&mut Epic> {
        self.epics.iter_mut().find(|e| e.id == id)
    }
}
