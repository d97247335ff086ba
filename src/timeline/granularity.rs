use serde::{Deserialize, Serialize};

/// Calendar zoom level. Decides what one time column stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Granularity {
    Weeks,
    #[default]
    Months,
    Quarters,
}

impl Granularity {
    pub const ALL: [Granularity; 3] = [Self::Weeks, Self::Months, Self::Quarters];

    pub fn label(self) -> &'static str {
        match self {
            Self::Weeks => "Weeks",
            Self::Months => "Months",
            Self::Quarters => "Quarters",
        }
    }
}
