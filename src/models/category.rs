//! Travel-data categories

use serde::{Deserialize, Serialize};
use std::fmt;

/// One independent travel-data dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Flights,
    Hotels,
    Attractions,
}

impl Category {
    /// Lower-case name used in logs and rendered text
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Flights => "flights",
            Category::Hotels => "hotels",
            Category::Attractions => "attractions",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
