use serde::{Deserialize, Serialize};

/// The expense categories offered by the input surface.
///
/// The store persists the category as text, so a record may also carry a value outside this set.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "F&B - IN OFFICE")]
    FoodInOffice,
    #[serde(rename = "F&B - TOUR")]
    FoodOnTour,
    #[serde(rename = "UTILITY")]
    Utility,
    #[serde(rename = "MAINTENANCE")]
    Maintenance,
    #[serde(rename = "OFFICE ASSET")]
    OfficeAsset,
    #[serde(rename = "R&D - ELECTRONICS")]
    RdElectronics,
    #[serde(rename = "R&D - MECHANICAL")]
    RdMechanical,
    #[serde(rename = "PRODUCTION - ELECTRONICS")]
    ProductionElectronics,
    #[serde(rename = "PRODUCTION - MECHANICAL")]
    ProductionMechanical,
    #[serde(rename = "EMPLOYEE WELLBEING")]
    EmployeeWellbeing,
    #[serde(rename = "TRAVEL")]
    Travel,
    #[serde(rename = "STAY")]
    Stay,
    #[serde(rename = "MISC")]
    Misc,
}

serde_plain::derive_display_from_serialize!(Category);
serde_plain::derive_fromstr_from_deserialize!(Category);

impl Category {
    /// All categories in the order the input surface lists them.
    pub const ALL: [Category; 13] = [
        Category::FoodInOffice,
        Category::FoodOnTour,
        Category::Utility,
        Category::Maintenance,
        Category::OfficeAsset,
        Category::RdElectronics,
        Category::RdMechanical,
        Category::ProductionElectronics,
        Category::ProductionMechanical,
        Category::EmployeeWellbeing,
        Category::Travel,
        Category::Stay,
        Category::Misc,
    ];

    /// Returns true if `s` is exactly the text of one of the known categories.
    pub fn is_known(s: &str) -> bool {
        Category::ALL.iter().any(|c| c.to_string() == s)
    }
}

impl Default for Category {
    fn default() -> Self {
        Category::ALL[0]
    }
}

/// Settlement status of an expense.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Hash,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    #[default]
    #[value(name = "DONE", alias = "done")]
    Done,
    #[value(name = "PENDING", alias = "pending")]
    Pending,
}

serde_plain::derive_display_from_serialize!(Status);
serde_plain::derive_fromstr_from_deserialize!(Status);
