use crate::wizard::ModuleStatus;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleProgress {
    pub module_id: String,
    pub answered: usize,
    pub total: usize,
    /// Whole percentage, 0 to 100.
    pub progress: u8,
    pub status: ModuleStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallProgress {
    /// Unweighted mean of the module percentages.
    pub progress: u8,
    pub modules: Vec<ModuleProgress>,
}
