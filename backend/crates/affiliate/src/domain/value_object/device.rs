use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Device {
    Desktop,
    Mobile,
    Tablet,
}

impl Device {
    /// Targeting used when a campaign does not specify devices
    pub fn default_targeting() -> Vec<Device> {
        vec![Device::Desktop, Device::Mobile]
    }
}
