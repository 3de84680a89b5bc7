use serde::{Deserialize, Serialize};

/// A hardware platform SKU, e.g. "xe9680-nvidia-h100".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Platform {
    /// SKU identifier. Case-sensitive.
    pub id: String,

    /// Display name.
    pub name: String,

    #[serde(default)]
    pub disabled: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,

    /// Accelerator type, e.g. "NVIDIA H100".
    #[serde(default, rename = "gputype", skip_serializing_if = "Option::is_none")]
    pub gpu_type: Option<String>,

    /// Per-GPU memory, e.g. "80GB".
    #[serde(default, rename = "gpuram", skip_serializing_if = "Option::is_none")]
    pub gpu_ram: Option<String>,

    #[serde(
        default,
        rename = "gpuinterconnect",
        skip_serializing_if = "Option::is_none"
    )]
    pub gpu_interconnect: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,

    #[serde(default, rename = "totalgpucount")]
    pub total_gpu_count: u32,

    // Upstream spells this key without the second "c".
    #[serde(
        default,
        rename = "interonnect_east_west",
        alias = "interconnect_east_west",
        skip_serializing_if = "Option::is_none"
    )]
    pub interconnect_east_west: Option<String>,

    #[serde(
        default,
        rename = "interconnect_north_south",
        skip_serializing_if = "Option::is_none"
    )]
    pub interconnect_north_south: Option<String>,
}
