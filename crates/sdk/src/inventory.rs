//! Resource inventories returned by the API.
//!
//! Every member is optional on the wire; absent members decode to their
//! default.

use serde::{Deserialize, Serialize};

/// A VM network interface.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VmNicInventory {
    pub uuid: String,
    pub vm_instance_uuid: Option<String>,
    pub l3_network_uuid: Option<String>,
    pub used_ip_uuid: Option<String>,
    pub ip: Option<String>,
    pub mac: Option<String>,
    pub netmask: Option<String>,
    pub gateway: Option<String>,
    pub ip_version: Option<i32>,
    pub hypervisor_type: Option<String>,
    pub driver_type: Option<String>,
    #[serde(rename = "type")]
    pub nic_type: Option<String>,
    pub device_id: Option<i32>,
    pub create_date: Option<String>,
    pub last_op_date: Option<String>,
}

/// An elastic IP.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EipInventory {
    pub uuid: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub vm_nic_uuid: Option<String>,
    pub vip_uuid: Option<String>,
    pub vip_ip: Option<String>,
    pub guest_ip: Option<String>,
    pub state: Option<String>,
    pub create_date: Option<String>,
    pub last_op_date: Option<String>,
}

/// Fields shared by every primary storage flavour.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PrimaryStorageInventory {
    pub uuid: String,
    pub zone_uuid: Option<String>,
    pub name: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
    pub total_capacity: Option<i64>,
    pub available_capacity: Option<i64>,
    pub total_physical_capacity: Option<i64>,
    pub available_physical_capacity: Option<i64>,
    pub system_used_capacity: Option<i64>,
    #[serde(rename = "type")]
    pub storage_type: Option<String>,
    pub state: Option<String>,
    pub status: Option<String>,
    pub mount_path: Option<String>,
    pub attached_cluster_uuids: Option<Vec<String>>,
    pub create_date: Option<String>,
    pub last_op_date: Option<String>,
}

/// Primary storage backed by local disks with built-in replication.
///
/// The storage type name is kept as the server sends it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MiniStorageInventory {
    #[serde(flatten)]
    pub primary: PrimaryStorageInventory,
    pub mini_storage_type: Option<String>,
    pub disk_identifier: Option<String>,
}
