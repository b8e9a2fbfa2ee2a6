//! Domain models shared across AccessFlow services
//!
//! Field names serialize as camelCase so payloads line up with the dashboard
//! front end. Enum variants serialize as their display labels.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Operational status of a branch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BranchStatus {
    Operational,
    Maintenance,
}

/// A physical facility location hosting devices and tenants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    pub id: String,
    pub name: String,
    pub location: String,
    pub tenant_count: u32,
    pub device_count: u32,
    pub status: BranchStatus,
}

/// Hardware family of an access-control endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceType {
    #[serde(rename = "ZKTeco FaceDepot")]
    ZktecoFace,
    #[serde(rename = "ZKTeco Parking Gate")]
    ZktecoGate,
    #[serde(rename = "TTLock Smart Lock")]
    TtlockDoor,
    #[serde(rename = "ZKTeco Atlas Panel")]
    ZktecoController,
}

/// Connectivity status reported for a device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceStatus {
    Online,
    Offline,
    Syncing,
    Error,
}

/// A physical access-control endpoint (face reader, smart lock, gate)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub device_type: DeviceType,
    pub branch_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mac: Option<String>,
    pub status: DeviceStatus,
    /// Human-readable sync age ("2 mins ago")
    pub last_sync: String,
    /// Battery percentage, TTLock devices only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub battery_level: Option<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserRole {
    Admin,
    Tenant,
    Visitor,
    Employee,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub role: UserRole,
    pub email: String,
    pub face_enrolled: bool,
    pub pin_assigned: bool,
    pub access_groups: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TenantStatus {
    Active,
    Overdue,
}

/// An organization renting units within a branch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    pub id: String,
    pub company_name: String,
    pub branch_id: String,
    /// e.g. "Office 101", "Warehouse B"
    pub rented_units: Vec<String>,
    pub active_contracts: u32,
    pub status: TenantStatus,
}

/// Decision recorded for an access attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccessOutcome {
    Granted,
    Denied,
    Tailgating,
    #[serde(rename = "Forced Open")]
    ForcedOpen,
}

impl AccessOutcome {
    /// Outcomes that count as security alerts on the dashboard
    pub fn is_alert(self) -> bool {
        !matches!(self, AccessOutcome::Granted)
    }
}

/// Credential presented at the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthMethod {
    Face,
    Card,
    #[serde(rename = "PIN")]
    Pin,
    App,
    #[serde(rename = "QR")]
    Qr,
}

/// One grant/deny decision at a device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessEvent {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub user_id: String,
    pub user_name: String,
    pub device_id: String,
    pub device_name: String,
    pub branch_id: String,
    pub event: AccessOutcome,
    pub method: AuthMethod,
    /// Device snapshot reference (ZKTeco)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_access_event_serializes_camel_case_with_labels() {
        let event = AccessEvent {
            id: "l4".to_string(),
            timestamp: Utc.with_ymd_and_hms(2023, 10, 27, 10, 15, 22).unwrap(),
            user_id: "unknown".to_string(),
            user_name: "Unknown".to_string(),
            device_id: "d2".to_string(),
            device_name: "Warehouse Gate A".to_string(),
            branch_id: "b2".to_string(),
            event: AccessOutcome::ForcedOpen,
            method: AuthMethod::Qr,
            image_url: None,
        };

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["userName"], "Unknown");
        assert_eq!(json["deviceName"], "Warehouse Gate A");
        assert_eq!(json["event"], "Forced Open");
        assert_eq!(json["method"], "QR");
        assert!(json.get("imageUrl").is_none());
    }

    #[test]
    fn test_device_type_labels() {
        let json = serde_json::to_string(&DeviceType::TtlockDoor).unwrap();
        assert_eq!(json, "\"TTLock Smart Lock\"");
    }

    #[test]
    fn test_alert_outcomes() {
        assert!(!AccessOutcome::Granted.is_alert());
        assert!(AccessOutcome::Denied.is_alert());
        assert!(AccessOutcome::Tailgating.is_alert());
        assert!(AccessOutcome::ForcedOpen.is_alert());
    }
}
