//! Reference data loaded once at startup
//!
//! There is no persistence layer; the hub serves these records read-only for
//! the lifetime of the process.

use chrono::{TimeZone, Utc};

use crate::models::{
    AccessEvent, AccessOutcome, AuthMethod, Branch, BranchStatus, Device, DeviceStatus,
    DeviceType, Tenant, TenantStatus, User, UserRole,
};

fn branch(
    id: &str,
    name: &str,
    location: &str,
    tenant_count: u32,
    device_count: u32,
    status: BranchStatus,
) -> Branch {
    Branch {
        id: id.to_string(),
        name: name.to_string(),
        location: location.to_string(),
        tenant_count,
        device_count,
        status,
    }
}

/// All branches
pub fn branches() -> Vec<Branch> {
    vec![
        branch("b1", "Downtown HQ", "New York, NY", 12, 45, BranchStatus::Operational),
        branch("b2", "Westside Logistics", "Jersey City, NJ", 4, 18, BranchStatus::Operational),
        branch("b3", "Tech Park Alpha", "Austin, TX", 25, 60, BranchStatus::Operational),
        branch("b4", "Harbor Warehouse", "Oakland, CA", 2, 10, BranchStatus::Maintenance),
        branch("b5", "Executive Suites", "Miami, FL", 8, 32, BranchStatus::Operational),
    ]
}

/// All registered devices
pub fn devices() -> Vec<Device> {
    let device = |id: &str,
                  name: &str,
                  device_type: DeviceType,
                  branch_id: &str,
                  status: DeviceStatus,
                  last_sync: &str| Device {
        id: id.to_string(),
        name: name.to_string(),
        device_type,
        branch_id: branch_id.to_string(),
        ip: None,
        mac: None,
        status,
        last_sync: last_sync.to_string(),
        battery_level: None,
    };

    vec![
        Device {
            ip: Some("192.168.1.101".to_string()),
            ..device("d1", "Main Entrance", DeviceType::ZktecoFace, "b1", DeviceStatus::Online, "2 mins ago")
        },
        Device {
            ip: Some("10.0.0.45".to_string()),
            ..device("d2", "Warehouse Gate A", DeviceType::ZktecoGate, "b2", DeviceStatus::Online, "5 mins ago")
        },
        Device {
            battery_level: Some(85),
            ..device("d3", "Office 302", DeviceType::TtlockDoor, "b1", DeviceStatus::Online, "1 hour ago")
        },
        Device {
            ip: Some("192.168.2.50".to_string()),
            ..device("d4", "Meeting Room B", DeviceType::ZktecoFace, "b3", DeviceStatus::Offline, "2 days ago")
        },
        Device {
            ip: Some("192.168.1.200".to_string()),
            ..device("d5", "Parking Entry", DeviceType::ZktecoGate, "b1", DeviceStatus::Online, "1 min ago")
        },
    ]
}

/// Known users
pub fn users() -> Vec<User> {
    vec![
        User {
            id: "u1".to_string(),
            name: "John Doe".to_string(),
            role: UserRole::Tenant,
            email: "john@techcorp.com".to_string(),
            face_enrolled: true,
            pin_assigned: true,
            access_groups: vec!["General".to_string(), "Office 302".to_string()],
            photo_url: Some("https://picsum.photos/id/1005/200/200".to_string()),
        },
        User {
            id: "u2".to_string(),
            name: "Sarah Connor".to_string(),
            role: UserRole::Admin,
            email: "admin@accessflow.com".to_string(),
            face_enrolled: true,
            pin_assigned: true,
            access_groups: vec!["All Access".to_string()],
            photo_url: Some("https://picsum.photos/id/1011/200/200".to_string()),
        },
        User {
            id: "u3".to_string(),
            name: "Mike Ross".to_string(),
            role: UserRole::Visitor,
            email: "mike@legal.com".to_string(),
            face_enrolled: false,
            pin_assigned: true,
            access_groups: vec!["Meeting Room B".to_string()],
            photo_url: Some("https://picsum.photos/id/1025/200/200".to_string()),
        },
    ]
}

/// Tenants with active leases
pub fn tenants() -> Vec<Tenant> {
    let units = |names: &[&str]| names.iter().map(|n| n.to_string()).collect::<Vec<_>>();

    vec![
        Tenant {
            id: "t1".to_string(),
            company_name: "TechCorp Solutions".to_string(),
            branch_id: "b1".to_string(),
            rented_units: units(&["Office 301", "Office 302", "Parking A1-A5"]),
            active_contracts: 3,
            status: TenantStatus::Active,
        },
        Tenant {
            id: "t2".to_string(),
            company_name: "Global Logistics".to_string(),
            branch_id: "b2".to_string(),
            rented_units: units(&["Warehouse A", "Warehouse B"]),
            active_contracts: 2,
            status: TenantStatus::Active,
        },
        Tenant {
            id: "t3".to_string(),
            company_name: "Creative Studio".to_string(),
            branch_id: "b3".to_string(),
            rented_units: units(&["Studio 5"]),
            active_contracts: 1,
            status: TenantStatus::Overdue,
        },
    ]
}

/// Historical access log, oldest first
pub fn seed_access_log() -> Vec<AccessEvent> {
    #[allow(clippy::too_many_arguments)]
    fn entry(
        id: &str,
        (h, m, s): (u32, u32, u32),
        user_id: &str,
        user_name: &str,
        device_id: &str,
        device_name: &str,
        branch_id: &str,
        event: AccessOutcome,
        method: AuthMethod,
    ) -> AccessEvent {
        AccessEvent {
            id: id.to_string(),
            timestamp: Utc
                .with_ymd_and_hms(2023, 10, 27, h, m, s)
                .single()
                .unwrap_or_default(),
            user_id: user_id.to_string(),
            user_name: user_name.to_string(),
            device_id: device_id.to_string(),
            device_name: device_name.to_string(),
            branch_id: branch_id.to_string(),
            event,
            method,
            image_url: None,
        }
    }

    use AccessOutcome::{Denied, Granted};
    vec![
        entry("l1", (8, 30, 0), "u1", "John Doe", "d1", "Main Entrance", "b1", Granted, AuthMethod::Face),
        entry("l2", (8, 35, 12), "u3", "Mike Ross", "d5", "Parking Entry", "b1", Granted, AuthMethod::Qr),
        entry("l3", (9, 1, 0), "u1", "John Doe", "d3", "Office 302", "b1", Granted, AuthMethod::App),
        entry("l4", (10, 15, 22), "unknown", "Unknown", "d2", "Warehouse Gate A", "b2", Denied, AuthMethod::Face),
        entry("l5", (11, 0, 0), "u2", "Sarah Connor", "d1", "Main Entrance", "b1", Granted, AuthMethod::Face),
    ]
}
