//! Prompt construction for security analysis and policy generation

use accessflow_common::models::{AccessEvent, Branch, BranchStatus};
use accessflow_common::time::one_year_after;
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::AnalysisError;

/// Newest log entries included in an analysis prompt
pub const RECENT_EVENT_LIMIT: usize = 20;

#[derive(Serialize)]
struct BranchStatusSummary<'a> {
    name: &'a str,
    status: BranchStatus,
}

/// Security briefing prompt over the newest log entries and branch status
///
/// `events` must be newest first (buffer order); only the first
/// [`RECENT_EVENT_LIMIT`] are embedded.
pub fn security_briefing(
    events: &[AccessEvent],
    branches: &[Branch],
) -> Result<String, AnalysisError> {
    let branch_summary: Vec<_> = branches
        .iter()
        .map(|b| BranchStatusSummary {
            name: &b.name,
            status: b.status,
        })
        .collect();
    let recent = &events[..events.len().min(RECENT_EVENT_LIMIT)];

    let branches_json = serde_json::to_string(&branch_summary).map_err(AnalysisError::Encode)?;
    let logs_json = serde_json::to_string(recent).map_err(AnalysisError::Encode)?;

    Ok(format!(
        "You are a security expert for a multi-branch facility management system.\n\
         Here is a summary of recent access logs and branch status.\n\
         \n\
         Branches: {branches_json}\n\
         Recent Logs: {logs_json}\n\
         \n\
         Please provide a short, actionable security briefing in Markdown format.\n\
         1. Identify any anomalies (e.g., denied access, repeated denials, tailgating, offline or maintenance branches).\n\
         2. Suggest exactly 1 immediate action for the administrator.\n\
         3. Keep it professional and concise (under 150 words).\n"
    ))
}

/// JSON access-policy prompt for a tenant and resource
///
/// The expiration date is computed here (one year after `now`) so the
/// model does not have to guess the current date.
pub fn access_policy(tenant_name: &str, resource: &str, now: DateTime<Utc>) -> String {
    let expiration = one_year_after(now);
    format!(
        "Generate a formal JSON access policy object for a new tenant \"{tenant_name}\" accessing \"{resource}\".\n\
         The policy should include:\n\
         - schedule (standard business hours)\n\
         - allowedMethods (face, app, pin)\n\
         - expirationDate ({expiration}, 1 year from now)\n\
         \n\
         Return ONLY raw JSON.\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use accessflow_common::fixtures;
    use chrono::TimeZone;

    #[test]
    fn test_briefing_embeds_denied_event_and_maintenance_branch() {
        let mut events = fixtures::seed_access_log();
        events.reverse();

        let prompt = security_briefing(&events, &fixtures::branches()).unwrap();

        assert!(prompt.contains(r#""event":"Denied""#));
        assert!(prompt.contains("Warehouse Gate A"));
        assert!(prompt.contains(r#"{"name":"Harbor Warehouse","status":"Maintenance"}"#));
        assert!(prompt.contains("under 150 words"));
        assert!(prompt.contains("1 immediate action"));
    }

    #[test]
    fn test_briefing_limits_to_twenty_newest() {
        let template = fixtures::seed_access_log().remove(0);
        let events: Vec<_> = (0..30)
            .rev()
            .map(|i| AccessEvent {
                id: format!("evt-{:02}", i),
                ..template.clone()
            })
            .collect();

        let prompt = security_briefing(&events, &[]).unwrap();

        assert!(prompt.contains("evt-29"));
        assert!(prompt.contains("evt-10"));
        assert!(!prompt.contains("evt-09"));
    }

    #[test]
    fn test_briefing_branches_carry_only_name_and_status() {
        let prompt = security_briefing(&[], &fixtures::branches()).unwrap();
        assert!(!prompt.contains("New York, NY"));
        assert!(prompt.contains("Recent Logs: []"));
    }

    #[test]
    fn test_policy_prompt_includes_expiration() {
        let now = Utc.with_ymd_and_hms(2026, 10, 17, 12, 0, 0).unwrap();
        let prompt = access_policy("TechCorp Solutions", "Office 302", now);

        assert!(prompt.contains("\"TechCorp Solutions\""));
        assert!(prompt.contains("\"Office 302\""));
        assert!(prompt.contains("2027-10-17"));
        assert!(prompt.contains("allowedMethods (face, app, pin)"));
    }
}
