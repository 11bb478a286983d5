use vista_core::models::report::ReportRecord;

/// Id of the illustrative record inserted into an empty store.
pub const SAMPLE_REPORT_ID: &str = "report1";

/// The record a fresh installation starts with.
pub fn sample_report() -> ReportRecord {
    ReportRecord {
        id: SAMPLE_REPORT_ID.to_string(),
        name: "Sales Performance Dashboard".to_string(),
        description: "Monthly sales performance metrics and KPIs".to_string(),
        category: "Sales".to_string(),
        client_id: "12345678-1234-1234-1234-123456789012".to_string(),
        report_id: "abcd1234-5678-90ef-ghij-klmnopqrstuv".to_string(),
        embed_url: "https://app.powerbi.com/reportEmbed?reportId=abcd1234-5678-90ef-ghij-klmnopqrstuv&groupId=me".to_string(),
        tenant_id: "87654321-4321-4321-4321-210987654321".to_string(),
        embed_token: String::new(),
        core_dataset_id: "1b112bf5-8e80-40a4-9c24-ff80458a1759".to_string(),
        report_dataset_id: "041e5091-1c88-49f0-b825-cf6b91f84a60".to_string(),
        allow_export: true,
        allow_print: true,
        access_users: vec!["user1".to_string(), "user2".to_string()],
        is_active: true,
        last_updated: "2024-06-26 10:30 AM".to_string(),
    }
}
