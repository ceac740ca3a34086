//! Report rendering: classified rows → a self-describing spreadsheet grid.
//!
//! The row shape is one explicit ordered list of (label, accessor) pairs
//! shared by the header and the data-row renderers, so adding a column is a
//! single-site change checked at compile time rather than a runtime walk
//! over struct fields.

use chrono::Utc;
use chrono_tz::Tz;

use crate::classify::{CommunityStatusRow, TIMESTAMP_FORMAT};

type Accessor = fn(&CommunityStatusRow) -> String;

/// Label written right of the report grid, next to the generated-at value.
pub const GENERATED_AT_LABEL: &str = "Scraped at:";

fn columns() -> [(&'static str, Accessor); 10] {
    [
        ("Interest Group", |row: &CommunityStatusRow| {
            row.interest_group.clone()
        }),
        ("Community", |row: &CommunityStatusRow| row.community.clone()),
        ("Documents", |row: &CommunityStatusRow| {
            row.documents.to_string()
        }),
        ("Date", |row: &CommunityStatusRow| row.date.clone()),
        ("Reason", |row: &CommunityStatusRow| row.reason.clone()),
        ("Status", |row: &CommunityStatusRow| row.status.clone()),
        ("Publish", |row: &CommunityStatusRow| render_flag(row.publish)),
        ("topicModelAnalysis", |row: &CommunityStatusRow| {
            render_flag(row.topic_model_analysis)
        }),
        ("marketprofile", |row: &CommunityStatusRow| {
            render_flag(row.market_profile)
        }),
        ("psychData", |row: &CommunityStatusRow| {
            render_flag(row.psych_data)
        }),
    ]
}

// Spreadsheet boolean literal, so the cells stay filterable as booleans.
fn render_flag(flag: bool) -> String {
    if flag { "TRUE" } else { "FALSE" }.to_string()
}

/// Column labels, in grid order.
pub fn header() -> Vec<String> {
    columns().iter().map(|(label, _)| label.to_string()).collect()
}

/// Render the full grid: header first, then data rows sorted by interest
/// group descending and community ascending. The sort is stable, so ties
/// keep their original order.
pub fn build_report(rows: &[CommunityStatusRow]) -> Vec<Vec<String>> {
    let columns = columns();

    let mut ordered: Vec<&CommunityStatusRow> = rows.iter().collect();
    ordered.sort_by(|a, b| {
        b.interest_group
            .cmp(&a.interest_group)
            .then_with(|| a.community.cmp(&b.community))
    });

    let mut grid = Vec::with_capacity(ordered.len() + 1);
    grid.push(header());
    for row in ordered {
        grid.push(columns.iter().map(|(_, accessor)| accessor(row)).collect());
    }
    grid
}

/// Current time in the report's zone, for the generated-at stamp.
pub fn generated_at(timezone: Tz) -> String {
    Utc::now()
        .with_timezone(&timezone)
        .format(TIMESTAMP_FORMAT)
        .to_string()
}
