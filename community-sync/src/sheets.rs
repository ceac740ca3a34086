//! `SheetGateway` implementation over the Google Sheets values API.
//!
//! Reads the community column from the source-of-truth tab, and writes the
//! rendered report to the report tab: clear first, then one rectangular
//! update, then the generated-at stamp in the two cells right of the header
//! row. Authorization is a bearer token from the environment; the full OAuth
//! dance lives outside this process.

use std::collections::HashSet;
use std::env;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;

use community_sync_core::contract::{SheetGateway, SourceError};
use community_sync_core::report::GENERATED_AT_LABEL;

use crate::error::{ensure_success, ApiError, Result};
use crate::load_config::SheetSection;

const BASE_URL: &str = "https://sheets.googleapis.com/v4";

pub struct SheetClient {
    client: reqwest::Client,
    config: SheetSection,
    token: String,
}

impl SheetClient {
    pub fn new_from_env(config: &SheetSection) -> Result<Self> {
        let token = env::var("GOOGLE_SHEETS_TOKEN").map_err(|e| {
            tracing::error!(error = ?e, "GOOGLE_SHEETS_TOKEN missing in environment");
            ApiError::MissingEnv("GOOGLE_SHEETS_TOKEN")
        })?;
        tracing::info!(
            spreadsheet_id = %config.spreadsheet_id,
            "Initialized SheetClient from environment"
        );
        Ok(SheetClient {
            client: reqwest::Client::new(),
            config: config.clone(),
            token,
        })
    }

    fn values_url(&self, range: &str) -> String {
        format!(
            "{}/spreadsheets/{}/values/{}",
            BASE_URL, self.config.spreadsheet_id, range
        )
    }

    async fn read_impl(&self) -> Result<Vec<String>> {
        let range = quoted_range(&self.config.communities_tab, "A:A");
        let response = self
            .client
            .get(self.values_url(&range))
            .query(&[("majorDimension", "COLUMNS")])
            .bearer_auth(&self.token)
            .send()
            .await?;
        let response = ensure_success(response).await?;

        let payload: ValueRange = response.json().await?;
        let column = payload.values.into_iter().next().unwrap_or_default();

        // Skip the column's own header, drop blanks, dedupe keeping
        // first-seen order.
        let mut seen = HashSet::new();
        let communities: Vec<String> = column
            .into_iter()
            .skip(1)
            .filter(|cell| !cell.is_empty())
            .filter(|cell| seen.insert(cell.clone()))
            .collect();
        tracing::info!(count = communities.len(), "Read community column from sheet");
        Ok(communities)
    }

    async fn write_impl(&self, grid: &[Vec<String>], generated_at: &str) -> Result<()> {
        let columns = grid.first().map(|row| row.len()).unwrap_or(0);
        if columns == 0 {
            return Err(ApiError::Malformed("report grid has no header row".into()));
        }

        // Clear the whole tab so stale rows below the new grid cannot
        // survive.
        let clear_url = format!(
            "{}:clear",
            self.values_url(&quoted_range(&self.config.report_tab, ""))
        );
        let response = self
            .client
            .post(&clear_url)
            .bearer_auth(&self.token)
            .json(&json!({}))
            .send()
            .await?;
        ensure_success(response).await?;

        let grid_range = quoted_range(
            &self.config.report_tab,
            &format!("A1:{}{}", column_letter(columns)?, grid.len()),
        );
        self.update_values(&grid_range, grid.to_vec()).await?;

        let stamp_range = quoted_range(
            &self.config.report_tab,
            &format!(
                "{}1:{}1",
                column_letter(columns + 1)?,
                column_letter(columns + 2)?
            ),
        );
        self.update_values(
            &stamp_range,
            vec![vec![
                GENERATED_AT_LABEL.to_string(),
                generated_at.to_string(),
            ]],
        )
        .await?;

        tracing::info!(
            rows = grid.len(),
            columns,
            generated_at,
            "Report written to sheet"
        );
        Ok(())
    }

    async fn update_values(&self, range: &str, values: Vec<Vec<String>>) -> Result<()> {
        let body = ValueRange { values };
        let response = self
            .client
            .put(self.values_url(range))
            .query(&[("valueInputOption", "USER_ENTERED")])
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }
}

#[async_trait]
impl SheetGateway for SheetClient {
    async fn read_communities(&self) -> std::result::Result<Vec<String>, SourceError> {
        Ok(self.read_impl().await?)
    }

    async fn write_report(
        &self,
        grid: &[Vec<String>],
        generated_at: &str,
    ) -> std::result::Result<(), SourceError> {
        Ok(self.write_impl(grid, generated_at).await?)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

/// A1-notation range with the tab name always quoted, so tab titles with
/// spaces or commas stay valid.
fn quoted_range(tab: &str, cells: &str) -> String {
    if cells.is_empty() {
        format!("'{}'", tab)
    } else {
        format!("'{}'!{}", tab, cells)
    }
}

fn column_letter(index: usize) -> Result<char> {
    if index == 0 || index > 26 {
        return Err(ApiError::Malformed(format!(
            "column index {index} out of single-letter range"
        )));
    }
    Ok((b'A' + index as u8 - 1) as char)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranges_quote_the_tab_name() {
        assert_eq!(
            quoted_range("Communities scraped data", "A1:J5"),
            "'Communities scraped data'!A1:J5"
        );
        assert_eq!(quoted_range("Report", ""), "'Report'");
    }

    #[test]
    fn column_letters_cover_the_report_width() {
        assert_eq!(column_letter(1).unwrap(), 'A');
        assert_eq!(column_letter(10).unwrap(), 'J');
        assert_eq!(column_letter(12).unwrap(), 'L');
        assert!(column_letter(0).is_err());
        assert!(column_letter(27).is_err());
    }
}
