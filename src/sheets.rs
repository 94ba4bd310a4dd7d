use crate::error::Result;
use crate::CmsError;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";
const SHEETS_EXPORT_BASE: &str = "https://docs.google.com/spreadsheets/d";

/// Location of the spreadsheet range behind a chart
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetConfig {
    pub spreadsheet_id: String,
    #[serde(default)]
    pub range: Option<String>,
    /// Tab id used by the CSV export
    #[serde(default)]
    pub gid: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ValuesResponse {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartDataset {
    pub label: String,
    pub data: Vec<f64>,
}

/// Labels plus one numeric series per column, ready for a chart widget
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<ChartDataset>,
}

/// Fetches spreadsheet rows
///
/// Uses the Sheets values API when an API key is set, otherwise the public CSV export.
pub async fn fetch_sheet_data(config: &SheetConfig, timeout: Duration) -> Result<Vec<Vec<String>>> {
    if config.spreadsheet_id.trim().is_empty() {
        return Err(CmsError::InvalidArgument(
            "Spreadsheet id cannot be empty".to_string(),
        ));
    }

    let client = Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| CmsError::Internal(format!("Failed to create HTTP client: {}", e)))?;

    let rows = match config.api_key.as_deref().filter(|k| !k.trim().is_empty()) {
        Some(api_key) => {
            let url = values_url(config, api_key)?;
            debug!("Fetching sheet values from API");
            let response: ValuesResponse = get(&client, url).await?.json().await.map_err(|e| {
                CmsError::Integration(format!("Failed to parse sheet response: {}", e))
            })?;
            response.values
        }
        None => {
            let url = export_url(config)?;
            debug!("Fetching sheet values from CSV export");
            let text = get(&client, url).await?.text().await.map_err(|e| {
                CmsError::Integration(format!("Failed to read sheet export: {}", e))
            })?;
            parse_csv(&text)?
        }
    };

    info!(rows = rows.len(), "Fetched sheet data");
    Ok(rows)
}

async fn get(client: &Client, url: Url) -> Result<reqwest::Response> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| CmsError::Integration(format!("Failed to fetch sheet: {}", e)))?;

    if !response.status().is_success() {
        let status = response.status();
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(CmsError::Integration(format!(
            "Sheet request failed ({}): {}",
            status, error_text
        )));
    }

    Ok(response)
}

pub fn values_url(config: &SheetConfig, api_key: &str) -> Result<Url> {
    let range = config.range.as_deref().unwrap_or("Sheet1");
    let mut url = Url::parse(SHEETS_API_BASE)
        .map_err(|e| CmsError::Internal(format!("Invalid sheets base URL: {}", e)))?;
    url.path_segments_mut()
        .map_err(|_| CmsError::Internal("Sheets base URL cannot have a path".to_string()))?
        .push(config.spreadsheet_id.trim())
        .push("values")
        .push(range);
    url.query_pairs_mut().append_pair("key", api_key);
    Ok(url)
}

pub fn export_url(config: &SheetConfig) -> Result<Url> {
    let mut url = Url::parse(SHEETS_EXPORT_BASE)
        .map_err(|e| CmsError::Internal(format!("Invalid sheets export URL: {}", e)))?;
    url.path_segments_mut()
        .map_err(|_| CmsError::Internal("Sheets export URL cannot have a path".to_string()))?
        .push(config.spreadsheet_id.trim())
        .push("export");
    url.query_pairs_mut()
        .append_pair("format", "csv")
        .append_pair("gid", config.gid.as_deref().unwrap_or("0"));
    Ok(url)
}

pub fn parse_csv(text: &str) -> Result<Vec<Vec<String>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    reader
        .records()
        .map(|record| {
            record
                .map(|r| r.iter().map(|cell| cell.trim().to_string()).collect::<Vec<String>>())
                .map_err(|e| CmsError::Integration(format!("Invalid CSV data: {}", e)))
        })
        .collect()
}

/// Turns rows into chart data
///
/// The first row holds series names (its first cell is ignored), the first
/// column holds labels. Cells that do not parse as numbers count as 0;
/// `$`, `%`, thousands separators and whitespace are stripped first.
pub fn to_chart_data(rows: &[Vec<String>]) -> Result<ChartData> {
    let (header, body) = rows
        .split_first()
        .ok_or_else(|| CmsError::InvalidArgument("Sheet has no rows".to_string()))?;

    if header.len() < 2 {
        return Err(CmsError::InvalidArgument(
            "Sheet needs a label column and at least one data column".to_string(),
        ));
    }

    let body: Vec<&Vec<String>> = body
        .iter()
        .filter(|row| row.iter().any(|cell| !cell.trim().is_empty()))
        .collect();

    let labels = body
        .iter()
        .map(|row| row.first().cloned().unwrap_or_default())
        .collect();

    let datasets = header
        .iter()
        .enumerate()
        .skip(1)
        .map(|(column, name)| ChartDataset {
            label: name.clone(),
            data: body
                .iter()
                .map(|row| row.get(column).map(|cell| parse_number(cell)).unwrap_or(0.0))
                .collect(),
        })
        .collect();

    Ok(ChartData { labels, datasets })
}

fn parse_number(cell: &str) -> f64 {
    let cleaned: String = cell
        .chars()
        .filter(|c| !matches!(c, '$' | '%' | ',') && !c.is_whitespace())
        .collect();
    cleaned
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(data: &[&[&str]]) -> Vec<Vec<String>> {
        data.iter()
            .map(|row| row.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_values_url_encodes_range() {
        let config = SheetConfig {
            spreadsheet_id: "abc123".to_string(),
            range: Some("Revenue!A1:C5".to_string()),
            ..SheetConfig::default()
        };
        let url = values_url(&config, "KEY").unwrap();
        assert_eq!(
            url.as_str(),
            "https://sheets.googleapis.com/v4/spreadsheets/abc123/values/Revenue!A1:C5?key=KEY"
        );
    }

    #[test]
    fn test_export_url_defaults_gid() {
        let config = SheetConfig {
            spreadsheet_id: "abc123".to_string(),
            ..SheetConfig::default()
        };
        assert_eq!(
            export_url(&config).unwrap().as_str(),
            "https://docs.google.com/spreadsheets/d/abc123/export?format=csv&gid=0"
        );
    }

    #[test]
    fn test_parse_csv_handles_quotes_and_ragged_rows() {
        let parsed = parse_csv("Month,Sales\n\"Jan, 2024\", 10\nFeb\n").unwrap();
        assert_eq!(
            parsed,
            rows(&[&["Month", "Sales"], &["Jan, 2024", "10"], &["Feb"]])
        );
    }

    #[test]
    fn test_chart_data_from_rows() {
        let data = rows(&[
            &["Quarter", "Revenue", "Costs"],
            &["Q1", "$1,200", "800"],
            &["Q2", "1500", "n/a"],
            &["", "", ""],
            &["Q3", "12.5%"],
        ]);

        let chart = to_chart_data(&data).unwrap();
        assert_eq!(chart.labels, vec!["Q1", "Q2", "Q3"]);
        assert_eq!(chart.datasets.len(), 2);
        assert_eq!(chart.datasets[0].label, "Revenue");
        assert_eq!(chart.datasets[0].data, vec![1200.0, 1500.0, 12.5]);
        assert_eq!(chart.datasets[1].data, vec![800.0, 0.0, 0.0]);
    }

    #[test]
    fn test_parse_number_strips_only_formatting() {
        assert_eq!(parse_number("$1,200"), 1200.0);
        assert_eq!(parse_number(" 12.5 % "), 12.5);
        assert_eq!(parse_number("-40"), -40.0);
        assert_eq!(parse_number("1e5"), 100000.0);
        assert_eq!(parse_number("3-4"), 0.0);
        assert_eq!(parse_number("v2"), 0.0);
        assert_eq!(parse_number("inf"), 0.0);
    }

    #[test]
    fn test_chart_data_rejects_empty_sheet() {
        assert!(to_chart_data(&[]).is_err());
        assert!(to_chart_data(&rows(&[&["Only labels"]])).is_err());
    }

    #[tokio::test]
    async fn test_fetch_requires_spreadsheet_id() {
        let result = fetch_sheet_data(&SheetConfig::default(), Duration::from_secs(1)).await;
        assert!(matches!(result, Err(CmsError::InvalidArgument(_))));
    }
}
