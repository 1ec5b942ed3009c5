use crate::models::BookingData;
use crate::scrapers::{DatasetSink, SearchQuery};
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::info;

/// Writes the dataset as a pretty-printed JSON array
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Sink under `dir` named after the query, e.g.
    /// `台北_2030-01-02_2030-01-05_2a0c1r.json`
    pub fn for_query(dir: &Path, query: &SearchQuery) -> Self {
        let keyword: String = query
            .search
            .trim()
            .chars()
            .map(|c| match c {
                '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
                c if c.is_whitespace() || c.is_control() => '_',
                c => c,
            })
            .collect();
        let date = |d: Option<chrono::NaiveDate>| {
            d.map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "any".to_string())
        };

        let filename = format!(
            "{}_{}_{}_{}a{}c{}r.json",
            keyword,
            date(query.check_in),
            date(query.check_out),
            query.num_adults,
            query.num_children,
            query.num_rooms
        );
        Self::new(dir.join(filename))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl DatasetSink for JsonFileSink {
    async fn persist(&self, records: &[BookingData]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let json = serde_json::to_string_pretty(records)?;
        tokio::fs::write(&self.path, json)
            .await
            .with_context(|| format!("Failed to write {}", self.path.display()))?;

        info!("💾 Saved {} records to {}", records.len(), self.path.display());
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    #[test]
    fn filename_is_derived_from_query() {
        let query = SearchQuery {
            search: "台北 車站/東".to_string(),
            check_in: NaiveDate::from_ymd_opt(2030, 1, 2),
            check_out: NaiveDate::from_ymd_opt(2030, 1, 5),
            ..Default::default()
        };
        let sink = JsonFileSink::for_query(Path::new("result"), &query);
        assert_eq!(
            sink.path(),
            Path::new("result/台北_車站_東_2030-01-02_2030-01-05_2a0c1r.json")
        );

        let open = SearchQuery {
            search: "Tainan".to_string(),
            ..Default::default()
        };
        let sink = JsonFileSink::for_query(Path::new("out"), &open);
        assert_eq!(sink.describe(), "out/Tainan_any_any_2a0c1r.json");
    }

    #[tokio::test]
    async fn persists_utf8_json_array() {
        let dir = std::env::temp_dir().join(format!("booking-scout-{}", std::process::id()));
        let sink = JsonFileSink::new(dir.join("nested").join("out.json"));
        let records = vec![BookingData {
            name: "台北車站飯店".to_string(),
            ..Default::default()
        }];

        sink.persist(&records).await.unwrap();

        let written = tokio::fs::read_to_string(sink.path()).await.unwrap();
        assert!(written.contains("台北車站飯店"));
        let parsed: Vec<BookingData> = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed, records);

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }
}
