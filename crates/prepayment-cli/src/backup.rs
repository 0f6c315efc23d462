use chrono::{DateTime, Utc};
use prepayment_core::certificate::CertificateInput;
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use tracing::{debug, info};

pub const BACKUP_FILE: &str = "backups.csv";

/// One saved form snapshot as stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupRecord {
    pub saved_at: DateTime<Utc>,
    pub contractor: String,
    pub project_name: String,
    /// The full `CertificateInput`, as JSON
    pub payload: String,
}

/// Listing entry for a snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupSummary {
    pub index: usize,
    pub saved_at: DateTime<Utc>,
    pub contractor: String,
    pub project_name: String,
    pub project_count: usize,
}

/// Append-only CSV store of certificate form snapshots.
pub struct BackupStore {
    dir: PathBuf,
}

impl BackupStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        BackupStore { dir: dir.into() }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(BACKUP_FILE)
    }

    /// Append a snapshot, creating the directory and header row on first use.
    pub fn save(
        &self,
        input: &CertificateInput,
    ) -> Result<BackupSummary, Box<dyn std::error::Error>> {
        fs::create_dir_all(&self.dir)
            .map_err(|e| format!("Failed to create '{}': {}", self.dir.display(), e))?;

        let path = self.path();
        let index = self.read_all()?.len();
        let needs_header = fs::metadata(&path).map(|m| m.len() == 0).unwrap_or(true);

        let record = BackupRecord {
            saved_at: Utc::now(),
            contractor: input.contractor.clone(),
            project_name: input.project_name.clone(),
            payload: serde_json::to_string(input)?,
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| format!("Failed to open '{}': {}", path.display(), e))?;
        let mut wtr = csv::WriterBuilder::new()
            .has_headers(needs_header)
            .from_writer(file);
        wtr.serialize(&record)?;
        wtr.flush()?;

        info!(index, path = %path.display(), "form snapshot saved");
        Ok(summarize(index, &record, input))
    }

    /// All stored snapshots in the order they were saved.
    pub fn read_all(&self) -> Result<Vec<BackupRecord>, Box<dyn std::error::Error>> {
        let path = self.path();
        if !path.exists() {
            debug!(path = %path.display(), "no backups yet");
            return Ok(Vec::new());
        }

        let mut rdr = csv::Reader::from_path(&path)
            .map_err(|e| format!("Failed to read '{}': {}", path.display(), e))?;
        let mut records = Vec::new();
        for row in rdr.deserialize() {
            let record: BackupRecord = row?;
            records.push(record);
        }
        Ok(records)
    }

    /// Snapshots whose contractor or project name contains `search`
    /// (case-insensitive). `None` lists everything.
    pub fn list(
        &self,
        search: Option<&str>,
    ) -> Result<Vec<BackupSummary>, Box<dyn std::error::Error>> {
        let needle = search.map(|s| s.trim().to_lowercase()).unwrap_or_default();

        let mut summaries = Vec::new();
        for (index, record) in self.read_all()?.iter().enumerate() {
            if !needle.is_empty() && !matches(record, &needle) {
                continue;
            }
            let input: CertificateInput = serde_json::from_str(&record.payload)?;
            summaries.push(summarize(index, record, &input));
        }
        Ok(summaries)
    }

    /// The snapshot saved at position `index` (0-based).
    pub fn load(&self, index: usize) -> Result<CertificateInput, Box<dyn std::error::Error>> {
        let records = self.read_all()?;
        let record = records.get(index).ok_or_else(|| {
            format!(
                "No backup at index {} ({} stored in {})",
                index,
                records.len(),
                self.path().display()
            )
        })?;
        Ok(serde_json::from_str(&record.payload)?)
    }
}

fn matches(record: &BackupRecord, needle: &str) -> bool {
    record.contractor.to_lowercase().contains(needle)
        || record.project_name.to_lowercase().contains(needle)
}

fn summarize(index: usize, record: &BackupRecord, input: &CertificateInput) -> BackupSummary {
    BackupSummary {
        index,
        saved_at: record.saved_at,
        contractor: record.contractor.clone(),
        project_name: record.project_name.clone(),
        project_count: input.projects.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use prepayment_core::amount_due::RawPaymentFields;

    fn snapshot(contractor: &str, project_name: &str, projects: usize) -> CertificateInput {
        CertificateInput {
            contractor: contractor.to_string(),
            project_name: project_name.to_string(),
            payment_stage: None,
            projects: vec![
                RawPaymentFields {
                    work_completed: "1,000".to_string(),
                    ..Default::default()
                };
                projects
            ],
        }
    }

    #[test]
    fn test_empty_store_lists_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = BackupStore::new(dir.path());
        assert!(store.list(None).unwrap().is_empty());
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = BackupStore::new(dir.path().join("nested"));
        let input = snapshot("Bello, Sons & Co", "Kano \"Phase 2\"", 2);

        let summary = store.save(&input).unwrap();
        assert_eq!(summary.index, 0);
        assert_eq!(summary.project_count, 2);
        assert_eq!(store.load(0).unwrap(), input);
    }

    #[test]
    fn test_indices_follow_save_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = BackupStore::new(dir.path());
        store.save(&snapshot("Alpha", "Road", 1)).unwrap();
        let second = store.save(&snapshot("Beta", "Bridge", 3)).unwrap();
        assert_eq!(second.index, 1);

        let all = store.list(None).unwrap();
        let names: Vec<&str> = all.iter().map(|s| s.contractor.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Beta"]);
        assert_eq!(store.load(1).unwrap().project_name, "Bridge");
    }

    #[test]
    fn test_search_matches_contractor_or_project() {
        let dir = tempfile::tempdir().unwrap();
        let store = BackupStore::new(dir.path());
        store.save(&snapshot("Okafor Ltd", "Ikeja Road", 1)).unwrap();
        store.save(&snapshot("Bello Construction", "Kano Water", 1)).unwrap();
        store.save(&snapshot("Adeyemi", "Ikeja Market", 1)).unwrap();

        let by_project = store.list(Some("ikeja")).unwrap();
        assert_eq!(
            by_project.iter().map(|s| s.index).collect::<Vec<_>>(),
            vec![0, 2]
        );

        let by_contractor = store.list(Some("BELLO")).unwrap();
        assert_eq!(by_contractor.len(), 1);
        assert_eq!(by_contractor[0].index, 1);
    }

    #[test]
    fn test_load_out_of_range_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = BackupStore::new(dir.path());
        store.save(&snapshot("Alpha", "Road", 1)).unwrap();
        let err = store.load(5).unwrap_err();
        assert!(err.to_string().contains("No backup at index 5"));
    }
}
