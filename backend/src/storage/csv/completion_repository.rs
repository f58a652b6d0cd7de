use anyhow::{Context, Result};
use chrono::NaiveDate;
use csv::{Reader, Writer};
use log::debug;
use serde::{Deserialize, Serialize};
use shared::CompletionLedger;
use std::fs::File;
use std::io::BufReader;

use super::connection::{CsvConnection, COMPLETIONS_FILE};
use crate::storage::traits::CompletionStorage;

/// One flattened ledger entry as stored on disk
#[derive(Debug, Serialize, Deserialize)]
struct CompletionRecord {
    date: NaiveDate,
    kid_id: String,
    task_id: String,
    completed: bool,
}

/// CSV-based completion ledger (`completions.csv`)
///
/// The nested date -> child -> task map is stored one row per entry and
/// rebuilt on load:
///
/// ```csv
/// date,kid_id,task_id,completed
/// 2024-01-15,child::1a2b…,task::3c4d…,true
/// ```
#[derive(Clone)]
pub struct CompletionRepository {
    connection: CsvConnection,
}

impl CompletionRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }
}

impl CompletionStorage for CompletionRepository {
    fn load_completion_ledger(&self) -> Result<CompletionLedger> {
        let path = self.connection.file_path(COMPLETIONS_FILE);
        if !path.exists() {
            return Ok(CompletionLedger::new());
        }

        let file = File::open(&path).with_context(|| format!("Failed to open {}", path.display()))?;
        let mut csv_reader = Reader::from_reader(BufReader::new(file));

        // All-or-nothing: a bad row fails the whole load
        let mut entries = Vec::new();
        for (index, result) in csv_reader.deserialize::<CompletionRecord>().enumerate() {
            let record = result
                .with_context(|| format!("Malformed completion row {} in {}", index + 1, path.display()))?;
            entries.push((record.date, record.kid_id, record.task_id, record.completed));
        }

        debug!("Loaded {} completion entries", entries.len());
        Ok(CompletionLedger::from_entries(entries))
    }

    fn save_completion_ledger(&self, ledger: &CompletionLedger) -> Result<()> {
        let mut csv_writer = Writer::from_writer(Vec::new());
        csv_writer.write_record(["date", "kid_id", "task_id", "completed"])?;

        let mut count = 0;
        for (date, kid_id, task_id, completed) in ledger.entries() {
            csv_writer.serialize((date, kid_id, task_id, completed))?;
            count += 1;
        }

        let content = csv_writer.into_inner().context("Failed to flush completion CSV")?;
        CsvConnection::write_atomic(&self.connection.file_path(COMPLETIONS_FILE), &content)?;

        debug!("Saved {} completion entries", count);
        Ok(())
    }

    fn set_completion(&self, date: NaiveDate, kid_id: &str, task_id: &str, completed: bool) -> Result<()> {
        let mut ledger = self.load_completion_ledger()?;
        ledger.set(date, kid_id, task_id, completed);
        self.save_completion_ledger(&ledger)
    }
}
