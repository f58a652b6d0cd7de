use anyhow::{Context, Result};
use csv::{Reader, Writer};
use log::info;
use shared::Redemption;
use std::fs::File;
use std::io::BufReader;

use super::connection::{CsvConnection, REDEMPTIONS_FILE};
use crate::storage::traits::RedemptionStorage;

/// CSV-based redemption history (`redemptions.csv`)
///
/// ```csv
/// id,kid_id,reward_id,label,cost,at
/// redemption::7f0c…,child::1a2b…,reward::9d8e…,30 min Game Time,30,2024-01-15T18:30:00-05:00
/// ```
#[derive(Clone)]
pub struct RedemptionRepository {
    connection: CsvConnection,
}

impl RedemptionRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    fn read_redemptions(&self) -> Result<Vec<Redemption>> {
        let path = self.connection.file_path(REDEMPTIONS_FILE);
        if !path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&path).with_context(|| format!("Failed to open {}", path.display()))?;
        let mut csv_reader = Reader::from_reader(BufReader::new(file));

        csv_reader
            .deserialize::<Redemption>()
            .enumerate()
            .map(|(index, result)| {
                result.with_context(|| {
                    format!("Malformed redemption row {} in {}", index + 1, path.display())
                })
            })
            .collect()
    }

    fn write_redemptions(&self, redemptions: &[Redemption]) -> Result<()> {
        let mut csv_writer = Writer::from_writer(Vec::new());

        if redemptions.is_empty() {
            csv_writer.write_record(["id", "kid_id", "reward_id", "label", "cost", "at"])?;
        }
        for redemption in redemptions {
            csv_writer.serialize(redemption)?;
        }

        let content = csv_writer.into_inner().context("Failed to flush redemption CSV")?;
        CsvConnection::write_atomic(&self.connection.file_path(REDEMPTIONS_FILE), &content)
    }
}

impl RedemptionStorage for RedemptionRepository {
    fn store_redemption(&self, redemption: &Redemption) -> Result<()> {
        let mut redemptions = self.read_redemptions()?;
        redemptions.push(redemption.clone());
        self.write_redemptions(&redemptions)?;

        info!(
            "Recorded redemption {} for {}: '{}' ({} points)",
            redemption.id, redemption.kid_id, redemption.label, redemption.cost
        );
        Ok(())
    }

    fn get_redemption(&self, redemption_id: &str) -> Result<Option<Redemption>> {
        Ok(self.read_redemptions()?.into_iter().find(|r| r.id == redemption_id))
    }

    fn list_redemptions(&self, kid_id: Option<&str>) -> Result<Vec<Redemption>> {
        let redemptions = self.read_redemptions()?;
        Ok(match kid_id {
            Some(kid_id) => redemptions.into_iter().filter(|r| r.kid_id == kid_id).collect(),
            None => redemptions,
        })
    }

    fn delete_redemption(&self, redemption_id: &str) -> Result<bool> {
        let mut redemptions = self.read_redemptions()?;
        let before = redemptions.len();
        redemptions.retain(|r| r.id != redemption_id);

        if redemptions.len() == before {
            return Ok(false);
        }

        self.write_redemptions(&redemptions)?;
        info!("Deleted redemption {}", redemption_id);
        Ok(true)
    }
}
