use anyhow::Result;
use log::{debug, info};
use shared::Child;

use super::connection::{CsvConnection, CHILDREN_FILE};
use crate::storage::traits::ChildStorage;

/// YAML-backed child repository (`children.yaml`)
#[derive(Clone)]
pub struct ChildRepository {
    connection: CsvConnection,
}

impl ChildRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    fn read_children(&self) -> Result<Vec<Child>> {
        self.connection.read_yaml_list(CHILDREN_FILE)
    }

    fn write_children(&self, children: &[Child]) -> Result<()> {
        self.connection.write_yaml_list(CHILDREN_FILE, children)
    }
}

impl ChildStorage for ChildRepository {
    fn store_child(&self, child: &Child) -> Result<()> {
        let mut children = self.read_children()?;
        match children.iter().position(|c| c.id == child.id) {
            Some(pos) => children[pos] = child.clone(),
            None => children.push(child.clone()),
        }
        self.write_children(&children)?;

        debug!("Stored child {} ({}) with {} points", child.name, child.id, child.points);
        Ok(())
    }

    fn get_child(&self, child_id: &str) -> Result<Option<Child>> {
        Ok(self.read_children()?.into_iter().find(|c| c.id == child_id))
    }

    fn list_children(&self) -> Result<Vec<Child>> {
        let mut children = self.read_children()?;
        children.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(children)
    }

    fn delete_child(&self, child_id: &str) -> Result<bool> {
        let mut children = self.read_children()?;
        let before = children.len();
        children.retain(|c| c.id != child_id);

        if children.len() == before {
            return Ok(false);
        }

        self.write_children(&children)?;
        info!("Deleted child {}", child_id);
        Ok(true)
    }
}
