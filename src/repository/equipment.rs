//! Equipment collection

use super::{Collection, DataSet, Record};
use crate::models::Equipment;

impl Record for Equipment {
    const KEY: &'static str = super::storage::EQUIPMENT_KEY;
    const ID_PREFIX: &'static str = "e";
    const LABEL: &'static str = "Equipment";

    fn id(&self) -> &str {
        &self.id
    }

    fn collection(data: &DataSet) -> &Collection<Self> {
        &data.equipment
    }

    fn collection_mut(data: &mut DataSet) -> &mut Collection<Self> {
        &mut data.equipment
    }
}
