//! Room collection

use super::{Collection, DataSet, Record};
use crate::models::Room;

impl Record for Room {
    const KEY: &'static str = super::storage::ROOMS_KEY;
    const ID_PREFIX: &'static str = "r";
    const LABEL: &'static str = "Room";

    fn id(&self) -> &str {
        &self.id
    }

    fn collection(data: &DataSet) -> &Collection<Self> {
        &data.rooms
    }

    fn collection_mut(data: &mut DataSet) -> &mut Collection<Self> {
        &mut data.rooms
    }
}
