use noces_core::collections::Collection;
use serde::Serialize;

/// Output of every `delete` command.
#[derive(Debug, Serialize)]
pub struct Deleted {
    pub collection: String,
    pub id: String,
    pub deleted: bool,
}

impl Deleted {
    pub fn new(collection: Collection, id: &str) -> Self {
        Self {
            collection: collection.to_string(),
            id: id.to_string(),
            deleted: true,
        }
    }
}
