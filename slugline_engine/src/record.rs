//! Generic attribute-bag entity.
//!
//! `Record` is the simplest possible [`SlugHost`]: an entity type, an optional
//! identity, and string attributes. The CLI and the reference store use it;
//! real hosts implement [`SlugHost`] on their own types.

use std::collections::BTreeMap;

use uuid::Uuid;

use crate::host::SlugHost;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    entity_type: String,
    id: Option<Uuid>,
    attributes: BTreeMap<String, String>,
}

impl Record {
    /// A record that has not been persisted yet.
    pub fn new(entity_type: impl Into<String>) -> Self {
        Self {
            entity_type: entity_type.into(),
            id: None,
            attributes: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    #[must_use]
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = Some(id);
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(name.into(), value.into());
    }

    /// Remove an attribute, e.g. to re-arm slug generation.
    pub fn clear(&mut self, name: &str) {
        self.attributes.remove(name);
    }

    pub(crate) fn assign_id(&mut self, id: Uuid) {
        self.id = Some(id);
    }
}

impl SlugHost for Record {
    fn entity_type(&self) -> &str {
        &self.entity_type
    }

    fn id(&self) -> Option<Uuid> {
        self.id
    }

    fn read_attribute(&self, name: &str) -> anyhow::Result<Option<String>> {
        Ok(self.attributes.get(name).cloned())
    }

    fn write_attribute(&mut self, name: &str, value: Option<String>) -> anyhow::Result<()> {
        match value {
            Some(value) => self.set(name, value),
            None => self.clear(name),
        }
        Ok(())
    }
}
