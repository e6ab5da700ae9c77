use uuid::Uuid;

use crate::error::StoreError;
use crate::models::UserRecord;
use crate::validation::validate_record;

/// In-memory user records, kept in insertion order.
#[derive(Debug, Default)]
pub struct RecordStore {
    records: Vec<UserRecord>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record. Rejects records that fail validation or reuse an identifier.
    pub fn add(&mut self, record: UserRecord) -> Result<(), StoreError> {
        if self.position(record.id).is_some() {
            return Err(StoreError::DuplicateIdentifier(record.id));
        }
        let errors = validate_record(&record);
        if !errors.is_empty() {
            return Err(StoreError::Invalid(errors));
        }

        tracing::debug!(id = %record.id, username = %record.username, "record added");
        self.records.push(record);
        Ok(())
    }

    /// Delete the record with this identifier and hand it back.
    pub fn remove(&mut self, id: Uuid) -> Result<UserRecord, StoreError> {
        let idx = self.position(id).ok_or(StoreError::NotFound(id))?;
        let removed = self.records.remove(idx);
        tracing::debug!(id = %id, "record removed");
        Ok(removed)
    }

    /// Replace the record sharing `record.id`, keeping its place in the list.
    pub fn update(&mut self, record: UserRecord) -> Result<(), StoreError> {
        let idx = self.position(record.id).ok_or(StoreError::NotFound(record.id))?;
        let errors = validate_record(&record);
        if !errors.is_empty() {
            return Err(StoreError::Invalid(errors));
        }

        tracing::debug!(id = %record.id, "record updated");
        self.records[idx] = record;
        Ok(())
    }

    pub fn list(&self) -> &[UserRecord] {
        &self.records
    }

    pub fn get(&self, id: Uuid) -> Option<&UserRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn position(&self, id: Uuid) -> Option<usize> {
        self.records.iter().position(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::BTreeSet;

    use chrono::Utc;

    use super::*;
    use crate::models::{Country, Hobby, ImageAttachment};

    pub(crate) fn sample_record(username: &str) -> UserRecord {
        let now = Utc::now();
        UserRecord {
            id: Uuid::new_v4(),
            username: username.to_string(),
            email: format!("{}@example.com", username.to_lowercase()),
            gender: None,
            hobbies: BTreeSet::from([Hobby::Cricket]),
            country: Some(Country::Nepal),
            message: String::new(),
            image: ImageAttachment {
                file_name: "me.png".to_string(),
                mime_type: "image/png".to_string(),
                size_bytes: 2048,
                data_url: "data:image/png;base64,AAAA".to_string(),
            },
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn add_then_list_contains_record_once() {
        let mut store = RecordStore::new();
        let record = sample_record("alice");
        store.add(record.clone()).unwrap();

        let matches = store.list().iter().filter(|r| r.id == record.id).count();
        assert_eq!(matches, 1);
        assert_eq!(store.list()[0], record);
    }

    #[test]
    fn add_rejects_duplicate_identifier() {
        let mut store = RecordStore::new();
        let record = sample_record("alice");
        store.add(record.clone()).unwrap();

        let err = store.add(record.clone()).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateIdentifier(id) if id == record.id));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn add_rejects_invalid_record() {
        let mut store = RecordStore::new();
        let mut record = sample_record("alice");
        record.hobbies.clear();

        let err = store.add(record).unwrap_err();
        assert!(matches!(err, StoreError::Invalid(ref e) if e.hobbies.is_some()));
        assert!(store.is_empty());
    }

    #[test]
    fn update_replaces_in_place() {
        let mut store = RecordStore::new();
        let first = sample_record("alice");
        let second = sample_record("bob");
        store.add(first.clone()).unwrap();
        store.add(second.clone()).unwrap();

        let mut changed = first.clone();
        changed.country = Some(Country::Usa);
        store.update(changed.clone()).unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.list()[0], changed);
        assert_eq!(store.list()[1], second);
    }

    #[test]
    fn update_missing_record_is_not_found() {
        let mut store = RecordStore::new();
        let record = sample_record("alice");
        let err = store.update(record.clone()).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(id) if id == record.id));
        assert!(store.is_empty());
    }

    #[test]
    fn remove_by_identifier() {
        let mut store = RecordStore::new();
        let first = sample_record("alice");
        let second = sample_record("bob");
        store.add(first.clone()).unwrap();
        store.add(second.clone()).unwrap();

        let removed = store.remove(first.id).unwrap();
        assert_eq!(removed, first);
        assert!(store.get(first.id).is_none());
        assert_eq!(store.list(), &[second]);
    }

    #[test]
    fn remove_unknown_leaves_store_unchanged() {
        let mut store = RecordStore::new();
        let record = sample_record("alice");
        store.add(record.clone()).unwrap();

        let missing = Uuid::new_v4();
        assert!(matches!(store.remove(missing), Err(StoreError::NotFound(id)) if id == missing));
        assert_eq!(store.list(), &[record]);
    }
}
