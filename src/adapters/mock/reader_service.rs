use crate::domain::value_objects::{ReaderDetails, ReaderNumber};
use crate::ports::reader_service::{ReaderService as ReaderServiceTrait, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// In-memory implementation of ReaderService
///
/// Supports stateful testing by registering readers and, optionally,
/// the username each reader logs in with.
#[derive(Default)]
pub struct ReaderService {
    readers: Mutex<HashMap<ReaderNumber, ReaderDetails>>,
    usernames: Mutex<HashMap<String, ReaderNumber>>,
}

impl ReaderService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a reader for testing purposes
    pub fn add_reader(&self, reader: ReaderDetails) {
        self.readers
            .lock()
            .unwrap()
            .insert(reader.reader_number.clone(), reader);
    }

    /// Link a username to a registered reader number
    pub fn register_username(&self, username: &str, reader_number: ReaderNumber) {
        self.usernames
            .lock()
            .unwrap()
            .insert(username.to_string(), reader_number);
    }
}

#[async_trait]
impl ReaderServiceTrait for ReaderService {
    async fn find_by_reader_number(
        &self,
        reader_number: &ReaderNumber,
    ) -> Result<Option<ReaderDetails>> {
        Ok(self.readers.lock().unwrap().get(reader_number).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<ReaderDetails>> {
        let reader_number = match self.usernames.lock().unwrap().get(username) {
            Some(n) => n.clone(),
            None => return Ok(None),
        };
        Ok(self.readers.lock().unwrap().get(&reader_number).cloned())
    }
}
