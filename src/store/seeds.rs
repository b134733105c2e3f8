use std::collections::HashSet;

use serde::Deserialize;
use serde::Serialize;

use crate::utils::normalize_address;

/// User-designated base addresses that seed hop labeling. Maintained by
/// user action (or bulk-import side effect), never derived from
/// transaction content.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedAddressSet {
    addresses: HashSet<String>,
}

impl SeedAddressSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(
        &mut self,
        address: &str,
    ) -> bool {
        let normalized = normalize_address(address);
        if normalized.is_empty() {
            return false;
        }
        self.addresses.insert(normalized)
    }

    pub fn add_many<'a>(
        &mut self,
        addresses: impl IntoIterator<Item = &'a str>,
    ) -> usize {
        addresses.into_iter().filter(|a| self.add(a)).count()
    }

    pub fn remove(
        &mut self,
        address: &str,
    ) -> bool {
        self.addresses.remove(&normalize_address(address))
    }

    pub fn contains(
        &self,
        address: &str,
    ) -> bool {
        self.addresses.contains(&normalize_address(address))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.addresses.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }
}
