// crates/devprofile-rs-catalog/src/catalog.rs

//! The catalog service: ingest, export, quality runs and deletion on top of
//! one SQLite store.
//!
//! Parsing, reconstruction and diffing run without holding the store lock.
//! The lock covers the checksum lookup plus the decomposition, so two
//! concurrent ingests of one document always resolve to one profile. Writes
//! are retried with the lock released between attempts.

use crate::container::{self, Member};
use crate::dispatch;
use crate::error::{CatalogError, StoreError};
use crate::pqa::{self, CancelToken, QualityReport};
use crate::retry::with_retry;
use crate::store::Store;
use devprofile_rs::config::Config;
use devprofile_rs::grammar::Grammar;
use log::{debug, info};
use rayon::prelude::*;
use sha2::{Digest, Sha256};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// Result of ingesting one member of a container.
#[derive(Debug)]
pub struct MemberOutcome {
    pub name: String,
    pub result: Result<String, CatalogError>,
}

pub struct Catalog {
    store: Mutex<Store>,
    config: Config,
}

impl Catalog {
    /// Opens (or creates) the catalog database at `path`.
    pub fn open(path: &Path, config: Config) -> Result<Self, CatalogError> {
        let store = Store::open(path, &config.storage)?;
        info!("Opened catalog at {}", path.display());
        Ok(Self::with_store(store, config))
    }

    pub fn open_in_memory(config: Config) -> Result<Self, CatalogError> {
        Ok(Self::with_store(Store::open_in_memory()?, config))
    }

    fn with_store(store: Store, config: Config) -> Self {
        Self {
            store: Mutex::new(store),
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn store(&self) -> Result<MutexGuard<'_, Store>, CatalogError> {
        self.store.lock().map_err(|_| CatalogError::Poisoned)
    }

    /// Runs a write under the retry policy, taking the store lock for each
    /// attempt only.
    fn write<T, F>(&self, operation_name: &str, mut operation: F) -> Result<T, CatalogError>
    where
        F: FnMut(&mut Store) -> Result<T, StoreError>,
    {
        with_retry(&self.config.storage.retry, operation_name, || {
            let mut store = self.store()?;
            Ok(operation(&mut *store)?)
        })
    }

    /// Ingests a single document and returns its profile id.
    ///
    /// Byte-identical content always maps to the id of its first ingest.
    pub fn ingest(&self, bytes: &[u8]) -> Result<String, CatalogError> {
        let checksum = checksum(bytes);
        if let Some(id) = self.store()?.find_by_checksum(&checksum)? {
            debug!("Content {} already stored as {}", checksum, id);
            return Ok(id);
        }

        let grammar = dispatch::detect(bytes)?;
        let profile = dispatch::parse(bytes, grammar, &self.config)?;

        let (id, inserted) = self.write("decompose", |store| {
            // Another thread may have stored the same content while we parsed.
            if let Some(id) = store.find_by_checksum(&checksum)? {
                return Ok((id, false));
            }
            Ok((store.insert_profile(&profile, bytes, &checksum)?, true))
        })?;
        if !inserted {
            debug!("Content {} was stored as {} while parsing", checksum, id);
            return Ok(id);
        }
        info!(
            "Ingested {} document {} as {} ({} parameters)",
            grammar,
            &checksum[..12],
            id,
            profile.parameters.len()
        );
        Ok(id)
    }

    /// Ingests every device description in a ZIP container.
    ///
    /// Extraction failures (bad archive, limits) fail the whole call; after
    /// that each member succeeds or fails on its own.
    pub fn ingest_container(&self, bytes: &[u8]) -> Result<Vec<MemberOutcome>, CatalogError> {
        let members = container::extract(bytes, &self.config.limits)?;
        info!("Container holds {} device descriptions", members.len());
        Ok(members
            .into_par_iter()
            .map(|Member { name, bytes, .. }| {
                let result = self.ingest(&bytes);
                MemberOutcome { name, result }
            })
            .collect())
    }

    /// Ingests independent documents on the rayon pool. Results keep the
    /// order of `documents`.
    pub fn ingest_batch<D>(&self, documents: &[D]) -> Vec<Result<String, CatalogError>>
    where
        D: AsRef<[u8]> + Sync,
    {
        documents
            .par_iter()
            .map(|doc| self.ingest(doc.as_ref()))
            .collect()
    }

    /// Reconstructs the stored profile.
    ///
    /// `grammar` overrides the configured export grammar, which in turn
    /// overrides the grammar the profile was parsed from.
    pub fn export(&self, id: &str, grammar: Option<Grammar>) -> Result<Vec<u8>, CatalogError> {
        let profile = self.store()?.load_profile(id)?;
        let target = grammar
            .or(self.config.export.target_grammar)
            .unwrap_or(profile.grammar);
        let bytes = dispatch::reconstruct(&profile, target, &self.config)?;
        debug!("Exported {} as {} ({} bytes)", id, target, bytes.len());
        Ok(bytes)
    }

    /// Reconstructs the profile in its source grammar, grades the result
    /// against the stored source and persists the report.
    pub fn run_quality(&self, id: &str) -> Result<QualityReport, CatalogError> {
        self.run_quality_with_cancel(id, &CancelToken::new())
    }

    /// As [`Catalog::run_quality`]; a cancelled run persists nothing.
    pub fn run_quality_with_cancel(
        &self,
        id: &str,
        cancel: &CancelToken,
    ) -> Result<QualityReport, CatalogError> {
        let (profile, (grammar, source)) = {
            let store = self.store()?;
            (store.load_profile(id)?, store.load_source(id)?)
        };
        let reconstructed = dispatch::reconstruct(&profile, grammar, &self.config)?;
        let report = pqa::score(&source, &reconstructed, grammar, &self.config, cancel)?;

        let stored = self.write("insert_report", |store| store.insert_report(id, &report))?;
        info!(
            "Quality of {}: {:.2} ({} differences)",
            id,
            stored.score,
            stored.records.len()
        );
        Ok(stored)
    }

    /// Runs quality checks for several profiles in parallel.
    pub fn run_quality_batch(&self, ids: &[String]) -> Vec<Result<QualityReport, CatalogError>> {
        ids.par_iter().map(|id| self.run_quality(id)).collect()
    }

    /// Stored quality reports of a profile, oldest first.
    pub fn reports(&self, id: &str) -> Result<Vec<QualityReport>, CatalogError> {
        Ok(self.store()?.load_reports(id)?)
    }

    pub fn find_by_checksum(&self, checksum: &str) -> Result<Option<String>, CatalogError> {
        Ok(self.store()?.find_by_checksum(checksum)?)
    }

    pub fn profile_ids(&self) -> Result<Vec<String>, CatalogError> {
        Ok(self.store()?.profile_ids()?)
    }

    /// Deletes a profile together with its reports.
    pub fn delete(&self, id: &str) -> Result<(), CatalogError> {
        self.write("delete", |store| store.delete_profile(id))?;
        info!("Deleted profile {}", id);
        Ok(())
    }
}

/// SHA-256 of `bytes`, lower-case hex.
pub fn checksum(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}
