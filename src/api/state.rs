//! Application state for the payroll API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::config::ConfigLoader;
use crate::error::PayrollResult;
use crate::payroll::PayrollService;
use crate::store::{MemoryStore, PayrollStore};

/// Shared application state.
///
/// Contains resources that are shared across all request handlers,
/// such as the payroll service and its store.
#[derive(Clone)]
pub struct AppState {
    /// The payroll service.
    service: PayrollService,
}

impl AppState {
    /// Creates a new application state around an existing service.
    pub fn new(service: PayrollService) -> Self {
        Self { service }
    }

    /// Creates a state backed by a fresh in-memory store seeded from the
    /// given business configurations.
    pub fn seeded(loaders: Vec<ConfigLoader>) -> PayrollResult<Self> {
        let store: Arc<dyn PayrollStore> = Arc::new(MemoryStore::new());
        let service = PayrollService::new(store);
        for loader in loaders {
            service.seed(loader.into_config())?;
        }
        Ok(Self::new(service))
    }

    /// Returns a reference to the payroll service.
    pub fn service(&self) -> &PayrollService {
        &self.service
    }
}
