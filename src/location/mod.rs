//! Device location capability.
//!
//! The host platform supplies a [`LocationProvider`]; the session asks it
//! for permission once and then for a single position fix.

use crate::core::geo::LatLng;
use crate::{MapError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionStatus {
    Granted,
    Denied,
}

/// Platform permission broker plus one-shot position source
#[async_trait]
pub trait LocationProvider: Send + Sync {
    async fn request_permission(&self) -> PermissionStatus;

    /// One position fix. Only called after permission was granted.
    async fn current_position(&self) -> Result<LatLng>;
}

/// Always grants permission and reports a fixed position.
/// Useful for desktop hosts and tests.
#[derive(Debug, Clone, Copy)]
pub struct StaticLocationProvider {
    position: LatLng,
}

impl StaticLocationProvider {
    pub fn new(position: LatLng) -> Self {
        Self { position }
    }
}

#[async_trait]
impl LocationProvider for StaticLocationProvider {
    async fn request_permission(&self) -> PermissionStatus {
        PermissionStatus::Granted
    }

    async fn current_position(&self) -> Result<LatLng> {
        Ok(self.position)
    }
}

/// A host without location support: permission is always refused
#[derive(Debug, Clone, Copy, Default)]
pub struct DeniedLocationProvider;

#[async_trait]
impl LocationProvider for DeniedLocationProvider {
    async fn request_permission(&self) -> PermissionStatus {
        PermissionStatus::Denied
    }

    async fn current_position(&self) -> Result<LatLng> {
        Err(MapError::Location("location permission denied".to_string()))
    }
}
