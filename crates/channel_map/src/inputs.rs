//! Reading the boundary and channel documents from disk.

use std::error::Error;
use std::fmt;
use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::boundary::{BoundaryError, RegionBoundary};
use crate::catalog::{CatalogError, ChannelCatalog};
use crate::channel::{parse_channel_records, ChannelLoadError, ChannelRecord};

#[derive(Debug, Clone, PartialEq)]
pub enum LoadError {
    Boundary(BoundaryError),
    Channels(ChannelLoadError),
    Catalog(CatalogError),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Boundary(err) => write!(f, "boundary load failed: {err}"),
            LoadError::Channels(err) => write!(f, "channel load failed: {err}"),
            LoadError::Catalog(err) => write!(f, "catalog load failed: {err}"),
        }
    }
}

impl Error for LoadError {}

impl From<BoundaryError> for LoadError {
    fn from(value: BoundaryError) -> Self {
        LoadError::Boundary(value)
    }
}

impl From<ChannelLoadError> for LoadError {
    fn from(value: ChannelLoadError) -> Self {
        LoadError::Channels(value)
    }
}

impl From<CatalogError> for LoadError {
    fn from(value: CatalogError) -> Self {
        LoadError::Catalog(value)
    }
}

#[derive(Debug, Clone)]
pub struct MapInputs {
    pub boundary: RegionBoundary,
    pub records: Vec<ChannelRecord>,
}

pub fn load_map_inputs(boundary_path: &Path, channels_path: &Path) -> Result<MapInputs, LoadError> {
    let boundary = RegionBoundary::load(boundary_path)?;
    let records = load_channels_document(channels_path)?;
    Ok(MapInputs { boundary, records })
}

/// Accepts either a plain record array or a saved [`ChannelCatalog`].
pub fn load_channels_document(path: &Path) -> Result<Vec<ChannelRecord>, LoadError> {
    let content = fs::read_to_string(path).map_err(|err| ChannelLoadError::Io {
        path: path.display().to_string(),
        message: err.to_string(),
    })?;
    parse_channels_document(&content)
}

pub fn parse_channels_document(content: &str) -> Result<Vec<ChannelRecord>, LoadError> {
    let value: Value =
        serde_json::from_str(content).map_err(|err| ChannelLoadError::Json(err.to_string()))?;
    if value.is_array() {
        return Ok(parse_channel_records(content)?);
    }
    let catalog: ChannelCatalog = serde_json::from_value(value).map_err(CatalogError::from)?;
    Ok(catalog.to_records())
}
