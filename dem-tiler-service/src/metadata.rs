//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::dem_service::{DemService, PipelineError};
use dem_tiler_core::cache::Cache;
use dem_tiler_core::service::tileset::TilesetDescriptor;

/// Descriptor location within the output directory
pub const DESCRIPTOR_PATH: &str = "metadata/tileset.json";

impl DemService {
    /// Tileset descriptor of a completed run
    pub fn descriptor(&self, height_range: (f64, f64)) -> TilesetDescriptor {
        TilesetDescriptor::new(&self.tileset, &self.grid, height_range.0, height_range.1)
    }

    /// Build the full record in memory, then perform one atomic file replace.
    /// Must only be called after all tile extraction has completed.
    pub fn write_descriptor(&self, height_range: (f64, f64)) -> Result<(), PipelineError> {
        let descriptor = self.descriptor(height_range);
        self.cache
            .write_atomic(DESCRIPTOR_PATH, descriptor.to_json().as_bytes())?;
        info!("Wrote tileset: {}", self.cache.fullpath(DESCRIPTOR_PATH));
        Ok(())
    }
}
