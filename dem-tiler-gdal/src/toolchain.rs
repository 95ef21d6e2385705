//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

//! External GDAL raster toolchain invoked as opaque commands

use dem_grid::Extent;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use thiserror::Error;

/// GDAL CLI tools required by the pipeline
pub const GDAL_REQUIRED: [&str; 4] = ["gdalinfo", "gdalbuildvrt", "gdalwarp", "gdal_translate"];

/// Height range substituted when band statistics are unavailable
pub const FALLBACK_HEIGHT_RANGE: (f64, f64) = (-1000.0, 9000.0);

#[derive(Error, Debug)]
pub enum GdalError {
    #[error("Missing {tool} in PATH. Install GDAL CLI tools first.")]
    MissingTool { tool: String },
    #[error("{tool} failed with {status}")]
    ToolFailure { tool: String, status: ExitStatus },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Clone, Debug, Default)]
pub struct GdalToolchain;

impl GdalToolchain {
    /// Check tool availability. The first missing tool is fatal.
    pub fn require() -> Result<(), GdalError> {
        for tool in &GDAL_REQUIRED {
            let found = Command::new("which")
                .arg(tool)
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status()
                .map(|status| status.success())
                .unwrap_or(false);
            if !found {
                return Err(GdalError::MissingTool {
                    tool: tool.to_string(),
                });
            }
        }
        Ok(())
    }

    fn run(tool: &str, args: &[String]) -> Result<(), GdalError> {
        info!("+ {} {}", tool, args.join(" "));
        let status = Command::new(tool).args(args).status()?;
        if !status.success() {
            return Err(GdalError::ToolFailure {
                tool: tool.to_string(),
                status,
            });
        }
        Ok(())
    }

    /// Mosaic the source rasters into a VRT
    pub fn build_vrt(&self, inputs: &[PathBuf], vrt: &Path) -> Result<(), GdalError> {
        let mut args = vec![vrt.display().to_string()];
        args.extend(inputs.iter().map(|p| p.display().to_string()));
        Self::run("gdalbuildvrt", &args)
    }

    /// Reproject to geographic EPSG:4326 with bilinear resampling
    pub fn warp_wgs84(&self, src: &Path, dst: &Path, no_data: f64) -> Result<(), GdalError> {
        Self::run("gdalwarp", &warp_args(src, dst, no_data))
    }

    /// Min/max sample statistics over the primary band
    ///
    /// Unavailable or malformed statistics are substituted with
    /// [`FALLBACK_HEIGHT_RANGE`], never propagated as an error.
    pub fn raster_stats(&self, path: &Path) -> Result<(f64, f64), GdalError> {
        info!("+ gdalinfo -stats -mm -json {}", path.display());
        let output = Command::new("gdalinfo")
            .args(&["-stats", "-mm", "-json"])
            .arg(path)
            .stderr(Stdio::null())
            .output()?;
        if !output.status.success() {
            return Err(GdalError::ToolFailure {
                tool: "gdalinfo".to_string(),
                status: output.status,
            });
        }
        let stats = parse_band_stats(&String::from_utf8_lossy(&output.stdout));
        if stats.is_none() {
            warn!(
                "No band statistics in {}, using fallback height range",
                path.display()
            );
        }
        Ok(stats.unwrap_or(FALLBACK_HEIGHT_RANGE))
    }

    /// Extract one tile's sample grid from `src`: `tile_size` x `tile_size`
    /// Float32 samples, band interleaved by line, with the declared no-data
    /// value
    pub fn extract_tile(
        &self,
        src: &Path,
        dst: &Path,
        extent: &Extent,
        tile_size: u16,
        no_data: f64,
    ) -> Result<(), GdalError> {
        Self::run(
            "gdal_translate",
            &translate_args(src, dst, extent, tile_size, no_data),
        )
    }
}

/// `gdalwarp` argument list
pub(crate) fn warp_args(src: &Path, dst: &Path, no_data: f64) -> Vec<String> {
    vec![
        "-t_srs".to_string(),
        "EPSG:4326".to_string(),
        "-r".to_string(),
        "bilinear".to_string(),
        "-dstnodata".to_string(),
        no_data.to_string(),
        "-overwrite".to_string(),
        src.display().to_string(),
        dst.display().to_string(),
    ]
}

/// `gdal_translate` argument list. `-projwin` takes the window as
/// ulx uly lrx lry.
pub(crate) fn translate_args(
    src: &Path,
    dst: &Path,
    extent: &Extent,
    tile_size: u16,
    no_data: f64,
) -> Vec<String> {
    vec![
        "-projwin".to_string(),
        extent.minx.to_string(),
        extent.maxy.to_string(),
        extent.maxx.to_string(),
        extent.miny.to_string(),
        "-projwin_srs".to_string(),
        "EPSG:4326".to_string(),
        "-outsize".to_string(),
        tile_size.to_string(),
        tile_size.to_string(),
        "-ot".to_string(),
        "Float32".to_string(),
        "-of".to_string(),
        "ENVI".to_string(),
        "-co".to_string(),
        "INTERLEAVE=BIL".to_string(),
        "-a_nodata".to_string(),
        no_data.to_string(),
        src.display().to_string(),
        dst.display().to_string(),
    ]
}

/// Extract STATISTICS_MINIMUM/STATISTICS_MAXIMUM of the first band from
/// `gdalinfo -json` output
pub(crate) fn parse_band_stats(json: &str) -> Option<(f64, f64)> {
    let data: Value = serde_json::from_str(json).ok()?;
    let band = data.get("bands")?.as_array()?.first()?;
    let stats = band.get("metadata")?.get("")?;
    let min: f64 = stats.get("STATISTICS_MINIMUM")?.as_str()?.parse().ok()?;
    let max: f64 = stats.get("STATISTICS_MAXIMUM")?.as_str()?.parse().ok()?;
    if !min.is_finite() || !max.is_finite() || min > max {
        return None;
    }
    Some((min, max))
}
