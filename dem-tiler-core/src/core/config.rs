//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::core::gridcfg::ExtentCfg;
use regex::Regex;
use serde::Deserialize;
use std::collections::HashMap;
use std::env;
use std::error::Error;
use std::fs::File;
use std::io::prelude::*;
use tera::{Context, Tera};
use toml::Value;

pub trait Config<'a, C: Deserialize<'a>>
where
    Self: std::marker::Sized,
{
    /// Read configuration
    fn from_config(config: &C) -> Result<Self, String>;
    /// Generate configuration template
    fn gen_config() -> String;
    /// Generate configuration template with runtime information
    fn gen_runtime_config(&self) -> String {
        Self::gen_config()
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct ApplicationCfg {
    pub pipeline: PipelineCfg,
    pub grid: GridCfg,
    pub tileset: TilesetCfg,
}

#[derive(Deserialize, Clone, Debug)]
pub struct PipelineCfg {
    /// Input directory with DEM rasters (Cloud Optimized GeoTIFFs)
    pub input: String,
    /// Output terrain directory
    pub output: String,
}

#[derive(Deserialize, Clone, Debug)]
pub struct GridCfg {
    pub predefined: Option<String>,
    pub user: Option<UserGridCfg>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct UserGridCfg {
    /// The geographical extent covered by the grid, in degrees.
    /// Must be specified as 4 floating point numbers ordered as minx, miny, maxx, maxy.
    /// The (minx,maxy) point defines the top left corner of tile (0, 0) on every
    /// zoom level. The extent is uniformly subdivided into 2^zoom columns and rows.
    pub extent: ExtentCfg,
}

#[derive(Deserialize, Clone, Debug)]
pub struct TilesetCfg {
    /// Bounds to tile: minx, miny, maxx, maxy (EPSG:4326 degrees).
    /// If omitted, tiles the full grid extent.
    pub extent: Option<ExtentCfg>,
    /// The width and height of an individual tile, in pixels
    #[serde(default = "default_tile_size")]
    pub tile_size: u16,
    #[serde(default)]
    pub zoom_min: u8,
    #[serde(default = "default_zoom_max")]
    pub zoom_max: u8,
    /// Vertex sampling step for downstream mesh construction
    #[serde(default = "default_sample_step")]
    pub sample_step: u16,
    /// No-data value declared on generated tiles
    #[serde(default = "default_no_data")]
    pub no_data: f64,
}

pub fn default_tile_size() -> u16 {
    256
}

pub fn default_zoom_max() -> u8 {
    2
}

pub fn default_sample_step() -> u16 {
    4
}

pub fn default_no_data() -> f64 {
    -9999.0
}

pub const DEFAULT_CONFIG: &'static str = r#"
[pipeline]
input = "data/terrain/raw"
output = "data/terrain"

[grid]
predefined = "wgs84"

[tileset]
tile_size = 256
zoom_min = 0
zoom_max = 2
sample_step = 4
no_data = -9999.0
"#;

/// Load and parse the config file into an config struct.
pub fn read_config<'a, T: Deserialize<'a>>(path: &str) -> Result<T, String> {
    let mut file = match File::open(path) {
        Ok(file) => file,
        Err(_) => {
            return Err("Could not find config file!".to_string());
        }
    };
    let mut config_toml = String::new();
    if let Err(err) = file.read_to_string(&mut config_toml) {
        return Err(format!("Error while reading config: [{}]", err));
    };

    parse_config(config_toml, path)
}

/// Parse the configuration into an config struct.
pub fn parse_config<'a, T: Deserialize<'a>>(config_toml: String, path: &str) -> Result<T, String> {
    // Check for old ${var} expressions
    let re = Regex::new(r"\$\{([[:alnum:]]+)\}").unwrap();
    if re.is_match(&config_toml) {
        return Err(
            "Replace old environment variable syntax ${VARNAME} with `{{env.VARNAME}}`".to_string(),
        );
    }

    // Parse template
    let mut tera = Tera::default();
    tera.add_raw_template(path, &config_toml)
        .map_err(|e| format!("Template error: {}", e))?;
    let mut context = Context::new();
    let mut env = HashMap::new();
    for (key, value) in env::vars() {
        env.insert(key, value);
    }
    context.insert("env", &env);
    let toml = tera
        .render(path, &context)
        .map_err(|e| format!("Template error: {}", e.source().unwrap()))?;

    toml.parse::<Value>()
        .and_then(|cfg| cfg.try_into::<T>())
        .map_err(|err| format!("{} - {}", path, err))
}
