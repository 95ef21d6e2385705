//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use dem_grid::{Extent, ExtentInt, Grid, GridIterator};
use dem_tiler_core::cache::{Cache, Filecache};
use dem_tiler_core::core::{ApplicationCfg, Config};
use dem_tiler_core::service::tileset::{tile_path, Tileset};
use dem_tiler_gdal::{GdalError, GdalToolchain};
use pbr::ProgressBar;
use std::cmp;
use std::fs;
use std::io::Stdout;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::task;

/// DEM tile pyramid service
#[derive(Clone)]
pub struct DemService {
    pub grid: Grid,
    pub tileset: Tileset,
    pub toolchain: GdalToolchain,
    pub cache: Filecache,
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
}

/// Pipeline failure. The first error aborts the whole run; reruns resume by
/// skipping already produced tiles.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("No .tif files found in {0}")]
    NoInput(String),
    #[error(transparent)]
    Gdal(#[from] GdalError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

type TileTask = task::JoinHandle<Result<(), GdalError>>;

impl DemService {
    /// Source rasters sorted by file name
    fn collect_inputs(&self) -> Result<Vec<PathBuf>, PipelineError> {
        let mut cogs = Vec::new();
        for entry in fs::read_dir(&self.input_dir)? {
            let path = entry?.path();
            if path.extension().map_or(false, |ext| ext == "tif") {
                cogs.push(path);
            }
        }
        cogs.sort();
        if cogs.is_empty() {
            return Err(PipelineError::NoInput(self.input_dir.display().to_string()));
        }
        Ok(cogs)
    }

    /// Mosaic and reproject the inputs; all tiles are extracted from the
    /// resulting raster
    fn prepare_source(&self, work_dir: &Path) -> Result<PathBuf, PipelineError> {
        let cogs = self.collect_inputs()?;
        info!("Mosaicking {} input rasters", cogs.len());
        let vrt_path = work_dir.join("dem_raw.vrt");
        self.toolchain.build_vrt(&cogs, &vrt_path)?;
        let warped_path = work_dir.join("dem_4326.tif");
        self.toolchain
            .warp_wgs84(&vrt_path, &warped_path, self.tileset.no_data)?;
        Ok(warped_path)
    }

    fn progress_bar(&self, msg: &str, limit: &ExtentInt) -> ProgressBar<Stdout> {
        let tiles = (limit.maxx as u64 - limit.minx as u64 + 1)
            * (limit.maxy as u64 - limit.miny as u64 + 1);
        let mut pb = ProgressBar::new(tiles);
        pb.message(msg);
        pb.show_speed = false;
        pb.show_percent = false;
        pb.show_time_left = false;
        pb
    }

    /// Generate the tile pyramid and commit the tileset descriptor
    ///
    /// `bbox` overrides the configured tileset extent. Existing tiles are
    /// skipped unless `overwrite` is set.
    pub fn generate(
        &self,
        bbox: Option<&Extent>,
        progress: bool,
        overwrite: bool,
    ) -> Result<(), PipelineError> {
        GdalToolchain::require()?;
        let rt = tokio::runtime::Runtime::new().expect("Couldn't initialize tokio runtime");

        let work_dir = self.output_dir.join("working");
        fs::create_dir_all(&work_dir)?;
        fs::create_dir_all(self.output_dir.join("tiles"))?;
        fs::create_dir_all(self.output_dir.join("metadata"))?;

        let source = self.prepare_source(&work_dir)?;
        let height_range = self.toolchain.raster_stats(&source)?;

        let query = bbox
            .cloned()
            .unwrap_or_else(|| self.tileset.query_extent(&self.grid));
        debug!("query extent: {:?}", query);
        let limits = self.grid.level_limits(&query, self.tileset.zoom_max);

        rt.block_on(self.generate_tiles(&source, limits, progress, overwrite))?;

        // All tiles exist now; the descriptor is the commit point of the run
        self.write_descriptor(height_range)?;
        if progress {
            println!("");
        }
        Ok(())
    }

    async fn generate_tiles(
        &self,
        source: &Path,
        limits: Vec<Option<ExtentInt>>,
        progress: bool,
        overwrite: bool,
    ) -> Result<(), PipelineError> {
        // Queue of tile extractions waiting for parallel execution. Each
        // subprocess blocks a thread, so extractions run via spawn_blocking.
        let task_queue_size = cmp::min(num_cpus::get() * 2, 64);
        let mut tasks: Vec<TileTask> = Vec::with_capacity(task_queue_size);
        let griditer = GridIterator::new(self.tileset.zoom_min, self.tileset.zoom_max, limits.clone());
        let mut pb = ProgressBar::new(0);
        let mut pb_z = !self.tileset.zoom_min;
        for (zoom, xtile, ytile) in griditer {
            if progress && zoom != pb_z {
                pb_z = zoom;
                let limit = limits[zoom as usize].as_ref().unwrap();
                debug!("level {}: {:?}", zoom, limit);
                pb = self.progress_bar(&format!("Level {}: ", zoom), limit);
                pb.tick();
            }

            let path = tile_path(zoom, xtile, ytile);
            if overwrite || !self.cache.exists(&path) {
                // Entry doesn't exist, or overwrite is forced, so extract it.
                // No two tasks ever target the same output path.
                let toolchain = self.toolchain.clone();
                let extent = self.grid.tile_extent(xtile, ytile, zoom);
                let src = source.to_path_buf();
                let dst = Path::new(&self.cache.basepath).join(&path);
                let tile_size = self.tileset.tile_size;
                let no_data = self.tileset.no_data;
                fs::create_dir_all(dst.parent().unwrap())?;
                tasks.push(task::spawn(async move {
                    task::spawn_blocking(move || {
                        toolchain.extract_tile(&src, &dst, &extent, tile_size, no_data)
                    })
                    .await
                    .unwrap()
                }));
                if tasks.len() >= task_queue_size {
                    tasks = await_one_task(tasks).await?;
                }
            }

            if progress {
                pb.inc();
            }
        }
        // Drain remaining tasks; the first failure aborts the run
        for tile_task in tasks {
            tile_task.await.unwrap()?;
        }
        Ok(())
    }
}

/// Wait for one queued task; its failure aborts the run
async fn await_one_task(tasks: Vec<TileTask>) -> Result<Vec<TileTask>, GdalError> {
    let (result, _index, remaining) = futures_util::future::select_all(tasks).await;
    result.unwrap()?;
    Ok(remaining)
}

impl<'a> Config<'a, ApplicationCfg> for DemService {
    fn from_config(config: &ApplicationCfg) -> Result<Self, String> {
        let grid = Grid::from_config(&config.grid)?;
        let tileset = Tileset::from_config(&config.tileset)?;
        let cache = Filecache {
            basepath: config.pipeline.output.clone(),
        };
        Ok(DemService {
            grid,
            tileset,
            toolchain: GdalToolchain,
            cache,
            input_dir: PathBuf::from(&config.pipeline.input),
            output_dir: PathBuf::from(&config.pipeline.output),
        })
    }
    fn gen_config() -> String {
        let mut config = String::new();
        config.push_str(TOML_PIPELINE);
        config.push_str(&Grid::gen_config());
        config.push_str(&Tileset::gen_config());
        config
    }
}

const TOML_PIPELINE: &'static str = r#"# dem-tiler configuration

[pipeline]
input = "data/terrain/raw"
output = "data/terrain"
"#;
