//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::cache::cache::Cache;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

#[derive(Clone)]
pub struct Filecache {
    pub basepath: String,
}

impl Filecache {
    pub fn fullpath(&self, path: &str) -> String {
        format!("{}/{}", self.basepath, path)
    }
}

impl Cache for Filecache {
    fn info(&self) -> String {
        format!("Tile directory: {}", self.basepath)
    }
    fn write(&self, path: &str, obj: &[u8]) -> Result<(), io::Error> {
        let fullpath = self.fullpath(path);
        debug!("Filecache.write {}", fullpath);
        let p = Path::new(&fullpath);
        fs::create_dir_all(p.parent().unwrap())?;
        let mut f = File::create(&fullpath)?;
        f.write_all(obj)
    }
    fn write_atomic(&self, path: &str, obj: &[u8]) -> Result<(), io::Error> {
        let fullpath = self.fullpath(path);
        debug!("Filecache.write_atomic {}", fullpath);
        let p = Path::new(&fullpath);
        fs::create_dir_all(p.parent().unwrap())?;
        // temp file in the target directory, committed with a single rename
        let tmppath = format!("{}.tmp", fullpath);
        {
            let mut f = File::create(&tmppath)?;
            f.write_all(obj)?;
        }
        fs::rename(&tmppath, &fullpath)
    }
    fn exists(&self, path: &str) -> bool {
        let fullpath = self.fullpath(path);
        Path::new(&fullpath).exists()
    }
}
