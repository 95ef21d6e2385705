//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::cache::cache::Cache;
use crate::cache::filecache::Filecache;
use std::fs;
use std::path::Path;

#[test]
fn test_dircache() {
    use std::env;

    let mut dir = env::temp_dir();
    dir.push("dem_tiler_test");
    let basepath = format!("{}", &dir.display());
    let _ = fs::remove_dir_all(&basepath);

    let cache = Filecache { basepath };
    let path = "tiles/0/1/2.bin";
    let fullpath = cache.fullpath(path);
    let obj = "0123456789";

    // Cache miss
    assert_eq!(cache.exists(path), false);

    // Write into cache
    let _ = cache.write(path, obj.as_bytes());
    assert!(Path::new(&fullpath).exists());

    // Cache hit
    assert_eq!(cache.exists(path), true);

    // Read from cache
    let s = fs::read_to_string(&fullpath).unwrap();
    assert_eq!(&s, "0123456789");
}

#[test]
fn test_atomic_write() {
    use std::env;

    let mut dir = env::temp_dir();
    dir.push("dem_tiler_atomic_test");
    let basepath = format!("{}", &dir.display());
    let _ = fs::remove_dir_all(&basepath);

    let cache = Filecache { basepath };
    let path = "metadata/tileset.json";
    let fullpath = cache.fullpath(path);

    cache.write_atomic(path, b"{\"version\": 1}").unwrap();
    assert_eq!(fs::read_to_string(&fullpath).unwrap(), "{\"version\": 1}");
    // no temp file left behind after the rename
    assert!(!Path::new(&format!("{}.tmp", fullpath)).exists());

    // replacing an existing descriptor leaves the new content
    cache.write_atomic(path, b"{\"version\": 2}").unwrap();
    assert_eq!(fs::read_to_string(&fullpath).unwrap(), "{\"version\": 2}");
}
