//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use std::io;

pub trait Cache {
    fn info(&self) -> String;
    fn write(&self, path: &str, obj: &[u8]) -> Result<(), io::Error>;
    /// Replace-on-write: readers never observe partial content
    fn write_atomic(&self, path: &str, obj: &[u8]) -> Result<(), io::Error>;
    fn exists(&self, path: &str) -> bool;
}
