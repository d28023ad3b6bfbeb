// Copyright (c) 2026 objsize Authors.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use anyhow::{Context, Result};
use log::debug;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::binary_size::binary_size;
use crate::extract::{extract_functions, ExtractState};
use crate::listing::Listing;

/// Where a disassembly listing comes from.
///
/// A file is opened for the duration of a single call and streamed line by
/// line; it is closed again before the call returns, on error paths too.
#[derive(Debug, Clone)]
pub enum ListingSource {
    Path(PathBuf),
    Text(String),
}

impl ListingSource {
    pub fn path<P: AsRef<Path>>(path: P) -> Self {
        Self::Path(path.as_ref().to_path_buf())
    }

    pub fn text<S: Into<String>>(text: S) -> Self {
        Self::Text(text.into())
    }

    /// Run the extractor over the listing.
    pub fn extract(&self) -> Result<Listing> {
        match self {
            Self::Text(text) => Ok(extract_functions(text)),
            Self::Path(path) => {
                let mut state = ExtractState::new();
                for_each_line(path, |line| state.step(line))?;
                Ok(state.finish())
            }
        }
    }

    /// Raw byte count of the listing, see `binary_size`.
    pub fn binary_size(&self) -> Result<usize> {
        match self {
            Self::Text(text) => Ok(binary_size(text)),
            Self::Path(path) => {
                let mut count = 0;
                for_each_line(path, |line| count += binary_size(line))?;
                Ok(count)
            }
        }
    }
}

/// Stream `path` line by line without the trailing CR/LF. Invalid UTF-8 is
/// replaced rather than rejected; objdump passes symbol names through as raw
/// bytes.
fn for_each_line<F: FnMut(&str)>(path: &Path, mut f: F) -> Result<()> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let mut reader = BufReader::with_capacity(64 * 1024, file);
    let mut buf: Vec<u8> = Vec::with_capacity(8 * 1024);

    let mut count = 0usize;
    loop {
        buf.clear();
        let n = reader
            .read_until(b'\n', &mut buf)
            .with_context(|| format!("reading {}", path.display()))?;
        if n == 0 {
            break; // EOF
        }

        // strip trailing CR/LF
        while buf.last().is_some_and(|b| *b == b'\n' || *b == b'\r') {
            buf.pop();
        }

        f(&String::from_utf8_lossy(&buf));
        count += 1;
    }
    debug!("read {} lines from {}", count, path.display());
    Ok(())
}
