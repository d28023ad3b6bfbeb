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
use object::{Object, ObjectSection, SectionKind};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Berkeley-style section totals of an object file, the same split
/// `size`/`llvm-size` print by default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SectionTotals {
    /// Code plus read-only data
    pub text: u64,
    pub data: u64,
    pub bss: u64,
}

impl SectionTotals {
    pub fn total(&self) -> u64 {
        self.text + self.data + self.bss
    }

    fn add(&mut self, kind: SectionKind, size: u64) {
        match kind {
            SectionKind::Text | SectionKind::ReadOnlyData | SectionKind::ReadOnlyString => {
                self.text += size
            }
            // .data.rel.ro is writable until relocation
            SectionKind::Data | SectionKind::ReadOnlyDataWithRel | SectionKind::Tls => {
                self.data += size
            }
            SectionKind::UninitializedData
            | SectionKind::UninitializedTls
            | SectionKind::Common => self.bss += size,
            _ => {}
        }
    }
}

/// Section totals of an in-memory object file (ELF, Mach-O, COFF, ...).
pub fn section_totals(file_data: &[u8]) -> Result<SectionTotals> {
    let obj_file = object::File::parse(file_data)?;
    let mut totals = SectionTotals::default();
    for section in obj_file.sections() {
        let kind = section.kind();
        debug!(
            "section {} kind {:?} size 0x{:x}",
            section.name().unwrap_or("?"),
            kind,
            section.size()
        );
        totals.add(kind, section.size());
    }
    Ok(totals)
}

/// Section totals of the object file at `path`.
pub fn section_totals_of<P: AsRef<Path>>(path: P) -> Result<SectionTotals> {
    let path = path.as_ref();
    let file_data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    section_totals(&file_data).with_context(|| format!("parsing {}", path.display()))
}
