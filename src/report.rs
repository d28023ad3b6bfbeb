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

//! Rendering of per-function sizes.
//!
//! The CSV form is one `name, label, size` row per function, which is what the
//! result aggregation in `results` reads back. The label tags the build variant
//! (`baseline`, `rolling`, ...) the listing came from.

use anyhow::Result;
use serde::Serialize;
use serde_json::Value;
use std::io::Write;

use crate::listing::{Function, Instruction, Listing};

#[derive(Serialize, Debug)]
pub struct SizeRecord<'a> {
    pub name: &'a str,
    pub address: &'a str,
    pub size: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<&'a [Instruction]>,
}

impl<'a> SizeRecord<'a> {
    pub fn from_function(func: &'a Function, with_instructions: bool) -> Self {
        Self {
            name: &func.name,
            address: &func.address,
            size: func.size(),
            instructions: with_instructions.then_some(func.content.as_slice()),
        }
    }
}

/// Write one `name, label, size` row per function.
pub fn write_csv<W: Write>(out: &mut W, listing: &Listing, label: &str) -> Result<()> {
    for func in listing {
        writeln!(out, "{}, {}, {}", func.name, label, func.size())?;
    }
    Ok(())
}

/// JSON array of size records, optionally with each function's instructions.
pub fn to_json(listing: &Listing, with_instructions: bool) -> Result<Value> {
    let records: Vec<SizeRecord> = listing
        .iter()
        .map(|f| SizeRecord::from_function(f, with_instructions))
        .collect();
    Ok(serde_json::to_value(records)?)
}
