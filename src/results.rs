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

//! Benchmark result rows and their reduction against a baseline build.
//!
//! Input rows are `benchmark, variant, value`, e.g. the output of
//! `objsize extract` or `objsize text-size`. The benchmark name may itself
//! contain commas; the last two fields are always variant and value.

use anyhow::{anyhow, bail, Context, Result};
use log::{debug, warn};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

/// Display name for a build variant as it appears in result files.
pub fn format_variant(name: &str) -> String {
    match name {
        "reroll" | "llvm" => "LLVM",
        "rolled" | "rolling" => "RoLAG",
        "oracle" => "Oracle",
        other => other,
    }
    .to_string()
}

/// Benchmark -> variant -> value. A repeated (benchmark, variant) pair keeps
/// the last value.
#[derive(Debug, Default, Clone)]
pub struct ResultTable {
    pub data: BTreeMap<String, BTreeMap<String, f64>>,
}

impl ResultTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one row. Rows with fewer than three fields are skipped; a value
    /// that is not a number is an error.
    pub fn add_line(&mut self, line: &str) -> Result<()> {
        let vals: Vec<&str> = line.trim().split(',').collect();
        if vals.len() < 3 {
            if !line.trim().is_empty() {
                warn!("skipping result row '{}'", line.trim());
            }
            return Ok(());
        }
        let n = vals.len();
        // Commas inside the name keep their spacing, e.g. `f(int, int)`
        let key = vals[..n - 2].join(",").trim().to_string();
        let variant = format_variant(vals[n - 2].trim());
        let value: f64 = vals[n - 1]
            .trim()
            .parse()
            .with_context(|| format!("bad value in result row '{}'", line.trim()))?;
        self.data.entry(key).or_default().insert(variant, value);
        Ok(())
    }

    pub fn from_text(text: &str) -> Result<Self> {
        let mut table = Self::new();
        for (ix, line) in text.lines().enumerate() {
            table
                .add_line(line)
                .with_context(|| format!("line {}", ix + 1))?;
        }
        Ok(table)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let table = Self::from_text(&text).with_context(|| format!("in {}", path.display()))?;
        debug!("{} benchmarks in {}", table.data.len(), path.display());
        Ok(table)
    }

    pub fn get(&self, benchmark: &str, variant: &str) -> Option<f64> {
        self.data.get(benchmark)?.get(variant).copied()
    }
}

#[derive(Debug, Clone)]
pub struct ReductionConfig {
    pub baseline: String,
    /// Variants to compare.
    pub groups: Vec<String>,
    /// Extra leading column holding the best (smallest) of the group values,
    /// or of the table's own value under this name when that is smaller.
    pub oracle: Option<String>,
    /// Columns ordering the rows, most significant first. Empty means the
    /// last group.
    pub sort_by: Vec<String>,
    /// Benchmarks left out entirely (harness functions and the like).
    pub ignore: Vec<String>,
    /// Keep benchmarks where no group changed anything.
    pub keep_unchanged: bool,
}

impl Default for ReductionConfig {
    fn default() -> Self {
        Self {
            baseline: "baseline".to_string(),
            groups: vec!["LLVM".to_string(), "RoLAG".to_string()],
            oracle: None,
            sort_by: Vec::new(),
            ignore: Vec::new(),
            keep_unchanged: false,
        }
    }
}

impl ReductionConfig {
    /// Report columns: the oracle first, then the groups.
    pub fn columns(&self) -> Vec<String> {
        self.oracle
            .iter()
            .chain(self.groups.iter())
            .cloned()
            .collect()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReductionRow {
    pub benchmark: String,
    /// Percent reduction per group, in group order
    pub reductions: Vec<(String, f64)>,
}

impl ReductionRow {
    pub fn get(&self, group: &str) -> Option<f64> {
        self.reductions
            .iter()
            .find(|(g, _)| g == group)
            .map(|(_, v)| *v)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReductionReport {
    pub baseline: String,
    pub groups: Vec<String>,
    pub rows: Vec<ReductionRow>,
    /// Rows where the group shrank the benchmark
    pub positive: BTreeMap<String, usize>,
    /// Mean reduction per group over all rows
    pub average: BTreeMap<String, f64>,
}

/// `(baseline - value) / baseline * 100`, or None for a zero baseline.
pub fn reduction_percent(baseline: f64, value: f64) -> Option<f64> {
    if baseline == 0.0 {
        return None;
    }
    Some((baseline - value) / baseline * 100.0)
}

impl ReductionReport {
    pub fn build(table: &ResultTable, config: &ReductionConfig) -> Result<Self> {
        let Some(last_group) = config.groups.last() else {
            return Err(anyhow!("at least one group is required"));
        };
        let columns = config.columns();
        let sort_by: Vec<&String> = if config.sort_by.is_empty() {
            vec![last_group]
        } else {
            config.sort_by.iter().collect()
        };
        if let Some(unknown) = sort_by.iter().find(|k| !columns.contains(**k)) {
            bail!("cannot sort by '{}', it is not a reported column", unknown);
        }

        let mut rows = Vec::new();
        for (bench, values) in &table.data {
            if config.ignore.iter().any(|k| k == bench) {
                continue;
            }
            let Some(&base) = values.get(&config.baseline) else {
                continue;
            };
            let Some(group_values) = config
                .groups
                .iter()
                .map(|g| values.get(g).copied())
                .collect::<Option<Vec<f64>>>()
            else {
                continue;
            };
            let mut column_values = Vec::with_capacity(columns.len());
            if let Some(oracle) = &config.oracle {
                let best = group_values
                    .iter()
                    .copied()
                    .chain(values.get(oracle).copied())
                    .fold(f64::INFINITY, f64::min);
                column_values.push(best);
            }
            column_values.extend(group_values);
            if !config.keep_unchanged && column_values.iter().all(|v| *v == base) {
                continue;
            }

            let mut reductions = Vec::with_capacity(columns.len());
            for (column, value) in columns.iter().zip(column_values) {
                match reduction_percent(base, value) {
                    Some(r) => reductions.push((column.clone(), r)),
                    None => break,
                }
            }
            if reductions.len() != columns.len() {
                warn!("skipping {}: zero baseline", bench);
                continue;
            }
            rows.push(ReductionRow {
                benchmark: bench.clone(),
                reductions,
            });
        }

        rows.sort_by(|a, b| {
            sort_by
                .iter()
                .map(|k| {
                    let ka = a.get(k).unwrap_or(0.0);
                    let kb = b.get(k).unwrap_or(0.0);
                    ka.total_cmp(&kb)
                })
                .find(|o| o.is_ne())
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.benchmark.cmp(&b.benchmark))
        });

        let mut positive = BTreeMap::new();
        let mut average = BTreeMap::new();
        for group in &columns {
            let vals: Vec<f64> = rows.iter().filter_map(|r| r.get(group)).collect();
            positive.insert(group.clone(), vals.iter().filter(|v| **v > 0.0).count());
            if !vals.is_empty() {
                average.insert(group.clone(), vals.iter().sum::<f64>() / vals.len() as f64);
            }
        }

        Ok(Self {
            baseline: config.baseline.clone(),
            groups: columns,
            rows,
            positive,
            average,
        })
    }

    /// `benchmark, group, reduction` rows followed by `#` summary lines.
    pub fn write_csv<W: Write>(&self, out: &mut W, decimals: usize) -> Result<()> {
        for row in &self.rows {
            for (group, r) in &row.reductions {
                writeln!(out, "{}, {}, {:.*}", row.benchmark, group, decimals, r)?;
            }
        }
        for group in &self.groups {
            let count = self.positive.get(group).copied().unwrap_or(0);
            writeln!(out, "# positive, {}, {}", group, count)?;
            if let Some(avg) = self.average.get(group) {
                writeln!(out, "# average, {}, {:.*}", group, decimals, avg)?;
            }
        }
        Ok(())
    }
}
