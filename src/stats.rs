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

//! Tally of the `KEY: n` counters the rolling pass prints to its log.

use anyhow::{Context, Result};
use log::{debug, warn};
use regex::Regex;
use std::collections::HashMap;
use std::io::Write;
use std::path::Path;

/// Counters reported by the pass, in report order.
pub const DEFAULT_KEYS: &[&str] = &[
    "MATCH",
    "IDENTICAL",
    "BINOP",
    "GEPSEQ",
    "INTSEQ",
    "ALTSEQ",
    "CONSTEXPR",
    "REDUCTION",
    "RECURRENCE",
    "MISMATCH",
    "MULTI",
];

pub struct CounterTally {
    keys: Vec<String>,
    counts: HashMap<String, i64>,
    re_counter: Regex,
}

impl Default for CounterTally {
    fn default() -> Self {
        Self::new(DEFAULT_KEYS)
    }
}

impl CounterTally {
    pub fn new<S: AsRef<str>>(keys: &[S]) -> Self {
        let keys: Vec<String> = keys.iter().map(|k| k.as_ref().to_string()).collect();
        let counts = keys.iter().map(|k| (k.clone(), 0)).collect();
        Self {
            keys,
            counts,
            // Exactly one ':' and an integer after it
            re_counter: Regex::new(r"^([^:]+):\s*([+-]?\d+)$").unwrap(),
        }
    }

    /// Add the counter on `line`, if any. Unknown keys are ignored.
    pub fn add_line(&mut self, line: &str) {
        let line = line.trim();
        let Some(caps) = self.re_counter.captures(line) else {
            return;
        };
        let Some(count) = self.counts.get_mut(&caps[1]) else {
            return;
        };
        match caps[2].parse::<i64>() {
            Ok(n) => match count.checked_add(n) {
                Some(sum) => *count = sum,
                None => warn!("counter {} overflows at '{}', keeping {}", &caps[1], line, count),
            },
            Err(e) => warn!("skipping counter line '{}': {}", line, e),
        }
    }

    pub fn add_text(&mut self, text: &str) {
        for line in text.lines() {
            self.add_line(line);
        }
    }

    pub fn add_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        self.add_text(&text);
        debug!("tallied counters from {}", path.display());
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<i64> {
        self.counts.get(key).copied()
    }

    /// `(key, count)` in key order, zero counters included.
    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> + '_ {
        self.keys
            .iter()
            .map(|k| (k.as_str(), self.counts.get(k).copied().unwrap_or(0)))
    }

    /// One `KEY count` line per counter.
    pub fn write_report<W: Write>(&self, out: &mut W) -> Result<()> {
        for (key, count) in self.iter() {
            writeln!(out, "{} {}", key, count)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sums_repeated_counters() {
        let mut tally = CounterTally::default();
        tally.add_text("MATCH:3\nBINOP: 2\n  MATCH:4  \nREDUCTION:1\n");
        assert_eq!(tally.get("MATCH"), Some(7));
        assert_eq!(tally.get("BINOP"), Some(2));
        assert_eq!(tally.get("REDUCTION"), Some(1));
        assert_eq!(tally.get("MULTI"), Some(0));
    }

    #[test]
    fn ignores_noise() {
        let mut tally = CounterTally::default();
        tally.add_text(
            "UNKNOWN:5\nMATCH:1:2\nMATCH: many\nMATCHED:9\nsome MATCH:2\nMISMATCH:-1\n",
        );
        assert_eq!(tally.get("MATCH"), Some(0));
        assert_eq!(tally.get("MISMATCH"), Some(-1));
        assert_eq!(tally.get("UNKNOWN"), None);
    }

    #[test]
    fn overflowing_counter_keeps_its_value() {
        let mut tally = CounterTally::default();
        tally.add_line("MULTI:9223372036854775807");
        tally.add_line("MULTI:1");
        tally.add_line("MULTI:99999999999999999999");
        assert_eq!(tally.get("MULTI"), Some(i64::MAX));
        tally.add_line("MULTI:-7");
        assert_eq!(tally.get("MULTI"), Some(i64::MAX - 7));
    }

    #[test]
    fn report_lists_every_key_in_order() {
        let mut tally = CounterTally::new(&["B", "A"]);
        tally.add_line("A:2");
        let mut out = Vec::new();
        tally.write_report(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "B 0\nA 2\n");
    }

    #[test]
    fn reads_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pass.log");
        std::fs::write(&path, "INTSEQ:10\nnoise\nINTSEQ:5\n").unwrap();
        let mut tally = CounterTally::default();
        tally.add_file(&path).unwrap();
        assert_eq!(tally.get("INTSEQ"), Some(15));
        assert!(tally.add_file(dir.path().join("missing.log")).is_err());
    }
}
