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

//! Splits an objdump listing into functions and their instructions.
//!
//! objdump prints something like this for each function:
//!
//! ```text
//! 0000000000401126 <main>:
//!   401126:	55                   	push   %rbp
//!   401127:	48 89 e5             	mov    %rsp,%rbp
//!   40112a:	48 b8 00 00 00 00 00 	movabs $0x0,%rax
//!   401131:	00 00 00
//!
//! ```
//!
//! The label line opens a function, every tab-separated line with three fields
//! starts an instruction, and a two-field line carries bytes that wrapped from
//! the previous instruction. A blank line closes the current function.
//!
//! The parse is a fold over lines: `ExtractState::step` is the transition and
//! `ExtractState::finish` does the final flush. Unrecognized lines are skipped.

use log::{debug, trace};

use crate::hex::is_hex;
use crate::listing::{Function, Instruction, Listing};

/// Parser state between two lines.
#[derive(Debug, Default)]
pub struct ExtractState {
    functions: Vec<Function>,
    // Index into `functions` of the function that receives instructions
    current: Option<usize>,
    // Instruction still open for continuation bytes
    pending: Option<Instruction>,
}

impl ExtractState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume one line of the listing. `line` may still carry its newline.
    pub fn step(&mut self, line: &str) {
        if line.trim().is_empty() {
            self.flush();
            self.current = None;
            return;
        }

        // Both shapes are checked on every line, label first.
        if let Some((address, name)) = parse_label(line) {
            self.flush();
            self.functions
                .push(Function::new(name.to_string(), address.to_string()));
            self.current = Some(self.functions.len() - 1);
            trace!("function <{}> at {}", name, address);
        }

        if let Some(fields) = instruction_fields(line) {
            match fields.as_slice() {
                [_, bytes] => {
                    if let Some(inst) = self.pending.as_mut() {
                        inst.encoding.extend(split_bytes(bytes));
                    }
                }
                [_, bytes, text] => {
                    self.flush();
                    self.pending = Some(Instruction::new(
                        split_bytes(bytes),
                        text.trim().to_string(),
                    ));
                }
                _ => {}
            }
        }
    }

    /// Final flush; returns the functions in label order.
    pub fn finish(mut self) -> Listing {
        self.flush();
        debug!(
            "extracted {} functions, {} bytes",
            self.functions.len(),
            self.functions.iter().map(Function::size).sum::<usize>()
        );
        Listing {
            functions: self.functions,
        }
    }

    /// Commit the pending instruction to the current function. With no current
    /// function the instruction is dropped.
    fn flush(&mut self) {
        let Some(inst) = self.pending.take() else {
            return;
        };
        match self.current.and_then(|ix| self.functions.get_mut(ix)) {
            Some(func) => func.content.push(inst),
            None => debug!("dropping instruction outside any function: {}", inst.text),
        }
    }
}

/// Extract functions from a whole listing held in memory.
pub fn extract_functions(text: &str) -> Listing {
    extract_lines(text.lines())
}

/// Extract functions from any sequence of lines.
pub fn extract_lines<I, S>(lines: I) -> Listing
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut state = ExtractState::new();
    for line in lines {
        state.step(line.as_ref());
    }
    state.finish()
}

/// `<hex-address> <name>:` with optional trailing tokens.
fn parse_label(line: &str) -> Option<(&str, &str)> {
    let mut words = line.split_whitespace();
    let address = words.next()?;
    let tag = words.next()?;
    if !is_hex(address) || !tag.starts_with('<') || !tag.ends_with(">:") {
        return None;
    }
    Some((address, &tag[1..tag.len() - 2]))
}

/// Tab fields of a line whose first field is `<hex-address>:`.
fn instruction_fields(line: &str) -> Option<Vec<&str>> {
    let fields: Vec<&str> = line.split('\t').collect();
    let address = fields.first()?.trim().strip_suffix(':')?;
    if address.is_empty() || !is_hex(address) {
        return None;
    }
    Some(fields)
}

fn split_bytes(field: &str) -> Vec<String> {
    field.split_whitespace().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = "
a.out:     file format elf64-x86-64


Disassembly of section .text:

0000000000401126 <main>:
  401126:\t55                   \tpush   %rbp
  401127:\t48 89 e5             \tmov    %rsp,%rbp
  40112a:\t48 b8 00 00 00 00 00 \tmovabs $0x0,%rax
  401131:\t00 00 00 
  401134:\tc3                   \tret    

0000000000401135 <helper>:
  401135:\t31 c0                \txor    %eax,%eax
  401137:\tc3                   \tret    
";

    fn sizes(listing: &Listing) -> Vec<(&str, usize)> {
        listing
            .iter()
            .map(|f| (f.name.as_str(), f.size()))
            .collect()
    }

    #[test]
    fn objdump_listing() {
        let listing = extract_functions(LISTING);
        assert_eq!(sizes(&listing), vec![("main", 15), ("helper", 3)]);

        let main = &listing.functions[0];
        assert_eq!(main.address, "0000000000401126");
        assert_eq!(main.instruction_count(), 4);
        assert_eq!(main.content[0].text, "push   %rbp");
        assert_eq!(main.content[3].text, "ret");
        assert_eq!(listing.total_size(), 18);
    }

    #[test]
    fn two_functions_one_instruction_each() {
        let text = "0 <foo>:\n0:\t48 89 e5\tpush ...\n10 <bar>:\n0:\t48 89 e5\tpush ...\n";
        let listing = extract_functions(text);
        assert_eq!(listing.len(), 2);
        assert_eq!(listing.functions[0].name, "foo");
        assert_eq!(listing.functions[1].name, "bar");
        assert_eq!(listing.functions[1].address, "10");
        for f in &listing {
            assert_eq!(f.content.len(), 1);
            assert_eq!(f.content[0].size(), 3);
        }
    }

    #[test]
    fn continuation_extends_the_same_instruction() {
        let text = "0 <f>:\n0:\t48 b8 00 00\tmovabs $0x0,%rax\n4:\t00 00 00 00\n";
        let listing = extract_functions(text);
        let f = &listing.functions[0];
        assert_eq!(f.content.len(), 1);
        assert_eq!(f.content[0].size(), 8);
        assert_eq!(f.size(), 8);
    }

    #[test]
    fn continuation_without_pending_instruction_is_ignored() {
        let text = "0 <f>:\n4:\t00 00 00 00\n8:\tc3\tret\n";
        let listing = extract_functions(text);
        assert_eq!(sizes(&listing), vec![("f", 1)]);
    }

    #[test]
    fn blank_line_flushes_into_the_earlier_function() {
        let text = "0 <f>:\n0:\t55\tpush %rbp\n\n10 <g>:\n10:\tc3\tret\n";
        let listing = extract_functions(text);
        assert_eq!(sizes(&listing), vec![("f", 1), ("g", 1)]);
        assert_eq!(listing.functions[0].content[0].text, "push %rbp");
        assert_eq!(listing.functions[1].content[0].text, "ret");
    }

    #[test]
    fn blank_line_closes_function_context() {
        // The instruction after the blank has no function and is dropped.
        let text = "0 <f>:\n0:\t55\tpush %rbp\n   \n1:\tc3\tret\n";
        let listing = extract_functions(text);
        assert_eq!(sizes(&listing), vec![("f", 1)]);
    }

    #[test]
    fn instruction_before_any_label_is_dropped() {
        let text = "0:\t55\tpush %rbp\n1:\t00 00\n10 <g>:\n10:\tc3\tret\n";
        let listing = extract_functions(text);
        assert_eq!(listing.len(), 1);
        assert_eq!(listing.functions[0].content.len(), 1);
        assert_eq!(listing.functions[0].content[0].text, "ret");
    }

    #[test]
    fn label_flushes_pending_instruction() {
        let text = "0 <f>:\n0:\t55\tpush %rbp\n10 <g>:\n";
        let listing = extract_functions(text);
        assert_eq!(sizes(&listing), vec![("f", 1), ("g", 0)]);
    }

    #[test]
    fn unrecognized_shapes_are_skipped() {
        let text = "\
0 <f>:
0:\t55\tpush %rbp\textra
zz:\t55\tpush %rbp
:\t55\tpush %rbp
0: 55 push %rbp
0 f:
";
        let listing = extract_functions(text);
        assert_eq!(sizes(&listing), vec![("f", 0)]);
    }

    #[test]
    fn label_requires_two_tokens() {
        let listing = extract_functions("401126\n0:\t55\tpush\n");
        assert!(listing.is_empty());
    }

    #[test]
    fn label_keeps_only_first_two_tokens() {
        let listing = extract_functions("1000 <_start>: extra tokens\n");
        assert_eq!(listing.functions[0].name, "_start");
        assert_eq!(listing.functions[0].address, "1000");
    }

    #[test]
    fn empty_input_gives_empty_listing() {
        assert!(extract_functions("").is_empty());
        assert!(extract_functions("no labels here\n\n").is_empty());
    }

    #[test]
    fn lines_with_newlines_are_accepted() {
        let lines = vec!["0 <f>:\n", "0:\t55\tpush %rbp\n", "1:\t00\n"];
        let listing = extract_lines(lines);
        assert_eq!(listing.functions[0].size(), 2);
        assert_eq!(listing.functions[0].content[0].text, "push %rbp");
    }

    #[test]
    fn total_matches_sum_of_instruction_sizes() {
        let listing = extract_functions(LISTING);
        let summed: usize = listing
            .iter()
            .flat_map(|f| f.content.iter())
            .map(Instruction::size)
            .sum();
        assert_eq!(summed, listing.total_size());
    }

    #[test]
    fn step_by_step() {
        let mut state = ExtractState::new();
        state.step("0 <f>:");
        state.step("0:\t55\tpush %rbp");
        assert!(state.pending.is_some());
        assert!(state.functions[0].content.is_empty());
        state.step("");
        assert!(state.pending.is_none());
        assert_eq!(state.current, None);
        assert_eq!(state.functions[0].content.len(), 1);
        let listing = state.finish();
        assert_eq!(listing.total_size(), 1);
    }
}
