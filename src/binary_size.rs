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

//! Raw byte count of a listing, straight from the text.
//!
//! This does not build functions and keys on a different line shape than
//! `extract`: any `<hex>:` line whose first tab field is all hex tokens is
//! counted, whatever the number of tab fields. The two totals usually agree
//! on objdump output but are not guaranteed to.

use crate::hex::is_hex;

/// Count encoded bytes across every recognized line of `content`.
pub fn binary_size(content: &str) -> usize {
    binary_size_lines(content.lines())
}

/// Same as `binary_size` for a stream of lines, e.g. a file read line by line.
pub fn binary_size_lines<I, S>(lines: I) -> usize
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines.into_iter().map(|l| line_bytes(l.as_ref())).sum()
}

/// Bytes contributed by one line; 0 when the line is not an instruction line
/// or any of its byte tokens is malformed.
fn line_bytes(line: &str) -> usize {
    let mut parts = line.split(':');
    let (Some(offset), Some(rest)) = (parts.next(), parts.next()) else {
        return 0;
    };
    if !is_hex(offset.trim()) {
        return 0;
    }
    let Some(field) = rest.trim().split('\t').next() else {
        return 0;
    };
    let bytes: Vec<&str> = field.split_whitespace().collect();
    if bytes.iter().all(|b| is_hex(b)) {
        bytes.len()
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_colon_lines_count_nothing() {
        assert_eq!(binary_size(""), 0);
        assert_eq!(binary_size("just some text\n\tand a tab\n"), 0);
    }

    #[test]
    fn counts_objdump_bytes() {
        let text = "\
0000000000401126 <main>:
  401126:\t55                   \tpush   %rbp
  401127:\t48 89 e5             \tmov    %rsp,%rbp
  40112a:\t48 b8 00 00 00 00 00 \tmovabs $0x0,%rax
  401131:\t00 00 00 
";
        assert_eq!(binary_size(text), 14);
    }

    #[test]
    fn label_and_header_lines_are_skipped() {
        let text = "\
/tmp/a.o:     file format elf64-x86-64
Disassembly of section .text:
0000000000000000 <f>:
";
        assert_eq!(binary_size(text), 0);
    }

    #[test]
    fn one_bad_token_voids_the_line() {
        assert_eq!(binary_size("10:\t48 zz e5\tmov\n"), 0);
        assert_eq!(binary_size("10:\t48 89 e5\tmov\n20:\t48 xx\tmov\n"), 3);
    }

    #[test]
    fn counts_regardless_of_field_count() {
        // The extractor ignores a four-field line; the sizer does not.
        assert_eq!(binary_size("10:\t48 89\tmov\textra\n"), 2);
    }

    #[test]
    fn text_after_a_second_colon_does_not_matter() {
        assert_eq!(binary_size("10:\t64 48 8b 04 25\tmov %fs:0x28,%rax\n"), 5);
    }

    #[test]
    fn streamed_lines() {
        let lines = vec!["0:\t55\tpush\n", "1:\tc3\tret\n", "no"];
        assert_eq!(binary_size_lines(lines), 2);
    }
}
