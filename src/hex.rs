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

/// Returns true if every character of `s` is a hex digit (either case).
///
/// The empty string is accepted. Callers that must reject empty tokens
/// have to check for that themselves.
pub fn is_hex(s: &str) -> bool {
    s.chars().all(|c| c.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_hex_digits_in_either_case() {
        assert!(is_hex("0123456789abcdef"));
        assert!(is_hex("ABCDEF"));
        assert!(is_hex("48"));
        assert!(is_hex("00000000004004d6"));
    }

    #[test]
    fn empty_is_hex() {
        assert!(is_hex(""));
    }

    #[test]
    fn rejects_any_non_hex_char() {
        assert!(!is_hex("0x10"));
        assert!(!is_hex("4g"));
        assert!(!is_hex(" 48"));
        assert!(!is_hex("<main>:"));
        assert!(!is_hex("push"));
        // Non-ASCII digits are not hex
        assert!(!is_hex("٣"));
    }
}
