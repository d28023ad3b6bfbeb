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

use crate::listing::Listing;

/// Demangle a symbol name from a label.
///
/// Rust is tried first since legacy Rust symbols are also valid Itanium C++
/// manglings. Names that are not mangled come back unchanged.
pub fn demangle(name: &str) -> String {
    if let Ok(sym) = rustc_demangle::try_demangle(name) {
        // {:#} drops the trailing hash
        return format!("{:#}", sym);
    }
    if let Ok(sym) = cpp_demangle::Symbol::new(name) {
        if let Ok(s) = sym.demangle() {
            return s;
        }
    }
    name.to_string()
}

/// Replace every function name in `listing` with its demangled form.
pub fn demangle_listing(listing: &mut Listing) {
    for func in listing.functions.iter_mut() {
        func.name = demangle(&func.name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::extract_functions;

    #[test]
    fn rust_legacy_symbol() {
        assert_eq!(
            demangle("_ZN4core3fmt5write17h0123456789abcdefE"),
            "core::fmt::write"
        );
    }

    #[test]
    fn cpp_symbol() {
        assert_eq!(demangle("_Z3fooi"), "foo(int)");
    }

    #[test]
    fn cpp_function_pointer_parameter() {
        assert_eq!(demangle("_Z13time_functionPFvvE"), "time_function(void (*)())");
    }

    #[test]
    fn plain_names_pass_through() {
        assert_eq!(demangle("main"), "main");
        assert_eq!(demangle("s122"), "s122");
        assert_eq!(demangle(""), "");
    }

    #[test]
    fn listing_names_are_rewritten() {
        let mut listing = extract_functions("0 <_Z3fooi>:\n0:\tc3\tret\n10 <main>:\n");
        demangle_listing(&mut listing);
        assert_eq!(listing.functions[0].name, "foo(int)");
        assert_eq!(listing.functions[1].name, "main");
        assert_eq!(listing.functions[0].address, "0");
    }
}
