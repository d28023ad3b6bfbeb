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

use serde::Serialize;

/// One decoded machine instruction as objdump printed it.
///
/// `encoding` holds the raw byte tokens in listing order, e.g. `["48", "89", "e5"]`.
/// An instruction whose bytes wrapped onto continuation lines still ends up as a
/// single `Instruction` with all of its bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Instruction {
    #[serde(rename = "bytes")]
    pub encoding: Vec<String>,
    pub text: String, // e.g., "push   %rbp"
}

impl Instruction {
    pub fn new(encoding: Vec<String>, text: String) -> Self {
        Self { encoding, text }
    }

    /// Number of encoded bytes.
    pub fn size(&self) -> usize {
        self.encoding.len()
    }
}

/// A function block opened by a `<addr> <name>:` label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
    pub name: String,
    pub address: String, // hex, exactly as printed in the label
    pub content: Vec<Instruction>,
}

impl Function {
    pub fn new(name: String, address: String) -> Self {
        Self {
            name,
            address,
            content: Vec::new(),
        }
    }

    pub fn size(&self) -> usize {
        self.content.iter().map(Instruction::size).sum()
    }

    pub fn instruction_count(&self) -> usize {
        self.content.len()
    }
}

/// Result of extracting a whole listing: functions in the order their labels appear.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    pub functions: Vec<Function>,
}

impl Listing {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sum of all function sizes.
    pub fn total_size(&self) -> usize {
        self.functions.iter().map(Function::size).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Function> {
        self.functions.iter()
    }

    /// First function with the given name. Listings of several object files
    /// may repeat a name; later ones are only reachable through `iter`.
    pub fn find(&self, name: &str) -> Option<&Function> {
        self.functions.iter().find(|f| f.name == name)
    }

    /// Keep only functions whose name is in `names`, preserving order.
    pub fn retain_names<S: AsRef<str>>(&mut self, names: &[S]) {
        self.functions
            .retain(|f| names.iter().any(|n| n.as_ref() == f.name));
    }
}

impl<'a> IntoIterator for &'a Listing {
    type Item = &'a Function;
    type IntoIter = std::slice::Iter<'a, Function>;

    fn into_iter(self) -> Self::IntoIter {
        self.functions.iter()
    }
}
