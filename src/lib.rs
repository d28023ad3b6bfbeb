// Crate root: declare modules and control visibility
pub mod binary_size;
pub mod demangle;
pub mod extract;
pub mod hex;
pub mod listing;
pub mod report;
pub mod results;
pub mod source;
pub mod stats;
pub mod text_size;

// Re-export commonly used API from the library for binaries/tests
pub use binary_size::binary_size;
pub use extract::extract_functions;
pub use hex::is_hex;
pub use listing::{Function, Instruction, Listing};
pub use source::ListingSource;
