//! Pattern-based mutators over CMake build descriptions.
//!
//! The build file is treated as text with recognizable shapes, not parsed
//! into a tree. Each mutation category pairs a matcher with a renderer:
//!
//! - [`mutator`]: the update / anchored insert / prepend primitive
//! - [`variables`]: `set(NAME VALUE)` statements
//! - [`functions`]: `target_*(<target> ...)` argument blocks
//! - [`sections`]: the source glob scaffold and the managed extra section
//! - [`chip`]: chip identifier detection in the generated CubeMX file
//!
//! Every mutator is a pure `&str -> String` function and is idempotent.
pub mod chip;
pub mod functions;
pub mod mutator;
pub mod sections;
pub mod variables;

pub use functions::{FunctionsPatch, MergeOutcome, merge_function, merge_functions};
pub use mutator::{Statement, Upsert, upsert_statement};
pub use sections::{
    EXTRA_HEADER, ExtraSectionPatch, SOURCES_HEADER, SourceGlobPatch, replace_extra_section,
    replace_source_glob,
};
pub use variables::{SetStatement, VariablesPatch, upsert_variables};
