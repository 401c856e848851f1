//! Compiler for a hybrid scripting notation: Python host code with
//! inline shell invocations marked by a bang (`!`).
//!
//! Every shell region of the input is rewritten into a call to a
//! `bang_call` helper, and the output is a runnable Python program
//! prefixed with a fixed helper preamble.
//!
//! # Quick start
//!
//! ## Expand host text
//!
//! Dollar references in plain host code become soft lookups:
//!
//! ```
//! use pybang::{Options, expand_source};
//!
//! let out = expand_source("print($1)\n", &Options::default()).unwrap();
//! assert_eq!(out, "print(softindex(sys.argv, 1))\n");
//! ```
//!
//! ## Compile a full program
//!
//! A bang expression inside host code turns into a capturing call,
//! with the converter picked from the flag letters:
//!
//! ```
//! use pybang::{Options, compile_str};
//!
//! let out = compile_str("x = (i! echo 2) + 2\n", &Options::default()).unwrap();
//! assert!(out.starts_with("#!/usr/bin/env python3\n"));
//! assert!(out.ends_with(
//!     "x = (bang_call([\"echo\", \"2\"], \"io\", (None), int, None)) + 2\n"
//! ));
//! ```

// Allow noisy pedantic lints that don't add value for
// a library crate.
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

pub mod codegen;
pub mod color;
pub mod command;
pub mod preamble;
pub mod region;
pub mod render;
pub mod scanner;

pub use codegen::{Options, compile_command, compile_str, expand_source};
pub use color::Palette;
pub use command::{Argument, ParsedCommand, parse_command};
pub use preamble::preamble;
pub use region::{BangCommand, Region, RegionError, split_regions};
pub use render::{RenderError, Strictness, escape_py, expand_dollar, render_argument};

/// Unified error type covering region splitting and rendering.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A region-splitting error.
    #[error("{0}")]
    Region(#[from] RegionError),
    /// An argument-rendering error.
    #[error("{0}")]
    Render(#[from] RenderError),
}
