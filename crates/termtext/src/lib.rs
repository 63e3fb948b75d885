//! termtext: rich-text console for process output.
//!
//! Turns the byte stream of a child process (ANSI/VT102 SGR attributes,
//! `\r` progress redraws, line breaks) into a document of formatted runs
//! that a launcher window can display, export or inspect.
//!
//! The core is two infallible pieces: [`sgr::SgrInterpreter`], which
//! evolves a [`model::TextFormat`] one attribute code at a time, and
//! [`insert::insert_text`], which writes text with overwrite-style carriage
//! returns. [`terminal::Terminal`] composes them behind a streaming
//! tokenizer; [`session::Session`] feeds it from a PTY.

#![forbid(unsafe_code)]
// Public API types have docs; helpers are documented where they are not
// self-explanatory.
#![allow(missing_docs)]

pub mod config;
pub mod document;
pub mod error;
pub mod insert;
pub mod model;
pub mod release;
pub mod render;
pub mod session;
pub mod sgr;
pub mod sysreq;
pub mod terminal;
pub mod tokenizer;

pub use crate::error::{ErrorCode, ErrorInfo, TermtextError, TermtextResult};
pub use crate::model::*;
