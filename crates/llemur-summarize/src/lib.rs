//! Structural code compression for LLM context
//!
//! Python sources are reduced lexically (comments and docstrings removed),
//! parsed, and condensed into one line per function or class, with a short
//! digest of each function body. Directory trees are summarized file by file.

pub mod ast;
mod batch;
mod error;
pub mod literal;
mod parser;
mod reducer;
mod summarizer;
pub mod token;
mod tokenizer;

pub use batch::{
    collect_files, render_json, render_text, summarize_file, summarize_source, summarize_tree,
    FileSummary, WalkOptions,
};
pub use error::{ParseError, SummarizeError, SummarizeResult, TokenizeError};
pub use parser::parse;
pub use reducer::{reduce, reduce_tokens};
pub use summarizer::{summarize_module, SummaryReport};
pub use tokenizer::tokenize;

#[cfg(test)]
mod tests;
