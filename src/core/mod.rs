// Core modules: value model, recursive-descent parser, options, and errors.
pub mod array;
pub mod canonical;
pub mod error;
pub mod object;
pub mod options;
pub mod parser;
pub mod value;
