pub mod ast;
pub mod ast_printer;
pub mod environment;
pub mod error;
pub mod fold;
pub mod interpreter;
pub mod macros;
pub mod parser;
pub mod scanner;
pub mod token;
pub mod value;
