//! # Context Classifier
//!
//! Syntax-tree classification of JavaScript/TypeScript sources into the
//! elements a project overview is built from.
//!
//! ## Architecture
//!
//! ```text
//! SourceFile + content
//!     │
//!     ├──> Dialect → tree-sitter grammar (parser cached per dialect)
//!     │
//!     ├──> Parse; a tree with syntax errors fails the file
//!     │
//!     ├──> Pre-order walk, handlers looked up by node kind
//!     │    ├─> Outline collectors (imports, exports, functions, classes)
//!     │    └─> Ordered rule table, first matching rule per node
//!     │         endpoint > middleware > model > service > component
//!     │         > utility > config object
//!     │
//!     └──> FileAnalysisRecord
//!          ├─> Route framework tag from imports
//!          └─> Single file category
//! ```
//!
//! ## Example
//!
//! ```rust
//! use context_classifier::SyntaxClassifier;
//! use context_protocol::SourceFile;
//!
//! let file = SourceFile::from_relative("src/routes.js").unwrap();
//! let code = "const app = require('express')();\napp.get('/users', listUsers);";
//!
//! let record = SyntaxClassifier::new().classify(&file, code).unwrap();
//! assert_eq!(record.endpoints().next().unwrap().name, "GET /users");
//! ```

mod analyzer;
mod category;
mod error;
mod grammar;
mod routes;
mod rules;
mod syntax;

pub use analyzer::SyntaxClassifier;
pub use category::resolve_file_category;
pub use error::{ClassifierError, Result};
