//! PartScout - retrieval library for grounding a parts-shop sales assistant
//!
//! Finds catalog entries and sales-technique tips relevant to a free-text
//! customer query.
//!
//! # Architecture
//!
//! ```text
//! catalog.csv ----+
//!                 +-> Chunker -> Embedder -> FlatIndex
//! sales_book.txt -+                             |
//!                                               |
//! Query -> Embedder -> Retriever::search <------+
//!                         |
//!                      Results -> render_context
//! ```
//!
//! # Example
//!
//! ```ignore
//! use partscout_lib::{config::Config, search::{render_context, Retriever}};
//!
//! let retriever = Retriever::from_config(&Config::default())?;
//! let results = retriever.search("сколько стоит задний фонарь на пассат б7", 3)?;
//! println!("{}", render_context(&results));
//! ```

pub mod chunk;
pub mod config;
pub mod embed;
pub mod error;
pub mod search;
pub mod store;

pub use error::{Error, Result};
