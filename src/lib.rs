//! # Commentary Compiler
//!
//! Compiles a tree of TOML Bible commentaries into SQLite, JSON, CSV and
//! OSIS.
//!
//! The input tree has one directory per commentary author (a "father").
//! Each directory holds a `metadata.toml` with the author's defaults and
//! any number of commentary documents named `<Book> <verse range>.toml`:
//!
//! ```text
//! commentaries/
//! ├── Origen/
//! │   ├── metadata.toml            default_year = 230, wiki = "..."
//! │   ├── John 3_16.toml
//! │   └── 1 Corinthians 7_1-9.toml
//! └── Augustine/
//!     └── ...
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────┐   ┌──────────────┐   ┌──────────────┐   ┌───────────────┐
//! │ discover  │──▶│   authors    │──▶│  commentary  │──▶│     emit      │
//! │ walk+glob │   │ metadata.toml│   │ path + TOML  │   │ sqlite/json/  │
//! └───────────┘   └──────────────┘   └──────────────┘   │ csv/osis      │
//!                                                        └───────────────┘
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`verse`] | Verse range tokens, locations, references |
//! | [`books`] | OSIS book abbreviations |
//! | [`path_meta`] | Author/book/range from a document path |
//! | [`authors`] | Author metadata loading |
//! | [`commentary`] | Commentary record building |
//! | [`discover`] | Input tree discovery |
//! | [`pipeline`] | Compile orchestration |
//! | [`emit`] | SQLite, JSON, CSV and OSIS output |
//! | [`logging`] | Tracing subscriber setup |

pub mod authors;
pub mod books;
pub mod commentary;
pub mod config;
pub mod discover;
pub mod emit;
pub mod error;
pub mod logging;
pub mod models;
pub mod path_meta;
pub mod pipeline;
pub mod verse;
