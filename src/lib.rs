//! The library code for the `quire` static blog generator. A build is a single
//! sequential pass with two distinct steps:
//!
//! 1. Parsing posts from source files on disk ([`crate::parser`]): every `.md`
//!    file directly inside the posts directory is split into YAML front matter
//!    and a Markdown body, drafts (posts without a `published` date) are
//!    dropped, and the rest are ordered most recent first.
//! 2. Converting the posts into output files on disk ([`crate::write`]): the
//!    index page, one page per post, and one page per tag, each produced by
//!    applying a Go-style template to the post data.
//!
//! Any error aborts the build; nothing is cleaned up or rolled back.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod build;
pub mod config;
pub mod markdown;
pub mod parser;
pub mod post;
pub mod tag;
pub mod util;
pub mod write;
