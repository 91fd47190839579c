//! Exports the [`build_site`] function which stitches together the high-level
//! steps of building the output static site: loading the published posts
//! ([`crate::parser`]) and rendering the index, post, and tag pages
//! ([`crate::write`]).

use crate::config::Config;
use crate::parser::{Error as ParseError, Parser as PostParser};
use crate::write::{Error as WriteError, Writer};
use std::fmt;

/// Builds the site from a [`Config`] object. This calls into
/// [`PostParser::parse_posts`] and [`Writer::write_site`] which do the
/// heavy-lifting. Every post is parsed before anything is written, so a bad
/// post leaves the output directory untouched. Stale files from earlier builds
/// are not removed.
pub fn build_site(config: &Config) -> Result<()> {
    // collect all published posts, most recent first
    let posts = PostParser::new(&config.posts_directory).parse_posts()?;

    // write the index, post, and tag pages
    let writer = Writer {
        templates_directory: &config.templates_directory,
        output_directory: &config.output_directory,
    };
    writer.write_site(&posts)?;

    Ok(())
}

type Result<T> = std::result::Result<T, Error>;

/// The error type for building a site. Errors can be during parsing or
/// writing.
#[derive(Debug)]
pub enum Error {
    /// Returned for errors during parsing.
    Parse(ParseError),

    /// Returned for errors writing [`crate::post::Post`]s to disk as HTML files.
    Write(WriteError),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Parse(err) => err.fmt(f),
            Error::Write(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Parse(err) => Some(err),
            Error::Write(err) => Some(err),
        }
    }
}

impl From<ParseError> for Error {
    /// Converts [`ParseError`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: ParseError) -> Error {
        Error::Parse(err)
    }
}

impl From<WriteError> for Error {
    /// Converts [`WriteError`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: WriteError) -> Error {
        Error::Write(err)
    }
}
