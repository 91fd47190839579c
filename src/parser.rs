//! Defines the [`Parser`] and [`Error`] types, and the logic for loading
//! [`Post`]s from the file system into memory: discovering source files,
//! splitting front matter from the body, parsing publish dates, and ordering
//! the published posts most-recent-first.

use std::{
    fmt,
    fs::{read_dir, read_to_string},
    path::{Path, PathBuf},
};

use chrono::NaiveDate;
use log::{debug, info};

use crate::{
    markdown,
    post::{Metadata, Post},
};

/// The only accepted layout for the `published` front matter field, e.g.
/// `Jan 2, 2006`: abbreviated month name, day of month (optionally
/// zero-padded), a comma, and a four-digit year, separated by single spaces.
pub const DATE_FORMAT: &str = "%b %d, %Y";

// chrono's parser is laxer than `DATE_FORMAT` reads (short years, any run of
// whitespace). A date is only accepted if formatting it back with one of these
// reproduces the input, ignoring the case of the month name.
const DATE_LAYOUTS: [&str; 2] = ["%b %-d, %Y", "%b %d, %Y"];

const MARKDOWN_EXTENSION: &str = ".md";

const FENCE: &str = "---";

/// Loads [`Post`]s from a source directory.
pub struct Parser<'a> {
    /// The directory containing the post source files. Only direct children
    /// are considered.
    source_directory: &'a Path,
}

impl<'a> Parser<'a> {
    /// Constructs a new parser for the posts in `source_directory`.
    pub fn new(source_directory: &'a Path) -> Parser<'a> {
        Parser { source_directory }
    }

    /// Lists every entry directly inside the source directory whose name ends
    /// in `.md` (case-sensitive). Subdirectories are not searched. The paths
    /// are returned sorted by file name.
    pub fn discover(&self) -> Result<Vec<PathBuf>> {
        match self._discover() {
            Ok(paths) => Ok(paths),
            Err(e) => Err(Error::Annotated(
                format!(
                    "listing posts directory `{}`",
                    self.source_directory.display()
                ),
                Box::new(e),
            )),
        }
    }

    fn _discover(&self) -> Result<Vec<PathBuf>> {
        let mut paths = Vec::new();
        for result in read_dir(self.source_directory)? {
            let entry = result?;
            let os_file_name = entry.file_name();
            let file_name = os_file_name.to_string_lossy();
            if file_name.ends_with(MARKDOWN_EXTENSION) {
                paths.push(entry.path());
            }
        }
        paths.sort();
        Ok(paths)
    }

    /// Discovers, extracts, filters, and sorts the posts in the source
    /// directory. The result holds only published posts, most recent first.
    /// See [`collect_published`] and [`sort_by_date`].
    ///
    /// Each post file must be structured as follows:
    ///
    /// 1. Initial frontmatter fence (`---`)
    /// 2. YAML frontmatter with fields `name`, `slug`, `published`, and
    ///    `tags`, all optional
    /// 3. Terminal frontmatter fence (`---`)
    /// 4. Post body
    ///
    /// For example:
    ///
    /// ```md
    /// ---
    /// name: Hello, world!
    /// slug: hello-world
    /// published: Apr 16, 2021
    /// tags: [greet]
    /// ---
    /// # Hello
    ///
    /// World
    /// ```
    pub fn parse_posts(&self) -> Result<Vec<Post>> {
        let paths = self.discover()?;
        info!(
            "Found {} post source files in `{}`",
            paths.len(),
            self.source_directory.display()
        );
        let mut posts = collect_published(&paths)?;
        sort_by_date(&mut posts);
        info!("Publishing {} posts", posts.len());
        Ok(posts)
    }
}

/// Extracts a [`Post`] from each of `paths` in order, keeping only published
/// posts. Drafts (empty `published`) are dropped without error.
pub fn collect_published(paths: &[PathBuf]) -> Result<Vec<Post>> {
    let mut posts = Vec::with_capacity(paths.len());
    for path in paths {
        let post = parse_post(path)?;
        if post.metadata.is_published() {
            posts.push(post);
        } else {
            debug!("Skipping draft `{}`", path.display());
        }
    }
    Ok(posts)
}

/// Orders `posts` most recent first. This is deliberately a stable ascending
/// sort followed by a reversal, so posts sharing a date end up in the reverse
/// of their original relative order.
pub fn sort_by_date(posts: &mut [Post]) {
    posts.sort_by(|a, b| a.date.cmp(&b.date));
    posts.reverse();
}

/// Loads a single [`Post`] from the file at `path`. Errors are annotated with
/// the offending path.
pub fn parse_post(path: &Path) -> Result<Post> {
    match _parse_post(path) {
        Ok(p) => {
            debug!("Extracted post `{}`", path.display());
            Ok(p)
        }
        Err(e) => Err(Error::Annotated(
            format!("parsing post `{}`", path.display()),
            Box::new(e),
        )),
    }
}

fn _parse_post(path: &Path) -> Result<Post> {
    let contents = read_to_string(path)?;
    let (metadata, body) = split_frontmatter(&contents)?;
    let date = parse_date(&metadata.published)?;
    let mut content = String::new();
    markdown::to_html(&mut content, body);
    Ok(Post {
        metadata,
        date,
        content,
    })
}

/// Parses the `published` front matter field according to [`DATE_FORMAT`].
/// An empty string is a draft and yields `None`.
pub fn parse_date(published: &str) -> Result<Option<NaiveDate>> {
    if published.is_empty() {
        return Ok(None);
    }
    let date = match NaiveDate::parse_from_str(published, DATE_FORMAT) {
        Ok(date) => date,
        Err(err) => {
            return Err(Error::Date {
                published: published.to_owned(),
                err: Some(err),
            })
        }
    };
    let exact = DATE_LAYOUTS.iter().any(|layout| {
        date.format(layout)
            .to_string()
            .eq_ignore_ascii_case(published)
    });
    match exact {
        true => Ok(Some(date)),
        false => Err(Error::Date {
            published: published.to_owned(),
            err: None,
        }),
    }
}

/// Splits `input` into its parsed front matter and the remaining body. Input
/// that doesn't open with a `---` line has no front matter: the metadata is
/// all zero values and the body is the whole input. An opening fence without
/// a closing `---` line is an error.
pub fn split_frontmatter(input: &str) -> Result<(Metadata, &str)> {
    let input = input.trim_start_matches('\u{feff}');
    match frontmatter_indices(input)? {
        None => Ok((Metadata::default(), input)),
        Some((yaml_start, yaml_stop, body_start)) => {
            let yaml = &input[yaml_start..yaml_stop];
            let metadata = match yaml.trim().is_empty() {
                true => Metadata::default(),
                false => serde_yaml::from_str(yaml)?,
            };
            Ok((metadata, &input[body_start..]))
        }
    }
}

// Returns (yaml_start, yaml_stop, body_start), or `None` if there is no
// opening fence. Fences must occupy a whole line.
fn frontmatter_indices(input: &str) -> Result<Option<(usize, usize, usize)>> {
    let mut lines = input.split_inclusive('\n');
    let first = match lines.next() {
        Some(line) if line.trim_end() == FENCE => line,
        _ => return Ok(None),
    };

    let mut offset = first.len();
    for line in lines {
        if line.trim_end() == FENCE {
            return Ok(Some((first.len(), offset, offset + line.len())));
        }
        offset += line.len();
    }
    Err(Error::FrontmatterMissingEndFence)
}

/// Represents the result of a [`Post`]-parse operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error loading [`Post`] objects.
#[derive(Debug)]
pub enum Error {
    /// Returned when a post source file opens a frontmatter block (`---`) but
    /// never closes it.
    FrontmatterMissingEndFence,

    /// Returned when there was an error parsing the frontmatter as YAML.
    DeserializeYaml(serde_yaml::Error),

    /// Returned when the `published` field doesn't match [`DATE_FORMAT`].
    Date {
        published: String,
        err: Option<chrono::ParseError>,
    },

    /// Returned for I/O errors reading the posts directory or a post file.
    Io(std::io::Error),

    /// An error with an annotation.
    Annotated(String, Box<Error>),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::FrontmatterMissingEndFence => {
                write!(f, "Missing closing `---`")
            }
            Error::DeserializeYaml(err) => err.fmt(f),
            Error::Date { published, err } => {
                write!(
                    f,
                    "invalid published date `{}` (expected e.g. `Jan 2, 2006`)",
                    published
                )?;
                match err {
                    Some(err) => write!(f, ": {}", err),
                    None => Ok(()),
                }
            }
            Error::Io(err) => err.fmt(f),
            Error::Annotated(annotation, err) => {
                write!(f, "{}: {}", &annotation, err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::FrontmatterMissingEndFence => None,
            Error::DeserializeYaml(err) => Some(err),
            Error::Date { published: _, err } => match err {
                Some(err) => Some(err),
                None => None,
            },
            Error::Io(err) => Some(err),
            Error::Annotated(_, err) => Some(err),
        }
    }
}

impl From<serde_yaml::Error> for Error {
    /// Converts a [`serde_yaml::Error`] into an [`Error`]. It allows us to use
    /// the `?` operator for [`serde_yaml`] deserialization functions.
    fn from(err: serde_yaml::Error) -> Error {
        Error::DeserializeYaml(err)
    }
}

impl From<std::io::Error> for Error {
    /// Converts a [`std::io::Error`] into an [`Error`]. It allows us to
    /// use the `?` operator for fallible I/O functions.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn post(slug: &str, date: Option<NaiveDate>) -> Post {
        Post {
            metadata: Metadata {
                slug: slug.to_owned(),
                published: String::from("x"),
                ..Metadata::default()
            },
            date,
            content: String::new(),
        }
    }

    fn slugs(posts: &[Post]) -> Vec<&str> {
        posts.iter().map(|p| p.metadata.slug.as_str()).collect()
    }

    #[test]
    fn test_split_frontmatter() -> Result<()> {
        let input = "---\nname: Hi\nslug: hi\npublished: Jan 2, 2006\n\
                     tags: [a, b]\n---\nBody text\n";
        let (metadata, body) = split_frontmatter(input)?;
        assert_eq!(metadata.name, "Hi");
        assert_eq!(metadata.slug, "hi");
        assert_eq!(metadata.published, "Jan 2, 2006");
        assert_eq!(metadata.tags, vec!["a", "b"]);
        assert_eq!(body, "Body text\n");
        Ok(())
    }

    #[test]
    fn test_split_frontmatter_dashes_inside_value() -> Result<()> {
        let input = "---\nname: a---b\n---\nBody\n";
        let (metadata, body) = split_frontmatter(input)?;
        assert_eq!(metadata.name, "a---b");
        assert_eq!(body, "Body\n");
        Ok(())
    }

    #[test]
    fn test_split_frontmatter_crlf() -> Result<()> {
        let (metadata, body) =
            split_frontmatter("---\r\nslug: win\r\n---\r\nBody\r\n")?;
        assert_eq!(metadata.slug, "win");
        assert_eq!(body, "Body\r\n");
        Ok(())
    }

    #[test]
    fn test_split_frontmatter_absent() -> Result<()> {
        let (metadata, body) = split_frontmatter("Just a body\n")?;
        assert_eq!(metadata, Metadata::default());
        assert_eq!(body, "Just a body\n");
        Ok(())
    }

    #[test]
    fn test_split_frontmatter_empty_block() -> Result<()> {
        let (metadata, body) = split_frontmatter("---\n---\nBody\n")?;
        assert_eq!(metadata, Metadata::default());
        assert_eq!(body, "Body\n");
        Ok(())
    }

    #[test]
    fn test_split_frontmatter_missing_end_fence() {
        match split_frontmatter("---\nname: Hi\nBody\n") {
            Err(Error::FrontmatterMissingEndFence) => {}
            other => panic!("expected missing end fence, got {:?}", other),
        }
    }

    #[test]
    fn test_split_frontmatter_malformed_yaml() {
        match split_frontmatter("---\ntags: [unclosed\n---\n") {
            Err(Error::DeserializeYaml(_)) => {}
            other => panic!("expected a YAML error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_date() -> Result<()> {
        assert_eq!(parse_date("Jan 2, 2006")?, NaiveDate::from_ymd_opt(2006, 1, 2));
        assert_eq!(
            parse_date("Dec 25, 2023")?,
            NaiveDate::from_ymd_opt(2023, 12, 25)
        );
        assert_eq!(parse_date("Jan 02, 2006")?, NaiveDate::from_ymd_opt(2006, 1, 2));
        assert_eq!(parse_date("jan 2, 2006")?, NaiveDate::from_ymd_opt(2006, 1, 2));
        assert_eq!(parse_date("")?, None);
        Ok(())
    }

    #[test]
    fn test_parse_date_wrong_layout() {
        for text in &[
            "2023-01-01",
            "Jan 2 2006",
            "Jan 2, 2006 at noon",
            "Jan 2, 23",
            "Jan 2,2006",
            "Jan2, 2006",
            "Jan  2, 2006",
            " Jan 2, 2006",
        ] {
            match parse_date(text) {
                Err(Error::Date { published, .. }) => assert_eq!(published, *text),
                other => panic!("expected a date error for {}, got {:?}", text, other),
            }
        }
    }

    #[test]
    fn test_sort_by_date_descending() {
        let mut posts = vec![
            post("d3", NaiveDate::from_ymd_opt(2021, 1, 1)),
            post("d1", NaiveDate::from_ymd_opt(2023, 1, 1)),
            post("d2", NaiveDate::from_ymd_opt(2022, 1, 1)),
        ];
        sort_by_date(&mut posts);
        assert_eq!(slugs(&posts), vec!["d1", "d2", "d3"]);
    }

    #[test]
    fn test_sort_by_date_reverses_ties() {
        let same = NaiveDate::from_ymd_opt(2023, 1, 1);
        let mut posts = vec![
            post("first", same),
            post("older", NaiveDate::from_ymd_opt(2020, 1, 1)),
            post("second", same),
            post("third", same),
        ];
        sort_by_date(&mut posts);
        assert_eq!(slugs(&posts), vec!["third", "second", "first", "older"]);
    }

    #[test]
    fn test_discover() -> Result<()> {
        let tmp = TempDir::new()?;
        for name in &["b.md", "a.md", "c.MD", "notes.txt", "md", "x.md.bak"] {
            fs::write(tmp.path().join(name), "")?;
        }
        fs::create_dir(tmp.path().join("nested"))?;
        fs::write(tmp.path().join("nested").join("d.md"), "")?;

        let paths = Parser::new(tmp.path()).discover()?;
        assert_eq!(
            paths,
            vec![tmp.path().join("a.md"), tmp.path().join("b.md")]
        );
        Ok(())
    }

    #[test]
    fn test_discover_missing_directory() -> std::io::Result<()> {
        let tmp = TempDir::new()?;
        let missing = tmp.path().join("posts");
        match Parser::new(&missing).discover() {
            Err(Error::Annotated(_, err)) => match *err {
                Error::Io(_) => {}
                other => panic!("expected an I/O error, got {:?}", other),
            },
            other => panic!("expected an annotated error, got {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn test_parse_post() -> Result<()> {
        let tmp = TempDir::new()?;
        let path = tmp.path().join("hello.md");
        fs::write(
            &path,
            "---\nname: Hello\nslug: hello\npublished: Mar 4, 2022\n---\n\
             First paragraph.\n\nSecond paragraph.\n",
        )?;

        let post = parse_post(&path)?;
        assert_eq!(post.metadata.name, "Hello");
        assert_eq!(post.date, NaiveDate::from_ymd_opt(2022, 3, 4));
        assert_eq!(
            post.content,
            "<p>First paragraph.</p>\n<p>Second paragraph.</p>\n"
        );
        Ok(())
    }

    #[test]
    fn test_parse_post_draft_has_no_date() -> Result<()> {
        let tmp = TempDir::new()?;
        let path = tmp.path().join("draft.md");
        fs::write(&path, "---\nname: WIP\nslug: wip\n---\nSoon.\n")?;

        let post = parse_post(&path)?;
        assert_eq!(post.date, None);
        assert!(!post.metadata.is_published());
        Ok(())
    }

    #[test]
    fn test_parse_post_annotates_errors() -> std::io::Result<()> {
        let tmp = TempDir::new()?;
        let path = tmp.path().join("bad.md");
        fs::write(&path, "---\npublished: 2023-01-01\n---\n")?;

        let err = parse_post(&path).unwrap_err();
        assert!(err.to_string().contains("bad.md"));
        match err {
            Error::Annotated(_, inner) => match *inner {
                Error::Date { .. } => {}
                other => panic!("expected a date error, got {:?}", other),
            },
            other => panic!("expected an annotated error, got {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn test_collect_published_drops_drafts() -> Result<()> {
        let tmp = TempDir::new()?;
        let a = tmp.path().join("a.md");
        let b = tmp.path().join("b.md");
        fs::write(&a, "---\nslug: a\n---\nDraft.\n")?;
        fs::write(&b, "---\nslug: b\npublished: Jan 1, 2023\n---\nOut.\n")?;

        let posts = collect_published(&[a, b])?;
        assert_eq!(slugs(&posts), vec!["b"]);
        Ok(())
    }
}
