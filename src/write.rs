//! Renders [`Post`]s and their [`Tag`](crate::tag::Tag)s into HTML pages on
//! disk.

use crate::post::Post;
use crate::tag::index_tags;
use crate::util::ensure_dir;
use gtmpl::{Template, Value};
use log::{debug, info, warn};
use std::collections::{hash_map::Entry, HashMap};
use std::fmt;
use std::fs::{read_to_string, File};
use std::io;
use std::path::{Path, PathBuf};

/// The template for the site's index page. It receives the full, sorted list
/// of posts.
pub const MENU_TEMPLATE: &str = "menu.html";

/// The template for each post page. It receives a single post.
pub const POST_TEMPLATE: &str = "post.html";

/// The template for each tag page. It receives a single tag.
pub const TAG_TEMPLATE: &str = "tag.html";

const INDEX_FILE: &str = "index.html";

/// Responsible for templating and writing the site's HTML pages to disk.
///
/// The output layout is:
///
/// * `{output_directory}/index.html`
/// * `{output_directory}/post/{slug}/index.html` for each post
/// * `{output_directory}/tag/{tag}/index.html` for each distinct tag
pub struct Writer<'a> {
    /// The directory holding `menu.html`, `post.html`, and `tag.html`.
    pub templates_directory: &'a Path,

    /// The root of the output tree. It is created if missing; its parent must
    /// exist.
    pub output_directory: &'a Path,
}

impl Writer<'_> {
    /// Writes the index page, one page per post, and one page per tag, in
    /// that order. `posts` should already be filtered and sorted. The first
    /// failure aborts the whole operation and leaves whatever was written so
    /// far on disk.
    pub fn write_site(&self, posts: &[Post]) -> Result<()> {
        let mut templates = Templates::new(self.templates_directory);

        ensure(self.output_directory)?;
        templates.render(
            MENU_TEMPLATE,
            Value::Array(posts.iter().map(Post::to_value).collect()),
            &self.output_directory.join(INDEX_FILE),
        )?;

        let posts_directory = self.output_directory.join("post");
        ensure(&posts_directory)?;
        for post in posts {
            check_path_component("slug", &post.metadata.slug);
            let dir = posts_directory.join(&post.metadata.slug);
            ensure(&dir)?;
            templates.render(
                POST_TEMPLATE,
                post.to_value(),
                &dir.join(INDEX_FILE),
            )?;
        }

        let tags = index_tags(posts);
        let tags_directory = self.output_directory.join("tag");
        ensure(&tags_directory)?;
        for tag in tags.iter() {
            check_path_component("tag", &tag.name);
            let dir = tags_directory.join(&tag.name);
            ensure(&dir)?;
            templates.render(
                TAG_TEMPLATE,
                Value::from(tag),
                &dir.join(INDEX_FILE),
            )?;
        }

        info!(
            "Wrote {} post pages and {} tag pages to `{}`",
            posts.len(),
            tags.len(),
            self.output_directory.display()
        );
        Ok(())
    }
}

fn ensure(dir: &Path) -> Result<()> {
    ensure_dir(dir).map_err(|err| Error::CreateDirectory {
        path: dir.to_owned(),
        err,
    })
}

// Slugs and tag names are used as directory names verbatim. Flag the ones that
// won't land where a reader would expect.
fn check_path_component(kind: &str, name: &str) {
    if name.is_empty()
        || name == "."
        || name == ".."
        || name.contains('/')
        || name.contains('\\')
    {
        warn!(
            "{} `{}` is not a plain directory name; writing it verbatim",
            kind, name
        );
    }
}

/// Lazily loads and caches templates from a directory, so a template that is
/// never needed (e.g., `post.html` for a site with no posts) is never read.
struct Templates<'a> {
    directory: &'a Path,
    loaded: HashMap<&'static str, Template>,
}

impl<'a> Templates<'a> {
    fn new(directory: &'a Path) -> Templates<'a> {
        Templates {
            directory,
            loaded: HashMap::new(),
        }
    }

    fn get(&mut self, name: &'static str) -> Result<&Template> {
        match self.loaded.entry(name) {
            Entry::Occupied(entry) => Ok(&*entry.into_mut()),
            Entry::Vacant(entry) => {
                let template = parse_template(&self.directory.join(name))?;
                Ok(&*entry.insert(template))
            }
        }
    }

    /// Applies the template `name` to `value` and writes the result to
    /// `file_path`, replacing any existing file. The template is loaded
    /// before the output file is created.
    fn render(
        &mut self,
        name: &'static str,
        value: Value,
        file_path: &Path,
    ) -> Result<()> {
        let template = self.get(name)?;
        let context = gtmpl::Context::from(value)?;
        let mut file = File::create(file_path).map_err(|err| Error::Write {
            path: file_path.to_owned(),
            err,
        })?;
        template.execute(&mut file, &context)?;
        debug!("Wrote `{}`", file_path.display());
        Ok(())
    }
}

/// Loads the template file contents and parses the result into a template.
fn parse_template(path: &Path) -> Result<Template> {
    let contents = read_to_string(path).map_err(|err| Error::OpenTemplateFile {
        path: path.to_owned(),
        err,
    })?;

    let mut template = Template::default();
    template
        .parse(&contents)
        .map_err(|err| Error::ParseTemplate {
            path: path.to_owned(),
            err,
        })?;
    Ok(template)
}

/// The result of a fallible page-writing operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error in a page-writing operation.
#[derive(Debug)]
pub enum Error {
    /// Returned for I/O problems while opening template files.
    OpenTemplateFile { path: PathBuf, err: io::Error },

    /// Returned for errors parsing template files.
    ParseTemplate { path: PathBuf, err: String },

    /// An error during templating.
    Template(String),

    /// Returned when an output directory can't be created.
    CreateDirectory { path: PathBuf, err: io::Error },

    /// Returned when an output file can't be created.
    Write { path: PathBuf, err: io::Error },
}

impl From<String> for Error {
    /// Converts a template error message ([`String`]) into an [`Error`]. This
    /// allows us to use the `?` operator for fallible template operations.
    fn from(err: String) -> Error {
        Error::Template(err)
    }
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as presentable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::OpenTemplateFile { path, err } => {
                write!(f, "Opening template file '{}': {}", path.display(), err)
            }
            Error::ParseTemplate { path, err } => {
                write!(f, "Parsing template file '{}': {}", path.display(), err)
            }
            Error::Template(err) => write!(f, "Rendering template: {}", err),
            Error::CreateDirectory { path, err } => {
                write!(f, "Creating directory '{}': {}", path.display(), err)
            }
            Error::Write { path, err } => {
                write!(f, "Writing file '{}': {}", path.display(), err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::OpenTemplateFile { path: _, err } => Some(err),
            Error::ParseTemplate { .. } => None,
            Error::Template(_) => None,
            Error::CreateDirectory { path: _, err } => Some(err),
            Error::Write { path: _, err } => Some(err),
        }
    }
}
