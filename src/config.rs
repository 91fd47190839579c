use std::path::{Path, PathBuf};

/// The name of the post source directory inside a project.
pub const POSTS_DIRECTORY: &str = "posts";

/// The name of the template directory inside a project.
pub const TEMPLATES_DIRECTORY: &str = "templates";

/// The name of the output directory inside a project.
pub const OUTPUT_DIRECTORY: &str = "build";

/// The locations a build reads from and writes to.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Where post source files (`*.md`) are read from.
    pub posts_directory: PathBuf,

    /// Where `menu.html`, `post.html`, and `tag.html` are read from.
    pub templates_directory: PathBuf,

    /// Where the site is written.
    pub output_directory: PathBuf,
}

impl Config {
    /// Returns the configuration for a project rooted at `dir`, i.e.
    /// `{dir}/posts`, `{dir}/templates`, and `{dir}/build`.
    pub fn from_directory(dir: &Path) -> Config {
        Config {
            posts_directory: dir.join(POSTS_DIRECTORY),
            templates_directory: dir.join(TEMPLATES_DIRECTORY),
            output_directory: dir.join(OUTPUT_DIRECTORY),
        }
    }
}

impl Default for Config {
    /// The default configuration is relative to the working directory.
    fn default() -> Self {
        Config {
            posts_directory: PathBuf::from(POSTS_DIRECTORY),
            templates_directory: PathBuf::from(TEMPLATES_DIRECTORY),
            output_directory: PathBuf::from(OUTPUT_DIRECTORY),
        }
    }
}
