use clap::{crate_version, App, Arg, ArgMatches};
use log::error;
use quire::build::build_site;
use quire::config::Config;
use std::path::{Path, PathBuf};

fn main() {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .init();

    let matches = App::new("quire")
        .version(crate_version!())
        .about(
            "Builds a static blog from Markdown posts and HTML templates. \
             With no arguments, reads `posts/` and `templates/` and writes \
             `build/` in the working directory; the optional arguments \
             only relocate those directories.",
        )
        .arg(
            Arg::with_name("directory")
                .help("The project directory (defaults to the working directory)")
                .index(1),
        )
        .arg(
            Arg::with_name("posts")
                .long("posts")
                .value_name("DIR")
                .takes_value(true)
                .help("Read posts from DIR instead of `{directory}/posts`"),
        )
        .arg(
            Arg::with_name("templates")
                .long("templates")
                .value_name("DIR")
                .takes_value(true)
                .help("Read templates from DIR instead of `{directory}/templates`"),
        )
        .arg(
            Arg::with_name("output")
                .long("output")
                .value_name("DIR")
                .takes_value(true)
                .help("Write the site to DIR instead of `{directory}/build`"),
        )
        .get_matches();

    if let Err(e) = build_site(&config(&matches)) {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn config(matches: &ArgMatches) -> Config {
    let mut config = match matches.value_of("directory") {
        Some(dir) => Config::from_directory(Path::new(dir)),
        None => Config::default(),
    };
    if let Some(dir) = matches.value_of("posts") {
        config.posts_directory = PathBuf::from(dir);
    }
    if let Some(dir) = matches.value_of("templates") {
        config.templates_directory = PathBuf::from(dir);
    }
    if let Some(dir) = matches.value_of("output") {
        config.output_directory = PathBuf::from(dir);
    }
    config
}
