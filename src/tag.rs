//! Defines the [`Tag`] type, which groups the [`Post`]s sharing a tag, and
//! [`index_tags`], which derives every [`Tag`] from a list of posts.

use crate::post::Post;
use gtmpl::Value;

/// A tag and the posts that carry it. Tags are derived from the post list on
/// every build; they are never read from disk.
#[derive(Clone, Debug, PartialEq)]
pub struct Tag<'a> {
    /// The tag's name exactly as written in the posts' front matter. It is
    /// also the name of the tag's output directory.
    pub name: String,

    /// The posts carrying this tag, in the same relative order as the post
    /// list the tag was derived from.
    pub posts: Vec<&'a Post>,
}

impl<'a, 'b> From<&'a Tag<'b>> for Value {
    /// Converts [`Tag`]s into [`Value`]s for templating. The result is a
    /// [`Value::Object`] with the fields `Name` and `Posts`.
    fn from(t: &'a Tag<'b>) -> Value {
        use std::collections::HashMap;
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("Name".to_owned(), Value::String(t.name.clone()));
        m.insert(
            "Posts".to_owned(),
            Value::Array(t.posts.iter().map(|p| p.to_value()).collect()),
        );
        Value::Object(m)
    }
}

/// Indexes `posts` by tag. Tags appear in first-seen order: posts are scanned
/// in order and each post's tags in the order they were written.
pub fn index_tags(posts: &[Post]) -> Vec<Tag> {
    let mut names: Vec<&str> = Vec::new();
    for post in posts {
        for tag in post.metadata.tags.iter() {
            if !names.contains(&tag.as_str()) {
                names.push(tag);
            }
        }
    }

    names
        .into_iter()
        .map(|name| Tag {
            name: name.to_owned(),
            posts: posts
                .iter()
                .filter(|p| p.metadata.tags.iter().any(|t| t == name))
                .collect(),
        })
        .collect()
}
