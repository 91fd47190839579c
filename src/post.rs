//! Defines the [`Metadata`] and [`Post`] types and their conversion into
//! template [`Value`]s.

use chrono::NaiveDate;
use gtmpl::Value;
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;

/// The front matter of a post source file. Every field is optional in the
/// source document; a missing field takes its zero value.
#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct Metadata {
    /// The human-readable title of the post.
    pub name: String,

    /// The post's output directory name under `post/`. Used verbatim.
    pub slug: String,

    /// The raw publish date (e.g., `Jan 2, 2006`). Empty means draft.
    pub published: String,

    /// The post's tags, in the order they were written.
    #[serde(deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
}

// `tags:` with no value is a YAML null; treat it like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Metadata {
    /// Returns `true` if the post has a publish date, i.e., it is not a draft.
    pub fn is_published(&self) -> bool {
        !self.published.is_empty()
    }
}

/// A single parsed post. Posts are never mutated after extraction.
#[derive(Clone, Debug, PartialEq)]
pub struct Post {
    /// The post's front matter.
    pub metadata: Metadata,

    /// The parsed `published` date, or `None` for drafts.
    pub date: Option<NaiveDate>,

    /// The post body rendered to HTML.
    pub content: String,
}

impl Post {
    /// Converts a [`Post`] into a [`Value`] for templating. The result is a
    /// [`Value::Object`] with the fields `Metadata`, `Date`, and `Content`.
    /// `Metadata` is itself an object with `Name`, `Slug`, `Published`, and
    /// `Tags`. `Date` is rendered as `YYYY-MM-DD` (empty for drafts).
    pub fn to_value(&self) -> Value {
        let mut metadata: HashMap<String, Value> = HashMap::new();
        metadata.insert(
            "Name".to_owned(),
            Value::String(self.metadata.name.clone()),
        );
        metadata.insert(
            "Slug".to_owned(),
            Value::String(self.metadata.slug.clone()),
        );
        metadata.insert(
            "Published".to_owned(),
            Value::String(self.metadata.published.clone()),
        );
        metadata.insert(
            "Tags".to_owned(),
            Value::Array(
                self.metadata
                    .tags
                    .iter()
                    .map(|t| Value::String(t.clone()))
                    .collect(),
            ),
        );

        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("Metadata".to_owned(), Value::Object(metadata));
        m.insert(
            "Date".to_owned(),
            Value::String(match self.date {
                Some(date) => date.format("%Y-%m-%d").to_string(),
                None => String::new(),
            }),
        );
        m.insert("Content".to_owned(), Value::String(self.content.clone()));
        Value::Object(m)
    }
}

impl From<&Post> for Value {
    fn from(p: &Post) -> Value {
        p.to_value()
    }
}
