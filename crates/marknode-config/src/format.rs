//! Input text format.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How input text is interpreted.
///
/// Only the exact name `plain` selects plain text; every other name means markdown.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Format {
    /// Line-split plain text.
    Plain,
    /// Markdown compiled into rich nodes.
    #[default]
    Markdown,
}

impl Format {
    /// Resolve a format name.
    ///
    /// # Examples
    ///
    /// ```
    /// use marknode_config::Format;
    ///
    /// assert_eq!(Format::from_name("plain"), Format::Plain);
    /// assert_eq!(Format::from_name("markdown"), Format::Markdown);
    /// assert_eq!(Format::from_name("anything"), Format::Markdown);
    /// ```
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        if name == "plain" {
            Self::Plain
        } else {
            Self::Markdown
        }
    }

    /// Canonical name of the format.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::Markdown => "markdown",
        }
    }
}

impl FromStr for Format {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_name(s))
    }
}

impl From<String> for Format {
    fn from(name: String) -> Self {
        Self::from_name(&name)
    }
}

impl From<Format> for String {
    fn from(format: Format) -> Self {
        format.name().to_owned()
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
