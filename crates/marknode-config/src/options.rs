//! Rendering options and per-key overrides.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Effective options for one rendering pass.
///
/// Built once before a pass starts and read-only for its duration.
/// [`Default`] yields the built-in defaults every caller override is merged over.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
#[allow(clippy::struct_excessive_bools)]
pub struct RenderOptions {
    /// GitHub Flavored Markdown: tables, strikethrough, task lists.
    pub gfm: bool,
    /// Treat single line breaks inside a paragraph as hard breaks.
    pub breaks: bool,
    /// Stick to original markdown rules; disables the GFM extensions.
    pub pedantic: bool,
    /// Start a new list when the bullet character changes.
    pub smart_lists: bool,
    /// Restrict link and image destinations to `http:`/`https:` and
    /// render raw HTML as text.
    pub sanitize: bool,
    /// Typographic quotes, dashes and ellipses.
    pub smartypants: bool,
    /// Turn compiler failures into rendered error content instead of errors.
    pub silent: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            gfm: true,
            breaks: false,
            pedantic: false,
            smart_lists: true,
            sanitize: false,
            smartypants: false,
            silent: false,
        }
    }
}

impl RenderOptions {
    /// Defaults with `overrides` applied on top.
    #[must_use]
    pub fn merged(overrides: &OptionOverrides) -> Self {
        let mut options = Self::default();
        options.apply_overrides(overrides);
        options
    }

    /// Apply every override that is set. Unset keys keep their current value.
    pub fn apply_overrides(&mut self, overrides: &OptionOverrides) {
        if let Some(gfm) = overrides.gfm {
            self.gfm = gfm;
        }
        if let Some(breaks) = overrides.breaks {
            self.breaks = breaks;
        }
        if let Some(pedantic) = overrides.pedantic {
            self.pedantic = pedantic;
        }
        if let Some(smart_lists) = overrides.smart_lists {
            self.smart_lists = smart_lists;
        }
        if let Some(sanitize) = overrides.sanitize {
            self.sanitize = sanitize;
        }
        if let Some(smartypants) = overrides.smartypants {
            self.smartypants = smartypants;
        }
        if let Some(silent) = overrides.silent {
            self.silent = silent;
        }
    }

    /// Whether the GFM parser extensions are active.
    ///
    /// Pedantic mode wins over `gfm`.
    #[must_use]
    pub fn gfm_extensions(&self) -> bool {
        self.gfm && !self.pedantic
    }
}

/// Caller-supplied option values.
///
/// All fields are optional. Only `Some` values override the defaults.
/// Keys are accepted in camelCase (`smartLists`) and snake_case (`smart_lists`).
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OptionOverrides {
    pub gfm: Option<bool>,
    pub breaks: Option<bool>,
    pub pedantic: Option<bool>,
    #[serde(alias = "smart_lists")]
    pub smart_lists: Option<bool>,
    pub sanitize: Option<bool>,
    pub smartypants: Option<bool>,
    pub silent: Option<bool>,
}

impl OptionOverrides {
    /// Set one option from its textual key and value.
    ///
    /// # Examples
    ///
    /// ```
    /// use marknode_config::OptionOverrides;
    ///
    /// let mut overrides = OptionOverrides::default();
    /// overrides.set("smartLists", "false").unwrap();
    /// assert_eq!(overrides.smart_lists, Some(false));
    /// ```
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let parsed: bool = value.trim().parse().map_err(|_| ConfigError::InvalidValue {
            key: key.to_owned(),
            value: value.to_owned(),
        })?;
        let slot = match key.trim() {
            "gfm" => &mut self.gfm,
            "breaks" => &mut self.breaks,
            "pedantic" => &mut self.pedantic,
            "smartLists" | "smart_lists" => &mut self.smart_lists,
            "sanitize" => &mut self.sanitize,
            "smartypants" => &mut self.smartypants,
            "silent" => &mut self.silent,
            other => return Err(ConfigError::UnknownOption(other.to_owned())),
        };
        *slot = Some(parsed);
        Ok(())
    }

    /// Parse and apply a `key=value` assignment.
    pub fn set_assignment(&mut self, assignment: &str) -> Result<(), ConfigError> {
        let (key, value) = assignment.split_once('=').ok_or_else(|| {
            ConfigError::Validation(format!("expected key=value, got `{assignment}`"))
        })?;
        self.set(key, value)
    }

    /// Layer `other` on top of `self`: keys set in `other` win.
    pub fn extend(&mut self, other: &OptionOverrides) {
        let pairs = [
            (&mut self.gfm, other.gfm),
            (&mut self.breaks, other.breaks),
            (&mut self.pedantic, other.pedantic),
            (&mut self.smart_lists, other.smart_lists),
            (&mut self.sanitize, other.sanitize),
            (&mut self.smartypants, other.smartypants),
            (&mut self.silent, other.silent),
        ];
        for (slot, value) in pairs {
            if value.is_some() {
                *slot = value;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let options = RenderOptions::default();
        assert!(options.gfm);
        assert!(!options.breaks);
        assert!(!options.pedantic);
        assert!(options.smart_lists);
        assert!(!options.sanitize);
        assert!(!options.smartypants);
        assert!(!options.silent);
    }

    #[test]
    fn test_merged_empty_overrides_is_default() {
        assert_eq!(
            RenderOptions::merged(&OptionOverrides::default()),
            RenderOptions::default()
        );
    }

    #[test]
    fn test_merged_caller_values_win_per_key() {
        let overrides = OptionOverrides {
            gfm: Some(false),
            sanitize: Some(true),
            ..OptionOverrides::default()
        };
        let options = RenderOptions::merged(&overrides);
        assert!(!options.gfm);
        assert!(options.sanitize);
        // untouched keys keep defaults
        assert!(options.smart_lists);
        assert!(!options.breaks);
    }

    #[test]
    fn test_pedantic_disables_gfm_extensions() {
        let mut options = RenderOptions::default();
        assert!(options.gfm_extensions());
        options.pedantic = true;
        assert!(!options.gfm_extensions());
    }

    #[test]
    fn test_set_known_keys() {
        let mut overrides = OptionOverrides::default();
        overrides.set("breaks", "true").unwrap();
        overrides.set("smart_lists", "false").unwrap();
        overrides.set("silent", " true ").unwrap();
        assert_eq!(overrides.breaks, Some(true));
        assert_eq!(overrides.smart_lists, Some(false));
        assert_eq!(overrides.silent, Some(true));
    }

    #[test]
    fn test_set_unknown_key() {
        let err = OptionOverrides::default().set("tables", "true").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownOption(ref key) if key == "tables"));
    }

    #[test]
    fn test_set_invalid_value() {
        let err = OptionOverrides::default().set("gfm", "maybe").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_set_assignment() {
        let mut overrides = OptionOverrides::default();
        overrides.set_assignment("sanitize=true").unwrap();
        assert_eq!(overrides.sanitize, Some(true));

        let err = overrides.set_assignment("sanitize").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_extend_prefers_other() {
        let mut base = OptionOverrides {
            gfm: Some(false),
            breaks: Some(true),
            ..OptionOverrides::default()
        };
        let top = OptionOverrides {
            gfm: Some(true),
            ..OptionOverrides::default()
        };
        base.extend(&top);
        assert_eq!(base.gfm, Some(true));
        assert_eq!(base.breaks, Some(true));
    }

    #[test]
    fn test_deserialize_camel_and_snake_keys() {
        let camel: OptionOverrides = toml::from_str("smartLists = false").unwrap();
        let snake: OptionOverrides = toml::from_str("smart_lists = false").unwrap();
        assert_eq!(camel.smart_lists, Some(false));
        assert_eq!(camel, snake);
    }
}
