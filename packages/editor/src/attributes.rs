//! # Attribute store
//!
//! Holds the "active" font family, font size and color: what the toolbar shows
//! and what the next typed character will get when nothing on the selection
//! says otherwise.
//!
//! The store is written two ways:
//!
//! - **explicitly**, by the attribute pickers, through [`AttributeStore::set`]
//!   (last write wins per field);
//! - **implicitly**, when the selection moves, through
//!   [`AttributeStore::resync`] with the engine's [`TextStyleReading`].
//!
//! ## Resync policy
//!
//! | Reading | Effect on the field |
//! |---------|---------------------|
//! | `Uniform(v)` | becomes `v`, ambiguity cleared |
//! | `Absent` | unchanged |
//! | `Mixed` | unchanged, flagged ambiguous |
//!
//! An ambiguous field keeps reporting its previous value from
//! [`AttributeStore::get`] but [`AttributeStore::field`] returns
//! [`FieldState::Ambiguous`]. Only an explicit `set` of that field, or a later
//! uniform reading, resolves it.

use serde::{Deserialize, Serialize};
use store::config::AttributesConfig;

/// Formatting applied to the next typed character.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveAttributes {
    pub font_family: String,
    /// Hex color, e.g. `"#ff0000"`.
    pub font_color: String,
    /// CSS size, e.g. `"16px"`.
    pub font_size: String,
}

impl Default for ActiveAttributes {
    fn default() -> Self {
        Self::from(&AttributesConfig::default())
    }
}

impl From<&AttributesConfig> for ActiveAttributes {
    fn from(config: &AttributesConfig) -> Self {
        Self {
            font_family: config.font_family.clone(),
            font_color: normalize_color(&config.color),
            font_size: config.font_size.clone(),
        }
    }
}

/// Partial update for [`AttributeStore::set`]. Unset fields are untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AttributePatch {
    pub font_family: Option<String>,
    pub font_color: Option<String>,
    pub font_size: Option<String>,
}

impl AttributePatch {
    pub fn color(color: &str) -> Self {
        Self {
            font_color: Some(color.to_string()),
            ..Self::default()
        }
    }

    pub fn font_family(family: &str) -> Self {
        Self {
            font_family: Some(family.to_string()),
            ..Self::default()
        }
    }

    pub fn font_size(size: &str) -> Self {
        Self {
            font_size: Some(size.to_string()),
            ..Self::default()
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AttributeField {
    FontFamily,
    FontColor,
    FontSize,
}

/// One attribute read across a selection.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum AttrReading<T> {
    /// No selected text carries the attribute.
    #[default]
    Absent,
    /// All selected text carries the same value.
    Uniform(T),
    /// The selection spans different values (or set and unset text).
    Mixed,
}

impl<T: PartialEq + Clone> AttrReading<T> {
    /// Fold a sequence of per-run values into a reading.
    pub fn collect<'a, I>(values: I) -> Self
    where
        I: IntoIterator<Item = Option<&'a T>>,
        T: 'a,
    {
        let mut first: Option<Option<&T>> = None;
        for value in values {
            match first {
                None => first = Some(value),
                Some(seen) if seen != value => return AttrReading::Mixed,
                Some(_) => {}
            }
        }
        match first.flatten() {
            Some(v) => AttrReading::Uniform(v.clone()),
            None => AttrReading::Absent,
        }
    }

    pub fn uniform(&self) -> Option<&T> {
        match self {
            AttrReading::Uniform(v) => Some(v),
            _ => None,
        }
    }
}

/// The `textStyle` mark read across a selection.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextStyleReading {
    pub color: AttrReading<String>,
    pub font_family: AttrReading<String>,
    pub font_size: AttrReading<String>,
}

/// What the toolbar should show for one field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldState<'a> {
    Known(&'a str),
    Ambiguous,
}

/// Active attributes for one editing session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttributeStore {
    current: ActiveAttributes,
    defaults: ActiveAttributes,
    ambiguous_family: bool,
    ambiguous_color: bool,
    ambiguous_size: bool,
}

impl Default for AttributeStore {
    fn default() -> Self {
        Self::new(ActiveAttributes::default())
    }
}

impl AttributeStore {
    pub fn new(defaults: ActiveAttributes) -> Self {
        Self {
            current: defaults.clone(),
            defaults,
            ambiguous_family: false,
            ambiguous_color: false,
            ambiguous_size: false,
        }
    }

    pub fn get(&self) -> &ActiveAttributes {
        &self.current
    }

    pub fn defaults(&self) -> &ActiveAttributes {
        &self.defaults
    }

    /// Explicit update from a picker. Last write wins per field.
    pub fn set(&mut self, patch: AttributePatch) {
        if let Some(family) = patch.font_family {
            self.current.font_family = family;
            self.ambiguous_family = false;
        }
        if let Some(color) = patch.font_color {
            self.current.font_color = normalize_color(&color);
            self.ambiguous_color = false;
        }
        if let Some(size) = patch.font_size {
            self.current.font_size = size;
            self.ambiguous_size = false;
        }
    }

    /// Re-read the store from the attributes at a new selection.
    pub fn resync(&mut self, reading: &TextStyleReading) {
        resync_field(&mut self.current.font_family, &mut self.ambiguous_family, &reading.font_family, |v| v.to_string());
        resync_field(&mut self.current.font_color, &mut self.ambiguous_color, &reading.color, normalize_color);
        resync_field(&mut self.current.font_size, &mut self.ambiguous_size, &reading.font_size, |v| v.to_string());
    }

    pub fn is_ambiguous(&self, field: AttributeField) -> bool {
        match field {
            AttributeField::FontFamily => self.ambiguous_family,
            AttributeField::FontColor => self.ambiguous_color,
            AttributeField::FontSize => self.ambiguous_size,
        }
    }

    pub fn field(&self, field: AttributeField) -> FieldState<'_> {
        if self.is_ambiguous(field) {
            return FieldState::Ambiguous;
        }
        FieldState::Known(match field {
            AttributeField::FontFamily => &self.current.font_family,
            AttributeField::FontColor => &self.current.font_color,
            AttributeField::FontSize => &self.current.font_size,
        })
    }

    /// Back to the configured defaults. Used on document switch and after
    /// clearing formatting.
    pub fn reset(&mut self) {
        *self = Self::new(self.defaults.clone());
    }
}

fn resync_field(
    slot: &mut String,
    ambiguous: &mut bool,
    reading: &AttrReading<String>,
    convert: impl Fn(&str) -> String,
) {
    match reading {
        AttrReading::Uniform(value) => {
            *slot = convert(value);
            *ambiguous = false;
        }
        AttrReading::Mixed => *ambiguous = true,
        AttrReading::Absent => {}
    }
}

/// Lowercase a hex color and expand the `#rgb` shorthand. Non-hex values are
/// trimmed and lowercased.
pub fn normalize_color(color: &str) -> String {
    let c = color.trim().to_ascii_lowercase();
    if let Some(hex) = c.strip_prefix('#') {
        if hex.len() == 3 && hex.chars().all(|ch| ch.is_ascii_hexdigit()) {
            return hex.chars().fold(String::from("#"), |mut out, ch| {
                out.push(ch);
                out.push(ch);
                out
            });
        }
    }
    c
}
