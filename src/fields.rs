//! Field selection (`pick` / `omit`) for [`crate::Package`].
//!
//! Both options accept either a list of names or one comma-delimited string.
//! Everything is turned into a [`FieldList`] of trimmed names at this boundary.

use serde::{Deserialize, Serialize};

/// Ordered list of field names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawFieldList", into = "Vec<String>")]
pub struct FieldList(Vec<String>);

/// The two accepted spellings before normalization.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawFieldList {
    Delimited(String),
    Names(Vec<String>),
}

impl From<RawFieldList> for FieldList {
    fn from(raw: RawFieldList) -> Self {
        match raw {
            RawFieldList::Delimited(s) => FieldList::parse(&s),
            RawFieldList::Names(names) => FieldList::from(names),
        }
    }
}

impl From<FieldList> for Vec<String> {
    fn from(list: FieldList) -> Self {
        list.0
    }
}

impl FieldList {
    /// Split a comma-delimited string, trimming each name. Empty names are dropped.
    pub fn parse(s: &str) -> Self {
        s.split(',').collect::<Vec<_>>().into()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.iter().any(|f| f == field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: AsRef<str>> From<Vec<S>> for FieldList {
    fn from(names: Vec<S>) -> Self {
        FieldList(
            names
                .iter()
                .map(|name| name.as_ref().trim())
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }
}

impl<S: AsRef<str>> From<&[S]> for FieldList {
    fn from(names: &[S]) -> Self {
        FieldList(
            names
                .iter()
                .map(|name| name.as_ref().trim())
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }
}

impl From<&str> for FieldList {
    fn from(s: &str) -> Self {
        FieldList::parse(s)
    }
}

impl std::str::FromStr for FieldList {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(FieldList::parse(s))
    }
}

impl std::fmt::Display for FieldList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.join(", "))
    }
}

/// Which canonical fields a [`crate::Package`] keeps.
///
/// `pick` takes precedence when both are set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PackageOptions {
    #[serde(default)]
    pub pick: Option<FieldList>,
    #[serde(default)]
    pub omit: Option<FieldList>,
}

impl PackageOptions {
    pub fn pick(fields: impl Into<FieldList>) -> Self {
        Self {
            pick: Some(fields.into()),
            omit: None,
        }
    }

    pub fn omit(fields: impl Into<FieldList>) -> Self {
        Self {
            pick: None,
            omit: Some(fields.into()),
        }
    }

    /// Whether `field` survives this selection.
    pub fn keeps(&self, field: &str) -> bool {
        match (&self.pick, &self.omit) {
            (Some(pick), _) => pick.contains(field),
            (None, Some(omit)) => !omit.contains(field),
            (None, None) => true,
        }
    }
}
