//! Classifier tags for goals and executors.

use std::borrow::Cow;
use std::fmt;

/// Opaque classifier of a goal, used for catalog lookup and bulk removal.
///
/// Categories compare by their key only. Static keys are free to construct,
/// which lets catalogs expose them as constants:
///
/// ```
/// use goal_core::GoalCategory;
///
/// const WANDER: GoalCategory = GoalCategory::from_static("wander");
/// assert_eq!(WANDER, GoalCategory::new("wander"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct GoalCategory(Cow<'static, str>);

impl GoalCategory {
    /// Creates a category from a static key without allocating.
    pub const fn from_static(key: &'static str) -> Self {
        Self(Cow::Borrowed(key))
    }

    /// Creates a category from an owned key (e.g. one read from a data file).
    pub fn new(key: impl Into<String>) -> Self {
        Self(Cow::Owned(key.into()))
    }

    /// Returns the category key.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GoalCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for GoalCategory {
    fn from(key: &'static str) -> Self {
        Self::from_static(key)
    }
}

impl From<String> for GoalCategory {
    fn from(key: String) -> Self {
        Self::new(key)
    }
}

/// Kind of executor a goal runs under.
///
/// An actor holds at most one executor per category and ticks them
/// independently, in declaration order: target selection first, so that the
/// normal executor sees this tick's target.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ExecutorCategory {
    /// Picks what the actor is hostile towards.
    Target,
    /// Everything else: movement, looking around, interaction.
    #[default]
    Normal,
}

/// Identity of the actor that owns an executor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OwnerId(pub u32);

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn static_and_owned_categories_are_equal() {
        let a = GoalCategory::from_static("tempt");
        let b = GoalCategory::new(String::from("tempt"));
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "tempt");
    }

    #[test]
    fn executor_categories_tick_target_first() {
        let order: Vec<_> = ExecutorCategory::iter().collect();
        assert_eq!(order, vec![ExecutorCategory::Target, ExecutorCategory::Normal]);
    }

    #[test]
    fn executor_category_parses_case_insensitively() {
        assert_eq!(
            ExecutorCategory::from_str("TARGET").unwrap(),
            ExecutorCategory::Target
        );
        assert_eq!(ExecutorCategory::Normal.as_ref(), "normal");
    }
}
