//! Tag-based step selection.
//!
//! A [`StepCollection`] is an ordered view over borrowed [`Step`]s. It is
//! built per query from a manifest and never writes back into it.
use std::collections::BTreeSet;

use super::step::Step;
use crate::error::QueryError;

/// A non-empty set of tags used by a [`TagFilter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagSet(BTreeSet<String>);

impl TagSet {
    /// Build a tag set from user input.
    ///
    /// Each entry may itself hold several tags separated by commas or
    /// whitespace, so `["db,web"]` and `["db", "web"]` are equivalent.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidQuery`] if no tag remains after splitting.
    pub fn parse<S: AsRef<str>>(entries: &[S]) -> Result<Self, QueryError> {
        let tags: BTreeSet<String> = entries
            .iter()
            .flat_map(|entry| {
                entry
                    .as_ref()
                    .split(|c: char| c == ',' || c.is_whitespace())
                    .filter(|t| !t.is_empty())
                    .map(String::from)
                    .collect::<Vec<_>>()
            })
            .collect();
        if tags.is_empty() {
            return Err(QueryError::InvalidQuery(
                "a tag filter needs at least one tag".to_string(),
            ));
        }
        Ok(Self(tags))
    }

    /// Whether `tags` shares at least one tag with this set.
    #[must_use]
    pub fn intersects(&self, tags: &BTreeSet<String>) -> bool {
        !self.0.is_disjoint(tags)
    }

    /// Tags in sorted order.
    #[must_use]
    pub fn tags(&self) -> Vec<&str> {
        self.0.iter().map(String::as_str).collect()
    }
}

/// Predicate selecting steps by tag intersection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagFilter {
    /// Keep steps carrying at least one of the tags.
    IncludeAny(TagSet),
    /// Keep steps carrying none of the tags.
    ExcludeAny(TagSet),
}

impl TagFilter {
    /// Whether `step` passes this filter.
    #[must_use]
    pub fn matches(&self, step: &Step) -> bool {
        match self {
            Self::IncludeAny(tags) => tags.intersects(&step.tags),
            Self::ExcludeAny(tags) => !tags.intersects(&step.tags),
        }
    }
}

/// Ordered collection of steps supporting filter and merge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepCollection<'a> {
    steps: Vec<&'a Step>,
}

impl<'a> StepCollection<'a> {
    /// Wrap `steps`, keeping their order.
    #[must_use]
    pub fn new(steps: impl IntoIterator<Item = &'a Step>) -> Self {
        Self {
            steps: steps.into_iter().collect(),
        }
    }

    /// Keep the steps matching `filter`, in order.
    #[must_use]
    pub fn filter(&self, filter: &TagFilter) -> Self {
        Self {
            steps: self
                .steps
                .iter()
                .copied()
                .filter(|step| filter.matches(step))
                .collect(),
        }
    }

    /// Apply the include filter, then the exclude filter.
    ///
    /// With neither filter the collection is returned unchanged.
    #[must_use]
    pub fn select(&self, include: Option<&TagSet>, exclude: Option<&TagSet>) -> Self {
        let mut selected = self.clone();
        if let Some(tags) = include {
            selected = selected.filter(&TagFilter::IncludeAny(tags.clone()));
        }
        if let Some(tags) = exclude {
            selected = selected.filter(&TagFilter::ExcludeAny(tags.clone()));
        }
        selected
    }

    /// Concatenate `other` after this collection. Duplicates are kept.
    #[must_use]
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            steps: self.steps.iter().chain(other.steps.iter()).copied().collect(),
        }
    }

    /// Number of steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the collection holds no steps.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Iterate over the steps in order.
    pub fn iter(&self) -> std::iter::Copied<std::slice::Iter<'_, &'a Step>> {
        self.into_iter()
    }

    /// Names of the steps in order.
    #[must_use]
    pub fn names(&self) -> Vec<&'a str> {
        self.steps.iter().map(|s| s.name.as_str()).collect()
    }
}

impl<'a> IntoIterator for StepCollection<'a> {
    type Item = &'a Step;
    type IntoIter = std::vec::IntoIter<&'a Step>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.into_iter()
    }
}

impl<'b, 'a> IntoIterator for &'b StepCollection<'a> {
    type Item = &'a Step;
    type IntoIter = std::iter::Copied<std::slice::Iter<'b, &'a Step>>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter().copied()
    }
}
