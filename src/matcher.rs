//! # Project Matchers
//!
//! A small predicate algebra over the declared attributes of a project: its
//! type (a free-form, conventionally dash-delimited string such as
//! `java-boot-application`) and its labels (a comma-separated attribute).
//!
//! ## Variants
//!
//! | Matcher              | Description             | True when                                   |
//! |----------------------|-------------------------|---------------------------------------------|
//! | `TypeExact(t)`       | `type [t]`              | the type equals `t`                         |
//! | `TypePrefix(p)`      | `type prefix [p]`       | the type starts with `p`                    |
//! | `TypeSuffix(s)`      | `type suffix [s]`       | the type ends with `s`                      |
//! | `TypeRegex(r)`       | `type regex [r]`        | `r` matches the whole type                  |
//! | `TypeHaving(ts)`     | `type having [a, b]`    | every typelet in `ts` is a segment of the type |
//! | `Label(l)`           | `label [l]`             | `l` is one of the labels                    |
//! | `Labels(ls)`         | `labels [a, b]`         | every label in `ls` is one of the labels    |
//! | `And(ms)`            | `and(d1, d2)`           | all children match (true when empty)        |
//! | `Or(ms)`             | `or(d1, d2)`            | any child matches (false when empty)        |
//! | `Not(m)`             | `not(d)`                | the child does not match                    |
//!
//! A project without a type never matches a type matcher, and a project
//! without a label attribute never matches a label matcher. Evaluation is pure;
//! the only fallible step is compiling a `TypeRegex`, which happens when the
//! matcher is built.
//!
//! ## Manifest form
//!
//! Matchers deserialize from single-key YAML mappings:
//!
//! ```yaml
//! and:
//!   - type-prefix: java
//!   - not: { labels: [internal, legacy] }
//!   - type-having: [boot, application]
//! ```

use std::collections::HashSet;
use std::fmt;
use std::ops::{BitAnd, BitOr, Not};

use regex::Regex;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::project::{ProjectNode, PROJECT_TYPE_DELIMITER};

/// A compiled type pattern that must match the whole project type.
#[derive(Debug, Clone)]
pub struct TypePattern {
    pattern: String,
    regex: Regex,
}

impl TypePattern {
    pub fn new(pattern: impl Into<String>) -> Result<Self> {
        let pattern = pattern.into();
        let regex = Regex::new(&format!("^(?:{})$", pattern))?;
        Ok(Self { pattern, regex })
    }

    /// The pattern as written, without anchors.
    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

impl PartialEq for TypePattern {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern
    }
}

impl Eq for TypePattern {}

/// A predicate over a project's type and labels.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "MatcherSpec")]
pub enum Matcher {
    TypeExact(String),
    TypePrefix(String),
    TypeSuffix(String),
    TypeRegex(TypePattern),
    TypeHaving(Vec<String>),
    Label(String),
    Labels(Vec<String>),
    And(Vec<Matcher>),
    Or(Vec<Matcher>),
    Not(Box<Matcher>),
}

impl Matcher {
    pub fn by_type(project_type: impl Into<String>) -> Self {
        Matcher::TypeExact(project_type.into())
    }

    pub fn by_type_prefix(prefix: impl Into<String>) -> Self {
        Matcher::TypePrefix(prefix.into())
    }

    pub fn by_type_suffix(suffix: impl Into<String>) -> Self {
        Matcher::TypeSuffix(suffix.into())
    }

    /// Fails when `pattern` is not a valid regular expression.
    pub fn by_type_regex(pattern: impl Into<String>) -> Result<Self> {
        Ok(Matcher::TypeRegex(TypePattern::new(pattern)?))
    }

    pub fn by_type_having<I, S>(typelets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Matcher::TypeHaving(typelets.into_iter().map(Into::into).collect())
    }

    pub fn by_label(label: impl Into<String>) -> Self {
        Matcher::Label(label.into())
    }

    pub fn by_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Matcher::Labels(labels.into_iter().map(Into::into).collect())
    }

    pub fn all_of(matchers: impl IntoIterator<Item = Matcher>) -> Self {
        Matcher::And(matchers.into_iter().collect())
    }

    pub fn any_of(matchers: impl IntoIterator<Item = Matcher>) -> Self {
        Matcher::Or(matchers.into_iter().collect())
    }

    /// `and(self, other)`. Nested, never flattened.
    pub fn and(self, other: Matcher) -> Self {
        Matcher::And(vec![self, other])
    }

    /// `or(self, other)`. Nested, never flattened.
    pub fn or(self, other: Matcher) -> Self {
        Matcher::Or(vec![self, other])
    }

    pub fn matches(&self, project: &ProjectNode) -> bool {
        match self {
            Matcher::TypeExact(expected) => project.project_type() == Some(expected.as_str()),
            Matcher::TypePrefix(prefix) => project
                .project_type()
                .is_some_and(|t| t.starts_with(prefix.as_str())),
            Matcher::TypeSuffix(suffix) => project
                .project_type()
                .is_some_and(|t| t.ends_with(suffix.as_str())),
            Matcher::TypeRegex(pattern) => project.project_type().is_some_and(|t| pattern.is_match(t)),
            Matcher::TypeHaving(typelets) => project.project_type().is_some_and(|t| {
                let segments: HashSet<&str> = t.split(PROJECT_TYPE_DELIMITER).collect();
                typelets.iter().all(|typelet| segments.contains(typelet.as_str()))
            }),
            Matcher::Label(label) => project
                .labels()
                .is_some_and(|labels| labels.contains(label.as_str())),
            Matcher::Labels(wanted) => project
                .labels()
                .is_some_and(|labels| wanted.iter().all(|l| labels.contains(l.as_str()))),
            Matcher::And(matchers) => matchers.iter().all(|m| m.matches(project)),
            Matcher::Or(matchers) => matchers.iter().any(|m| m.matches(project)),
            Matcher::Not(matcher) => !matcher.matches(project),
        }
    }

    /// The audit-log description, e.g. `and(type prefix [java], label [x])`.
    pub fn description(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Matcher::TypeExact(t) => write!(f, "type [{}]", t),
            Matcher::TypePrefix(p) => write!(f, "type prefix [{}]", p),
            Matcher::TypeSuffix(s) => write!(f, "type suffix [{}]", s),
            Matcher::TypeRegex(r) => write!(f, "type regex [{}]", r.as_str()),
            Matcher::TypeHaving(ts) => write!(f, "type having [{}]", ts.join(", ")),
            Matcher::Label(l) => write!(f, "label [{}]", l),
            Matcher::Labels(ls) => write!(f, "labels [{}]", ls.join(", ")),
            Matcher::And(ms) => write!(f, "and({})", join_descriptions(ms)),
            Matcher::Or(ms) => write!(f, "or({})", join_descriptions(ms)),
            Matcher::Not(m) => write!(f, "not({})", m),
        }
    }
}

fn join_descriptions(matchers: &[Matcher]) -> String {
    matchers
        .iter()
        .map(Matcher::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl Not for Matcher {
    type Output = Matcher;

    fn not(self) -> Matcher {
        Matcher::Not(Box::new(self))
    }
}

impl BitAnd for Matcher {
    type Output = Matcher;

    fn bitand(self, rhs: Matcher) -> Matcher {
        self.and(rhs)
    }
}

impl BitOr for Matcher {
    type Output = Matcher;

    fn bitor(self, rhs: Matcher) -> Matcher {
        self.or(rhs)
    }
}

/// Manifest shape of a [`Matcher`]: a map with exactly one key naming the
/// matcher kind.
#[derive(Debug, Deserialize)]
#[serde(untagged, deny_unknown_fields)]
enum MatcherSpec {
    Type {
        #[serde(rename = "type")]
        project_type: String,
    },
    TypePrefix {
        #[serde(rename = "type-prefix")]
        prefix: String,
    },
    TypeSuffix {
        #[serde(rename = "type-suffix")]
        suffix: String,
    },
    TypeRegex {
        #[serde(rename = "type-regex")]
        pattern: String,
    },
    TypeHaving {
        #[serde(rename = "type-having")]
        typelets: OneOrMany,
    },
    Label {
        label: String,
    },
    Labels {
        labels: OneOrMany,
    },
    And {
        and: Vec<MatcherSpec>,
    },
    Or {
        or: Vec<MatcherSpec>,
    },
    Not {
        not: Box<MatcherSpec>,
    },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl From<OneOrMany> for Vec<String> {
    fn from(value: OneOrMany) -> Self {
        match value {
            OneOrMany::One(s) => vec![s],
            OneOrMany::Many(v) => v,
        }
    }
}

impl TryFrom<MatcherSpec> for Matcher {
    type Error = Error;

    fn try_from(spec: MatcherSpec) -> Result<Self> {
        Ok(match spec {
            MatcherSpec::Type { project_type } => Matcher::TypeExact(project_type),
            MatcherSpec::TypePrefix { prefix } => Matcher::TypePrefix(prefix),
            MatcherSpec::TypeSuffix { suffix } => Matcher::TypeSuffix(suffix),
            MatcherSpec::TypeRegex { pattern } => Matcher::by_type_regex(pattern)?,
            MatcherSpec::TypeHaving { typelets } => Matcher::TypeHaving(typelets.into()),
            MatcherSpec::Label { label } => Matcher::Label(label),
            MatcherSpec::Labels { labels } => Matcher::Labels(labels.into()),
            MatcherSpec::And { and } => Matcher::And(convert_all(and)?),
            MatcherSpec::Or { or } => Matcher::Or(convert_all(or)?),
            MatcherSpec::Not { not } => Matcher::Not(Box::new(Matcher::try_from(*not)?)),
        })
    }
}

fn convert_all(specs: Vec<MatcherSpec>) -> Result<Vec<Matcher>> {
    specs.into_iter().map(Matcher::try_from).collect()
}
