//! Field-level validation primitives shared by the form schemas.
//!
//! A schema run feeds every rule into a [`Checker`]. Rules never short-circuit:
//! all violations of all fields are collected, in the order the rules ran, so
//! the caller can show every message next to its field at once.

use std::fmt;

use validator::ValidateLength;

/// Dotted path of a form field, e.g. `event.endDateTime` or `eventPhotos.0`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath(String);

impl FieldPath {
    pub fn new(path: impl Into<String>) -> Self {
        FieldPath(path.into())
    }

    /// Path of `name` nested under `prefix`; an empty prefix means top level.
    pub fn nested(prefix: &str, name: &str) -> Self {
        if prefix.is_empty() {
            FieldPath(name.to_string())
        } else {
            FieldPath(format!("{prefix}.{name}"))
        }
    }

    pub fn index(&self, i: usize) -> Self {
        FieldPath(format!("{}.{}", self.0, i))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub path: FieldPath,
    pub message: String,
}

/// Non-empty, ordered list of violations from one schema run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violations(Vec<Violation>);

impl Violations {
    pub fn iter(&self) -> impl Iterator<Item = &Violation> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Messages attached to one field, in rule order.
    pub fn for_field<'a>(&'a self, path: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.0
            .iter()
            .filter(move |v| v.path.as_str() == path)
            .map(|v| v.message.as_str())
    }

    pub fn has_field(&self, path: &str) -> bool {
        self.for_field(path).next().is_some()
    }

    /// Distinct field paths, in the order they first failed.
    pub fn fields(&self) -> Vec<&FieldPath> {
        let mut fields: Vec<&FieldPath> = Vec::new();
        for v in &self.0 {
            if !fields.contains(&&v.path) {
                fields.push(&v.path);
            }
        }
        fields
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", v.path, v.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for Violations {}

impl<'a> IntoIterator for &'a Violations {
    type Item = &'a Violation;
    type IntoIter = std::slice::Iter<'a, Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Collects violations while a schema runs.
#[derive(Debug, Default)]
pub struct Checker {
    violations: Vec<Violation>,
}

impl Checker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `message` on `path` unless `ok` holds.
    pub fn ensure(&mut self, ok: bool, path: &FieldPath, message: &str) {
        if !ok {
            self.violations.push(Violation {
                path: path.clone(),
                message: message.to_string(),
            });
        }
    }

    /// Lengths count Unicode scalar values, so an emoji outside the BMP is
    /// one character here even though it takes two UTF-16 units.
    pub fn min_len(&mut self, path: &FieldPath, value: &str, min: usize, message: &str) {
        let ok = value.validate_length(Some(min as u64), None, None);
        self.ensure(ok, path, message);
    }

    /// A missing value always passes.
    pub fn max_len(&mut self, path: &FieldPath, value: Option<&str>, max: usize, message: &str) {
        if let Some(value) = value {
            let ok = value.validate_length(None, Some(max as u64), None);
            self.ensure(ok, path, message);
        }
    }

    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    /// Hand back `value` if no rule failed.
    pub fn finish<T>(self, value: T) -> Result<T, Violations> {
        if self.violations.is_empty() {
            Ok(value)
        } else {
            Err(Violations(self.violations))
        }
    }

    /// Like [`Checker::finish`], building the value only when every rule passed.
    pub fn finish_with<T>(self, build: impl FnOnce() -> T) -> Result<T, Violations> {
        if self.violations.is_empty() {
            Ok(build())
        } else {
            Err(Violations(self.violations))
        }
    }
}

/// Optional text fields come back from inputs as empty strings; the backend wants `null`.
pub fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|s| !s.is_empty()).map(str::to_string)
}
