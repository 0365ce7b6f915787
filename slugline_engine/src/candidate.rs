//! Candidate specifications and the lazy sequence that walks them.
//!
//! A [`CandidateSpec`] is an ordered list of [`Candidate`] entries. Walking it
//! with [`CandidateSpec::sequence`] resolves one entry at a time, so nothing
//! past the entry that finally wins is ever read or invoked.

use std::collections::VecDeque;
use std::fmt;

use crate::error::SlugError;
use crate::host::SlugHost;

/// Deferred candidate computation, invoked with the host when it is reached.
pub type Thunk<H> = Box<dyn Fn(&H) -> anyhow::Result<CandidateValue>>;

/// One entry in a candidate specification.
pub enum Candidate<H: ?Sized> {
    /// Used as-is.
    Literal(String),
    /// Read from the host by attribute name.
    Reference(String),
    /// Computed on demand. A `Many` result is flattened into consecutive candidates.
    Thunk(Thunk<H>),
    /// Several parts joined with the sequence separator into one candidate.
    Composite(Vec<Candidate<H>>),
}

impl<H: ?Sized> Candidate<H> {
    pub fn literal(text: impl Into<String>) -> Self {
        Candidate::Literal(text.into())
    }

    pub fn reference(name: impl Into<String>) -> Self {
        Candidate::Reference(name.into())
    }

    pub fn thunk<F, V>(compute: F) -> Self
    where
        F: Fn(&H) -> anyhow::Result<V> + 'static,
        V: Into<CandidateValue>,
    {
        Candidate::Thunk(Box::new(move |host: &H| -> anyhow::Result<CandidateValue> {
            compute(host).map(Into::into)
        }))
    }

    /// A thunk that ignores the host and cannot fail.
    pub fn lazy<F, V>(compute: F) -> Self
    where
        F: Fn() -> V + 'static,
        V: Into<CandidateValue>,
    {
        Candidate::Thunk(Box::new(move |_: &H| -> anyhow::Result<CandidateValue> { Ok(compute().into()) }))
    }

    pub fn composite(parts: impl IntoIterator<Item = Candidate<H>>) -> Self {
        Candidate::Composite(parts.into_iter().collect())
    }
}

impl<H: ?Sized> fmt::Debug for Candidate<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Candidate::Literal(text) => f.debug_tuple("Literal").field(text).finish(),
            Candidate::Reference(name) => f.debug_tuple("Reference").field(name).finish(),
            Candidate::Thunk(_) => f.write_str("Thunk(..)"),
            Candidate::Composite(parts) => f.debug_tuple("Composite").field(parts).finish(),
        }
    }
}

/// What a thunk hands back.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CandidateValue {
    #[default]
    Absent,
    One(String),
    Many(Vec<String>),
}

impl CandidateValue {
    /// Present values in order; empty strings count as absent.
    pub fn into_values(self) -> Vec<String> {
        match self {
            CandidateValue::Absent => Vec::new(),
            CandidateValue::One(value) => present(value).into_iter().collect(),
            CandidateValue::Many(values) => values.into_iter().filter_map(present).collect(),
        }
    }
}

impl From<String> for CandidateValue {
    fn from(value: String) -> Self {
        CandidateValue::One(value)
    }
}

impl From<&str> for CandidateValue {
    fn from(value: &str) -> Self {
        CandidateValue::One(value.to_string())
    }
}

impl From<Option<String>> for CandidateValue {
    fn from(value: Option<String>) -> Self {
        value.map_or(CandidateValue::Absent, CandidateValue::One)
    }
}

impl From<Vec<String>> for CandidateValue {
    fn from(values: Vec<String>) -> Self {
        CandidateValue::Many(values)
    }
}

impl From<Vec<&str>> for CandidateValue {
    fn from(values: Vec<&str>) -> Self {
        CandidateValue::Many(values.into_iter().map(str::to_string).collect())
    }
}

/// Ordered candidates for one generation attempt.
pub struct CandidateSpec<H: ?Sized> {
    entries: Vec<Candidate<H>>,
}

impl<H: ?Sized> CandidateSpec<H> {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    #[must_use]
    pub fn with(mut self, candidate: Candidate<H>) -> Self {
        self.entries.push(candidate);
        self
    }

    #[must_use]
    pub fn literal(self, text: impl Into<String>) -> Self {
        self.with(Candidate::literal(text))
    }

    #[must_use]
    pub fn reference(self, name: impl Into<String>) -> Self {
        self.with(Candidate::reference(name))
    }

    /// Append a multi-part candidate built from attribute names, e.g. `["name", "city"]`.
    #[must_use]
    pub fn references<I, S>(self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with(Candidate::composite(names.into_iter().map(Candidate::reference)))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Candidate<H>] {
        &self.entries
    }
}

impl<H: SlugHost + ?Sized> CandidateSpec<H> {
    /// Walk the entries lazily against `host`, joining composite parts with `separator`.
    pub fn sequence<'a>(&'a self, host: &'a H, separator: &'a str) -> CandidateSequence<'a, H> {
        CandidateSequence {
            host,
            separator,
            entries: self.entries.iter(),
            pending: VecDeque::new(),
            evaluated: 0,
        }
    }
}

impl<H: ?Sized> Default for CandidateSpec<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: ?Sized> From<Vec<Candidate<H>>> for CandidateSpec<H> {
    fn from(entries: Vec<Candidate<H>>) -> Self {
        Self { entries }
    }
}

impl<H: ?Sized> FromIterator<Candidate<H>> for CandidateSpec<H> {
    fn from_iter<I: IntoIterator<Item = Candidate<H>>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<H: ?Sized> fmt::Debug for CandidateSpec<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.entries).finish()
    }
}

/// Lazy iterator of raw candidate values.
///
/// Absent values are skipped here; an entry is only resolved once every value
/// produced by the entries before it has been handed out.
pub struct CandidateSequence<'a, H: ?Sized> {
    host: &'a H,
    separator: &'a str,
    entries: std::slice::Iter<'a, Candidate<H>>,
    pending: VecDeque<String>,
    evaluated: usize,
}

impl<H: SlugHost + ?Sized> CandidateSequence<'_, H> {
    /// Number of spec entries resolved so far.
    pub fn evaluated(&self) -> usize {
        self.evaluated
    }

    fn resolve(&self, entry: &Candidate<H>) -> Result<Vec<String>, SlugError> {
        match entry {
            Candidate::Literal(text) => Ok(present(text.clone()).into_iter().collect()),
            Candidate::Reference(name) => Ok(self.host.read_attribute(name)?.and_then(present).into_iter().collect()),
            Candidate::Thunk(compute) => Ok(compute(self.host)?.into_values()),
            Candidate::Composite(parts) => {
                let mut pieces = Vec::new();
                for part in parts {
                    pieces.extend(self.resolve(part)?);
                }
                pieces.retain(|piece| !piece.trim().is_empty());
                if pieces.is_empty() {
                    Ok(Vec::new())
                } else {
                    Ok(vec![pieces.join(self.separator)])
                }
            },
        }
    }
}

impl<H: SlugHost + ?Sized> Iterator for CandidateSequence<'_, H> {
    type Item = Result<String, SlugError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(value) = self.pending.pop_front() {
                return Some(Ok(value));
            }
            let entry = self.entries.next()?;
            self.evaluated += 1;
            match self.resolve(entry) {
                Ok(values) => self.pending.extend(values),
                Err(err) => return Some(Err(err)),
            }
        }
    }
}

fn present(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}
