//! Cascading keyword resolution used by the delete-by-keyword commands.
//!
//! Candidates are first narrowed by a loose "any field contains any keyword"
//! predicate. The survivors are then matched exactly, field by field, until a
//! single candidate remains or the fields run out.

use crate::domain::Student;
use crate::reminder::Reminder;

/// Entities that can be picked out by keyword.
pub trait Resolvable {
    /// Searchable fields in resolution order: identity, secondary, tertiary.
    /// Each key is compared case-insensitively against the whole keyword.
    fn resolution_keys(&self) -> Vec<String>;

    /// Loose pre-filter: any field contains any keyword.
    fn matches_any(&self, keywords: &[String]) -> bool {
        let keys = self.resolution_keys();
        keywords.iter().any(|keyword| {
            let keyword = keyword.to_lowercase();
            keys.iter()
                .any(|key| key.to_lowercase().contains(keyword.as_str()))
        })
    }
}

/// Result of resolving a keyword against a candidate pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution<T> {
    Unique(T),
    Ambiguous(Vec<T>),
    NoMatch,
}

impl<T> Resolution<T> {
    pub fn map<U, F>(self, mut f: F) -> Resolution<U>
    where
        F: FnMut(T) -> U,
    {
        match self {
            Resolution::Unique(value) => Resolution::Unique(f(value)),
            Resolution::Ambiguous(values) => {
                Resolution::Ambiguous(values.into_iter().map(f).collect())
            }
            Resolution::NoMatch => Resolution::NoMatch,
        }
    }

    pub fn is_unique(&self) -> bool {
        matches!(self, Resolution::Unique(_))
    }
}

/// Joins, trims and lowercases keyword tokens into the string compared by
/// the exact-match stages.
pub fn normalize_keyword<S: AsRef<str>>(tokens: &[S]) -> String {
    tokens
        .iter()
        .map(|token| token.as_ref().trim())
        .filter(|token| !token.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Candidates whose fields loosely contain any of `keywords`, in input order.
pub fn loose_matches<'a, T, I>(candidates: I, keywords: &[String]) -> Vec<&'a T>
where
    T: Resolvable + 'a,
    I: IntoIterator<Item = &'a T>,
{
    candidates
        .into_iter()
        .filter(|candidate| candidate.matches_any(keywords))
        .collect()
}

/// Runs the exact-match cascade over a loosely matched `pool`.
///
/// A stage is only attempted when every earlier stage matched nothing. A
/// stage with exactly one match resolves; a stage with several matches ends
/// the cascade with those matches as the ambiguous result.
pub fn resolve<'a, T: Resolvable>(pool: Vec<&'a T>, keyword: &str) -> Resolution<&'a T> {
    if pool.is_empty() {
        return Resolution::NoMatch;
    }
    let keyword = keyword.trim().to_lowercase();
    let keys: Vec<Vec<String>> = pool
        .iter()
        .map(|candidate| candidate.resolution_keys())
        .collect();
    let stages = keys.iter().map(Vec::len).max().unwrap_or(0);

    for stage in 0..stages {
        let matches: Vec<&'a T> = pool
            .iter()
            .zip(&keys)
            .filter(|(_, fields)| {
                fields
                    .get(stage)
                    .map(|field| field.trim().to_lowercase() == keyword)
                    .unwrap_or(false)
            })
            .map(|(candidate, _)| *candidate)
            .collect();
        match matches.len() {
            0 => continue,
            1 => return Resolution::Unique(matches[0]),
            _ => return Resolution::Ambiguous(matches),
        }
    }

    Resolution::Ambiguous(pool)
}

impl Resolvable for Student {
    fn resolution_keys(&self) -> Vec<String> {
        vec![
            self.name.to_string(),
            self.phone.to_string(),
            self.lesson_time.to_string(),
        ]
    }
}

impl Resolvable for Reminder {
    fn resolution_keys(&self) -> Vec<String> {
        vec![self.due().to_string(), self.description().to_string()]
    }
}
