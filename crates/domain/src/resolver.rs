// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Identifier resolution for CSV tokens.
//!
//! A token is either a literal numeric ID or free text (a group name or a
//! user email). Literal IDs must exist in the snapshot or the token is
//! unresolved. Free text is matched case-insensitively against each
//! record's search key and degrades to the trimmed text when nothing
//! matches.

use crate::types::{PlatformUser, UserGroup};

/// A record that a CSV token can be resolved against.
pub trait Resolvable {
    /// The canonical ID that a successful resolution yields.
    fn canonical_id(&self) -> u64;

    /// The text a non-numeric token is compared with.
    ///
    /// `None` means the record does not carry the field at all.
    fn search_key(&self) -> Option<&str>;
}

impl Resolvable for UserGroup {
    fn canonical_id(&self) -> u64 {
        self.id.value()
    }

    fn search_key(&self) -> Option<&str> {
        Some(&self.name)
    }
}

impl Resolvable for PlatformUser {
    fn canonical_id(&self) -> u64 {
        self.user_id.value()
    }

    fn search_key(&self) -> Option<&str> {
        self.email.as_deref()
    }
}

/// The result of resolving a token against a collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The token identifies this existing record.
    Canonical(u64),
    /// Free text with no match. Carries the trimmed token.
    Unmatched(String),
    /// A literal ID that no record carries.
    Missing,
}

/// Returns true if the token is made up solely of ASCII digits.
///
/// Surrounding whitespace disqualifies a token, so `" 42"` is free text.
#[must_use]
pub fn is_literal_id(token: &str) -> bool {
    !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit())
}

/// Resolves a CSV token against a snapshot of records.
///
/// Free-text matching is first-match-wins; duplicate names or emails are
/// not detected. Records without a search key are passed over.
#[must_use]
pub fn resolve<T: Resolvable>(token: &str, collection: &[T]) -> Resolution {
    if is_literal_id(token) {
        // Too many digits for a u64 cannot name an existing record.
        let Ok(id) = token.parse::<u64>() else {
            return Resolution::Missing;
        };
        return if collection.iter().any(|item| item.canonical_id() == id) {
            Resolution::Canonical(id)
        } else {
            Resolution::Missing
        };
    }

    let needle: String = token.trim().to_lowercase();
    collection
        .iter()
        .find(|item| {
            item.search_key()
                .is_some_and(|key| key.to_lowercase() == needle)
        })
        .map_or_else(
            || Resolution::Unmatched(token.trim().to_string()),
            |item| Resolution::Canonical(item.canonical_id()),
        )
}
