// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Naming of the legacy ownership TXT record.
//!
//! Older releases created a `TXT` record next to every managed record to mark
//! ownership. Those markers are removed the first time a record is reconciled.

use crate::constants::META_RECORD_PREFIX;

/// How the name of the legacy meta record is derived from a record name.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MetaRecordNaming {
    /// `comment-<name>`, or `*.comment-<rest>` for wildcard names `*.<rest>`.
    #[default]
    LegacyCommentRecord,
    /// No meta record exists; cleanup is skipped.
    NoMetaRecord,
}

impl MetaRecordNaming {
    /// Name of the meta record belonging to `name`, if any.
    ///
    /// ```rust
    /// use powerdns_operator::reconcilers::meta_record::MetaRecordNaming;
    ///
    /// let naming = MetaRecordNaming::LegacyCommentRecord;
    /// assert_eq!(
    ///     naming.meta_record_name("*.apps.example.com").as_deref(),
    ///     Some("*.comment-apps.example.com")
    /// );
    /// ```
    #[must_use]
    pub fn meta_record_name(&self, name: &str) -> Option<String> {
        match self {
            Self::LegacyCommentRecord => Some(match name.strip_prefix("*.") {
                Some(rest) => format!("*.{META_RECORD_PREFIX}{rest}"),
                None => format!("{META_RECORD_PREFIX}{name}"),
            }),
            Self::NoMetaRecord => None,
        }
    }
}
