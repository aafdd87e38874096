// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for legacy meta record naming

#[cfg(test)]
mod tests {
    use crate::reconcilers::meta_record::MetaRecordNaming;

    #[test]
    fn test_default_is_legacy_comment_record() {
        assert_eq!(MetaRecordNaming::default(), MetaRecordNaming::LegacyCommentRecord);
    }

    #[test]
    fn test_plain_name() {
        assert_eq!(
            MetaRecordNaming::LegacyCommentRecord
                .meta_record_name("www.example.com")
                .as_deref(),
            Some("comment-www.example.com")
        );
    }

    #[test]
    fn test_wildcard_name() {
        assert_eq!(
            MetaRecordNaming::LegacyCommentRecord
                .meta_record_name("*.example.com")
                .as_deref(),
            Some("*.comment-example.com")
        );
    }

    #[test]
    fn test_inner_asterisk_is_not_a_wildcard() {
        assert_eq!(
            MetaRecordNaming::LegacyCommentRecord
                .meta_record_name("a*.example.com")
                .as_deref(),
            Some("comment-a*.example.com")
        );
    }

    #[test]
    fn test_no_meta_record() {
        assert_eq!(
            MetaRecordNaming::NoMetaRecord.meta_record_name("www.example.com"),
            None
        );
    }
}
