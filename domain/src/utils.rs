//! Parameter validators and query-string formatters for Wordcab requests.
//!
//! Validators are pure predicates: a scalar is passed as a one-element slice
//! and an empty slice validates vacuously. Formatters never validate.

use wordcab_types::config::{
    CONTEXT_ELEMENTS, EXTRACT_PIPELINES, SOURCE_LANG, SUMMARY_LENGTHS_RANGE, SUMMARY_PIPELINES,
    SUMMARY_TYPES, TARGET_LANG,
};

fn all_allowed<S: AsRef<str>>(values: &[S], allowed: &[&str]) -> bool {
    values.iter().all(|value| allowed.contains(&value.as_ref()))
}

pub fn check_context_elements<S: AsRef<str>>(elements: &[S]) -> bool {
    all_allowed(elements, CONTEXT_ELEMENTS)
}

pub fn check_source_lang<S: AsRef<str>>(langs: &[S]) -> bool {
    all_allowed(langs, SOURCE_LANG)
}

pub fn check_target_lang<S: AsRef<str>>(langs: &[S]) -> bool {
    all_allowed(langs, TARGET_LANG)
}

pub fn check_summary_pipelines<S: AsRef<str>>(pipelines: &[S]) -> bool {
    all_allowed(pipelines, SUMMARY_PIPELINES)
}

pub fn check_extract_pipelines<S: AsRef<str>>(pipelines: &[S]) -> bool {
    all_allowed(pipelines, EXTRACT_PIPELINES)
}

pub fn check_summary_type(summary_type: &str) -> bool {
    SUMMARY_TYPES.contains(&summary_type)
}

/// Every length must fall inside the inclusive summary length range.
pub fn check_summary_length(lengths: &[u32]) -> bool {
    lengths
        .iter()
        .all(|length| SUMMARY_LENGTHS_RANGE.contains(length))
}

fn join<S: AsRef<str>>(values: &[S]) -> String {
    values
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(",")
}

pub fn format_context_elements<S: AsRef<str>>(elements: &[S]) -> String {
    join(elements)
}

pub fn format_pipelines<S: AsRef<str>>(pipelines: &[S]) -> String {
    join(pipelines)
}

pub fn format_tags<S: AsRef<str>>(tags: &[S]) -> String {
    join(tags)
}

pub fn format_lengths(lengths: &[u32]) -> String {
    lengths
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use wordcab_types::OneOrMany;

    #[test]
    fn test_check_summary_length() {
        assert!(check_summary_length(OneOrMany::from(3u32).as_slice()));
        assert!(!check_summary_length(OneOrMany::from(0u32).as_slice()));
        assert!(check_summary_length(&[1, 5]));
        assert!(!check_summary_length(&[1, 6]));
    }

    #[test]
    fn test_membership_validators_require_every_element() {
        assert!(check_context_elements(&["issue", "purpose"]));
        assert!(!check_context_elements(&["issue", "weather"]));

        assert!(check_source_lang(&["en"]));
        assert!(!check_source_lang(&["xx"]));
        assert!(check_target_lang(&["fr", "de"]));
        assert!(!check_target_lang(&["fr", "jp"]));

        assert!(check_summary_pipelines(&["transcribe", "summarize"]));
        assert!(!check_summary_pipelines(&["transcribe", "emotions"]));
        assert!(check_extract_pipelines(&["emotions"]));
        assert!(!check_extract_pipelines(&["summarize"]));
    }

    #[test]
    fn test_scalar_is_checked_as_one_element() {
        let pipeline = OneOrMany::<String>::from("summarize");
        let context = OneOrMany::<String>::from("keywords");

        assert!(check_summary_pipelines(pipeline.as_slice()));
        assert!(check_context_elements(context.as_slice()));
        assert!(!check_extract_pipelines(pipeline.as_slice()));
    }

    #[test]
    fn test_empty_input_validates() {
        let empty: &[&str] = &[];
        assert!(check_context_elements(empty));
        assert!(check_extract_pipelines(empty));
        assert!(check_summary_length(&[]));
    }

    #[test]
    fn test_check_summary_type() {
        assert!(check_summary_type("narrative"));
        assert!(check_summary_type("reason_conclusion"));
        assert!(!check_summary_type("haiku"));
    }

    #[test]
    fn test_format_tags() {
        assert_eq!(format_tags(OneOrMany::<String>::from("a").as_slice()), "a");
        assert_eq!(format_tags(&["a", "b"]), "a,b");
    }

    #[test]
    fn test_formatters_keep_input_order() {
        assert_eq!(format_pipelines(&["summarize", "transcribe"]), "summarize,transcribe");
        assert_eq!(format_context_elements(&["purpose"]), "purpose");
        assert_eq!(format_lengths(&[3]), "3");
        assert_eq!(format_lengths(&[5, 1, 3]), "5,1,3");
        assert_eq!(format_lengths(&[]), "");
    }
}
