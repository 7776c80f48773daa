use std::collections::BTreeMap;

use thiserror::Error;

use super::attachment::Attachment;
use super::values::{Field, FormValues};

/// Minimum caption length in characters.
pub const CAPTION_MIN: usize = 5;
/// Maximum caption length in characters.
pub const CAPTION_MAX: usize = 2200;
/// Maximum location length in characters.
pub const LOCATION_MAX: usize = 1000;
/// Maximum number of images attached to one post.
pub const MAX_ATTACHMENTS: usize = 1;

/// Validation errors for post form fields.
///
/// The `Display` text is the message shown under the offending field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Minimum 5 characters.")]
    CaptionTooShort,
    #[error("Maximum 2,200 characters.")]
    CaptionTooLong,
    #[error("This field is required")]
    LocationRequired,
    #[error("Maximum 1000 characters.")]
    LocationTooLong,
    #[error("Only one image can be attached")]
    TooManyAttachments,
    #[error("unsupported image type: {0}")]
    UnsupportedImage(String),
    #[error("image file is empty: {0}")]
    EmptyImage(String),
    /// An error reported by something outside the schema, e.g. an unreadable file.
    #[error("{0}")]
    Custom(String),
}

/// Validation failures keyed by field.
///
/// Only fields with at least one error are present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<Field, Vec<ValidationError>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if no field has errors.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the errors for `field` (empty if it passed).
    pub fn get(&self, field: Field) -> &[ValidationError] {
        self.0.get(&field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns the first error for `field`, the one shown inline.
    pub fn first(&self, field: Field) -> Option<&ValidationError> {
        self.get(field).first()
    }

    /// Replaces the errors of one field. An empty list clears the field.
    pub fn set(&mut self, field: Field, errors: Vec<ValidationError>) {
        if errors.is_empty() {
            self.0.remove(&field);
        } else {
            self.0.insert(field, errors);
        }
    }

    /// Returns the fields that have errors, in field order.
    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.0.keys().copied()
    }

    /// Returns the error messages per field name.
    pub fn messages(&self) -> BTreeMap<&'static str, Vec<String>> {
        self.0
            .iter()
            .map(|(field, errors)| {
                (
                    field.name(),
                    errors.iter().map(ToString::to_string).collect(),
                )
            })
            .collect()
    }
}

/// Validates a caption: between 5 and 2,200 characters.
pub fn validate_caption(caption: &str) -> Result<(), ValidationError> {
    match caption.chars().count() {
        n if n < CAPTION_MIN => Err(ValidationError::CaptionTooShort),
        n if n > CAPTION_MAX => Err(ValidationError::CaptionTooLong),
        _ => Ok(()),
    }
}

/// Validates a location: required, at most 1,000 characters.
pub fn validate_location(location: &str) -> Result<(), ValidationError> {
    match location.chars().count() {
        0 => Err(ValidationError::LocationRequired),
        n if n > LOCATION_MAX => Err(ValidationError::LocationTooLong),
        _ => Ok(()),
    }
}

/// Validates the attachment list: at most one, each a non-empty supported image.
///
/// Every problem is reported, not just the first.
pub fn validate_attachments(files: &[Attachment]) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    if files.len() > MAX_ATTACHMENTS {
        errors.push(ValidationError::TooManyAttachments);
    }
    for file in files {
        if file.format().is_none() {
            errors.push(ValidationError::UnsupportedImage(file.name.clone()));
        } else if file.is_empty() {
            errors.push(ValidationError::EmptyImage(file.name.clone()));
        }
    }
    errors
}

/// Validates a single field of `values`.
pub fn validate_field(field: Field, values: &FormValues) -> Vec<ValidationError> {
    match field {
        Field::Caption => validate_caption(&values.caption).err().into_iter().collect(),
        Field::File => validate_attachments(&values.file),
        Field::Location => validate_location(&values.location)
            .err()
            .into_iter()
            .collect(),
        // Tags are free text.
        Field::Tags => Vec::new(),
    }
}

/// Validates every field of `values`.
pub fn validate(values: &FormValues) -> FieldErrors {
    let mut errors = FieldErrors::new();
    for &field in Field::all() {
        errors.set(field, validate_field(field, values));
    }
    errors
}

#[cfg(test)]
mod tests {
    use quickcheck_macros::quickcheck;

    use super::*;

    fn valid_values() -> FormValues {
        FormValues {
            caption: "Sunset over the bay".into(),
            file: vec![Attachment::new("sunset.png", vec![1, 2, 3])],
            location: "Beach".into(),
            tags: "a,b".into(),
        }
    }

    // --- validate_caption ---

    #[test]
    fn caption_at_minimum() {
        assert_eq!(validate_caption("abcde"), Ok(()));
    }

    #[test]
    fn caption_too_short() {
        assert_eq!(validate_caption("abcd"), Err(ValidationError::CaptionTooShort));
        assert_eq!(validate_caption(""), Err(ValidationError::CaptionTooShort));
    }

    #[test]
    fn caption_at_maximum() {
        assert_eq!(validate_caption(&"x".repeat(CAPTION_MAX)), Ok(()));
    }

    #[test]
    fn caption_too_long() {
        assert_eq!(
            validate_caption(&"x".repeat(CAPTION_MAX + 1)),
            Err(ValidationError::CaptionTooLong)
        );
    }

    #[test]
    fn caption_counts_characters_not_bytes() {
        assert_eq!(validate_caption("ééééé"), Ok(()));
    }

    #[test]
    fn caption_messages() {
        assert_eq!(
            ValidationError::CaptionTooShort.to_string(),
            "Minimum 5 characters."
        );
        assert_eq!(
            ValidationError::CaptionTooLong.to_string(),
            "Maximum 2,200 characters."
        );
    }

    // --- validate_location ---

    #[test]
    fn location_required() {
        assert_eq!(validate_location(""), Err(ValidationError::LocationRequired));
        assert_eq!(
            ValidationError::LocationRequired.to_string(),
            "This field is required"
        );
    }

    #[test]
    fn location_single_char() {
        assert_eq!(validate_location("X"), Ok(()));
    }

    #[test]
    fn location_too_long() {
        assert_eq!(
            validate_location(&"x".repeat(LOCATION_MAX + 1)),
            Err(ValidationError::LocationTooLong)
        );
    }

    // --- validate_attachments ---

    #[test]
    fn no_attachments_is_valid() {
        assert!(validate_attachments(&[]).is_empty());
    }

    #[test]
    fn two_attachments_rejected() {
        let files = vec![
            Attachment::new("a.png", vec![1]),
            Attachment::new("b.png", vec![1]),
        ];
        assert_eq!(
            validate_attachments(&files),
            vec![ValidationError::TooManyAttachments]
        );
    }

    #[test]
    fn non_image_rejected() {
        let files = vec![Attachment::new("notes.txt", vec![1])];
        assert_eq!(
            validate_attachments(&files),
            vec![ValidationError::UnsupportedImage("notes.txt".into())]
        );
    }

    #[test]
    fn empty_image_rejected() {
        let files = vec![Attachment::new("blank.png", Vec::new())];
        assert_eq!(
            validate_attachments(&files),
            vec![ValidationError::EmptyImage("blank.png".into())]
        );
    }

    // --- validate ---

    #[test]
    fn valid_values_have_no_errors() {
        assert!(validate(&valid_values()).is_empty());
    }

    #[test]
    fn empty_values_flag_caption_and_location() {
        let errors = validate(&FormValues::default());
        let fields: Vec<Field> = errors.fields().collect();
        assert_eq!(fields, vec![Field::Caption, Field::Location]);
        assert_eq!(errors.first(Field::Caption), Some(&ValidationError::CaptionTooShort));
        assert!(errors.get(Field::Tags).is_empty());
        assert!(errors.get(Field::File).is_empty());
    }

    #[test]
    fn messages_keyed_by_field_name() {
        let errors = validate(&FormValues::default());
        let messages = errors.messages();
        assert_eq!(messages["caption"], vec!["Minimum 5 characters.".to_string()]);
        assert_eq!(messages["location"], vec!["This field is required".to_string()]);
        assert!(!messages.contains_key("tags"));
    }

    #[test]
    fn set_with_empty_list_clears_field() {
        let mut errors = FieldErrors::new();
        errors.set(Field::Tags, vec![ValidationError::Custom("bad".into())]);
        assert!(!errors.is_empty());
        errors.set(Field::Tags, Vec::new());
        assert!(errors.is_empty());
    }

    #[quickcheck]
    fn tags_never_fail(tags: String) -> bool {
        let values = FormValues {
            tags,
            ..valid_values()
        };
        validate(&values).get(Field::Tags).is_empty()
    }

    #[quickcheck]
    fn caption_valid_iff_length_in_range(caption: String) -> bool {
        let n = caption.chars().count();
        validate_caption(&caption).is_ok() == (CAPTION_MIN..=CAPTION_MAX).contains(&n)
    }
}
