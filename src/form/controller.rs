use crate::model::{
    Attachment, Field, FieldErrors, FormValues, Post, ValidationError, validate, validate_field,
};

/// What the form was opened to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormAction {
    #[default]
    Create,
    Update,
}

impl FormAction {
    /// Label used on the submit control.
    pub fn label(self) -> &'static str {
        match self {
            Self::Create => "Create",
            Self::Update => "Update",
        }
    }
}

/// Which mutation a validated form submits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitMode {
    /// Create a new post owned by the current user.
    Create,
    /// Update an existing post, carrying its identity and current image.
    Update {
        post_id: String,
        image_id: Option<String>,
        image_url: Option<String>,
    },
}

impl SubmitMode {
    /// Update when a post is being edited with [`FormAction::Update`],
    /// create otherwise.
    pub fn resolve(existing: Option<&Post>, action: FormAction) -> Self {
        match (existing, action) {
            (Some(post), FormAction::Update) => Self::Update {
                post_id: post.id.clone(),
                image_id: post.image_id.clone(),
                image_url: post.image_url.clone(),
            },
            _ => Self::Create,
        }
    }
}

/// Validated values ready for the [`SubmitCoordinator`](super::SubmitCoordinator).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub values: FormValues,
    pub mode: SubmitMode,
}

/// Field state, validation and submit gating for the post form.
///
/// Every change re-validates the changed field; [`submit`](Self::submit)
/// validates all of them and only yields a [`Submission`] when all pass.
#[derive(Debug, Clone)]
pub struct PostForm {
    values: FormValues,
    errors: FieldErrors,
    action: FormAction,
    mode: SubmitMode,
    preview_url: Option<String>,
}

impl PostForm {
    /// Creates a form, seeded from `existing` when editing.
    pub fn new(existing: Option<&Post>, action: FormAction) -> Self {
        Self {
            values: existing.map(FormValues::from_post).unwrap_or_default(),
            errors: FieldErrors::new(),
            action,
            mode: SubmitMode::resolve(existing, action),
            preview_url: existing.and_then(|p| p.image_url.clone()),
        }
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Returns the inline error for `field`, if any.
    pub fn error(&self, field: Field) -> Option<&ValidationError> {
        self.errors.first(field)
    }

    pub fn action(&self) -> FormAction {
        self.action
    }

    pub fn mode(&self) -> &SubmitMode {
        &self.mode
    }

    /// URL of the image already attached to the edited post.
    pub fn preview_url(&self) -> Option<&str> {
        self.preview_url.as_deref()
    }

    pub fn set_caption(&mut self, caption: impl Into<String>) {
        self.values.caption = caption.into();
        self.revalidate(Field::Caption);
    }

    pub fn set_location(&mut self, location: impl Into<String>) {
        self.values.location = location.into();
        self.revalidate(Field::Location);
    }

    pub fn set_tags(&mut self, tags: impl Into<String>) {
        self.values.tags = tags.into();
        self.revalidate(Field::Tags);
    }

    pub fn set_file(&mut self, file: Vec<Attachment>) {
        self.values.file = file;
        self.revalidate(Field::File);
    }

    /// Sets a text field by name. [`Field::File`] is not text and is ignored.
    pub fn set_text(&mut self, field: Field, value: impl Into<String>) {
        match field {
            Field::Caption => self.set_caption(value),
            Field::Location => self.set_location(value),
            Field::Tags => self.set_tags(value),
            Field::File => {}
        }
    }

    /// Attaches an error produced outside the schema (e.g. an unreadable image).
    ///
    /// Cleared by the next change to that field or the next submit.
    pub fn set_error(&mut self, field: Field, message: impl Into<String>) {
        self.errors
            .set(field, vec![ValidationError::Custom(message.into())]);
    }

    /// Validates every field. Returns the submission when all pass, otherwise
    /// the errors, which are also kept on the form.
    pub fn submit(&mut self) -> Result<Submission, FieldErrors> {
        self.errors = validate(&self.values);
        if !self.errors.is_empty() {
            return Err(self.errors.clone());
        }
        Ok(Submission {
            values: self.values.clone(),
            mode: self.mode.clone(),
        })
    }

    fn revalidate(&mut self, field: Field) {
        self.errors.set(field, validate_field(field, &self.values));
    }
}
