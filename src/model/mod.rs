mod attachment;
mod post;
mod user;
mod validation;
mod values;

pub use attachment::{Attachment, ImageFormat};
pub use post::{Post, parse_tags};
pub use user::User;
pub use validation::{
    CAPTION_MAX, CAPTION_MIN, FieldErrors, LOCATION_MAX, MAX_ATTACHMENTS, ValidationError,
    validate, validate_attachments, validate_caption, validate_field, validate_location,
};
pub use values::{Field, FormValues};
