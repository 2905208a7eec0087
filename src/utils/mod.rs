pub mod validate;

pub use validate::{
    validate_course_code, validate_email, validate_photo_url, validate_reading_url,
};
