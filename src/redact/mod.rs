//! Redaction Module
//!
//! Keeps personally identifiable information out of logs. Masking is fixed
//! per declared field kind; nothing is inferred from content except by the
//! explicit detector and scrubber in `detect`.

mod detect;
mod mask;

pub use detect::{detect_sensitive, scrub, snippet, SensitiveCategory, SensitiveMatch};
pub use mask::{
    mask, mask_str, FieldKind, AGE_MASK, DEGENERATE_EMAIL_MASK, MASK, PASSWORD_MASK,
};
