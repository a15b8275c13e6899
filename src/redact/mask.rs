//! Field Masking Module
//!
//! Deterministic masking transforms per declared field kind.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// == Mask Constants ==
/// Replacement inserted between the kept prefix and suffix
pub const MASK: &str = "****";

/// Output for password fields, independent of input
pub const PASSWORD_MASK: &str = "********";

/// Output for age fields, independent of input
pub const AGE_MASK: &str = "[REDACTED]";

/// Output for values that carry no usable email structure
pub const DEGENERATE_EMAIL_MASK: &str = "****@****";

// == Field Kind ==
/// Declared kind of a personally identifying field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldKind {
    UserId,
    Email,
    Name,
    Phone,
    Password,
    Age,
    Ssn,
    CreditCard,
    Default,
}

impl FieldKind {
    /// Wire name of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::UserId => "userId",
            FieldKind::Email => "email",
            FieldKind::Name => "name",
            FieldKind::Phone => "phone",
            FieldKind::Password => "password",
            FieldKind::Age => "age",
            FieldKind::Ssn => "ssn",
            FieldKind::CreditCard => "creditCard",
            FieldKind::Default => "default",
        }
    }

    /// Maps a metadata field name to the kind it carries.
    ///
    /// Matching ignores case, `_` and `-`, so `user_id`, `userId` and
    /// `USER-ID` all resolve to `UserId`. Returns `None` for fields that
    /// carry no PII.
    pub fn for_field(field: &str) -> Option<FieldKind> {
        let normalized: String = field
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();

        let kind = match normalized.as_str() {
            "userid" | "uid" | "annotatorid" | "reviewerid" | "speakerid" => FieldKind::UserId,
            "email" | "emailaddress" | "mail" => FieldKind::Email,
            "name" | "firstname" | "lastname" | "fullname" | "username" | "displayname" => {
                FieldKind::Name
            }
            "phone" | "phonenumber" | "mobile" | "telephone" => FieldKind::Phone,
            "password" | "passwd" | "secret" => FieldKind::Password,
            "age" | "dateofbirth" | "dob" | "birthdate" | "birthday" => FieldKind::Age,
            "ssn" | "socialsecuritynumber" | "aadhaar" => FieldKind::Ssn,
            "creditcard" | "cardnumber" | "ccnumber" => FieldKind::CreditCard,
            _ => return None,
        };
        Some(kind)
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown kind names fall back to `Default`.
impl FromStr for FieldKind {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = match s {
            "userId" => FieldKind::UserId,
            "email" => FieldKind::Email,
            "name" => FieldKind::Name,
            "phone" => FieldKind::Phone,
            "password" => FieldKind::Password,
            "age" => FieldKind::Age,
            "ssn" => FieldKind::Ssn,
            "creditCard" => FieldKind::CreditCard,
            _ => FieldKind::Default,
        };
        Ok(kind)
    }
}

// == Mask ==
/// Masks an optional value. Absent values pass through untouched.
pub fn mask(value: Option<&str>, kind: FieldKind) -> Option<String> {
    value.map(|v| mask_str(v, kind))
}

/// Masks a present value according to `kind`.
///
/// Lengths and slices are counted in characters, so multibyte script is
/// never split inside a code point.
pub fn mask_str(value: &str, kind: FieldKind) -> String {
    let chars: Vec<char> = value.chars().collect();
    let len = chars.len();

    match kind {
        FieldKind::Email => match chars.iter().position(|c| *c == '@') {
            Some(at) if at > 0 => format!("{}{MASK}{}", head(&chars, 2), tail_from(&chars, at)),
            _ => DEGENERATE_EMAIL_MASK.to_string(),
        },
        FieldKind::Phone => {
            if len > 4 {
                format!("{}{MASK}{}", head(&chars, 2), tail(&chars, 2))
            } else if len >= 2 {
                format!("{MASK}{}", tail(&chars, 2))
            } else {
                MASK.to_string()
            }
        }
        FieldKind::UserId => {
            // The long form must still hide at least one character
            if len > 10 {
                format!("{}{MASK}{}", head(&chars, 6), tail(&chars, 4))
            } else if len > 4 {
                format!("{}{MASK}", head(&chars, 4))
            } else {
                MASK.to_string()
            }
        }
        FieldKind::Name => {
            if len > 2 {
                format!("{}{MASK}", head(&chars, 1))
            } else {
                MASK.to_string()
            }
        }
        FieldKind::Password => PASSWORD_MASK.to_string(),
        FieldKind::Age => AGE_MASK.to_string(),
        FieldKind::Ssn | FieldKind::CreditCard => format!("{MASK}{}", tail(&chars, 4)),
        FieldKind::Default => {
            if len > 4 {
                format!("{}{MASK}", head(&chars, 2))
            } else {
                MASK.to_string()
            }
        }
    }
}

fn head(chars: &[char], n: usize) -> String {
    chars.iter().take(n).collect()
}

fn tail(chars: &[char], n: usize) -> String {
    tail_from(chars, chars.len().saturating_sub(n))
}

fn tail_from(chars: &[char], start: usize) -> String {
    chars[start.min(chars.len())..].iter().collect()
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    const ALL_KINDS: [FieldKind; 9] = [
        FieldKind::UserId,
        FieldKind::Email,
        FieldKind::Name,
        FieldKind::Phone,
        FieldKind::Password,
        FieldKind::Age,
        FieldKind::Ssn,
        FieldKind::CreditCard,
        FieldKind::Default,
    ];

    #[test]
    fn test_email_keeps_two_chars_and_domain() {
        assert_eq!(mask_str("user@example.com", FieldKind::Email), "us****@example.com");
        assert_eq!(mask_str("ab@x.io", FieldKind::Email), "ab****@x.io");
    }

    #[test]
    fn test_email_degenerate_input() {
        assert_eq!(mask_str("not-an-email", FieldKind::Email), "****@****");
        assert_eq!(mask_str("@example.com", FieldKind::Email), "****@****");
        assert_eq!(mask_str("", FieldKind::Email), "****@****");
    }

    #[test]
    fn test_phone_boundaries() {
        assert_eq!(mask_str("9876543210", FieldKind::Phone), "98****10");
        assert_eq!(mask_str("+91-98765-43210", FieldKind::Phone), "+9****10");
        assert_eq!(mask_str("12345", FieldKind::Phone), "12****45");
        assert_eq!(mask_str("1234", FieldKind::Phone), "****34");
        assert_eq!(mask_str("12", FieldKind::Phone), "****12");
        assert_eq!(mask_str("1", FieldKind::Phone), "****");
        assert_eq!(mask_str("", FieldKind::Phone), "****");
    }

    #[test]
    fn test_user_id_boundaries() {
        assert_eq!(mask_str("user_1234567890", FieldKind::UserId), "user_1****7890");
        assert_eq!(mask_str("abcdefghijk", FieldKind::UserId), "abcdef****hijk");
        assert_eq!(mask_str("abcdefghij", FieldKind::UserId), "abcd****");
        assert_eq!(mask_str("u123456789", FieldKind::UserId), "u123****");
        assert_eq!(mask_str("abcdefghi", FieldKind::UserId), "abcd****");
        assert_eq!(mask_str("abcde", FieldKind::UserId), "abcd****");
        assert_eq!(mask_str("abcd", FieldKind::UserId), "****");
        assert_eq!(mask_str("", FieldKind::UserId), "****");
    }

    #[test]
    fn test_name() {
        assert_eq!(mask_str("Priya", FieldKind::Name), "P****");
        assert_eq!(mask_str("Al", FieldKind::Name), "****");
        assert_eq!(mask_str("", FieldKind::Name), "****");
    }

    #[test]
    fn test_constant_masks() {
        for input in ["", "a", "hunter2", "a very long secret value"] {
            assert_eq!(mask_str(input, FieldKind::Password), "********");
            assert_eq!(mask_str(input, FieldKind::Age), "[REDACTED]");
        }
    }

    #[test]
    fn test_last_four_kinds() {
        assert_eq!(mask_str("123-45-6789", FieldKind::Ssn), "****6789");
        assert_eq!(mask_str("4111111111111111", FieldKind::CreditCard), "****1111");
        assert_eq!(mask_str("1234", FieldKind::Ssn), "****1234");
        assert_eq!(mask_str("12", FieldKind::CreditCard), "****12");
        assert_eq!(mask_str("", FieldKind::Ssn), "****");
    }

    #[test]
    fn test_default() {
        assert_eq!(mask_str("session-abc", FieldKind::Default), "se****");
        assert_eq!(mask_str("abcd", FieldKind::Default), "****");
    }

    #[test]
    fn test_multibyte_is_split_on_chars() {
        assert_eq!(mask_str("सुनीता", FieldKind::Name), "स****");
        assert_eq!(mask_str("राम@उदाहरण.भारत", FieldKind::Email), "रा****@उदाहरण.भारत");
    }

    #[test]
    fn test_absent_value_passes_through() {
        for kind in ALL_KINDS {
            assert_eq!(mask(None, kind), None);
        }
        assert_eq!(mask(Some("secret"), FieldKind::Password).as_deref(), Some("********"));
    }

    #[test]
    fn test_unknown_kind_falls_back_to_default() {
        let kind: FieldKind = "favouriteColour".parse().unwrap();
        assert_eq!(kind, FieldKind::Default);
        let kind: FieldKind = "creditCard".parse().unwrap();
        assert_eq!(kind, FieldKind::CreditCard);
    }

    #[test]
    fn test_for_field_normalizes_names() {
        assert_eq!(FieldKind::for_field("userId"), Some(FieldKind::UserId));
        assert_eq!(FieldKind::for_field("user_id"), Some(FieldKind::UserId));
        assert_eq!(FieldKind::for_field("EMAIL"), Some(FieldKind::Email));
        assert_eq!(FieldKind::for_field("phone-number"), Some(FieldKind::Phone));
        assert_eq!(FieldKind::for_field("date_of_birth"), Some(FieldKind::Age));
        assert_eq!(FieldKind::for_field("key"), None);
        assert_eq!(FieldKind::for_field("operation"), None);
    }
}
