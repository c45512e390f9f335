//! Client-side input rules applied before any request is built.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::ValidationError;
use crate::types::{PictureUpload, Profile, UpdateProfile};

pub const MAX_PHONE_LEN: usize = 10;
pub const MAX_PICTURE_BYTES: usize = 5_000_000;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)*$",
    )
    .expect("email pattern compiles")
});

/// Raw values from the profile edit form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileForm {
    pub first_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl ProfileForm {
    pub fn new(first_name: &str, email: &str, phone: &str) -> Self {
        Self {
            first_name: Some(first_name.to_string()),
            email: Some(email.to_string()),
            phone: Some(phone.to_string()),
        }
    }

    /// Check every field in display order and produce the update payload.
    /// The first failing field wins.
    pub fn validate(&self) -> Result<UpdateProfile, ValidationError> {
        let first_name = required(&self.first_name).ok_or(ValidationError::FirstName)?;
        let email = required(&self.email)
            .filter(|e| is_valid_email(e))
            .ok_or(ValidationError::Email)?;
        let phone = required(&self.phone)
            .filter(|p| p.chars().count() <= MAX_PHONE_LEN)
            .ok_or(ValidationError::Phone)?;
        Ok(UpdateProfile {
            first_name: Some(first_name.to_string()),
            email: Some(email.to_string()),
            phone: Some(phone.to_string()),
        })
    }
}

/// Form values reset to the stored profile, as when an edit is cancelled.
impl From<&Profile> for ProfileForm {
    fn from(profile: &Profile) -> Self {
        Self::new(&profile.first_name, &profile.email, &profile.phone)
    }
}

fn required(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL.is_match(email)
}

/// Gate a picture selection before it is uploaded.
pub fn validate_picture(picture: Option<&PictureUpload>) -> Result<&PictureUpload, ValidationError> {
    let picture = picture.ok_or(ValidationError::MissingPicture)?;
    if picture.bytes.len() > MAX_PICTURE_BYTES {
        return Err(ValidationError::PictureTooLarge {
            size: picture.bytes.len(),
        });
    }
    if !picture.content_type.starts_with("image/") {
        return Err(ValidationError::NotAnImage {
            content_type: picture.content_type.clone(),
        });
    }
    Ok(picture)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn picture(size: usize, content_type: &str) -> PictureUpload {
        PictureUpload {
            file_name: "p".to_string(),
            content_type: content_type.to_string(),
            bytes: vec![0; size],
        }
    }

    #[test]
    fn valid_form_produces_full_update() {
        let update = ProfileForm::new("Ada", "ada@x.com", "5551234567").validate().unwrap();
        assert_eq!(update.first_name.as_deref(), Some("Ada"));
        assert_eq!(update.email.as_deref(), Some("ada@x.com"));
        assert_eq!(update.phone.as_deref(), Some("5551234567"));
    }

    #[test]
    fn blank_first_name_is_rejected() {
        let err = ProfileForm::new("   ", "ada@x.com", "1").validate().unwrap_err();
        assert_eq!(err, ValidationError::FirstName);
        assert_eq!(err.to_string(), "First name is invalid!");
    }

    #[test]
    fn malformed_email_is_rejected() {
        for email in ["", "ada", "ada@", "@x.com", "a da@x.com"] {
            let err = ProfileForm::new("Ada", email, "1").validate().unwrap_err();
            assert_eq!(err, ValidationError::Email, "{email:?}");
        }
    }

    #[test]
    fn missing_email_is_rejected() {
        let form = ProfileForm {
            email: None,
            ..ProfileForm::new("Ada", "", "1")
        };
        assert_eq!(form.validate().unwrap_err(), ValidationError::Email);
    }

    #[test]
    fn phone_longer_than_ten_is_rejected() {
        let err = ProfileForm::new("Ada", "ada@x.com", "55512345678").validate().unwrap_err();
        assert_eq!(err, ValidationError::Phone);
    }

    #[test]
    fn first_failing_field_wins() {
        let err = ProfileForm::default().validate().unwrap_err();
        assert_eq!(err, ValidationError::FirstName);
    }

    #[test]
    fn form_resets_from_profile() {
        let profile = Profile {
            first_name: "Ada".to_string(),
            email: "ada@x.com".to_string(),
            phone: "1".to_string(),
            profile_picture_url: "u".to_string(),
        };
        assert_eq!(ProfileForm::from(&profile), ProfileForm::new("Ada", "ada@x.com", "1"));
    }

    #[test]
    fn picture_gates() {
        assert_eq!(validate_picture(None).unwrap_err(), ValidationError::MissingPicture);
        assert!(matches!(
            validate_picture(Some(&picture(6_000_000, "image/png"))).unwrap_err(),
            ValidationError::PictureTooLarge { size: 6_000_000 }
        ));
        assert!(matches!(
            validate_picture(Some(&picture(10, "application/pdf"))).unwrap_err(),
            ValidationError::NotAnImage { .. }
        ));
        assert!(validate_picture(Some(&picture(MAX_PICTURE_BYTES, "image/jpeg"))).is_ok());
    }
}
