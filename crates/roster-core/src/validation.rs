//! Field rules for user drafts.
//!
//! Every rule is a pure function. [`validate_draft`] runs all of them and
//! collects one message per failing field, so a form can show every
//! violation at once.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use crate::models::{Hobby, ImageAttachment, ImageSlot, UserDraft, UserRecord};

pub const MAX_IMAGE_BYTES: u64 = 200 * 1024;
pub const ALLOWED_IMAGE_TYPES: [&str; 3] = ["image/jpeg", "image/jpg", "image/png"];
pub const MIN_USERNAME_LEN: usize = 3;

pub const USERNAME_REQUIRED: &str = "Username Required";
pub const USERNAME_TOO_SHORT: &str = "Username must be at least 3 characters long";
pub const USERNAME_CHARSET: &str = "Username can only contain letters and underscores";
pub const EMAIL_REQUIRED: &str = "Email is required";
pub const EMAIL_FORMAT: &str = "must be a valid format like example@domain.com";
pub const HOBBIES_REQUIRED: &str = "Select at least one hobby";
pub const IMAGE_REQUIRED: &str = "Image is required";
pub const IMAGE_PENDING: &str = "Image is still loading";
pub const IMAGE_TYPE: &str = "invalid Image";
pub const IMAGE_TOO_LARGE: &str = "The file is too large";

fn username_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z_]+$").expect("valid username regex"))
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("valid email regex")
    })
}

/// Per-field messages. `None` means the field passed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    pub username: Option<String>,
    pub email: Option<String>,
    pub hobbies: Option<String>,
    pub image: Option<String>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.email.is_none()
            && self.hobbies.is_none()
            && self.image.is_none()
    }

    /// Number of fields with an error.
    pub fn count(&self) -> usize {
        [&self.username, &self.email, &self.hobbies, &self.image]
            .iter()
            .filter(|e| e.is_some())
            .count()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields = [
            ("username", &self.username),
            ("email", &self.email),
            ("hobbies", &self.hobbies),
            ("image", &self.image),
        ];
        let parts: Vec<String> = fields
            .iter()
            .filter_map(|(name, msg)| msg.as_ref().map(|m| format!("{}: {}", name, m)))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

pub fn validate_username(username: &str) -> Result<(), &'static str> {
    if username.is_empty() {
        return Err(USERNAME_REQUIRED);
    }
    if username.chars().count() < MIN_USERNAME_LEN {
        return Err(USERNAME_TOO_SHORT);
    }
    if !username_pattern().is_match(username) {
        return Err(USERNAME_CHARSET);
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.is_empty() {
        return Err(EMAIL_REQUIRED);
    }
    if !email_pattern().is_match(email) {
        return Err(EMAIL_FORMAT);
    }
    Ok(())
}

pub fn validate_hobbies(hobbies: &BTreeSet<Hobby>) -> Result<(), &'static str> {
    if hobbies.is_empty() {
        return Err(HOBBIES_REQUIRED);
    }
    Ok(())
}

/// Type is checked before size.
pub fn check_image(mime_type: &str, size_bytes: u64) -> Result<(), &'static str> {
    if !ALLOWED_IMAGE_TYPES.contains(&mime_type) {
        return Err(IMAGE_TYPE);
    }
    if size_bytes > MAX_IMAGE_BYTES {
        return Err(IMAGE_TOO_LARGE);
    }
    Ok(())
}

pub fn validate_image(image: Option<&ImageAttachment>) -> Result<(), &'static str> {
    match image {
        Some(image) => check_image(&image.mime_type, image.size_bytes),
        None => Err(IMAGE_REQUIRED),
    }
}

fn validate_image_slot(slot: &ImageSlot) -> Result<(), &'static str> {
    match slot {
        ImageSlot::Empty => Err(IMAGE_REQUIRED),
        ImageSlot::Pending { .. } => Err(IMAGE_PENDING),
        ImageSlot::Ready(image) => validate_image(Some(image)),
    }
}

pub fn validate_draft(draft: &UserDraft) -> FieldErrors {
    FieldErrors {
        username: validate_username(&draft.username).err().map(str::to_string),
        email: validate_email(&draft.email).err().map(str::to_string),
        hobbies: validate_hobbies(&draft.hobbies).err().map(str::to_string),
        image: validate_image_slot(&draft.image).err().map(str::to_string),
    }
}

pub fn validate_record(record: &UserRecord) -> FieldErrors {
    FieldErrors {
        username: validate_username(&record.username).err().map(str::to_string),
        email: validate_email(&record.email).err().map(str::to_string),
        hobbies: validate_hobbies(&record.hobbies).err().map(str::to_string),
        image: validate_image(Some(&record.image)).err().map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png(size_bytes: u64) -> ImageAttachment {
        ImageAttachment {
            file_name: "avatar.png".to_string(),
            mime_type: "image/png".to_string(),
            size_bytes,
            data_url: "data:image/png;base64,".to_string(),
        }
    }

    #[test]
    fn username_rules() {
        assert_eq!(validate_username("John_Doe"), Ok(()));
        assert_eq!(validate_username(""), Err(USERNAME_REQUIRED));
        assert_eq!(validate_username("Jo"), Err(USERNAME_TOO_SHORT));
        assert_eq!(validate_username("John1"), Err(USERNAME_CHARSET));
        assert_eq!(validate_username("John Doe"), Err(USERNAME_CHARSET));
    }

    #[test]
    fn email_rules() {
        assert_eq!(validate_email("a@b.co"), Ok(()));
        assert_eq!(validate_email("first.last+tag@mail.example.org"), Ok(()));
        assert_eq!(validate_email("a@b"), Err(EMAIL_FORMAT));
        assert_eq!(validate_email("abc"), Err(EMAIL_FORMAT));
        assert_eq!(validate_email("a@b.c"), Err(EMAIL_FORMAT));
        assert_eq!(validate_email(""), Err(EMAIL_REQUIRED));
    }

    #[test]
    fn hobbies_need_one() {
        let mut hobbies = BTreeSet::new();
        assert_eq!(validate_hobbies(&hobbies), Err(HOBBIES_REQUIRED));
        hobbies.insert(Hobby::Football);
        assert_eq!(validate_hobbies(&hobbies), Ok(()));
    }

    #[test]
    fn image_rules() {
        assert_eq!(validate_image(Some(&png(100 * 1024))), Ok(()));
        assert_eq!(validate_image(Some(&png(MAX_IMAGE_BYTES))), Ok(()));
        assert_eq!(validate_image(Some(&png(300 * 1024))), Err(IMAGE_TOO_LARGE));
        assert_eq!(check_image("application/pdf", 1024), Err(IMAGE_TYPE));
        assert_eq!(check_image("image/jpg", 1024), Ok(()));
        assert_eq!(validate_image(None), Err(IMAGE_REQUIRED));
    }

    #[test]
    fn wrong_type_reported_before_size() {
        assert_eq!(check_image("image/gif", 300 * 1024), Err(IMAGE_TYPE));
    }

    #[test]
    fn empty_draft_reports_every_required_field() {
        let errors = validate_draft(&UserDraft::default());
        assert_eq!(errors.username.as_deref(), Some(USERNAME_REQUIRED));
        assert_eq!(errors.email.as_deref(), Some(EMAIL_REQUIRED));
        assert_eq!(errors.hobbies.as_deref(), Some(HOBBIES_REQUIRED));
        assert_eq!(errors.image.as_deref(), Some(IMAGE_REQUIRED));
        assert_eq!(errors.count(), 4);
    }

    #[test]
    fn only_the_missing_field_is_reported() {
        let mut draft = UserDraft {
            username: "John_Doe".to_string(),
            email: "john@example.com".to_string(),
            image: ImageSlot::Ready(png(1024)),
            ..Default::default()
        };
        draft.hobbies.insert(Hobby::Coding);
        assert!(validate_draft(&draft).is_empty());

        draft.email.clear();
        let errors = validate_draft(&draft);
        assert_eq!(errors.count(), 1);
        assert_eq!(errors.email.as_deref(), Some(EMAIL_REQUIRED));
    }

    #[test]
    fn pending_image_is_reported() {
        let draft = UserDraft {
            image: ImageSlot::Pending {
                ticket: crate::models::ImageTicket(7),
                file_name: "a.png".to_string(),
            },
            ..Default::default()
        };
        assert_eq!(validate_draft(&draft).image.as_deref(), Some(IMAGE_PENDING));
    }

    #[test]
    fn display_lists_failing_fields() {
        let errors = FieldErrors {
            email: Some(EMAIL_FORMAT.to_string()),
            hobbies: Some(HOBBIES_REQUIRED.to_string()),
            ..Default::default()
        };
        assert_eq!(
            errors.to_string(),
            "email: must be a valid format like example@domain.com; hobbies: Select at least one hobby"
        );
    }
}
