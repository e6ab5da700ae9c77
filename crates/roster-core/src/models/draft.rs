use std::collections::BTreeSet;

use super::user::{Country, Gender, Hobby, ImageAttachment, UserRecord};

/// Identifies one image selection, so a late decode of an older file can be told apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageTicket(pub u64);

/// Image field state. The value only counts as present once decoding has finished.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ImageSlot {
    #[default]
    Empty,
    Pending {
        ticket: ImageTicket,
        file_name: String,
    },
    Ready(ImageAttachment),
}

impl ImageSlot {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending { .. })
    }

    pub fn attachment(&self) -> Option<&ImageAttachment> {
        match self {
            Self::Ready(image) => Some(image),
            _ => None,
        }
    }
}

/// Form state that has not been committed yet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserDraft {
    pub username: String,
    pub email: String,
    pub gender: Option<Gender>,
    pub hobbies: BTreeSet<Hobby>,
    pub country: Option<Country>,
    pub message: String,
    pub image: ImageSlot,
}

impl UserDraft {
    pub fn toggle_hobby(&mut self, hobby: Hobby) {
        if !self.hobbies.remove(&hobby) {
            self.hobbies.insert(hobby);
        }
    }
}

impl From<&UserRecord> for UserDraft {
    fn from(record: &UserRecord) -> Self {
        Self {
            username: record.username.clone(),
            email: record.email.clone(),
            gender: record.gender,
            hobbies: record.hobbies.clone(),
            country: record.country,
            message: record.message.clone(),
            image: ImageSlot::Ready(record.image.clone()),
        }
    }
}
