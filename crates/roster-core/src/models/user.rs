use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const ALL: [Gender; 2] = [Gender::Male, Gender::Female];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Hobby {
    Cricket,
    Football,
    Coding,
    Dance,
}

impl Hobby {
    pub const ALL: [Hobby; 4] = [Hobby::Cricket, Hobby::Football, Hobby::Coding, Hobby::Dance];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Cricket => "Cricket",
            Self::Football => "Football",
            Self::Coding => "Coding",
            Self::Dance => "Dance",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Country {
    Nepal,
    India,
    China,
    London,
    Usa,
}

impl Country {
    pub const ALL: [Country; 5] = [
        Country::Nepal,
        Country::India,
        Country::China,
        Country::London,
        Country::Usa,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Nepal => "Nepal",
            Self::India => "India",
            Self::China => "China",
            Self::London => "London",
            Self::Usa => "USA",
        }
    }

    /// Next entry in select order, wrapping around. `None` starts at the first entry.
    pub fn cycle(current: Option<Country>, forward: bool) -> Country {
        let len = Self::ALL.len();
        let idx = match current {
            None if forward => return Self::ALL[0],
            None => return Self::ALL[len - 1],
            Some(c) => Self::ALL.iter().position(|x| *x == c).unwrap_or(0),
        };
        let next = if forward { (idx + 1) % len } else { (idx + len - 1) % len };
        Self::ALL[next]
    }
}

/// An uploaded picture: metadata plus a `data:` URL that can be rendered as a preview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageAttachment {
    pub file_name: String,
    pub mime_type: String,
    pub size_bytes: u64,
    pub data_url: String,
}

impl ImageAttachment {
    /// Short human readable summary, e.g. `avatar.png (12 KiB)`.
    pub fn summary(&self) -> String {
        format!("{} ({} KiB)", self.file_name, self.size_bytes.div_ceil(1024))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    pub hobbies: BTreeSet<Hobby>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<Country>,
    #[serde(default)]
    pub message: String,
    pub image: ImageAttachment,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserRecord {
    /// Hobbies joined by spaces, the way the list view shows them.
    pub fn hobbies_label(&self) -> String {
        self.hobbies
            .iter()
            .map(|h| h.label())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for UserRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}>", self.username, self.email)
    }
}
