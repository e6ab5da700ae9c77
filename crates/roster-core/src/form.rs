//! Create and edit forms.
//!
//! A [`FormController`] owns a [`UserDraft`] and walks through
//! `Initializing -> Editing -> Committing -> NavigatedAway`. Edit forms load
//! their record while initializing; create forms start editing right away.
//! Nothing reaches the [`RecordStore`] until every rule passes.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::{FormError, ImageError, StoreError};
use crate::models::{
    Country, Gender, Hobby, ImageAttachment, ImageSlot, ImageTicket, UserDraft, UserRecord,
};
use crate::router::Navigation;
use crate::store::RecordStore;
use crate::validation::{validate_draft, FieldErrors};

/// Shared by every form, so a decode started by a closed form can never match a later one.
static NEXT_TICKET: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(Uuid),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    Initializing,
    Editing,
    Committing,
    NavigatedAway,
}

/// Result of a successful submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Commit {
    pub id: Uuid,
    pub navigation: Navigation,
}

#[derive(Debug)]
pub struct FormController {
    mode: FormMode,
    phase: FormPhase,
    draft: UserDraft,
    initial: UserDraft,
    errors: FieldErrors,
    decode_error: Option<String>,
    attempted: bool,
    created_at: Option<DateTime<Utc>>,
}

impl FormController {
    pub fn create() -> Self {
        let mut form = Self::blank(FormMode::Create);
        form.phase = FormPhase::Editing;
        form
    }

    /// Open an edit form for `id`. Fails when the store has no such record.
    pub fn edit(store: &RecordStore, id: Uuid) -> Result<Self, FormError> {
        let mut form = Self::blank(FormMode::Edit(id));
        form.load(store)?;
        Ok(form)
    }

    fn blank(mode: FormMode) -> Self {
        let draft = UserDraft::default();
        let errors = validate_draft(&draft);
        Self {
            mode,
            phase: FormPhase::Initializing,
            initial: draft.clone(),
            draft,
            errors,
            decode_error: None,
            attempted: false,
            created_at: None,
        }
    }

    fn load(&mut self, store: &RecordStore) -> Result<(), FormError> {
        let FormMode::Edit(id) = self.mode else {
            self.phase = FormPhase::Editing;
            return Ok(());
        };

        let record = store.get(id).ok_or(FormError::RecordNotFound(id))?;
        self.draft = UserDraft::from(record);
        self.initial = self.draft.clone();
        self.created_at = Some(record.created_at);
        self.revalidate();
        self.phase = FormPhase::Editing;
        tracing::debug!(id = %id, "edit form loaded");
        Ok(())
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn draft(&self) -> &UserDraft {
        &self.draft
    }

    /// Current rule results, recomputed on every change.
    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Errors the UI should show. Rule errors stay hidden until the first submit
    /// attempt; a failed image read shows immediately.
    pub fn visible_errors(&self) -> FieldErrors {
        let mut visible = if self.attempted {
            self.errors.clone()
        } else {
            FieldErrors::default()
        };
        if let Some(ref msg) = self.decode_error {
            visible.image = Some(msg.clone());
        }
        visible
    }

    pub fn image_pending(&self) -> bool {
        self.draft.image.is_pending()
    }

    pub fn can_submit(&self) -> bool {
        self.phase == FormPhase::Editing && !self.image_pending()
    }

    fn ensure_editing(&self) -> Result<(), FormError> {
        match self.phase {
            FormPhase::Editing => Ok(()),
            _ => Err(FormError::Closed),
        }
    }

    fn revalidate(&mut self) {
        self.errors = validate_draft(&self.draft);
        if let Some(ref msg) = self.decode_error {
            self.errors.image = Some(msg.clone());
        }
    }

    fn change(&mut self, apply: impl FnOnce(&mut UserDraft)) -> Result<(), FormError> {
        self.ensure_editing()?;
        apply(&mut self.draft);
        self.revalidate();
        Ok(())
    }

    pub fn set_username(&mut self, username: impl Into<String>) -> Result<(), FormError> {
        let username = username.into();
        self.change(|d| d.username = username)
    }

    pub fn set_email(&mut self, email: impl Into<String>) -> Result<(), FormError> {
        let email = email.into();
        self.change(|d| d.email = email)
    }

    pub fn set_gender(&mut self, gender: Option<Gender>) -> Result<(), FormError> {
        self.change(|d| d.gender = gender)
    }

    pub fn toggle_hobby(&mut self, hobby: Hobby) -> Result<(), FormError> {
        self.change(|d| d.toggle_hobby(hobby))
    }

    pub fn set_country(&mut self, country: Option<Country>) -> Result<(), FormError> {
        self.change(|d| d.country = country)
    }

    pub fn set_message(&mut self, message: impl Into<String>) -> Result<(), FormError> {
        let message = message.into();
        self.change(|d| d.message = message)
    }

    /// Mark the image as loading. The returned ticket must accompany the decode result.
    pub fn begin_image(&mut self, file_name: impl Into<String>) -> Result<ImageTicket, FormError> {
        self.ensure_editing()?;
        let ticket = ImageTicket(NEXT_TICKET.fetch_add(1, Ordering::Relaxed));
        self.decode_error = None;
        self.draft.image = ImageSlot::Pending {
            ticket,
            file_name: file_name.into(),
        };
        self.revalidate();
        Ok(ticket)
    }

    /// Deliver a decode result. Returns `false` when the result is stale or the
    /// form is closed, in which case nothing changes.
    pub fn complete_image(
        &mut self,
        ticket: ImageTicket,
        result: Result<ImageAttachment, ImageError>,
    ) -> bool {
        if self.phase != FormPhase::Editing {
            return false;
        }
        match self.draft.image {
            ImageSlot::Pending { ticket: current, .. } if current == ticket => {}
            _ => {
                tracing::debug!(ticket = ticket.0, "ignoring stale image decode");
                return false;
            }
        }

        match result {
            Ok(image) => {
                self.draft.image = ImageSlot::Ready(image);
            }
            Err(e) => {
                tracing::warn!(error = %e, "image decode failed");
                self.draft.image = ImageSlot::Empty;
                self.decode_error = Some(e.to_string());
            }
        }
        self.revalidate();
        true
    }

    /// Validate and, when everything passes, write the draft into `store`.
    pub fn submit(&mut self, store: &mut RecordStore) -> Result<Commit, FormError> {
        self.ensure_editing()?;
        self.attempted = true;
        self.revalidate();

        if self.image_pending() {
            return Err(FormError::ImagePending);
        }
        if !self.errors.is_empty() {
            tracing::debug!(errors = %self.errors, "submit rejected");
            return Err(FormError::Invalid(self.errors.clone()));
        }
        let Some(image) = self.draft.image.attachment().cloned() else {
            return Err(FormError::Invalid(self.errors.clone()));
        };

        self.phase = FormPhase::Committing;
        let now = Utc::now();
        let id = match self.mode {
            FormMode::Create => Uuid::new_v4(),
            FormMode::Edit(id) => id,
        };
        let record = UserRecord {
            id,
            username: self.draft.username.clone(),
            email: self.draft.email.clone(),
            gender: self.draft.gender,
            hobbies: self.draft.hobbies.clone(),
            country: self.draft.country,
            message: self.draft.message.clone(),
            image,
            created_at: self.created_at.unwrap_or(now),
            updated_at: now,
        };

        let stored = match self.mode {
            FormMode::Create => store.add(record),
            FormMode::Edit(_) => store.update(record),
        };
        if let Err(e) = stored {
            self.phase = FormPhase::Editing;
            return Err(match e {
                StoreError::NotFound(id) => FormError::RecordNotFound(id),
                other => FormError::Store(other),
            });
        }

        tracing::info!(id = %id, mode = ?self.mode, "form committed");
        self.phase = FormPhase::NavigatedAway;
        Ok(Commit {
            id,
            navigation: Navigation::Back,
        })
    }

    /// Restore the draft the form started with.
    pub fn reset(&mut self) -> Result<(), FormError> {
        self.ensure_editing()?;
        self.draft = self.initial.clone();
        self.decode_error = None;
        self.attempted = false;
        self.revalidate();
        Ok(())
    }

    /// Leave without committing.
    pub fn cancel(&mut self) -> Result<Navigation, FormError> {
        self.ensure_editing()?;
        self.phase = FormPhase::NavigatedAway;
        Ok(Navigation::Back)
    }
}
