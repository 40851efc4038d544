//! Create/update form state.

use crate::api::User;
use crate::validate::{self, ValidationError};

/// Focusable elements of the form, in tab order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FormField {
    Name,
    Email,
    Submit,
    Cancel,
}

impl FormField {
    fn next(self) -> Self {
        match self {
            FormField::Name => FormField::Email,
            FormField::Email => FormField::Submit,
            FormField::Submit => FormField::Cancel,
            FormField::Cancel => FormField::Name,
        }
    }

    fn prev(self) -> Self {
        match self {
            FormField::Name => FormField::Cancel,
            FormField::Email => FormField::Name,
            FormField::Submit => FormField::Email,
            FormField::Cancel => FormField::Submit,
        }
    }
}

/// What a valid form asks the backend to do.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Submission {
    Create { name: String, email: String },
    Update { id: i64, name: String, email: String },
}

/// A draft being created (`id == None`) or an existing user being edited.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserForm {
    pub id: Option<i64>,
    pub name: String,
    pub email: String,
    pub focus: FormField,
    /// Set on the first edit or submit attempt; errors are shown only after.
    pub edited: bool,
}

impl UserForm {
    pub fn create() -> Self {
        Self { id: None, name: String::new(), email: String::new(), focus: FormField::Name, edited: false }
    }

    pub fn edit(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name_or_empty().to_string(),
            email: user.email_or_empty().to_string(),
            focus: FormField::Name,
            edited: false,
        }
    }

    pub fn title(&self) -> String {
        match self.id {
            Some(id) => format!("Update User {id}"),
            None => "Create User".to_string(),
        }
    }

    pub fn name_valid(&self) -> bool {
        validate::is_valid_name(&self.name)
    }

    pub fn email_valid(&self) -> bool {
        validate::is_valid_email(&self.email)
    }

    pub fn name_error(&self) -> bool {
        self.edited && !self.name_valid()
    }

    pub fn email_error(&self) -> bool {
        self.edited && !self.email_valid()
    }

    pub fn can_submit(&self) -> bool {
        self.name_valid() && self.email_valid()
    }

    pub fn next_field(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn prev_field(&mut self) {
        self.focus = self.focus.prev();
    }

    fn focused_text(&mut self) -> Option<&mut String> {
        match self.focus {
            FormField::Name => Some(&mut self.name),
            FormField::Email => Some(&mut self.email),
            FormField::Submit | FormField::Cancel => None,
        }
    }

    pub fn push_char(&mut self, c: char) {
        if let Some(text) = self.focused_text() {
            text.push(c);
            self.edited = true;
        }
    }

    pub fn backspace(&mut self) {
        if let Some(text) = self.focused_text() {
            text.pop();
            self.edited = true;
        }
    }

    /// Validate and turn the draft into a request. A failed attempt marks the
    /// form edited so the offending fields light up.
    pub fn submit(&mut self) -> Result<Submission, ValidationError> {
        if let Err(err) = validate::validate(&self.name, &self.email) {
            self.edited = true;
            return Err(err);
        }
        let (name, email) = (self.name.clone(), self.email.clone());
        Ok(match self.id {
            Some(id) => Submission::Update { id, name, email },
            None => Submission::Create { name, email },
        })
    }
}
