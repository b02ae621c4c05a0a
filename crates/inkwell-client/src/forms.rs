//! Form state for login, registration and post editing.
//!
//! Client-side checks use the same rules as the server so users get
//! immediate feedback; the server still validates every request.

use std::collections::HashMap;

use uuid::Uuid;

use inkwell_core::domain::Category;
use inkwell_core::validation::{
    EXCERPT_MAX_CHARS, TITLE_MAX_CHARS, validate_email, validate_password,
};
use inkwell_shared::dto::{
    CreatePostRequest, LoginRequest, PostResponse, RegisterUserRequest, UpdatePostRequest,
    UserResponse,
};

use crate::error::ClientError;
use crate::posts::PostsClient;
use crate::session::SessionManager;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Username,
    Email,
    Password,
    ConfirmPassword,
    Title,
    Content,
    Category,
    Excerpt,
}

/// Per-field messages plus one slot for the submit outcome.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    fields: HashMap<Field, String>,
    submit: Option<String>,
}

impl FormErrors {
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.submit.is_none()
    }

    pub fn field(&self, field: Field) -> Option<&str> {
        self.fields.get(&field).map(String::as_str)
    }

    pub fn submit(&self) -> Option<&str> {
        self.submit.as_deref()
    }

    fn set(&mut self, field: Field, message: impl Into<String>) {
        self.fields.insert(field, message.into());
    }

    fn clear_field(&mut self, field: Field) {
        self.fields.remove(&field);
    }

    fn clear(&mut self) {
        self.fields.clear();
        self.submit = None;
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    /// Client-side validation failed; nothing was sent.
    #[error("Form has invalid fields")]
    Invalid,

    #[error(transparent)]
    Rejected(#[from] ClientError),
}

/// Clears the submitting flag when the request finishes or is dropped.
struct InFlight<'a>(&'a mut bool);

impl<'a> InFlight<'a> {
    fn start(flag: &'a mut bool) -> Self {
        *flag = true;
        Self(flag)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}

#[derive(Debug, Default)]
pub struct LoginForm {
    email: String,
    password: String,
    errors: FormErrors,
    submitting: bool,
}

impl LoginForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_email(&mut self, value: impl Into<String>) {
        self.email = value.into();
        self.errors.clear_field(Field::Email);
    }

    pub fn set_password(&mut self, value: impl Into<String>) {
        self.password = value.into();
        self.errors.clear_field(Field::Password);
    }

    pub fn errors(&self) -> &FormErrors {
        &self.errors
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Both fields are required and the email must look like one.
    pub fn validate(&mut self) -> bool {
        let mut errors = FormErrors::default();

        if let Err(msg) = validate_email(&self.email) {
            errors.set(Field::Email, msg);
        }
        if self.password.is_empty() {
            errors.set(Field::Password, "Password is required");
        }

        self.errors = errors;
        self.errors.is_empty()
    }

    pub async fn submit(&mut self, session: &SessionManager) -> Result<UserResponse, SubmitError> {
        if !self.validate() {
            return Err(SubmitError::Invalid);
        }
        self.errors.clear();

        let request = LoginRequest {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        };

        let _in_flight = InFlight::start(&mut self.submitting);
        session.login(&request).await.map_err(|e| {
            self.errors.submit = Some(e.user_message("Login failed"));
            SubmitError::Rejected(e)
        })
    }
}

#[derive(Debug, Default)]
pub struct RegisterForm {
    username: String,
    email: String,
    password: String,
    confirm_password: String,
    errors: FormErrors,
    submitting: bool,
}

impl RegisterForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_username(&mut self, value: impl Into<String>) {
        self.username = value.into();
        self.errors.clear_field(Field::Username);
    }

    pub fn set_email(&mut self, value: impl Into<String>) {
        self.email = value.into();
        self.errors.clear_field(Field::Email);
    }

    pub fn set_password(&mut self, value: impl Into<String>) {
        self.password = value.into();
        self.errors.clear_field(Field::Password);
    }

    pub fn set_confirm_password(&mut self, value: impl Into<String>) {
        self.confirm_password = value.into();
        self.errors.clear_field(Field::ConfirmPassword);
    }

    pub fn errors(&self) -> &FormErrors {
        &self.errors
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Replace the field errors with a fresh check; true when the form is valid.
    pub fn validate(&mut self) -> bool {
        let mut errors = FormErrors::default();

        if self.username.trim().is_empty() {
            errors.set(Field::Username, "Username is required");
        }
        if let Err(msg) = validate_email(&self.email) {
            errors.set(Field::Email, msg);
        }
        if let Err(msg) = validate_password(&self.password) {
            errors.set(Field::Password, msg);
        }
        if self.password != self.confirm_password {
            errors.set(Field::ConfirmPassword, "Passwords do not match");
        }

        self.errors = errors;
        self.errors.is_empty()
    }

    /// Registers and logs in. Invalid input never reaches the network.
    pub async fn submit(&mut self, session: &SessionManager) -> Result<UserResponse, SubmitError> {
        if !self.validate() {
            return Err(SubmitError::Invalid);
        }
        self.errors.clear();

        let request = RegisterUserRequest {
            username: self.username.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        };

        let _in_flight = InFlight::start(&mut self.submitting);
        session.register(&request).await.map_err(|e| {
            self.errors.submit = Some(e.user_message("Registration failed"));
            SubmitError::Rejected(e)
        })
    }
}

/// Create or edit a post. Built with [`PostForm::edit`], a submit updates
/// that post; otherwise it creates a new one.
#[derive(Debug, Default)]
pub struct PostForm {
    editing: Option<Uuid>,
    title: String,
    content: String,
    category: String,
    excerpt: String,
    errors: FormErrors,
    submitting: bool,
}

impl PostForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn edit(post: &PostResponse) -> Self {
        Self {
            editing: Some(post.id),
            title: post.title.clone(),
            content: post.content.clone(),
            category: post.category.clone(),
            excerpt: post.excerpt.clone().unwrap_or_default(),
            ..Self::default()
        }
    }

    pub fn set_title(&mut self, value: impl Into<String>) {
        self.title = value.into();
        self.errors.clear_field(Field::Title);
    }

    pub fn set_content(&mut self, value: impl Into<String>) {
        self.content = value.into();
        self.errors.clear_field(Field::Content);
    }

    pub fn set_category(&mut self, value: impl Into<String>) {
        self.category = value.into();
        self.errors.clear_field(Field::Category);
    }

    pub fn set_excerpt(&mut self, value: impl Into<String>) {
        self.excerpt = value.into();
        self.errors.clear_field(Field::Excerpt);
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn errors(&self) -> &FormErrors {
        &self.errors
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn validate(&mut self) -> bool {
        let mut errors = FormErrors::default();

        if self.title.trim().is_empty() {
            errors.set(Field::Title, "Title is required");
        } else if self.title.trim().chars().count() > TITLE_MAX_CHARS {
            errors.set(
                Field::Title,
                format!("Title cannot exceed {} characters", TITLE_MAX_CHARS),
            );
        }
        if self.content.trim().is_empty() {
            errors.set(Field::Content, "Content is required");
        }
        if self.category.is_empty() {
            errors.set(Field::Category, "Category is required");
        } else if self.category.parse::<Category>().is_err() {
            errors.set(Field::Category, "Category is invalid");
        }
        if self.excerpt.trim().chars().count() > EXCERPT_MAX_CHARS {
            errors.set(
                Field::Excerpt,
                format!("Excerpt cannot exceed {} characters", EXCERPT_MAX_CHARS),
            );
        }

        self.errors = errors;
        self.errors.is_empty()
    }

    /// A successful create resets the form for the next post.
    pub async fn submit(&mut self, posts: &PostsClient) -> Result<PostResponse, SubmitError> {
        if !self.validate() {
            return Err(SubmitError::Invalid);
        }
        self.errors.clear();

        // An empty excerpt clears the stored one on edit.
        let excerpt = Some(self.excerpt.trim().to_string())
            .filter(|e| self.editing.is_some() || !e.is_empty());
        let in_flight = InFlight::start(&mut self.submitting);
        let result = match self.editing {
            Some(id) => {
                let body = UpdatePostRequest {
                    title: Some(self.title.clone()),
                    content: Some(self.content.clone()),
                    category: Some(self.category.clone()),
                    excerpt,
                    status: None,
                };
                posts.update(id, &body).await
            }
            None => {
                let body = CreatePostRequest {
                    title: Some(self.title.clone()),
                    content: Some(self.content.clone()),
                    category: Some(self.category.clone()),
                    excerpt,
                    slug: None,
                };
                posts.create(&body).await
            }
        };
        drop(in_flight);

        match result {
            Ok(post) => {
                if self.editing.is_none() {
                    *self = Self::default();
                }
                Ok(post)
            }
            Err(e) => {
                self.errors.submit = Some(e.user_message("An error occurred"));
                Err(SubmitError::Rejected(e))
            }
        }
    }
}
