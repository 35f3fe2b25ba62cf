//! Request schemas with field-level validation rules.
//!
//! These are consumed by the request-validation layer before the service is
//! invoked; the service itself never re-checks field shapes. Note the looser
//! 1-100 bounds on the change-password fields compared to the 6-32 bound at
//! registration: the current-password field must accept whatever was valid
//! when the account was created.

use serde::Deserialize;
use validator::Validate;

/// User creation request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    /// User display name
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: String,
    /// User email address
    #[validate(email(message = "Email must be a valid email address"))]
    pub email: String,
    /// User password
    #[validate(length(min = 6, max = 32, message = "Password must be between 6 and 32 characters"))]
    pub password: String,
    /// Password confirmation, must equal `password`
    #[validate(
        length(min = 6, max = 32, message = "Password confirmation must be between 6 and 32 characters"),
        must_match(other = "password", message = "Password confirmation does not match")
    )]
    pub confirm_password: String,
}

/// User update request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    /// New display name
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: String,
    /// New email address
    #[validate(email(message = "Email must be a valid email address"))]
    pub email: String,
}

/// Password change request
///
/// The new/confirm equality check is a service-layer concern, not a schema
/// rule; the schema only bounds the field shapes.
#[derive(Debug, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    /// Current password
    #[validate(length(min = 1, max = 100, message = "Old password must be between 1 and 100 characters"))]
    pub old_password: String,
    /// Replacement password
    #[validate(length(min = 1, max = 100, message = "New password must be between 1 and 100 characters"))]
    pub new_password: String,
    /// Confirmation of the replacement password
    #[validate(length(min = 1, max = 100, message = "Password confirmation must be between 1 and 100 characters"))]
    pub confirm_password: String,
}
