// ABOUTME: User-facing response messages for registration and user management
// ABOUTME: Kept in one place so route handlers and tests agree on exact wording

/// All four required registration fields are not present
pub const REQUIRED_FIELDS: &str = "Name, username, email, and password are required";
/// Email field is empty after trimming
pub const EMAIL_REQUIRED: &str = "Email is required";
/// Email failed the shape check
pub const INVALID_EMAIL: &str = "Please enter a valid email address";
/// Local username collision
pub const USERNAME_EXISTS: &str = "Username already exists";
/// Local email collision
pub const EMAIL_EXISTS: &str = "Email already registered";
/// Local persistence failed
pub const REGISTRATION_FAILED: &str = "An error occurred during registration. Please try again.";
/// Created locally and upstream
pub const REGISTRATION_SUCCESS: &str = "Registration successful! Your account has been created.";
/// Created locally, upstream mirror failed
pub const REGISTRATION_LOCAL_ONLY: &str = "Registration completed locally, but there was an issue connecting to the Palmr service. Please contact support if you experience any issues.";
/// Warning attached to local-only registrations
pub const UPSTREAM_WARNING: &str = "Palmr API connection failed";
