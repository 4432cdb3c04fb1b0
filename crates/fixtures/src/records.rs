//! Fixture record types.
//!
//! These mirror the JSONPlaceholder `/users` and ReqRes login payload shapes.
//! Field names serialise in camelCase so a record can be posted as-is and its
//! fields compared one by one against the echoed response.

use serde::{Deserialize, Serialize};

/// Postal address embedded in a [`UserFixture`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressFixture {
    /// Building number and street name.
    pub street: String,
    /// City name.
    pub city: String,
    /// Postal code in the locale's format.
    pub zipcode: String,
}

/// Employer details embedded in a [`UserFixture`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyFixture {
    /// Company name.
    pub name: String,
    /// Marketing tagline.
    pub catch_phrase: String,
    /// Business slogan.
    pub bs: String,
}

/// A randomised user record used as a `POST /users` payload.
///
/// # Example
///
/// ```
/// use fixtures::UserFixture;
///
/// let user = UserFixture {
///     name: "Leanne Graham".to_owned(),
///     username: "Bret".to_owned(),
///     email: "Sincere@april.biz".to_owned(),
///     phone: "1-770-736-8031".to_owned(),
///     website: "hildegard.org".to_owned(),
///     address: None,
///     company: None,
/// };
///
/// let json = serde_json::to_value(&user).expect("serialise");
/// assert_eq!(json["username"], "Bret");
/// assert!(json.get("address").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserFixture {
    /// Full person name.
    pub name: String,
    /// ASCII alphanumeric handle derived from a person name.
    pub username: String,
    /// Contact email address.
    pub email: String,
    /// Free-form phone number.
    pub phone: String,
    /// Personal website URL.
    pub website: String,
    /// Optional postal address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<AddressFixture>,
    /// Optional employer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<CompanyFixture>,
}

impl UserFixture {
    /// Returns the identifying subset of this user.
    #[must_use]
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            name: self.name.clone(),
            username: self.username.clone(),
            email: self.email.clone(),
        }
    }
}

/// The `{name, username, email}` subset of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    /// Full person name.
    pub name: String,
    /// ASCII alphanumeric handle.
    pub username: String,
    /// Contact email address.
    pub email: String,
}

/// Credentials for a login request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginFixture {
    /// Login email address.
    pub email: String,
    /// Plain-text password produced under a [`PasswordPolicy`](crate::PasswordPolicy).
    pub password: String,
}

/// A catalogue product for e-commerce style payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductFixture {
    /// Product display name.
    pub name: String,
    /// Price with two fractional digits, e.g. `"42.07"`.
    pub price: String,
    /// Store department.
    pub department: String,
    /// Primary material.
    pub material: String,
}
