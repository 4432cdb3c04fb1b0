//! Randomised fixture generation.
//!
//! [`FixtureGenerator`] owns a seeded RNG and a [`FieldSource`]. Every record
//! it returns upholds the field invariants: non-empty name, an ASCII
//! alphanumeric username, and an email with valid syntax. Two generators
//! built from the same seed, locale, and policy produce identical output.

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::error::FixtureError;
use crate::password::{PasswordPolicy, generate_password};
use crate::records::{
    AddressFixture, CompanyFixture, LoginFixture, ProductFixture, UserFixture, UserSummary,
};
use crate::source::{FakeFieldSource, FakerLocale, FieldSource};
use crate::validation::{is_valid_email, is_valid_username, sanitize_username};

/// Maximum number of attempts to draw a name that survives sanitisation.
const MAX_USERNAME_ATTEMPTS: usize = 10;

/// Maximum number of attempts to draw a syntactically valid email.
const MAX_EMAIL_ATTEMPTS: usize = 10;

/// Maximum number of attempts to draw a non-empty free-text value.
const MAX_TEXT_ATTEMPTS: usize = 5;

/// Prefix for the name of a [`FixtureGenerator::generate_valid_user`] record.
pub const VALID_USER_NAME_PREFIX: &str = "Test User ";

/// Prefix for the username of a [`FixtureGenerator::generate_valid_user`] record.
pub const VALID_USERNAME_PREFIX: &str = "user";

/// Number of random digits appended to the valid-user prefixes.
const VALID_USER_DIGITS: usize = 3;

/// Number of random digits in a fallback username.
const FALLBACK_USERNAME_DIGITS: usize = 6;

/// Domain used when no generated email passes validation.
const FALLBACK_EMAIL_DOMAIN: &str = "example.com";

/// Produces randomised request payloads.
///
/// # Example
///
/// ```
/// use fixtures::{FixtureGenerator, is_valid_email, is_valid_username};
///
/// let mut generator = FixtureGenerator::seeded(42);
/// let user = generator.generate_user();
///
/// assert!(is_valid_username(&user.username));
/// assert!(is_valid_email(&user.email));
/// assert!(user.address.is_some());
///
/// let mut replay = FixtureGenerator::seeded(42);
/// assert_eq!(replay.generate_user(), user);
/// ```
#[derive(Debug, Clone)]
pub struct FixtureGenerator<S = FakeFieldSource> {
    rng: ChaCha8Rng,
    seed: u64,
    source: S,
    password_policy: PasswordPolicy,
}

impl FixtureGenerator<FakeFieldSource> {
    /// Creates a generator seeded from process-wide randomness.
    #[must_use]
    pub fn new() -> Self {
        Self::seeded(rand::rng().random())
    }

    /// Creates a reproducible generator.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::with_source(seed, FakeFieldSource::default())
    }

    /// Switches the locale used for person and address data.
    #[must_use]
    pub fn with_locale(mut self, locale: FakerLocale) -> Self {
        self.source = FakeFieldSource::new(locale);
        self
    }
}

impl Default for FixtureGenerator<FakeFieldSource> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: FieldSource> FixtureGenerator<S> {
    /// Creates a generator drawing raw values from `source`.
    pub fn with_source(seed: u64, source: S) -> Self {
        debug!(seed, "fixture generator seeded");
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
            source,
            password_policy: PasswordPolicy::default(),
        }
    }

    /// Replaces the password policy used by [`Self::generate_login`].
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::InvalidPasswordPolicy`] when the policy's
    /// length range cannot hold its required character classes.
    pub fn with_password_policy(mut self, policy: PasswordPolicy) -> Result<Self, FixtureError> {
        self.password_policy = policy.validate()?;
        Ok(self)
    }

    /// The seed this generator was created with.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Generates a user with every field populated, address and company
    /// included.
    pub fn generate_user(&mut self) -> UserFixture {
        let name = self.person_name();
        let username = self.username();
        let email = self.email();
        let phone = self.text(S::phone, "555-0100");
        let website = self.text(S::website, "https://www.example.com");
        let address = self.generate_address();
        let company = self.generate_company();

        UserFixture {
            name,
            username,
            email,
            phone,
            website,
            address: Some(address),
            company: Some(company),
        }
    }

    /// Generates a user whose address is freshly drawn after the base record.
    pub fn generate_user_with_address(&mut self) -> UserFixture {
        let mut user = self.generate_user();
        user.address = Some(self.generate_address());
        user
    }

    /// Generates a standalone address.
    pub fn generate_address(&mut self) -> AddressFixture {
        AddressFixture {
            street: self.text(S::street, "1 Main Street"),
            city: self.text(S::city, "Springfield"),
            zipcode: self.text(S::zipcode, "00000"),
        }
    }

    /// Generates a standalone company.
    pub fn generate_company(&mut self) -> CompanyFixture {
        CompanyFixture {
            name: self.text(S::company_name, "Acme"),
            catch_phrase: self.text(S::catch_phrase, "Quality first"),
            bs: self.text(S::bs, "deliver solutions"),
        }
    }

    /// Generates login credentials under the configured password policy.
    pub fn generate_login(&mut self) -> LoginFixture {
        let email = self.email();
        let password = generate_password(&mut self.rng, &self.password_policy);
        LoginFixture { email, password }
    }

    /// Generates a product with a two-decimal price string.
    pub fn generate_product(&mut self) -> ProductFixture {
        let name = self.text(S::product_name, "Plain Widget");
        let whole: u32 = self.rng.random_range(1..=999);
        let cents: u32 = self.rng.random_range(0..100);
        let department = self.text(S::department, "Tools");
        let material = self.text(S::material, "Steel");

        ProductFixture {
            name,
            price: format!("{whole}.{cents:02}"),
            department,
            material,
        }
    }

    /// Generates a user with predictable prefixes and random digit suffixes.
    ///
    /// The name is `"Test User "` followed by three digits and the username
    /// is `"user"` followed by three digits.
    pub fn generate_valid_user(&mut self) -> UserSummary {
        let name = format!("{VALID_USER_NAME_PREFIX}{}", self.digits(VALID_USER_DIGITS));
        let username = format!("{VALID_USERNAME_PREFIX}{}", self.digits(VALID_USER_DIGITS));
        let email = self.email();
        UserSummary {
            name,
            username,
            email,
        }
    }

    /// Renders a `{name, username, email}` document as pretty JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::Serialization`] if the document cannot be
    /// rendered.
    pub fn generate_user_json(&mut self) -> Result<String, FixtureError> {
        let summary = UserSummary {
            name: self.person_name(),
            username: self.username(),
            email: self.email(),
        };
        Ok(serde_json::to_string_pretty(&summary)?)
    }

    /// Generates `count` independent users.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::InvalidCount`] for a negative count, before
    /// any value is generated.
    ///
    /// # Example
    ///
    /// ```
    /// use fixtures::{FixtureError, FixtureGenerator};
    ///
    /// let mut generator = FixtureGenerator::seeded(7);
    /// assert!(generator.generate_multiple(0).expect("empty").is_empty());
    /// assert_eq!(generator.generate_multiple(3).expect("three").len(), 3);
    /// assert_eq!(
    ///     generator.generate_multiple(-1),
    ///     Err(FixtureError::InvalidCount { count: -1 })
    /// );
    /// ```
    pub fn generate_multiple(&mut self, count: i64) -> Result<Vec<UserFixture>, FixtureError> {
        let len = usize::try_from(count).map_err(|_| FixtureError::InvalidCount { count })?;
        Ok((0..len).map(|_| self.generate_user()).collect())
    }

    fn person_name(&mut self) -> String {
        self.text(S::person_name, "Test User")
    }

    /// Draws a person name and strips it down to `[A-Za-z0-9]`.
    ///
    /// Retries when nothing survives sanitisation, then falls back to
    /// `"user"` plus six random digits.
    fn username(&mut self) -> String {
        for _ in 0..MAX_USERNAME_ATTEMPTS {
            let raw = self.source.person_name(&mut self.rng);
            let candidate = sanitize_username(&raw);
            if is_valid_username(&candidate) {
                return candidate;
            }
        }
        format!(
            "{VALID_USERNAME_PREFIX}{}",
            self.digits(FALLBACK_USERNAME_DIGITS)
        )
    }

    fn email(&mut self) -> String {
        for _ in 0..MAX_EMAIL_ATTEMPTS {
            let candidate = self.source.email(&mut self.rng);
            if is_valid_email(&candidate) {
                return candidate;
            }
        }
        let local = self.username().to_ascii_lowercase();
        format!("{local}@{FALLBACK_EMAIL_DOMAIN}")
    }

    /// Draws a non-blank value from `field`, falling back to `fallback`.
    fn text(&mut self, field: fn(&S, &mut dyn RngCore) -> String, fallback: &str) -> String {
        for _ in 0..MAX_TEXT_ATTEMPTS {
            let value = field(&self.source, &mut self.rng);
            if !value.trim().is_empty() {
                return value;
            }
        }
        fallback.to_owned()
    }

    fn digits(&mut self, count: usize) -> String {
        (0..count)
            .map(|_| char::from(b'0' + self.rng.random_range(0..10_u8)))
            .collect()
    }
}
