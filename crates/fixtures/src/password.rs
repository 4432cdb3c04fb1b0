//! Password generation under a configurable character-class policy.

use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};

use crate::error::FixtureError;

const LOWERCASE: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const UPPERCASE: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &[u8] = b"0123456789";
const SPECIAL: &[u8] = b"!#$%&*+-=?@^_";

/// Default minimum password length.
pub const DEFAULT_PASSWORD_MIN: usize = 8;

/// Default maximum password length.
pub const DEFAULT_PASSWORD_MAX: usize = 12;

/// Length range and character classes for generated passwords.
///
/// Every password contains at least one lower-case letter and one digit.
/// Upper-case letters and special characters are added when enabled.
///
/// # Example
///
/// ```
/// use fixtures::PasswordPolicy;
///
/// let policy = PasswordPolicy::new(10, 16)
///     .expect("valid range")
///     .with_special(false);
/// assert_eq!(policy.min_len(), 10);
/// assert!(!policy.includes_special());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordPolicy {
    min_len: usize,
    max_len: usize,
    include_uppercase: bool,
    include_special: bool,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_len: DEFAULT_PASSWORD_MIN,
            max_len: DEFAULT_PASSWORD_MAX,
            include_uppercase: true,
            include_special: true,
        }
    }
}

impl PasswordPolicy {
    /// Creates a policy with upper-case and special characters enabled.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::InvalidPasswordPolicy`] when `min_len` exceeds
    /// `max_len` or is too short to hold every required character class.
    pub fn new(min_len: usize, max_len: usize) -> Result<Self, FixtureError> {
        let policy = Self {
            min_len,
            max_len,
            ..Self::default()
        };
        policy.validate()
    }

    /// Toggles upper-case letters.
    #[must_use]
    pub const fn with_uppercase(mut self, enabled: bool) -> Self {
        self.include_uppercase = enabled;
        self
    }

    /// Toggles special characters.
    #[must_use]
    pub const fn with_special(mut self, enabled: bool) -> Self {
        self.include_special = enabled;
        self
    }

    /// Minimum generated length.
    #[must_use]
    pub const fn min_len(&self) -> usize {
        self.min_len
    }

    /// Maximum generated length.
    #[must_use]
    pub const fn max_len(&self) -> usize {
        self.max_len
    }

    /// Whether upper-case letters are required.
    #[must_use]
    pub const fn includes_uppercase(&self) -> bool {
        self.include_uppercase
    }

    /// Whether special characters are required.
    #[must_use]
    pub const fn includes_special(&self) -> bool {
        self.include_special
    }

    /// Number of character classes every password must contain.
    #[must_use]
    pub fn required_classes(&self) -> usize {
        2 + usize::from(self.include_uppercase) + usize::from(self.include_special)
    }

    /// Checks that the length range can hold every required class.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::InvalidPasswordPolicy`] for unusable ranges.
    pub fn validate(self) -> Result<Self, FixtureError> {
        let required = self.required_classes();
        if self.min_len < required || self.min_len > self.max_len {
            return Err(FixtureError::InvalidPasswordPolicy {
                min_len: self.min_len,
                max_len: self.max_len,
                required,
            });
        }
        Ok(self)
    }

    fn classes(&self) -> Vec<&'static [u8]> {
        let mut classes = vec![LOWERCASE, DIGITS];
        if self.include_uppercase {
            classes.push(UPPERCASE);
        }
        if self.include_special {
            classes.push(SPECIAL);
        }
        classes
    }
}

/// Generates a password satisfying `policy`.
///
/// One character is drawn from each required class, the remainder from the
/// union of all enabled classes, and the result is shuffled.
pub(crate) fn generate_password<R>(rng: &mut R, policy: &PasswordPolicy) -> String
where
    R: Rng + ?Sized,
{
    let length = rng.random_range(policy.min_len..=policy.max_len);
    let classes = policy.classes();
    let pool: Vec<u8> = classes.iter().flat_map(|class| class.iter().copied()).collect();

    let mut chars: Vec<char> = classes.iter().map(|class| pick(rng, class)).collect();
    while chars.len() < length {
        chars.push(pick(rng, &pool));
    }
    chars.shuffle(rng);
    chars.into_iter().collect()
}

fn pick<R>(rng: &mut R, pool: &[u8]) -> char
where
    R: Rng + ?Sized,
{
    pool.choose(rng).map_or('0', |byte| char::from(*byte))
}
