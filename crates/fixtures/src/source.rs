//! Pluggable per-field value sources.
//!
//! [`FieldSource`] is the seam between the generator's invariants and the raw
//! random values. The default [`FakeFieldSource`] draws locale-flavoured data
//! from the `fake` crate; tests can plug in a source that emits hostile
//! values to prove the generator still upholds its invariants.

use fake::Fake;
use fake::faker::address::raw::{BuildingNumber, CityName, StreetName, ZipCode};
use fake::faker::company::raw::{Bs, CatchPhrase, CompanyName};
use fake::faker::internet::raw::{DomainSuffix, SafeEmail};
use fake::faker::name::raw::{LastName, Name};
use fake::faker::phone_number::raw::PhoneNumber;
use fake::locales::{EN, FR_FR, JA_JP, PT_BR};
use rand::RngCore;
use rand::seq::IndexedRandom;

use crate::commerce::{ADJECTIVES, DEPARTMENTS, MATERIALS, PRODUCTS};

/// Locale used for names, addresses, and phone numbers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FakerLocale {
    /// English.
    #[default]
    En,
    /// French (France).
    FrFr,
    /// Portuguese (Brazil).
    PtBr,
    /// Japanese. Person names are non-Latin, so usernames fall back to the
    /// digit-suffixed form.
    JaJp,
}

/// Raw value strategy for each field kind.
///
/// Implementations may return anything, including empty or non-ASCII
/// strings; the generator sanitises and validates every value it keeps.
pub trait FieldSource {
    /// A full person name.
    fn person_name(&self, rng: &mut dyn RngCore) -> String;
    /// An email address.
    fn email(&self, rng: &mut dyn RngCore) -> String;
    /// A phone number.
    fn phone(&self, rng: &mut dyn RngCore) -> String;
    /// A website URL.
    fn website(&self, rng: &mut dyn RngCore) -> String;
    /// A street line.
    fn street(&self, rng: &mut dyn RngCore) -> String;
    /// A city name.
    fn city(&self, rng: &mut dyn RngCore) -> String;
    /// A postal code.
    fn zipcode(&self, rng: &mut dyn RngCore) -> String;
    /// A company name.
    fn company_name(&self, rng: &mut dyn RngCore) -> String;
    /// A company tagline.
    fn catch_phrase(&self, rng: &mut dyn RngCore) -> String;
    /// A business slogan.
    fn bs(&self, rng: &mut dyn RngCore) -> String;
    /// A product name.
    fn product_name(&self, rng: &mut dyn RngCore) -> String;
    /// A store department.
    fn department(&self, rng: &mut dyn RngCore) -> String;
    /// A product material.
    fn material(&self, rng: &mut dyn RngCore) -> String;
}

/// Dispatches a `fake` raw faker over the selected locale.
macro_rules! localised {
    ($locale:expr, $rng:expr, $faker:ident) => {
        match $locale {
            FakerLocale::En => fake_string($faker(EN), $rng),
            FakerLocale::FrFr => fake_string($faker(FR_FR), $rng),
            FakerLocale::PtBr => fake_string($faker(PT_BR), $rng),
            FakerLocale::JaJp => fake_string($faker(JA_JP), $rng),
        }
    };
}

fn fake_string<F>(faker: F, rng: &mut dyn RngCore) -> String
where
    F: Fake,
    String: fake::Dummy<F>,
{
    faker.fake_with_rng(rng)
}

/// [`FieldSource`] backed by the `fake` crate.
///
/// Internet-facing values (email, website) always use English data so they
/// stay ASCII; person and address data follow the configured locale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FakeFieldSource {
    locale: FakerLocale,
}

impl FakeFieldSource {
    /// Creates a source for `locale`.
    #[must_use]
    pub const fn new(locale: FakerLocale) -> Self {
        Self { locale }
    }

    /// The configured locale.
    #[must_use]
    pub const fn locale(&self) -> FakerLocale {
        self.locale
    }
}

impl FieldSource for FakeFieldSource {
    fn person_name(&self, rng: &mut dyn RngCore) -> String {
        localised!(self.locale, rng, Name)
    }

    fn email(&self, rng: &mut dyn RngCore) -> String {
        fake_string(SafeEmail(EN), rng)
    }

    fn phone(&self, rng: &mut dyn RngCore) -> String {
        localised!(self.locale, rng, PhoneNumber)
    }

    fn website(&self, rng: &mut dyn RngCore) -> String {
        let host: String = fake_string(LastName(EN), rng)
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .collect::<String>()
            .to_ascii_lowercase();
        let suffix = fake_string(DomainSuffix(EN), rng);
        format!("https://www.{host}.{suffix}")
    }

    fn street(&self, rng: &mut dyn RngCore) -> String {
        let number = localised!(self.locale, rng, BuildingNumber);
        let street = localised!(self.locale, rng, StreetName);
        format!("{number} {street}")
    }

    fn city(&self, rng: &mut dyn RngCore) -> String {
        localised!(self.locale, rng, CityName)
    }

    fn zipcode(&self, rng: &mut dyn RngCore) -> String {
        localised!(self.locale, rng, ZipCode)
    }

    fn company_name(&self, rng: &mut dyn RngCore) -> String {
        localised!(self.locale, rng, CompanyName)
    }

    fn catch_phrase(&self, rng: &mut dyn RngCore) -> String {
        fake_string(CatchPhrase(EN), rng)
    }

    fn bs(&self, rng: &mut dyn RngCore) -> String {
        fake_string(Bs(EN), rng)
    }

    fn product_name(&self, rng: &mut dyn RngCore) -> String {
        let adjective = choose_word(rng, ADJECTIVES);
        let material = choose_word(rng, MATERIALS);
        let product = choose_word(rng, PRODUCTS);
        format!("{adjective} {material} {product}")
    }

    fn department(&self, rng: &mut dyn RngCore) -> String {
        choose_word(rng, DEPARTMENTS).to_owned()
    }

    fn material(&self, rng: &mut dyn RngCore) -> String {
        choose_word(rng, MATERIALS).to_owned()
    }
}

fn choose_word(rng: &mut dyn RngCore, words: &'static [&'static str]) -> &'static str {
    words.choose(rng).copied().unwrap_or_default()
}
