//! Round trips of generated fixtures: post a record, compare the echo.

use fixtures::{FakerLocale, FixtureGenerator, UserFixture};
use tracing::info;

use crate::assertion::Matcher;
use crate::client::RequestSpec;
use crate::error::ScenarioError;
use crate::scenario::{Scenario, ScenarioContext, ScenarioFuture};

const SUITE: &str = "generated";

const GENERATED_USER_ROUNDS: usize = 2;

/// Payload shapes posted by [`data_variation`].
#[derive(Debug, Clone, Copy)]
enum Variant {
    Basic,
    WithAddress,
    WithCompany,
}

impl Variant {
    const ALL: [Self; 3] = [Self::Basic, Self::WithAddress, Self::WithCompany];

    const fn label(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::WithAddress => "with-address",
            Self::WithCompany => "with-company",
        }
    }

    fn build(self, fixtures: &mut FixtureGenerator) -> UserFixture {
        match self {
            Self::Basic => UserFixture {
                address: None,
                company: None,
                ..fixtures.generate_user()
            },
            Self::WithAddress => UserFixture {
                company: None,
                ..fixtures.generate_user_with_address()
            },
            Self::WithCompany => UserFixture {
                address: None,
                company: Some(fixtures.generate_company()),
                ..fixtures.generate_user()
            },
        }
    }
}

pub(super) fn scenarios() -> Vec<Scenario> {
    vec![
        Scenario::new(SUITE, "create_generated_user", create_generated_user),
        Scenario::new(SUITE, "create_two_generated_users", create_two_generated_users),
        Scenario::new(SUITE, "create_localised_user", create_localised_user),
        Scenario::new(SUITE, "create_user_with_company", create_user_with_company),
        Scenario::new(SUITE, "create_valid_user", create_valid_user),
        Scenario::new(SUITE, "create_user_with_address", create_user_with_address),
        Scenario::new(SUITE, "create_login_record", create_login_record),
        Scenario::new(SUITE, "create_product_record", create_product_record),
        Scenario::new(SUITE, "data_variation", data_variation),
    ]
}

async fn post_user(context: &ScenarioContext, user: &UserFixture) -> Result<(), ScenarioError> {
    let response = context
        .client()
        .request(RequestSpec::post("/users").json(user)?)
        .await?;
    response
        .then()
        .status_code(201)?
        .content_type_json()?
        .body("name", Matcher::equals(user.name.as_str()))?
        .body("username", Matcher::equals(user.username.as_str()))?
        .body("email", Matcher::equals(user.email.as_str()))?
        .body("id", Matcher::NotNull)?;
    Ok(())
}

fn create_generated_user(context: &mut ScenarioContext) -> ScenarioFuture<'_> {
    Box::pin(async move {
        let user = context.fixtures().generate_user();
        info!(name = %user.name, username = %user.username, email = %user.email, "generated user");
        post_user(context, &user).await
    })
}

fn create_two_generated_users(context: &mut ScenarioContext) -> ScenarioFuture<'_> {
    Box::pin(async move {
        for round in 1..=GENERATED_USER_ROUNDS {
            let user = context.fixtures().generate_user();
            info!(round, name = %user.name, "creating generated user");
            post_user(context, &user).await?;
        }
        Ok(())
    })
}

fn create_localised_user(context: &mut ScenarioContext) -> ScenarioFuture<'_> {
    Box::pin(async move {
        let seed = context.fixtures().seed();
        let mut localised = FixtureGenerator::seeded(seed).with_locale(FakerLocale::JaJp);
        let user = localised.generate_user();
        info!(name = %user.name, username = %user.username, "generated localised user");
        post_user(context, &user).await
    })
}

fn create_user_with_company(context: &mut ScenarioContext) -> ScenarioFuture<'_> {
    Box::pin(async move {
        let company = context.fixtures().generate_company();
        let user = UserFixture {
            company: Some(company.clone()),
            ..context.fixtures().generate_user()
        };
        let response = context
            .client()
            .request(RequestSpec::post("/users").json(&user)?)
            .await?;
        response
            .then()
            .status_code(201)?
            .body("name", Matcher::equals(user.name.as_str()))?
            .body("company.name", Matcher::equals(company.name.as_str()))?
            .body("company.catchPhrase", Matcher::equals(company.catch_phrase.as_str()))?;
        Ok(())
    })
}

fn create_valid_user(context: &mut ScenarioContext) -> ScenarioFuture<'_> {
    Box::pin(async move {
        let user = context.fixtures().generate_valid_user();
        let response = context
            .client()
            .request(RequestSpec::post("/users").json(&user)?)
            .await?;
        response
            .then()
            .status_code(201)?
            .body("name", Matcher::equals(user.name.as_str()))?
            .body("username", Matcher::equals(user.username.as_str()))?
            .body("email", Matcher::equals(user.email.as_str()))?
            .body("id", Matcher::NotNull)?;
        Ok(())
    })
}

fn create_user_with_address(context: &mut ScenarioContext) -> ScenarioFuture<'_> {
    Box::pin(async move {
        let user = context.fixtures().generate_user_with_address();
        let street = user.address.as_ref().map(|address| address.street.clone());
        let city = user.address.as_ref().map(|address| address.city.clone());
        let response = context
            .client()
            .request(RequestSpec::post("/users").json(&user)?)
            .await?;
        response
            .then()
            .status_code(201)?
            .body("name", Matcher::equals(user.name.as_str()))?
            .body("address.street", Matcher::equals(street))?
            .body("address.city", Matcher::equals(city))?;
        Ok(())
    })
}

fn create_login_record(context: &mut ScenarioContext) -> ScenarioFuture<'_> {
    Box::pin(async move {
        let login = context.fixtures().generate_login();
        let response = context
            .client()
            .request(RequestSpec::post("/users").json(&login)?)
            .await?;
        response
            .then()
            .status_code(201)?
            .body("email", Matcher::equals(login.email.as_str()))?
            .body("password", Matcher::equals(login.password.as_str()))?
            .body("id", Matcher::NotNull)?;
        Ok(())
    })
}

fn create_product_record(context: &mut ScenarioContext) -> ScenarioFuture<'_> {
    Box::pin(async move {
        let product = context.fixtures().generate_product();
        let response = context
            .client()
            .request(RequestSpec::post("/posts").json(&product)?)
            .await?;
        response
            .then()
            .status_code(201)?
            .body("name", Matcher::equals(product.name.as_str()))?
            .body("price", Matcher::equals(product.price.as_str()))?
            .body("department", Matcher::equals(product.department.as_str()))?
            .body("id", Matcher::NotNull)?;
        Ok(())
    })
}

fn data_variation(context: &mut ScenarioContext) -> ScenarioFuture<'_> {
    Box::pin(async move {
        for variant in Variant::ALL {
            let user = variant.build(context.fixtures());
            info!(variant = variant.label(), name = %user.name, "posting user variant");
            let response = context
                .client()
                .request(RequestSpec::post("/users").json(&user)?)
                .await?;
            response
                .then()
                .status_code(201)?
                .body("name", Matcher::NotEmpty)?
                .body("id", Matcher::NotNull)?;
        }
        Ok(())
    })
}
