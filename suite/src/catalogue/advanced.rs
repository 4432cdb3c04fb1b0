//! Header, latency, data-driven, negative, and boundary checks.
//!
//! Nested posts are fetched through `GET /users/{id}/posts` rather than the
//! `GET /posts?userId=` filter, which `posts_filtered_by_user` already
//! covers; the nested route is the one otherwise left unexercised.

use serde_json::{Value, json};
use tracing::{info, warn};

use crate::assertion::Matcher;
use crate::client::RequestSpec;
use crate::scenario::{Scenario, ScenarioContext, ScenarioFuture};

const SUITE: &str = "advanced";

const GENERATED_USER_ROUNDS: usize = 2;
const LONG_NAME_LEN: usize = 500;

pub(super) fn scenarios() -> Vec<Scenario> {
    vec![
        Scenario::new(SUITE, "header_validation", header_validation),
        Scenario::new(SUITE, "response_time", response_time),
        Scenario::new(SUITE, "users_by_id[1]", user_by_id::<1>),
        Scenario::new(SUITE, "users_by_id[2]", user_by_id::<2>),
        Scenario::new(SUITE, "users_by_id[3]", user_by_id::<3>),
        Scenario::new(SUITE, "users_by_id[4]", user_by_id::<4>),
        Scenario::new(SUITE, "users_by_id[5]", user_by_id::<5>),
        Scenario::new(SUITE, "posts_filtered_by_user", posts_filtered_by_user),
        Scenario::new(SUITE, "create_user_from_map", create_user_from_map),
        Scenario::new(SUITE, "patch_user_partially", patch_user_partially),
        Scenario::new(SUITE, "generated_users_data_driven", generated_users_data_driven),
        Scenario::new(SUITE, "create_user_from_generated_json", create_user_from_generated_json),
        Scenario::new(SUITE, "create_user_with_empty_body", create_user_with_empty_body),
        Scenario::new(SUITE, "create_user_with_malformed_json", create_user_with_malformed_json),
        Scenario::new(SUITE, "get_user_with_non_numeric_id", get_user_with_non_numeric_id),
        Scenario::new(SUITE, "nested_posts_for_user", nested_posts_for_user),
        Scenario::new(SUITE, "create_user_with_null_name", create_user_with_null_name),
        Scenario::new(SUITE, "create_user_with_long_name", create_user_with_long_name),
    ]
}

fn header_validation(context: &mut ScenarioContext) -> ScenarioFuture<'_> {
    Box::pin(async move {
        let response = context.client().request(RequestSpec::get("/users/1")).await?;
        response
            .then()
            .status_code(200)?
            .content_type_json()?
            .header("Content-Type", Matcher::contains("application/json"))?
            .header("Server", Matcher::NotEmpty)?
            .header("X-Powered-By", Matcher::NotEmpty)?;
        Ok(())
    })
}

fn response_time(context: &mut ScenarioContext) -> ScenarioFuture<'_> {
    Box::pin(async move {
        let response = context.client().request(RequestSpec::get("/users")).await?;
        response
            .then()
            .status_code(200)?
            .time_below(context.settings().max_response_time())?;

        let acceptable = context.settings().acceptable_response_time();
        if response.elapsed() >= acceptable {
            warn!(
                elapsed_ms = u64::try_from(response.elapsed().as_millis()).unwrap_or(u64::MAX),
                acceptable_ms = u64::try_from(acceptable.as_millis()).unwrap_or(u64::MAX),
                "response slower than the acceptable threshold"
            );
        }
        Ok(())
    })
}

/// One data-driven case per seeded user id, each counted on its own.
fn user_by_id<const ID: u64>(context: &mut ScenarioContext) -> ScenarioFuture<'_> {
    Box::pin(async move {
        let request = RequestSpec::get("/users/{id}").path_param("id", ID);
        let response = context.client().request(request).await?;
        response
            .then()
            .status_code(200)?
            .body("id", Matcher::equals(ID))?
            .body("name", Matcher::NotEmpty)?
            .body("email", Matcher::NotEmpty)?
            .body("username", Matcher::NotEmpty)?;
        Ok(())
    })
}

fn posts_filtered_by_user(context: &mut ScenarioContext) -> ScenarioFuture<'_> {
    Box::pin(async move {
        let request = RequestSpec::get("/posts").query_param("userId", 1);
        let response = context.client().request(request).await?;
        response
            .then()
            .status_code(200)?
            .body("size()", Matcher::GreaterThan(0.0))?
            .body("[0].userId", Matcher::equals(1))?
            .body("[0].title", Matcher::NotEmpty)?
            .body("[0].body", Matcher::NotEmpty)?;
        Ok(())
    })
}

fn create_user_from_map(context: &mut ScenarioContext) -> ScenarioFuture<'_> {
    Box::pin(async move {
        let user = json!({
            "name": "Test User HashMap",
            "username": "testuser",
            "email": "test@example.com",
        });
        let response = context
            .client()
            .request(RequestSpec::post("/users").json(&user)?)
            .await?;
        response
            .then()
            .status_code(201)?
            .body("name", Matcher::equals("Test User HashMap"))?
            .body("username", Matcher::equals("testuser"))?
            .body("email", Matcher::equals("test@example.com"))?
            .body("id", Matcher::NotNull)?;
        Ok(())
    })
}

fn patch_user_partially(context: &mut ScenarioContext) -> ScenarioFuture<'_> {
    Box::pin(async move {
        let request = RequestSpec::patch("/users/{id}")
            .path_param("id", 1)
            .json(&json!({ "name": "Updated Name Only" }))?;
        let response = context.client().request(request).await?;
        response
            .then()
            .status_code(200)?
            .body("name", Matcher::equals("Updated Name Only"))?;
        Ok(())
    })
}

fn generated_users_data_driven(context: &mut ScenarioContext) -> ScenarioFuture<'_> {
    Box::pin(async move {
        for round in 1..=GENERATED_USER_ROUNDS {
            let user = context.fixtures().generate_user();
            info!(round, name = %user.name, "posting generated user");
            let response = context
                .client()
                .request(RequestSpec::post("/users").json(&user)?)
                .await?;
            response
                .then()
                .status_code(201)?
                .body("name", Matcher::equals(user.name.as_str()))?
                .body("id", Matcher::NotNull)?;
        }
        Ok(())
    })
}

fn create_user_from_generated_json(context: &mut ScenarioContext) -> ScenarioFuture<'_> {
    Box::pin(async move {
        let user_json = context.fixtures().generate_user_json()?;
        info!(body = %user_json, "posting generated user JSON");
        let response = context
            .client()
            .request(RequestSpec::post("/users").raw_body(user_json))
            .await?;
        response
            .then()
            .status_code(201)?
            .body("name", Matcher::NotEmpty)?
            .body("id", Matcher::NotNull)?;
        Ok(())
    })
}

fn create_user_with_empty_body(context: &mut ScenarioContext) -> ScenarioFuture<'_> {
    Box::pin(async move {
        let request = RequestSpec::post("/users").raw_body("{}");
        let response = context.client().request(request).await?;
        response.then().status_code(201)?;
        Ok(())
    })
}

fn create_user_with_malformed_json(context: &mut ScenarioContext) -> ScenarioFuture<'_> {
    Box::pin(async move {
        let request = RequestSpec::post("/users").raw_body("{invalid json}");
        let response = context.client().request(request).await?;
        response.then().status_code(500)?;
        Ok(())
    })
}

fn get_user_with_non_numeric_id(context: &mut ScenarioContext) -> ScenarioFuture<'_> {
    Box::pin(async move {
        let request = RequestSpec::get("/users/{id}").path_param("id", "invalid");
        let response = context.client().request(request).await?;
        response.then().status_code(404)?;
        Ok(())
    })
}

fn nested_posts_for_user(context: &mut ScenarioContext) -> ScenarioFuture<'_> {
    Box::pin(async move {
        let request = RequestSpec::get("/users/{id}/posts").path_param("id", 1);
        let response = context.client().request(request).await?;
        response
            .then()
            .status_code(200)?
            .body("size()", Matcher::GreaterThan(0.0))?
            .body("[0].userId", Matcher::equals(1))?
            .body("[0].title", Matcher::NotEmpty)?
            .body("[0].body", Matcher::NotEmpty)?;
        Ok(())
    })
}

fn create_user_with_null_name(context: &mut ScenarioContext) -> ScenarioFuture<'_> {
    Box::pin(async move {
        let user = json!({
            "name": Value::Null,
            "username": "testuser",
            "email": "test@example.com",
        });
        let response = context
            .client()
            .request(RequestSpec::post("/users").json(&user)?)
            .await?;
        response
            .then()
            .status_code(201)?
            .body("username", Matcher::equals("testuser"))?;
        Ok(())
    })
}

fn create_user_with_long_name(context: &mut ScenarioContext) -> ScenarioFuture<'_> {
    Box::pin(async move {
        let user = json!({
            "name": "a".repeat(LONG_NAME_LEN),
            "username": "longuser",
            "email": "long@example.com",
        });
        let response = context
            .client()
            .request(RequestSpec::post("/users").json(&user)?)
            .await?;
        response
            .then()
            .status_code(201)?
            .body("username", Matcher::equals("longuser"))?;
        Ok(())
    })
}
