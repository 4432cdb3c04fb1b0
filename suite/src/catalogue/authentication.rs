//! Access checks.
//!
//! JSONPlaceholder has no authentication, so most of these are mock checks
//! against ordinary endpoints. The secondary checks exercise the API-key
//! target and always return to the primary target afterwards. The
//! availability check always runs and tolerates a refusing service; the
//! login checks depend on the service's demo credentials and only run when
//! the secondary target is enabled.

use serde_json::json;

use crate::assertion::Matcher;
use crate::client::RequestSpec;
use crate::config::{INVALID_EMAIL, VALID_EMAIL, VALID_PASSWORD};
use crate::scenario::{Scenario, ScenarioContext, ScenarioFuture};

const SUITE: &str = "authentication";

const POST_WITHOUT_AUTH_BODY: &str = r#"{
    "title": "Test Post",
    "body": "This is a test post without authentication",
    "userId": 1
}"#;

pub(super) fn scenarios() -> Vec<Scenario> {
    vec![
        Scenario::new(SUITE, "mock_login", mock_login),
        Scenario::new(SUITE, "unknown_endpoint", unknown_endpoint),
        Scenario::new(SUITE, "create_post_without_auth", create_post_without_auth),
        Scenario::new(SUITE, "incomplete_post_body", incomplete_post_body),
        Scenario::new(SUITE, "secondary_target_probe", secondary_target_probe),
        Scenario::new(
            SUITE,
            "secondary_login_with_valid_credentials",
            secondary_login_with_valid_credentials,
        )
        .requiring_secondary(),
        Scenario::new(
            SUITE,
            "secondary_login_with_unknown_email",
            secondary_login_with_unknown_email,
        )
        .requiring_secondary(),
        Scenario::new(SUITE, "response_headers", response_headers),
    ]
}

fn mock_login(context: &mut ScenarioContext) -> ScenarioFuture<'_> {
    Box::pin(async move {
        let response = context.client().request(RequestSpec::get("/users/1")).await?;
        response
            .then()
            .status_code(200)?
            .content_type_json()?
            .body("id", Matcher::equals(1))?
            .body("name", Matcher::NotEmpty)?
            .body("email", Matcher::NotEmpty)?;
        Ok(())
    })
}

fn unknown_endpoint(context: &mut ScenarioContext) -> ScenarioFuture<'_> {
    Box::pin(async move {
        let response = context
            .client()
            .request(RequestSpec::get("/nonexistent-endpoint"))
            .await?;
        response.then().status_code(404)?;
        Ok(())
    })
}

fn create_post_without_auth(context: &mut ScenarioContext) -> ScenarioFuture<'_> {
    Box::pin(async move {
        let request = RequestSpec::post("/posts").raw_body(POST_WITHOUT_AUTH_BODY);
        let response = context.client().request(request).await?;
        response
            .then()
            .status_code(201)?
            .body("title", Matcher::equals("Test Post"))?
            .body("body", Matcher::contains("test post"))?
            .body("userId", Matcher::equals(1))?
            .body("id", Matcher::NotNull)?;
        Ok(())
    })
}

fn incomplete_post_body(context: &mut ScenarioContext) -> ScenarioFuture<'_> {
    Box::pin(async move {
        let request = RequestSpec::post("/posts").raw_body(r#"{"invalid": "data"}"#);
        let response = context.client().request(request).await?;
        response
            .then()
            .status_code(201)?
            .body("id", Matcher::NotNull)?;
        Ok(())
    })
}

fn secondary_target_probe(context: &mut ScenarioContext) -> ScenarioFuture<'_> {
    Box::pin(async move {
        let scope = context.client_mut().secondary_scope()?;
        let response = scope.request(RequestSpec::get("/users")).await?;
        response.then().status_in(&[200, 403, 404])?;
        Ok(())
    })
}

fn secondary_login_with_valid_credentials(context: &mut ScenarioContext) -> ScenarioFuture<'_> {
    Box::pin(async move {
        let login = json!({ "email": VALID_EMAIL, "password": VALID_PASSWORD });
        let scope = context.client_mut().secondary_scope()?;
        let response = scope
            .request(RequestSpec::post("/login").json(&login)?)
            .await?;
        let check = response.then().status_in(&[200, 401, 403])?;
        if response.status() == 200 {
            check.body("token", Matcher::NotEmpty)?;
        }
        Ok(())
    })
}

fn secondary_login_with_unknown_email(context: &mut ScenarioContext) -> ScenarioFuture<'_> {
    Box::pin(async move {
        let login = json!({ "email": INVALID_EMAIL, "password": VALID_PASSWORD });
        let scope = context.client_mut().secondary_scope()?;
        let response = scope
            .request(RequestSpec::post("/login").json(&login)?)
            .await?;
        response.then().status_in(&[400, 401, 403])?;
        Ok(())
    })
}

fn response_headers(context: &mut ScenarioContext) -> ScenarioFuture<'_> {
    Box::pin(async move {
        let response = context.client().request(RequestSpec::get("/users/1")).await?;
        response
            .then()
            .status_code(200)?
            .header("Content-Type", Matcher::contains("application/json"))?
            .header("Server", Matcher::NotEmpty)?
            .header("Cache-Control", Matcher::NotEmpty)?;
        Ok(())
    })
}
