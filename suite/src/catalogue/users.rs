//! CRUD checks on the `/users` resource.

use crate::assertion::Matcher;
use crate::client::RequestSpec;
use crate::scenario::{Scenario, ScenarioContext, ScenarioFuture};

const SUITE: &str = "users";

const CREATE_USER_BODY: &str = r#"{
    "name": "John Doe",
    "username": "johndoe",
    "email": "john.doe@example.com",
    "address": {
        "street": "123 Main St",
        "city": "Anytown"
    },
    "phone": "1-555-123-4567",
    "website": "johndoe.com",
    "company": {
        "name": "ABC Company",
        "catchPhrase": "Best company ever"
    }
}"#;

const UPDATE_USER_BODY: &str = r#"{
    "name": "John Updated",
    "username": "johnupdated",
    "email": "john.updated@example.com"
}"#;

pub(super) fn scenarios() -> Vec<Scenario> {
    vec![
        Scenario::new(SUITE, "list_users", list_users),
        Scenario::new(SUITE, "get_user_by_id", get_user_by_id),
        Scenario::new(SUITE, "get_unknown_user", get_unknown_user),
        Scenario::new(SUITE, "create_user", create_user),
        Scenario::new(SUITE, "update_user", update_user),
        Scenario::new(SUITE, "delete_user", delete_user),
    ]
}

fn list_users(context: &mut ScenarioContext) -> ScenarioFuture<'_> {
    Box::pin(async move {
        let response = context.client().request(RequestSpec::get("/users")).await?;
        response
            .then()
            .status_code(200)?
            .content_type_json()?
            .body("size()", Matcher::GreaterThan(0.0))?
            .body("[0].id", Matcher::NotNull)?
            .body("[0].name", Matcher::NotEmpty)?
            .body("[0].email", Matcher::NotEmpty)?
            .body("[0].username", Matcher::NotEmpty)?;
        Ok(())
    })
}

fn get_user_by_id(context: &mut ScenarioContext) -> ScenarioFuture<'_> {
    Box::pin(async move {
        let request = RequestSpec::get("/users/{id}").path_param("id", 1);
        let response = context.client().request(request).await?;
        response
            .then()
            .status_code(200)?
            .content_type_json()?
            .body("id", Matcher::equals(1))?
            .body("name", Matcher::equals("Leanne Graham"))?
            .body("email", Matcher::equals("Sincere@april.biz"))?
            .body("username", Matcher::equals("Bret"))?;
        Ok(())
    })
}

fn get_unknown_user(context: &mut ScenarioContext) -> ScenarioFuture<'_> {
    Box::pin(async move {
        let request = RequestSpec::get("/users/{id}").path_param("id", 999);
        let response = context.client().request(request).await?;
        response.then().status_code(404)?;
        Ok(())
    })
}

fn create_user(context: &mut ScenarioContext) -> ScenarioFuture<'_> {
    Box::pin(async move {
        let request = RequestSpec::post("/users").raw_body(CREATE_USER_BODY);
        let response = context.client().request(request).await?;
        response
            .then()
            .status_code(201)?
            .content_type_json()?
            .body("name", Matcher::equals("John Doe"))?
            .body("username", Matcher::equals("johndoe"))?
            .body("email", Matcher::equals("john.doe@example.com"))?
            .body("id", Matcher::NotNull)?;
        Ok(())
    })
}

fn update_user(context: &mut ScenarioContext) -> ScenarioFuture<'_> {
    Box::pin(async move {
        let request = RequestSpec::put("/users/{id}")
            .path_param("id", 1)
            .raw_body(UPDATE_USER_BODY);
        let response = context.client().request(request).await?;
        response
            .then()
            .status_code(200)?
            .content_type_json()?
            .body("name", Matcher::equals("John Updated"))?
            .body("username", Matcher::equals("johnupdated"))?
            .body("email", Matcher::equals("john.updated@example.com"))?
            .body("id", Matcher::equals(1))?;
        Ok(())
    })
}

fn delete_user(context: &mut ScenarioContext) -> ScenarioFuture<'_> {
    Box::pin(async move {
        let request = RequestSpec::delete("/users/{id}").path_param("id", 1);
        let response = context.client().request(request).await?;
        response.then().status_code(200)?;
        Ok(())
    })
}
