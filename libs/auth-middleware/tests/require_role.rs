use actix_web::{test, web, App, HttpResponse};
use auth_middleware::{generate_jwt, RequireRole, UserData};
use serde_json::Value;

const SECRET: &str = "integration-secret";

async fn whoami(user: UserData) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "user_id": user.user_id,
        "role": user.role,
    }))
}

#[actix_rt::test]
async fn missing_header_is_unauthorized() {
    let app = test::init_service(
        App::new()
            .wrap(RequireRole::new(SECRET, false, &["admin"]))
            .route("/admin", web::get().to(whoami)),
    )
    .await;

    let req = test::TestRequest::get().uri("/admin").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["title"], "Unauthorized");
    assert_eq!(body["type"], "about:blank");
    assert_eq!(body["instance"], "/admin");
}

#[actix_rt::test]
async fn non_bearer_scheme_is_unauthorized() {
    let app = test::init_service(
        App::new()
            .wrap(RequireRole::new(SECRET, false, &["admin"]))
            .route("/admin", web::get().to(whoami)),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/admin")
        .insert_header(("Authorization", "Basic dXNlcjpwYXNz"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);
}

#[actix_rt::test]
async fn forged_token_is_unauthorized() {
    let app = test::init_service(
        App::new()
            .wrap(RequireRole::new(SECRET, false, &["admin"]))
            .route("/admin", web::get().to(whoami)),
    )
    .await;

    let token = generate_jwt("1", "admin", "a@b.c", "A", "some-other-secret").unwrap();
    let req = test::TestRequest::get()
        .uri("/admin")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);
}

#[actix_rt::test]
async fn expired_token_is_unauthorized_even_with_matching_role() {
    let app = test::init_service(
        App::new()
            .wrap(RequireRole::new(SECRET, false, &["admin"]))
            .route("/admin", web::get().to(whoami)),
    )
    .await;

    // Minted directly so the expiry can sit well past the validation leeway.
    let claims = serde_json::json!({
        "user_id": "1",
        "role": "admin",
        "email": "a@b.c",
        "user_name": "A",
        "exp": chrono::Utc::now().timestamp() - 7200,
    });
    let token = jsonwebtoken::encode(
        &jsonwebtoken::Header::new(jsonwebtoken::Algorithm::HS256),
        &claims,
        &jsonwebtoken::EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap();

    let req = test::TestRequest::get()
        .uri("/admin")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["detail"], "Token expired");
}

#[actix_rt::test]
async fn allowed_role_passes_and_claims_reach_handler() {
    let app = test::init_service(
        App::new()
            .wrap(RequireRole::new(SECRET, false, &["admin", "teacher"]))
            .route("/admin", web::get().to(whoami)),
    )
    .await;

    let token = generate_jwt("7", "teacher", "ana@classconnect.io", "Ana", SECRET).unwrap();
    let req = test::TestRequest::get()
        .uri("/admin")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["user_id"], "7");
    assert_eq!(body["role"], "teacher");
}

#[actix_rt::test]
async fn disallowed_role_is_forbidden() {
    let app = test::init_service(
        App::new()
            .wrap(RequireRole::new(SECRET, false, &["admin"]))
            .route("/admin", web::get().to(whoami)),
    )
    .await;

    let token = generate_jwt("7", "user", "u@b.c", "U", SECRET).unwrap();
    let req = test::TestRequest::get()
        .uri("/admin")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 403);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["title"], "Forbidden");
}

// The id check reads matched path parameters, so the middleware wraps the
// resource declaring `{id_user}` rather than the whole app.
#[actix_rt::test]
async fn id_match_passes() {
    let app = test::init_service(
        App::new().service(
            web::resource("/users/{id_user}")
                .wrap(RequireRole::new(SECRET, true, &["user"]))
                .route(web::get().to(whoami)),
        ),
    )
    .await;

    let token = generate_jwt("42", "user", "u@b.c", "U", SECRET).unwrap();
    let req = test::TestRequest::get()
        .uri("/users/42")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
}

#[actix_rt::test]
async fn id_mismatch_is_forbidden() {
    let app = test::init_service(
        App::new().service(
            web::resource("/users/{id_user}")
                .wrap(RequireRole::new(SECRET, true, &["user"]))
                .route(web::get().to(whoami)),
        ),
    )
    .await;

    let token = generate_jwt("42", "user", "u@b.c", "U", SECRET).unwrap();
    let req = test::TestRequest::get()
        .uri("/users/43")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 403);
}

#[actix_rt::test]
async fn id_required_without_path_segment_is_forbidden() {
    let app = test::init_service(
        App::new().service(
            web::resource("/profile")
                .wrap(RequireRole::new(SECRET, true, &["user"]))
                .route(web::get().to(whoami)),
        ),
    )
    .await;

    let token = generate_jwt("42", "user", "u@b.c", "U", SECRET).unwrap();
    let req = test::TestRequest::get()
        .uri("/profile")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 403);
}
