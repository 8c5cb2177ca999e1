use super::*;
use crate::auth::models::{ActionCodeSettings, AndroidSettings, IosSettings};
use crate::core::clock::FrozenClock;
use crate::core::keys::PublicKeyManager;
use crate::testing::{self, CLIENT_EMAIL, KID, NOW, PROJECT_ID};
use httpmock::prelude::*;
use httpmock::Mock;
use reqwest::Client;
use reqwest_middleware::ClientBuilder;
use serde_json::json;

fn auth(server: &MockServer) -> FirebaseAuth {
    let client = ClientBuilder::new(Client::new()).build();

    FirebaseAuth::new_with_client(
        client,
        &AuthConfig::new(PROJECT_ID),
        &server.base_url(),
        CLIENT_EMAIL,
        Arc::new(LocalKeySigner::new(testing::private_key())),
        Arc::new(FrozenClock::at_timestamp(NOW)),
    )
    .with_key_managers(
        PublicKeyManager::new(server.url("/id-token-keys")),
        PublicKeyManager::new(server.url("/session-cookie-keys")),
    )
}

fn serve_keys<'a>(server: &'a MockServer, path: &str) -> Mock<'a> {
    let path = path.to_string();
    server.mock(move |when, then| {
        when.method(GET).path(path);
        then.status(200)
            .header("content-type", "application/json")
            .header("cache-control", "public, max-age=21600")
            .json_body(testing::jwks(&[KID]));
    })
}

fn lookup<'a>(server: &'a MockServer, uid: &str, user: Value) -> Mock<'a> {
    let uid = uid.to_string();
    server.mock(move |when, then| {
        when.method(POST)
            .path("/v1/projects/test-project/accounts:lookup")
            .json_body(json!({ "localId": [uid] }));
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({ "users": [user] }));
    })
}

#[tokio::test]
async fn test_generate_password_reset_link() {
    let server = MockServer::start();
    let auth = auth(&server);

    let email = "test@example.com";
    let settings = ActionCodeSettings {
        url: "https://www.example.com/finishSignUp".to_string(),
        handle_code_in_app: Some(true),
        ios: Some(IosSettings {
            bundle_id: "com.example.ios".to_string(),
        }),
        android: Some(AndroidSettings {
            package_name: "com.example.android".to_string(),
            install_app: Some(true),
            minimum_version: Some("12".to_string()),
        }),
        dynamic_link_domain: Some("example.page.link".to_string()),
    };

    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/projects/test-project/accounts:sendOobCode")
            .header("content-type", "application/json")
            .json_body(json!({
                "requestType": "PASSWORD_RESET",
                "email": email,
                "returnOobLink": true,
                "continueUrl": "https://www.example.com/finishSignUp",
                "canHandleCodeInApp": true,
                "dynamicLinkDomain": "example.page.link",
                "iOSBundleId": "com.example.ios",
                "androidPackageName": "com.example.android",
                "androidInstallApp": true,
                "androidMinimumVersion": "12"
            }));
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({
                "email": email,
                "oobLink": "https://example.com/action?mode=resetPassword&oobCode=code"
            }));
    });

    let link = auth.generate_password_reset_link(email, Some(settings)).await.unwrap();
    assert_eq!(link, "https://example.com/action?mode=resetPassword&oobCode=code");

    mock.assert();
}

#[tokio::test]
async fn test_email_verification_link_with_locale() {
    let server = MockServer::start();
    let auth = auth(&server);

    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/projects/test-project/accounts:sendOobCode")
            .header("x-firebase-locale", "de")
            .json_body(json!({
                "requestType": "VERIFY_EMAIL",
                "email": "test@example.com",
                "returnOobLink": true
            }));
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({
                "email": "test@example.com",
                "oobLink": "https://example.com/action?mode=verifyEmail&oobCode=code"
            }));
    });

    let link = auth
        .get_email_action_link(EmailActionType::VerifyEmail, "test@example.com", None, Some("de"))
        .await
        .unwrap();
    assert_eq!(link, "https://example.com/action?mode=verifyEmail&oobCode=code");

    mock.assert();
}

#[tokio::test]
async fn test_action_link_failure_is_reported_as_such() {
    let server = MockServer::start();
    let auth = auth(&server);

    server.mock(|when, then| {
        when.method(POST).path("/v1/projects/test-project/accounts:sendOobCode");
        then.status(400)
            .header("content-type", "application/json")
            .json_body(json!({"error": {"code": 400, "message": "EMAIL_NOT_FOUND"}}));
    });

    let result = auth.generate_sign_in_with_email_link("nobody@example.com", None).await;
    assert!(matches!(result, Err(AuthError::FailedToCreateActionLink(message)) if message.contains("EMAIL_NOT_FOUND")));

    let result = auth.generate_sign_in_with_email_link("not-an-email", None).await;
    assert!(matches!(result, Err(AuthError::FailedToCreateActionLink(_))));
}

#[tokio::test]
async fn test_send_email_verification_link_signs_in_as_the_user() {
    let server = MockServer::start();
    let auth = auth(&server);

    let by_email = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/projects/test-project/accounts:lookup")
            .json_body(json!({ "email": ["test@example.com"] }));
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({ "users": [{ "localId": "u1", "email": "test@example.com" }] }));
    });
    let sign_in = server.mock(|when, then| {
        when.method(POST).path("/v1/accounts:signInWithCustomToken");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({ "idToken": "user-id-token", "refreshToken": "r", "expiresIn": "3600" }));
    });
    let send = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/projects/test-project/accounts:sendOobCode")
            .json_body(json!({
                "requestType": "VERIFY_EMAIL",
                "email": "test@example.com",
                "idToken": "user-id-token"
            }));
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({ "email": "test@example.com" }));
    });

    auth.send_email_verification_link("test@example.com", None, None)
        .await
        .unwrap();

    by_email.assert();
    sign_in.assert();
    send.assert();
}

#[tokio::test]
async fn test_create_user_fetches_the_new_record() {
    let server = MockServer::start();
    let auth = auth(&server);

    let create = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/projects/test-project/accounts")
            .json_body(json!({ "email": "new@example.com", "password": "secret123" }));
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({ "localId": "new-user" }));
    });
    let fetch = lookup(&server, "new-user", json!({ "localId": "new-user", "email": "new@example.com" }));

    let user = auth
        .create_user_with_email_and_password("new@example.com", "secret123")
        .await
        .unwrap();

    assert_eq!(user.uid(), "new-user");
    assert_eq!(user.email.as_deref(), Some("new@example.com"));
    create.assert();
    fetch.assert();
}

#[tokio::test]
async fn test_short_password_is_rejected_locally() {
    let server = MockServer::start();
    let auth = auth(&server);

    let result = auth.create_user_with_email_and_password("new@example.com", "abc").await;
    assert!(matches!(result, Err(AuthError::InvalidArgument(_))));
}

#[tokio::test]
async fn test_existing_email_is_classified() {
    let server = MockServer::start();
    let auth = auth(&server);

    server.mock(|when, then| {
        when.method(POST).path("/v1/projects/test-project/accounts");
        then.status(400)
            .header("content-type", "application/json")
            .json_body(json!({"error": {"code": 400, "message": "EMAIL_EXISTS"}}));
    });

    let error = auth
        .create_user(CreateUserRequest {
            email: Some("taken@example.com".to_string()),
            ..Default::default()
        })
        .await
        .unwrap_err();

    assert_eq!(error.kind(), Some(AuthErrorKind::EmailExists));
    assert_eq!(error.status(), Some(400));
}

#[tokio::test]
async fn test_disable_user() {
    let server = MockServer::start();
    let auth = auth(&server);

    let update = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/projects/test-project/accounts:update")
            .json_body(json!({ "localId": "u1", "disableUser": true }));
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({ "localId": "u1" }));
    });
    lookup(&server, "u1", json!({ "localId": "u1", "disabled": true }));

    let user = auth.disable_user("u1").await.unwrap();
    assert!(user.disabled);
    update.assert();
}

#[tokio::test]
async fn test_get_user_not_found() {
    let server = MockServer::start();
    let auth = auth(&server);

    server.mock(|when, then| {
        when.method(POST).path("/v1/projects/test-project/accounts:lookup");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({}));
    });

    let error = auth.get_user("ghost").await.unwrap_err();
    assert_eq!(error.kind(), Some(AuthErrorKind::UserNotFound));
}

#[tokio::test]
async fn test_get_users_marks_missing_users() {
    let server = MockServer::start();
    let auth = auth(&server);

    server.mock(|when, then| {
        when.method(POST)
            .path("/v1/projects/test-project/accounts:lookup")
            .json_body(json!({ "localId": ["a", "b"] }));
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({ "users": [{ "localId": "b" }] }));
    });

    let users = auth.get_users(&["a", "b"]).await.unwrap();
    assert_eq!(users.len(), 2);
    assert!(users["a"].is_none());
    assert_eq!(users["b"].as_ref().map(|u| u.uid()), Some("b"));
}

#[tokio::test]
async fn test_list_users() {
    let server = MockServer::start();
    let auth = auth(&server);

    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/v1/projects/test-project/accounts:batchGet")
            .query_param("maxResults", "2")
            .query_param("nextPageToken", "page-1");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({
                "users": [{ "localId": "a" }, { "localId": "b" }],
                "nextPageToken": "page-2"
            }));
    });

    let page = auth.list_users(2, Some("page-1")).await.unwrap();
    assert_eq!(page.users.unwrap().len(), 2);
    assert_eq!(page.next_page_token.as_deref(), Some("page-2"));
    mock.assert();
}

#[tokio::test]
async fn test_delete_unknown_user() {
    let server = MockServer::start();
    let auth = auth(&server);

    server.mock(|when, then| {
        when.method(POST)
            .path("/v1/projects/test-project/accounts:delete")
            .json_body(json!({ "localId": "ghost" }));
        then.status(400)
            .header("content-type", "application/json")
            .json_body(json!({"error": {"code": 400, "message": "USER_NOT_FOUND"}}));
    });

    let error = auth.delete_user("ghost").await.unwrap_err();
    assert_eq!(error.kind(), Some(AuthErrorKind::UserNotFound));
    assert!(error.to_string().contains("ghost"));
}

#[tokio::test]
async fn test_delete_users_reports_partial_failures() {
    let server = MockServer::start();
    let auth = auth(&server);

    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/projects/test-project/accounts:batchDelete")
            .json_body(json!({ "localIds": ["a", "b", "c"], "force": false }));
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({
                "errors": [{ "index": 1, "localId": "b", "message": "NOT_DISABLED : Disable the account before batch deletion." }]
            }));
    });

    let result = auth.delete_users(&["a", "b", "c"], false).await.unwrap();
    assert_eq!(result.success_count, 2);
    assert_eq!(result.failure_count, 1);
    assert_eq!(result.raw_errors[0].local_id, "b");
    mock.assert();
}

#[tokio::test]
async fn test_delete_users_rejects_oversized_batches() {
    let server = MockServer::start();
    let auth = auth(&server);

    let uids: Vec<String> = (0..1001).map(|i| format!("user-{}", i)).collect();
    let uids: Vec<&str> = uids.iter().map(String::as_str).collect();

    let result = auth.delete_users(&uids, true).await;
    assert!(matches!(result, Err(AuthError::InvalidArgument(_))));
}

#[tokio::test]
async fn test_set_custom_user_claims() {
    let server = MockServer::start();
    let auth = auth(&server);

    let set = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/projects/test-project/accounts:update")
            .json_body(json!({ "localId": "u1", "customAttributes": "{\"admin\":true}" }));
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({ "localId": "u1" }));
    });
    let clear = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/projects/test-project/accounts:update")
            .json_body(json!({ "localId": "u1", "customAttributes": "{}" }));
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({ "localId": "u1" }));
    });

    let mut claims = Map::new();
    claims.insert("admin".to_string(), json!(true));
    auth.set_custom_user_claims("u1", Some(claims)).await.unwrap();
    auth.set_custom_user_claims("u1", None).await.unwrap();

    set.assert();
    clear.assert();
}

#[tokio::test]
async fn test_revoke_refresh_tokens_uses_the_clock() {
    let server = MockServer::start();
    let auth = auth(&server);

    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/projects/test-project/accounts:update")
            .json_body(json!({ "localId": "u1", "validSince": NOW.to_string() }));
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({ "localId": "u1" }));
    });

    auth.revoke_refresh_tokens("u1").await.unwrap();
    mock.assert();
}

#[tokio::test]
async fn test_confirm_password_reset_can_invalidate_sessions() {
    let server = MockServer::start();
    let auth = auth(&server);

    let reset = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/accounts:resetPassword")
            .json_body(json!({ "oobCode": "code", "newPassword": "new-secret", "targetProjectId": "test-project" }));
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({ "email": "test@example.com", "requestType": "PASSWORD_RESET" }));
    });
    server.mock(|when, then| {
        when.method(POST)
            .path("/v1/projects/test-project/accounts:lookup")
            .json_body(json!({ "email": ["test@example.com"] }));
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({ "users": [{ "localId": "u1", "email": "test@example.com" }] }));
    });
    let revoke = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/projects/test-project/accounts:update")
            .json_body(json!({ "localId": "u1", "validSince": NOW.to_string() }));
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({ "localId": "u1" }));
    });

    let email = auth.confirm_password_reset("code", "new-secret", true).await.unwrap();
    assert_eq!(email, "test@example.com");
    reset.assert();
    revoke.assert();
}

#[tokio::test]
async fn test_create_custom_token() {
    let server = MockServer::start();
    let auth = auth(&server);

    let token = auth.create_custom_token("alice", Map::new(), 1800).await.unwrap();
    let claims: CustomTokenClaims = token.claims().unwrap();

    assert_eq!(claims.uid, "alice");
    assert_eq!(claims.iss, CLIENT_EMAIL);
    assert_eq!(claims.exp - claims.iat, 1800);

    let result = auth.create_custom_token("alice", Map::new(), 3601).await;
    assert!(matches!(result, Err(AuthError::InvalidArgument(_))));
}

#[tokio::test]
async fn test_parse_token_does_not_verify() {
    let server = MockServer::start();
    let auth = auth(&server);

    // Expired and signed with an unpublished key, yet still parseable.
    let mut claims = testing::id_token_claims("alice");
    claims["exp"] = json!(NOW - 3600);
    let token = testing::sign_with(&claims, Some(KID), &testing::other_signing_key());

    let parsed = auth.parse_token(&token).unwrap();
    let parsed_claims: Map<String, Value> = parsed.claims().unwrap();
    assert_eq!(parsed_claims["sub"], "alice");
    assert_eq!(parsed.header().unwrap().kid.as_deref(), Some(KID));

    for invalid in ["", "a.b", "not.a.token"] {
        let result = auth.parse_token(invalid);
        assert!(
            matches!(&result, Err(AuthError::InvalidArgument(message)) if message.starts_with("The given token could not be parsed")),
            "{}",
            invalid
        );
    }
}

#[tokio::test]
async fn test_verify_id_token() {
    let server = MockServer::start();
    let keys = serve_keys(&server, "/id-token-keys");
    let auth = auth(&server);

    let token = testing::sign_token(&testing::id_token_claims("alice"));
    let claims = auth.verify_id_token(&token, false, None).await.unwrap();

    assert_eq!(claims.uid(), "alice");
    keys.assert();
}

#[tokio::test]
async fn test_verify_id_token_detects_revocation() {
    let server = MockServer::start();
    serve_keys(&server, "/id-token-keys");
    let auth = auth(&server);

    // Tokens were revoked after the user authenticated.
    lookup(&server, "alice", json!({ "localId": "alice", "validSince": NOW.to_string() }));

    let token = testing::sign_token(&testing::id_token_claims("alice"));
    let result = auth.verify_id_token(&token, true, None).await;
    assert!(matches!(result, Err(AuthError::RevokedIdToken)));
}

#[tokio::test]
async fn test_verify_id_token_before_revocation_is_accepted() {
    let server = MockServer::start();
    serve_keys(&server, "/id-token-keys");
    let auth = auth(&server);

    lookup(&server, "alice", json!({ "localId": "alice", "validSince": (NOW - 3600).to_string() }));

    let token = testing::sign_token(&testing::id_token_claims("alice"));
    assert!(auth.verify_id_token(&token, true, None).await.is_ok());
}

#[tokio::test]
async fn test_revocation_with_extreme_auth_time_and_leeway() {
    let server = MockServer::start();
    serve_keys(&server, "/id-token-keys");
    let auth = auth(&server);

    lookup(&server, "alice", json!({ "localId": "alice", "validSince": NOW.to_string() }));

    let mut claims = testing::id_token_claims("alice");
    claims["auth_time"] = json!(i64::MIN);
    let token = testing::sign_token(&claims);

    let result = auth.verify_id_token(&token, true, Some(30)).await;
    assert!(matches!(result, Err(AuthError::RevokedIdToken)));
}

#[tokio::test]
async fn test_user_without_valid_since_is_not_revoked() {
    let server = MockServer::start();
    serve_keys(&server, "/id-token-keys");
    let auth = auth(&server);

    lookup(&server, "alice", json!({ "localId": "alice" }));

    let token = testing::sign_token(&testing::id_token_claims("alice"));
    assert!(auth.verify_id_token(&token, true, None).await.is_ok());
}

#[tokio::test]
async fn test_revocation_check_for_deleted_user_fails_verification() {
    let server = MockServer::start();
    serve_keys(&server, "/id-token-keys");
    let auth = auth(&server);

    server.mock(|when, then| {
        when.method(POST).path("/v1/projects/test-project/accounts:lookup");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({}));
    });

    let token = testing::sign_token(&testing::id_token_claims("alice"));
    let result = auth.verify_id_token(&token, true, None).await;
    assert!(matches!(
        result,
        Err(AuthError::FailedToVerifyToken(TokenVerificationError::UserLookupFailed(_)))
    ));
}

#[tokio::test]
async fn test_verify_session_cookie() {
    let server = MockServer::start();
    let keys = serve_keys(&server, "/session-cookie-keys");
    let auth = auth(&server);

    let mut claims = testing::id_token_claims("alice");
    claims["iss"] = json!(format!("https://session.firebase.google.com/{}", PROJECT_ID));
    let cookie = testing::sign_token(&claims);

    let verified = auth.verify_session_cookie(&cookie, false, None).await.unwrap();
    assert_eq!(verified.uid(), "alice");
    keys.assert();

    // An ID token is not a session cookie.
    let id_token = testing::sign_token(&testing::id_token_claims("alice"));
    let result = auth.verify_session_cookie(&id_token, false, None).await;
    assert!(matches!(
        result,
        Err(AuthError::FailedToVerifySessionCookie(TokenVerificationError::InvalidIssuer(_)))
    ));
}

#[tokio::test]
async fn test_create_session_cookie() {
    let server = MockServer::start();
    let auth = auth(&server);

    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/projects/test-project:createSessionCookie")
            .json_body(json!({ "idToken": "id-token", "validDuration": 3600 }));
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({ "sessionCookie": "cookie" }));
    });

    let cookie = auth.create_session_cookie("id-token", 3600).await.unwrap();
    assert_eq!(cookie, "cookie");
    mock.assert();
}

#[tokio::test]
async fn test_session_cookie_ttl_is_validated_before_any_request() {
    let server = MockServer::start();
    let auth = auth(&server);

    let mock = server.mock(|when, then| {
        when.path("/v1/projects/test-project:createSessionCookie");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({ "sessionCookie": "cookie" }));
    });

    for ttl in [MIN_SESSION_COOKIE_TTL - 1, MAX_SESSION_COOKIE_TTL + 1] {
        let result = auth.create_session_cookie("id-token", ttl).await;
        assert!(matches!(result, Err(AuthError::InvalidArgument(_))), "{}", ttl);
    }

    mock.assert_calls(0);
}

#[tokio::test]
async fn test_sign_in_with_custom_token() {
    let server = MockServer::start();
    let auth = auth(&server);

    let id_token = testing::sign_token(&testing::id_token_claims("alice"));
    let response = json!({ "idToken": id_token, "refreshToken": "refresh", "expiresIn": "3600" });
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/accounts:signInWithCustomToken")
            .json_body(json!({
                "token": "custom-token",
                "returnSecureToken": true,
                "targetProjectId": "test-project"
            }));
        then.status(200)
            .header("content-type", "application/json")
            .json_body(response);
    });

    let result = auth.sign_in_with_custom_token("custom-token").await.unwrap();
    assert_eq!(result.refresh_token.as_deref(), Some("refresh"));
    assert_eq!(result.ttl, Some(3600));
    assert_eq!(result.firebase_user_id().as_deref(), Some("alice"));
    mock.assert();
}

#[tokio::test]
async fn test_sign_in_with_refresh_token() {
    let server = MockServer::start();
    let auth = auth(&server);

    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/token")
            .header("content-type", "application/x-www-form-urlencoded")
            .body("grant_type=refresh_token&refresh_token=refresh");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({
                "id_token": "new-id-token",
                "refresh_token": "new-refresh",
                "expires_in": "3600",
                "user_id": "alice"
            }));
    });

    let result = auth.sign_in_with_refresh_token("refresh").await.unwrap();
    assert_eq!(result.id_token.as_deref(), Some("new-id-token"));
    assert_eq!(result.firebase_user_id().as_deref(), Some("alice"));
    mock.assert();
}

#[tokio::test]
async fn test_anonymous_sign_in_falls_back_to_custom_token() {
    let server = MockServer::start();
    let auth = auth(&server);

    let sign_up = server.mock(|when, then| {
        when.method(POST).path("/v1/accounts:signUp");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({ "localId": "anonymous-user" }));
    });
    let exchange = server.mock(|when, then| {
        when.method(POST).path("/v1/accounts:signInWithCustomToken");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({ "idToken": "anonymous-id-token", "refreshToken": "r", "expiresIn": "3600" }));
    });

    let result = auth.sign_in_anonymously().await.unwrap();
    assert_eq!(result.id_token.as_deref(), Some("anonymous-id-token"));
    sign_up.assert();
    exchange.assert();
}

#[tokio::test]
async fn test_sign_in_failure() {
    let server = MockServer::start();
    let auth = auth(&server);

    server.mock(|when, then| {
        when.method(POST).path("/v1/accounts:signInWithPassword");
        then.status(400)
            .header("content-type", "application/json")
            .json_body(json!({"error": {"code": 400, "message": "INVALID_PASSWORD"}}));
    });

    let result = auth.sign_in_with_email_and_password("test@example.com", "wrong-password").await;
    assert!(matches!(result, Err(AuthError::FailedToSignIn(message)) if message.contains("INVALID_PASSWORD")));
}

#[tokio::test]
async fn test_tenant_scoped_requests() {
    let server = MockServer::start();
    let auth = auth(&server).for_tenant("tenant-1");

    assert_eq!(auth.tenant_id(), Some("tenant-1"));

    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/projects/test-project/tenants/tenant-1/accounts:lookup")
            .json_body(json!({ "localId": ["u1"] }));
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({ "users": [{ "localId": "u1", "tenantId": "tenant-1" }] }));
    });

    let user = auth.get_user("u1").await.unwrap();
    assert_eq!(user.tenant_id.as_deref(), Some("tenant-1"));
    mock.assert();

    let token = auth.create_custom_token("u1", Map::new(), 600).await.unwrap();
    let claims: CustomTokenClaims = token.claims().unwrap();
    assert_eq!(claims.tenant_id.as_deref(), Some("tenant-1"));
}

#[tokio::test]
async fn test_tenant_token_is_rejected_by_other_tenant() {
    let server = MockServer::start();
    serve_keys(&server, "/id-token-keys");
    let auth = auth(&server).for_tenant("tenant-1");

    let mut claims = testing::id_token_claims("alice");
    claims["firebase"]["tenant"] = json!("tenant-2");
    let token = testing::sign_token(&claims);

    let result = auth.verify_id_token(&token, false, None).await;
    assert!(matches!(
        result,
        Err(AuthError::FailedToVerifyToken(TokenVerificationError::TenantMismatch { .. }))
    ));
}
