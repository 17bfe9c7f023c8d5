use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, app_with, Envelope, ServiceState};
use tower::ServiceExt;

const AUTH: &str = "login=test_account&apiKey=test_key";

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn get(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

async fn call(router: axum::Router, uri: &str) -> Envelope {
    let resp = router.oneshot(get(uri)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    body_json(resp).await
}

// --- auth ---

#[tokio::test]
async fn wrong_api_key_is_invalid_login() {
    let env = call(
        app(),
        "/v3/shorten?login=rubbish&apiKey=wrong&longUrl=http%3A%2F%2Fgoogle.com",
    )
    .await;
    assert_eq!(env.status_code, 500);
    assert_eq!(env.status_txt, "INVALID_LOGIN");
}

#[tokio::test]
async fn missing_login_is_reported() {
    let env = call(app(), "/v3/validate?apiKey=test_key").await;
    assert_eq!(env.status_txt, "MISSING_ARG_LOGIN");
}

// --- shorten ---

#[tokio::test]
async fn shorten_returns_new_hash() {
    let env = call(
        app(),
        &format!("/v3/shorten?{AUTH}&longUrl=http%3A%2F%2Fbetaworks.com%2F"),
    )
    .await;
    assert_eq!(env.status_code, 200);
    assert_eq!(env.data["long_url"], "http://betaworks.com/");
    assert_eq!(env.data["new_hash"], 1);
    let hash = env.data["hash"].as_str().unwrap();
    assert_eq!(env.data["url"], format!("http://bit.ly/{hash}"));
}

#[tokio::test]
async fn shorten_rejects_relative_url() {
    let env = call(app(), &format!("/v3/shorten?{AUTH}&longUrl=betaworks")).await;
    assert_eq!(env.status_txt, "INVALID_URI");
}

#[tokio::test]
async fn shorten_requires_long_url() {
    let env = call(app(), &format!("/v3/shorten?{AUTH}")).await;
    assert_eq!(env.status_txt, "MISSING_ARG_LONGURL");
}

#[tokio::test]
async fn shorten_on_entitled_pro_domain() {
    let state = ServiceState::seeded().with_entitlement("test_account", "nyti.ms");
    let env = call(
        app_with(state),
        &format!("/v3/shorten?{AUTH}&longUrl=http%3A%2F%2Fnytimes.com%2F&domain=nyti.ms"),
    )
    .await;
    assert_eq!(env.status_code, 200);
    assert!(env.data["url"].as_str().unwrap().starts_with("http://nyti.ms/"));
}

#[tokio::test]
async fn shorten_with_wrong_x_api_key() {
    let env = call(
        app(),
        &format!(
            "/v3/shorten?{AUTH}&longUrl=http%3A%2F%2Fbetaworks.com%2F&x_login=other_account&x_apiKey=nope"
        ),
    )
    .await;
    assert_eq!(env.status_txt, "INVALID_X_APIKEY");
}

#[tokio::test]
async fn shorten_with_x_api_key_but_no_x_login() {
    let env = call(
        app(),
        &format!("/v3/shorten?{AUTH}&longUrl=http%3A%2F%2Fbetaworks.com%2F&x_apiKey=other_apiKey"),
    )
    .await;
    assert_eq!(env.status_code, 500);
    assert_eq!(env.status_txt, "INVALID_X_LOGIN");
}

// --- validate ---

#[tokio::test]
async fn validate_reports_flag() {
    let env = call(app(), &format!("/v3/validate?{AUTH}&x_login=correct&x_apiKey=well_done")).await;
    assert_eq!(env.data["valid"], 1);

    let env = call(app(), &format!("/v3/validate?{AUTH}&x_login=wrong&x_apiKey=so_very_wrong")).await;
    assert_eq!(env.status_code, 200);
    assert_eq!(env.data["valid"], 0);
}

// --- bitly_pro_domain ---

#[tokio::test]
async fn pro_domain_lookup() {
    let env = call(app(), &format!("/v3/bitly_pro_domain?{AUTH}&domain=nyti.ms")).await;
    assert_eq!(env.data["bitly_pro_domain"], true);

    let env = call(app(), &format!("/v3/bitly_pro_domain?{AUTH}&domain=philnash.co.uk")).await;
    assert_eq!(env.data["bitly_pro_domain"], false);

    let env = call(app(), &format!("/v3/bitly_pro_domain?{AUTH}&domain=philnash")).await;
    assert_eq!(env.status_txt, "INVALID_BITLY_PRO_DOMAIN");
}

// --- expand ---

#[tokio::test]
async fn expand_requires_a_key() {
    let env = call(app(), &format!("/v3/expand?{AUTH}")).await;
    assert_eq!(env.status_txt, "MISSING_ARG_SHORTURL_OR_HASH");
}

#[tokio::test]
async fn shorten_then_expand() {
    use tower::Service;

    let mut app = app().into_service();

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get(&format!(
            "/v3/shorten?{AUTH}&longUrl=http%3A%2F%2Fbetaworks.com%2F&domain=j.mp"
        )))
        .await
        .unwrap();
    let shortened: Envelope = body_json(resp).await;
    let hash = shortened.data["hash"].as_str().unwrap().to_string();
    let global = shortened.data["global_hash"].as_str().unwrap().to_string();
    assert_eq!(shortened.data["url"], format!("http://j.mp/{hash}"));

    // same URL again: hash reused
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get(&format!(
            "/v3/shorten?{AUTH}&longUrl=http%3A%2F%2Fbetaworks.com%2F"
        )))
        .await
        .unwrap();
    let again: Envelope = body_json(resp).await;
    assert_eq!(again.data["hash"], hash.as_str());
    assert_eq!(again.data["new_hash"], 0);

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get(&format!(
            "/v3/expand?{AUTH}&shortUrl=http%3A%2F%2Fbit.ly%2F{hash}&hash={global}&hash=zzzzzz"
        )))
        .await
        .unwrap();
    let expanded: Envelope = body_json(resp).await;
    let items = expanded.data["expand"].as_array().unwrap();
    assert_eq!(items.len(), 3);
    assert_eq!(items[0]["long_url"], "http://betaworks.com/");
    assert_eq!(items[0]["user_hash"], hash.as_str());
    assert_eq!(items[1]["hash"], global.as_str());
    assert_eq!(items[1]["global_hash"], global.as_str());
    assert_eq!(items[2]["error"], "NOT_FOUND");
}
