use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::{HeaderMap, HeaderValue};

use docchat_server::middleware::auth::session_token;

const COOKIE_NAME: &str = "docchat-session";

fn headers(pairs: &[(axum::http::HeaderName, &str)]) -> HeaderMap {
    let mut map = HeaderMap::new();
    for (name, value) in pairs {
        map.append(name.clone(), HeaderValue::from_str(value).unwrap());
    }
    map
}

#[test]
fn bearer_header_wins_over_cookie() {
    let map = headers(&[
        (AUTHORIZATION, "Bearer from-header"),
        (COOKIE, "docchat-session=from-cookie"),
    ]);

    assert_eq!(session_token(&map, COOKIE_NAME), Some("from-header"));
}

#[test]
fn cookie_is_found_among_others() {
    let map = headers(&[
        (COOKIE, "theme=dark"),
        (COOKIE, "lang=en; docchat-session=abc.def.ghi; other=1"),
    ]);

    assert_eq!(session_token(&map, COOKIE_NAME), Some("abc.def.ghi"));
}

#[test]
fn missing_or_empty_tokens_resolve_to_none() {
    assert_eq!(session_token(&HeaderMap::new(), COOKIE_NAME), None);
    assert_eq!(
        session_token(&headers(&[(AUTHORIZATION, "Basic dXNlcg==")]), COOKIE_NAME),
        None
    );
    assert_eq!(
        session_token(&headers(&[(COOKIE, "docchat-session=")]), COOKIE_NAME),
        None
    );
    assert_eq!(
        session_token(&headers(&[(COOKIE, "docchat-session-old=xyz")]), COOKIE_NAME),
        None
    );
}
