use axum_extra::extract::cookie::{Cookie, CookieJar};

const FLASH_COOKIE: &str = "flash";

/// Queue a one-shot notification for the next rendered page.
pub fn set(jar: CookieJar, message: impl AsRef<str>) -> CookieJar {
    let value = urlencoding::encode(message.as_ref()).into_owned();
    jar.add(
        Cookie::build((FLASH_COOKIE, value))
            .path("/")
            .http_only(true),
    )
}

/// Take the pending notification, if any, clearing it from the jar.
pub fn take(jar: CookieJar) -> (CookieJar, Option<String>) {
    let message = jar
        .get(FLASH_COOKIE)
        .and_then(|cookie| urlencoding::decode(cookie.value()).ok())
        .map(|message| message.into_owned());

    match message {
        Some(message) => (
            jar.remove(Cookie::build(FLASH_COOKIE).path("/")),
            Some(message),
        ),
        None => (jar, None),
    }
}
