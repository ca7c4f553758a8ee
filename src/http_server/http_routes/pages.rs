use axum::{http::StatusCode, response::IntoResponse};
use axum_extra::extract::CookieJar;

use crate::http_server::{flash, views};

pub async fn home(jar: CookieJar) -> impl IntoResponse {
    let (jar, flash) = flash::take(jar);
    (jar, views::pages::home(flash.as_deref()))
}

pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, views::pages::not_found())
}
