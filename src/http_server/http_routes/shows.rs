use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{CookieJar, Form};

use crate::http_server::error::Report;
use crate::http_server::forms::{FormErrors, ShowForm};
use crate::http_server::{flash, state::AppState, views};
use crate::services::error::{is_not_found, is_persistence};

pub async fn list_shows(
    State(app_state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<impl IntoResponse, Report> {
    let shows = app_state.shows().list().await?;
    let (jar, flash) = flash::take(jar);
    Ok((jar, views::pages::shows(&shows, flash.as_deref())))
}

pub async fn create_show_form(jar: CookieJar) -> impl IntoResponse {
    let (jar, flash) = flash::take(jar);
    (
        jar,
        views::forms::show_form(
            &ShowForm::default(),
            &FormErrors::default(),
            flash.as_deref(),
        ),
    )
}

pub async fn create_show_submission(
    State(app_state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<ShowForm>,
) -> Result<Response, Report> {
    let input = match form.clone().validated() {
        Ok(input) => input,
        Err(errors) => {
            return Ok((
                StatusCode::UNPROCESSABLE_ENTITY,
                views::forms::show_form(&form, &errors, None),
            )
                .into_response());
        }
    };

    match app_state.shows().create(input).await {
        Ok(_) => {
            let jar = flash::set(jar, "Show was successfully listed!");
            Ok((jar, Redirect::to("/shows")).into_response())
        }
        Err(e) if is_not_found(&e) => {
            // Unknown artist or venue: tell the user which one on the form
            let message = format!("An error occurred. Show could not be listed: {}", e);
            Ok((
                StatusCode::NOT_FOUND,
                views::forms::show_form(&form, &FormErrors::default(), Some(&message)),
            )
                .into_response())
        }
        Err(e) if is_persistence(&e) => Ok((
            StatusCode::INTERNAL_SERVER_ERROR,
            views::forms::show_form(
                &form,
                &FormErrors::default(),
                Some("An error occurred. Show could not be listed."),
            ),
        )
            .into_response()),
        Err(e) => Err(e.into()),
    }
}
