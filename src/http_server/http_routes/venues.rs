use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{CookieJar, Form};
use chrono::Utc;

use crate::http_server::error::Report;
use crate::http_server::forms::{FormErrors, SearchForm, VenueForm};
use crate::http_server::{flash, state::AppState, views};
use crate::services::error::is_persistence;

const NEW_VENUE_TITLE: &str = "List a new venue";
const EDIT_VENUE_TITLE: &str = "Edit venue";

pub async fn list_venues(
    State(app_state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<impl IntoResponse, Report> {
    let areas = app_state.venues().list_by_area().await?;
    let (jar, flash) = flash::take(jar);
    Ok((jar, views::pages::venues(&areas, flash.as_deref())))
}

pub async fn search_venues(
    State(app_state): State<Arc<AppState>>,
    Form(search): Form<SearchForm>,
) -> Result<impl IntoResponse, Report> {
    let results = app_state.venues().search(&search.search_term).await?;
    Ok(views::pages::search_results(
        "venues",
        &search.search_term,
        &results,
    ))
}

pub async fn show_venue(
    State(app_state): State<Arc<AppState>>,
    Path(venue_id): Path<i64>,
    jar: CookieJar,
) -> Result<impl IntoResponse, Report> {
    let detail = app_state.venues().detail(venue_id, Utc::now()).await?;
    let (jar, flash) = flash::take(jar);
    Ok((jar, views::pages::venue_detail(&detail, flash.as_deref())))
}

pub async fn create_venue_form(jar: CookieJar) -> impl IntoResponse {
    let (jar, flash) = flash::take(jar);
    (
        jar,
        views::forms::venue_form(
            NEW_VENUE_TITLE,
            "/venues/create",
            &VenueForm::default(),
            &FormErrors::default(),
            flash.as_deref(),
        ),
    )
}

pub async fn create_venue_submission(
    State(app_state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<VenueForm>,
) -> Result<Response, Report> {
    let input = match form.clone().validated() {
        Ok(input) => input,
        Err(errors) => {
            return Ok((
                StatusCode::UNPROCESSABLE_ENTITY,
                views::forms::venue_form(NEW_VENUE_TITLE, "/venues/create", &form, &errors, None),
            )
                .into_response());
        }
    };

    match app_state.venues().create(input).await {
        Ok(venue) => {
            let jar = flash::set(
                jar,
                format!("Venue {} was successfully listed!", venue.name),
            );
            Ok((jar, Redirect::to(&format!("/venues/{}", venue.id))).into_response())
        }
        Err(e) if is_persistence(&e) => {
            let message = format!("An error occurred. Venue {} could not be listed.", form.name);
            Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                views::forms::venue_form(
                    NEW_VENUE_TITLE,
                    "/venues/create",
                    &form,
                    &FormErrors::default(),
                    Some(&message),
                ),
            )
                .into_response())
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn edit_venue(
    State(app_state): State<Arc<AppState>>,
    Path(venue_id): Path<i64>,
) -> Result<impl IntoResponse, Report> {
    let venue = app_state.venues().get(venue_id).await?;
    Ok(views::forms::venue_form(
        EDIT_VENUE_TITLE,
        &format!("/venues/{}/edit", venue_id),
        &VenueForm::from(&venue),
        &FormErrors::default(),
        None,
    ))
}

pub async fn edit_venue_submission(
    State(app_state): State<Arc<AppState>>,
    Path(venue_id): Path<i64>,
    jar: CookieJar,
    Form(form): Form<VenueForm>,
) -> Result<Response, Report> {
    let action = format!("/venues/{}/edit", venue_id);
    let input = match form.clone().validated() {
        Ok(input) => input,
        Err(errors) => {
            return Ok((
                StatusCode::UNPROCESSABLE_ENTITY,
                views::forms::venue_form(EDIT_VENUE_TITLE, &action, &form, &errors, None),
            )
                .into_response());
        }
    };

    match app_state.venues().update(venue_id, input).await {
        Ok(venue) => {
            let jar = flash::set(
                jar,
                format!("Venue {} was successfully updated!", venue.name),
            );
            Ok((jar, Redirect::to(&format!("/venues/{}", venue.id))).into_response())
        }
        Err(e) if is_persistence(&e) => {
            let message = format!(
                "An error occurred. Venue {} could not be updated.",
                form.name
            );
            Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                views::forms::venue_form(
                    EDIT_VENUE_TITLE,
                    &action,
                    &form,
                    &FormErrors::default(),
                    Some(&message),
                ),
            )
                .into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// Always lands on the home page, whether or not anything was deleted.
pub async fn delete_venue(
    State(app_state): State<Arc<AppState>>,
    Path(venue_id): Path<i64>,
) -> Redirect {
    if let Err(e) = app_state.venues().delete(venue_id).await {
        log::error!("Failed to delete venue {}: {:?}", venue_id, e);
    }
    Redirect::to("/")
}
