use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::{CookieJar, Form};
use chrono::Utc;

use crate::http_server::error::Report;
use crate::http_server::forms::{ArtistForm, FormErrors, SearchForm};
use crate::http_server::{flash, state::AppState, views};
use crate::services::error::is_persistence;

const NEW_ARTIST_TITLE: &str = "List a new artist";
const EDIT_ARTIST_TITLE: &str = "Edit artist";

pub async fn list_artists(
    State(app_state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<impl IntoResponse, Report> {
    let artists = app_state.artists().list().await?;
    let (jar, flash) = flash::take(jar);
    Ok((jar, views::pages::artists(&artists, flash.as_deref())))
}

async fn search(app_state: &AppState, search: SearchForm) -> Result<Html<String>, Report> {
    let results = app_state.artists().search(&search.search_term).await?;
    Ok(views::pages::search_results(
        "artists",
        &search.search_term,
        &results,
    ))
}

pub async fn search_artists(
    State(app_state): State<Arc<AppState>>,
    Form(search_form): Form<SearchForm>,
) -> Result<Html<String>, Report> {
    search(&app_state, search_form).await
}

/// `GET /artists/search?search_term=...`
pub async fn search_artists_query(
    State(app_state): State<Arc<AppState>>,
    Query(search_form): Query<SearchForm>,
) -> Result<Html<String>, Report> {
    search(&app_state, search_form).await
}

pub async fn show_artist(
    State(app_state): State<Arc<AppState>>,
    Path(artist_id): Path<i64>,
    jar: CookieJar,
) -> Result<impl IntoResponse, Report> {
    let detail = app_state.artists().detail(artist_id, Utc::now()).await?;
    let (jar, flash) = flash::take(jar);
    Ok((jar, views::pages::artist_detail(&detail, flash.as_deref())))
}

pub async fn create_artist_form(jar: CookieJar) -> impl IntoResponse {
    let (jar, flash) = flash::take(jar);
    (
        jar,
        views::forms::artist_form(
            NEW_ARTIST_TITLE,
            "/artists/create",
            &ArtistForm::default(),
            &FormErrors::default(),
            flash.as_deref(),
        ),
    )
}

pub async fn create_artist_submission(
    State(app_state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<ArtistForm>,
) -> Result<Response, Report> {
    let input = match form.clone().validated() {
        Ok(input) => input,
        Err(errors) => {
            return Ok((
                StatusCode::UNPROCESSABLE_ENTITY,
                views::forms::artist_form(
                    NEW_ARTIST_TITLE,
                    "/artists/create",
                    &form,
                    &errors,
                    None,
                ),
            )
                .into_response());
        }
    };

    match app_state.artists().create(input).await {
        Ok(artist) => {
            let jar = flash::set(
                jar,
                format!("Artist {} was successfully listed!", artist.name),
            );
            Ok((jar, Redirect::to(&format!("/artists/{}", artist.id))).into_response())
        }
        Err(e) if is_persistence(&e) => {
            let message = format!(
                "An error occurred. Artist {} could not be listed.",
                form.name
            );
            Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                views::forms::artist_form(
                    NEW_ARTIST_TITLE,
                    "/artists/create",
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

pub async fn edit_artist(
    State(app_state): State<Arc<AppState>>,
    Path(artist_id): Path<i64>,
) -> Result<impl IntoResponse, Report> {
    let artist = app_state.artists().get(artist_id).await?;
    Ok(views::forms::artist_form(
        EDIT_ARTIST_TITLE,
        &format!("/artists/{}/edit", artist_id),
        &ArtistForm::from(&artist),
        &FormErrors::default(),
        None,
    ))
}

pub async fn edit_artist_submission(
    State(app_state): State<Arc<AppState>>,
    Path(artist_id): Path<i64>,
    jar: CookieJar,
    Form(form): Form<ArtistForm>,
) -> Result<Response, Report> {
    let action = format!("/artists/{}/edit", artist_id);
    let input = match form.clone().validated() {
        Ok(input) => input,
        Err(errors) => {
            return Ok((
                StatusCode::UNPROCESSABLE_ENTITY,
                views::forms::artist_form(EDIT_ARTIST_TITLE, &action, &form, &errors, None),
            )
                .into_response());
        }
    };

    match app_state.artists().update(artist_id, input).await {
        Ok(artist) => {
            let jar = flash::set(
                jar,
                format!("Artist {} was successfully updated!", artist.name),
            );
            Ok((jar, Redirect::to(&format!("/artists/{}", artist.id))).into_response())
        }
        Err(e) if is_persistence(&e) => {
            let message = format!(
                "An error occurred. Artist {} could not be updated.",
                form.name
            );
            Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                views::forms::artist_form(
                    EDIT_ARTIST_TITLE,
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

pub async fn delete_artist(
    State(app_state): State<Arc<AppState>>,
    Path(artist_id): Path<i64>,
) -> Redirect {
    if let Err(e) = app_state.artists().delete(artist_id).await {
        log::error!("Failed to delete artist {}: {:?}", artist_id, e);
    }
    Redirect::to("/")
}
