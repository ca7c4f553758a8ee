use std::sync::Arc;

use axum::{Router, routing::get};
use color_eyre::eyre::{Context, eyre};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::{
    database::Database,
    http_server::{
        http_routes::{artists, pages, shows, venues},
        state::AppState,
    },
};

pub struct HttpServerConfig {
    pub port: u16,
    pub database: Database,
}

pub fn router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(pages::home))
        // Venues
        .route("/venues", get(venues::list_venues))
        .route("/venues/search", axum::routing::post(venues::search_venues))
        .route(
            "/venues/create",
            get(venues::create_venue_form).post(venues::create_venue_submission),
        )
        .route("/venues/{venue_id}", get(venues::show_venue))
        .route(
            "/venues/{venue_id}/edit",
            get(venues::edit_venue).post(venues::edit_venue_submission),
        )
        .route("/venues/{venue_id}/delete", get(venues::delete_venue))
        // Artists
        .route("/artists", get(artists::list_artists))
        .route(
            "/artists/search",
            get(artists::search_artists_query).post(artists::search_artists),
        )
        .route(
            "/artists/create",
            get(artists::create_artist_form).post(artists::create_artist_submission),
        )
        .route("/artists/{artist_id}", get(artists::show_artist))
        .route(
            "/artists/{artist_id}/edit",
            get(artists::edit_artist).post(artists::edit_artist_submission),
        )
        .route("/artists/{artist_id}/delete", get(artists::delete_artist))
        // Shows
        .route("/shows", get(shows::list_shows))
        .route(
            "/shows/create",
            get(shows::create_show_form).post(shows::create_show_submission),
        )
        .fallback(pages::not_found)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(app_state)
}

pub async fn start(config: HttpServerConfig) -> color_eyre::Result<()> {
    let HttpServerConfig { port, database } = config;
    let app_state = Arc::new(AppState {
        db: Arc::new(database),
    });

    let app = router(app_state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .wrap_err_with(|| eyre!("Failed to bind to port {}", port))?;
    log::info!("Listening on http://0.0.0.0:{}", port);
    axum::serve(listener, app)
        .await
        .wrap_err("Failed to start HTTP server")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_db;
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use tower::ServiceExt;

    async fn test_app() -> Router {
        router(Arc::new(AppState { db: test_db().await }))
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, String, Option<String>) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .map(|v| v.to_str().unwrap().to_string());
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap(), location)
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_form(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn create_venue(app: &Router, name: &str) -> String {
        let body = format!(
            "name={}&city=San+Francisco&state=CA&address=1015+Folsom+Street&phone=123-123-1234&genres=Jazz&genres=Reggae",
            urlencoding::encode(name)
        );
        let (status, _, location) = send(app, post_form("/venues/create", &body)).await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        location.unwrap()
    }

    async fn create_artist(app: &Router, name: &str) -> String {
        let body = format!(
            "name={}&city=San+Francisco&state=CA&genres=Rock+n+Roll",
            urlencoding::encode(name)
        );
        let (status, _, location) = send(app, post_form("/artists/create", &body)).await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        location.unwrap()
    }

    #[tokio::test]
    async fn test_home_and_unknown_route() {
        let app = test_app().await;

        let (status, body, _) = send(&app, get_request("/")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Fyyur"));

        let (status, body, _) = send(&app, get_request("/nowhere")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("404"));
    }

    #[tokio::test]
    async fn test_create_venue_then_show_it() {
        let app = test_app().await;

        let location = create_venue(&app, "The Musical Hop").await;
        assert_eq!(location, "/venues/1");

        let (status, body, _) = send(&app, get_request(&location)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<h1>The Musical Hop</h1>"));
        assert!(body.contains(r#"<ul class="genres"><li>Jazz</li><li>Reggae</li></ul>"#));
        assert!(body.contains("<h2>0 Upcoming Shows</h2>"));
        assert!(body.contains("<h2>0 Past Shows</h2>"));
    }

    #[tokio::test]
    async fn test_missing_venue_is_404() {
        let app = test_app().await;
        let (status, body, _) = send(&app, get_request("/venues/99")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("Not Found"));

        let (status, _, _) = send(&app, get_request("/venues/99/edit")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_invalid_venue_form_is_rerendered() {
        let app = test_app().await;

        let (status, body, _) = send(
            &app,
            post_form("/venues/create", "name=The+Musical+Hop&state=ZZ"),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body.contains(r#"value="The Musical Hop""#));
        assert!(body.contains("City is required"));
        assert!(body.contains("Choose a valid state"));

        let (_, body, _) = send(&app, get_request("/venues")).await;
        assert!(!body.contains("The Musical Hop"));
    }

    #[tokio::test]
    async fn test_script_link_is_rejected() {
        let app = test_app().await;

        let (status, body, _) = send(
            &app,
            post_form(
                "/venues/create",
                "name=The+Musical+Hop&city=San+Francisco&state=CA&address=1015+Folsom+Street&genres=Jazz&website=javascript%3Aalert(document.cookie)",
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body.contains("Enter a full URL"));

        let (status, _, _) = send(&app, get_request("/venues/1")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_search_venues() {
        let app = test_app().await;
        create_venue(&app, "The Musical Hop").await;
        create_venue(&app, "Park Square Live Music & Coffee").await;

        let (status, body, _) = send(&app, post_form("/venues/search", "search_term=Music")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains(r#"Number of search results for "Music": 2"#));
        assert!(body.contains("The Musical Hop"));
        assert!(body.contains("Park Square Live Music &amp; Coffee"));

        let (_, body, _) = send(&app, post_form("/venues/search", "search_term=Hop")).await;
        assert!(body.contains(r#"Number of search results for "Hop": 1"#));
        assert!(body.contains("The Musical Hop"));
        assert!(!body.contains("Park Square"));
    }

    #[tokio::test]
    async fn test_search_artists_by_get_and_post() {
        let app = test_app().await;
        create_artist(&app, "Guns N Petals").await;
        create_artist(&app, "The Wild Sax Band").await;

        let (_, body, _) = send(&app, post_form("/artists/search", "search_term=band")).await;
        assert!(body.contains(r#"Number of search results for "band": 1"#));
        assert!(body.contains("The Wild Sax Band"));

        let (status, body, _) = send(&app, get_request("/artists/search?search_term=A")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains(r#"Number of search results for "A": 2"#));
    }

    #[tokio::test]
    async fn test_grouped_venue_listing() {
        let app = test_app().await;
        create_venue(&app, "The Musical Hop").await;
        create_venue(&app, "Park Square Live Music & Coffee").await;

        let (status, body, _) = send(&app, get_request("/venues")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.matches("<h3>San Francisco, CA</h3>").count(), 1);
        assert!(body.contains(r#"<a href="/venues/1">The Musical Hop</a>"#));
        assert!(body.contains(r#"<a href="/venues/2">Park Square Live Music &amp; Coffee</a>"#));
    }

    #[tokio::test]
    async fn test_edit_venue() {
        let app = test_app().await;
        let location = create_venue(&app, "The Musical Hop").await;

        let (status, body, _) = send(&app, get_request("/venues/1/edit")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains(r#"value="The Musical Hop""#));
        assert!(body.contains(r#"<option value="Jazz" selected>Jazz</option>"#));

        let (status, _, redirect) = send(
            &app,
            post_form(
                "/venues/1/edit",
                "name=The+Hop&city=Oakland&state=CA&address=1+Main+St&genres=Folk",
            ),
        )
        .await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(redirect.as_deref(), Some(location.as_str()));

        let (_, body, _) = send(&app, get_request(&location)).await;
        assert!(body.contains("<h1>The Hop</h1>"));
        assert!(body.contains("<li>Folk</li>"));
        assert!(!body.contains("<li>Jazz</li>"));
    }

    #[tokio::test]
    async fn test_delete_existing_and_missing_venue_look_the_same() {
        let app = test_app().await;
        create_venue(&app, "The Musical Hop").await;

        let existing = send(&app, get_request("/venues/1/delete")).await;
        let missing = send(&app, get_request("/venues/42/delete")).await;
        assert_eq!(existing, missing);
        assert_eq!(existing.0, StatusCode::SEE_OTHER);
        assert_eq!(existing.2.as_deref(), Some("/"));

        let (status, _, _) = send(&app, get_request("/venues/1")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_create_and_list_show() {
        let app = test_app().await;
        create_venue(&app, "The Musical Hop").await;
        create_venue(&app, "Park Square Live Music & Coffee").await;
        create_artist(&app, "Guns N Petals").await;

        let (status, _, location) = send(
            &app,
            post_form(
                "/shows/create",
                "artist_id=1&venue_id=2&start_time=2019-05-21+21%3A30%3A00",
            ),
        )
        .await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(location.as_deref(), Some("/shows"));

        let (_, body, _) = send(&app, get_request("/shows")).await;
        assert!(body.contains(r#"<a href="/venues/2">Park Square Live Music &amp; Coffee</a>"#));
        assert!(body.contains("Tue 05, 21, 2019 9:30PM"));

        let (_, body, _) = send(&app, get_request("/venues/2")).await;
        assert!(body.contains("<h2>1 Past Shows</h2>"));
        let (_, body, _) = send(&app, get_request("/venues/1")).await;
        assert!(body.contains("<h2>0 Past Shows</h2>"));
    }

    #[tokio::test]
    async fn test_create_show_for_missing_artist() {
        let app = test_app().await;
        create_venue(&app, "The Musical Hop").await;

        let (status, body, _) = send(
            &app,
            post_form(
                "/shows/create",
                "artist_id=5&venue_id=1&start_time=2035-04-01+20%3A00",
            ),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("Artist 5 not found"));

        let (_, body, _) = send(&app, get_request("/shows")).await;
        assert!(!body.contains("<li>"));
    }
}
