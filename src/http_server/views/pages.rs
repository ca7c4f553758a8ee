use std::fmt::Write;

use axum::response::Html;

use super::{escape, format_datetime, format_datetime_full, layout, optional_image, optional_link};
use crate::entities;
use crate::genres::Genres;
use crate::services::SearchResults;
use crate::services::artist::{ArtistDetail, VenueShow};
use crate::services::show::ShowListing;
use crate::services::venue::{ArtistShow, VenueArea, VenueDetail};

pub fn home(flash: Option<&str>) -> Html<String> {
    layout(
        "Home",
        flash,
        r#"<h1>Fyyur</h1>
<p>Find and book local venues and artists.</p>
<ul>
<li><a href="/venues/create">Post a venue</a></li>
<li><a href="/artists/create">Post an artist</a></li>
<li><a href="/shows/create">Post a show</a></li>
</ul>"#,
    )
}

pub fn venues(areas: &[VenueArea], flash: Option<&str>) -> Html<String> {
    let mut body = String::from("<h1>Venues</h1>\n");
    for area in areas {
        let _ = writeln!(
            body,
            "<section class=\"area\">\n<h3>{}, {}</h3>\n<ul>",
            escape(&area.city),
            escape(&area.state)
        );
        for venue in &area.venues {
            let _ = writeln!(
                body,
                r#"<li><a href="/venues/{}">{}</a> <small>{} upcoming shows</small></li>"#,
                venue.id,
                escape(&venue.name),
                venue.num_shows
            );
        }
        body.push_str("</ul>\n</section>\n");
    }
    layout("Venues", flash, &body)
}

pub fn artists(artists: &[entities::artist::Model], flash: Option<&str>) -> Html<String> {
    let mut body = String::from("<h1>Artists</h1>\n<ul>\n");
    for artist in artists {
        let _ = writeln!(
            body,
            r#"<li><a href="/artists/{}">{}</a></li>"#,
            artist.id,
            escape(&artist.name)
        );
    }
    body.push_str("</ul>\n");
    layout("Artists", flash, &body)
}

/// Results for both venue and artist searches; `kind` is `venues` or `artists`
pub fn search_results(kind: &str, search_term: &str, results: &SearchResults) -> Html<String> {
    let mut body = format!(
        "<h3>Number of search results for \"{}\": {}</h3>\n<ul>\n",
        escape(search_term),
        results.count
    );
    for hit in &results.data {
        let _ = writeln!(
            body,
            r#"<li><a href="/{}/{}">{}</a></li>"#,
            kind,
            hit.id,
            escape(&hit.name)
        );
    }
    body.push_str("</ul>\n");
    layout("Search", None, &body)
}

fn genre_tags(genres: &Genres) -> String {
    let mut tags = String::from("<ul class=\"genres\">");
    for genre in genres.as_slice() {
        let _ = write!(tags, "<li>{}</li>", escape(genre));
    }
    tags.push_str("</ul>");
    tags
}

fn seeking(flag: bool, what: &str, description: Option<&str>) -> String {
    if flag {
        format!(
            "<div class=\"seeking\"><p>Currently seeking {}</p><p>{}</p></div>",
            what,
            escape(description.unwrap_or_default())
        )
    } else {
        format!("<p class=\"seeking\">Not currently seeking {}</p>", what)
    }
}

fn artist_shows(heading: &str, count: usize, shows: &[ArtistShow]) -> String {
    let mut section = format!(
        "<section>\n<h2>{} {}</h2>\n<ul>\n",
        count,
        escape(heading)
    );
    for show in shows {
        let _ = writeln!(
            section,
            r#"<li>{}<a href="/artists/{}">{}</a> <time title="{}">{}</time></li>"#,
            optional_image(show.artist_image_link.as_deref(), &show.artist_name),
            show.artist_id,
            escape(&show.artist_name),
            format_datetime_full(&show.start_time),
            format_datetime(&show.start_time)
        );
    }
    section.push_str("</ul>\n</section>\n");
    section
}

fn venue_shows(heading: &str, count: usize, shows: &[VenueShow]) -> String {
    let mut section = format!(
        "<section>\n<h2>{} {}</h2>\n<ul>\n",
        count,
        escape(heading)
    );
    for show in shows {
        let _ = writeln!(
            section,
            r#"<li>{}<a href="/venues/{}">{}</a> <time title="{}">{}</time></li>"#,
            optional_image(show.venue_image_link.as_deref(), &show.venue_name),
            show.venue_id,
            escape(&show.venue_name),
            format_datetime_full(&show.start_time),
            format_datetime(&show.start_time)
        );
    }
    section.push_str("</ul>\n</section>\n");
    section
}

pub fn venue_detail(detail: &VenueDetail, flash: Option<&str>) -> Html<String> {
    let venue = &detail.venue;
    let mut body = format!(
        "<h1>{}</h1>\n<p class=\"subtitle\">ID: {}</p>\n{}\n",
        escape(&venue.name),
        venue.id,
        genre_tags(&detail.genres)
    );
    let _ = writeln!(
        body,
        "<p>{}</p>\n<p>{}, {}</p>",
        escape(&venue.address),
        escape(&venue.city),
        escape(&venue.state)
    );
    if let Some(phone) = &venue.phone {
        let _ = writeln!(body, "<p>{}</p>", escape(phone));
    }
    body.push_str(&optional_link("Website", venue.website.as_deref()));
    body.push_str(&optional_link("Facebook", venue.facebook_link.as_deref()));
    body.push_str(&seeking(
        venue.seeking_talent,
        "talent",
        venue.seeking_description.as_deref(),
    ));
    body.push_str(&optional_image(venue.image_link.as_deref(), &venue.name));
    let _ = writeln!(
        body,
        r#"<p><a href="/venues/{id}/edit">Edit</a> <a href="/venues/{id}/delete">Delete</a></p>"#,
        id = venue.id
    );
    body.push_str(&artist_shows(
        "Upcoming Shows",
        detail.upcoming_shows_count,
        &detail.upcoming_shows,
    ));
    body.push_str(&artist_shows("Past Shows", detail.past_shows_count, &detail.past_shows));

    layout(&venue.name, flash, &body)
}

pub fn artist_detail(detail: &ArtistDetail, flash: Option<&str>) -> Html<String> {
    let artist = &detail.artist;
    let mut body = format!(
        "<h1>{}</h1>\n<p class=\"subtitle\">ID: {}</p>\n{}\n",
        escape(&artist.name),
        artist.id,
        genre_tags(&detail.genres)
    );
    let _ = writeln!(
        body,
        "<p>{}, {}</p>",
        escape(&artist.city),
        escape(&artist.state)
    );
    if let Some(phone) = &artist.phone {
        let _ = writeln!(body, "<p>{}</p>", escape(phone));
    }
    body.push_str(&optional_link("Website", artist.website.as_deref()));
    body.push_str(&optional_link("Facebook", artist.facebook_link.as_deref()));
    body.push_str(&seeking(
        artist.seeking_venue,
        "performance venues",
        artist.seeking_description.as_deref(),
    ));
    body.push_str(&optional_image(artist.image_link.as_deref(), &artist.name));
    let _ = writeln!(
        body,
        r#"<p><a href="/artists/{id}/edit">Edit</a> <a href="/artists/{id}/delete">Delete</a></p>"#,
        id = artist.id
    );
    body.push_str(&venue_shows(
        "Upcoming Shows",
        detail.upcoming_shows_count,
        &detail.upcoming_shows,
    ));
    body.push_str(&venue_shows("Past Shows", detail.past_shows_count, &detail.past_shows));

    layout(&artist.name, flash, &body)
}

pub fn shows(shows: &[ShowListing], flash: Option<&str>) -> Html<String> {
    let mut body = String::from("<h1>Shows</h1>\n<ul>\n");
    for show in shows {
        let _ = writeln!(
            body,
            r#"<li>{}<time title="{}">{}</time> <a href="/artists/{}">{}</a> playing at <a href="/venues/{}">{}</a></li>"#,
            optional_image(show.artist_image_link.as_deref(), &show.artist_name),
            format_datetime_full(&show.start_time),
            format_datetime(&show.start_time),
            show.artist_id,
            escape(&show.artist_name),
            show.venue_id,
            escape(&show.venue_name)
        );
    }
    body.push_str("</ul>\n");
    layout("Shows", flash, &body)
}

pub fn not_found() -> Html<String> {
    layout(
        "Not Found",
        None,
        "<h1>404</h1>\n<p>Not Found</p>\n<p><a href=\"/\">Back home</a></p>",
    )
}

pub fn server_error() -> Html<String> {
    layout(
        "Server Error",
        None,
        "<h1>500</h1>\n<p>Something went wrong</p>\n<p><a href=\"/\">Back home</a></p>",
    )
}
