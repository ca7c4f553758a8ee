use std::fmt::Write;

use axum::response::Html;

use super::{escape, layout};
use crate::genres::GENRE_CHOICES;
use crate::http_server::forms::{ArtistForm, FormErrors, STATE_CHOICES, ShowForm, VenueForm};

fn field_errors(errors: &FormErrors, field: &str) -> String {
    let mut html = String::new();
    for message in errors.get(field) {
        let _ = write!(html, r#"<span class="error">{}</span>"#, escape(message));
    }
    html
}

fn text_input(name: &str, label: &str, value: &str, errors: &FormErrors) -> String {
    format!(
        "<label for=\"{name}\">{label}</label>\n<input type=\"text\" id=\"{name}\" name=\"{name}\" value=\"{value}\">{errors}\n",
        name = name,
        label = escape(label),
        value = escape(value),
        errors = field_errors(errors, name)
    )
}

fn state_select(selected: &str, errors: &FormErrors) -> String {
    let mut html = String::from("<label for=\"state\">State</label>\n<select id=\"state\" name=\"state\">\n");
    for state in STATE_CHOICES {
        let _ = writeln!(
            html,
            r#"<option value="{state}"{selected}>{state}</option>"#,
            state = state,
            selected = if *state == selected { " selected" } else { "" }
        );
    }
    html.push_str("</select>");
    html.push_str(&field_errors(errors, "state"));
    html.push('\n');
    html
}

fn genre_select(selected: &[String], errors: &FormErrors) -> String {
    let mut html = String::from(
        "<label for=\"genres\">Genres</label>\n<select id=\"genres\" name=\"genres\" multiple>\n",
    );
    for genre in GENRE_CHOICES {
        let _ = writeln!(
            html,
            r#"<option value="{genre}"{selected}>{genre}</option>"#,
            genre = escape(genre),
            selected = if selected.iter().any(|g| g == genre) {
                " selected"
            } else {
                ""
            }
        );
    }
    html.push_str("</select>");
    html.push_str(&field_errors(errors, "genres"));
    html.push('\n');
    html
}

fn checkbox(name: &str, label: &str, checked: bool) -> String {
    format!(
        "<label><input type=\"checkbox\" name=\"{}\" value=\"y\"{}> {}</label>\n",
        name,
        if checked { " checked" } else { "" },
        escape(label)
    )
}

fn form_page(
    title: &str,
    action: &str,
    fields: &str,
    submit: &str,
    errors: &FormErrors,
    flash: Option<&str>,
) -> Html<String> {
    let summary = if errors.is_empty() {
        ""
    } else {
        "<p class=\"error\">Please correct the errors below.</p>\n"
    };
    let body = format!(
        "<h1>{title}</h1>\n{summary}<form method=\"post\" action=\"{action}\">\n{fields}<input type=\"submit\" value=\"{submit}\">\n</form>",
        title = escape(title),
        summary = summary,
        action = escape(action),
        fields = fields,
        submit = escape(submit)
    );
    layout(title, flash, &body)
}

/// New and edit venue forms; `action` is the URL the form posts back to
pub fn venue_form(
    title: &str,
    action: &str,
    form: &VenueForm,
    errors: &FormErrors,
    flash: Option<&str>,
) -> Html<String> {
    let mut fields = String::new();
    fields.push_str(&text_input("name", "Name", &form.name, errors));
    fields.push_str(&text_input("city", "City", &form.city, errors));
    fields.push_str(&state_select(&form.state, errors));
    fields.push_str(&text_input("address", "Address", &form.address, errors));
    fields.push_str(&text_input("phone", "Phone", &form.phone, errors));
    fields.push_str(&genre_select(&form.genres, errors));
    fields.push_str(&text_input(
        "facebook_link",
        "Facebook Link",
        &form.facebook_link,
        errors,
    ));
    fields.push_str(&text_input("image_link", "Image Link", &form.image_link, errors));
    fields.push_str(&text_input("website", "Website", &form.website, errors));
    fields.push_str(&checkbox(
        "seeking_talent",
        "Seeking talent",
        form.is_seeking_talent(),
    ));
    fields.push_str(&text_input(
        "seeking_description",
        "Seeking Description",
        &form.seeking_description,
        errors,
    ));

    form_page(title, action, &fields, "Save Venue", errors, flash)
}

pub fn artist_form(
    title: &str,
    action: &str,
    form: &ArtistForm,
    errors: &FormErrors,
    flash: Option<&str>,
) -> Html<String> {
    let mut fields = String::new();
    fields.push_str(&text_input("name", "Name", &form.name, errors));
    fields.push_str(&text_input("city", "City", &form.city, errors));
    fields.push_str(&state_select(&form.state, errors));
    fields.push_str(&text_input("phone", "Phone", &form.phone, errors));
    fields.push_str(&genre_select(&form.genres, errors));
    fields.push_str(&text_input(
        "facebook_link",
        "Facebook Link",
        &form.facebook_link,
        errors,
    ));
    fields.push_str(&text_input("image_link", "Image Link", &form.image_link, errors));
    fields.push_str(&text_input("website", "Website", &form.website, errors));
    fields.push_str(&checkbox(
        "seeking_venue",
        "Seeking venue",
        form.is_seeking_venue(),
    ));
    fields.push_str(&text_input(
        "seeking_description",
        "Seeking Description",
        &form.seeking_description,
        errors,
    ));

    form_page(title, action, &fields, "Save Artist", errors, flash)
}

pub fn show_form(form: &ShowForm, errors: &FormErrors, flash: Option<&str>) -> Html<String> {
    let mut fields = String::new();
    fields.push_str(&text_input("artist_id", "Artist ID", &form.artist_id, errors));
    fields.push_str(&text_input("venue_id", "Venue ID", &form.venue_id, errors));
    fields.push_str(&text_input(
        "start_time",
        "Start Time (YYYY-MM-DD HH:MM)",
        &form.start_time,
        errors,
    ));

    form_page(
        "List a new show",
        "/shows/create",
        &fields,
        "Create Show",
        errors,
        flash,
    )
}
