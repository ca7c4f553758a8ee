//! Server-rendered HTML. Every interpolated value goes through [`escape`].

pub mod forms;
pub mod pages;

use std::fmt::Write;

use axum::response::Html;
use chrono::{DateTime, Utc};

pub fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// `Tue 05, 21, 2019 9:30PM`
pub fn format_datetime(value: &DateTime<Utc>) -> String {
    value.format("%a %m, %d, %Y %-I:%M%p").to_string()
}

/// `Tuesday May, 21, 2019 at 9:30PM`
pub fn format_datetime_full(value: &DateTime<Utc>) -> String {
    value.format("%A %B, %-d, %Y at %-I:%M%p").to_string()
}

pub fn layout(title: &str, flash: Option<&str>, body: &str) -> Html<String> {
    let mut page = String::new();
    let _ = write!(
        page,
        r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title} | Fyyur</title>
</head>
<body>
<nav>
<a href="/">Fyyur</a>
<a href="/venues">Venues</a>
<a href="/artists">Artists</a>
<a href="/shows">Shows</a>
<form method="post" action="/venues/search" class="search"><input name="search_term" placeholder="Find a venue"></form>
<form method="post" action="/artists/search" class="search"><input name="search_term" placeholder="Find an artist"></form>
</nav>
"#,
        title = escape(title)
    );
    if let Some(message) = flash {
        let _ = writeln!(page, r#"<div class="flash">{}</div>"#, escape(message));
    }
    let _ = write!(page, "<main>\n{}\n</main>\n</body>\n</html>\n", body);
    Html(page)
}

fn optional_link(label: &str, href: Option<&str>) -> String {
    match href {
        Some(href) => format!(
            r#"<p><a href="{}">{}</a></p>"#,
            escape(href),
            escape(label)
        ),
        None => String::new(),
    }
}

fn optional_image(src: Option<&str>, alt: &str) -> String {
    match src {
        Some(src) => format!(r#"<img src="{}" alt="{}">"#, escape(src), escape(alt)),
        None => String::new(),
    }
}
