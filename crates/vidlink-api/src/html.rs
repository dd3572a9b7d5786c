//! Server-rendered HTML for the organiser settings pages.

use crate::plugin::NavEntry;
use crate::services::settings_form::SettingsField;
use std::fmt::Write;
use vidlink_core::models::Event;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flash {
    Success(String),
    Error(String),
}

impl Flash {
    fn class(&self) -> &'static str {
        match self {
            Flash::Success(_) => "alert-success",
            Flash::Error(_) => "alert-danger",
        }
    }

    fn message(&self) -> &str {
        match self {
            Flash::Success(m) | Flash::Error(m) => m,
        }
    }
}

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, nav: Option<&NavEntry>, flashes: &[Flash], body: &str) -> String {
    let mut page = String::new();
    let _ = write!(
        page,
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n<body>\n",
        escape_html(title)
    );
    if let Some(entry) = nav {
        let _ = write!(
            page,
            "<nav><a href=\"{}\"{}>{}</a></nav>\n",
            escape_html(&entry.url),
            if entry.active { " class=\"active\"" } else { "" },
            escape_html(&entry.label)
        );
    }
    for flash in flashes {
        let _ = write!(
            page,
            "<div class=\"alert {}\">{}</div>\n",
            flash.class(),
            escape_html(flash.message())
        );
    }
    page.push_str(body);
    page.push_str("</body>\n</html>\n");
    page
}

fn render_field(out: &mut String, field: &SettingsField) {
    let _ = write!(
        out,
        "<div class=\"form-group\">\n<label for=\"id_{name}\">{label}</label>\n<input type=\"url\" name=\"{name}\" id=\"id_{name}\" value=\"{value}\" placeholder=\"https://youtube.com/watch?v=...\">\n",
        name = escape_html(&field.name),
        label = escape_html(&field.label),
        value = escape_html(&field.initial),
    );
    if let Some(error) = &field.error {
        let _ = write!(
            out,
            "<div class=\"invalid-feedback\">{}</div>\n",
            escape_html(error)
        );
    }
    out.push_str("</div>\n");
}

/// The bulk settings page: one URL field per scheduled talk plus the file upload form.
pub fn render_settings_page(
    event: &Event,
    fields: &[SettingsField],
    flashes: &[Flash],
    nav: Option<&NavEntry>,
) -> String {
    let mut body = String::new();
    let _ = write!(body, "<h1>YouTube URLs for {}</h1>\n", escape_html(&event.name));

    body.push_str("<form method=\"post\" enctype=\"multipart/form-data\">\n");
    body.push_str("<input type=\"hidden\" name=\"action\" value=\"upload\">\n");
    body.push_str("<label for=\"id_file\">Import a JSON or CSV file</label>\n");
    body.push_str("<input type=\"file\" name=\"file\" id=\"id_file\" accept=\".json,.csv\">\n");
    body.push_str("<button type=\"submit\">Upload</button>\n</form>\n");

    body.push_str("<form method=\"post\">\n");
    if fields.is_empty() {
        body.push_str("<p>There are no talks in the current schedule.</p>\n");
    }
    for field in fields {
        render_field(&mut body, field);
    }
    body.push_str("<button type=\"submit\">Save</button>\n</form>\n");

    layout("YouTube integration", nav, flashes, &body)
}

/// The settings page for a single talk.
pub fn render_single_talk_page(
    event: &Event,
    field: &SettingsField,
    flashes: &[Flash],
    nav: Option<&NavEntry>,
) -> String {
    let mut body = String::new();
    let _ = write!(
        body,
        "<h1>YouTube URL for {}</h1>\n<p>{}</p>\n<form method=\"post\">\n",
        escape_html(&field.label),
        escape_html(&event.name)
    );
    render_field(&mut body, field);
    body.push_str("<button type=\"submit\">Save</button>\n</form>\n");

    layout("YouTube integration", nav, flashes, &body)
}
