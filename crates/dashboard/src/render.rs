//! HTML rendering of a snapshot for displays that cannot run the JSON
//! front-end.

use family_types::{FamilySnapshot, WEEKDAY_LABELS};

/// One column per calendar, one row per weekday.
pub fn render_html(snapshot: &FamilySnapshot, stylesheet_href: &str) -> String {
    let mut html = String::with_capacity(4096);

    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<title>Family Calendar</title>\n");
    html.push_str(&format!(
        "<link rel=\"stylesheet\" href=\"{}\">\n",
        html_escape(stylesheet_href)
    ));
    html.push_str("</head>\n<body>\n");
    html.push_str(&format!(
        "<table class=\"week\" data-week-start=\"{}\">\n",
        snapshot.week_start.format("%Y-%m-%d")
    ));

    html.push_str("<thead><tr><th></th>");
    for calendar in &snapshot.calendars {
        html.push_str(&format!(
            "<th class=\"member\">{}</th>",
            html_escape(&calendar.calendar_name)
        ));
    }
    html.push_str("</tr></thead>\n<tbody>\n");

    for (day, label) in WEEKDAY_LABELS.iter().enumerate() {
        html.push_str(&format!("<tr><th class=\"day\">{label}</th>"));
        for calendar in &snapshot.calendars {
            html.push_str("<td><ul>");
            for event in &calendar.days[day].events {
                html.push_str(&format!(
                    "<li data-event-id=\"{}\">{}</li>",
                    html_escape(&event.id),
                    html_escape(&event.title)
                ));
            }
            html.push_str("</ul></td>");
        }
        html.push_str("</tr>\n");
    }

    html.push_str("</tbody>\n</table>\n</body>\n</html>\n");
    html
}

/// Escape text for use in element content and quoted attributes.
pub fn html_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
