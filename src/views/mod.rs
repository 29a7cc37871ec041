// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Inline HTML pages.
//!
//! Every user-supplied string passes through [`html_escape`] before it is
//! interpolated.

use crate::models::Note;
use axum::http::StatusCode;

const CSS_STYLES: &str = r#"
body { font-family: system-ui, sans-serif; background: #f5f5f4; margin: 0; color: #1c1917; }
.container { max-width: 720px; margin: 2rem auto; padding: 0 1rem; }
.card { background: #fff; border-radius: 8px; padding: 1rem 1.25rem; margin-bottom: 1rem; box-shadow: 0 1px 3px rgba(0,0,0,.1); }
.card.important { border-left: 4px solid #dc2626; }
.field { margin-bottom: .75rem; }
label { display: block; font-weight: 600; margin-bottom: .25rem; }
input[type=text], input[type=email], input[type=password], textarea { width: 100%; box-sizing: border-box; padding: .5rem; border: 1px solid #d6d3d1; border-radius: 4px; }
textarea { min-height: 6rem; }
button, .button { background: #2563eb; color: #fff; border: 0; border-radius: 4px; padding: .5rem 1rem; cursor: pointer; text-decoration: none; display: inline-block; }
button.danger { background: #dc2626; }
.error { background: #fee2e2; color: #991b1b; padding: .5rem .75rem; border-radius: 4px; margin-bottom: 1rem; }
.topbar { display: flex; justify-content: space-between; align-items: center; }
.actions { display: flex; gap: .5rem; margin-top: .75rem; }
.muted { color: #78716c; }
pre { white-space: pre-wrap; font-family: inherit; margin: .5rem 0 0; }
"#;

/// Escape text for safe interpolation into HTML element content and attributes.
pub fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
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

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{} - Notekeeper</title>
    <style>{}</style>
</head>
<body>
    <div class="container">
{}
    </div>
</body>
</html>"#,
        html_escape(title),
        CSS_STYLES,
        body
    )
}

fn error_banner(error: Option<&str>) -> String {
    error
        .map(|e| format!(r#"<div class="error">{}</div>"#, html_escape(e)))
        .unwrap_or_default()
}

/// Login form.
pub fn login_page(error: Option<&str>, email: &str) -> String {
    let body = format!(
        r#"<h1>Log in</h1>
{}
<form class="card" method="post" action="/login">
    <div class="field">
        <label for="email">Email</label>
        <input type="email" id="email" name="email" value="{}" required>
    </div>
    <div class="field">
        <label for="password">Password</label>
        <input type="password" id="password" name="password" required>
    </div>
    <button type="submit">Log in</button>
</form>
<p><a class="button" href="/login/google">Sign in with Google</a></p>
<p class="muted">No account? <a href="/signup">Sign up</a></p>"#,
        error_banner(error),
        html_escape(email)
    );
    layout("Log in", &body)
}

/// Signup form.
pub fn signup_page(error: Option<&str>, username: &str, email: &str) -> String {
    let body = format!(
        r#"<h1>Sign up</h1>
{}
<form class="card" method="post" action="/signup">
    <div class="field">
        <label for="username">Username</label>
        <input type="text" id="username" name="username" value="{}" required>
    </div>
    <div class="field">
        <label for="email">Email</label>
        <input type="email" id="email" name="email" value="{}" required>
    </div>
    <div class="field">
        <label for="password">Password</label>
        <input type="password" id="password" name="password" required>
    </div>
    <button type="submit">Create account</button>
</form>
<p class="muted">Already registered? <a href="/login">Log in</a></p>"#,
        error_banner(error),
        html_escape(username),
        html_escape(email)
    );
    layout("Sign up", &body)
}

fn note_card(note: &Note) -> String {
    let id = html_escape(&note.id);
    format!(
        r#"<div class="card{}">
    <strong>{}</strong>
    <pre>{}</pre>
    <div class="actions">
        <a class="button" href="/edit/{}">Edit</a>
        <form method="post" action="/delete/{}"><button class="danger" type="submit">Delete</button></form>
    </div>
</div>"#,
        if note.important { " important" } else { "" },
        html_escape(&note.title),
        html_escape(&note.content),
        id,
        id
    )
}

/// The note list with search box and creation form.
pub fn index_page(username: &str, notes: &[Note], query: Option<&str>) -> String {
    let list = if notes.is_empty() {
        match query {
            Some(q) => format!(
                r#"<p class="muted">No notes match "{}".</p>"#,
                html_escape(q)
            ),
            None => r#"<p class="muted">No notes yet.</p>"#.to_string(),
        }
    } else {
        notes.iter().map(note_card).collect::<Vec<_>>().join("\n")
    };

    let body = format!(
        r#"<div class="topbar">
    <h1>{}'s notes</h1>
    <form method="post" action="/logout"><button type="submit">Log out</button></form>
</div>
<form class="card" method="get" action="/">
    <input type="text" name="q" value="{}" placeholder="Search notes">
</form>
<form class="card" method="post" action="/">
    <div class="field">
        <label for="title">Title</label>
        <input type="text" id="title" name="title" required>
    </div>
    <div class="field">
        <label for="content">Content</label>
        <textarea id="content" name="content"></textarea>
    </div>
    <div class="field">
        <label><input type="checkbox" name="important"> Important</label>
    </div>
    <button type="submit">Add note</button>
</form>
{}"#,
        html_escape(username),
        html_escape(query.unwrap_or_default()),
        list
    );
    layout("Notes", &body)
}

/// Edit form for one note.
pub fn edit_page(note: &Note) -> String {
    let body = format!(
        r#"<h1>Edit note</h1>
<form class="card" method="post" action="/update/{}">
    <div class="field">
        <label for="title">Title</label>
        <input type="text" id="title" name="title" value="{}" required>
    </div>
    <div class="field">
        <label for="content">Content</label>
        <textarea id="content" name="content">{}</textarea>
    </div>
    <div class="field">
        <label><input type="checkbox" name="important"{}> Important</label>
    </div>
    <div class="actions">
        <button type="submit">Save</button>
        <a href="/">Cancel</a>
    </div>
</form>"#,
        html_escape(&note.id),
        html_escape(&note.title),
        html_escape(&note.content),
        if note.important { " checked" } else { "" }
    );
    layout("Edit note", &body)
}

/// Generic error page.
pub fn error_page(status: StatusCode, message: &str) -> String {
    let reason = status.canonical_reason().unwrap_or("Error");
    let body = format!(
        r#"<h1>{} {}</h1>
<div class="error">{}</div>
<p><a href="/">Back to notes</a></p>"#,
        status.as_u16(),
        html_escape(reason),
        html_escape(message)
    );
    layout(reason, &body)
}
