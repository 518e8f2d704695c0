// src/views/mod.rs

//! HTML rendering. Every page is a body fragment wrapped in [`page`].

pub mod admin;
pub mod quiz;

use maud::{DOCTYPE, Markup, html};

/// Bootstrap variant used for an inline notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Warning,
    Danger,
}

impl NoticeKind {
    fn class(self) -> &'static str {
        match self {
            NoticeKind::Success => "alert alert-success text-center",
            NoticeKind::Warning => "alert alert-warning text-center",
            NoticeKind::Danger => "alert alert-danger text-center",
        }
    }
}

pub fn notice(kind: NoticeKind, text: &str) -> Markup {
    html! {
        div class=(kind.class()) role="alert" { (text) }
    }
}

/// Wraps `body` in the shared page shell.
///
/// `admin_nav` adds the navigation bar linking the admin console pages.
pub fn page(title: &str, body: Markup, admin_nav: bool) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width,initial-scale=1";
                title { (title) }
                link href="https://cdn.jsdelivr.net/npm/bootstrap@5.3.2/dist/css/bootstrap.min.css" rel="stylesheet";
                link href="/static/quiz.css" rel="stylesheet";
            }
            body {
                @if admin_nav {
                    nav class="navbar navbar-expand navbar-dark bg-dark" {
                        div class="container" {
                            a class="navbar-brand" href="/admin" { "Admin" }
                            div class="navbar-nav" {
                                a class="nav-link" href="/admin/questions" { "Questions" }
                                a class="nav-link" href="/admin/timer" { "Timer" }
                                a class="nav-link" href="/admin/leaderboard" { "Leaderboard" }
                                a class="nav-link" href="/admin/graph" { "Graph" }
                                a class="nav-link" href="/admin/logout" { "Log out" }
                            }
                        }
                    }
                }
                div class="container mt-4" {
                    h3 class="text-center" { (title) }
                    div class="card p-4 mt-3 shadow" { (body) }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_wraps_body_and_escapes_title() {
        let out = page("Q&A", html! { p { "hello" } }, false).into_string();

        assert!(out.starts_with("<!DOCTYPE html>"));
        assert!(out.contains("<title>Q&amp;A</title>"));
        assert!(out.contains("<p>hello</p>"));
    }

    #[test]
    fn admin_nav_only_when_requested() {
        let public = page("Quiz", html! {}, false).into_string();
        let admin = page("Quiz", html! {}, true).into_string();

        assert!(!public.contains("/admin/leaderboard"));
        assert!(admin.contains("/admin/leaderboard"));
        assert!(admin.contains("/admin/logout"));
    }

    #[test]
    fn notice_escapes_text() {
        let out = notice(NoticeKind::Danger, "<b>nope</b>").into_string();
        assert!(out.contains("alert-danger"));
        assert!(out.contains("&lt;b&gt;nope&lt;/b&gt;"));
    }
}
