// src/views/quiz.rs

use maud::{Markup, PreEscaped, html};

use crate::{
    models::question::PublicQuestion,
    views::{NoticeKind, notice},
};

pub fn registration_form(error: Option<&str>) -> Markup {
    html! {
        @if let Some(error) = error {
            (notice(NoticeKind::Danger, error))
        }
        form method="post" action="/" {
            input class="form-control mb-2" name="name" placeholder="Name" required;
            input class="form-control mb-2" type="email" name="email" placeholder="Email" required;
            input class="form-control mb-2" name="contact" placeholder="Contact" required;
            button class="btn btn-primary w-100" { "Continue" }
        }
    }
}

pub fn closed() -> Markup {
    html! {
        h4 class="text-center text-danger" { "Quiz Closed" }
    }
}

pub fn code_form(error: Option<&str>) -> Markup {
    html! {
        @if let Some(error) = error {
            (notice(NoticeKind::Danger, error))
        }
        form method="post" action="/verify" {
            input class="form-control mb-2" name="code" placeholder="Enter access code" autocomplete="off" required;
            button class="btn btn-success w-100" { "Verify" }
        }
    }
}

pub fn unavailable() -> Markup {
    notice(NoticeKind::Warning, "The quiz is not yet available. Please check back shortly.")
}

/// Quiz form with a client-side countdown that submits the form when it reaches zero.
pub fn quiz_form(questions: &[PublicQuestion], timer_seconds: i64) -> Markup {
    html! {
        div class="alert alert-info text-center" {
            "Time Left: " span id="countdown" { (timer_seconds) } " sec"
        }
        form id="quiz-form" method="post" action="/submit" {
            @for (index, question) in questions.iter().enumerate() {
                div class="question-block" {
                    p { b { (index + 1) ". " (PreEscaped(&question.content)) } }
                    @for (label, text) in &question.options {
                        div class="form-check" {
                            label class="form-check-label" {
                                input class="form-check-input" type="radio" name=(question.id) value=(label);
                                " " (PreEscaped(text))
                            }
                        }
                    }
                }
            }
            button class="btn btn-success w-100" { "Submit" }
        }
        script {
            (PreEscaped(format!(
                r#"
(function () {{
    let remaining = {};
    const display = document.getElementById("countdown");
    const form = document.getElementById("quiz-form");
    const tick = setInterval(function () {{
        remaining--;
        display.textContent = Math.max(remaining, 0);
        if (remaining <= 30) {{ display.className = "text-danger"; }}
        if (remaining <= 0) {{
            clearInterval(tick);
            form.submit();
        }}
    }}, 1000);
}})();
"#,
                timer_seconds
            )))
        }
    }
}

pub fn submitted() -> Markup {
    html! {
        h4 class="text-center text-success" { "You have successfully submitted the quiz" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(id: i64) -> PublicQuestion {
        PublicQuestion {
            id,
            content: format!("Question <code>{}</code>", id),
            options: ["a", "b", "c", "d"]
                .iter()
                .map(|l| (l.to_string(), format!("opt {}", l)))
                .collect(),
        }
    }

    #[test]
    fn quiz_form_renders_radios_and_timer() {
        let out = quiz_form(&[question(4), question(9)], 150).into_string();

        assert!(out.contains(r#"<span id="countdown">150</span>"#));
        assert!(out.contains("let remaining = 150;"));
        assert!(out.contains(r#"name="4" value="a""#));
        assert!(out.contains(r#"name="9" value="d""#));
        assert!(out.contains("<code>9</code>"));
        assert_eq!(out.matches(r#"type="radio""#).count(), 8);
    }

    #[test]
    fn form_errors_are_shown() {
        let out = code_form(Some("Wrong access code")).into_string();
        assert!(out.contains("Wrong access code"));
        assert!(!code_form(None).into_string().contains("alert"));
    }
}
