// src/views/admin.rs

use maud::{Markup, PreEscaped, html};

use crate::{
    models::{
        participant::{LeaderboardEntry, Participant},
        question::Question,
        settings::Settings,
    },
    report::ChartData,
    views::{NoticeKind, notice},
};

pub fn login_form(error: Option<&str>) -> Markup {
    html! {
        @if let Some(error) = error {
            (notice(NoticeKind::Danger, error))
        }
        form method="post" action="/admin" {
            input class="form-control mb-2" name="username" placeholder="Username" autocomplete="username";
            input class="form-control mb-2" type="password" name="password" placeholder="Password" autocomplete="current-password";
            button class="btn btn-dark w-100" { "Login" }
        }
    }
}

pub fn console(settings: &Settings, question_count: i64, participant_count: i64) -> Markup {
    let (state_label, toggle_label) = if settings.quiz_open {
        ("Open", "Close Quiz")
    } else {
        ("Closed", "Open Quiz")
    };
    html! {
        ul class="list-group mb-3" {
            li class="list-group-item" { "Quiz: " strong id="quiz-state" { (state_label) } }
            li class="list-group-item" { "Timer: " strong { (format_timer(settings.timer_seconds)) } }
            li class="list-group-item" { "Questions: " strong { (question_count) } }
            li class="list-group-item" { "Participants: " strong { (participant_count) } }
        }
        a href="/admin/toggle" class="btn btn-warning w-100 mb-2" { (toggle_label) }
        a href="/admin/questions" class="btn btn-primary w-100 mb-2" { "Add Question" }
        a href="/admin/timer" class="btn btn-info w-100 mb-2" { "Set Timer" }
        a href="/admin/leaderboard" class="btn btn-secondary w-100 mb-2" { "Leaderboard" }
        a href="/admin/graph" class="btn btn-dark w-100 mb-2" { "Graph" }
        a href="/admin/export" class="btn btn-success w-100 mb-2" { "Export Spreadsheet" }
        a href="/admin/clear" class="btn btn-outline-danger w-100" { "Clear Leaderboard" }
    }
}

pub fn questions_page(questions: &[Question], flash: Option<(NoticeKind, &str)>) -> Markup {
    html! {
        @if let Some((kind, text)) = flash {
            (notice(kind, text))
        }
        form method="post" action="/admin/questions" class="mb-4" {
            textarea class="form-control mb-2" name="content" placeholder="Question" rows="3" required {}
            @for label in crate::config::OPTION_LABELS {
                input class="form-control mb-2" name=(format!("option_{}", label))
                    placeholder=(format!("Option {}", label.to_uppercase())) required;
            }
            select class="form-select mb-2" name="correct" {
                @for label in crate::config::OPTION_LABELS {
                    option value=(label) { "Correct: " (label.to_uppercase()) }
                }
            }
            button class="btn btn-primary w-100" { "Add Question" }
        }
        h5 { "Questions (" (questions.len()) ")" }
        @if questions.is_empty() {
            p class="text-muted" { "No questions yet." }
        }
        @for question in questions {
            div class="question-block" {
                p { b { "#" (question.id) " " (PreEscaped(&question.content)) } }
                ul {
                    @for (label, text) in question.labeled_options() {
                        @if label == question.correct {
                            li { strong { (label.to_uppercase()) ". " (PreEscaped(text)) " ✓" } }
                        } @else {
                            li { (label.to_uppercase()) ". " (PreEscaped(text)) }
                        }
                    }
                }
                form method="post" action=(format!("/admin/questions/{}/delete", question.id)) {
                    button class="btn btn-sm btn-outline-danger" { "Delete" }
                }
            }
        }
    }
}

pub fn timer_form(current_seconds: i64, error: Option<&str>) -> Markup {
    html! {
        @if let Some(error) = error {
            (notice(NoticeKind::Danger, error))
        }
        p { "Current timer: " strong { (format_timer(current_seconds)) } }
        form method="post" action="/admin/timer" {
            input class="form-control mb-2" type="number" min="0" max="600" name="minutes"
                placeholder="Minutes" value=(current_seconds / 60) required;
            input class="form-control mb-2" type="number" min="0" max="59" name="seconds"
                placeholder="Seconds" value=(current_seconds % 60) required;
            button class="btn btn-info w-100" { "Set Timer" }
        }
    }
}

pub fn leaderboard(entries: &[LeaderboardEntry]) -> Markup {
    html! {
        @if entries.is_empty() {
            p class="text-muted" { "No participants yet." }
        } @else {
            table class="table table-striped" {
                thead {
                    tr { th { "Rank" } th { "Name" } th { "Score" } th { "Time" } }
                }
                tbody {
                    @for entry in entries {
                        tr {
                            td { (entry.rank) }
                            td {
                                a href=(format!("/admin/participants/{}", entry.participant.id)) {
                                    (entry.participant.name)
                                }
                            }
                            td { (entry.participant.score) }
                            td { (format_elapsed(entry.participant.elapsed_seconds())) }
                        }
                    }
                }
            }
        }
        a href="/admin/export" class="btn btn-success w-100" { "Export Spreadsheet" }
    }
}

pub fn participant_detail(participant: &Participant) -> Markup {
    html! {
        h5 { (participant.name) }
        dl class="row" {
            dt class="col-sm-4" { "Email" } dd class="col-sm-8" { (participant.email) }
            dt class="col-sm-4" { "Contact" } dd class="col-sm-8" { (participant.contact) }
            dt class="col-sm-4" { "Score" } dd class="col-sm-8" { (participant.score) }
            dt class="col-sm-4" { "Started" } dd class="col-sm-8" { (participant.started_at.format("%Y-%m-%d %H:%M:%S UTC").to_string()) }
            dt class="col-sm-4" { "Finished" }
            dd class="col-sm-8" {
                @match participant.finished_at {
                    Some(end) => { (end.format("%Y-%m-%d %H:%M:%S UTC").to_string()) }
                    None => { "In progress" }
                }
            }
            dt class="col-sm-4" { "Time" } dd class="col-sm-8" { (format_elapsed(participant.elapsed_seconds())) }
        }
        a href="/admin/leaderboard" class="btn btn-outline-secondary w-100" { "Back to leaderboard" }
    }
}

/// Bar chart of participant scores rendered client-side by Chart.js.
pub fn graph(data: &ChartData) -> Markup {
    html! {
        canvas id="chart" {}
        script src="https://cdn.jsdelivr.net/npm/chart.js" {}
        script {
            (PreEscaped(format!(
                r##"
new Chart(document.getElementById("chart"), {{
    type: "bar",
    data: {{
        labels: {},
        datasets: [{{ label: "Scores", data: {}, backgroundColor: "#0d6efd" }}]
    }},
    options: {{ scales: {{ y: {{ beginAtZero: true, ticks: {{ precision: 0 }} }} }} }}
}});
"##,
                data.labels_json(),
                data.scores_json()
            )))
        }
    }
}

pub fn clear_confirm() -> Markup {
    html! {
        (notice(NoticeKind::Warning, "This deletes every participant and score. Questions and settings are kept."))
        form method="post" action="/admin/clear" {
            button class="btn btn-danger w-100 mb-2" { "Yes, clear the leaderboard" }
        }
        a href="/admin" class="btn btn-outline-secondary w-100" { "Cancel" }
    }
}

pub fn format_timer(seconds: i64) -> String {
    format!("{}m {:02}s", seconds / 60, seconds % 60)
}

pub fn format_elapsed(elapsed: Option<f64>) -> String {
    match elapsed {
        Some(secs) => format!("{:.1}s", secs),
        None => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timer_and_elapsed_formatting() {
        assert_eq!(format_timer(150), "2m 30s");
        assert_eq!(format_timer(5), "0m 05s");
        assert_eq!(format_elapsed(Some(30.14)), "30.1s");
        assert_eq!(format_elapsed(None), "-");
    }

    #[test]
    fn console_shows_toggle_matching_state() {
        let open = console(&Settings { timer_seconds: 300, quiz_open: true }, 2, 0).into_string();
        let closed = console(&Settings { timer_seconds: 300, quiz_open: false }, 2, 0).into_string();

        assert!(open.contains("Close Quiz"));
        assert!(closed.contains("Open Quiz"));
        assert!(closed.contains(r#"<strong id="quiz-state">Closed</strong>"#));
    }

    #[test]
    fn graph_embeds_series_and_bar_colour() {
        let data = ChartData {
            labels: vec!["Ada".to_string(), "Grace".to_string()],
            scores: vec![3, 5],
        };
        let out = graph(&data).into_string();

        assert!(out.contains(r#"labels: ["Ada","Grace"]"#));
        assert!(out.contains("data: [3,5]"));
        assert!(out.contains(r##"backgroundColor: "#0d6efd""##));
    }
}
