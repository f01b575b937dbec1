//! Pure mapping from session state to presentational output.
//!
//! Each state renders wholesale; nothing here mutates or patches prior
//! output, and nothing here can fail.

use colored::Colorize;
use manifold_core::{AnalysisSession, DataUri, Topic};

use crate::markdown::render_markdown;

/// Topics suggested on the idle screen.
pub const SUGGESTED_TOPICS: [&str; 3] =
    ["Procrastination", "The future of work", "Information Anxiety"];

/// Placeholder shown in the image panel when no diagram was generated.
pub const IMAGE_PLACEHOLDER: &str = "No system diagram was generated for this topic.";

/// Filename the image download uses, derived from the slugified topic.
pub fn image_filename(topic: &Topic) -> String {
    format!("system-diagram-{}.png", topic.slug())
}

/// Renders the whole view for the current session state.
pub fn render_session(session: &AnalysisSession) -> String {
    match session {
        AnalysisSession::Idle => render_idle(),
        AnalysisSession::Running { topic, .. } => render_running(topic),
        AnalysisSession::Succeeded {
            topic,
            analysis,
            image,
        } => render_succeeded(topic, analysis, image.as_ref()),
        AnalysisSession::Failed { error_message, .. } => render_failed(error_message),
    }
}

fn render_idle() -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{}\n",
        "Manifold — dimensional topic analysis".bright_white().bold()
    ));
    out.push_str(&format!(
        "{}\n",
        "Elevate your perspective: deconstruction, abstraction, systemic loops.".dimmed()
    ));
    out.push_str(&format!(
        "{}\n",
        format!("Try topics like: {}", SUGGESTED_TOPICS.join(", ")).bright_black()
    ));
    out
}

fn render_running(topic: &Topic) -> String {
    format!(
        "{}\n",
        format!("Analyzing \"{topic}\" — deconstructing, abstracting, mapping the loops...")
            .dimmed()
    )
}

fn render_succeeded(topic: &Topic, analysis: &str, image: Option<&DataUri>) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "{}  {}\n\n",
        format!("TOPIC: {topic}").bright_black(),
        "(/reset to analyze another topic)".dimmed()
    ));

    out.push_str(&format!("{}\n", "ANALYSIS STREAM".bright_black().bold()));
    out.push_str(&render_markdown(analysis));
    out.push('\n');

    out.push_str(&format!("{}\n", "SYSTEM VISUALIZATION".bright_black().bold()));
    match image {
        Some(image) => {
            out.push_str(&format!(
                "{}\n",
                format!(
                    "{} image generated ({} KiB) — /save writes {}",
                    image.mime(),
                    image.approx_bytes().div_ceil(1024),
                    image_filename(topic)
                )
                .green()
            ));
            out.push_str(&format!(
                "{}\n",
                format!(
                    "AI generated system diagram for \"{topic}\", mapping the causal loops \
discussed in the analysis."
                )
                .dimmed()
            ));
        }
        None => {
            out.push_str(&format!("{}\n", IMAGE_PLACEHOLDER.yellow()));
        }
    }
    out
}

fn render_failed(error_message: &str) -> String {
    format!("{}\n", error_message.red())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn topic(raw: &str) -> Topic {
        Topic::new(raw).unwrap()
    }

    fn plain(session: &AnalysisSession) -> String {
        colored::control::set_override(false);
        render_session(session)
    }

    #[test]
    fn idle_shows_banner_and_suggestions() {
        let out = plain(&AnalysisSession::Idle);
        assert!(out.contains("Manifold"));
        assert!(out.contains("Procrastination"));
    }

    #[test]
    fn running_names_the_topic() {
        let out = plain(&AnalysisSession::Running {
            topic: topic("Information Anxiety"),
            generation: 3,
        });
        assert!(out.contains("Analyzing \"Information Anxiety\""));
    }

    #[test]
    fn succeeded_renders_analysis_and_image_panel() {
        let out = plain(&AnalysisSession::Succeeded {
            topic: topic("The Future of Work"),
            analysis: "## Key Loops\n\n- automation".to_string(),
            image: Some(DataUri::new("image/png", "AAAA")),
        });
        assert!(out.contains("TOPIC: The Future of Work"));
        assert!(out.contains("Key Loops"));
        assert!(out.contains("• automation"));
        assert!(out.contains("system-diagram-the-future-of-work.png"));
    }

    #[test]
    fn succeeded_without_image_shows_placeholder() {
        let out = plain(&AnalysisSession::Succeeded {
            topic: topic("X"),
            analysis: "body".to_string(),
            image: None,
        });
        assert!(out.contains(IMAGE_PLACEHOLDER));
        assert!(!out.contains("/save"));
    }

    #[test]
    fn failed_renders_only_the_fixed_message() {
        let out = plain(&AnalysisSession::Failed {
            topic: topic("X"),
            error_message: "An error occurred.".to_string(),
        });
        assert!(out.contains("An error occurred."));
        assert!(!out.contains("ANALYSIS STREAM"));
    }

    #[test]
    fn image_filename_uses_the_slug() {
        assert_eq!(
            image_filename(&topic("Why   We Procrastinate")),
            "system-diagram-why-we-procrastinate.png"
        );
    }
}
