//! Server-rendered screens

use crate::shell::{CheckOutcome, Screen, Shell};

/// Render the shell's current screen, with the outcome of the last check
/// when there is one
pub fn render(shell: &Shell, outcome: Option<&CheckOutcome>) -> String {
    match shell.screen() {
        Screen::Landing => landing(),
        Screen::Detection => detection(shell.input(), outcome),
    }
}

/// Landing screen: what the detector is and how to use it
fn landing() -> String {
    let body = format!(
        r#"<h1>Welcome to the Spam Detection App</h1>
<p>This app uses a <strong>Random Forest</strong> model to detect whether an email is
<strong>Spam</strong> or <strong>Not Spam (Ham)</strong>.</p>
<h3>Features:</h3>
<ul>
  <li>Accurate predictions from a pretrained model.</li>
  <li>A simple, easy-to-use interface.</li>
  <li>Shows the detection confidence for the email you enter.</li>
</ul>
<p>Choose <a href="{detect}"><strong>{title}</strong></a> in the sidebar to get started.</p>"#,
        detect = Screen::Detection.path(),
        title = Screen::Detection.title(),
    );
    layout(Screen::Landing, "Email Spam Detector", &body)
}

fn detection(input: &str, outcome: Option<&CheckOutcome>) -> String {
    let messages: String = outcome
        .map(|outcome| {
            outcome
                .messages()
                .iter()
                .map(|m| {
                    format!(
                        "<div class=\"message {}\">{}</div>\n",
                        m.level.as_str(),
                        escape_html(&m.text)
                    )
                })
                .collect()
        })
        .unwrap_or_default();

    let body = format!(
        r#"<h1>Email Spam Classifier</h1>
<p>Enter the email content below and the system will predict whether it is
<strong>Spam</strong> or <strong>Not Spam (Ham)</strong>.</p>
<form method="post" action="{action}">
  <label for="text">Email content</label>
  <textarea id="text" name="text" rows="10">{input}</textarea>
  <button type="submit">Check</button>
</form>
{messages}"#,
        action = Screen::Detection.path(),
        input = escape_html(input),
        messages = messages,
    );
    layout(Screen::Detection, "Email Spam Classifier", &body)
}

pub fn not_found() -> String {
    layout(
        Screen::Landing,
        "Not Found",
        "<h1>Page not found</h1>\n<p>Use the sidebar to pick a screen.</p>",
    )
}

fn layout(current: Screen, title: &str, body: &str) -> String {
    let nav: String = Screen::ALL
        .iter()
        .map(|screen| {
            let class = if *screen == current { " class=\"active\"" } else { "" };
            format!(
                "<li><a href=\"{}\"{}>{}</a></li>",
                screen.path(),
                class,
                screen.title()
            )
        })
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <link rel="stylesheet" href="/static/style.css">
</head>
<body>
    <nav class="sidebar">
        <h2>Navigation</h2>
        <ul>{nav}</ul>
    </nav>
    <main>
{body}
    </main>
</body>
</html>
"#,
        title = escape_html(title),
        nav = nav,
        body = body,
    )
}

/// Escape text for HTML element content and attribute values
pub fn escape_html(text: &str) -> String {
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

#[cfg(test)]
mod tests {
    use super::*;
    use spamscan_core::{Label, PredictionResult};

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("<script>alert('x') & \"y\"</script>"),
            "&lt;script&gt;alert(&#39;x&#39;) &amp; &quot;y&quot;&lt;/script&gt;"
        );
    }

    #[test]
    fn test_sidebar_marks_current_screen() {
        let page = render(&Shell::new(), None);
        assert!(page.contains(r#"<a href="/" class="active">Home</a>"#));
        assert!(page.contains(r#"<a href="/detect">Spam Detection</a>"#));
        assert!(page.contains("Random Forest"));
    }

    #[test]
    fn test_detection_renders_outcome_and_keeps_input() {
        let outcome = CheckOutcome::Verdict(PredictionResult {
            label: Label::Spam,
            confidence: 97.25,
        });
        let page = render(&Shell::detecting("Win <b>now</b>"), Some(&outcome));

        assert!(page.contains("Win &lt;b&gt;now&lt;/b&gt;</textarea>"));
        assert!(page.contains("<div class=\"message success\">Prediction result: SPAM</div>"));
        assert!(page.contains(
            "<div class=\"message info\">Detection confidence for this input: 97.25%</div>"
        ));
        assert!(page.contains("<button type=\"submit\">Check</button>"));
    }

    #[test]
    fn test_empty_detection_has_no_messages() {
        let mut shell = Shell::new();
        assert!(shell.navigate(Screen::Detection));

        let page = render(&shell, None);
        assert!(page.contains(r#"<a href="/detect" class="active">Spam Detection</a>"#));
        assert!(!page.contains("class=\"message"));
    }

    #[test]
    fn test_landing_ignores_outcome() {
        let outcome = CheckOutcome::Warning("stale".to_string());
        assert!(!render(&Shell::new(), Some(&outcome)).contains("stale"));
    }
}
