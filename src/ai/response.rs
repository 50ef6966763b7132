//! Parsing of AI responses.
//!
//! Prompts ask for XML-tagged sections. Models do not always comply, so each
//! parser falls back to regex heuristics over the untagged text.

use std::sync::LazyLock;

use regex::Regex;

use crate::ai::ResponseError;
use crate::data::PrContent;

static COMMIT_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<commit_message>(.*?)</commit_message>").unwrap());

static TITLE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<title>(.*?)</title>").unwrap());

static BODY_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<(body|description)>(.*?)</(?:body|description)>").unwrap());

/// An opening body tag whose closing tag was cut off.
static UNCLOSED_BODY_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<(?:body|description)>(.*)$").unwrap());

static STRAY_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"</?(?:commit_message|title|body|description)>").unwrap()
});

static CODE_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```[A-Za-z0-9_-]*[ \t]*\n(.*?)\n?[ \t]*```").unwrap());

/// A conversational lead-in such as "Here is the commit message:".
static CHATTER_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[ \t]*(?:here(?:'s| is| are)|sure|certainly|below is)\b[^\n]*:[ \t]*$")
        .unwrap()
});

static LABELLED_TITLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?im)^[ \t]*(?:#{1,6}[ \t]*)?(?:\*\*)?(?:pr[ \t]+)?title[ \t]*(?::\*\*|\*\*:|:)[ \t]*(?P<title>\S[^\n]*)$",
    )
    .unwrap()
});

/// A title label on a line of its own (`## Title`, `**Title**`, `Title:`)
/// with the value on the next non-empty line.
static HEADING_TITLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?im)^[ \t]*(?:#{1,6}[ \t]*)?(?:\*\*)?(?:pr[ \t]+)?title(?:\*\*)?[ \t]*:?(?:\*\*)?[ \t]*\r?\n(?:[ \t]*\r?\n)*[ \t]*(?P<title>\S[^\n]*)$",
    )
    .unwrap()
});

/// A body label, either inline (`Body: text`) or on a line of its own
/// (`## Description`).
static LABELLED_BODY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?im)^[ \t]*(?:#{1,6}[ \t]*)?(?:\*\*)?(?:body|description)(?:[ \t]*(?::\*\*|\*\*:|:)[ \t]*|(?:\*\*)?[ \t]*:?(?:\*\*)?[ \t]*(?:\r?\n|$))",
    )
    .unwrap()
});

/// Extracts a commit message from an AI response.
pub fn parse_commit_message(raw: &str) -> Result<String, ResponseError> {
    let text = match capture(&COMMIT_TAG, raw, 1) {
        Some(tagged) => tagged.to_string(),
        None => {
            let unfenced = strip_code_fence(raw);
            drop_chatter_line(unfenced).to_string()
        }
    };

    let message = normalize(&STRAY_TAG.replace_all(&text, ""));
    if message.is_empty() {
        return Err(ResponseError::MissingCommitMessage);
    }
    Ok(message)
}

/// Extracts a PR title and body from an AI response.
pub fn parse_pr_response(raw: &str) -> Result<PrContent, ResponseError> {
    let (title, body) = match capture(&TITLE_TAG, raw, 1) {
        Some(title) => {
            let body = capture(&BODY_TAG, raw, 2)
                .or_else(|| capture(&UNCLOSED_BODY_TAG, raw, 1))
                .unwrap_or_default();
            (title.to_string(), body.to_string())
        }
        None => split_untagged_pr(strip_code_fence(raw)),
    };

    let title = clean_title(&STRAY_TAG.replace_all(&title, ""));
    if title.is_empty() {
        return Err(ResponseError::MissingTitle);
    }
    let body = normalize(&STRAY_TAG.replace_all(&body, ""));

    Ok(PrContent { title, body })
}

fn capture<'t>(regex: &Regex, text: &'t str, group: usize) -> Option<&'t str> {
    regex
        .captures(text)
        .and_then(|c| c.get(group))
        .map(|m| m.as_str())
}

/// Splits an untagged response into title and body.
///
/// Prefers `Title:`/`Body:` or `## Title` heading labels; otherwise the first non-empty line
/// is the title and the remainder the body.
fn split_untagged_pr(text: &str) -> (String, String) {
    let labelled = [&*LABELLED_TITLE, &*HEADING_TITLE]
        .into_iter()
        .filter_map(|regex| regex.captures(text))
        .min_by_key(|caps| caps.get(0).map_or(usize::MAX, |m| m.start()));

    if let Some(caps) = labelled {
        let title = caps["title"].to_string();
        let rest = &text[caps.get(0).map_or(0, |m| m.end())..];
        let body = match LABELLED_BODY.find(rest) {
            Some(label) => &rest[label.end()..],
            None => rest,
        };
        return (title, body.to_string());
    }

    let text = drop_chatter_line(text);
    let mut lines = text.lines().skip_while(|l| l.trim().is_empty());
    let title = lines
        .next()
        .map(|l| l.trim().trim_start_matches('#').trim().to_string())
        .unwrap_or_default();
    let body = lines.collect::<Vec<_>>().join("\n");
    (title, body)
}

/// Returns the contents of the first fenced code block, or the input.
fn strip_code_fence(text: &str) -> &str {
    capture(&CODE_FENCE, text, 1).unwrap_or(text)
}

/// Drops a leading "Here is ...:" line.
fn drop_chatter_line(text: &str) -> &str {
    let trimmed = text.trim_start();
    match trimmed.split_once('\n') {
        Some((first, rest)) if CHATTER_LINE.is_match(first) => rest,
        _ => trimmed,
    }
}

/// Reduces a title to one clean line.
fn clean_title(raw: &str) -> String {
    let line = raw
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or_default();
    line.trim_matches(|c| matches!(c, '"' | '\'' | '`' | '*'))
        .trim()
        .to_string()
}

/// Trims trailing whitespace per line and surrounding blank lines.
fn normalize(text: &str) -> String {
    text.lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
        .trim_matches('\n')
        .trim()
        .to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    // --- commit messages ---

    #[test]
    fn commit_from_tags() {
        let raw = "Some analysis first.\n<commit_message>\nfeat(cli): add hook\n\nWires the hook.\n</commit_message>\nThanks!";
        assert_eq!(
            parse_commit_message(raw).unwrap(),
            "feat(cli): add hook\n\nWires the hook."
        );
    }

    #[test]
    fn commit_from_code_fence() {
        let raw = "Here is the commit message:\n```\nfix: handle empty diff\n```\n";
        assert_eq!(parse_commit_message(raw).unwrap(), "fix: handle empty diff");
    }

    #[test]
    fn commit_drops_chatter_line() {
        let raw = "Sure, here's a message:\nchore: bump deps\n\nUpdates lockfile.";
        assert_eq!(
            parse_commit_message(raw).unwrap(),
            "chore: bump deps\n\nUpdates lockfile."
        );
    }

    #[test]
    fn commit_plain_text() {
        assert_eq!(
            parse_commit_message("  docs: fix typo   \n").unwrap(),
            "docs: fix typo"
        );
    }

    #[test]
    fn commit_unclosed_tag_is_stripped() {
        let raw = "<commit_message>\nrefactor: split module\n";
        assert_eq!(parse_commit_message(raw).unwrap(), "refactor: split module");
    }

    #[test]
    fn commit_trailing_whitespace_removed() {
        let raw = "<commit_message>feat: x   \n\nbody line   \n</commit_message>";
        assert_eq!(parse_commit_message(raw).unwrap(), "feat: x\n\nbody line");
    }

    #[test]
    fn commit_empty_is_error() {
        assert_eq!(
            parse_commit_message("<commit_message>   </commit_message>"),
            Err(ResponseError::MissingCommitMessage)
        );
        assert_eq!(
            parse_commit_message("   "),
            Err(ResponseError::MissingCommitMessage)
        );
    }

    // --- pull requests ---

    #[test]
    fn pr_from_tags() {
        let raw = "<title>feat: add login</title>\n<body>\n## Summary\n- adds form\n</body>";
        let pr = parse_pr_response(raw).unwrap();
        assert_eq!(pr.title, "feat: add login");
        assert_eq!(pr.body, "## Summary\n- adds form");
    }

    #[test]
    fn pr_description_tag_accepted() {
        let raw = "<title>Fix crash</title><description>Details here</description>";
        let pr = parse_pr_response(raw).unwrap();
        assert_eq!(pr.body, "Details here");
    }

    #[test]
    fn pr_unclosed_body() {
        let raw = "<title>Fix crash</title>\n<body>\nPartial body";
        let pr = parse_pr_response(raw).unwrap();
        assert_eq!(pr.body, "Partial body");
    }

    #[test]
    fn pr_title_without_body() {
        let pr = parse_pr_response("<title>  \"Quoted title\"  </title>").unwrap();
        assert_eq!(pr.title, "Quoted title");
        assert_eq!(pr.body, "");
    }

    #[test]
    fn pr_multiline_title_keeps_first_line() {
        let pr = parse_pr_response("<title>\nFirst\nSecond\n</title><body>b</body>").unwrap();
        assert_eq!(pr.title, "First");
    }

    #[test]
    fn pr_labelled_fallback() {
        let raw = "Title: Add retry to uploads\n\nBody:\nRetries failed uploads three times.";
        let pr = parse_pr_response(raw).unwrap();
        assert_eq!(pr.title, "Add retry to uploads");
        assert_eq!(pr.body, "Retries failed uploads three times.");
    }

    #[test]
    fn pr_bold_labelled_fallback() {
        let raw = "**Title:** Add retry\n\n**Description:** Retries uploads.\n\n- one\n- two";
        let pr = parse_pr_response(raw).unwrap();
        assert_eq!(pr.title, "Add retry");
        assert_eq!(pr.body, "Retries uploads.\n\n- one\n- two");
    }

    #[test]
    fn pr_labelled_title_without_body_label() {
        let raw = "## Title: Speed up builds\n\nCaches the registry.";
        let pr = parse_pr_response(raw).unwrap();
        assert_eq!(pr.title, "Speed up builds");
        assert_eq!(pr.body, "Caches the registry.");
    }

    #[test]
    fn pr_heading_labels_on_their_own_lines() {
        let raw = "## Title\nAdd retry to uploads\n\n## Description\nRetries uploads.";
        let pr = parse_pr_response(raw).unwrap();
        assert_eq!(pr.title, "Add retry to uploads");
        assert_eq!(pr.body, "Retries uploads.");
    }

    #[test]
    fn pr_bold_heading_labels() {
        let raw = "**Title**\n\nFix flaky test\n\n**Body**\n- pins the seed";
        let pr = parse_pr_response(raw).unwrap();
        assert_eq!(pr.title, "Fix flaky test");
        assert_eq!(pr.body, "- pins the seed");
    }

    #[test]
    fn pr_first_line_fallback() {
        let raw = "Here is the PR:\n# Improve logging\n\nAdds spans around git calls.";
        let pr = parse_pr_response(raw).unwrap();
        assert_eq!(pr.title, "Improve logging");
        assert_eq!(pr.body, "Adds spans around git calls.");
    }

    #[test]
    fn pr_fenced_fallback() {
        let raw = "```markdown\nTitle: Fenced title\nBody: fenced body\n```";
        let pr = parse_pr_response(raw).unwrap();
        assert_eq!(pr.title, "Fenced title");
        assert_eq!(pr.body, "fenced body");
    }

    #[test]
    fn pr_empty_title_is_error() {
        assert_eq!(
            parse_pr_response("<title> </title><body>x</body>"),
            Err(ResponseError::MissingTitle)
        );
        assert_eq!(parse_pr_response("\n\n"), Err(ResponseError::MissingTitle));
    }

    mod prop {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn parsers_never_panic(s in ".*") {
                let _ = parse_commit_message(&s);
                let _ = parse_pr_response(&s);
            }

            #[test]
            fn tagged_title_round_trips(title in "[A-Za-z][A-Za-z0-9 :()-]{0,60}[A-Za-z0-9)]") {
                let raw = format!("noise\n<title>{title}</title>\n<body>text</body>");
                let pr = parse_pr_response(&raw).unwrap();
                prop_assert_eq!(pr.title, title.trim().to_string());
            }

            #[test]
            fn parsed_title_is_single_line(s in "\\PC*") {
                if let Ok(pr) = parse_pr_response(&s) {
                    prop_assert!(!pr.title.contains('\n'));
                    prop_assert!(!pr.title.is_empty());
                }
            }
        }
    }
}
