/// Structured view of a commit subject line: `type(scope)!: description`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedSubject<'a> {
    pub r#type: &'a str,
    pub scope: Option<&'a str>,
    /// `!` appeared immediately before the colon
    pub breaking: bool,
    pub description: &'a str,
}

/// Parse a commit subject against the conventional grammar.
///
/// Grammar: one or more lowercase ASCII letters, an optional non-empty
/// `(scope)` without `)`, an optional `!`, then `:`. Returns `None` when the
/// subject does not match; such commits carry no bump signal.
pub fn parse_subject(subject: &str) -> Option<ParsedSubject<'_>> {
    let type_len = subject
        .bytes()
        .take_while(|b| b.is_ascii_lowercase())
        .count();
    if type_len == 0 {
        return None;
    }

    let (r#type, mut rest) = subject.split_at(type_len);

    let mut scope = None;
    if let Some(inner) = rest.strip_prefix('(') {
        let close = inner.find(')')?;
        if close == 0 {
            return None;
        }
        scope = Some(&inner[..close]);
        rest = &inner[close + 1..];
    }

    let breaking = match rest.strip_prefix('!') {
        Some(after) => {
            rest = after;
            true
        }
        None => false,
    };

    let description = rest.strip_prefix(':')?.trim_start();

    Some(ParsedSubject {
        r#type,
        scope,
        breaking,
        description,
    })
}

/// First line of a commit message
pub fn subject_of(message: &str) -> &str {
    message.lines().next().unwrap_or("")
}

/// Whether the full message mentions a breaking change, case-insensitively
pub fn mentions_breaking_change(message: &str) -> bool {
    message.to_lowercase().contains("breaking change")
}

/// Parsed representation of a conventional commit message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommit {
    pub r#type: String,
    pub scope: Option<String>,
    pub description: String,
    pub is_breaking_change: bool,
}

impl ParsedCommit {
    /// Parse a full commit message (subject plus optional body).
    ///
    /// A commit is breaking when its subject carries `!` before the colon or
    /// when any part of the message contains "breaking change".
    pub fn parse(message: &str) -> Option<Self> {
        let subject = parse_subject(subject_of(message))?;

        Some(ParsedCommit {
            r#type: subject.r#type.to_string(),
            scope: subject.scope.map(str::to_string),
            description: subject.description.to_string(),
            is_breaking_change: subject.breaking || mentions_breaking_change(message),
        })
    }
}
