use miette::SourceSpan;

/**
A single lease file statement, classified by its first word.

Every word borrows from the raw line,
so error reports can point back at it.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement<'a> {
    /// Empty, whitespace or comment-only line.
    Blank,
    /// `lease <ip> {`
    Lease { ip: Option<&'a str> },
    /// `starts <weekday> <date> <time>`, the weekday dropped.
    Starts { time: Vec<&'a str> },
    /// `ends <weekday> <date> <time>`, the weekday dropped.
    Ends { time: Vec<&'a str> },
    /// `hardware <type> <mac>`
    Hardware { mac: Option<&'a str> },
    /// `client-hostname "<name>"`
    ClientHostname { name: Option<&'a str> },
    /// `set vendor-class-identifier = "<value>"`
    VendorClassIdentifier { value: Vec<&'a str> },
    /// `}`
    Close,
    /// Anything else.
    Other,
}

impl<'a> Statement<'a> {
    pub fn parse(line: &'a str) -> Self {
        if is_blank(line) {
            return Statement::Blank;
        }
        let words = words(line);
        match words.as_slice() {
            ["lease", rest @ ..] => Statement::Lease {
                ip: rest.first().copied().filter(|ip| *ip != "{"),
            },
            ["starts", rest @ ..] => Statement::Starts {
                time: after_weekday(rest),
            },
            ["ends", rest @ ..] => Statement::Ends {
                time: after_weekday(rest),
            },
            ["hardware", rest @ ..] => Statement::Hardware {
                mac: rest.get(1).copied(),
            },
            ["client-hostname", rest @ ..] => Statement::ClientHostname {
                name: rest.first().copied(),
            },
            ["set", "vendor-class-identifier", "=", value @ ..] => {
                Statement::VendorClassIdentifier {
                    value: value.to_vec(),
                }
            }
            ["}", ..] => Statement::Close,
            _ => Statement::Other,
        }
    }
}

/// Matches `^\s*(#.*)?$`.
pub fn is_blank(line: &str) -> bool {
    let line = line.trim();
    line.is_empty() || line.starts_with('#')
}

/// Trim the line, drop one trailing semicolon, split on whitespace.
pub fn words(line: &str) -> Vec<&str> {
    let line = line.trim();
    let line = line.strip_suffix(';').unwrap_or(line);
    line.split_whitespace().collect()
}

fn after_weekday<'a>(rest: &[&'a str]) -> Vec<&'a str> {
    rest.get(1..).unwrap_or_default().to_vec()
}

/// Strip surrounding double quotes.
pub fn unquote(text: &str) -> &str {
    text.trim_matches('"')
}

/**
Span covering the given words inside `line`.
With no words, an empty span at the end of the statement.
*/
pub fn span_of(line: &str, parts: &[&str]) -> SourceSpan {
    match (parts.first(), parts.last()) {
        (Some(first), Some(last)) => {
            let start = offset_in(line, first);
            let end = offset_in(line, last) + last.len();
            (start, end - start).into()
        }
        _ => (line.trim_end().len(), 0).into(),
    }
}

/// Span of the whole statement, surrounding whitespace excluded.
pub fn span_of_line(line: &str) -> SourceSpan {
    let start = line.len() - line.trim_start().len();
    (start, line.trim().len()).into()
}

fn offset_in(line: &str, part: &str) -> usize {
    let offset = (part.as_ptr() as usize).saturating_sub(line.as_ptr() as usize);
    offset.min(line.len())
}
