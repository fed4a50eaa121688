//! Jsh command-line tokenizer.

/// A tokenized command line.
///
/// `input` retains the trimmed original text (including a trailing `&`) for
/// job bookkeeping and display; `argv` holds the tokens to execute.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedLine {
    /// Original command line, trimmed, used for messages.
    pub input: String,
    /// The program and its arguments.
    pub argv: Vec<String>,
    /// Run the command in the background?
    pub background: bool,
}

impl ParsedLine {
    /// Tokenizes `line` into an argument vector.
    ///
    /// A line ending in `&` (after trimming trailing whitespace) requests a
    /// background job; the `&` is not part of the argument vector. Characters
    /// enclosed in single quotes form a single argument. Returns `None` for
    /// blank lines.
    ///
    /// # Examples
    ///
    /// ```
    /// use jsh::parse::ParsedLine;
    ///
    /// let parsed = ParsedLine::parse("sleep 5 &").unwrap();
    /// assert_eq!(parsed.argv, vec!["sleep", "5"]);
    /// assert!(parsed.background);
    /// assert_eq!(parsed.input, "sleep 5 &");
    /// ```
    pub fn parse(line: &str) -> Option<ParsedLine> {
        let input = line.trim();
        if input.is_empty() {
            return None;
        }

        let background = input.ends_with('&');
        let body = if background {
            input[..input.len() - 1].trim_end()
        } else {
            input
        };

        let argv = tokenize(body);
        if argv.is_empty() {
            return None;
        }

        Some(ParsedLine {
            input: input.to_string(),
            argv,
            background,
        })
    }
}

fn tokenize(line: &str) -> Vec<String> {
    let mut argv = Vec::new();
    let mut chars = line.chars().peekable();

    loop {
        while let Some(&c) = chars.peek() {
            if !c.is_whitespace() {
                break;
            }
            chars.next();
        }

        match chars.peek() {
            None => break,
            Some(&'\'') => {
                // Everything up to the closing quote is one argument; an
                // unterminated quote takes the rest of the line.
                chars.next();
                let mut token = String::new();
                for c in chars.by_ref() {
                    if c == '\'' {
                        break;
                    }
                    token.push(c);
                }
                argv.push(token);
            }
            Some(_) => {
                let mut token = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_whitespace() {
                        break;
                    }
                    token.push(c);
                    chars.next();
                }
                argv.push(token);
            }
        }
    }

    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty() {
        assert!(ParsedLine::parse("").is_none());
        assert!(ParsedLine::parse("   \n").is_none());
    }

    #[test]
    fn lone_ampersand() {
        assert!(ParsedLine::parse("&").is_none());
    }

    #[test]
    fn single_cmd() {
        let parsed = ParsedLine::parse("cmd\n").unwrap();
        assert_eq!(parsed.argv, vec!["cmd"]);
        assert!(!parsed.background);
        assert_eq!(parsed.input, "cmd");
    }

    #[test]
    fn single_cmd_with_args() {
        let parsed = ParsedLine::parse("cmd var1 var2 var3").unwrap();
        assert_eq!(parsed.argv, vec!["cmd", "var1", "var2", "var3"]);
    }

    #[test]
    fn background_with_separate_ampersand() {
        let parsed = ParsedLine::parse("sleep 5 &\n").unwrap();
        assert_eq!(parsed.argv, vec!["sleep", "5"]);
        assert!(parsed.background);
        assert_eq!(parsed.input, "sleep 5 &");
    }

    #[test]
    fn background_with_attached_ampersand() {
        let parsed = ParsedLine::parse("sleep 5&").unwrap();
        assert_eq!(parsed.argv, vec!["sleep", "5"]);
        assert!(parsed.background);
    }

    #[test]
    fn single_quoted_words_form_one_argument() {
        let parsed = ParsedLine::parse("echo 'hello world' tail").unwrap();
        assert_eq!(parsed.argv, vec!["echo", "hello world", "tail"]);
    }

    #[test]
    fn unterminated_quote_takes_rest_of_line() {
        let parsed = ParsedLine::parse("echo 'hello world").unwrap();
        assert_eq!(parsed.argv, vec!["echo", "hello world"]);
    }
}
