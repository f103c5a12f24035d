//! Shared helper functions for CLI commands

/// Truncate a string to max_len characters, adding "..." if truncated
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Format a session alias for display (`@3`, or `-` when there is none)
pub fn format_alias(short_id: Option<u32>) -> String {
    short_id.map_or_else(|| "-".to_string(), |n| format!("@{}", n))
}

/// Split a script line into arguments
///
/// Whitespace separates arguments; single or double quotes group words.
/// Inside double quotes `\"` and `\\` are escapes.
pub fn split_args(line: &str) -> Result<Vec<String>, String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_arg = false;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match c {
            '\'' => {
                in_arg = true;
                loop {
                    match chars.next() {
                        Some('\'') => break,
                        Some(inner) => current.push(inner),
                        None => return Err("unterminated single quote".to_string()),
                    }
                }
            }
            '"' => {
                in_arg = true;
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            Some(escaped @ ('"' | '\\')) => current.push(escaped),
                            Some(other) => {
                                current.push('\\');
                                current.push(other);
                            }
                            None => return Err("unterminated double quote".to_string()),
                        },
                        Some(inner) => current.push(inner),
                        None => return Err("unterminated double quote".to_string()),
                    }
                }
            }
            c if c.is_whitespace() => {
                if in_arg {
                    args.push(std::mem::take(&mut current));
                    in_arg = false;
                }
            }
            c => {
                in_arg = true;
                current.push(c);
            }
        }
    }

    if in_arg {
        args.push(current);
    }
    Ok(args)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("hello", 10), "hello");
        assert_eq!(truncate_str("hello world", 8), "hello...");
        assert_eq!(truncate_str("hi", 2), "hi");
        assert_eq!(truncate_str("шестерня", 6), "шес...");
    }

    #[test]
    fn test_format_alias() {
        assert_eq!(format_alias(Some(3)), "@3");
        assert_eq!(format_alias(None), "-");
    }

    #[test]
    fn test_split_plain_words() {
        assert_eq!(
            split_args("  sell @1   @2 ").unwrap(),
            vec!["sell", "@1", "@2"]
        );
        assert!(split_args("   ").unwrap().is_empty());
    }

    #[test]
    fn test_split_quoted_words() {
        assert_eq!(
            split_args(r#"add detail --name "Hex bolt" --material 'cast iron'"#).unwrap(),
            vec!["add", "detail", "--name", "Hex bolt", "--material", "cast iron"]
        );
    }

    #[test]
    fn test_split_empty_quotes_make_an_argument() {
        assert_eq!(split_args(r#"login alice """#).unwrap(), vec!["login", "alice", ""]);
    }

    #[test]
    fn test_split_escapes_in_double_quotes() {
        assert_eq!(
            split_args(r#"--name "The \"big\" one""#).unwrap(),
            vec!["--name", r#"The "big" one"#]
        );
    }

    #[test]
    fn test_split_unterminated_quote() {
        assert!(split_args("--name \"Bolt").is_err());
        assert!(split_args("--name 'Bolt").is_err());
    }
}
