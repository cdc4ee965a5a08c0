//! Command token parsing.
//!
//! A command is a leading `/token`, case-insensitive, optionally suffixed
//! with `@botname`. A suffix naming a different bot means the message is
//! addressed elsewhere and must be ignored. The argument is the remainder
//! of the text after the first space, verbatim, so templates keep their
//! internal spacing.

/// Parse `text` into a lowercased command token and its raw argument.
///
/// Returns `None` when the text is not a command or is addressed to
/// another bot.
pub(super) fn parse_command<'a>(text: &'a str, botname: &str) -> Option<(String, Option<&'a str>)> {
    let rest = text.strip_prefix('/')?;
    let token = rest.split_whitespace().next().unwrap_or("");
    if token.is_empty() {
        return None;
    }

    let cmd = match token.split_once('@') {
        Some((cmd, suffix)) => {
            if !suffix.eq_ignore_ascii_case(botname) {
                return None;
            }
            cmd
        }
        None => token,
    };
    if cmd.is_empty() {
        return None;
    }

    let arg = text.split_once(' ').map(|(_, arg)| arg);
    Some((cmd.to_ascii_lowercase(), arg))
}
