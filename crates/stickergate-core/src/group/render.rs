//! The `$`-variable template mini-language.
//!
//! Templates are HTML-escaped first, then variables are substituted:
//! `$u` mentions the user by name, `$i` by id only, `$t` is the current
//! timeout in seconds, `$$` is a literal dollar. Unrecognized `$x`
//! sequences are dropped.

use stickergate_types::chat::User;

/// Escape the characters that matter for HTML-mode messages.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

/// Render a template for `user` with the chat's current timeout.
pub fn render(template: &str, user: &User, timeout_secs: i64) -> String {
    let escaped = escape_html(template);
    let mut out = String::with_capacity(escaped.len());
    let mut chars = escaped.chars();
    while let Some(c) = chars.next() {
        if c != '$' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('$') => out.push('$'),
            Some('u') => {
                out.push_str(&format!(
                    r#"<a href="tg://user?id={}">{}</a>"#,
                    user.id,
                    escape_html(&user.full_name())
                ));
            }
            Some('i') => {
                out.push_str(&format!(r#"<a href="tg://user?id={0}">{0}</a>"#, user.id));
            }
            Some('t') => out.push_str(&timeout_secs.to_string()),
            // Unrecognized variable, or a trailing lone '$': dropped
            Some(_) | None => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use stickergate_types::chat::UserId;

    fn ann() -> User {
        User {
            id: UserId(7),
            first_name: "Ann".to_string(),
            last_name: None,
            username: None,
            is_bot: false,
        }
    }

    #[test]
    fn mention_literal_dollar_and_timeout() {
        let out = render("$u went $$home in $t s", &ann(), 60);
        assert_eq!(
            out,
            r#"<a href="tg://user?id=7">Ann</a> went $home in 60 s"#
        );
    }

    #[test]
    fn id_only_mention() {
        assert_eq!(render("$i", &ann(), 60), r#"<a href="tg://user?id=7">7</a>"#);
    }

    #[test]
    fn unknown_variable_dropped() {
        assert_eq!(render("a$zb", &ann(), 60), "ab");
    }

    #[test]
    fn trailing_dollar_dropped() {
        assert_eq!(render("hi$", &ann(), 60), "hi");
    }

    #[test]
    fn template_markup_is_escaped() {
        assert_eq!(
            render("<b>$t</b>", &ann(), 5),
            "&lt;b&gt;5&lt;/b&gt;"
        );
    }

    #[test]
    fn user_name_is_escaped() {
        let user = User {
            id: UserId(9),
            first_name: "<Ann>".to_string(),
            last_name: Some("& co".to_string()),
            username: None,
            is_bot: false,
        };
        let out = render("$u", &user, 60);
        assert_eq!(
            out,
            r#"<a href="tg://user?id=9">&lt;Ann&gt; &amp; co</a>"#
        );
    }
}
