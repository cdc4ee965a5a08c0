//! Locale string tables.
//!
//! A pure lookup: locale x key x args -> string. Unknown locales fall back
//! to the default locale; unknown keys fall back to the default locale's
//! entry, then to a visible `{{key}}` marker so a missing translation shows
//! up in chat instead of vanishing silently.

mod en_us;
mod zh_cn;

use std::collections::HashMap;
use std::sync::OnceLock;

/// Locale used when a chat has no `lang` set or names an unknown one.
pub const DEFAULT_LANG: &str = "en_US";

const LANGS: &[(&str, &[(&str, &str)])] = &[("en_US", en_us::STRINGS), ("zh_CN", zh_cn::STRINGS)];

type Table = HashMap<&'static str, &'static str>;

fn tables() -> &'static HashMap<&'static str, Table> {
    static TABLES: OnceLock<HashMap<&'static str, Table>> = OnceLock::new();
    TABLES.get_or_init(|| {
        LANGS
            .iter()
            .map(|(lang, strings)| (*lang, strings.iter().copied().collect()))
            .collect()
    })
}

/// All available locale codes, formatted for chat display.
pub fn all_langs() -> String {
    LANGS
        .iter()
        .map(|(lang, _)| format!("<code>{lang}</code>"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Look up `key` in `lang` and substitute `{}` placeholders with `args`
/// in order. Surplus placeholders are left as-is; surplus args are dropped.
pub fn format(lang: &str, key: &str, args: &[&str]) -> String {
    let tables = tables();
    let fallback = &tables[DEFAULT_LANG];
    let table = tables.get(lang).unwrap_or(fallback);

    let Some(template) = table.get(key).or_else(|| fallback.get(key)) else {
        tracing::warn!(lang, key, "missing i18n key");
        return format!("{{{{{key}}}}}");
    };

    let mut parts = template.split("{}");
    let mut out = String::with_capacity(template.len());
    if let Some(first) = parts.next() {
        out.push_str(first);
    }
    let mut args = args.iter();
    for part in parts {
        out.push_str(args.next().copied().unwrap_or("{}"));
        out.push_str(part);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_key_in_known_lang() {
        let s = format("en_US", "status.enable", &[]);
        assert!(s.contains("enabled"), "got: {s}");
    }

    #[test]
    fn unknown_lang_falls_back_to_default() {
        assert_eq!(
            format("fr_FR", "status.enable", &[]),
            format("en_US", "status.enable", &[])
        );
    }

    #[test]
    fn key_missing_in_lang_falls_back_to_default() {
        // Every zh_CN key also exists in en_US, so probe the reverse:
        // a key present in en_US resolves even when zh_CN lacks it.
        let s = format("zh_CN", "ping.pong", &["3s"]);
        assert!(s.contains("3s"));
    }

    #[test]
    fn unknown_key_yields_marker() {
        assert_eq!(format("en_US", "no.such.key", &[]), "{{no.such.key}}");
    }

    #[test]
    fn args_substitute_in_order() {
        let s = format("en_US", "lang.query", &["en_US", "<code>zh_CN</code>"]);
        assert!(s.contains("en_US"));
        assert!(s.contains("<code>zh_CN</code>"));
    }

    #[test]
    fn surplus_placeholders_survive() {
        let s = format("en_US", "lang.query", &["en_US"]);
        assert!(s.contains("{}"), "got: {s}");
    }

    #[test]
    fn all_langs_lists_every_table() {
        let s = all_langs();
        assert!(s.contains("<code>en_US</code>"));
        assert!(s.contains("<code>zh_CN</code>"));
    }

    #[test]
    fn every_lang_covers_the_default_templates() {
        // The three hook defaults must exist everywhere; they are sent
        // verbatim into chats.
        for (lang, _) in LANGS {
            for key in ["onjoin.default", "onpass.default", "onfail.default"] {
                let s = format(lang, key, &[]);
                assert!(!s.starts_with("{{"), "{lang} missing {key}");
            }
        }
    }
}
