//! English (US) strings. This is the default locale; every key used
//! anywhere in the engine must appear here.

pub(super) const STRINGS: &[(&str, &str)] = &[
    ("action.ban", "ban"),
    (
        "action.help",
        "/action [kick|mute|ban] - show or set what happens to users who fail verification",
    ),
    ("action.kick", "kick"),
    ("action.mute", "mute"),
    (
        "action.query",
        "Users who fail verification are currently <b>{}</b>ed.",
    ),
    (
        "bot.angry",
        "<b>Someone took my admin rights away, so I am leaving.</b> Re-add me as an admin and /enable to resume verification.",
    ),
    (
        "bot.not_admin",
        "That did not work. I need the <b>delete messages</b> and <b>ban users</b> admin rights in this group.",
    ),
    ("cmd.bad_param", "Invalid parameter."),
    ("cmd.need_reply", "This command must be sent as a reply to a message."),
    (
        "cmd.not_admin",
        "Sorry, this command is only available to admins with the <b>ban users</b> right.",
    ),
    ("cmd.not_in_group", "Please use this command in a group."),
    (
        "debug.help",
        "/debug [on|off] - toggle debug mode (log extra detail for troubleshooting)",
    ),
    ("debug.off", "Debug mode is <b>off</b>."),
    ("debug.on", "Debug mode is <b>on</b>."),
    ("disable.help", "/disable - disable verification in this group"),
    ("enable.help", "/enable - enable verification in this group"),
    (
        "fail.help",
        "/fail - reply to a user's message or join notice to force-fail their verification",
    ),
    ("help.help", "/help - show this help message"),
    ("help.title", "<b>Stickergate</b> - sticker verification for new members"),
    ("id.help", "/id - show this chat's id"),
    ("lang.help", "/lang [code] - show or set this chat's language"),
    (
        "lang.query",
        "Current language: <code>{}</code>\n\nAvailable languages: {}",
    ),
    ("onfail.default", "$u failed verification."),
    (
        "onfail.help",
        "/onfail [template] - show or set the message template for users who fail verification",
    ),
    (
        "onfail.query",
        "Current template for users who fail verification:\n<pre>{}</pre>",
    ),
    (
        "onjoin.default",
        "Hello $u! To verify you are human, please send any sticker within $t seconds.",
    ),
    (
        "onjoin.help",
        "/onjoin [template] - show or set the message template sent to joining users. <b>It should tell them to send a sticker to pass verification.</b>",
    ),
    (
        "onjoin.query",
        "Current template sent to joining users:\n<pre>{}</pre>",
    ),
    ("onpass.default", "$u passed verification."),
    (
        "onpass.help",
        "/onpass [template] - show or set the message template for users who pass verification",
    ),
    (
        "onpass.query",
        "Current template for users who pass verification:\n<pre>{}</pre>",
    ),
    (
        "pass.help",
        "/pass - reply to a user's message or join notice to let them skip verification",
    ),
    ("ping.help", "/ping - am I still alive?"),
    ("ping.pong", "Pong! | {}"),
    (
        "quiet.help",
        "/quiet [on|off] - toggle quiet mode (keep the group as quiet as possible)",
    ),
    ("quiet.off", "Quiet mode is <b>off</b>."),
    ("quiet.on", "Quiet mode is <b>on</b>."),
    (
        "refresh.help",
        "/refresh - refresh the cached status of yourself or the replied-to user",
    ),
    (
        "reverify.help",
        "/reverify - reply to a member's message or join notice to re-run their verification",
    ),
    ("status.disable", "Verification is <b>disabled</b> in this group."),
    ("status.enable", "Verification is <b>enabled</b> in this group."),
    ("status.help", "/status - show whether verification is enabled here"),
    (
        "template.help",
        "Templates understand a few variables: mention the user => <code>$u</code>, mention by id only => <code>$i</code>, timeout in seconds => <code>$t</code>, a literal <code>$</code> => <code>$$</code>.",
    ),
    ("timeout.help", "/timeout [seconds] - show or set this group's verification timeout"),
    (
        "timeout.notice",
        "<b>Hmm, is that not a little short for a human?</b>",
    ),
    ("timeout.query", "This group's verification timeout is <b>{} seconds</b>."),
    (
        "verbose.help",
        "/verbose [on|off] - toggle verbose mode (keep every message)",
    ),
    ("verbose.off", "Verbose mode is <b>off</b>."),
    ("verbose.on", "Verbose mode is <b>on</b>."),
];
