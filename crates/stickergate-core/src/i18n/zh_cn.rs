//! Simplified Chinese strings.

pub(super) const STRINGS: &[(&str, &str)] = &[
    ("action.ban", "封禁"),
    ("action.help", "/action [kick|mute|ban] - 查看或设置对验证失败用户采取的措施"),
    ("action.kick", "移出"),
    ("action.mute", "禁言"),
    ("action.query", "当前对验证失败用户采取的措施是<b>{}</b>。"),
    (
        "bot.angry",
        "<b>我的管理员权限被收回了，我先走了。</b>重新给我管理员权限并使用 /enable 即可恢复验证。",
    ),
    (
        "bot.not_admin",
        "操作失败。我需要本群的<b>删除消息</b>和<b>封禁用户</b>管理员权限。",
    ),
    ("cmd.bad_param", "参数不合法。"),
    ("cmd.need_reply", "使用此命令需要回复一条消息。"),
    ("cmd.not_admin", "抱歉，此命令仅限拥有<b>封禁用户</b>权限的管理员使用。"),
    ("cmd.not_in_group", "请在群组中使用此命令。"),
    ("debug.help", "/debug [on|off] - 切换调试模式（在日志中记录更多细节）"),
    ("debug.off", "调试模式<b>已关闭</b>。"),
    ("debug.on", "调试模式<b>已开启</b>。"),
    ("disable.help", "/disable - 在本群停用验证"),
    ("enable.help", "/enable - 在本群启用验证"),
    ("fail.help", "/fail - 回复某用户的消息或入群通知，强制该用户验证失败"),
    ("help.help", "/help - 查看此帮助"),
    ("help.title", "<b>Stickergate</b> - 新成员贴纸验证"),
    ("id.help", "/id - 查看本群的 id"),
    ("lang.help", "/lang [code] - 查看或设置本群的语言"),
    ("lang.query", "当前语言：<code>{}</code>\n\n可用语言：{}"),
    ("onfail.default", "$u 未通过验证。"),
    ("onfail.help", "/onfail [template] - 查看或设置发给验证失败用户的消息模板"),
    ("onfail.query", "当前发给验证失败用户的消息模板：\n<pre>{}</pre>"),
    (
        "onjoin.default",
        "你好 $u！本群已开启验证，请在 $t 秒内发送任意一张贴纸完成验证。",
    ),
    (
        "onjoin.help",
        "/onjoin [template] - 查看或设置发给新入群用户的消息模板。<b>模板应当告诉他们发送一张贴纸来完成验证。</b>",
    ),
    ("onjoin.query", "当前发给新入群用户的消息模板：\n<pre>{}</pre>"),
    ("onpass.default", "$u 通过了验证。"),
    ("onpass.help", "/onpass [template] - 查看或设置发给验证通过用户的消息模板"),
    ("onpass.query", "当前发给验证通过用户的消息模板：\n<pre>{}</pre>"),
    ("pass.help", "/pass - 回复某用户的消息或入群通知，让该用户跳过验证"),
    ("ping.help", "/ping - 我还活着吗？"),
    ("quiet.help", "/quiet [on|off] - 切换安静模式（让群组尽量安静）"),
    ("quiet.off", "安静模式<b>已关闭</b>。"),
    ("quiet.on", "安静模式<b>已开启</b>。"),
    ("refresh.help", "/refresh - 刷新自己或被回复用户的缓存状态"),
    ("reverify.help", "/reverify - 回复某成员的消息或入群通知，重新发起验证"),
    ("status.disable", "本群的验证<b>已停用</b>。"),
    ("status.enable", "本群的验证<b>已启用</b>。"),
    ("status.help", "/status - 查看本群是否已启用验证"),
    (
        "template.help",
        "模板支持这些变量：提及用户 => <code>$u</code>，仅以 id 提及 => <code>$i</code>，超时秒数 => <code>$t</code>，字面 <code>$</code> => <code>$$</code>。",
    ),
    ("timeout.help", "/timeout [seconds] - 查看或设置本群的验证超时时间"),
    ("timeout.notice", "<b>嗯……这对人类来说会不会太短了？</b>"),
    ("timeout.query", "本群的验证超时时间是 <b>{} 秒</b>。"),
    ("verbose.help", "/verbose [on|off] - 切换详细模式（保留所有消息）"),
    ("verbose.off", "详细模式<b>已关闭</b>。"),
    ("verbose.on", "详细模式<b>已开启</b>。"),
];
