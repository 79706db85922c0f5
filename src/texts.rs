//! Outbound message bodies
//!
//! Every body is Telegram HTML. Text that came from a user is passed through
//! [`escape_html`] before it is embedded.

use crate::calculator::{progress_bar, CalcError, Calculation};
use crate::state_machine::{PendingAdminMessage, UserId};
use std::fmt::Write;

const DIVIDER: &str = "━━━━━━━━━━━━━━━━━━━━━━━━";

pub const WELCOME: &str = "┏━━━━━━━━━━━━━━━━━━━━━━\n\
┃  🎮 <b>WINRATE CALCULATOR</b> 🎮\n\
┗━━━━━━━━━━━━━━━━━━━━━━\n\n\
👋 Hi! I calculate how many wins in a row you need to reach the win rate you want.\n\n\
🎯 <b>What I can do:</b>\n\
• Calculate the number of wins you need\n\
• Show detailed statistics\n\
• Work in group chats (inline mode)\n\n\
💡 Use the buttons below to navigate ⬇️";

pub const QUICK_START: &str = "🚀 <b>Quick start:</b>";

pub const HELP: &str = "📖 <b>HOW TO USE</b>\n\n\
1️⃣ Press <b>\"🎯 Calculate win rate\"</b> or send /calc\n\
2️⃣ Enter the <b>number of matches</b> played (e.g. 100)\n\
3️⃣ Enter your <b>current win rate</b> in % (e.g. 55.5)\n\
4️⃣ Enter the <b>desired win rate</b> in % (e.g. 60)\n\n\
✅ The result arrives instantly!\n\n\
━━━━━━━━━━━━━━━━━━━━\n\n\
<b>💡 Commands:</b>\n\
   /calc - Start a calculation\n\
   /cancel - Cancel the current operation\n\
   /admin - Write to the administrator\n\
   /help - Show this help\n\
   /start - Main menu";

pub const ABOUT: &str = "ℹ️ <b>ABOUT</b>\n\n\
🎮 <b>Winrate Calculator</b>\n\n\
A small calculator that helps players plan their way to the win rate they want.\n\n\
💪 <b>Good luck on the battlefield!</b> 🏆";

pub const NOT_UNDERSTOOD: &str = "❓ <b>I don't understand...</b>\n\nUse the buttons below 👇";

pub const NOTHING_TO_CANCEL: &str = "⚠️ There is nothing to cancel.";

pub const CALCULATION_CANCELLED: &str =
    "❌ <b>Calculation cancelled</b>\n\nPress the button below to start again 👇";

pub const SENDING_CANCELLED: &str =
    "❌ <b>Sending cancelled</b>\n\nIf you need me, send /admin";

pub const REPLY_CANCELLED: &str = "❌ <b>Reply cancelled</b>";

pub const CALC_STEP_MATCHES: &str = "🎮 <b>WINRATE CALCULATION</b>\n\n\
📊 <b>Step 1 of 3</b>\n\n\
Enter the <b>number of matches</b> you have played 🎯\n\n\
📝 <i>Example:</i> <code>100</code>";

pub const INVALID_INTEGER: &str = "⚠️ <b>Invalid format!</b> Enter a <b>whole number</b>.";

pub const MATCHES_NOT_POSITIVE: &str =
    "⚠️ The number of matches must be <b>greater than 0</b>.";

pub const INVALID_NUMBER: &str = "⚠️ <b>Invalid format!</b> Enter a <b>number</b>.";

pub const RATE_OUT_OF_RANGE: &str = "⚠️ Win rate must be between <b>0</b> and <b>100%</b>.";

pub const WHATS_NEXT: &str = "🔄 <b>What's next?</b>";

pub const ADMIN_INTRO: &str = "💬 <b>CONTACT THE ADMINISTRATOR</b>\n\n\
👋 If you have questions or suggestions, I'm always here.\n\n\
✍️ <b>Waiting for your message...</b>";

pub const ADMIN_TEXT_ONLY: &str =
    "⚠️ Only <b>text</b> messages can be sent to the administrator. Write your message or cancel.";

pub const REPLY_TEXT_ONLY: &str =
    "⚠️ Only <b>text</b> replies can be delivered. Write your reply or send /cancel";

pub const CONFIRM_REMINDER: &str =
    "❓ Use the buttons above to send the message or cancel it.";

pub const NOTHING_TO_CONFIRM: &str = "⚠️ This message is no longer waiting to be sent.";

pub const MESSAGE_SENT: &str = "✅ <b>Message sent!</b>\n\nThanks for the feedback! 🙏";

pub const MESSAGE_FAILED: &str = "❌ <b>Sending failed!</b> Please try again later.";

pub const BACK_TO_MENU: &str = "Returning to the main menu...";

/// Escape the characters Telegram HTML treats as markup
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

pub fn calc_step_current_rate(matches: i64) -> String {
    format!(
        "✅ <b>Got it!</b> Matches: <code>{matches}</code>\n\n\
         📊 <b>Step 2 of 3:</b> Enter your <b>current win rate</b> in % 📈\n\
         📝 <i>Example:</i> <code>55.5</code>"
    )
}

pub fn calc_step_desired_rate(current_rate: f64) -> String {
    format!(
        "✅ <b>Got it!</b> Current WR: <code>{current_rate:.1}%</code>\n\n\
         📊 <b>Step 3 of 3:</b> Enter the <b>desired win rate</b> in % 🎯\n\
         📝 <i>Example:</i> <code>60</code>"
    )
}

pub fn calculation_error(error: &CalcError) -> String {
    format!("❌ <b>Error:</b> {error}")
}

/// The result card shared by the stepwise flow and inline mode
pub fn calculation_result(
    matches: i64,
    current_rate: f64,
    desired_rate: f64,
    calc: &Calculation,
) -> String {
    let mut out = String::from("✅ <b>CALCULATION COMPLETE!</b>\n\n");
    let _ = writeln!(out, "📊 <b>INPUT:</b>");
    let _ = writeln!(out, "┣ Matches: <code>{matches}</code>");
    let _ = writeln!(out, "┣ Current WR: <code>{current_rate:.1}%</code>");
    let _ = writeln!(out, "┗ Wins so far: <code>{}</code>\n", calc.current_wins);
    let _ = writeln!(out, "{}\n", progress_bar(current_rate, desired_rate));
    let _ = writeln!(out, "🎯 <b>GOAL: {desired_rate:.1}%</b>\n");
    let _ = writeln!(out, "🏆 <b>WINS NEEDED IN A ROW:</b>");
    let _ = writeln!(out, "<b><u>{} match(es)</u></b> 🔥\n", calc.wins_needed);
    let _ = writeln!(out, "📈 <b>FINAL STATISTICS:</b>");
    let _ = writeln!(out, "┣ Total matches: <code>{}</code>", calc.new_total_matches);
    let _ = writeln!(out, "┣ Total wins: <code>{}</code>", calc.new_total_wins);
    let _ = writeln!(out, "┗ Final WR: <code>{:.2}%</code>\n", calc.new_total_winrate);
    out.push_str("💪 <b>Good luck on the battlefield!</b> 🎮");
    out
}

pub fn admin_preview(text: &str) -> String {
    format!(
        "📬 <b>Message preview:</b>\n\n<i>{}</i>\n\n❓ <b>Send this to the administrator?</b>",
        escape_html(text)
    )
}

pub fn admin_notification(message: &PendingAdminMessage) -> String {
    let username = message
        .username
        .as_deref()
        .map_or_else(|| "no username".to_string(), |name| format!("@{}", escape_html(name)));
    format!(
        "📨 <b>NEW MESSAGE FROM A USER</b>\n\n\
         👤 <b>From:</b> {}\n\
         🆔 <b>User ID:</b> <code>{}</code>\n\
         📝 <b>Username:</b> {username}\n\n\
         {DIVIDER}\n\n\
         💬 <b>Message:</b>\n\n{}\n\n\
         {DIVIDER}",
        escape_html(&message.full_name),
        message.user_id,
        escape_html(&message.text),
    )
}

pub fn reply_mode(user_id: UserId) -> String {
    format!(
        "💬 <b>Reply mode</b>\n\n\
         🆔 User ID: <code>{user_id}</code>\n\n\
         ✍️ Write your reply in the next message.\n\
         The user will receive it from the bot.\n\n\
         Send /cancel to cancel"
    )
}

pub fn admin_reply_to_user(text: &str) -> String {
    format!(
        "📬 <b>REPLY FROM THE ADMINISTRATOR</b>\n\n\
         {DIVIDER}\n\n\
         {}\n\n\
         {DIVIDER}\n\n\
         💡 <i>If you have more questions, send /admin</i>",
        escape_html(text)
    )
}

pub fn reply_sent(user_id: UserId, text: &str) -> String {
    format!(
        "✅ <b>Reply sent!</b>\n\n🆔 User ID: <code>{user_id}</code>\n\n📤 Your message:\n{}",
        escape_html(text)
    )
}

pub fn reply_failed(user_id: UserId, cause: &str) -> String {
    format!(
        "❌ <b>Failed to deliver the reply to <code>{user_id}</code>!</b>\n\n\
         The user may have blocked the bot.\n\
         Error: {}",
        escape_html(cause)
    )
}

pub fn group_welcome(bot_username: &str) -> String {
    format!(
        "🎮 <b>Winrate Calculator</b>\n\n\
         👋 Hi! I'm a win rate calculator.\n\n\
         💡 <b>How to use:</b>\n\
         Type <code>@{bot_username} 100 55 60</code>\n\n\
         📋 <b>Format:</b> <code>matches current_WR desired_WR</code>\n\n\
         📝 <b>Example:</b> <code>@{bot_username} 150 52.5 60</code>\n\n\
         💡 Message me privately for the full feature set (buttons, help, contacting the administrator)!"
    )
}

pub fn inline_usage(bot_username: &str) -> String {
    format!(
        "🎮 <b>Winrate Calculator</b>\n\n\
         💡 <b>How to use:</b>\n\
         Type: <code>@{bot_username} 100 55 60</code>\n\n\
         Format: <b>matches current_WR desired_WR</b>\n\
         Example: 100 55 60"
    )
}

pub fn inline_invalid_format(bot_username: &str) -> String {
    format!(
        "❌ <b>Invalid data format</b>\n\n\
         💡 <b>Correct format:</b>\n\
         <code>@{bot_username} matches current_WR desired_WR</code>\n\n\
         <b>Example:</b>\n\
         <code>@{bot_username} 100 55 60</code>\n\n\
         Where:\n\
         • <b>100</b> - matches played\n\
         • <b>55</b> - current win rate in %\n\
         • <b>60</b> - desired win rate in %"
    )
}
