//! Stateless inline-mode calculation
//!
//! A query typed after the bot's username is answered with exactly one
//! article. No session state is read or written.

use crate::calculator::{compute_wins_needed, parse_matches, parse_rate};
use crate::state_machine::BotContext;
use crate::texts;
use uuid::Uuid;

/// A single inline result; `message_text` is HTML
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineArticle {
    pub id: String,
    pub title: String,
    pub description: String,
    pub message_text: String,
}

impl InlineArticle {
    fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        message_text: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            description: description.into(),
            message_text: message_text.into(),
        }
    }
}

/// Build the article answering an inline query.
///
/// The query must be exactly `matches current desired`; rates accept a comma
/// as the decimal separator.
pub fn answer_query(query: &str, context: &BotContext) -> InlineArticle {
    let query = query.trim();
    if query.is_empty() {
        return InlineArticle::new(
            "📊 Winrate Calculator",
            "Type: matches current_WR desired_WR (e.g. 100 55 60)",
            texts::inline_usage(&context.bot_username),
        );
    }

    let Some((matches, current_rate, desired_rate)) = parse_query(query) else {
        return InlineArticle::new(
            "❌ Invalid format",
            "Use: matches current_WR desired_WR (e.g. 100 55 60)",
            texts::inline_invalid_format(&context.bot_username),
        );
    };

    match compute_wins_needed(matches, current_rate, desired_rate) {
        Ok(calc) => InlineArticle::new(
            format!("✅ Need {} wins", calc.wins_needed),
            format!("{matches} matches ({current_rate}% → {desired_rate}%)"),
            texts::calculation_result(matches, current_rate, desired_rate, &calc),
        ),
        Err(e) => InlineArticle::new(
            "❌ Invalid data",
            e.to_string(),
            texts::calculation_error(&e),
        ),
    }
}

fn parse_query(query: &str) -> Option<(i64, f64, f64)> {
    let mut parts = query.split_whitespace();
    let (Some(matches), Some(current), Some(desired), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return None;
    };
    Some((
        parse_matches(matches)?,
        parse_rate(current)?,
        parse_rate(desired)?,
    ))
}
