//! Conversion between stored interaction records and display messages.

use std::collections::HashSet;

use crate::models::interaction::InteractionRecord;
use crate::models::message::{DisplayMessage, MessageRole};

pub fn user_message_id(record: &InteractionRecord) -> String {
    format!("{}-user", record.id)
}

pub fn bot_message_id(record: &InteractionRecord) -> String {
    format!("{}-bot", record.id)
}

/// Expand records into display messages: for each record, in order, the
/// user's query immediately followed by the bot's reply. Both carry the
/// record's timestamp.
pub fn expand_records(records: &[InteractionRecord]) -> Vec<DisplayMessage> {
    let mut messages = Vec::with_capacity(records.len() * 2);

    for record in records {
        messages.push(DisplayMessage {
            id: user_message_id(record),
            text: record.user_query.clone(),
            role: MessageRole::User,
            timestamp: record.created_at,
            context_used: None,
            is_error: None,
        });
        messages.push(DisplayMessage {
            id: bot_message_id(record),
            text: record.bot_response.clone().unwrap_or_default(),
            role: MessageRole::Bot,
            timestamp: record.created_at,
            context_used: Some(record.pdf_context_used),
            is_error: record.is_error.then_some(true),
        });
    }

    messages
}

/// Merge freshly loaded messages into the ones already on screen.
///
/// Incoming messages whose id is already present are dropped. The rest are
/// merged by timestamp into `current` without reordering it; on equal
/// timestamps the message already on screen comes first.
pub fn merge_messages(current: &[DisplayMessage], incoming: &[DisplayMessage]) -> Vec<DisplayMessage> {
    let mut seen: HashSet<&str> = current.iter().map(|m| m.id.as_str()).collect();

    let mut fresh: Vec<&DisplayMessage> = incoming
        .iter()
        .filter(|m| seen.insert(m.id.as_str()))
        .collect();
    fresh.sort_by_key(|m| m.timestamp);

    let mut merged = Vec::with_capacity(current.len() + fresh.len());
    let mut existing = current.iter().peekable();
    let mut fresh = fresh.into_iter().peekable();

    loop {
        let take_fresh = match (existing.peek(), fresh.peek()) {
            (Some(old), Some(new)) => new.timestamp < old.timestamp,
            (None, Some(_)) => true,
            (Some(_), None) => false,
            (None, None) => break,
        };

        let next = if take_fresh { fresh.next() } else { existing.next() };
        if let Some(message) = next {
            merged.push(message.clone());
        }
    }

    merged
}
