use docchat_core::history::{expand_records, merge_messages};
use docchat_core::models::interaction::{InteractionRecord, NewInteraction, ERROR_SENTINEL};
use docchat_core::models::message::{DisplayMessage, MessageRole};
use jiff::Timestamp;
use uuid::Uuid;

fn record(seconds: i64, query: &str, response: &str, context: bool) -> InteractionRecord {
    NewInteraction::reply("owner-1", query, response, context)
        .into_record(Uuid::new_v4(), Timestamp::from_second(seconds).unwrap())
}

fn message(id: &str, seconds: i64) -> DisplayMessage {
    DisplayMessage {
        id: id.to_string(),
        text: id.to_string(),
        role: MessageRole::User,
        timestamp: Timestamp::from_second(seconds).unwrap(),
        context_used: None,
        is_error: None,
    }
}

#[test]
fn no_records_expand_to_no_messages() {
    assert!(expand_records(&[]).is_empty());
}

#[test]
fn each_record_becomes_a_user_bot_pair_in_order() {
    let records = vec![
        record(100, "first?", "one", false),
        record(200, "second?", "two", true),
        record(300, "third?", "three", false),
    ];

    let messages = expand_records(&records);
    assert_eq!(messages.len(), 2 * records.len());

    for (i, record) in records.iter().enumerate() {
        let user = &messages[2 * i];
        let bot = &messages[2 * i + 1];

        assert_eq!(user.role, MessageRole::User);
        assert_eq!(user.text, record.user_query);
        assert_eq!(user.timestamp, record.created_at);

        assert_eq!(bot.role, MessageRole::Bot);
        assert_eq!(Some(bot.text.as_str()), record.bot_response.as_deref());
        assert_eq!(bot.timestamp, record.created_at);
        assert_eq!(bot.context_used, Some(record.pdf_context_used));
        assert_eq!(bot.is_error, None);
    }
}

#[test]
fn error_records_are_flagged_on_the_bot_side() {
    let record = NewInteraction::error("owner-1", "will this fail?")
        .into_record(Uuid::new_v4(), Timestamp::from_second(50).unwrap());

    let messages = expand_records(&[record]);
    assert_eq!(messages[1].text, ERROR_SENTINEL);
    assert_eq!(messages[1].is_error, Some(true));
    assert_eq!(messages[1].context_used, Some(false));
}

#[test]
fn message_ids_are_stable_across_loads() {
    let records = vec![record(10, "q", "a", false)];
    assert_eq!(expand_records(&records), expand_records(&records));
}

#[test]
fn merge_drops_duplicates_and_orders_by_timestamp() {
    let current = vec![message("b", 20), message("d", 40)];
    let incoming = vec![message("a", 10), message("b", 20), message("c", 30)];

    let merged = merge_messages(&current, &incoming);
    let ids: Vec<&str> = merged.iter().map(|m| m.id.as_str()).collect();

    assert_eq!(ids, ["a", "b", "c", "d"]);
}

#[test]
fn merge_keeps_visible_messages_first_on_equal_timestamps() {
    let current = vec![message("local", 20)];
    let incoming = vec![message("history-user", 20), message("history-bot", 20)];

    let merged = merge_messages(&current, &incoming);
    let ids: Vec<&str> = merged.iter().map(|m| m.id.as_str()).collect();

    assert_eq!(ids, ["local", "history-user", "history-bot"]);
}

#[test]
fn merging_the_same_history_twice_is_a_no_op() {
    let history = expand_records(&[record(1, "q1", "a1", false), record(2, "q2", "a2", true)]);

    let once = merge_messages(&[], &history);
    let twice = merge_messages(&once, &history);

    assert_eq!(once, twice);
}
