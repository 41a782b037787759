use docchat_core::history::expand_records;
use docchat_core::models::interaction::NewInteraction;
use docchat_core::models::message::MessageRole;
use docchat_core::transcript::{Transcript, TranscriptAction, UploadState};
use jiff::Timestamp;
use uuid::Uuid;

fn at(seconds: i64) -> Timestamp {
    Timestamp::from_second(seconds).unwrap()
}

#[test]
fn submit_then_reply_appends_both_sides() {
    let mut transcript = Transcript::new();

    assert!(transcript.apply(TranscriptAction::SubmitQuery {
        id: "q1".into(),
        text: "Hello?".into(),
        at: at(10),
    }));
    assert!(transcript.is_awaiting_reply());

    transcript.apply(TranscriptAction::ReplyReceived {
        id: "r1".into(),
        text: "Hi.".into(),
        context_used: false,
        at: at(11),
    });

    assert!(!transcript.is_awaiting_reply());
    let roles: Vec<MessageRole> = transcript.messages().iter().map(|m| m.role).collect();
    assert_eq!(roles, [MessageRole::User, MessageRole::Bot]);
}

#[test]
fn blank_or_overlapping_queries_are_ignored() {
    let mut transcript = Transcript::new();

    assert!(!transcript.apply(TranscriptAction::SubmitQuery {
        id: "blank".into(),
        text: "   ".into(),
        at: at(1),
    }));
    assert!(transcript.apply(TranscriptAction::SubmitQuery {
        id: "q1".into(),
        text: "first".into(),
        at: at(2),
    }));
    assert!(!transcript.apply(TranscriptAction::SubmitQuery {
        id: "q2".into(),
        text: "second".into(),
        at: at(3),
    }));

    assert_eq!(transcript.messages().len(), 1);
}

#[test]
fn failed_request_shows_a_system_error() {
    let mut transcript = Transcript::new();
    transcript.apply(TranscriptAction::SubmitQuery {
        id: "q1".into(),
        text: "anything".into(),
        at: at(1),
    });
    transcript.apply(TranscriptAction::RequestFailed {
        id: "e1".into(),
        message: "internal server error".into(),
        at: at(2),
    });

    let last = transcript.messages().last().unwrap();
    assert_eq!(last.role, MessageRole::System);
    assert_eq!(last.is_error, Some(true));
    assert!(!transcript.is_awaiting_reply());
}

#[test]
fn completed_upload_provides_document_text() {
    let mut transcript = Transcript::new();
    assert_eq!(transcript.document_text(), None);

    transcript.apply(TranscriptAction::UploadStarted {
        filename: "lease.pdf".into(),
    });
    assert_eq!(
        transcript.upload(),
        &UploadState::Uploading {
            filename: "lease.pdf".into()
        }
    );

    transcript.apply(TranscriptAction::UploadCompleted {
        filename: "lease.pdf".into(),
        text: "Signed by Ada.".into(),
    });
    assert_eq!(transcript.document_text(), Some("Signed by Ada."));

    transcript.apply(TranscriptAction::UploadCleared);
    assert_eq!(transcript.document_text(), None);
}

#[test]
fn late_history_is_merged_before_visible_messages() {
    let mut transcript = Transcript::new();
    transcript.apply(TranscriptAction::SubmitQuery {
        id: "local-q".into(),
        text: "newest".into(),
        at: at(500),
    });

    let record = NewInteraction::reply("owner", "older", "older answer", false)
        .into_record(Uuid::new_v4(), at(100));
    let history = expand_records(&[record]);

    transcript.apply(TranscriptAction::HistoryLoaded(history.clone()));
    transcript.apply(TranscriptAction::HistoryLoaded(history));

    let texts: Vec<&str> = transcript.messages().iter().map(|m| m.text.as_str()).collect();
    assert_eq!(texts, ["older", "older answer", "newest"]);
}
