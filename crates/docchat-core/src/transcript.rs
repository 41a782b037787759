//! Client-side conversation state.
//!
//! A [`Transcript`] owns everything a chat client shows: the message list,
//! the in-flight query and the uploaded document. It only changes through
//! [`Transcript::apply`].

use jiff::Timestamp;

use crate::history::merge_messages;
use crate::models::message::{DisplayMessage, MessageRole};
use crate::prompt::has_content;

#[derive(Debug, Clone, PartialEq)]
pub enum TranscriptAction {
    /// The user sent a query; shown immediately, before the server answers.
    SubmitQuery { id: String, text: String, at: Timestamp },
    ReplyReceived { id: String, text: String, context_used: bool, at: Timestamp },
    RequestFailed { id: String, message: String, at: Timestamp },
    UploadStarted { filename: String },
    UploadCompleted { filename: String, text: String },
    UploadFailed { message: String },
    UploadCleared,
    HistoryLoaded(Vec<DisplayMessage>),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum UploadState {
    #[default]
    Idle,
    Uploading { filename: String },
    Ready { filename: String, text: String },
    Failed { message: String },
}

#[derive(Debug, Clone, Default)]
pub struct Transcript {
    messages: Vec<DisplayMessage>,
    upload: UploadState,
    pending_query: Option<String>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[DisplayMessage] {
        &self.messages
    }

    pub fn upload(&self) -> &UploadState {
        &self.upload
    }

    pub fn is_awaiting_reply(&self) -> bool {
        self.pending_query.is_some()
    }

    /// Extracted document text to send with the next query, if any.
    pub fn document_text(&self) -> Option<&str> {
        match &self.upload {
            UploadState::Ready { text, .. } if has_content(text) => Some(text),
            _ => None,
        }
    }

    /// Apply one action. Returns `false` when the action was ignored: a
    /// blank query, or a second query while one is still in flight.
    pub fn apply(&mut self, action: TranscriptAction) -> bool {
        match action {
            TranscriptAction::SubmitQuery { id, text, at } => {
                if self.pending_query.is_some() || !has_content(&text) {
                    return false;
                }
                self.pending_query = Some(id.clone());
                self.messages.push(DisplayMessage {
                    id,
                    text,
                    role: MessageRole::User,
                    timestamp: at,
                    context_used: None,
                    is_error: None,
                });
            }
            TranscriptAction::ReplyReceived {
                id,
                text,
                context_used,
                at,
            } => {
                self.pending_query = None;
                self.messages.push(DisplayMessage {
                    id,
                    text,
                    role: MessageRole::Bot,
                    timestamp: at,
                    context_used: Some(context_used),
                    is_error: None,
                });
            }
            TranscriptAction::RequestFailed { id, message, at } => {
                self.pending_query = None;
                self.messages.push(DisplayMessage {
                    id,
                    text: message,
                    role: MessageRole::System,
                    timestamp: at,
                    context_used: None,
                    is_error: Some(true),
                });
            }
            TranscriptAction::UploadStarted { filename } => {
                self.upload = UploadState::Uploading { filename };
            }
            TranscriptAction::UploadCompleted { filename, text } => {
                self.upload = UploadState::Ready { filename, text };
            }
            TranscriptAction::UploadFailed { message } => {
                self.upload = UploadState::Failed { message };
            }
            TranscriptAction::UploadCleared => {
                self.upload = UploadState::Idle;
            }
            TranscriptAction::HistoryLoaded(history) => {
                self.messages = merge_messages(&self.messages, &history);
            }
        }
        true
    }
}
