//! Flashcard - a question/answer pair owned by the host application

use serde::{Deserialize, Serialize};

/// Anything the review tracker can look up by card id.
///
/// The tracker only stores ids; callers keep the cards themselves.
pub trait CardRef {
    fn card_id(&self) -> &str;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flashcard {
    pub id: String,
    pub subject_id: String,
    pub question: String,
    pub answer: String,
}

impl CardRef for Flashcard {
    fn card_id(&self) -> &str {
        &self.id
    }
}

impl CardRef for String {
    fn card_id(&self) -> &str {
        self
    }
}

impl CardRef for &str {
    fn card_id(&self) -> &str {
        self
    }
}
