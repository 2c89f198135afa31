pub mod chat;
pub mod credentials;
pub mod domain;
pub mod draft;
pub mod ports;
pub mod qa;
pub mod session;
pub mod store;

pub use chat::{ChatRequest, QuickAction, RequestPolicy};
pub use credentials::CredentialStore;
pub use domain::{
    BlockKind, ContentBlock, ContentBlockError, Credential, ImageSource, Lesson, LessonDraft,
    LessonId, LessonSummary, QaEntry, Role,
};
pub use draft::{DraftBuilder, DraftError};
pub use ports::{ChatCompletionService, CredentialSlot, PortError, PortResult};
pub use qa::{QaError, QuestionAnswerEngine, ViewingSession};
pub use session::{SessionContext, SessionError};
pub use store::LessonStore;
