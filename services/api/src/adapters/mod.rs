pub mod chat_llm;
pub mod credential_file;

pub use chat_llm::OpenAiChatAdapter;
pub use credential_file::FileCredentialSlot;
