//! crates/lesson_assistant_core/src/draft.rs
//!
//! Authoring-side editing of a lesson before it is handed to the store.
//! Blocks may be empty while editing; they are validated when the draft is built.

use crate::domain::{BlockKind, ContentBlock, ContentBlockError, LessonDraft};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DraftError {
    #[error("Block {index} is invalid: {source}")]
    Block {
        index: usize,
        #[source]
        source: ContentBlockError,
    },
    #[error("Block {0} does not exist in this draft")]
    NoSuchBlock(usize),
    #[error("Block {0} is not an image block")]
    NotAnImageBlock(usize),
    #[error("'{0}' is not an image content type")]
    NotAnImage(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct EditableBlock {
    kind: BlockKind,
    value: String,
}

#[derive(Debug, Clone, Default)]
pub struct DraftBuilder {
    title: String,
    system_prompt: String,
    blocks: Vec<EditableBlock>,
}

impl DraftBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> &mut Self {
        self.title = title.into();
        self
    }

    pub fn set_system_prompt(&mut self, prompt: impl Into<String>) -> &mut Self {
        self.system_prompt = prompt.into();
        self
    }

    /// Appends an empty block and returns its index.
    pub fn add_block(&mut self, kind: BlockKind) -> usize {
        self.blocks.push(EditableBlock {
            kind,
            value: String::new(),
        });
        self.blocks.len() - 1
    }

    pub fn update_block(&mut self, index: usize, value: impl Into<String>) -> Result<(), DraftError> {
        let block = self
            .blocks
            .get_mut(index)
            .ok_or(DraftError::NoSuchBlock(index))?;
        block.value = value.into();
        Ok(())
    }

    pub fn remove_block(&mut self, index: usize) -> Result<(), DraftError> {
        if index >= self.blocks.len() {
            return Err(DraftError::NoSuchBlock(index));
        }
        self.blocks.remove(index);
        Ok(())
    }

    /// Replaces an image block's value with the uploaded file as inline data.
    pub fn set_image_data(&mut self, index: usize, mime: &str, bytes: &[u8]) -> Result<(), DraftError> {
        let block = self
            .blocks
            .get(index)
            .ok_or(DraftError::NoSuchBlock(index))?;
        if block.kind != BlockKind::Image {
            return Err(DraftError::NotAnImageBlock(index));
        }
        let value = inline_image_data(mime, bytes)?;
        self.update_block(index, value)
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn build(&self) -> Result<LessonDraft, DraftError> {
        let content = self
            .blocks
            .iter()
            .enumerate()
            .map(|(index, block)| {
                ContentBlock::new(block.kind, block.value.clone())
                    .map_err(|source| DraftError::Block { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(LessonDraft {
            title: self.title.clone(),
            system_prompt: self.system_prompt.clone(),
            content,
        })
    }
}

/// Encodes image bytes as a `data:<mime>;base64,<payload>` value.
pub fn inline_image_data(mime: &str, bytes: &[u8]) -> Result<String, DraftError> {
    if !mime.starts_with("image/") {
        return Err(DraftError::NotAnImage(mime.to_string()));
    }
    Ok(format!("data:{};base64,{}", mime, BASE64.encode(bytes)))
}
