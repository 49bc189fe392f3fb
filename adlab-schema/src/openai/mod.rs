mod chat_request;
mod chat_response;

pub use chat_request::{
    ChatCompletionRequest, ChatMessage, ChatRole, ContentPart, ImageUrl, JsonSchemaFormat,
    MessageContent, ResponseFormat,
};
pub use chat_response::{
    AssistantMessage, ChatChoice, ChatCompletionResponse, OpenaiErrorBody, OpenaiErrorObject,
    Usage,
};
