// Questionnaire intake: question bank, submissions and the answer store.

pub mod handlers;
pub mod store;
