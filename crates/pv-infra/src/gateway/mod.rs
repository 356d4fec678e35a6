mod gemini_poem_generator;

pub use gemini_poem_generator::{GeminiPoemGenerator, POEM_PROMPT};
