pub mod traits;
pub mod openai_compatible;

pub use traits::{ImageInput, ProviderError, VisionProvider};
pub use openai_compatible::OpenAICompatibleProvider;
