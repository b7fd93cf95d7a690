pub mod error;
pub mod memory;
pub mod session;

pub use error::{MemoryError, Result};
pub use memory::keywords::extract_keywords;
pub use memory::ranker::{type_priority, ScoreWeights, WEIGHTS};
pub use memory::store::{Entry, MemoryConfig, MemoryStore, Metadata};
pub use session::{ProjectSession, SessionManager};
