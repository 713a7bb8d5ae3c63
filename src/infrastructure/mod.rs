pub mod memory_store;
pub mod mongo_store;
pub mod question_store;

pub use memory_store::MemoryStore;
pub use mongo_store::MongoStore;
pub use question_store::QuestionStore;
