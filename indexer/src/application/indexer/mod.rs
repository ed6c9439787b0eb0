pub mod block_reader;
pub mod processor;
pub mod retry;
pub mod transition;

pub use block_reader::BlockReader;
pub use processor::BlockProcessor;
pub use retry::RetryHandler;
pub use transition::TransitionEngine;
