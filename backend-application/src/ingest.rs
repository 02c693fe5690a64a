pub mod ingestor;
pub mod queue;
pub mod writer;

pub use ingestor::*;
pub use queue::*;
pub use writer::*;
