//! In-memory stand-ins for the relay's seams. Each fake is cheap to clone and clones share state, so a test can hand
//! one copy to the worker and keep another to inspect.
mod fakes;

pub use fakes::{FakeOrderSource, FakeReplicaStore, MemoryProcessedStore, RecordingReporter};
