//! # Taskweave Testing Utilities
//!
//! Helpers for exercising orchestrators and tools without real backends.
//!
//! ## Components
//!
//! - **Mock Tools**: tools with canned responses and call tracking
//! - **Span Recorder**: an in-memory `tracing` layer for asserting span
//!   structure without installing a global subscriber
//!
//! ## Usage
//!
//! ```rust
//! use taskweave_testing::SpanRecorder;
//!
//! let recorder = SpanRecorder::new();
//! tracing::dispatcher::with_default(&recorder.dispatch(), || {
//!     let outer = tracing::info_span!("outer");
//!     let _enter = outer.enter();
//!     tracing::info_span!("inner").in_scope(|| {});
//! });
//!
//! let inner = recorder.find("inner").unwrap();
//! assert_eq!(recorder.parent_of(&inner).unwrap().name, "outer");
//! ```

/// Mock tools for predictable testing
pub mod mock_tools;
/// In-memory span capture
pub mod span_recorder;

pub use mock_tools::MockTool;
pub use span_recorder::{RecordedSpan, SpanRecorder};
