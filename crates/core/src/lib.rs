//! tldw Core Library
//!
//! Pulls the caption transcript of a YouTube video out of its player configuration
//! and summarizes it with a chat-completion API.

pub mod error;
pub mod format;
pub mod http;
pub mod notify;
pub mod player;
pub mod provider;
pub mod summary;
pub mod timedtext;
pub mod transcript;
pub mod watch_page;

// Re-export commonly used items at crate root
pub use error::{Result, TldwError};
pub use format::{describe_transcript, preview};
pub use http::HttpOptions;
pub use notify::{Clipboard, Delivery, Notifier, Payload, StdoutNotifier, SystemClipboard, deliver};
pub use player::{CaptionTrack, HostConfig, PlayerResponse};
pub use provider::{Provider, ProviderConfig};
pub use summary::{NO_SUMMARY, SummaryConfig, request_summary};
pub use timedtext::extract_cue_texts;
pub use transcript::{Transcript, extract_transcript};
pub use watch_page::fetch_host_config;
