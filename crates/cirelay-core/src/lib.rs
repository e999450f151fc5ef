//! cirelay core library
//!
//! Relays CI completion events into chat:
//! - `payload`: decode a loosely-typed webhook body into an [`InboundEvent`]
//! - `summary`: clean the run log and render the detailed summary
//! - `outcome`: aggregate reported job statuses into one overall result
//! - `destination`: map a repository to its report channel
//! - `notifier`: compose and post the two notification messages
//! - `relay`: the per-request pipeline tying these together
//!
//! The chat platform is reached only through the [`ChatDirectory`] trait.

pub mod chat;
pub mod destination;
pub mod error;
pub mod event;
pub mod fakes;
pub mod notifier;
pub mod obs;
pub mod outcome;
pub mod payload;
pub mod relay;
pub mod summary;
pub mod telemetry;

pub use chat::{CategoryRef, ChannelRef, ChatDirectory, ChatError, ChatResult};
pub use destination::{resolve, Destination, REPORT_CHANNEL};
pub use error::{DestinationKind, RelayError, Result};
pub use event::{repo_short_name, InboundEvent, UNKNOWN_REPO};
pub use notifier::{deliver, status_line, Notification};
pub use outcome::{JobOutcome, RunOutcome, FAILURE_ICON, SUCCESS_ICON};
pub use payload::{parse_payload, PayloadOutcome};
pub use relay::{Relay, RelayReport, RelayResponse};
pub use summary::{strip_ansi, summarize, SanitizedLog};
pub use telemetry::init_tracing;

/// cirelay core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
