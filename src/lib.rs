pub mod config;
pub mod dispatch;
pub mod error;
pub mod filter;
pub mod key;
pub mod pairing;
pub mod payload;
pub mod share;
pub mod sweep;
pub mod types;

pub use config::{ShareConfig, SweepConfig};
pub use dispatch::{DispatchController, HttpSender, SendCapability, SendResult};
pub use error::{Result, SweepError};
pub use filter::{filter_records, parse_threshold};
pub use key::classify;
pub use pairing::{group_records, PairingResult};
pub use payload::extract_payload;
pub use share::{FileLister, GatewayLister};
pub use sweep::{post_listing, run_listing, run_sweep};
pub use types::{
    DispatchOutcome, DocumentKey, DocumentPair, FileRecord, Payload, Role, RunSummary, TimeField,
};
