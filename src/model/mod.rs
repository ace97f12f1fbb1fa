pub mod config;
pub mod intent;
pub mod item;
pub mod vocab;

pub use config::{ClientConfig, ServerConfig, TuningConfig, UiConfig};
pub use intent::{Ack, Intent, MoveDescriptor, Payload};
pub use item::{DateField, Item, ItemFlag, Outline};
pub use vocab::{ActorOption, DestinationOption, StatusOption, VocabSnapshot};
