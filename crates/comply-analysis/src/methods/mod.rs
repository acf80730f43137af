//! Method identity and inventories.

pub mod info;
pub mod inventory;
pub mod key;
pub mod signature;

pub use info::MethodInfo;
pub use inventory::{collect_methods, InventoryOptions, MethodMap};
pub use key::{MethodKey, MethodKind};
pub use signature::{canonical_signature, normalize_signature, Signature};
