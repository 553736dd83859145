//! # Inventory Model
//!
//! What the inventory collaborator hands to the target resolver: assets,
//! pages of assets, and the two knobs (selector and address policy) that say
//! which assets are in scope and which of their fields becomes an address.

pub mod asset;
pub mod selector;

pub use asset::{Asset, AssetPage, PageRequest};
pub use selector::{AddressPolicy, Selector, parse_commas};
