//! fitpc Core Library
//!
//! Anchor-based compatibility and placement for PC builds. Parts carry typed
//! attachment points (anchors); the resolver decides which parts may attach
//! to which, and the composer derives every part's world transform from
//! matched anchor pairs. No I/O beyond JSON (de)serialization.

pub mod anchor;
pub mod build;
pub mod catalog;
pub mod compat;
pub mod config;
pub mod error;
pub mod part;
pub mod placement;
pub mod store;

pub use anchor::{
    Anchor, AnchorId, AnchorRecord, AnchorRole, AnchorType, CompatibleType, ConnectionAxis, Direction,
    Vector3,
};
pub use build::{BuildComponent, BuildSelection, SavedBuild, SelectedPart, selection_from_parts};
pub use catalog::AnchorTypeDescriptor;
pub use compat::{CandidateVerdict, CatalogMatches, Verdict, catalog_matches, check, resolve};
pub use config::PlacementConfig;
pub use error::{CatalogError, CatalogResult, ConfigError};
pub use part::{BuildStep, Category, Part, PartRecord, TechnicalSpecs};
pub use placement::{PlacementKey, Placements, WorldTransform, compose};
pub use store::{AnchorPatch, AnchorStore};
