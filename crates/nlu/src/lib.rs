//! Natural-language understanding for the wayfinder
//!
//! Turns a raw utterance into a tagged [`wayfinder_core::Action`] in two
//! stages:
//!
//! 1. [`resolver::EntityResolver`] maps informally-phrased location
//!    references ("bathroom 2", "gate a5", "the entrence") to canonical
//!    facility names.
//! 2. [`intent::IntentClassifier`] detects which command category the
//!    utterance belongs to via trigger-phrase containment, delegating any
//!    destination/location substring to the resolver.
//!
//! # Example
//!
//! ```
//! use wayfinder_config::{GazetteerConfig, ResolverSettings};
//! use wayfinder_nlu::resolver::EntityResolver;
//!
//! let resolver = EntityResolver::new(GazetteerConfig::builtin(), ResolverSettings::default());
//! assert_eq!(resolver.resolve("gate a5").unwrap(), "Gate A5");
//! ```

pub mod fuzzy;
pub mod intent;
pub mod normalize;
pub mod resolver;

pub use intent::IntentClassifier;
pub use resolver::{EntityResolver, ResolveError};
