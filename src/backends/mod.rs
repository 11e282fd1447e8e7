/// Built-in collaborator implementations.
pub mod cmudict;
pub mod energy;
pub mod hepburn;
pub mod hyphen;
pub mod precomputed;

pub use cmudict::CmuDict;
pub use energy::EnergyDetector;
pub use hepburn::HepburnRomanizer;
pub use hyphen::VowelGroupHyphenator;
pub use precomputed::{PrecomputedAligner, PrecomputedTranscriber};
