//! Primer design engine for homology-based DNA cloning.
//!
//! Given a plasmid, an edit span and an optional insert, the engine
//! produces primers whose homologous, insert and template-binding
//! regions each satisfy a target melting temperature, and keeps the
//! plasmid's annotations consistent after the simulated edit. Entry
//! points: [`primer_design::generate_primer_set`],
//! [`subcloning::generate_subcloning_set`] and [`reconcile::reconcile`].

pub mod annotation;
pub mod dna_sequence;
pub mod error;
pub mod feature_location;
pub mod genetic_code;
pub mod iupac_code;
pub mod melting_temperature;
pub mod primer_design;
pub mod primer_export;
pub mod primer_extension;
pub mod reconcile;
pub mod subcloning;
