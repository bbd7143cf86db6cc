// realco-core/src/lib.rs

// 1. Mandatory documentation for production code
#![allow(missing_docs)] // On autorise le manque de doc pour le moment

// 2. Memory safety
#![deny(unsafe_code)]
// 3. Robustness
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
// 4. Performance
#![warn(clippy::perf)]

// --- MODULES HEXAGONAUX ---

// 1. Ports (Interfaces / Traits)
// Contrat du driver d'entrepôt SQL (connect, session, statement).
pub mod ports;

// 2. Domain (Cœur du métier)
// Configuration résolue, sources unifiées, adaptateurs de lignes.
pub mod domain;

// 3. Infrastructure (Adapters)
// Résolution de config, artefact de découverte, connexion partagée, driver HTTP, mock.
pub mod infrastructure;

// 4. Application (Use Cases)
// Exécuteur read-only, catalogue, requêtes du dashboard, vérification de connectivité.
pub mod application;

// --- GESTION DES ERREURS GLOBALE ---
pub mod error;

#[cfg(test)]
pub(crate) mod testing;

// --- RE-EXPORTS (FACADE) ---
// Permet d'importer l'erreur principale facilement : use realco_core::RealcoError;
pub use error::RealcoError;
