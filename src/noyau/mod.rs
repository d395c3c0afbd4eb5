//! Noyau décimal
//!
//! Organisation interne :
//! - decimal.rs  : décimal à précision arbitraire (arrondis, π, exp/ln, trig, racine n-ième)
//! - registre.rs : opérateurs + identifiants (tables statiques)
//! - jetons.rs   : tokenisation + découpage des appels
//! - verif.rs    : typage (unaire/binaire, arité) + équilibre des valeurs
//! - rpn.rs      : shunting-yard
//! - machine.rs  : machine à pile
//! - trace.rs    : démarche (traceur)
//! - eval.rs     : pipeline complet
//! - erreur.rs   : erreurs localisées

pub mod decimal;
pub mod erreur;
pub mod eval;
pub mod jetons;
pub mod machine;
pub mod registre;
pub mod rpn;
pub mod trace;
pub mod verif;

#[cfg(test)]
mod tests_scientifiques;

#[cfg(test)]
mod tests_fuzz_safe;

// API publique minimale
pub use erreur::ErreurExpr;
pub use eval::Executeur;
pub use jetons::Emplacement;
