// src/noyau/erreur.rs
//
// Erreurs du noyau
// ----------------
// - ErreurExpr   : toute erreur rendue à l’appelant (message + emplacement)
// - GenreErreur  : famille (lexicale, structurelle, ...)
// - ErreurCalcul : échec arithmétique (division par zéro, racine négative, ...)
//
// Règle : chaque phase RETOURNE son erreur, aucune phase ne continue après un échec.

use std::fmt;

use super::jetons::Emplacement;

/// Famille d’erreur (utile au front-end pour trier / colorer).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GenreErreur {
    /// Jeton inconnu, texte impossible à découper.
    Lexicale,
    /// Parenthèses, virgules, imbrication.
    Structurelle,
    /// Opérateur / identifiant / fonction inconnus, nombre mal formé.
    Resolution,
    /// Pas assez d’opérandes, trop (ou pas) de valeurs.
    Equilibre,
    /// Échec de calcul à l’évaluation.
    Arithmetique,
    /// Invariant interne violé (bug, pas une faute de l’utilisateur).
    Interne,
}

impl fmt::Display for GenreErreur {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GenreErreur::Lexicale => "lexicale",
            GenreErreur::Structurelle => "structurelle",
            GenreErreur::Resolution => "résolution",
            GenreErreur::Equilibre => "équilibre",
            GenreErreur::Arithmetique => "arithmétique",
            GenreErreur::Interne => "interne",
        };
        f.write_str(s)
    }
}

/// Erreur localisée dans le texte source.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("expression {emplacement} : {message}")]
pub struct ErreurExpr {
    pub genre: GenreErreur,
    pub message: String,
    pub emplacement: Emplacement,
}

impl ErreurExpr {
    pub fn new(genre: GenreErreur, message: impl Into<String>, emplacement: Emplacement) -> Self {
        Self {
            genre,
            message: message.into(),
            emplacement,
        }
    }
}

/// Échecs arithmétiques (politique des cas limites).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ErreurCalcul {
    #[error("division par zéro")]
    DivisionParZero,

    #[error("modulo par zéro")]
    ModuloParZero,

    #[error("valeur indéfinie (0 ^ 0)")]
    ZeroPuissanceZero,

    #[error("infini")]
    Infini,

    #[error("valeur imaginaire")]
    Imaginaire,

    #[error("exposant trop grand")]
    ExposantTropGrand,

    #[error("racine d’un nombre négatif")]
    RacineNegative,

    #[error("l’indice de la racine doit être entier")]
    IndiceNonEntier,

    #[error("indice de racine nul")]
    IndiceNul,

    #[error("le second argument doit être entier")]
    ArgumentNonEntier,

    #[error("tangente indéfinie")]
    TangenteIndefinie,

    #[error("angle trop grand")]
    AngleTropGrand,

    /// Arguments incohérents avec l’entrée du registre (bug du pipeline).
    #[error("arguments incohérents")]
    Interne,
}
