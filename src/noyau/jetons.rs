// src/noyau/jetons.rs

use num_rational::BigRational;
use std::fmt;
use std::ops::Range;

use super::decimal;
use super::erreur::{ErreurExpr, GenreErreur};
use super::registre::{self, Identifiant, Operateur};

/// Plage `[debut, fin)` en caractères (pas en octets) dans le texte source.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Emplacement {
    pub debut: usize,
    pub fin: usize,
}

impl Emplacement {
    pub fn new(debut: usize, fin: usize) -> Self {
        debug_assert!(debut <= fin);
        Self { debut, fin }
    }

    pub fn taille(&self) -> usize {
        self.fin - self.debut
    }

    /// Plus petite plage couvrant les deux.
    pub fn union(self, autre: Emplacement) -> Emplacement {
        Emplacement::new(self.debut.min(autre.debut), self.fin.max(autre.fin))
    }

    /// Ligne `   ^^^` à afficher sous `source` (tabulations recopiées pour l’alignement).
    pub fn soulignement(&self, source: &str) -> String {
        let mut s: String = source
            .chars()
            .chain(std::iter::repeat(' '))
            .take(self.debut)
            .map(|c| if c == '\t' { '\t' } else { ' ' })
            .collect();
        s.push_str(&"^".repeat(self.taille().max(1)));
        s
    }
}

impl fmt::Display for Emplacement {
    // 1-based pour l’utilisateur
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.taille() == 1 {
            write!(f, "à [{}]", self.debut + 1)
        } else {
            write!(f, "dans [{}, {}]", self.debut + 1, self.fin)
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GenreJeton {
    Nombre,
    Operateur,
    Identifiant,
}

/// Jeton brut (sortie du lexer).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Jeton {
    pub genre: GenreJeton,
    pub texte: String,
    pub emplacement: Emplacement,
}

/// Ce qu’un jeton désigne une fois vérifié.
#[derive(Clone, Debug, PartialEq)]
pub enum Sens {
    Nombre(BigRational),
    Operateur(&'static Operateur),
    Identifiant(&'static Identifiant),
}

/// Jeton résolu (sortie du vérificateur).
#[derive(Clone, Debug, PartialEq)]
pub struct JetonResolu {
    pub texte: String,
    pub emplacement: Emplacement,
    pub sens: Sens,
}

impl JetonResolu {
    pub fn operateur(&self) -> Option<&'static Operateur> {
        match self.sens {
            Sens::Operateur(o) => Some(o),
            _ => None,
        }
    }

    pub fn identifiant(&self) -> Option<&'static Identifiant> {
        match self.sens {
            Sens::Identifiant(i) => Some(i),
            _ => None,
        }
    }
}

/// Accès commun aux jetons bruts et résolus (découpage des appels).
pub trait Lexeme {
    fn texte(&self) -> &str;
    fn emplacement(&self) -> Emplacement;
}

impl Lexeme for Jeton {
    fn texte(&self) -> &str {
        &self.texte
    }
    fn emplacement(&self) -> Emplacement {
        self.emplacement
    }
}

impl Lexeme for JetonResolu {
    fn texte(&self) -> &str {
        &self.texte
    }
    fn emplacement(&self) -> Emplacement {
        self.emplacement
    }
}

/// Découpage d’un appel `f( a , b , ... )`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Appel {
    /// Plages d’indices de jetons, une par argument (vide pour `f()`).
    pub arguments: Vec<Range<usize>>,
    /// Indice du `)` fermant.
    pub fermante: usize,
}

/// Découpe les arguments de premier niveau de l’appel dont le `(` est en `ouvrante`.
///
/// Un argument vide à côté d’une virgule est une erreur sur cette virgule.
pub fn arguments_appel<J: Lexeme>(jetons: &[J], ouvrante: usize) -> Result<Appel, ErreurExpr> {
    debug_assert_eq!(jetons.get(ouvrante).map(|j| j.texte()), Some("("));

    let virgule_vide = |k: usize| {
        ErreurExpr::new(
            GenreErreur::Structurelle,
            "argument vide autour de la virgule",
            jetons[k].emplacement(),
        )
    };

    let mut arguments = Vec::new();
    let mut debut = ouvrante + 1;
    // `(` internes encore ouverts
    let mut ouvertes: Vec<usize> = Vec::new();

    for (i, j) in jetons.iter().enumerate().skip(ouvrante + 1) {
        match j.texte() {
            "(" => ouvertes.push(i),
            ")" if ouvertes.is_empty() => {
                if i == debut {
                    if !arguments.is_empty() {
                        // `f(1,)`
                        return Err(virgule_vide(i - 1));
                    }
                } else {
                    arguments.push(debut..i);
                }
                return Ok(Appel {
                    arguments,
                    fermante: i,
                });
            }
            ")" => {
                ouvertes.pop();
            }
            "," if ouvertes.is_empty() => {
                if i == debut {
                    // `f(,1)` ou `f(1,,2)`
                    return Err(virgule_vide(i));
                }
                arguments.push(debut..i);
                debut = i + 1;
            }
            _ => {}
        }
    }

    let k = ouvertes.last().copied().unwrap_or(ouvrante);
    Err(ErreurExpr::new(
        GenreErreur::Structurelle,
        "parenthèse ouvrante non fermée",
        jetons[k].emplacement(),
    ))
}

/* ------------------------ Lexer ------------------------ */

fn est_blanc(c: char) -> bool {
    c == ' ' || c == '\t'
}

fn est_mot(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// `[0-9_]+(\.[0-9_]+)?` à partir de `i` ; renvoie la fin.
fn lire_nombre(chars: &[char], i: usize) -> Option<usize> {
    let chiffre = |c: &char| c.is_ascii_digit() || *c == '_';

    let mut k = i;
    while chars.get(k).is_some_and(chiffre) {
        k += 1;
    }
    if k == i {
        return None;
    }
    if chars.get(k) == Some(&'.') && chars.get(k + 1).is_some_and(chiffre) {
        k += 1;
        while chars.get(k).is_some_and(chiffre) {
            k += 1;
        }
    }
    Some(k)
}

/// `[A-Za-z]\w*`
fn lire_identifiant(chars: &[char], i: usize) -> Option<usize> {
    if !chars.get(i).is_some_and(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let mut k = i + 1;
    while chars.get(k).is_some_and(|c| est_mot(*c)) {
        k += 1;
    }
    Some(k)
}

/// Plus long texte d’opérateur présent en `i`.
fn lire_operateur(chars: &[char], i: usize) -> Option<usize> {
    registre::textes_operateurs().iter().find_map(|t| {
        let n = t.chars().count();
        let ok = chars.len() >= i + n && t.chars().zip(&chars[i..i + n]).all(|(a, b)| a == *b);
        ok.then_some(i + n)
    })
}

/// Tokenize une chaîne en jetons bruts.
/// Ordre des essais à chaque position :
/// - nombre (chiffres, `_`, fraction `.` optionnelle, pas de signe)
/// - identifiant ASCII
/// - opérateur, le plus long d’abord (`++` avant `+`)
///
/// Seuls espaces et tabulations séparent les jetons.
pub fn tokenize(s: &str) -> Result<Vec<Jeton>, ErreurExpr> {
    let chars: Vec<char> = s.chars().collect();
    let mut out = Vec::new();
    let mut i: usize = 0;

    let pousser = |out: &mut Vec<Jeton>, genre: GenreJeton, debut: usize, fin: usize| {
        out.push(Jeton {
            genre,
            texte: chars[debut..fin].iter().collect(),
            emplacement: Emplacement::new(debut, fin),
        });
        fin
    };

    while i < chars.len() {
        if est_blanc(chars[i]) {
            i += 1;
            continue;
        }

        if let Some(fin) = lire_nombre(&chars, i) {
            i = pousser(&mut out, GenreJeton::Nombre, i, fin);
            continue;
        }
        if let Some(fin) = lire_identifiant(&chars, i) {
            i = pousser(&mut out, GenreJeton::Identifiant, i, fin);
            continue;
        }
        if let Some(fin) = lire_operateur(&chars, i) {
            i = pousser(&mut out, GenreJeton::Operateur, i, fin);
            continue;
        }

        // rien ne colle : tout le bloc jusqu’au prochain blanc
        let mut fin = i;
        while fin < chars.len() && !est_blanc(chars[fin]) {
            fin += 1;
        }
        let texte: String = chars[i..fin].iter().collect();
        return Err(ErreurExpr::new(
            GenreErreur::Lexicale,
            format!("jeton inconnu : `{texte}`"),
            Emplacement::new(i, fin),
        ));
    }

    Ok(out)
}

/// Format utilitaire (debug/“démarche”) : liste de jetons bruts.
pub fn format_jetons(jetons: &[Jeton]) -> String {
    jetons
        .iter()
        .map(|j| j.texte.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Format utilitaire : jetons résolus, arité explicite (`-/1`, `round/2`).
pub fn format_resolus(jetons: &[JetonResolu]) -> String {
    let mut out = Vec::new();
    for j in jetons {
        let s = match &j.sens {
            Sens::Nombre(v) => decimal::en_texte(v, decimal::PRECISION_TRAVAIL),
            Sens::Operateur(o) if o.est_structurel() => o.texte.to_string(),
            Sens::Operateur(o) => format!("{}/{}", o.texte, o.arite),
            Sens::Identifiant(id) if id.variable => id.texte.to_string(),
            Sens::Identifiant(id) => format!("{}/{}", id.texte, id.arite),
        };
        out.push(s);
    }
    out.join(" ")
}
