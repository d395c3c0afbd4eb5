// src/noyau/registre.rs
//
// Registre des opérateurs et identifiants
// ---------------------------------------
// Tables statiques, clés uniques :
// - opérateur   : (texte, arité)
// - identifiant : (texte, arité, variable)
//
// Le calcul est un enum (Calcul / Fonction) dispatché par `match`.

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{Signed, Zero};
use rand::{Rng, RngCore};
use std::sync::OnceLock;

use super::decimal::{self, PRECISION_TRAVAIL};
use super::erreur::ErreurCalcul;

/* ------------------------ Opérateurs ------------------------ */

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Calcul {
    Ouvrante,
    Fermante,
    Virgule,
    Addition,
    PlusUnaire,
    Soustraction,
    MoinsUnaire,
    Multiplication,
    Division,
    DivisionEntiere,
    Modulo,
    Puissance,
    Racine,
    Increment,
    Decrement,
}

#[derive(Debug, PartialEq, Eq)]
pub struct Operateur {
    pub texte: &'static str,
    pub nom: &'static str,
    /// Plus grand = lie plus fort.
    pub precedence: u8,
    /// 0 pour `(`, `)` et `,`.
    pub arite: u8,
    pub calcul: Calcul,
}

pub static OPERATEURS: [Operateur; 15] = [
    Operateur { texte: "(", nom: "parenthèse ouvrante", precedence: 0, arite: 0, calcul: Calcul::Ouvrante },
    Operateur { texte: ")", nom: "parenthèse fermante", precedence: 0, arite: 0, calcul: Calcul::Fermante },
    Operateur { texte: ",", nom: "virgule", precedence: 0, arite: 0, calcul: Calcul::Virgule },
    Operateur { texte: "+", nom: "addition", precedence: 1, arite: 2, calcul: Calcul::Addition },
    Operateur { texte: "-", nom: "soustraction", precedence: 1, arite: 2, calcul: Calcul::Soustraction },
    Operateur { texte: "*", nom: "multiplication", precedence: 2, arite: 2, calcul: Calcul::Multiplication },
    Operateur { texte: "/", nom: "division", precedence: 2, arite: 2, calcul: Calcul::Division },
    Operateur { texte: "//", nom: "division entière", precedence: 2, arite: 2, calcul: Calcul::DivisionEntiere },
    Operateur { texte: "%", nom: "modulo", precedence: 2, arite: 2, calcul: Calcul::Modulo },
    Operateur { texte: "^", nom: "puissance", precedence: 3, arite: 2, calcul: Calcul::Puissance },
    Operateur { texte: "@", nom: "racine", precedence: 3, arite: 2, calcul: Calcul::Racine },
    Operateur { texte: "+", nom: "plus unaire", precedence: 4, arite: 1, calcul: Calcul::PlusUnaire },
    Operateur { texte: "-", nom: "moins unaire", precedence: 4, arite: 1, calcul: Calcul::MoinsUnaire },
    Operateur { texte: "++", nom: "incrément", precedence: 4, arite: 1, calcul: Calcul::Increment },
    Operateur { texte: "--", nom: "décrément", precedence: 4, arite: 1, calcul: Calcul::Decrement },
];

impl Operateur {
    /// `(`, `)` ou `,` : ne calcule rien.
    pub fn est_structurel(&self) -> bool {
        self.arite == 0
    }

    /// Applique l’opérateur ; `args` dans l’ordre du texte (gauche d’abord).
    pub fn appliquer(&self, args: &[BigRational]) -> Result<BigRational, ErreurCalcul> {
        debug_assert_eq!(args.len(), self.arite as usize, "arité de `{}`", self.texte);

        let r = match (self.calcul, args) {
            (Calcul::Addition, [l, r]) => l + r,
            (Calcul::Soustraction, [l, r]) => l - r,
            (Calcul::Multiplication, [l, r]) => l * r,
            (Calcul::Division, [l, r]) => {
                if r.is_zero() {
                    return Err(ErreurCalcul::DivisionParZero);
                }
                decimal::arrondir(&(l / r), PRECISION_TRAVAIL)
            }
            (Calcul::DivisionEntiere, [l, r]) => {
                if r.is_zero() {
                    return Err(ErreurCalcul::DivisionParZero);
                }
                (l / r).round()
            }
            (Calcul::Modulo, [l, r]) => {
                if r.is_zero() {
                    return Err(ErreurCalcul::ModuloParZero);
                }
                // reste tronqué : signe du dividende
                l % r
            }
            (Calcul::Puissance, [l, r]) => decimal::puissance(l, r)?,
            (Calcul::Racine, [l, r]) => decimal::racine_n(l, r)?,
            (Calcul::PlusUnaire, [v]) => v.clone(),
            (Calcul::MoinsUnaire, [v]) => -v,
            (Calcul::Increment, [v]) => v + BigRational::from_integer(BigInt::from(1)),
            (Calcul::Decrement, [v]) => v - BigRational::from_integer(BigInt::from(1)),
            // structurels ou arité incohérente : rien à calculer
            _ => return Err(ErreurCalcul::Interne),
        };
        Ok(r)
    }
}

/// Opérateur de texte et d’arité donnés.
pub fn operateur(texte: &str, arite: u8) -> Option<&'static Operateur> {
    OPERATEURS
        .iter()
        .find(|o| o.texte == texte && o.arite == arite)
}

/// Textes d’opérateurs distincts, les plus longs d’abord (`++` avant `+`).
pub fn textes_operateurs() -> &'static [&'static str] {
    static TEXTES: OnceLock<Vec<&'static str>> = OnceLock::new();
    TEXTES.get_or_init(|| {
        let mut v: Vec<&'static str> = OPERATEURS.iter().map(|o| o.texte).collect();
        v.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()).then(a.cmp(b)));
        v.dedup();
        v
    })
}

/* ------------------------ Identifiants ------------------------ */

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fonction {
    Pi,
    E,
    Sqrt,
    Root,
    Abs,
    Round,
    RoundPlaces,
    RoundUp,
    RoundUpPlaces,
    Floor,
    Ceil,
    Sin,
    Cos,
    Tan,
    Rad,
    Min,
    Max,
    Rand,
}

#[derive(Debug, PartialEq, Eq)]
pub struct Identifiant {
    pub texte: &'static str,
    pub nom: &'static str,
    /// Constante sans parenthèses (arité 0).
    pub variable: bool,
    pub arite: u8,
    pub fonction: Fonction,
}

pub static IDENTIFIANTS: [Identifiant; 18] = [
    Identifiant { texte: "Pi", nom: "pi", variable: true, arite: 0, fonction: Fonction::Pi },
    Identifiant { texte: "e", nom: "e", variable: true, arite: 0, fonction: Fonction::E },
    Identifiant { texte: "sqrt", nom: "racine carrée", variable: false, arite: 1, fonction: Fonction::Sqrt },
    Identifiant { texte: "root", nom: "racine n-ième", variable: false, arite: 2, fonction: Fonction::Root },
    Identifiant { texte: "abs", nom: "valeur absolue", variable: false, arite: 1, fonction: Fonction::Abs },
    Identifiant { texte: "round", nom: "arrondi", variable: false, arite: 1, fonction: Fonction::Round },
    Identifiant { texte: "round", nom: "arrondi", variable: false, arite: 2, fonction: Fonction::RoundPlaces },
    Identifiant { texte: "roundUp", nom: "arrondi supérieur", variable: false, arite: 1, fonction: Fonction::RoundUp },
    Identifiant { texte: "roundUp", nom: "arrondi supérieur", variable: false, arite: 2, fonction: Fonction::RoundUpPlaces },
    Identifiant { texte: "floor", nom: "partie entière", variable: false, arite: 1, fonction: Fonction::Floor },
    Identifiant { texte: "ceil", nom: "plafond", variable: false, arite: 1, fonction: Fonction::Ceil },
    Identifiant { texte: "sin", nom: "sinus", variable: false, arite: 1, fonction: Fonction::Sin },
    Identifiant { texte: "cos", nom: "cosinus", variable: false, arite: 1, fonction: Fonction::Cos },
    Identifiant { texte: "tan", nom: "tangente", variable: false, arite: 1, fonction: Fonction::Tan },
    Identifiant { texte: "rad", nom: "radians", variable: false, arite: 1, fonction: Fonction::Rad },
    Identifiant { texte: "min", nom: "minimum", variable: false, arite: 2, fonction: Fonction::Min },
    Identifiant { texte: "max", nom: "maximum", variable: false, arite: 2, fonction: Fonction::Max },
    Identifiant { texte: "rand", nom: "aléatoire", variable: false, arite: 0, fonction: Fonction::Rand },
];

fn pi_travail() -> BigRational {
    static PI: OnceLock<BigRational> = OnceLock::new();
    PI.get_or_init(|| decimal::pi(PRECISION_TRAVAIL)).clone()
}

fn e_travail() -> BigRational {
    static E: OnceLock<BigRational> = OnceLock::new();
    E.get_or_init(|| decimal::e(PRECISION_TRAVAIL)).clone()
}

/// Second argument de round/roundUp : entier obligatoire.
fn places(x: &BigRational) -> Result<i64, ErreurCalcul> {
    if !x.is_integer() {
        return Err(ErreurCalcul::ArgumentNonEntier);
    }
    decimal::vers_i64_borne(x)
}

impl Identifiant {
    /// Applique la fonction (ou lit la constante) ; `args` dans l’ordre d’appel.
    pub fn appliquer(
        &self,
        args: &[BigRational],
        alea: &mut dyn RngCore,
    ) -> Result<BigRational, ErreurCalcul> {
        debug_assert_eq!(args.len(), self.arite as usize, "arité de `{}`", self.texte);

        let deux = || BigRational::from_integer(BigInt::from(2));

        let r = match (self.fonction, args) {
            (Fonction::Pi, []) => pi_travail(),
            (Fonction::E, []) => e_travail(),
            (Fonction::Sqrt, [v]) => decimal::racine_n(v, &deux())?,
            (Fonction::Root, [v, n]) => decimal::racine_n(v, n)?,
            (Fonction::Abs, [v]) => v.abs(),
            (Fonction::Round, [v]) => decimal::arrondir_a(v, 0),
            (Fonction::RoundPlaces, [v, n]) => decimal::arrondir_a(v, places(n)?),
            (Fonction::RoundUp, [v]) => decimal::arrondir_haut_a(v, 0),
            (Fonction::RoundUpPlaces, [v, n]) => decimal::arrondir_haut_a(v, places(n)?),
            (Fonction::Floor, [v]) => v.floor(),
            (Fonction::Ceil, [v]) => v.ceil(),
            (Fonction::Sin, [v]) => decimal::sin(v, PRECISION_TRAVAIL)?,
            (Fonction::Cos, [v]) => decimal::cos(v, PRECISION_TRAVAIL)?,
            (Fonction::Tan, [v]) => decimal::tan(v, PRECISION_TRAVAIL)?,
            (Fonction::Rad, [v]) => {
                if v.is_zero() {
                    BigRational::zero()
                } else {
                    let pi = decimal::pi(PRECISION_TRAVAIL + 10);
                    let r = pi * v / BigRational::from_integer(BigInt::from(180));
                    decimal::arrondir(&r, PRECISION_TRAVAIL)
                }
            }
            // égalité : le second
            (Fonction::Min, [a, b]) => if a < b { a.clone() } else { b.clone() },
            // égalité : le premier
            (Fonction::Max, [a, b]) => if a >= b { a.clone() } else { b.clone() },
            (Fonction::Rand, []) => {
                let x: f64 = alea.gen();
                decimal::depuis_f64(x).ok_or(ErreurCalcul::Interne)?
            }
            _ => return Err(ErreurCalcul::Interne),
        };
        Ok(r)
    }
}

/// Constante (identifiant variable) de ce nom.
pub fn variable(texte: &str) -> Option<&'static Identifiant> {
    IDENTIFIANTS.iter().find(|i| i.variable && i.texte == texte)
}

/// Fonction de ce nom prenant `arite` arguments.
pub fn fonction(texte: &str, arite: usize) -> Option<&'static Identifiant> {
    IDENTIFIANTS
        .iter()
        .find(|i| !i.variable && i.texte == texte && i.arite as usize == arite)
}
