// src/noyau/verif.rs
//
// Vérification / typage des jetons
// --------------------------------
// Un seul passage sur les jetons bruts :
// - nombres        : lecture décimale (séparateurs `_` entre chiffres)
// - opérateurs     : parenthèses, unaire vs binaire
// - identifiants   : appel `f(...)` (arité comptée) ou constante
// Puis l’équilibre des valeurs (même parcours que le shunting-yard) :
// chaque groupe, chaque argument, l’expression entière produisent EXACTEMENT une valeur.

use std::ops::Range;

use super::decimal;
use super::erreur::{ErreurExpr, GenreErreur};
use super::jetons::{arguments_appel, Emplacement, GenreJeton, Jeton, JetonResolu, Sens};
use super::registre::{self, Calcul};

/// Imbrication maximale des parenthèses (borne la récursion des phases suivantes).
pub const PROFONDEUR_MAX: usize = 256;

/// Résout chaque jeton brut vers une entrée du registre, puis valide l’équilibre.
pub fn verifier(jetons: &[Jeton]) -> Result<Vec<JetonResolu>, ErreurExpr> {
    let mut resolus: Vec<JetonResolu> = Vec::with_capacity(jetons.len());
    let mut ouvertes: Vec<usize> = Vec::new();

    for (i, j) in jetons.iter().enumerate() {
        let sens = match j.genre {
            GenreJeton::Nombre => {
                let v = decimal::depuis_texte(&j.texte).ok_or_else(|| {
                    ErreurExpr::new(
                        GenreErreur::Resolution,
                        format!("nombre invalide : `{}`", j.texte),
                        j.emplacement,
                    )
                })?;
                Sens::Nombre(v)
            }
            GenreJeton::Operateur => resoudre_operateur(jetons, &resolus, &mut ouvertes, i)?,
            GenreJeton::Identifiant => resoudre_identifiant(jetons, i)?,
        };

        resolus.push(JetonResolu {
            texte: j.texte.clone(),
            emplacement: j.emplacement,
            sens,
        });
    }

    if let Some(&k) = ouvertes.last() {
        return Err(ErreurExpr::new(
            GenreErreur::Structurelle,
            "parenthèse ouvrante non fermée",
            jetons[k].emplacement,
        ));
    }

    let plage = 0..resolus.len();
    equilibrer(&mut resolus, plage)?;
    Ok(resolus)
}

fn resoudre_operateur(
    jetons: &[Jeton],
    resolus: &[JetonResolu],
    ouvertes: &mut Vec<usize>,
    i: usize,
) -> Result<Sens, ErreurExpr> {
    let j = &jetons[i];

    let inattendue = || {
        ErreurExpr::new(
            GenreErreur::Structurelle,
            "parenthèse fermante inattendue",
            j.emplacement,
        )
    };

    let arite = match j.texte.as_str() {
        "(" => {
            ouvertes.push(i);
            if ouvertes.len() > PROFONDEUR_MAX {
                return Err(ErreurExpr::new(
                    GenreErreur::Structurelle,
                    "expression trop imbriquée",
                    j.emplacement,
                ));
            }
            0
        }
        ")" => {
            let k = ouvertes.pop().ok_or_else(inattendue)?;
            // `()` : seulement pour une fonction sans argument
            if k + 1 == i {
                let appel_vide = k
                    .checked_sub(1)
                    .and_then(|f| resolus.get(f))
                    .and_then(|f| f.identifiant())
                    .is_some_and(|f| !f.variable && f.arite == 0);
                if !appel_vide {
                    return Err(inattendue());
                }
            }
            0
        }
        "," => 0,
        _ => {
            let unaire = i == 0 || {
                let p = &jetons[i - 1];
                p.genre == GenreJeton::Operateur && p.texte != ")"
            };
            if unaire {
                1
            } else {
                2
            }
        }
    };

    registre::operateur(&j.texte, arite)
        .map(Sens::Operateur)
        .ok_or_else(|| {
            ErreurExpr::new(
                GenreErreur::Resolution,
                format!("opérateur inconnu : `{}/{}`", j.texte, arite),
                j.emplacement,
            )
        })
}

fn resoudre_identifiant(jetons: &[Jeton], i: usize) -> Result<Sens, ErreurExpr> {
    let j = &jetons[i];

    let appel = jetons
        .get(i + 1)
        .is_some_and(|p| p.genre == GenreJeton::Operateur && p.texte == "(");

    if appel {
        let n = arguments_appel(jetons, i + 1)?.arguments.len();
        return registre::fonction(&j.texte, n)
            .map(Sens::Identifiant)
            .ok_or_else(|| {
                ErreurExpr::new(
                    GenreErreur::Resolution,
                    format!("fonction inconnue `{}/{}`", j.texte, n),
                    j.emplacement,
                )
            });
    }

    registre::variable(&j.texte)
        .map(Sens::Identifiant)
        .ok_or_else(|| {
            ErreurExpr::new(
                GenreErreur::Resolution,
                format!("identifiant inconnu : `{}`", j.texte),
                j.emplacement,
            )
        })
}

/* ------------------------ Équilibre des valeurs ------------------------ */

enum Attente {
    /// `(` : nombre de valeurs du niveau englobant, indice du jeton
    Groupe { valeurs: usize, ouvrante: usize },
    /// opérateur non encore appliqué (indice du jeton)
    Operateur(usize),
}

/// Compteur de valeurs d’un niveau (expression, argument ou groupe).
struct Niveau {
    valeurs: usize,
    derniere: Option<usize>,
}

impl Niveau {
    fn nouveau() -> Self {
        Self {
            valeurs: 0,
            derniere: None,
        }
    }

    fn valeur(&mut self, i: usize) {
        self.valeurs += 1;
        self.derniere = Some(i);
    }

    /// Exactement une valeur sur `etendue`.
    fn conclure(&self, resolus: &[JetonResolu], etendue: Emplacement) -> Result<(), ErreurExpr> {
        match (self.valeurs, self.derniere) {
            (1, _) => Ok(()),
            (0, _) | (_, None) => Err(ErreurExpr::new(
                GenreErreur::Equilibre,
                "aucune valeur produite",
                etendue,
            )),
            (_, Some(d)) => Err(ErreurExpr::new(
                GenreErreur::Equilibre,
                "trop de valeurs produites",
                resolus[d].emplacement,
            )),
        }
    }
}

/// Applique (virtuellement) l’opérateur en `k`.
///
/// Seul cas particulier : un `-` binaire face à une seule valeur devient unaire.
fn reduire(resolus: &mut [JetonResolu], k: usize, niveau: &mut Niveau) -> Result<(), ErreurExpr> {
    let Some(op) = resolus[k].operateur() else {
        return Err(ErreurExpr::new(
            GenreErreur::Interne,
            "opérateur attendu",
            resolus[k].emplacement,
        ));
    };

    let arite = op.arite as usize;
    if niveau.valeurs >= arite {
        niveau.valeurs = niveau.valeurs - arite + 1;
        return Ok(());
    }

    if op.calcul == Calcul::Soustraction && niveau.valeurs == 1 {
        if let Some(moins) = registre::operateur("-", 1) {
            resolus[k].sens = Sens::Operateur(moins);
            return Ok(());
        }
    }

    Err(ErreurExpr::new(
        GenreErreur::Equilibre,
        format!("pas assez d’arguments pour `{}`", op.nom),
        resolus[k].emplacement,
    ))
}

fn etendue(resolus: &[JetonResolu], plage: &Range<usize>) -> Emplacement {
    match (resolus.get(plage.start), plage.end.checked_sub(1).and_then(|f| resolus.get(f))) {
        (Some(a), Some(b)) if plage.start < plage.end => a.emplacement.union(b.emplacement),
        _ => Emplacement::default(),
    }
}

/// Vérifie que `plage` produit exactement une valeur (récursif sur les arguments d’appel).
pub fn equilibrer(resolus: &mut [JetonResolu], plage: Range<usize>) -> Result<(), ErreurExpr> {
    let mut niveau = Niveau::nouveau();
    let mut attente: Vec<Attente> = Vec::new();

    let mut i = plage.start;
    while i < plage.end {
        match resolus[i].sens.clone() {
            Sens::Nombre(_) => niveau.valeur(i),

            Sens::Identifiant(id) if id.variable => niveau.valeur(i),

            Sens::Identifiant(_) => {
                let appel = arguments_appel(resolus, i + 1)?;
                for argument in appel.arguments {
                    equilibrer(resolus, argument)?;
                }
                niveau.valeur(i);
                i = appel.fermante + 1;
                continue;
            }

            Sens::Operateur(op) => match op.calcul {
                Calcul::Ouvrante => {
                    attente.push(Attente::Groupe {
                        valeurs: niveau.valeurs,
                        ouvrante: i,
                    });
                    niveau = Niveau::nouveau();
                }

                Calcul::Fermante => {
                    while let Some(a) = attente.pop() {
                        match a {
                            Attente::Operateur(k) => reduire(resolus, k, &mut niveau)?,
                            Attente::Groupe { valeurs, ouvrante } => {
                                let groupe = ouvrante..i + 1;
                                niveau.conclure(resolus, etendue(resolus, &groupe))?;
                                niveau = Niveau {
                                    valeurs: valeurs + 1,
                                    derniere: Some(i),
                                };
                                break;
                            }
                        }
                    }
                }

                Calcul::Virgule => {
                    return Err(ErreurExpr::new(
                        GenreErreur::Structurelle,
                        "virgule inattendue",
                        resolus[i].emplacement,
                    ));
                }

                _ => {
                    while let Some(Attente::Operateur(k)) = attente.last() {
                        let k = *k;
                        let dessus = resolus[k].operateur().map_or(0, |o| o.precedence);
                        if dessus < op.precedence {
                            break;
                        }
                        attente.pop();
                        reduire(resolus, k, &mut niveau)?;
                    }
                    attente.push(Attente::Operateur(i));
                }
            },
        }
        i += 1;
    }

    while let Some(a) = attente.pop() {
        if let Attente::Operateur(k) = a {
            reduire(resolus, k, &mut niveau)?;
        }
    }

    niveau.conclure(resolus, etendue(resolus, &plage))
}
