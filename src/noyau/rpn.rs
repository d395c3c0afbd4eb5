// src/noyau/rpn.rs
//
// Shunting-yard -> RPN (postfix)
// Règles:
// - nombres et constantes : sortie directe
// - `(` empilée ; `)` dépile jusqu’à `(` (jetée) ; `)` orpheline : sans effet
// - opérateur : dépile tout opérateur de précédence >= (associativité à gauche)
// - appel `f(a, b)` : chaque argument converti séparément, concaténés, puis `f`
//
// NOTE:
// - La récursion sur les arguments est bornée par PROFONDEUR_MAX (vérifiée avant).

use std::ops::Range;

use super::erreur::ErreurExpr;
use super::jetons::{arguments_appel, JetonResolu, Sens};
use super::registre::Calcul;

/// Convertit une suite de jetons résolus en RPN (notation polonaise inversée).
///
/// Exemple:
///   jetons: max ( 1 , 2 ) * 3
///   rpn:    1 2 max 3 *
pub fn to_rpn(jetons: &[JetonResolu]) -> Result<Vec<JetonResolu>, ErreurExpr> {
    let mut out = Vec::with_capacity(jetons.len());
    convertir(jetons, 0..jetons.len(), &mut out)?;
    Ok(out)
}

fn convertir(
    jetons: &[JetonResolu],
    plage: Range<usize>,
    out: &mut Vec<JetonResolu>,
) -> Result<(), ErreurExpr> {
    let mut ops: Vec<&JetonResolu> = Vec::new();

    let mut i = plage.start;
    while i < plage.end {
        let j = &jetons[i];

        match j.sens {
            Sens::Nombre(_) => out.push(j.clone()),

            Sens::Identifiant(id) if id.variable => out.push(j.clone()),

            Sens::Identifiant(_) => {
                let appel = arguments_appel(jetons, i + 1)?;
                for argument in appel.arguments {
                    convertir(jetons, argument, out)?;
                }
                out.push(j.clone());
                i = appel.fermante + 1;
                continue;
            }

            Sens::Operateur(op) => match op.calcul {
                Calcul::Ouvrante => ops.push(j),

                Calcul::Fermante => {
                    // dépile jusqu’à '(' ; pile vide => rien
                    while let Some(top) = ops.pop() {
                        if top.operateur().is_some_and(|o| o.calcul == Calcul::Ouvrante) {
                            break;
                        }
                        out.push(top.clone());
                    }
                }

                // séparateur d’arguments : déjà découpé par arguments_appel
                Calcul::Virgule => {}

                _ => {
                    while let Some(&top) = ops.last() {
                        match top.operateur() {
                            Some(t) if !t.est_structurel() && t.precedence >= op.precedence => {
                                ops.pop();
                                out.push(top.clone());
                            }
                            _ => break,
                        }
                    }
                    ops.push(j);
                }
            },
        }
        i += 1;
    }

    // vide la pile ops (les `(` restantes sont jetées)
    while let Some(top) = ops.pop() {
        if top.operateur().is_some_and(|o| !o.est_structurel()) {
            out.push(top.clone());
        }
    }

    Ok(())
}
