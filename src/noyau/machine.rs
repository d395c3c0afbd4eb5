// src/noyau/machine.rs
//
// Machine à pile : exécute la RPN sur le décimal (BigRational).

use num_rational::BigRational;
use rand::RngCore;

use super::decimal;
use super::erreur::{ErreurExpr, GenreErreur};
use super::jetons::{JetonResolu, Sens};

fn interne(message: String, jeton: &JetonResolu) -> ErreurExpr {
    ErreurExpr::new(GenreErreur::Interne, message, jeton.emplacement)
}

/// Retire les `n` derniers opérandes, dans l’ordre du texte (gauche d’abord).
fn depiler(
    pile: &mut Vec<BigRational>,
    n: usize,
    jeton: &JetonResolu,
) -> Result<Vec<BigRational>, ErreurExpr> {
    if pile.len() < n {
        debug_assert!(false, "pile vide sous `{}`", jeton.texte);
        return Err(interne(format!("pile vide sous `{}`", jeton.texte), jeton));
    }
    let debut = pile.len() - n;
    Ok(pile.split_off(debut))
}

/// Évalue une RPN ; le résultat est arrondi à `precision` décimales.
///
/// Un échec arithmétique est localisé sur l’opérateur ou l’identifiant fautif.
pub fn eval_rpn(
    rpn: &[JetonResolu],
    precision: usize,
    alea: &mut dyn RngCore,
) -> Result<BigRational, ErreurExpr> {
    let mut pile: Vec<BigRational> = Vec::with_capacity(rpn.len());

    for j in rpn {
        match j.sens {
            Sens::Nombre(ref v) => pile.push(v.clone()),

            Sens::Operateur(op) => {
                if op.est_structurel() {
                    return Err(interne(format!("`{}` en RPN", op.texte), j));
                }
                let args = depiler(&mut pile, op.arite as usize, j)?;
                let v = op.appliquer(&args).map_err(|e| {
                    ErreurExpr::new(
                        GenreErreur::Arithmetique,
                        format!("opérateur `{}` : {e}", op.texte),
                        j.emplacement,
                    )
                })?;
                pile.push(v);
            }

            Sens::Identifiant(id) => {
                let args = depiler(&mut pile, id.arite as usize, j)?;
                let v = id.appliquer(&args, alea).map_err(|e| {
                    ErreurExpr::new(
                        GenreErreur::Arithmetique,
                        format!("fonction `{}` : {e}", id.texte),
                        j.emplacement,
                    )
                })?;
                pile.push(v);
            }
        }
    }

    match pile.as_slice() {
        [v] => Ok(decimal::arrondir(v, precision)),
        _ => Err(ErreurExpr::new(
            GenreErreur::Interne,
            format!("{} valeurs en fin d’évaluation", pile.len()),
            rpn.last().map(|j| j.emplacement).unwrap_or_default(),
        )),
    }
}
