//! Noyau: évaluation (pipeline réel)
//!
//! tokenize -> verifier -> to_rpn -> eval_rpn -> rendu décimal
//!
//! Chaque frontière de phase écrit une ligne dans le traceur (la “démarche”).
//! Aucune phase ne continue après un échec.

use rand::rngs::StdRng;
use rand::SeedableRng;

use super::decimal::en_texte;
use super::erreur::ErreurExpr;
use super::jetons::{format_jetons, format_resolus, tokenize};
use super::machine::eval_rpn;
use super::rpn::to_rpn;
use super::trace::Traceur;
use super::verif::verifier;

/// Exécuteur : possède son traceur et sa source aléatoire (un par fil d’exécution).
#[derive(Clone, Debug)]
pub struct Executeur {
    traceur: Traceur,
    alea: StdRng,
}

impl Default for Executeur {
    fn default() -> Self {
        Self::new()
    }
}

impl Executeur {
    /// Source aléatoire tirée de l’entropie du système.
    pub fn new() -> Self {
        Self {
            traceur: Traceur::default(),
            alea: StdRng::from_entropy(),
        }
    }

    /// `rand()` déterministe (tests, `--graine`).
    pub fn avec_graine(graine: u64) -> Self {
        Self {
            traceur: Traceur::default(),
            alea: StdRng::seed_from_u64(graine),
        }
    }

    pub fn traceur(&self) -> &Traceur {
        &self.traceur
    }

    pub fn traceur_mut(&mut self) -> &mut Traceur {
        &mut self.traceur
    }

    /// Évalue `expression` ; résultat rendu avec au plus `precision` décimales.
    ///
    /// Aucun jeton (entrée vide, espaces, tabulations) : `Ok("")`.
    pub fn executer(&mut self, expression: &str, precision: usize) -> Result<String, ErreurExpr> {
        self.traceur.nettoyer();

        // 1) Jetons
        let jetons = tokenize(expression)?;
        if jetons.is_empty() {
            return Ok(String::new());
        }
        self.traceur.ecrire("Jetons", &format_jetons(&jetons));

        // 2) Typage + équilibre
        let resolus = verifier(&jetons)?;
        self.traceur.ecrire("Jetons (typés)", &format_resolus(&resolus));

        // 3) RPN
        let rpn = to_rpn(&resolus)?;
        self.traceur.ecrire("Jetons (postfixe)", &format_resolus(&rpn));

        // 4) Machine à pile
        let valeur = eval_rpn(&rpn, precision, &mut self.alea)?;
        let texte = en_texte(&valeur, precision);
        self.traceur.ecrire("Résultat", &texte);

        Ok(texte)
    }
}

/// Évalue une expression avec un exécuteur jetable (campagnes de tests).
#[cfg(test)]
pub fn eval_expression(expression: &str, precision: usize) -> Result<String, ErreurExpr> {
    Executeur::new().executer(expression, precision)
}
