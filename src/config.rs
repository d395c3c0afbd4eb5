// src/config.rs
//
// Réglages de lancement (ligne de commande + variables d’environnement).

use clap::Parser;

/// Décimales affichées par défaut.
pub const PRECISION_DEFAUT: usize = 32;

/// Garde-fou : on borne la précision (anti-abus / anti-gel).
pub const PRECISION_MAX: usize = 200;

/// Calculatrice décimale à précision arbitraire
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "calculatrice_decimale")]
#[command(about = "Évalue des expressions arithmétiques en décimal exact", long_about = None)]
#[command(allow_negative_numbers = true)]
pub struct Reglages {
    /// Décimales du résultat affiché (0..=200)
    #[arg(short, long, env = "CALC_PRECISION", default_value_t = PRECISION_DEFAUT)]
    pub precision: usize,

    /// Affiche la démarche (jetons, postfixe) et active le journal `debug`
    #[arg(short, long)]
    pub verbeux: bool,

    /// Graine de rand() (résultats reproductibles)
    #[arg(long, env = "CALC_GRAINE")]
    pub graine: Option<u64>,

    /// Expression à évaluer (sinon stdin si redirigé, sinon l’interface graphique)
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub expression: Vec<String>,
}

impl Reglages {
    /// Précision bornée à PRECISION_MAX.
    pub fn precision(&self) -> usize {
        self.precision.min(PRECISION_MAX)
    }

    /// Mots de l’expression rejoints par des espaces (None si aucun).
    pub fn expression(&self) -> Option<String> {
        if self.expression.is_empty() {
            None
        } else {
            Some(self.expression.join(" "))
        }
    }
}
