//! src/app/etat.rs
//!
//! État UI (sans vue).
//!
//! Rôle : contenir l’état de la calculatrice (entrée, résultat direct, historique,
//! erreur localisée, précision, démarche) et les actions qui le font évoluer.
//!
//! Contrats :
//! - Aucun affichage ici (pas d’egui) : tout est testable sans fenêtre.
//! - Le noyau est appelé à travers un seul `Executeur` (démarche + rand()).
//! - Défense en profondeur : bornes sur la précision.

use crate::config::{PRECISION_DEFAUT, PRECISION_MAX};
use crate::noyau::{Emplacement, Executeur};

/// Motifs retirés d’un bloc par DEL.
const MOTIFS_DEL: [&str; 20] = [
    "roundUp(", "round(", "floor(", "ceil(", "sqrt(", "root(", "rand(", "abs(", "sin(", "cos(",
    "tan(", "rad(", "min(", "max(", "Pi", "//", "++", "--", "e", ",",
];

/// Façon d’insérer le texte d’un bouton dans l’entrée.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InsertKind {
    Digit,
    Word,
    Func,
    Op,
    OpenParen,
    CloseParen,
}

#[derive(Clone, Debug)]
pub struct AppCalc {
    // --- entrée utilisateur ---
    pub entree: String,

    // --- sorties ---
    pub resultat: String, // dernier résultat validé (Enter / "=")
    pub direct: String,   // évaluation en direct de l’entrée
    pub erreur: String,   // message d’erreur (si l’évaluation échoue)
    pub emplacement_erreur: Option<Emplacement>,

    // --- historique (session seulement) ---
    pub historique: Vec<String>,
    pub selection: Option<usize>,
    brouillon: String, // entrée en cours avant navigation

    // --- démarche (panneau d’explication) ---
    pub demarche: String,

    // --- paramètres ---
    pub digits: usize,

    // --- UX ---
    // Permet à vue.rs de redonner le focus à l’entrée après un clic sur un bouton.
    pub focus_entree: bool,

    executeur: Executeur,
}

impl Default for AppCalc {
    fn default() -> Self {
        Self::avec_executeur(Executeur::new())
    }
}

impl AppCalc {
    pub fn avec_executeur(mut executeur: Executeur) -> Self {
        executeur.traceur_mut().activer(true);
        Self {
            entree: String::new(),
            resultat: String::new(),
            direct: String::new(),
            erreur: String::new(),
            emplacement_erreur: None,
            historique: Vec::new(),
            selection: None,
            brouillon: String::new(),
            demarche: String::new(),
            digits: PRECISION_DEFAUT,
            focus_entree: true, // au lancement, on veut pouvoir taper tout de suite
            executeur,
        }
    }

    /* ------------------------ Évaluation ------------------------ */

    /// Évaluation en direct (à chaque modification de l’entrée).
    pub fn evaluer_direct(&mut self) {
        match self.executeur.executer(&self.entree, self.digits) {
            Ok(v) => {
                self.direct = v;
                self.effacer_erreur();
            }
            Err(e) => {
                self.direct.clear();
                self.emplacement_erreur = Some(e.emplacement);
                self.erreur = e.to_string();
            }
        }
        self.demarche = self.executeur.traceur().texte().to_string();
    }

    /// Enter / "=" : valide l’entrée.
    ///
    /// Succès : résultat déposé, entrée ajoutée à l’historique puis vidée.
    /// Échec : l’entrée est conservée, l’erreur affichée.
    pub fn valider(&mut self) {
        if self.entree.trim().is_empty() {
            return;
        }

        match self.executeur.executer(&self.entree, self.digits) {
            Ok(v) => {
                let e = std::mem::take(&mut self.entree);
                if self.historique.last() != Some(&e) {
                    self.historique.push(e);
                }
                self.resultat = v;
                self.direct.clear();
                self.effacer_erreur();
                self.selection = None;
                self.brouillon.clear();
            }
            Err(e) => {
                self.emplacement_erreur = Some(e.emplacement);
                self.erreur = e.to_string();
            }
        }
        self.demarche = self.executeur.traceur().texte().to_string();
        self.focus_entree = true;
    }

    /* ------------------------ Historique ------------------------ */

    /// ArrowUp : entrée précédente.
    pub fn historique_precedent(&mut self) {
        if self.historique.is_empty() {
            return;
        }
        let i = match self.selection {
            None => self.historique.len() - 1,
            Some(i) => i.saturating_sub(1),
        };
        self.charger_historique(Some(i));
    }

    /// ArrowDown : entrée suivante ; après la dernière, retour au brouillon.
    pub fn historique_suivant(&mut self) {
        match self.selection {
            None => {}
            Some(i) if i + 1 < self.historique.len() => self.charger_historique(Some(i + 1)),
            Some(_) => self.charger_historique(None),
        }
    }

    /// Clic sur une ligne d’historique.
    pub fn charger_historique(&mut self, selection: Option<usize>) {
        match (self.selection, selection) {
            (None, None) => return,
            // on quitte le brouillon : on le garde pour le retour
            (None, Some(_)) => self.brouillon = self.entree.clone(),
            _ => {}
        }
        self.selection = selection.filter(|i| *i < self.historique.len());
        self.entree = match self.selection {
            Some(i) => self.historique[i].clone(),
            None => std::mem::take(&mut self.brouillon),
        };
        self.evaluer_direct();
        self.focus_entree = true;
    }

    /* ------------------------ Saisie ------------------------ */

    /// Insère le texte d’un bouton avec des espaces “propres”, puis réévalue.
    pub fn inserer(&mut self, texte: &str, kind: InsertKind) {
        if texte.is_empty() {
            return;
        }
        let dernier = self.entree.chars().rev().find(|c| !c.is_whitespace());
        let colle_valeur = matches!(dernier, Some(c) if c.is_ascii_alphanumeric() || c == ')');

        match kind {
            InsertKind::CloseParen => {
                self.entree.truncate(self.entree.trim_end().len());
                self.entree.push_str(texte);
            }
            InsertKind::OpenParen | InsertKind::Func | InsertKind::Word => {
                // `2 Pi` reste une erreur lisible, `2Pi` serait un jeton inconnu
                if colle_valeur && !self.entree.ends_with(char::is_whitespace) {
                    self.entree.push(' ');
                }
                self.entree.push_str(texte);
            }
            InsertKind::Op => {
                self.entree.truncate(self.entree.trim_end().len());
                if !self.entree.is_empty() {
                    self.entree.push(' ');
                }
                self.entree.push_str(texte);
                self.entree.push(' ');
            }
            InsertKind::Digit => self.entree.push_str(texte),
        }

        self.selection = None;
        self.evaluer_direct();
        self.focus_entree = true;
    }

    /// DEL “intelligent” : retire d’un coup les motifs utiles ("sin(", "Pi", "//"…).
    pub fn backspace_entree(&mut self) {
        let fin = self.entree.trim_end().len();
        self.entree.truncate(fin);

        match MOTIFS_DEL.iter().find(|m| self.entree.ends_with(*m)) {
            Some(m) => self.entree.truncate(fin - m.len()),
            None => {
                self.entree.pop();
            }
        }
        let fin = self.entree.trim_end().len();
        self.entree.truncate(fin);

        self.selection = None;
        self.evaluer_direct();
        self.focus_entree = true;
    }

    /* ------------------------ Actions “boutons” ------------------------ */

    /// AC : remise à zéro totale (entrée + résultats + historique + précision par défaut).
    pub fn reset_total(&mut self) {
        self.entree.clear();
        self.clear_resultats();
        self.historique.clear();
        self.selection = None;
        self.brouillon.clear();
        self.digits = PRECISION_DEFAUT;
        self.focus_entree = true;
    }

    /// C (et Échap) : effacer seulement l’entrée (sans toucher au résultat validé).
    pub fn clear_entree(&mut self) {
        self.entree.clear();
        self.direct.clear();
        self.effacer_erreur();
        self.selection = None;
        self.focus_entree = true;
    }

    /// CLR : effacer résultats + erreur + démarche (sans toucher à l’entrée).
    pub fn clear_resultats(&mut self) {
        self.resultat.clear();
        self.direct.clear();
        self.effacer_erreur();
        self.demarche.clear();
        self.focus_entree = true;
    }

    fn effacer_erreur(&mut self) {
        self.erreur.clear();
        self.emplacement_erreur = None;
    }

    /// Garde-fou : limite digits, puis réévalue l’entrée.
    pub fn set_digits(&mut self, digits: usize) {
        self.digits = digits.min(PRECISION_MAX);
        self.evaluer_direct();
        self.focus_entree = true;
    }

    /// Ligne `^^^` sous l’entrée, si l’erreur courante est localisée.
    pub fn soulignement(&self) -> Option<String> {
        self.emplacement_erreur
            .map(|e| e.soulignement(&self.entree))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn app() -> AppCalc {
        AppCalc::avec_executeur(Executeur::avec_graine(1))
    }

    fn taper(a: &mut AppCalc, s: &str) {
        a.entree = s.to_string();
        a.evaluer_direct();
    }

    #[test]
    fn evaluation_en_direct() {
        let mut a = app();
        taper(&mut a, "1+2*3");
        assert_eq!(a.direct, "7");
        assert!(a.erreur.is_empty());
        assert!(a.demarche.contains("Résultat : 7"));

        taper(&mut a, "1+");
        assert_eq!(a.direct, "");
        assert_eq!(a.erreur, "expression à [2] : pas assez d’arguments pour `addition`");
        assert_eq!(a.soulignement().as_deref(), Some(" ^"));
    }

    #[test]
    fn valider_remplit_l_historique() {
        let mut a = app();
        taper(&mut a, "2^10");
        a.valider();
        assert_eq!(a.resultat, "1024");
        assert_eq!(a.entree, "");
        assert_eq!(a.historique, vec!["2^10".to_string()]);

        // même entrée deux fois de suite : une seule ligne
        taper(&mut a, "2^10");
        a.valider();
        assert_eq!(a.historique.len(), 1);
    }

    #[test]
    fn valider_en_erreur_garde_l_entree() {
        let mut a = app();
        taper(&mut a, "1/0");
        a.valider();
        assert_eq!(a.entree, "1/0");
        assert!(a.historique.is_empty());
        assert_eq!(a.emplacement_erreur, Some(Emplacement::new(1, 2)));
    }

    #[test]
    fn navigation_historique() {
        let mut a = app();
        for s in ["1", "2", "3"] {
            taper(&mut a, s);
            a.valider();
        }
        a.entree = "brouillon".to_string();

        a.historique_precedent();
        assert_eq!(a.entree, "3");
        a.historique_precedent();
        a.historique_precedent();
        a.historique_precedent(); // butée en haut
        assert_eq!(a.entree, "1");
        assert_eq!(a.selection, Some(0));

        a.historique_suivant();
        assert_eq!(a.entree, "2");
        a.historique_suivant();
        a.historique_suivant(); // après la dernière : retour au brouillon
        assert_eq!(a.entree, "brouillon");
        assert_eq!(a.selection, None);
    }

    #[test]
    fn precision_et_reset() {
        let mut a = app();
        taper(&mut a, "1/3");
        a.set_digits(3);
        assert_eq!(a.direct, "0.333");
        a.set_digits(10_000);
        assert_eq!(a.digits, PRECISION_MAX);

        a.reset_total();
        assert_eq!(a.digits, PRECISION_DEFAUT);
        assert!(a.entree.is_empty() && a.direct.is_empty() && a.historique.is_empty());
    }

    #[test]
    fn insertion_des_boutons() {
        let mut a = app();
        a.inserer("1", InsertKind::Digit);
        a.inserer("2", InsertKind::Digit);
        a.inserer("+", InsertKind::Op);
        a.inserer("sqrt(", InsertKind::Func);
        a.inserer("4", InsertKind::Digit);
        a.inserer(")", InsertKind::CloseParen);
        assert_eq!(a.entree, "12 + sqrt(4)");
        assert_eq!(a.direct, "14");

        a.inserer("Pi", InsertKind::Word);
        assert_eq!(a.entree, "12 + sqrt(4) Pi");
        assert!(!a.erreur.is_empty());
    }

    #[test]
    fn del_retire_les_motifs() {
        let mut a = app();
        a.entree = "max(1, 2) // roundUp(".to_string();
        a.backspace_entree();
        assert_eq!(a.entree, "max(1, 2) //");
        a.backspace_entree();
        assert_eq!(a.entree, "max(1, 2)");
        a.backspace_entree();
        assert_eq!(a.entree, "max(1, 2");
        a.backspace_entree();
        a.backspace_entree();
        assert_eq!(a.entree, "max(1");

        a.entree.clear();
        a.backspace_entree(); // sans effet sur une entrée vide
        assert_eq!(a.entree, "");
    }

    #[test]
    fn clear_entree_efface_l_erreur() {
        let mut a = app();
        taper(&mut a, "(1");
        assert!(!a.erreur.is_empty());
        a.clear_entree();
        assert!(a.erreur.is_empty());
        assert_eq!(a.soulignement(), None);
    }
}
