// src/noyau/trace.rs
//
// Traceur (la “démarche”) : lignes texte écrites à chaque frontière de phase.
// Purement observationnel : aucune phase ne lit ce qui est écrit ici.

use std::fmt;

#[derive(Clone, Debug, Default)]
pub struct Traceur {
    actif: bool,
    texte: String,
}

impl Traceur {
    pub fn activer(&mut self, actif: bool) {
        self.actif = actif;
    }

    pub fn actif(&self) -> bool {
        self.actif
    }

    /// Ajoute `titre : contenu` (si actif) ; émet toujours un événement `debug`.
    pub fn ecrire(&mut self, titre: &str, contenu: &str) {
        tracing::debug!(phase = titre, "{contenu}");
        if !self.actif {
            return;
        }
        if !self.texte.is_empty() {
            self.texte.push('\n');
        }
        self.texte.push_str(titre);
        self.texte.push_str(" : ");
        self.texte.push_str(contenu);
    }

    pub fn nettoyer(&mut self) {
        self.texte.clear();
    }

    pub fn texte(&self) -> &str {
        &self.texte
    }
}

impl fmt::Display for Traceur {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.texte)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn inactif_n_ecrit_rien() {
        let mut t = Traceur::default();
        t.ecrire("Jetons", "1 + 2");
        assert_eq!(t.texte(), "");
    }

    #[test]
    fn lignes_et_nettoyage() {
        let mut t = Traceur::default();
        t.activer(true);
        t.ecrire("Jetons", "1 + 2");
        t.ecrire("Résultat", "3");
        assert_eq!(t.to_string(), "Jetons : 1 + 2\nRésultat : 3");
        t.nettoyer();
        assert_eq!(t.texte(), "");
        assert!(t.actif());
    }
}
