// src/app.rs
//
// Calculatrice décimale : coque eframe
// ------------------------------------
// - etat.rs : AppCalc (entrée, résultat direct, historique, démarche), testable sans fenêtre
// - vue.rs  : widgets egui (entrée, boutons, pavé, historique, panneau “Démarche”)
// - ici     : boucle eframe::App, identique natif / web
//
// Clavier :
// - Échap (global) : vide l’entrée, comme le bouton "C"
// - Enter, ArrowUp, ArrowDown : dans vue.rs, seulement quand l’entrée a le focus

pub mod etat;
pub mod vue;

pub use etat::AppCalc;

use eframe::egui;

impl eframe::App for AppCalc {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            self.clear_entree();
        }

        egui::CentralPanel::default().show(ctx, |ui| self.ui(ui));
    }
}
