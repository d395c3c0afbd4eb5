// src/app/vue.rs
//
// Vue (UI egui): natif + web
// ---------------------------
// Objectifs :
// - Même AppCalc (etat.rs) pour natif + wasm
// - Résultat en direct à chaque frappe, Enter valide (quand le champ est focus)
// - ArrowUp / ArrowDown : historique
// - Erreur soulignée sous l’entrée (`^^^`)
// - Tactile : gros boutons, focus redonné après clic (focus_entree)
//
// Note :
// - PAS de Key::NumEnter (n’existe pas dans egui 0.33.x)

use eframe::egui;

use super::etat::{AppCalc, InsertKind};

/// Fonctions proposées en boutons (texte inséré).
const FONCTIONS: [&str; 15] = [
    "sqrt(", "root(", "abs(", "round(", "roundUp(", "floor(", "ceil(", "sin(", "cos(", "tan(",
    "rad(", "min(", "max(", "rand(", ",",
];

impl AppCalc {
    /// UI principale : à appeler depuis eframe::App::update(...)
    pub fn ui(&mut self, ui: &mut egui::Ui) {
        // Densité “calc”
        ui.spacing_mut().item_spacing = egui::vec2(6.0, 6.0);

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.heading("Calculatrice décimale");
                ui.add_space(6.0);

                self.ui_entree(ui);

                ui.add_space(8.0);
                ui.separator();
                ui.add_space(8.0);

                self.ui_resultats(ui);

                ui.add_space(8.0);
                ui.separator();
                ui.add_space(8.0);

                self.ui_historique(ui);
                self.ui_demarche(ui);
            });
    }

    fn ui_entree(&mut self, ui: &mut egui::Ui) {
        ui.label("Entrée :");

        // IMPORTANT : id stable + focus contrôlé
        let resp = ui.add(
            egui::TextEdit::singleline(&mut self.entree)
                .desired_width(ui.available_width())
                .hint_text("Ex: 1/3 + sqrt(2), round(Pi, 5), max(2, 3)^2")
                .id_source("entree_edit")
                .code_editor(),
        );

        if resp.changed() {
            self.selection = None;
            self.evaluer_direct();
        }

        // Si on a cliqué un bouton, on redonne le focus
        if self.focus_entree {
            resp.request_focus();
            self.focus_entree = false;
        }

        // --- Clavier : seulement si le champ est focus ---
        // egui retire le focus d’un singleline sur Enter : on accepte les deux cas.
        let (enter, haut, bas) = ui.input(|i| {
            (
                i.key_pressed(egui::Key::Enter),
                i.key_pressed(egui::Key::ArrowUp),
                i.key_pressed(egui::Key::ArrowDown),
            )
        });
        if enter && (resp.has_focus() || resp.lost_focus()) {
            self.valider();
        }
        if resp.has_focus() && haut {
            self.historique_precedent();
        }
        if resp.has_focus() && bas {
            self.historique_suivant();
        }

        // Erreur localisée : message + soulignement monospace sous l’entrée
        if !self.erreur.is_empty() {
            let rouge = ui.visuals().error_fg_color;
            if let Some(ligne) = self.soulignement() {
                ui.label(egui::RichText::new(&self.entree).monospace().color(rouge));
                ui.label(egui::RichText::new(ligne).monospace().color(rouge));
            }
            ui.colored_label(rouge, &self.erreur);
        }

        ui.add_space(6.0);

        ui.horizontal(|ui| {
            // Contrat: C = entrée seulement ; CLR = résultats seulement ; AC = tout
            self.bouton_action(ui, "C", "Efface seulement l’entrée", Action::ClearEntree);
            self.bouton_action(
                ui,
                "CLR",
                "Efface résultats + erreur + démarche",
                Action::ClearResultats,
            );
            self.bouton_action(ui, "AC", "Remise à zéro totale", Action::ResetTotal);

            ui.separator();

            ui.label("Précision :");
            let mut d = self.digits as u32;
            let resp = ui.add(
                egui::DragValue::new(&mut d)
                    .speed(1)
                    .range(0..=crate::config::PRECISION_MAX as u32)
                    .suffix(" décimales"),
            );
            if resp.changed() {
                self.set_digits(d as usize);
            }
        });

        ui.add_space(8.0);

        // Opérateurs + constantes + "="
        ui.horizontal_wrapped(|ui| {
            self.bouton_insert(ui, "(", InsertKind::OpenParen);
            self.bouton_insert(ui, ")", InsertKind::CloseParen);

            for op in ["+", "-", "*", "/", "//", "%", "^", "@"] {
                self.bouton_insert(ui, op, InsertKind::Op);
            }

            ui.separator();

            self.bouton_insert(ui, "Pi", InsertKind::Word);
            self.bouton_insert(ui, "e", InsertKind::Word);

            ui.add_space(10.0);

            let eq = ui.add_sized([64.0, 32.0], egui::Button::new("="));
            if eq.clicked() {
                self.valider();
            }
        });

        ui.horizontal_wrapped(|ui| {
            for f in FONCTIONS {
                let kind = if f == "," { InsertKind::CloseParen } else { InsertKind::Func };
                self.bouton_insert(ui, f, kind);
            }
        });

        ui.add_space(8.0);

        self.ui_pave_numerique(ui);
    }

    fn ui_pave_numerique(&mut self, ui: &mut egui::Ui) {
        egui::Grid::new("pave_numerique")
            .num_columns(4)
            .spacing([6.0, 6.0])
            .show(ui, |ui| {
                for ligne in [["7", "8", "9"], ["4", "5", "6"], ["1", "2", "3"]] {
                    for c in ligne {
                        self.bouton_insert(ui, c, InsertKind::Digit);
                    }
                    match ligne[0] {
                        "7" => {
                            self.bouton_action(ui, "DEL", "Efface le dernier symbole", Action::Backspace)
                        }
                        "4" => self.bouton_insert(ui, "_", InsertKind::Digit),
                        _ => self.bouton_insert(ui, ".", InsertKind::Digit),
                    }
                    ui.end_row();
                }

                self.bouton_insert(ui, "0", InsertKind::Digit);
                ui.label("");
                ui.label("");
                ui.label("");
                ui.end_row();
            });
    }

    fn ui_resultats(&mut self, ui: &mut egui::Ui) {
        ui.label("Direct :");
        Self::champ_monospace(ui, "direct_out", &self.direct, 1);

        ui.add_space(6.0);

        ui.label("Résultat :");
        Self::champ_monospace(ui, "resultat_out", &self.resultat, 2);
    }

    fn ui_historique(&mut self, ui: &mut egui::Ui) {
        if self.historique.is_empty() {
            return;
        }
        let mut clic = None;
        egui::CollapsingHeader::new("Historique")
            .default_open(true)
            .show(ui, |ui| {
                for (i, e) in self.historique.iter().enumerate().rev() {
                    let choisi = self.selection == Some(i);
                    if ui
                        .selectable_label(choisi, egui::RichText::new(e).monospace())
                        .clicked()
                    {
                        clic = Some(i);
                    }
                }
            });
        if clic.is_some() {
            self.charger_historique(clic);
        }
    }

    fn ui_demarche(&mut self, ui: &mut egui::Ui) {
        egui::CollapsingHeader::new("Démarche")
            .default_open(false)
            .show(ui, |ui| {
                Self::champ_monospace(ui, "demarche_out", &self.demarche, 4);
            });
    }

    fn champ_monospace(ui: &mut egui::Ui, id: &str, contenu: &str, rows: usize) {
        // Affichage lecture seule “stable”, sans TextEdit interactif.
        egui::Frame::group(ui.style())
            .fill(ui.visuals().extreme_bg_color)
            .show(ui, |ui| {
                ui.push_id(id, |ui| {
                    ui.set_min_width(ui.available_width());
                    ui.set_min_height(
                        rows as f32 * ui.text_style_height(&egui::TextStyle::Monospace),
                    );
                    ui.monospace(contenu);
                });
            });
    }

    fn bouton_action(&mut self, ui: &mut egui::Ui, label: &str, tip: &str, action: Action) {
        let resp = ui
            .add_sized([56.0, 30.0], egui::Button::new(label))
            .on_hover_text(tip);

        if resp.clicked() {
            match action {
                Action::ClearEntree => self.clear_entree(),
                Action::ClearResultats => self.clear_resultats(),
                Action::ResetTotal => self.reset_total(),
                Action::Backspace => self.backspace_entree(),
            }
            self.focus_entree = true;
        }
    }

    fn bouton_insert(&mut self, ui: &mut egui::Ui, texte: &str, kind: InsertKind) {
        let label = texte.trim_end_matches('(');
        let label = if label.is_empty() { texte } else { label };
        if ui.add_sized([46.0, 28.0], egui::Button::new(label)).clicked() {
            self.inserer(texte, kind);
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum Action {
    ClearEntree,
    ClearResultats,
    ResetTotal,
    Backspace,
}
