// src/main.rs
//
// Calculatrice décimale: point d’entrée NATIF + WEB (WASM)
// ---------------------------------------------------------
// But:
// - NATIF : expression en arguments, sinon stdin redirigé, sinon l’interface
//           (eframe::run_native + NativeOptions)
// - WEB (wasm32) : eframe::WebRunner + WebOptions + <canvas>
//
// Côté WEB (WASM) : ton index.html doit contenir un canvas :
//   <canvas id="the_canvas_id"></canvas>
//
// IMPORTANT (structure projet):
// - `impl eframe::App for AppCalc` vit dans src/app.rs
// - Ici: point d’entrée seulement (natif + web)

#![cfg_attr(target_arch = "wasm32", allow(unused_imports, dead_code))]

use eframe::egui;

mod app;
mod config;
mod noyau;

use app::AppCalc;
use noyau::{ErreurExpr, Executeur};

/// Titre unique (natif + web).
const TITRE_APP: &str = "Calculatrice décimale";

/* ------------------------ Mode ligne de commande ------------------------ */

/// Évalue une expression hors interface (arguments ou stdin).
fn evaluer_ligne(reglages: &config::Reglages, expr: &str) -> Result<String, ErreurExpr> {
    let mut executeur = match reglages.graine {
        Some(g) => Executeur::avec_graine(g),
        None => Executeur::new(),
    };
    executeur.traceur_mut().activer(reglages.verbeux);

    let r = executeur.executer(expr, reglages.precision());
    if executeur.traceur().actif() {
        eprint!("{}", executeur.traceur());
    }
    r
}

/// Message d’erreur sur trois lignes : message, entrée, soulignement.
fn rapport_erreur(expr: &str, e: &ErreurExpr) -> String {
    format!("Erreur : {e}\n{expr}\n{}", e.emplacement.soulignement(expr))
}

#[cfg(not(target_arch = "wasm32"))]
fn installer_journal(verbeux: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    // RUST_LOG l’emporte ; sinon `warn` (ou `debug` avec --verbeux)
    let defaut = if verbeux { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(defaut))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Expression à évaluer hors interface : arguments, sinon stdin redirigé.
#[cfg(not(target_arch = "wasm32"))]
fn expression_hors_interface(reglages: &config::Reglages) -> Option<String> {
    use std::io::Read;

    if let Some(expr) = reglages.expression() {
        return Some(expr);
    }
    if atty::is(atty::Stream::Stdin) {
        return None;
    }

    let mut texte = String::new();
    if let Err(e) = std::io::stdin().read_to_string(&mut texte) {
        eprintln!("Erreur : lecture de stdin impossible ({e})");
        std::process::exit(1);
    }
    Some(texte.trim().to_string())
}

/* ------------------------ Entrée NATIF (PC) ------------------------ */

#[cfg(not(target_arch = "wasm32"))]
fn main() -> eframe::Result<()> {
    use clap::Parser;

    let reglages = config::Reglages::parse();
    installer_journal(reglages.verbeux);

    if let Some(expr) = expression_hors_interface(&reglages) {
        match evaluer_ligne(&reglages, &expr) {
            Ok(v) => {
                println!("{v}");
                return Ok(());
            }
            Err(e) => {
                eprintln!("{}", rapport_erreur(&expr, &e));
                std::process::exit(1);
            }
        }
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(TITRE_APP)
            .with_inner_size([520.0, 780.0])
            .with_min_inner_size([420.0, 620.0]),
        ..Default::default()
    };

    eframe::run_native(
        TITRE_APP,
        options,
        Box::new(move |_cc| {
            let executeur = match reglages.graine {
                Some(g) => Executeur::avec_graine(g),
                None => Executeur::new(),
            };
            let mut app = AppCalc::avec_executeur(executeur);
            app.digits = reglages.precision();
            Ok(Box::new(app))
        }),
    )
}

/* ------------------------ Entrée WEB (WASM) ------------------------ */

#[cfg(target_arch = "wasm32")]
fn main() {
    // En wasm32, le démarrage réel passe par `start()` (wasm_bindgen).
}

#[cfg(target_arch = "wasm32")]
mod web {
    use super::{AppCalc, TITRE_APP};

    use wasm_bindgen::JsCast;
    use web_sys::{window, HtmlCanvasElement};

    /// ID du canvas attendu dans index.html.
    const CANVAS_ID: &str = "the_canvas_id";

    /// Point d’entrée automatique au chargement de la page.
    #[wasm_bindgen::prelude::wasm_bindgen(start)]
    pub async fn start() -> Result<(), wasm_bindgen::JsValue> {
        let w = window().ok_or_else(|| js_err("window() indisponible"))?;
        let d = w
            .document()
            .ok_or_else(|| js_err("document() indisponible"))?;

        d.set_title(TITRE_APP);

        let el = d
            .get_element_by_id(CANVAS_ID)
            .ok_or_else(|| js_err("canvas introuvable (id incorrect dans index.html)"))?;

        let canvas: HtmlCanvasElement = el
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| js_err("l’élément trouvé n’est pas un <canvas>"))?;

        eframe::WebRunner::new()
            .start(
                canvas,
                eframe::WebOptions::default(),
                Box::new(|_cc| Ok(Box::<AppCalc>::default())),
            )
            .await
    }

    fn js_err(msg: &str) -> wasm_bindgen::JsValue {
        wasm_bindgen::JsValue::from_str(msg)
    }
}
