// src/main.rs
//
// Calculatrice Q — point d’entrée NATIF + WEB (WASM)
// --------------------------------------------------
// But:
// - NATIF : options clap ; expressions positionnelles => mode lot (stdout),
//           sinon eframe::run_native + NativeOptions
// - WEB (wasm32) : eframe::WebRunner + WebOptions + <canvas>, options par défaut
//
// Côté WEB (WASM) : index.html doit contenir un canvas :
//   <canvas id="the_canvas_id"></canvas>
//
// `impl eframe::App for AppCalc` vit dans src/app.rs ; ici, point d’entrée seulement.

#![cfg_attr(target_arch = "wasm32", allow(unused_imports))]

use eframe::egui;

mod app;
mod options;

use app::AppCalc;
use options::Options;

/// Titre de la fenêtre et de l’onglet.
const TITRE_APP: &str = "Calculatrice Q";

/* ------------------------ Natif : lot ou fenêtre ------------------------ */

#[cfg(not(target_arch = "wasm32"))]
fn installer_journal(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    // --verbose l’emporte sur RUST_LOG
    let filtre = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filtre)
        .with_writer(std::io::stderr)
        .init();
}

/// Mode lot : un résultat par ligne, erreurs sur stderr.
#[cfg(not(target_arch = "wasm32"))]
fn lot(options: &Options, mut evaluateur: calculatrice_q::Evaluator) -> std::process::ExitCode {
    use calculatrice_q::formater;

    let mut echec = false;
    for expr in &options.expressions {
        match evaluateur.run(expr) {
            Ok(v) => println!("{}", formater(&v, options.mode, options.precision())),
            Err(e) => {
                eprintln!("{expr} : {e}");
                echec = true;
            }
        }
    }

    if echec {
        std::process::ExitCode::FAILURE
    } else {
        std::process::ExitCode::SUCCESS
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    use clap::Parser;
    use std::process::ExitCode;

    let options = Options::parse();
    installer_journal(options.verbose);

    let evaluateur = match options.evaluateur() {
        Ok(ev) => ev,
        Err(e) => {
            eprintln!("--var : {e}");
            return ExitCode::FAILURE;
        }
    };

    if !options.expressions.is_empty() {
        return lot(&options, evaluateur);
    }

    let natif = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(TITRE_APP)
            .with_inner_size([720.0, 760.0])
            .with_min_inner_size([480.0, 620.0]),
        ..Default::default()
    };

    let app = AppCalc::new(evaluateur, options.precision(), options.mode);
    match eframe::run_native(TITRE_APP, natif, Box::new(|_cc| Ok(Box::new(app)))) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(erreur = %e, "interface graphique");
            ExitCode::FAILURE
        }
    }
}

/* ------------------------ Web : canvas + WebRunner ------------------------ */

#[cfg(target_arch = "wasm32")]
fn main() {
    // vide : wasm_bindgen appelle `start()` au chargement
}

#[cfg(target_arch = "wasm32")]
mod web {
    use super::{AppCalc, TITRE_APP};

    use wasm_bindgen::JsCast;
    use web_sys::{window, HtmlCanvasElement};

    const CANVAS_ID: &str = "the_canvas_id";

    /// Lance la calculatrice dans le canvas de la page (options par défaut, pas de clap).
    #[wasm_bindgen::prelude::wasm_bindgen(start)]
    pub async fn start() -> Result<(), wasm_bindgen::JsValue> {
        let document = window()
            .and_then(|w| w.document())
            .ok_or_else(|| js_err("pas de document (hors navigateur ?)"))?;
        document.set_title(TITRE_APP);

        let canvas = document
            .get_element_by_id(CANVAS_ID)
            .ok_or_else(|| js_err("pas d’élément #the_canvas_id dans la page"))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| js_err("#the_canvas_id n’est pas un <canvas>"))?;

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
