// src/app.rs
//
// Racine de l’interface : état (etat.rs), widgets (vue.rs) et boucle eframe.
// La même boucle sert le binaire natif et la page wasm.

pub mod etat;
pub mod vue;

pub use etat::AppCalc;

use eframe::egui;

impl eframe::App for AppCalc {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Échap vide l’entrée, comme le bouton C
        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            self.clear_entree();
        }

        egui::SidePanel::right("panneau_session")
            .resizable(true)
            .default_width(220.0)
            .show(ctx, |ui| self.ui_session(ui));

        egui::CentralPanel::default().show(ctx, |ui| self.ui(ui));
    }
}
