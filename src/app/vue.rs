// src/app/vue.rs
//
// Widgets egui de la calculatrice (mêmes écrans en natif et en wasm).
// - champ d’entrée : Enter lance l’évaluation
// - boutons : insertion espacée, puis focus rendu au champ
// - panneau latéral : historique, variables, fonctions du registre
//
// egui 0.33 n’a pas de Key::NumEnter : seul Enter est écouté.

use eframe::egui;

use calculatrice_q::noyau::fonctions::noms_fonctions;
use calculatrice_q::ModeSortie;

use super::etat::AppCalc;

impl AppCalc {
    /// Panneau central (entrée, résultats, démarche).
    pub fn ui(&mut self, ui: &mut egui::Ui) {
        ui.spacing_mut().item_spacing = egui::vec2(6.0, 6.0);

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.heading("Calculatrice Q");
                ui.add_space(6.0);

                self.ui_entree(ui);

                ui.add_space(8.0);
                ui.separator();
                ui.add_space(8.0);

                self.ui_resultats(ui);

                ui.add_space(8.0);
                ui.separator();
                ui.add_space(8.0);

                self.ui_demarche(ui);
            });
    }

    fn ui_entree(&mut self, ui: &mut egui::Ui) {
        ui.label("Entrée :");

        let resp = ui.add(
            egui::TextEdit::singleline(&mut self.entree)
                .desired_width(ui.available_width())
                .hint_text("Ex: x = 2 ** 10, max(x, 0xff) % 7, 1/3 + 1/6")
                .id_source("entree_edit")
                .code_editor(),
        );

        if self.focus_entree {
            resp.request_focus();
            self.focus_entree = false;
        }

        // Enter n’évalue que si le champ a le focus
        let valider = ui.input(|i| i.key_pressed(egui::Key::Enter));
        if valider && resp.has_focus() {
            self.evaluer();
        }

        ui.add_space(6.0);

        // Actions + paramètres
        ui.horizontal(|ui| {
            // Contrat: C = entrée ; CLR = résultats + historique ; AC = tout, variables comprises
            self.bouton_action(ui, "C", "Efface seulement l’entrée", Action::ClearEntree);
            self.bouton_action(
                ui,
                "CLR",
                "Efface résultats + historique (variables conservées)",
                Action::ClearResultats,
            );
            self.bouton_action(
                ui,
                "AC",
                "Remise à zéro totale, variables comprises",
                Action::ResetTotal,
            );

            ui.separator();

            let mut mode = self.mode;
            egui::ComboBox::from_id_salt("mode_sortie")
                .selected_text(mode.nom())
                .show_ui(ui, |ui| {
                    for m in ModeSortie::TOUS {
                        ui.selectable_value(&mut mode, m, m.nom());
                    }
                });
            if mode != self.mode {
                self.set_mode(mode);
            }

            let mut d = self.digits as u32;
            let resp = ui.add(
                egui::DragValue::new(&mut d)
                    .speed(1)
                    .range(0..=200)
                    .suffix(" déc."),
            );
            if resp.changed() {
                self.set_digits(d as usize);
            }
        });

        ui.add_space(8.0);

        // Opérateurs + "="
        ui.horizontal_wrapped(|ui| {
            self.bouton_insert(ui, "(", "(", InsertKind::OpenParen);
            self.bouton_insert(ui, ")", ")", InsertKind::CloseParen);
            self.bouton_insert(ui, ",", ",", InsertKind::Comma);

            for op in ["+", "-", "*", "/", "**", "%", "&", "|", "^", "<<", ">>", "=="] {
                self.bouton_insert(ui, op, op, InsertKind::Op);
            }
            self.bouton_insert(ui, "~", "~", InsertKind::Digit);

            ui.separator();

            for (label, mot) in [("x", "x"), ("pi", "pi"), ("x =", "x = ")] {
                self.bouton_insert(ui, label, mot, InsertKind::Word);
            }

            ui.add_space(10.0);

            let eq = ui.add_sized([64.0, 32.0], egui::Button::new("Calculer"));
            if eq.clicked() {
                self.evaluer();
            }
        });

        ui.add_space(8.0);

        self.ui_pave_numerique(ui);

        if !self.erreur.is_empty() {
            ui.add_space(6.0);
            ui.colored_label(ui.visuals().error_fg_color, &self.erreur);
        }
    }

    fn ui_pave_numerique(&mut self, ui: &mut egui::Ui) {
        // dernière colonne : DEL puis préfixes de base
        const LIGNES: [[&str; 4]; 4] = [
            ["7", "8", "9", "DEL"],
            ["4", "5", "6", "0x"],
            ["1", "2", "3", "0b"],
            ["0", ".", "e", "0o"],
        ];

        egui::Grid::new("pave_numerique_q")
            .num_columns(4)
            .spacing([6.0, 6.0])
            .show(ui, |ui| {
                for ligne in LIGNES {
                    for touche in ligne {
                        if touche == "DEL" {
                            let aide = "Retire le dernier symbole";
                            self.bouton_action(ui, touche, aide, Action::Backspace);
                        } else {
                            self.bouton_insert(ui, touche, touche, InsertKind::Digit);
                        }
                    }
                    ui.end_row();
                }
            });
    }

    /// Backspace “intelligent” : retire d’un coup les motifs utiles ("sqrt(", "**", etc.).
    fn backspace_entree(&mut self) {
        if self.entree.is_empty() {
            return;
        }

        while self.entree.ends_with(' ') {
            self.entree.pop();
        }

        let motifs = noms_fonctions()
            .into_iter()
            .map(|nom| format!("{nom}("))
            .chain(["**", "<<", ">>", "==", "pi"].map(String::from));
        for pat in motifs {
            if self.entree.ends_with(pat.as_str()) {
                for _ in 0..pat.chars().count() {
                    self.entree.pop();
                }
                while self.entree.ends_with(' ') {
                    self.entree.pop();
                }
                return;
            }
        }

        self.entree.pop();
        while self.entree.ends_with(' ') {
            self.entree.pop();
        }
    }

    fn ui_resultats(&mut self, ui: &mut egui::Ui) {
        ui.label(format!("Résultat ({}) :", self.mode));
        Self::champ_monospace(ui, "resultat_out", &self.resultat, 2);

        ui.add_space(6.0);

        ui.label("Fraction exacte :");
        Self::champ_monospace(ui, "fraction_out", &self.fraction, 2);
    }

    fn ui_demarche(&mut self, ui: &mut egui::Ui) {
        egui::CollapsingHeader::new("Démarche")
            .default_open(true)
            .show(ui, |ui| {
                Self::champ_demarche(ui, "Jetons", "demarche_jetons", &self.jetons);
                let etapes = self.etapes.join("\n");
                Self::champ_demarche(ui, "Réductions", "demarche_etapes", &etapes);
            });
    }

    /// Panneau latéral : historique (clic = reprendre), variables, fonctions (clic = insérer).
    pub fn ui_session(&mut self, ui: &mut egui::Ui) {
        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                egui::CollapsingHeader::new("Historique")
                    .default_open(true)
                    .show(ui, |ui| {
                        let mut reprise = None;
                        for (i, l) in self.historique.iter().enumerate().rev() {
                            let texte = format!("{} → {}", l.expr, l.sortie);
                            let couleur = if l.ok {
                                ui.visuals().text_color()
                            } else {
                                ui.visuals().error_fg_color
                            };
                            let riche = egui::RichText::new(texte).monospace().color(couleur);
                            let resp =
                                ui.add(egui::Label::new(riche).sense(egui::Sense::click()));
                            if resp.clicked() {
                                reprise = Some(i);
                            }
                        }
                        if let Some(l) = reprise.and_then(|i| self.historique.get(i)) {
                            self.entree = l.expr.clone();
                            self.focus_entree = true;
                        }
                    });

                egui::CollapsingHeader::new("Variables")
                    .default_open(true)
                    .show(ui, |ui| {
                        for (nom, valeur) in self.evaluateur.variables() {
                            ui.monospace(format!("{nom} = {}", self.rendu(valeur)));
                        }
                    });

                egui::CollapsingHeader::new("Fonctions")
                    .default_open(false)
                    .show(ui, |ui| {
                        ui.horizontal_wrapped(|ui| {
                            for nom in noms_fonctions() {
                                let appel = format!("{nom}(");
                                self.bouton_insert(ui, nom, &appel, InsertKind::Func);
                            }
                        });
                    });
            });
    }

    fn champ_demarche(ui: &mut egui::Ui, titre: &str, id: &str, contenu: &str) {
        ui.add_space(4.0);
        ui.label(format!("{titre} :"));
        Self::champ_monospace(ui, id, contenu, 2);
    }

    fn champ_monospace(ui: &mut egui::Ui, id: &str, contenu: &str, rows: usize) {
        // lecture seule : un label dans un cadre, pas de TextEdit
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

    fn bouton_insert(&mut self, ui: &mut egui::Ui, label: &str, to_insert: &str, kind: InsertKind) {
        let resp = ui.add_sized([46.0, 28.0], egui::Button::new(label));
        if !resp.clicked() || to_insert.is_empty() {
            return;
        }
        inserer(&mut self.entree, to_insert, kind);
        self.focus_entree = true;
    }
}

/// Insère un fragment dans l’entrée avec un espacement lisible.
fn inserer(entree: &mut String, to_insert: &str, kind: InsertKind) {
    match kind {
        InsertKind::CloseParen | InsertKind::Comma => {
            while entree.ends_with(' ') {
                entree.pop();
            }
            entree.push_str(to_insert);
            if kind == InsertKind::Comma {
                entree.push(' ');
            }
        }
        InsertKind::OpenParen | InsertKind::Func => {
            let last = entree.chars().rev().find(|c| !c.is_whitespace());
            if last.is_some_and(|c| c.is_ascii_alphanumeric() || c == ')') {
                entree.push(' ');
            }
            entree.push_str(to_insert);
        }
        InsertKind::Op => {
            while entree.ends_with(' ') {
                entree.pop();
            }
            if !entree.is_empty() {
                entree.push(' ');
            }
            entree.push_str(to_insert);
            entree.push(' ');
        }
        InsertKind::Digit => {
            entree.push_str(to_insert);
        }
        InsertKind::Word => {
            // séparé d’un chiffre ou d’une `)` qui précède
            if !entree.ends_with(char::is_whitespace) {
                let last = entree.chars().last();
                if last.is_some_and(|c| c.is_ascii_digit() || c == ')') {
                    entree.push(' ');
                }
            }
            entree.push_str(to_insert);
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

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum InsertKind {
    Digit,
    Word,
    Func,
    Op,
    Comma,
    OpenParen,
    CloseParen,
}
