//! src/app/etat.rs
//!
//! État UI : entrée, dernier résultat, historique de session, paramètres.
//!
//! Rôle : contenir l’état de la calculatrice et l’évaluateur persistant de la session,
//! et offrir des opérations simples (C/CLR/AC) sans logique d’affichage.
//!
//! Contrats :
//! - Aucun widget ici.
//! - Les variables vivent dans l’évaluateur : seul AC les oublie.
//! - Bornes sur la précision décimale.

use calculatrice_q::{format_fraction, formater, CalcError, Demarche, Evaluator, ModeSortie};
use num_rational::BigRational;

use crate::options::{PRECISION_DEFAUT, PRECISION_MAX};

/// Une ligne d’historique : expression saisie + rendu du résultat (ou de l’erreur).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ligne {
    pub expr: String,
    pub sortie: String,
    pub ok: bool,
}

#[derive(Debug)]
pub struct AppCalc {
    // --- session ---
    pub evaluateur: Evaluator,
    pub historique: Vec<Ligne>,

    // --- entrée utilisateur ---
    pub entree: String,

    // --- sorties ---
    pub valeur: Option<BigRational>, // dernier résultat exact
    pub resultat: String,            // rendu selon mode + précision
    pub fraction: String,            // forme exacte p/q
    pub erreur: String,              // message d’erreur (lexage / évaluation)

    // --- démarche (panneau d’explication) ---
    pub jetons: String,
    pub etapes: Vec<String>,

    // --- paramètres ---
    pub digits: usize,
    pub mode: ModeSortie,

    // --- UX ---
    // Permet à vue.rs de redonner le focus à l’entrée après un clic sur un bouton.
    pub focus_entree: bool,
}

impl Default for AppCalc {
    fn default() -> Self {
        Self::new(Evaluator::new(), PRECISION_DEFAUT, ModeSortie::Decimal)
    }
}

impl AppCalc {
    pub fn new(evaluateur: Evaluator, digits: usize, mode: ModeSortie) -> Self {
        Self {
            evaluateur,
            historique: Vec::new(),
            entree: String::new(),
            valeur: None,
            resultat: String::new(),
            fraction: String::new(),
            erreur: String::new(),
            jetons: String::new(),
            etapes: Vec::new(),
            digits: digits.min(PRECISION_MAX),
            mode,
            focus_entree: true, // au lancement, on veut pouvoir taper tout de suite
        }
    }

    /* ------------------------ Évaluation ------------------------ */

    /// Évalue l’entrée contre l’évaluateur de session et dépose le résultat.
    pub fn evaluer(&mut self) {
        let expr = self.entree.trim().to_string();
        if expr.is_empty() {
            self.focus_entree = true;
            return;
        }

        match self.evaluateur.run_detaille(&expr) {
            Ok(d) => self.set_resultats(expr, d),
            Err(e) => self.set_erreur(expr, &e),
        }
    }

    /// Rendu d’un résultat avec les paramètres courants.
    pub fn rendu(&self, v: &BigRational) -> String {
        formater(v, self.mode, self.digits)
    }

    /// Re-rendu du dernier résultat après un changement de mode ou de précision.
    fn rafraichir(&mut self) {
        if let Some(v) = &self.valeur {
            self.resultat = self.rendu(v);
        }
    }

    /* ------------------------ Actions “boutons” ------------------------ */

    /// AC : remise à zéro totale (entrée + résultats + historique + variables + paramètres).
    pub fn reset_total(&mut self) {
        self.entree.clear();
        self.clear_resultats();
        self.evaluateur.reset();
        self.digits = PRECISION_DEFAUT;
        self.mode = ModeSortie::Decimal;
        self.focus_entree = true;
    }

    /// C : effacer seulement l’entrée (sans toucher aux résultats).
    pub fn clear_entree(&mut self) {
        self.entree.clear();
        self.focus_entree = true;
    }

    fn clear_demarche(&mut self) {
        self.jetons.clear();
        self.etapes.clear();
    }

    /// CLR : effacer résultats + erreur + démarche + historique (variables conservées).
    pub fn clear_resultats(&mut self) {
        self.valeur = None;
        self.resultat.clear();
        self.fraction.clear();
        self.erreur.clear();
        self.historique.clear();
        self.clear_demarche();
        self.focus_entree = true;
    }

    /// Choix UX :
    /// - On CONSERVE le dernier résultat pour ne pas “effacer l’écran” sur une faute.
    /// - On coupe la démarche (non fiable si l’évaluation échoue).
    fn set_erreur(&mut self, expr: String, e: &CalcError) {
        self.erreur = e.to_string();
        self.clear_demarche();
        self.historique.push(Ligne {
            expr,
            sortie: self.erreur.clone(),
            ok: false,
        });
        self.focus_entree = true;
    }

    fn set_resultats(&mut self, expr: String, d: Demarche) {
        self.erreur.clear();
        self.resultat = self.rendu(&d.resultat);
        self.fraction = format_fraction(&d.resultat);
        self.valeur = Some(d.resultat);
        self.jetons = d.jetons;
        self.etapes = d.etapes;
        self.historique.push(Ligne {
            expr,
            sortie: self.resultat.clone(),
            ok: true,
        });
        self.focus_entree = true;
    }

    /// Garde-fou : limite digits (évite abus / gel).
    pub fn set_digits(&mut self, digits: usize) {
        self.digits = digits.min(PRECISION_MAX);
        self.rafraichir();
        self.focus_entree = true;
    }

    pub fn set_mode(&mut self, mode: ModeSortie) {
        self.mode = mode;
        self.rafraichir();
        self.focus_entree = true;
    }
}
