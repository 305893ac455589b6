// src/options.rs
//
// Options en ligne de commande (clap derive).
// Sans expression positionnelle : interface graphique.
// Avec : mode lot, un résultat par ligne.

use clap::Parser;

use calculatrice_q::{CalcError, Evaluator, ModeSortie};

/// Précision décimale par défaut.
pub const PRECISION_DEFAUT: usize = 6;

/// Garde-fou : on borne la précision (anti-abus / anti-gel).
pub const PRECISION_MAX: usize = 200;

#[derive(Parser, Debug, Clone)]
#[command(name = "calculatrice_q", version, about = "Calculatrice sur rationnels exacts")]
pub struct Options {
    /// Décimales affichées pour un résultat non entier (0 à 200)
    #[arg(short, long, default_value_t = PRECISION_DEFAUT)]
    pub precision: usize,

    /// Mode de sortie : decimal, hex, binary, octal
    #[arg(short, long, default_value = "decimal")]
    pub mode: ModeSortie,

    /// Variable initiale NOM=EXPR (répétable, évaluée dans l’ordre)
    #[arg(long = "var", value_name = "NOM=EXPR")]
    pub vars: Vec<String>,

    /// Journalisation détaillée (debug)
    #[arg(short, long)]
    pub verbose: bool,

    /// Expressions à évaluer (mode lot)
    pub expressions: Vec<String>,
}

impl Options {
    pub fn precision(&self) -> usize {
        self.precision.min(PRECISION_MAX)
    }

    /// Évaluateur amorcé avec les `--var NOM=EXPR`.
    pub fn evaluateur(&self) -> Result<Evaluator, CalcError> {
        let mut ev = Evaluator::new();
        for v in &self.vars {
            let Some((nom, expr)) = v.split_once('=') else {
                return Err(CalcError::NomInvalide { nom: v.clone() });
            };
            let valeur = ev.run(expr)?;
            ev.set_variable(nom.trim(), valeur)?;
        }
        Ok(ev)
    }
}
