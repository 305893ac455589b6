// src/noyau/fonctions.rs
//
// Registre des fonctions prédéfinies : nom -> (arité, implémentation).
// Table statique, construite une fois, jamais modifiée.
// Les fonctions transcendantes passent par f64 puis sont ré-exactifiées.

use std::collections::HashMap;
use std::sync::OnceLock;

use num_rational::BigRational;
use num_traits::Signed;
use rand::Rng;
use tracing::info;

use super::rationnel::{
    depuis_f64, factorielle, logarithme, pgcd, plafond, plancher, racine_carree, vers_f64, vrai,
    Resultat,
};

#[derive(Clone, Copy, Debug)]
pub struct Fonction {
    /// Nombre exact d’arguments (pas de variadique).
    pub arite: usize,
    pub imp: fn(&[BigRational]) -> Resultat,
}

impl Fonction {
    const fn new(arite: usize, imp: fn(&[BigRational]) -> Resultat) -> Self {
        Self { arite, imp }
    }
}

/* ------------------------ Implémentations ------------------------ */

/// Applique une fonction f64 -> f64 au premier argument.
fn flottant(args: &[BigRational], f: fn(f64) -> f64) -> Resultat {
    depuis_f64(f(vers_f64(&args[0])))
}

fn abs(args: &[BigRational]) -> Resultat {
    Ok(args[0].abs())
}

fn ceil(args: &[BigRational]) -> Resultat {
    Ok(plafond(&args[0]))
}

fn floor(args: &[BigRational]) -> Resultat {
    Ok(plancher(&args[0]))
}

fn sin(args: &[BigRational]) -> Resultat {
    flottant(args, f64::sin)
}

fn cos(args: &[BigRational]) -> Resultat {
    flottant(args, f64::cos)
}

fn tan(args: &[BigRational]) -> Resultat {
    flottant(args, f64::tan)
}

fn asin(args: &[BigRational]) -> Resultat {
    flottant(args, f64::asin)
}

fn acos(args: &[BigRational]) -> Resultat {
    flottant(args, f64::acos)
}

fn atan(args: &[BigRational]) -> Resultat {
    flottant(args, f64::atan)
}

fn ln(args: &[BigRational]) -> Resultat {
    depuis_f64(logarithme(&args[0], f64::ln))
}

fn log(args: &[BigRational]) -> Resultat {
    depuis_f64(logarithme(&args[0], f64::log10))
}

/// logn(base, valeur)
fn logn(args: &[BigRational]) -> Resultat {
    let base = logarithme(&args[0], f64::log10);
    let valeur = logarithme(&args[1], f64::log10);
    depuis_f64(valeur / base)
}

fn max(args: &[BigRational]) -> Resultat {
    Ok(args[0].clone().max(args[1].clone()))
}

fn min(args: &[BigRational]) -> Resultat {
    Ok(args[0].clone().min(args[1].clone()))
}

fn sqrt(args: &[BigRational]) -> Resultat {
    racine_carree(&args[0])
}

fn aleatoire(_: &[BigRational]) -> Resultat {
    depuis_f64(rand::thread_rng().gen::<f64>())
}

fn fact(args: &[BigRational]) -> Resultat {
    factorielle(&args[0])
}

fn gcd(args: &[BigRational]) -> Resultat {
    Ok(pgcd(&args[0], &args[1]))
}

fn list(_: &[BigRational]) -> Resultat {
    info!("fonctions : {}", noms_fonctions().join(" "));
    Ok(vrai())
}

/* ------------------------ Table ------------------------ */

/// Ordre d’enregistrement (aussi l’ordre d’affichage de `list`).
const FONCTIONS: &[(&str, Fonction)] = &[
    ("abs", Fonction::new(1, abs)),
    ("ceil", Fonction::new(1, ceil)),
    ("floor", Fonction::new(1, floor)),
    ("sin", Fonction::new(1, sin)),
    ("cos", Fonction::new(1, cos)),
    ("tan", Fonction::new(1, tan)),
    ("asin", Fonction::new(1, asin)),
    ("acos", Fonction::new(1, acos)),
    ("atan", Fonction::new(1, atan)),
    ("ln", Fonction::new(1, ln)),
    ("log", Fonction::new(1, log)),
    ("logn", Fonction::new(2, logn)),
    ("max", Fonction::new(2, max)),
    ("min", Fonction::new(2, min)),
    ("sqrt", Fonction::new(1, sqrt)),
    ("rand", Fonction::new(0, aleatoire)),
    ("fact", Fonction::new(1, fact)),
    ("gcd", Fonction::new(2, gcd)),
    ("list", Fonction::new(0, list)),
];

static REGISTRE: OnceLock<HashMap<&'static str, Fonction>> = OnceLock::new();

pub fn fonction(nom: &str) -> Option<Fonction> {
    REGISTRE
        .get_or_init(|| FONCTIONS.iter().copied().collect())
        .get(nom)
        .copied()
}

pub fn noms_fonctions() -> Vec<&'static str> {
    FONCTIONS.iter().map(|(nom, _)| *nom).collect()
}
