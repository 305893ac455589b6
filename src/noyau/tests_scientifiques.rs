//! Tests scientifiques (campagne) : propriétés du langage + limites contrôlées.
//!
//! But : vérifier les contrats observables sans faire chauffer la machine.
//! - budget temps global
//! - exposants / factorielles bornés
//! - aller-retours rendu -> lexage -> évaluation
//!
//! Notes :
//! - l’engagement incrémental des affectations (une erreur plus loin ne défait pas
//!   les affectations déjà réduites) est un comportement documenté, testé comme tel.
//! - les fonctions transcendantes passent par f64 : on compare à une tolérance.

use std::time::{Duration, Instant};

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, ToPrimitive};

use super::erreur::CalcError;
use super::evaluateur::{evaluate, Evaluator};
use super::format::{formater, ModeSortie};

fn r(n: i64, d: i64) -> BigRational {
    BigRational::new(BigInt::from(n), BigInt::from(d))
}

fn eval_ok(expr: &str) -> BigRational {
    evaluate(expr).unwrap_or_else(|e| panic!("expr={expr:?} err={e}"))
}

fn assert_eval_eq(expr: &str, attendu: BigRational) {
    assert_eq!(eval_ok(expr), attendu, "expr={expr:?}");
}

fn assert_proche(expr: &str, attendu: f64) {
    let v = eval_ok(expr).to_f64().unwrap_or(f64::NAN);
    assert!((v - attendu).abs() < 1e-12, "expr={expr:?} v={v} attendu={attendu}");
}

/// Budget global anti-gel.
fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Littéraux ------------------------ */

#[test]
fn litteraux_a_base() {
    assert_eval_eq("0xA", r(10, 1));
    assert_eval_eq("0XfF", r(255, 1));
    assert_eval_eq("0b110011", r(51, 1));
    assert_eval_eq("0o666", r(438, 1));
    assert_eval_eq("0x10 + 0b10 + 0o10", r(26, 1));
}

#[test]
fn litteraux_decimaux_exacts() {
    // 0.1 + 0.2 est exactement 3/10 (pas d’arrondi binaire)
    assert_eval_eq("0.1 + 0.2", r(3, 10));
    assert_eval_eq("0.1 + 0.2 == 0.3", r(1, 1));
    assert_eval_eq("1e3", r(1000, 1));
    assert_eval_eq("2.5e-1", r(1, 4));
    assert_eval_eq(".5 + 5.", r(11, 2));
}

#[test]
fn commentaires() {
    assert_eval_eq("1 + 1 # commentaire", r(2, 1));
    assert_eval_eq("1 + 1 #", r(2, 1));
    assert_eval_eq("#", r(0, 1));
}

/* ------------------------ Propriétés ------------------------ */

#[test]
fn puissance_associative_a_droite() {
    assert_eval_eq("2 ** 3 ** 2", r(512, 1));
    assert_eval_eq("(2 ** 3) ** 2", r(64, 1));
    assert_eval_eq("2 ** 0.5 ** 2", eval_ok("2 ** 0.25"));
}

#[test]
fn soustraction_associative_a_gauche() {
    assert_eval_eq("10 - 3 - 2", r(5, 1));
    assert_eval_eq("10 - (3 - 2)", r(9, 1));
    assert_eval_eq("2 * 3 % 4", r(2, 1));
}

#[test]
fn modulo_mathematique() {
    assert_eval_eq("7 % 3", r(1, 1));
    assert_eval_eq("-7 % 3", r(2, 1));
    assert_eval_eq("7 % -3", r(-2, 1));
    assert_eval_eq("7.5 % 2", r(3, 2));
}

#[test]
fn comparaisons_exactes() {
    assert_eval_eq("1/3 < 0.3334", r(1, 1));
    assert_eval_eq("1/3 >= 1/3", r(1, 1));
    assert_eval_eq("1/3 != 2/6", r(0, 1));
    assert_eval_eq("2 > 3", r(0, 1));
    assert_eval_eq("3 <= 2", r(0, 1));
}

#[test]
fn bit_a_bit() {
    assert_eval_eq("0b1100 & 0b1010", r(8, 1));
    assert_eval_eq("0b1100 | 0b1010", r(14, 1));
    assert_eval_eq("0b1100 ^ 0b1010", r(6, 1));
    assert_eval_eq("(1 << 100) >> 99", r(2, 1));
    // décalages associatifs à droite : 1 << (4 >> 1)
    assert_eval_eq("1 << 4 >> 1", r(4, 1));
    assert_eval_eq("~0", r(-1, 1));
    assert_eval_eq("6 / 3 & 3", r(2, 1));
    assert!(matches!(evaluate("~0.5"), Err(CalcError::Type { .. })));
    assert!(matches!(evaluate("1 << 0.5"), Err(CalcError::Type { .. })));
}

#[test]
fn fonctions_transcendantes_approchees() {
    assert_proche("sin(pi / 2)", 1.0);
    assert_proche("cos(0)", 1.0);
    assert_proche("ln(e)", 1.0);
    assert_proche("logn(2, 1024)", 10.0);
    assert_proche("sqrt(2) ** 2", 2.0);
    assert_proche("2 ** 0.5", std::f64::consts::SQRT_2);
    assert!(matches!(evaluate("acos(2)"), Err(CalcError::Arithmetique { .. })));
}

#[test]
fn racines_exactes() {
    assert_eval_eq("sqrt(144)", r(12, 1));
    assert_eval_eq("sqrt(0.25)", r(1, 2));
}

#[test]
fn grands_entiers_exacts() {
    let f30 = eval_ok("fact(30)");
    assert_eq!(
        f30.numer().to_string(),
        "265252859812191058636308480000000"
    );
    assert!(f30.denom().is_one());
    assert_eval_eq("fact(30) / fact(29)", r(30, 1));
    assert_eval_eq("2 ** 200 / 2 ** 199", r(2, 1));
    assert_eval_eq("gcd(fact(20), 2 ** 64)", r(262144, 1));
}

#[test]
fn limites_controlees() {
    assert!(matches!(
        evaluate("2 ** (2 ** 40)"),
        Err(CalcError::Arithmetique { .. })
    ));
    assert!(matches!(
        evaluate("1 << (2 ** 40)"),
        Err(CalcError::Arithmetique { .. })
    ));
    // bases triviales : pas de limite d’exposant
    assert_eval_eq("1 ** (2 ** 40)", r(1, 1));
    assert_eval_eq("(-1) ** (2 ** 40 + 1)", r(-1, 1));
    assert!(matches!(evaluate("0 ** -1"), Err(CalcError::Arithmetique { .. })));
}

#[test]
fn constantes_predefinies() {
    assert_proche("pi", std::f64::consts::PI);
    assert_proche("e", std::f64::consts::E);
    assert_proche("phi * phi - phi", 1.0);
    assert_eval_eq("true", r(1, 1));
    assert_eval_eq("false", r(0, 1));
    assert_eq!(
        formater(&eval_ok("pi"), ModeSortie::Decimal, 30),
        "3.141592653589793238462643383280"
    );
}

/* ------------------------ Environnement ------------------------ */

#[test]
fn idempotence_affectation() {
    let mut ev = Evaluator::new();
    assert_eq!(ev.run("a = 5"), Ok(r(5, 1)));
    assert_eq!(ev.run("a"), Ok(r(5, 1)));
    assert_eq!(ev.run("a"), Ok(r(5, 1)));
}

#[test]
fn isolation_des_environnements() {
    let mut a = Evaluator::new();
    let mut b = Evaluator::new();
    a.run("x = 1").unwrap();
    b.run("x = 2").unwrap();
    assert_eq!(a.run("x"), Ok(r(1, 1)));
    assert_eq!(b.run("x"), Ok(r(2, 1)));
    assert!(matches!(evaluate("x"), Err(CalcError::VariableIndefinie { .. })));
}

#[test]
fn constantes_reaffectables_par_instance() {
    let mut a = Evaluator::new();
    a.run("pi = 3").unwrap();
    assert_eq!(a.run("pi"), Ok(r(3, 1)));
    assert_proche("pi", std::f64::consts::PI);
}

#[test]
fn quirk_engagement_incremental() {
    // la première affectation est réduite avant l’erreur de la seconde
    let mut ev = Evaluator::new();
    let err = ev.run("min(a = 2, b = 1 / 0)");
    assert!(matches!(err, Err(CalcError::Arithmetique { .. })));
    assert_eq!(ev.get_variable("a"), Ok(r(2, 1)));
    assert!(ev.get_variable("b").is_err());

    // une erreur de lexique, elle, survient avant toute réduction
    let err = ev.run("c = 1 $");
    assert!(matches!(err, Err(CalcError::Lexicale { .. })));
    assert!(ev.get_variable("c").is_err());
}

#[test]
fn environnement_intact_apres_erreur() {
    let mut ev = Evaluator::new();
    ev.run("x = 10").unwrap();
    assert!(ev.run("x = 1 / 0").is_err());
    assert_eq!(ev.run("x"), Ok(r(10, 1)));
    // l’état de travail est remis à zéro : l’appel suivant est sain
    assert_eq!(ev.run("x + 1"), Ok(r(11, 1)));
}

/* ------------------------ Aller-retour ------------------------ */

#[test]
fn aller_retour_rendu_entier() {
    let start = Instant::now();
    let max = Duration::from_secs(3);

    let mut x = BigInt::from(1);
    for k in 0..60 {
        budget(start, max);
        for signe in [1, -1] {
            let v = BigRational::from_integer(&x * signe);
            for mode in ModeSortie::TOUS {
                let texte = formater(&v, mode, 6);
                let relu = eval_ok(&texte);
                assert_eq!(relu, v, "k={k} mode={mode} texte={texte}");
            }
        }
        x = x * 7 + k;
    }
}
